// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor configuration model: BGP templates.
//! The template store owns all named templates of a BGP process. Templates
//! only refer to each other by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

use crate::bgp::{AfConfig, NeighborConfig, SessionConfig};
use crate::errors::{ModelError, ModelResult};

/// Progress of the inheritance resolution of a neighbor or template.
/// The state is moved to `InProgress` before resolving anything the object
/// inherits from, so that re-entering the object through an inheritance cycle
/// can be detected and cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveState {
    #[default]
    Unresolved,
    InProgress,
    Resolved,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// A `template peer-session`
pub struct PeerSessionTemplate {
    pub name: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub inherit_peer_session: Option<String>,

    #[serde(skip)]
    pub state: ResolveState,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// A `template peer-policy`. Its own `inherit_peer_policy` lists the policy
/// templates it inherits from.
pub struct PeerPolicyTemplate {
    pub name: String,
    #[serde(default)]
    pub af: AfConfig,

    #[serde(skip)]
    pub state: ResolveState,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateStore {
    pub peers: BTreeMap<String, NeighborConfig>,
    pub peer_sessions: BTreeMap<String, PeerSessionTemplate>,
    pub peer_policies: BTreeMap<String, PeerPolicyTemplate>,
}

impl PeerSessionTemplate {
    #[must_use]
    pub fn new(name: &str, session: SessionConfig) -> Self {
        Self {
            name: name.to_owned(),
            session,
            inherit_peer_session: None,
            state: ResolveState::Unresolved,
        }
    }
    #[must_use]
    pub fn set_inherit_peer_session(mut self, template: &str) -> Self {
        self.inherit_peer_session = Some(template.to_owned());
        self
    }
}

impl PeerPolicyTemplate {
    #[must_use]
    pub fn new(name: &str, af: AfConfig) -> Self {
        Self {
            name: name.to_owned(),
            af,
            state: ResolveState::Unresolved,
        }
    }
}

impl TemplateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    fn check_unique<T>(map: &BTreeMap<String, T>, kind: &'static str, name: &str) -> ModelResult {
        if map.contains_key(name) {
            let err = ModelError::DuplicateName(kind, name.to_owned());
            error!("{err}");
            return Err(err);
        }
        Ok(())
    }
    pub fn add_peer(&mut self, name: &str, template: NeighborConfig) -> ModelResult {
        Self::check_unique(&self.peers, "peer template", name)?;
        self.peers.insert(name.to_owned(), template);
        Ok(())
    }
    pub fn add_peer_session(&mut self, template: PeerSessionTemplate) -> ModelResult {
        Self::check_unique(&self.peer_sessions, "peer-session template", &template.name)?;
        self.peer_sessions.insert(template.name.clone(), template);
        Ok(())
    }
    pub fn add_peer_policy(&mut self, template: PeerPolicyTemplate) -> ModelResult {
        Self::check_unique(&self.peer_policies, "peer-policy template", &template.name)?;
        self.peer_policies.insert(template.name.clone(), template);
        Ok(())
    }
    #[must_use]
    pub fn get_peer(&self, name: &str) -> Option<&NeighborConfig> {
        self.peers.get(name)
    }
    #[must_use]
    pub fn get_peer_session(&self, name: &str) -> Option<&PeerSessionTemplate> {
        self.peer_sessions.get(name)
    }
    #[must_use]
    pub fn get_peer_policy(&self, name: &str) -> Option<&PeerPolicyTemplate> {
        self.peer_policies.get(name)
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty() && self.peer_sessions.is_empty() && self.peer_policies.is_empty()
    }
}
