// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor configuration model: route maps

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use tracing::error;

use crate::errors::{ModelError, ModelResult};

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineAction {
    Deny,
    Permit,
}

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteType {
    External,
    Internal,
    Local,
    NssaExternal,
    Type1,
    Type2,
}

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricType {
    External,
    Internal,
    Type1,
    Type2,
}

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Egp,
    Igp,
    Incomplete,
}

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Community {
    /// A standard community, as a pair of 16-bit values
    Standard(u16, u16),
    NoAdvertise,
    NoExport,
    NoPeer,
    Blackhole,
    LocalAs,
    GracefulShutdown,
    AcceptOwn,
}

/// A `match` clause in a route-map entry. The set of kinds is closed: the
/// compilers match on it exhaustively.
#[derive(Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteMapMatch {
    AsNumber(Vec<u32>),
    AsPath(Vec<String>),
    Community(Vec<String>),
    Interface(Vec<String>),
    IpAddress(String),
    IpAddressPrefixList(Vec<String>),
    IpMulticast,
    Ipv6Address(String),
    Ipv6AddressPrefixList(Vec<String>),
    Metric(u32),
    RouteType(Vec<RouteType>),
    SourceProtocol(String),
    Tag(Vec<u32>),
    Vlan(Vec<u16>),
}

/// A `set` clause in a route-map entry
#[derive(Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteMapSet {
    AsPathPrependLastAs(u8),
    AsPathPrependLiteral(Vec<u32>),
    CommListDelete(String),
    Community {
        communities: Vec<Community>,
        #[serde(default)]
        additive: bool,
    },
    IpNextHopLiteral(Vec<Ipv4Addr>),
    IpNextHopUnchanged,
    LocalPreference(u32),
    Metric(u32),
    MetricType(MetricType),
    Origin(Origin),
    Tag(u32),
    Weight(u32),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteMapEntry {
    pub sequence: u32,
    pub action: LineAction,
    #[serde(default)]
    pub matches: Vec<RouteMapMatch>,
    #[serde(default)]
    pub sets: Vec<RouteMapSet>,
    #[serde(default, rename = "continue")]
    pub continue_target: Option<u32>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteMap {
    pub name: String,
    #[serde(default)]
    pub entries: BTreeMap<u32, RouteMapEntry>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteMapTable(BTreeMap<String, RouteMap>);

/* Impl basic ops */
impl RouteMapEntry {
    #[must_use]
    pub fn new(sequence: u32, action: LineAction) -> Self {
        Self {
            sequence,
            action,
            matches: vec![],
            sets: vec![],
            continue_target: None,
        }
    }
    #[must_use]
    pub fn add_match(mut self, m: RouteMapMatch) -> Self {
        self.matches.push(m);
        self
    }
    #[must_use]
    pub fn add_set(mut self, set: RouteMapSet) -> Self {
        self.sets.push(set);
        self
    }
    #[must_use]
    pub fn set_continue(mut self, target: u32) -> Self {
        self.continue_target = Some(target);
        self
    }
}
impl RouteMap {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: BTreeMap::new(),
        }
    }
    pub fn add_entry(&mut self, entry: RouteMapEntry) -> ModelResult {
        if self.entries.contains_key(&entry.sequence) {
            let err = ModelError::DuplicateSequence(
                format!("route-map {}", self.name),
                entry.sequence,
            );
            error!("{err}");
            return Err(err);
        }
        self.entries.insert(entry.sequence, entry);
        Ok(())
    }
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = RouteMapEntry>) -> ModelResult {
        for entry in entries {
            self.add_entry(entry)?;
        }
        Ok(())
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    #[must_use]
    pub fn get_entry(&self, sequence: u32) -> Option<&RouteMapEntry> {
        self.entries.get(&sequence)
    }
    /// Iterate over the entries of this route-map, in ascending sequence order
    pub fn entries(&self) -> impl Iterator<Item = &RouteMapEntry> {
        self.entries.values()
    }
    /// The sequence numbers that are the target of some `continue` and that exist
    #[must_use]
    pub fn valid_continue_targets(&self) -> Vec<u32> {
        let mut targets: Vec<u32> = self
            .entries()
            .filter_map(|e| e.continue_target)
            .filter(|t| self.entries.contains_key(t))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}
impl RouteMapTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_route_map(&mut self, rmap: RouteMap) {
        self.0.insert(rmap.name.clone(), rmap);
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteMap> {
        self.0.get(name)
    }
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn values(&self) -> impl Iterator<Item = &RouteMap> {
        self.0.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
