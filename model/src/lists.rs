// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor configuration model: community lists and as-path access lists

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::routemap::{Community, LineAction};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommunityListEntry {
    pub action: LineAction,
    pub communities: Vec<Community>,
}

/// A standard community list. A route matches an entry if it carries all of the
/// communities listed in the entry.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommunityList {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<CommunityListEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AsPathAccessListEntry {
    pub action: LineAction,
    pub regex: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AsPathAccessList {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<AsPathAccessListEntry>,
}

impl CommunityListEntry {
    #[must_use]
    pub fn new(action: LineAction, communities: Vec<Community>) -> Self {
        Self {
            action,
            communities,
        }
    }
}
impl CommunityList {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: vec![],
        }
    }
    #[must_use]
    pub fn add_entry(mut self, entry: CommunityListEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl AsPathAccessListEntry {
    #[must_use]
    pub fn new(action: LineAction, regex: &str) -> Self {
        Self {
            action,
            regex: regex.to_owned(),
        }
    }
}
impl AsPathAccessList {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: vec![],
        }
    }
    #[must_use]
    pub fn add_entry(mut self, entry: AsPathAccessListEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// Name-keyed table of community lists
pub type CommunityListTable = BTreeMap<String, CommunityList>;

/// Name-keyed table of as-path access lists
pub type AsPathAccessListTable = BTreeMap<String, AsPathAccessList>;
