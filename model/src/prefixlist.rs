// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor configuration model: prefix lists

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

use crate::errors::{ModelError, ModelResult};
use crate::routemap::LineAction;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVer {
    #[default]
    V4,
    V6,
}

#[derive(Clone, Debug, Ord, Eq, PartialOrd, PartialEq, Serialize, Deserialize)]
pub struct PrefixListEntry {
    pub action: LineAction,
    pub prefix: IpNet,
    #[serde(default)]
    pub ge: Option<u8>,
    #[serde(default)]
    pub le: Option<u8>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PrefixList {
    pub name: String,
    #[serde(default)]
    pub ipver: IpVer,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entries: BTreeMap<u32, PrefixListEntry>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixListTable(BTreeMap<String, PrefixList>);

/* Impl basic ops */
impl PrefixListEntry {
    #[must_use]
    pub fn new(action: LineAction, prefix: IpNet) -> Self {
        Self {
            action,
            prefix,
            ge: None,
            le: None,
        }
    }
    #[must_use]
    pub fn set_ge(mut self, ge: u8) -> Self {
        self.ge = Some(ge);
        self
    }
    #[must_use]
    pub fn set_le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }
    /// Tell if a `PrefixListEntry` can be added to a `PrefixList` depending on
    /// the prefix it contains (ipv4 of ipv6) and the `PrefixList` `IpVer` value
    #[must_use]
    pub fn is_version_compatible(&self, ipver: IpVer) -> bool {
        match ipver {
            IpVer::V4 => matches!(self.prefix, IpNet::V4(_)),
            IpVer::V6 => matches!(self.prefix, IpNet::V6(_)),
        }
    }
    /// The inclusive range of prefix lengths matched by this entry. Without
    /// `ge` nor `le`, only the exact prefix length matches. A `ge` alone extends
    /// the range up to the maximum length of the address family.
    #[must_use]
    pub fn length_range(&self) -> (u8, u8) {
        let len = self.prefix.prefix_len();
        let max = self.prefix.max_prefix_len();
        match (self.ge, self.le) {
            (None, None) => (len, len),
            (Some(ge), None) => (ge, max),
            (None, Some(le)) => (len, le),
            (Some(ge), Some(le)) => (ge, le),
        }
    }
    fn validate(&self) -> ModelResult {
        let len = self.prefix.prefix_len();
        let max = self.prefix.max_prefix_len();
        let (low, high) = self.length_range();
        if low < len || low > high || high > max {
            return Err(ModelError::InvalidLengthRange(self.prefix, self.ge, self.le));
        }
        Ok(())
    }
}

impl PrefixList {
    #[must_use]
    pub fn new(name: &str, ipver: IpVer, description: Option<String>) -> Self {
        Self {
            name: name.to_owned(),
            ipver,
            description,
            entries: BTreeMap::new(),
        }
    }
    pub fn add_entry(&mut self, seq: u32, entry: PrefixListEntry) -> ModelResult {
        if !entry.is_version_compatible(self.ipver) {
            let err = ModelError::IncompatiblePrefix(self.name.clone(), entry.prefix);
            error!("{err}");
            return Err(err);
        }
        entry.validate()?;
        if self.entries.contains_key(&seq) {
            let err = ModelError::DuplicateSequence(format!("prefix-list {}", self.name), seq);
            error!("{err}");
            return Err(err);
        }
        self.entries.insert(seq, entry);
        Ok(())
    }
    pub fn entries(&self) -> impl Iterator<Item = (&u32, &PrefixListEntry)> {
        self.entries.iter()
    }
}

impl PrefixListTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_prefix_list(&mut self, plist: PrefixList) {
        self.0.insert(plist.name.clone(), plist);
    }
    pub fn add_prefix_lists(&mut self, plists: impl IntoIterator<Item = PrefixList>) {
        for plist in plists {
            self.add_prefix_list(plist);
        }
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PrefixList> {
        self.0.get(name)
    }
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn values(&self) -> impl Iterator<Item = &PrefixList> {
        self.0.values()
    }
}
