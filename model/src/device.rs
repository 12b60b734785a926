// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The vendor-specific configuration of a device, as produced by a parser.
//! This is the input of the conversion.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::bgp::BgpProcess;
use crate::lists::{AsPathAccessList, AsPathAccessListTable, CommunityList, CommunityListTable};
use crate::prefixlist::{PrefixList, PrefixListTable};
use crate::routemap::{RouteMap, RouteMapTable};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    pub hostname: String,
    pub route_maps: RouteMapTable,
    pub prefix_lists: PrefixListTable,
    pub community_lists: CommunityListTable,
    pub as_path_lists: AsPathAccessListTable,
    /// names of the defined IP access lists. Their contents are not needed here.
    pub ip_access_lists: BTreeSet<String>,
    /// route-maps applied for policy-based routing, keyed by interface name
    pub policy_routing: BTreeMap<String, String>,
    pub bgp: Option<BgpProcess>,
}

impl VendorConfig {
    #[must_use]
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            ..Default::default()
        }
    }
    pub fn add_route_map(&mut self, rmap: RouteMap) {
        self.route_maps.add_route_map(rmap);
    }
    pub fn add_prefix_list(&mut self, plist: PrefixList) {
        self.prefix_lists.add_prefix_list(plist);
    }
    pub fn add_community_list(&mut self, clist: CommunityList) {
        self.community_lists.insert(clist.name.clone(), clist);
    }
    pub fn add_as_path_list(&mut self, alist: AsPathAccessList) {
        self.as_path_lists.insert(alist.name.clone(), alist);
    }
    pub fn add_ip_access_list(&mut self, name: &str) {
        self.ip_access_lists.insert(name.to_owned());
    }
    pub fn set_policy_routing(&mut self, ifname: &str, rmap_name: &str) {
        self.policy_routing
            .insert(ifname.to_owned(), rmap_name.to_owned());
    }
    pub fn set_bgp(&mut self, bgp: BgpProcess) {
        self.bgp = Some(bgp);
    }
}
