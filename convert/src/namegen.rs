// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Names of the generated policies. Generated names contain a `~`, which can't
//! appear in a configured name, so they never clash with user-defined objects.

use model::routemap::RouteMap;
use policy::bgp::{BgpAf, PeerId};

/// Names of the policies generated for a route-map
pub(crate) trait RouteMapPolicyNames {
    fn route_map_name(&self) -> &str;

    /// The policy evaluating the entries of the route-map starting at `sequence`
    fn fragment_policy(&self, sequence: u32) -> String {
        fragment_policy_name(self.route_map_name(), sequence)
    }
}

impl RouteMapPolicyNames for RouteMap {
    fn route_map_name(&self) -> &str {
        &self.name
    }
}

pub(crate) fn fragment_policy_name(route_map: &str, sequence: u32) -> String {
    format!("~{route_map}~SEQ:{sequence}~")
}

/// The deny-all policy standing for a route-map that is used but not defined
pub(crate) fn undefined_route_map_policy(route_map: &str) -> String {
    format!("{route_map}~undefined")
}

/// The policy matching the default route sent to peers with default-originate
pub(crate) const DEFAULT_ROUTE_EXPORT_POLICY: &str = "~BGP_DEFAULT_ROUTE_EXPORT_POLICY~";

/// Names of the import and export policies of a BGP peer
pub(crate) trait PeerPolicyNames {
    fn import_policy(&self, vrf: &str, af: BgpAf) -> String;
    fn export_policy(&self, vrf: &str, af: BgpAf) -> String;
}

impl PeerPolicyNames for PeerId {
    fn import_policy(&self, vrf: &str, af: BgpAf) -> String {
        format!("~BGP_PEER_IMPORT_POLICY:{vrf}:{self}:{af}~")
    }
    fn export_policy(&self, vrf: &str, af: BgpAf) -> String {
        format!("~BGP_PEER_EXPORT_POLICY:{vrf}:{self}:{af}~")
    }
}
