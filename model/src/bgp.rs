// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor configuration model: BGP

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use tracing::error;

use crate::errors::{ModelError, ModelResult};
use crate::templates::{ResolveState, TemplateStore};

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressFamily {
    Ipv4Unicast,
    Ipv6Unicast,
    L2vpnEvpn,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Session-level neighbor settings. Shared by neighbors, neighbor templates
/// and peer-session templates.
pub struct SessionConfig {
    pub description: Option<String>,
    pub local_as: Option<u32>,
    pub remote_as: Option<u32>,
    pub ebgp_multihop: Option<u8>,
    pub shutdown: Option<bool>,
    pub update_source: Option<String>,
    pub remove_private_as: Option<bool>,
    pub password: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Per address-family neighbor settings. Shared by neighbors, neighbor templates
/// and peer-policy templates.
pub struct AfConfig {
    pub inbound_route_map: Option<String>,
    pub outbound_route_map: Option<String>,
    pub inbound_prefix_list: Option<String>,
    pub outbound_prefix_list: Option<String>,
    pub route_reflector_client: Option<bool>,
    pub as_override: Option<bool>,
    pub next_hop_self: Option<bool>,
    pub send_community: Option<bool>,
    pub send_community_extended: Option<bool>,
    pub allowas_in: Option<u8>,
    pub default_originate: Option<bool>,

    /// peer-policy templates to inherit from, keyed by priority
    pub inherit_peer_policy: BTreeMap<u32, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
/// A BGP neighbor config. The same type is used for concrete neighbors
/// and for neighbor templates (`template peer`).
pub struct NeighborConfig {
    pub session: SessionConfig,
    pub address_families: BTreeMap<AddressFamily, AfConfig>,
    pub inherit_peer: Option<String>,
    pub inherit_peer_session: Option<String>,

    #[serde(skip)]
    pub state: ResolveState,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
/// The BGP configuration of a VRF
pub struct BgpVrf {
    pub name: String,
    pub router_id: Option<Ipv4Addr>,
    pub neighbors: BTreeMap<IpAddr, NeighborConfig>,
    pub passive_neighbors: BTreeMap<IpNet, NeighborConfig>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// A BGP process: its VRFs and the templates neighbors may inherit from
pub struct BgpProcess {
    pub asn: u32,
    #[serde(default)]
    pub router_id: Option<Ipv4Addr>,
    #[serde(default)]
    pub vrfs: BTreeMap<String, BgpVrf>,
    #[serde(default)]
    pub templates: TemplateStore,
}

/* ===== impls: Builders ===== */
impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
    #[must_use]
    pub fn set_local_as(mut self, asn: u32) -> Self {
        self.local_as = Some(asn);
        self
    }
    #[must_use]
    pub fn set_remote_as(mut self, asn: u32) -> Self {
        self.remote_as = Some(asn);
        self
    }
    #[must_use]
    pub fn set_ebgp_multihop(mut self, ttl: u8) -> Self {
        self.ebgp_multihop = Some(ttl);
        self
    }
    #[must_use]
    pub fn set_shutdown(mut self, value: bool) -> Self {
        self.shutdown = Some(value);
        self
    }
    #[must_use]
    pub fn set_update_source(mut self, ifname: &str) -> Self {
        self.update_source = Some(ifname.to_owned());
        self
    }
    #[must_use]
    pub fn set_remove_private_as(mut self, value: bool) -> Self {
        self.remove_private_as = Some(value);
        self
    }
    #[must_use]
    pub fn set_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }
}

impl AfConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn set_route_map_in(mut self, rmap_name: &str) -> Self {
        self.inbound_route_map = Some(rmap_name.to_owned());
        self
    }
    #[must_use]
    pub fn set_route_map_out(mut self, rmap_name: &str) -> Self {
        self.outbound_route_map = Some(rmap_name.to_owned());
        self
    }
    #[must_use]
    pub fn set_prefix_list_in(mut self, plist_name: &str) -> Self {
        self.inbound_prefix_list = Some(plist_name.to_owned());
        self
    }
    #[must_use]
    pub fn set_prefix_list_out(mut self, plist_name: &str) -> Self {
        self.outbound_prefix_list = Some(plist_name.to_owned());
        self
    }
    #[must_use]
    pub fn set_rr_client(mut self, value: bool) -> Self {
        self.route_reflector_client = Some(value);
        self
    }
    #[must_use]
    pub fn set_as_override(mut self, value: bool) -> Self {
        self.as_override = Some(value);
        self
    }
    #[must_use]
    pub fn set_next_hop_self(mut self, value: bool) -> Self {
        self.next_hop_self = Some(value);
        self
    }
    #[must_use]
    pub fn set_send_community(mut self, value: bool) -> Self {
        self.send_community = Some(value);
        self
    }
    #[must_use]
    pub fn set_send_community_extended(mut self, value: bool) -> Self {
        self.send_community_extended = Some(value);
        self
    }
    #[must_use]
    pub fn set_allowas_in(mut self, count: u8) -> Self {
        self.allowas_in = Some(count);
        self
    }
    #[must_use]
    pub fn set_default_originate(mut self, value: bool) -> Self {
        self.default_originate = Some(value);
        self
    }
    /// Inherit from a peer-policy template with the given priority. Lower
    /// priorities are inherited first.
    pub fn inherit_peer_policy(&mut self, template: &str, priority: u32) -> ModelResult {
        if self.inherit_peer_policy.contains_key(&priority) {
            let err = ModelError::DuplicatePolicyPriority(template.to_owned(), priority);
            error!("{err}");
            return Err(err);
        }
        self.inherit_peer_policy
            .insert(priority, template.to_owned());
        Ok(())
    }
}

impl NeighborConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn set_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
    #[must_use]
    pub fn set_inherit_peer(mut self, template: &str) -> Self {
        self.inherit_peer = Some(template.to_owned());
        self
    }
    #[must_use]
    pub fn set_inherit_peer_session(mut self, template: &str) -> Self {
        self.inherit_peer_session = Some(template.to_owned());
        self
    }
    pub fn add_address_family(&mut self, af: AddressFamily, config: AfConfig) -> ModelResult {
        if self.address_families.contains_key(&af) {
            let err = ModelError::DuplicateAddressFamily(af);
            error!("{err}");
            return Err(err);
        }
        self.address_families.insert(af, config);
        Ok(())
    }
    #[must_use]
    pub fn get_address_family(&self, af: AddressFamily) -> Option<&AfConfig> {
        self.address_families.get(&af)
    }
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state == ResolveState::Resolved
    }
}

impl BgpVrf {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }
    pub fn set_router_id(&mut self, router_id: Ipv4Addr) {
        self.router_id = Some(router_id);
    }
    pub fn add_neighbor(&mut self, address: IpAddr, neighbor: NeighborConfig) -> ModelResult {
        if self.neighbors.contains_key(&address) {
            let err = ModelError::DuplicateNeighbor(address.to_string(), self.name.clone());
            error!("{err}");
            return Err(err);
        }
        self.neighbors.insert(address, neighbor);
        Ok(())
    }
    pub fn add_passive_neighbor(&mut self, prefix: IpNet, neighbor: NeighborConfig) -> ModelResult {
        if self.passive_neighbors.contains_key(&prefix) {
            let err = ModelError::DuplicateNeighbor(prefix.to_string(), self.name.clone());
            error!("{err}");
            return Err(err);
        }
        self.passive_neighbors.insert(prefix, neighbor);
        Ok(())
    }
    #[must_use]
    pub fn get_neighbor(&self, address: &IpAddr) -> Option<&NeighborConfig> {
        self.neighbors.get(address)
    }
}

impl BgpProcess {
    #[must_use]
    pub fn new(asn: u32) -> Self {
        Self {
            asn,
            ..Default::default()
        }
    }
    pub fn set_router_id(&mut self, router_id: Ipv4Addr) {
        self.router_id = Some(router_id);
    }
    pub fn add_vrf(&mut self, vrf: BgpVrf) {
        self.vrfs.insert(vrf.name.clone(), vrf);
    }
    #[must_use]
    pub fn get_vrf(&self, name: &str) -> Option<&BgpVrf> {
        self.vrfs.get(name)
    }
    /// Mutably get the VRF with the given name, creating it if it does not exist
    pub fn vrf_mut(&mut self, name: &str) -> &mut BgpVrf {
        self.vrfs
            .entry(name.to_owned())
            .or_insert_with(|| BgpVrf::new(name))
    }
}
