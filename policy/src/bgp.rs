// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral BGP configuration: fully resolved peers, with no templates

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PeerId {
    Active(IpAddr),
    /// A dynamic (listen range) neighbor
    Passive(IpNet),
}

impl Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerId::Active(a) => write!(f, "{a}"),
            PeerId::Passive(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BgpAf {
    Ipv4Unicast,
    Ipv6Unicast,
    L2vpnEvpn,
}

impl Display for BgpAf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BgpAf::Ipv4Unicast => write!(f, "ipv4-unicast"),
            BgpAf::Ipv6Unicast => write!(f, "ipv6-unicast"),
            BgpAf::L2vpnEvpn => write!(f, "l2vpn-evpn"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAfConfig {
    pub import_policy: Option<String>,
    pub export_policy: Option<String>,
    pub route_reflector_client: bool,
    pub as_override: bool,
    pub next_hop_self: bool,
    pub send_community: bool,
    pub send_extended_community: bool,
    pub allowas_in: u8,
    pub default_originate: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpPeerConfig {
    pub peer: PeerId,
    pub description: Option<String>,
    pub local_as: u32,
    pub remote_as: Option<u32>,
    pub ebgp_multihop: u8,
    pub update_source: Option<String>,
    pub remove_private_as: bool,
    pub password: Option<String>,
    pub address_families: BTreeMap<BgpAf, PeerAfConfig>,
}

impl BgpPeerConfig {
    #[must_use]
    pub fn new(peer: PeerId, local_as: u32) -> Self {
        Self {
            peer,
            description: None,
            local_as,
            remote_as: None,
            ebgp_multihop: 1,
            update_source: None,
            remove_private_as: false,
            password: None,
            address_families: BTreeMap::new(),
        }
    }
    #[must_use]
    pub fn is_ebgp(&self) -> bool {
        self.remote_as.is_some_and(|r| r != self.local_as)
    }
    #[must_use]
    pub fn get_af(&self, af: BgpAf) -> Option<&PeerAfConfig> {
        self.address_families.get(&af)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpVrfPeers {
    pub name: String,
    pub router_id: Option<Ipv4Addr>,
    pub peers: BTreeMap<PeerId, BgpPeerConfig>,
}

impl BgpVrfPeers {
    #[must_use]
    pub fn new(name: &str, router_id: Option<Ipv4Addr>) -> Self {
        Self {
            name: name.to_owned(),
            router_id,
            peers: BTreeMap::new(),
        }
    }
    pub fn add_peer(&mut self, peer: BgpPeerConfig) {
        self.peers.insert(peer.peer, peer);
    }
    #[must_use]
    pub fn get_peer(&self, peer: &PeerId) -> Option<&BgpPeerConfig> {
        self.peers.get(peer)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpProcess {
    pub asn: u32,
    pub router_id: Option<Ipv4Addr>,
    pub vrfs: BTreeMap<String, BgpVrfPeers>,
}

impl BgpProcess {
    #[must_use]
    pub fn new(asn: u32, router_id: Option<Ipv4Addr>) -> Self {
        Self {
            asn,
            router_id,
            vrfs: BTreeMap::new(),
        }
    }
    pub fn add_vrf(&mut self, vrf: BgpVrfPeers) {
        self.vrfs.insert(vrf.name.clone(), vrf);
    }
    #[must_use]
    pub fn get_vrf(&self, name: &str) -> Option<&BgpVrfPeers> {
        self.vrfs.get(name)
    }
    /// All the peers of all the vrfs
    pub fn peers(&self) -> impl Iterator<Item = &BgpPeerConfig> {
        self.vrfs.values().flat_map(|vrf| vrf.peers.values())
    }
}
