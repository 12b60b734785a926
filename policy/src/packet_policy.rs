// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral packet policies, used for policy-based routing

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketMatch {
    True,
    False,
    PermittedByAcl(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketAction {
    /// Regular destination-based forwarding in the VRF of the ingress interface
    FibLookup,
    /// Forward to the first of these next-hops that is connected, else do a regular lookup
    FibLookupOverrideNextHop(Vec<Ipv4Addr>),
    Drop,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketStatement {
    If {
        guard: PacketMatch,
        then: Vec<PacketStatement>,
    },
    Return(PacketAction),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketPolicy {
    pub name: String,
    pub statements: Vec<PacketStatement>,
    pub default_action: PacketAction,
}

impl PacketPolicy {
    #[must_use]
    pub fn new(name: &str, statements: Vec<PacketStatement>, default_action: PacketAction) -> Self {
        Self {
            name: name.to_owned(),
            statements,
            default_action,
        }
    }
}
