// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of vendor model objects

use std::fmt::Display;

use crate::bgp::AddressFamily;
use crate::routemap::{Community, LineAction, RouteMap, RouteMapEntry, RouteMapMatch, RouteMapSet};

impl Display for LineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineAction::Deny => write!(f, "deny"),
            LineAction::Permit => write!(f, "permit"),
        }
    }
}

impl Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4Unicast => write!(f, "ipv4 unicast"),
            AddressFamily::Ipv6Unicast => write!(f, "ipv6 unicast"),
            AddressFamily::L2vpnEvpn => write!(f, "l2vpn evpn"),
        }
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Community::Standard(high, low) => write!(f, "{high}:{low}"),
            Community::NoAdvertise => write!(f, "no-advertise"),
            Community::NoPeer => write!(f, "no-peer"),
            Community::NoExport => write!(f, "no-export"),
            Community::Blackhole => write!(f, "blackhole"),
            Community::LocalAs => write!(f, "local-AS"),
            Community::GracefulShutdown => write!(f, "graceful-shutdown"),
            Community::AcceptOwn => write!(f, "accept-own"),
        }
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Display for RouteMapMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteMapMatch::AsNumber(asns) => write!(f, "match as-number {}", join(asns)),
            RouteMapMatch::AsPath(names) => write!(f, "match as-path {}", join(names)),
            RouteMapMatch::Community(names) => write!(f, "match community {}", join(names)),
            RouteMapMatch::Interface(names) => write!(f, "match interface {}", join(names)),
            RouteMapMatch::IpAddress(acl) => write!(f, "match ip address {acl}"),
            RouteMapMatch::IpAddressPrefixList(names) => {
                write!(f, "match ip address prefix-list {}", join(names))
            }
            RouteMapMatch::IpMulticast => write!(f, "match ip multicast"),
            RouteMapMatch::Ipv6Address(acl) => write!(f, "match ipv6 address {acl}"),
            RouteMapMatch::Ipv6AddressPrefixList(names) => {
                write!(f, "match ipv6 address prefix-list {}", join(names))
            }
            RouteMapMatch::Metric(metric) => write!(f, "match metric {metric}"),
            RouteMapMatch::RouteType(types) => {
                let types: Vec<String> = types.iter().map(|t| format!("{t:?}")).collect();
                write!(f, "match route-type {}", types.join(" ").to_lowercase())
            }
            RouteMapMatch::SourceProtocol(proto) => write!(f, "match source-protocol {proto}"),
            RouteMapMatch::Tag(tags) => write!(f, "match tag {}", join(tags)),
            RouteMapMatch::Vlan(vlans) => write!(f, "match vlan {}", join(vlans)),
        }
    }
}

impl Display for RouteMapSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteMapSet::AsPathPrependLastAs(n) => write!(f, "set as-path prepend last-as {n}"),
            RouteMapSet::AsPathPrependLiteral(asns) => {
                write!(f, "set as-path prepend {}", join(asns))
            }
            RouteMapSet::CommListDelete(name) => write!(f, "set comm-list {name} delete"),
            RouteMapSet::Community {
                communities,
                additive,
            } => {
                write!(f, "set community {}", join(communities))?;
                if *additive {
                    write!(f, " additive")?;
                }
                Ok(())
            }
            RouteMapSet::IpNextHopLiteral(ips) => write!(f, "set ip next-hop {}", join(ips)),
            RouteMapSet::IpNextHopUnchanged => write!(f, "set ip next-hop unchanged"),
            RouteMapSet::LocalPreference(lp) => write!(f, "set local-preference {lp}"),
            RouteMapSet::Metric(metric) => write!(f, "set metric {metric}"),
            RouteMapSet::MetricType(mt) => write!(f, "set metric-type {mt:?}"),
            RouteMapSet::Origin(origin) => write!(f, "set origin {origin:?}"),
            RouteMapSet::Tag(tag) => write!(f, "set tag {tag}"),
            RouteMapSet::Weight(weight) => write!(f, "set weight {weight}"),
        }
    }
}

impl Display for RouteMapEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " {} {}", self.action, self.sequence)?;
        for m in &self.matches {
            writeln!(f, "  {m}")?;
        }
        for s in &self.sets {
            writeln!(f, "  {s}")?;
        }
        if let Some(target) = self.continue_target {
            writeln!(f, "  continue {target}")?;
        }
        Ok(())
    }
}

impl Display for RouteMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "route-map {}", self.name)?;
        for entry in self.entries() {
            entry.fmt(f)?;
        }
        Ok(())
    }
}
