// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Policy-based routing: route-maps applied to the traffic received on an
//! interface are compiled into packet policies.

use model::VendorConfig;
use model::routemap::{LineAction, RouteMap, RouteMapEntry, RouteMapMatch, RouteMapSet};
use policy::Configuration;
use policy::packet_policy::{PacketAction, PacketMatch, PacketPolicy, PacketStatement};
use tracing::debug;

use crate::errors::ConvertError;
use crate::warnings::Warnings;

pub struct PbrCompiler<'a> {
    vendor: &'a VendorConfig,
    warnings: &'a mut Warnings,
}

impl<'a> PbrCompiler<'a> {
    #[must_use]
    pub fn new(vendor: &'a VendorConfig, warnings: &'a mut Warnings) -> Self {
        Self { vendor, warnings }
    }

    fn compile_match(&mut self, m: &RouteMapMatch, usage: &str) -> Option<PacketMatch> {
        match m {
            RouteMapMatch::IpAddress(acl) => {
                if self.vendor.ip_access_lists.contains(acl) {
                    Some(PacketMatch::PermittedByAcl(acl.clone()))
                } else {
                    self.warnings.undefined_reference("ip access-list", acl, usage);
                    Some(PacketMatch::False)
                }
            }
            RouteMapMatch::Ipv6Address(_) => Some(PacketMatch::False),
            RouteMapMatch::Tag(_) => {
                self.warnings
                    .red_flag("'match tag' not supported in PBR policies");
                None
            }
            RouteMapMatch::AsNumber(_)
            | RouteMapMatch::AsPath(_)
            | RouteMapMatch::Community(_)
            | RouteMapMatch::Interface(_)
            | RouteMapMatch::IpAddressPrefixList(_)
            | RouteMapMatch::IpMulticast
            | RouteMapMatch::Ipv6AddressPrefixList(_)
            | RouteMapMatch::Metric(_)
            | RouteMapMatch::RouteType(_)
            | RouteMapMatch::SourceProtocol(_)
            | RouteMapMatch::Vlan(_) => None,
        }
    }

    fn compile_entry(&mut self, rmap: &RouteMap, entry: &RouteMapEntry) -> PacketStatement {
        let usage = format!("route-map {} entry {}", rmap.name, entry.sequence);
        if entry.continue_target.is_some() {
            self.warnings
                .unimplemented(format!("continue in PBR {usage}"));
        }

        let guards: Vec<PacketMatch> = entry
            .matches
            .iter()
            .filter_map(|m| self.compile_match(m, &usage))
            .collect();
        if guards.len() > 1 {
            self.warnings.red_flag(format!(
                "Multiple match conditions in PBR {usage}, only the first one is used"
            ));
        }
        let guard = guards.into_iter().next().unwrap_or(PacketMatch::True);

        let actions: Vec<PacketAction> = entry
            .sets
            .iter()
            .filter_map(|set| match set {
                RouteMapSet::IpNextHopLiteral(hops) => {
                    Some(PacketAction::FibLookupOverrideNextHop(hops.clone()))
                }
                _ => None,
            })
            .collect();
        if actions.len() > 1 {
            self.warnings.red_flag(format!(
                "Multiple set statements in PBR {usage}, only the first one is used"
            ));
        }

        // a deny entry sends matching packets to the destination-based lookup
        let then = match entry.action {
            LineAction::Deny => vec![PacketStatement::Return(PacketAction::FibLookup)],
            LineAction::Permit => actions
                .into_iter()
                .take(1)
                .map(PacketStatement::Return)
                .collect(),
        };
        PacketStatement::If { guard, then }
    }

    #[must_use]
    pub fn compile(&mut self, rmap: &RouteMap) -> PacketPolicy {
        let statements = rmap
            .entries()
            .map(|entry| self.compile_entry(rmap, entry))
            .collect();
        PacketPolicy::new(&rmap.name, statements, PacketAction::FibLookup)
    }

    /// Compile the route-maps used for policy-based routing and attach the
    /// resulting packet policies to their interfaces.
    pub fn convert(&mut self, config: &mut Configuration) -> Result<(), ConvertError> {
        let vendor = self.vendor;
        for (iface, name) in &vendor.policy_routing {
            let Some(rmap) = vendor.route_maps.get(name) else {
                self.warnings.undefined_reference(
                    "route-map",
                    name,
                    &format!("policy routing on interface {iface}"),
                );
                continue;
            };
            if config.get_packet_policy(name).is_none() {
                debug!("Compiling route-map {name} into a packet policy");
                config.add_packet_policy(self.compile(rmap))?;
            }
            config
                .interface_packet_policies
                .insert(iface.clone(), name.clone());
        }
        Ok(())
    }
}
