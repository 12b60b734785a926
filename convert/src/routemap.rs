// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Compilation of route-maps into routing policies.
//!
//! A route-map is evaluated entry by entry, by ascending sequence number. An
//! entry whose matches all succeed applies its sets and then permits or denies,
//! unless it has a `continue`: then its action only becomes the default and
//! evaluation jumps to the target entry.
//!
//! Routing policies have no jumps, so the entries are split in fragments that
//! start at the first entry or at any valid continue target. Each fragment is a
//! policy named `~<route-map>~SEQ:<sequence>~`. A jump is a call to the fragment
//! of the target. The action of the last continue taken lives in the local
//! default-action register, which the first fragment initializes to reject and
//! every fragment returns when evaluation falls off its end. The policy named
//! after the route-map calls the first fragment and permits or denies according
//! to the calling context.

use model::VendorConfig;
use model::prefixlist::IpVer;
use model::routemap::{
    LineAction, MetricType, Origin, RouteMap, RouteMapEntry, RouteMapMatch, RouteMapSet, RouteType,
};
use policy::RoutingPolicy;
use policy::statement::{
    AsPathPrepend, BooleanExpr, CommunitySetExpr, DefaultAction, IsisMetricType, NextHopExpr,
    OriginType, OspfMetricType, Protocol, Statement,
};
use std::collections::BTreeSet;
use tracing::{debug, error};

use crate::errors::ConvertError;
use crate::filters::standard_community;
use crate::namegen::RouteMapPolicyNames;
use crate::settings::ConverterSettings;
use crate::warnings::Warnings;

/// Protocols of the routes a `match route-type` matches. None if the route
/// type can't be matched in a routing policy.
fn route_type_protocols(route_type: RouteType) -> Option<Vec<Protocol>> {
    match route_type {
        RouteType::External => Some(vec![
            Protocol::Bgp,
            Protocol::Eigrp,
            Protocol::OspfE1,
            Protocol::OspfE2,
        ]),
        RouteType::Internal => Some(vec![Protocol::Ibgp, Protocol::Ospf, Protocol::OspfIa]),
        RouteType::Local => Some(vec![Protocol::Local]),
        RouteType::Type1 => Some(vec![Protocol::OspfE1]),
        RouteType::Type2 => Some(vec![Protocol::OspfE2]),
        RouteType::NssaExternal => None,
    }
}

/// Protocols of the routes a `match source-protocol` matches
fn source_protocols(protocol: &str) -> Option<Vec<Protocol>> {
    match protocol {
        "bgp" => Some(vec![Protocol::Bgp, Protocol::Ibgp]),
        "connected" | "direct" => Some(vec![Protocol::Connected]),
        "eigrp" => Some(vec![Protocol::Eigrp, Protocol::EigrpEx]),
        "isis" => Some(vec![
            Protocol::IsisL1,
            Protocol::IsisL2,
            Protocol::IsisEl1,
            Protocol::IsisEl2,
        ]),
        "local" => Some(vec![Protocol::Local]),
        "ospf" => Some(vec![
            Protocol::Ospf,
            Protocol::OspfIa,
            Protocol::OspfE1,
            Protocol::OspfE2,
        ]),
        "rip" => Some(vec![Protocol::Rip]),
        "static" => Some(vec![Protocol::Static]),
        _ => None,
    }
}

fn origin_type(origin: Origin) -> OriginType {
    match origin {
        Origin::Egp => OriginType::Egp,
        Origin::Igp => OriginType::Igp,
        Origin::Incomplete => OriginType::Incomplete,
    }
}

pub struct RouteMapCompiler<'a> {
    vendor: &'a VendorConfig,
    settings: &'a ConverterSettings,
    warnings: &'a mut Warnings,
}

impl<'a> RouteMapCompiler<'a> {
    #[must_use]
    pub fn new(
        vendor: &'a VendorConfig,
        settings: &'a ConverterSettings,
        warnings: &'a mut Warnings,
    ) -> Self {
        Self {
            vendor,
            settings,
            warnings,
        }
    }

    /// Names of the lists in `names` that pass the `defined` check. Undefined ones are warned about.
    fn defined_lists<'n>(
        &mut self,
        names: &'n [String],
        kind: &str,
        usage: &str,
        defined: impl Fn(&str) -> bool,
    ) -> Vec<&'n String> {
        names
            .iter()
            .filter(|name| {
                let found = defined(name.as_str());
                if !found {
                    self.warnings.undefined_reference(kind, name, usage);
                }
                found
            })
            .collect()
    }

    /// Build the boolean expression for a match clause, for route filtering
    fn compile_match(&mut self, m: &RouteMapMatch, usage: &str) -> BooleanExpr {
        let vendor = self.vendor;
        match m {
            // only selects the peers to establish sessions with
            RouteMapMatch::AsNumber(_) => BooleanExpr::True,
            RouteMapMatch::AsPath(names) => {
                let defined = self.defined_lists(names, "as-path access-list", usage, |n| {
                    vendor.as_path_lists.contains_key(n)
                });
                BooleanExpr::any(
                    defined
                        .into_iter()
                        .map(|n| BooleanExpr::MatchAsPath(n.clone()))
                        .collect(),
                )
            }
            RouteMapMatch::Community(names) => {
                let defined = self.defined_lists(names, "community-list", usage, |n| {
                    vendor.community_lists.contains_key(n)
                });
                BooleanExpr::any(
                    defined
                        .into_iter()
                        .map(|n| BooleanExpr::MatchCommunities(n.clone()))
                        .collect(),
                )
            }
            RouteMapMatch::Interface(ifaces) => {
                BooleanExpr::MatchInterface(ifaces.iter().cloned().collect())
            }
            // these only apply to policy-based routing
            RouteMapMatch::IpAddress(_) | RouteMapMatch::Ipv6Address(_) | RouteMapMatch::Vlan(_) => {
                BooleanExpr::True
            }
            RouteMapMatch::IpAddressPrefixList(names) => {
                let defined = self.defined_lists(names, "prefix-list", usage, |n| {
                    vendor
                        .prefix_lists
                        .get(n)
                        .is_some_and(|plist| plist.ipver == IpVer::V4)
                });
                if defined.len() < names.len() {
                    // an undefined prefix-list matches everything
                    BooleanExpr::True
                } else {
                    BooleanExpr::any(
                        defined
                            .into_iter()
                            .map(|n| BooleanExpr::MatchPrefixSet(n.clone()))
                            .collect(),
                    )
                }
            }
            // routes are ipv4
            RouteMapMatch::Ipv6AddressPrefixList(_) => BooleanExpr::False,
            RouteMapMatch::IpMulticast => {
                self.warnings.unimplemented(format!("'{m}' in {usage}"));
                BooleanExpr::False
            }
            RouteMapMatch::Metric(metric) => BooleanExpr::MatchMetric(*metric),
            RouteMapMatch::RouteType(types) => {
                let mut protocols = BTreeSet::new();
                for route_type in types {
                    match route_type_protocols(*route_type) {
                        Some(p) => protocols.extend(p),
                        None => return BooleanExpr::False,
                    }
                }
                BooleanExpr::MatchProtocol(protocols)
            }
            RouteMapMatch::SourceProtocol(protocol) => match source_protocols(protocol) {
                Some(p) => BooleanExpr::MatchProtocol(p.into_iter().collect()),
                None => {
                    self.warnings
                        .unimplemented(format!("Unknown source-protocol '{protocol}' in {usage}"));
                    BooleanExpr::False
                }
            },
            RouteMapMatch::Tag(tags) => {
                BooleanExpr::any(tags.iter().map(|t| BooleanExpr::MatchTag(*t)).collect())
            }
        }
    }

    /// Build the statement for a set clause, if it has any effect on routes
    fn compile_set(&mut self, set: &RouteMapSet, usage: &str) -> Option<Statement> {
        let statement = match set {
            RouteMapSet::AsPathPrependLastAs(count) => {
                Statement::PrependAsPath(AsPathPrepend::LastAs(*count))
            }
            RouteMapSet::AsPathPrependLiteral(asns) => {
                Statement::PrependAsPath(AsPathPrepend::Literal(asns.clone()))
            }
            RouteMapSet::CommListDelete(name) => {
                if !self.vendor.community_lists.contains_key(name) {
                    self.warnings
                        .undefined_reference("community-list", name, usage);
                    return None;
                }
                Statement::SetCommunities(CommunitySetExpr::DeleteMatching(name.clone()))
            }
            RouteMapSet::Community {
                communities,
                additive,
            } => {
                let communities = communities.iter().copied().map(standard_community).collect();
                if *additive {
                    Statement::SetCommunities(CommunitySetExpr::Add(communities))
                } else {
                    Statement::SetCommunities(CommunitySetExpr::Replace(communities))
                }
            }
            RouteMapSet::IpNextHopLiteral(hops) => match hops.as_slice() {
                [hop] => Statement::SetNextHop(NextHopExpr::Ip(*hop)),
                _ => {
                    debug!("Ignoring '{set}' in {usage}: only used for policy-based routing");
                    return None;
                }
            },
            RouteMapSet::IpNextHopUnchanged => Statement::SetNextHop(NextHopExpr::Unchanged),
            RouteMapSet::LocalPreference(pref) => Statement::SetLocalPreference(*pref),
            RouteMapSet::Metric(metric) => Statement::SetMetric(*metric),
            RouteMapSet::MetricType(metric_type) => match metric_type {
                MetricType::External => Statement::SetIsisMetricType(IsisMetricType::External),
                MetricType::Internal => Statement::SetIsisMetricType(IsisMetricType::Internal),
                MetricType::Type1 => Statement::SetOspfMetricType(OspfMetricType::E1),
                MetricType::Type2 => Statement::SetOspfMetricType(OspfMetricType::E2),
            },
            RouteMapSet::Origin(origin) => Statement::SetOrigin(origin_type(*origin)),
            RouteMapSet::Tag(tag) => Statement::SetTag(*tag),
            RouteMapSet::Weight(weight) => Statement::SetWeight(*weight),
        };
        Some(statement)
    }

    /// Build the statement for a route-map entry. `next_boundary` is the sequence
    /// of the entry that follows, if that entry starts a new fragment.
    fn compile_entry(
        &mut self,
        rmap: &RouteMap,
        entry: &RouteMapEntry,
        next_boundary: Option<u32>,
        valid_targets: &BTreeSet<u32>,
    ) -> Statement {
        let usage = format!("route-map {} entry {}", rmap.name, entry.sequence);
        let matches: Vec<BooleanExpr> = entry
            .matches
            .iter()
            .map(|m| self.compile_match(m, &usage))
            .collect();
        let mut then: Vec<Statement> = entry
            .sets
            .iter()
            .filter_map(|s| self.compile_set(s, &usage))
            .collect();

        let permit = entry.action == LineAction::Permit;
        match entry.continue_target {
            None => then.push(if permit {
                Statement::ReturnTrue
            } else {
                Statement::ReturnFalse
            }),
            Some(target) => {
                then.push(Statement::SetLocalDefaultAction(if permit {
                    DefaultAction::Accept
                } else {
                    DefaultAction::Reject
                }));
                if valid_targets.contains(&target) {
                    then.push(Statement::call(&rmap.fragment_policy(target)));
                } else {
                    self.warnings.undefined_reference(
                        "route-map entry",
                        &format!("{} {target}", rmap.name),
                        &format!("continue in {usage}"),
                    );
                    then.push(Statement::ReturnFalse);
                }
            }
        }
        if self.settings.trace_route_map_entries {
            then = vec![Statement::Traceable {
                trace: format!("Matched {usage} ({})", self.settings.filename),
                statements: then,
            }];
        }
        let otherwise = next_boundary
            .map(|seq| vec![Statement::call(&rmap.fragment_policy(seq))])
            .unwrap_or_default();

        Statement::if_then_else(BooleanExpr::all(matches), then, otherwise)
    }

    fn check_continues(rmap: &RouteMap) -> Result<(), ConvertError> {
        for entry in rmap.entries() {
            if let Some(target) = entry.continue_target
                && target <= entry.sequence
            {
                error!(
                    "Route-map {} entry {} continues backwards to {target}",
                    rmap.name, entry.sequence
                );
                return Err(ConvertError::BackwardContinue(
                    rmap.name.clone(),
                    entry.sequence,
                    target,
                ));
            }
        }
        Ok(())
    }

    /// Compile a route-map. The first policy returned is the one named after
    /// the route-map, the others are its fragments by ascending sequence.
    pub fn compile(&mut self, rmap: &RouteMap) -> Result<Vec<RoutingPolicy>, ConvertError> {
        let sequences: Vec<u32> = rmap.entries.keys().copied().collect();
        let Some(&first) = sequences.first() else {
            debug!("Route-map {} is empty: it denies everything", rmap.name);
            return Ok(vec![RoutingPolicy::deny_all(&rmap.name)]);
        };
        Self::check_continues(rmap)?;

        let valid_targets: BTreeSet<u32> = rmap.valid_continue_targets().into_iter().collect();
        let is_boundary = |seq: u32| seq == first || valid_targets.contains(&seq);

        let mut fragments = vec![];
        let mut fragment_start = first;
        let mut statements = vec![Statement::SetLocalDefaultAction(DefaultAction::Reject)];
        for (index, entry) in rmap.entries().enumerate() {
            if entry.sequence != first && is_boundary(entry.sequence) {
                statements.push(Statement::ReturnLocalDefaultAction);
                fragments.push(RoutingPolicy::with_statements(
                    &rmap.fragment_policy(fragment_start),
                    std::mem::take(&mut statements),
                ));
                fragment_start = entry.sequence;
            }
            let next_boundary = sequences
                .get(index + 1)
                .copied()
                .filter(|seq| is_boundary(*seq));
            statements.push(self.compile_entry(rmap, entry, next_boundary, &valid_targets));
        }
        statements.push(Statement::ReturnLocalDefaultAction);
        fragments.push(RoutingPolicy::with_statements(
            &rmap.fragment_policy(fragment_start),
            statements,
        ));

        let top = RoutingPolicy::with_statements(
            &rmap.name,
            vec![Statement::call_in_context(&rmap.fragment_policy(first))],
        );
        debug!(
            "Compiled route-map {} into {} fragment(s)",
            rmap.name,
            fragments.len()
        );
        let mut policies = vec![top];
        policies.extend(fragments);
        Ok(policies)
    }
}
