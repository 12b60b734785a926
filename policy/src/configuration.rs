// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The vendor-neutral configuration of a device

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error};

use crate::bgp::BgpProcess;
use crate::errors::{PolicyError, PolicyResult};
use crate::filters::{AsPathMatch, CommunityMatch, RouteFilterList};
use crate::packet_policy::{PacketMatch, PacketPolicy, PacketStatement};
use crate::routing_policy::RoutingPolicy;
use crate::statement::{BooleanExpr, CommunitySetExpr, Statement};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub hostname: String,
    pub routing_policies: BTreeMap<String, RoutingPolicy>,
    pub packet_policies: BTreeMap<String, PacketPolicy>,
    pub route_filter_lists: BTreeMap<String, RouteFilterList>,
    pub community_matches: BTreeMap<String, CommunityMatch>,
    pub as_path_matches: BTreeMap<String, AsPathMatch>,
    /// ACL names that packet policies may refer to
    pub ip_access_lists: BTreeSet<String>,
    /// Packet policy applied to traffic received on an interface
    pub interface_packet_policies: BTreeMap<String, String>,
    pub bgp: Option<BgpProcess>,
}

macro_rules! add_unique {
    ($map:expr, $kind:literal, $obj:expr) => {{
        let obj = $obj;
        if $map.contains_key(&obj.name) {
            error!("Can't add {} '{}': already exists", $kind, obj.name);
            return Err(PolicyError::DuplicateObject($kind, obj.name));
        }
        $map.insert(obj.name.clone(), obj);
        Ok(())
    }};
}

impl Configuration {
    #[must_use]
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            ..Default::default()
        }
    }

    //////////////////////////////////////////////////////////////////
    /// Add a routing policy. Names are unique.
    //////////////////////////////////////////////////////////////////
    pub fn add_routing_policy(&mut self, policy: RoutingPolicy) -> PolicyResult {
        add_unique!(self.routing_policies, "routing policy", policy)
    }
    pub fn add_packet_policy(&mut self, policy: PacketPolicy) -> PolicyResult {
        add_unique!(self.packet_policies, "packet policy", policy)
    }
    pub fn add_route_filter_list(&mut self, list: RouteFilterList) -> PolicyResult {
        add_unique!(self.route_filter_lists, "route filter list", list)
    }
    pub fn add_community_match(&mut self, cmatch: CommunityMatch) -> PolicyResult {
        add_unique!(self.community_matches, "community match", cmatch)
    }
    pub fn add_as_path_match(&mut self, amatch: AsPathMatch) -> PolicyResult {
        add_unique!(self.as_path_matches, "as-path match", amatch)
    }

    #[must_use]
    pub fn get_routing_policy(&self, name: &str) -> Option<&RoutingPolicy> {
        self.routing_policies.get(name)
    }
    #[must_use]
    pub fn get_packet_policy(&self, name: &str) -> Option<&PacketPolicy> {
        self.packet_policies.get(name)
    }
    #[must_use]
    pub fn has_routing_policy(&self, name: &str) -> bool {
        self.routing_policies.contains_key(name)
    }

    //////////////////////////////////////////////////////////////////
    /// Check that every name referred to by a policy is defined
    //////////////////////////////////////////////////////////////////
    pub fn validate(&self) -> PolicyResult {
        debug!("Validating configuration of '{}'...", self.hostname);
        for policy in self.routing_policies.values() {
            for called in policy.called_policies() {
                if !self.has_routing_policy(called) {
                    error!("Policy '{}' calls undefined '{called}'", policy.name);
                    return Err(PolicyError::UndefinedPolicy(
                        policy.name.clone(),
                        called.to_owned(),
                    ));
                }
            }
            for stmt in &policy.statements {
                self.check_statement_refs(&policy.name, stmt)?;
            }
        }
        for policy in self.packet_policies.values() {
            self.check_packet_refs(&policy.name, &policy.statements)?;
        }
        for (iface, policy) in &self.interface_packet_policies {
            if !self.packet_policies.contains_key(policy) {
                error!("Interface {iface} uses undefined packet policy '{policy}'");
                return Err(PolicyError::UndefinedPacketPolicy(
                    iface.clone(),
                    policy.clone(),
                ));
            }
        }
        if let Some(bgp) = &self.bgp {
            for peer in bgp.peers() {
                for af in peer.address_families.values() {
                    for name in [&af.import_policy, &af.export_policy].into_iter().flatten() {
                        if !self.has_routing_policy(name) {
                            error!("Bgp peer {} uses undefined policy '{name}'", peer.peer);
                            return Err(PolicyError::UndefinedPolicy(
                                peer.peer.to_string(),
                                name.clone(),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_expr_refs(&self, policy: &str, expr: &BooleanExpr) -> PolicyResult {
        let missing = |kind: &'static str, name: &str| {
            error!("Policy '{policy}' refers to undefined {kind} '{name}'");
            Err(PolicyError::UndefinedReference(
                policy.to_owned(),
                kind,
                name.to_owned(),
            ))
        };
        match expr {
            BooleanExpr::MatchPrefixSet(name) if !self.route_filter_lists.contains_key(name) => {
                missing("route filter list", name)
            }
            BooleanExpr::MatchCommunities(name) if !self.community_matches.contains_key(name) => {
                missing("community match", name)
            }
            BooleanExpr::MatchAsPath(name) if !self.as_path_matches.contains_key(name) => {
                missing("as-path match", name)
            }
            BooleanExpr::Conjunction(exprs) | BooleanExpr::Disjunction(exprs) => exprs
                .iter()
                .try_for_each(|e| self.check_expr_refs(policy, e)),
            BooleanExpr::Not(e) => self.check_expr_refs(policy, e),
            _ => Ok(()),
        }
    }

    fn check_statement_refs(&self, policy: &str, stmt: &Statement) -> PolicyResult {
        match stmt {
            Statement::If {
                guard,
                then,
                otherwise,
            } => {
                self.check_expr_refs(policy, guard)?;
                then.iter()
                    .chain(otherwise.iter())
                    .try_for_each(|s| self.check_statement_refs(policy, s))
            }
            Statement::Traceable { statements, .. } => statements
                .iter()
                .try_for_each(|s| self.check_statement_refs(policy, s)),
            Statement::SetCommunities(CommunitySetExpr::DeleteMatching(name))
                if !self.community_matches.contains_key(name) =>
            {
                error!("Policy '{policy}' deletes with undefined community match '{name}'");
                Err(PolicyError::UndefinedReference(
                    policy.to_owned(),
                    "community match",
                    name.clone(),
                ))
            }
            _ => Ok(()),
        }
    }

    fn check_packet_refs(&self, policy: &str, stmts: &[PacketStatement]) -> PolicyResult {
        for stmt in stmts {
            let PacketStatement::If { guard, then } = stmt else {
                continue;
            };
            let undefined = match guard {
                PacketMatch::PermittedByAcl(acl) if !self.ip_access_lists.contains(acl) => Some(acl),
                _ => None,
            };
            if let Some(acl) = undefined {
                error!("Packet policy '{policy}' refers to undefined acl '{acl}'");
                return Err(PolicyError::UndefinedReference(
                    policy.to_owned(),
                    "access list",
                    acl.clone(),
                ));
            }
            self.check_packet_refs(policy, then)?;
        }
        Ok(())
    }
}
