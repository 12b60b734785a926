// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A reference evaluator of vendor-neutral policies. It runs a routing policy
//! on a route, or a packet policy on a packet, and reports the decision.
//! Matches are evaluated on the input route; attribute updates go to the
//! output route.

use ipnet::IpNet;
use regex::Regex;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::{debug, error, trace};

use crate::community::StandardCommunity;
use crate::configuration::Configuration;
use crate::filters::FilterAction;
use crate::packet_policy::{PacketAction, PacketMatch, PacketStatement};
use crate::statement::{
    AsPathPrepend, BooleanExpr, CommunitySetExpr, DefaultAction, IsisMetricType, NextHopExpr,
    OriginType, OspfMetricType, Protocol, Statement,
};

/// Max depth of nested policy calls
pub const MAX_CALL_DEPTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("Policy '{0}' is not defined")]
    UndefinedPolicy(String),
    #[error("Undefined {0} '{1}'")]
    UndefinedReference(&'static str, String),
    #[error("Policy calls nested too deep (more than {MAX_CALL_DEPTH})")]
    CallDepthExceeded,
    #[error("Invalid as-path regex '{0}'")]
    BadRegex(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub network: IpNet,
    pub protocol: Protocol,
    pub metric: u32,
    pub tag: u32,
    pub local_preference: u32,
    pub weight: u32,
    pub origin: OriginType,
    pub next_hop: Option<Ipv4Addr>,
    /// The next-hop is the local address of the session the route is sent over
    pub next_hop_self: bool,
    /// Most recent AS first
    pub as_path: Vec<u32>,
    pub communities: BTreeSet<StandardCommunity>,
    pub interface: Option<String>,
    pub ospf_metric_type: Option<OspfMetricType>,
    pub isis_metric_type: Option<IsisMetricType>,
}

impl Route {
    #[must_use]
    pub fn new(network: IpNet, protocol: Protocol) -> Self {
        Self {
            network,
            protocol,
            metric: 0,
            tag: 0,
            local_preference: 100,
            weight: 0,
            origin: OriginType::Igp,
            next_hop: None,
            next_hop_self: false,
            as_path: vec![],
            communities: BTreeSet::new(),
            interface: None,
            ospf_metric_type: None,
            isis_metric_type: None,
        }
    }
    #[must_use]
    pub fn set_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }
    #[must_use]
    pub fn set_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }
    #[must_use]
    pub fn set_as_path(mut self, as_path: Vec<u32>) -> Self {
        self.as_path = as_path;
        self
    }
    #[must_use]
    pub fn add_community(mut self, community: StandardCommunity) -> Self {
        self.communities.insert(community);
        self
    }
    #[must_use]
    pub fn set_interface(mut self, interface: &str) -> Self {
        self.interface = Some(interface.to_owned());
        self
    }
}

/// The result of evaluating a routing policy on a route
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub accepted: bool,
    pub route: Route,
}

/// A packet, as seen by packet policies: the set of ACLs that permit it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Packet {
    pub permitted_by: BTreeSet<String>,
}

impl Packet {
    #[must_use]
    pub fn new(acls: &[&str]) -> Self {
        Self {
            permitted_by: acls.iter().map(|a| (*a).to_owned()).collect(),
        }
    }
}

/// What the execution of a statement asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Return(bool),
    Exit(bool),
}

/// The value of a boolean expression. Evaluating a call may terminate
/// the whole evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Truth {
    Value(bool),
    Exit(bool),
}

struct Environment<'a> {
    config: &'a Configuration,
    input: &'a Route,
    output: Route,
    local_as: u32,
    call_context: bool,
    default_action: DefaultAction,
    depth: usize,
}

/// Private AS numbers, 2-byte and 4-byte
fn is_private_as(asn: u32) -> bool {
    (64512..=65534).contains(&asn) || (4_200_000_000..=4_294_967_294).contains(&asn)
}

/// Translate a Cisco as-path regex to a regular one
fn translate_as_path_regex(regex: &str) -> Result<Regex, EvalError> {
    let translated = regex.replace('_', "(^|$|[ ,{}()])");
    Regex::new(&translated).map_err(|_| EvalError::BadRegex(regex.to_owned()))
}

impl Environment<'_> {
    fn as_path_permits(&self, name: &str) -> Result<bool, EvalError> {
        let amatch = self
            .config
            .as_path_matches
            .get(name)
            .ok_or_else(|| EvalError::UndefinedReference("as-path match", name.to_owned()))?;
        let path: Vec<String> = self.input.as_path.iter().map(ToString::to_string).collect();
        let path = path.join(" ");
        for line in &amatch.lines {
            if translate_as_path_regex(&line.regex)?.is_match(&path) {
                return Ok(line.action == FilterAction::Permit);
            }
        }
        Ok(false)
    }

    fn call(&mut self, policy: &str) -> Result<Truth, EvalError> {
        if self.depth >= MAX_CALL_DEPTH {
            error!("Max call depth exceeded calling policy {policy}");
            return Err(EvalError::CallDepthExceeded);
        }
        let config = self.config;
        let callee = config
            .get_routing_policy(policy)
            .ok_or_else(|| EvalError::UndefinedPolicy(policy.to_owned()))?;
        trace!("Calling policy {policy}");
        let saved_context = self.call_context;
        self.call_context = true;
        self.depth += 1;
        let flow = self.exec_all(&callee.statements);
        self.depth -= 1;
        self.call_context = saved_context;
        Ok(match flow? {
            Flow::Continue => Truth::Value(false),
            Flow::Return(value) => Truth::Value(value),
            Flow::Exit(value) => Truth::Exit(value),
        })
    }

    fn eval(&mut self, expr: &BooleanExpr) -> Result<Truth, EvalError> {
        let value = match expr {
            BooleanExpr::True => true,
            BooleanExpr::False => false,
            BooleanExpr::CallExprContext => self.call_context,
            BooleanExpr::Call(policy) => return self.call(policy),
            BooleanExpr::Conjunction(exprs) => {
                for e in exprs {
                    match self.eval(e)? {
                        Truth::Value(true) => {}
                        other => return Ok(other),
                    }
                }
                true
            }
            BooleanExpr::Disjunction(exprs) => {
                for e in exprs {
                    match self.eval(e)? {
                        Truth::Value(false) => {}
                        other => return Ok(other),
                    }
                }
                false
            }
            BooleanExpr::Not(e) => match self.eval(e)? {
                Truth::Value(value) => !value,
                exit @ Truth::Exit(_) => return Ok(exit),
            },
            BooleanExpr::MatchPrefixSet(name) => self
                .config
                .route_filter_lists
                .get(name)
                .ok_or_else(|| EvalError::UndefinedReference("route filter list", name.clone()))?
                .permits(&self.input.network),
            BooleanExpr::MatchCommunities(name) => self
                .config
                .community_matches
                .get(name)
                .ok_or_else(|| EvalError::UndefinedReference("community match", name.clone()))?
                .permits(&self.input.communities),
            BooleanExpr::MatchAsPath(name) => self.as_path_permits(name)?,
            BooleanExpr::MatchMetric(metric) => self.input.metric == *metric,
            BooleanExpr::MatchTag(tag) => self.input.tag == *tag,
            BooleanExpr::MatchProtocol(protocols) => protocols.contains(&self.input.protocol),
            BooleanExpr::MatchInterface(ifaces) => self
                .input
                .interface
                .as_ref()
                .is_some_and(|iface| ifaces.contains(iface)),
            BooleanExpr::MatchDefaultRoute => self.input.network.prefix_len() == 0,
        };
        Ok(Truth::Value(value))
    }

    fn set_communities(&mut self, expr: &CommunitySetExpr) -> Result<(), EvalError> {
        match expr {
            CommunitySetExpr::Replace(communities) => self.output.communities.clone_from(communities),
            CommunitySetExpr::Add(communities) => {
                self.output.communities.extend(communities.iter().copied());
            }
            CommunitySetExpr::DeleteMatching(name) => {
                let cmatch = self.config.community_matches.get(name).ok_or_else(|| {
                    EvalError::UndefinedReference("community match", name.clone())
                })?;
                self.output
                    .communities
                    .retain(|c| !cmatch.permits(&BTreeSet::from([*c])));
            }
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Statement) -> Result<Flow, EvalError> {
        match stmt {
            Statement::If {
                guard,
                then,
                otherwise,
            } => match self.eval(guard)? {
                Truth::Value(true) => self.exec_all(then),
                Truth::Value(false) => self.exec_all(otherwise),
                Truth::Exit(value) => Ok(Flow::Exit(value)),
            },
            Statement::Traceable { trace, statements } => {
                trace!("{trace}");
                self.exec_all(statements)
            }
            Statement::ReturnTrue => Ok(Flow::Return(true)),
            Statement::ReturnFalse => Ok(Flow::Return(false)),
            Statement::ReturnLocalDefaultAction => {
                Ok(Flow::Return(self.default_action.accepts()))
            }
            Statement::SetLocalDefaultAction(action) => {
                self.default_action = *action;
                Ok(Flow::Continue)
            }
            Statement::ExitAccept => Ok(Flow::Exit(true)),
            Statement::ExitReject => Ok(Flow::Exit(false)),
            Statement::SetLocalPreference(v) => {
                self.output.local_preference = *v;
                Ok(Flow::Continue)
            }
            Statement::SetMetric(v) => {
                self.output.metric = *v;
                Ok(Flow::Continue)
            }
            Statement::SetTag(v) => {
                self.output.tag = *v;
                Ok(Flow::Continue)
            }
            Statement::SetWeight(v) => {
                self.output.weight = *v;
                Ok(Flow::Continue)
            }
            Statement::SetOrigin(origin) => {
                self.output.origin = *origin;
                Ok(Flow::Continue)
            }
            Statement::SetNextHop(NextHopExpr::Ip(ip)) => {
                self.output.next_hop = Some(*ip);
                self.output.next_hop_self = false;
                Ok(Flow::Continue)
            }
            Statement::SetNextHop(NextHopExpr::SelfAddress) => {
                self.output.next_hop = None;
                self.output.next_hop_self = true;
                Ok(Flow::Continue)
            }
            Statement::SetNextHop(NextHopExpr::Unchanged) => Ok(Flow::Continue),
            Statement::PrependAsPath(prepend) => {
                let prefix = match prepend {
                    AsPathPrepend::LastAs(n) => {
                        let last = self.output.as_path.first().copied().unwrap_or(self.local_as);
                        vec![last; usize::from(*n)]
                    }
                    AsPathPrepend::Literal(asns) => asns.clone(),
                };
                self.output.as_path.splice(0..0, prefix);
                Ok(Flow::Continue)
            }
            Statement::SetCommunities(expr) => {
                self.set_communities(expr)?;
                Ok(Flow::Continue)
            }
            Statement::SetOspfMetricType(t) => {
                self.output.ospf_metric_type = Some(*t);
                Ok(Flow::Continue)
            }
            Statement::SetIsisMetricType(t) => {
                self.output.isis_metric_type = Some(*t);
                Ok(Flow::Continue)
            }
            Statement::RemovePrivateAs => {
                self.output.as_path.retain(|asn| !is_private_as(*asn));
                Ok(Flow::Continue)
            }
        }
    }

    fn exec_all(&mut self, stmts: &[Statement]) -> Result<Flow, EvalError> {
        for stmt in stmts {
            let flow = self.exec(stmt)?;
            if flow != Flow::Continue {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Evaluate a routing policy on a route. Falling off the end of the policy
/// rejects the route. The default-action register starts unset.
pub fn evaluate(
    config: &Configuration,
    policy: &str,
    route: &Route,
    local_as: u32,
) -> Result<Outcome, EvalError> {
    let top = config
        .get_routing_policy(policy)
        .ok_or_else(|| EvalError::UndefinedPolicy(policy.to_owned()))?;
    let mut env = Environment {
        config,
        input: route,
        output: route.clone(),
        local_as,
        call_context: false,
        default_action: DefaultAction::Unset,
        depth: 0,
    };
    let accepted = match env.exec_all(&top.statements)? {
        Flow::Continue => false,
        Flow::Return(value) | Flow::Exit(value) => value,
    };
    debug!(
        "Policy {policy} {} route to {}",
        if accepted { "accepts" } else { "rejects" },
        route.network
    );
    Ok(Outcome {
        accepted,
        route: env.output,
    })
}

fn exec_packet(stmts: &[PacketStatement], packet: &Packet) -> Option<PacketAction> {
    for stmt in stmts {
        match stmt {
            PacketStatement::Return(action) => return Some(action.clone()),
            PacketStatement::If { guard, then } => {
                let taken = match guard {
                    PacketMatch::True => true,
                    PacketMatch::False => false,
                    PacketMatch::PermittedByAcl(acl) => packet.permitted_by.contains(acl),
                };
                if taken && let Some(action) = exec_packet(then, packet) {
                    return Some(action);
                }
            }
        }
    }
    None
}

/// Evaluate a packet policy on a packet
pub fn evaluate_packet(
    config: &Configuration,
    policy: &str,
    packet: &Packet,
) -> Result<PacketAction, EvalError> {
    let policy = config
        .get_packet_policy(policy)
        .ok_or_else(|| EvalError::UndefinedPolicy(policy.to_owned()))?;
    Ok(exec_packet(&policy.statements, packet).unwrap_or_else(|| policy.default_action.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{AsPathMatch, CommunityMatch, RouteFilterLine, RouteFilterList};
    use crate::packet_policy::PacketPolicy;
    use crate::routing_policy::RoutingPolicy;
    use tracing_test::traced_test;

    fn route(prefix: &str) -> Route {
        Route::new(prefix.parse().unwrap(), Protocol::Bgp)
    }

    #[test]
    fn test_fall_off_rejects() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![Statement::SetMetric(5)],
            ))
            .unwrap();
        let outcome = evaluate(&config, "P", &route("10.0.0.0/24"), 65000).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.route.metric, 5);
    }

    #[test]
    fn test_called_vs_top_level() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "PERMIT",
                vec![Statement::permit_in_context()],
            ))
            .unwrap();
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "TOP",
                vec![
                    Statement::if_then(
                        BooleanExpr::Call("PERMIT".to_string()),
                        vec![Statement::SetTag(7)],
                    ),
                    Statement::ExitReject,
                ],
            ))
            .unwrap();
        // called, the policy returns true and evaluation goes on
        let outcome = evaluate(&config, "TOP", &route("10.0.0.0/24"), 65000).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.route.tag, 7);
        // at top level, it accepts
        let outcome = evaluate(&config, "PERMIT", &route("10.0.0.0/24"), 65000).unwrap();
        assert!(outcome.accepted);
    }

    #[test]
    fn test_exit_propagates_through_calls() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "EXIT",
                vec![Statement::ExitAccept],
            ))
            .unwrap();
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "TOP",
                vec![
                    Statement::if_then(
                        BooleanExpr::Not(Box::new(BooleanExpr::Call("EXIT".to_string()))),
                        vec![Statement::SetTag(1)],
                    ),
                    Statement::ExitReject,
                ],
            ))
            .unwrap();
        let outcome = evaluate(&config, "TOP", &route("10.0.0.0/24"), 65000).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.route.tag, 0);
    }

    #[test]
    fn test_register_shared_across_calls() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "SETTER",
                vec![
                    Statement::SetLocalDefaultAction(DefaultAction::Accept),
                    Statement::ReturnFalse,
                ],
            ))
            .unwrap();
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "TOP",
                vec![
                    Statement::SetLocalDefaultAction(DefaultAction::Reject),
                    Statement::if_then(BooleanExpr::Call("SETTER".to_string()), vec![]),
                    Statement::ReturnLocalDefaultAction,
                ],
            ))
            .unwrap();
        let outcome = evaluate(&config, "TOP", &route("10.0.0.0/24"), 65000).unwrap();
        assert!(outcome.accepted);
    }

    #[test]
    fn test_unset_register_rejects() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![Statement::ReturnLocalDefaultAction],
            ))
            .unwrap();
        assert!(!evaluate(&config, "P", &route("10.0.0.0/24"), 1).unwrap().accepted);
    }

    #[test]
    fn test_matches_read_input_route() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![
                    Statement::SetTag(9),
                    Statement::if_then_else(
                        BooleanExpr::MatchTag(9),
                        vec![Statement::ExitAccept],
                        vec![Statement::ExitReject],
                    ),
                ],
            ))
            .unwrap();
        let outcome = evaluate(&config, "P", &route("10.0.0.0/24").set_tag(1), 1).unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.route.tag, 9);
    }

    #[test]
    #[traced_test]
    fn test_recursion_limit() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "LOOP",
                vec![Statement::call("LOOP")],
            ))
            .unwrap();
        assert_eq!(
            evaluate(&config, "LOOP", &route("10.0.0.0/24"), 1),
            Err(EvalError::CallDepthExceeded)
        );
        assert!(logs_contain("Max call depth exceeded calling policy LOOP"));
    }

    #[test]
    fn test_prefix_set_and_communities() {
        let mut config = Configuration::new("r");
        let mut rfl = RouteFilterList::new("PL");
        rfl.add_line(RouteFilterLine::new(
            FilterAction::Permit,
            "10.0.0.0/8".parse().unwrap(),
            8,
            32,
        ));
        config.add_route_filter_list(rfl).unwrap();
        let mut cm = CommunityMatch::new("CL");
        cm.add_line(FilterAction::Permit, BTreeSet::from([StandardCommunity::new(1, 1)]));
        config.add_community_match(cm).unwrap();
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![
                    Statement::SetCommunities(CommunitySetExpr::DeleteMatching("CL".to_string())),
                    Statement::SetCommunities(CommunitySetExpr::Add(BTreeSet::from([
                        StandardCommunity::NO_EXPORT,
                    ]))),
                    Statement::if_then(
                        BooleanExpr::MatchPrefixSet("PL".to_string()),
                        vec![Statement::ExitAccept],
                    ),
                    Statement::ExitReject,
                ],
            ))
            .unwrap();
        let input = route("10.1.0.0/16")
            .add_community(StandardCommunity::new(1, 1))
            .add_community(StandardCommunity::new(2, 2));
        let outcome = evaluate(&config, "P", &input, 1).unwrap();
        assert!(outcome.accepted);
        assert_eq!(
            outcome.route.communities,
            BTreeSet::from([StandardCommunity::new(2, 2), StandardCommunity::NO_EXPORT])
        );
        assert!(!evaluate(&config, "P", &route("192.168.0.0/16"), 1).unwrap().accepted);
    }

    #[test]
    fn test_as_path_match() {
        let mut config = Configuration::new("r");
        let mut am = AsPathMatch::new("AP");
        am.add_line(FilterAction::Permit, "^65001_");
        config.add_as_path_match(am).unwrap();
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![
                    Statement::PrependAsPath(AsPathPrepend::LastAs(2)),
                    Statement::if_then(
                        BooleanExpr::MatchAsPath("AP".to_string()),
                        vec![Statement::ExitAccept],
                    ),
                ],
            ))
            .unwrap();
        let outcome =
            evaluate(&config, "P", &route("10.0.0.0/24").set_as_path(vec![65001, 65002]), 1).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.route.as_path, vec![65001, 65001, 65001, 65002]);
        let outcome =
            evaluate(&config, "P", &route("10.0.0.0/24").set_as_path(vec![650011]), 1).unwrap();
        assert!(!outcome.accepted);
    }

    #[test]
    fn test_packet_policy() {
        let mut config = Configuration::new("r");
        config
            .add_packet_policy(PacketPolicy::new(
                "PBR",
                vec![PacketStatement::If {
                    guard: PacketMatch::PermittedByAcl("ACL".to_string()),
                    then: vec![PacketStatement::Return(PacketAction::Drop)],
                }],
                PacketAction::FibLookup,
            ))
            .unwrap();
        assert_eq!(
            evaluate_packet(&config, "PBR", &Packet::new(&["ACL"])),
            Ok(PacketAction::Drop)
        );
        assert_eq!(
            evaluate_packet(&config, "PBR", &Packet::new(&[])),
            Ok(PacketAction::FibLookup)
        );
    }

    #[test]
    fn test_export_attributes() {
        let mut config = Configuration::new("r");
        config
            .add_routing_policy(RoutingPolicy::with_statements(
                "P",
                vec![
                    Statement::SetNextHop(NextHopExpr::SelfAddress),
                    Statement::RemovePrivateAs,
                    Statement::if_then_else(
                        BooleanExpr::MatchDefaultRoute,
                        vec![Statement::ReturnTrue],
                        vec![Statement::ReturnFalse],
                    ),
                ],
            ))
            .unwrap();
        let path = vec![64512, 65001, 4_200_000_001, 65534, 65535];
        let outcome = evaluate(&config, "P", &route("0.0.0.0/0").set_as_path(path), 1).unwrap();
        assert!(outcome.accepted);
        assert!(outcome.route.next_hop_self);
        assert_eq!(outcome.route.as_path, vec![65001, 65535]);
        assert!(!evaluate(&config, "P", &route("10.0.0.0/8"), 1).unwrap().accepted);
    }
}
