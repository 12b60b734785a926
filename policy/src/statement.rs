// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Statements and boolean expressions of vendor-neutral routing policies

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use crate::community::StandardCommunity;

/// The local default-action register of a policy evaluation. A single register
/// exists per top-level evaluation. It is shared by all the policies called in
/// that evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultAction {
    #[default]
    Unset,
    Accept,
    Reject,
}

impl DefaultAction {
    /// The decision carried by the register. An unset register rejects.
    #[must_use]
    pub fn accepts(self) -> bool {
        matches!(self, DefaultAction::Accept)
    }
}

/// Protocols a route may have been learnt from
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Bgp,
    Ibgp,
    Connected,
    Eigrp,
    EigrpEx,
    IsisL1,
    IsisL2,
    IsisEl1,
    IsisEl2,
    Local,
    Ospf,
    OspfIa,
    OspfE1,
    OspfE2,
    Rip,
    Static,
    /// Generated locally, e.g. by default-originate
    Aggregate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginType {
    Egp,
    Igp,
    Incomplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OspfMetricType {
    E1,
    E2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsisMetricType {
    External,
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextHopExpr {
    Ip(Ipv4Addr),
    /// The local address of the BGP session the route is sent over
    SelfAddress,
    Unchanged,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsPathPrepend {
    /// Prepend the most recent AS of the path (or the local AS if the path is empty) n times
    LastAs(u8),
    Literal(Vec<u32>),
}

/// How to compute the communities of the output route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunitySetExpr {
    /// Drop all standard communities and set these
    Replace(BTreeSet<StandardCommunity>),
    /// Add these communities to the existing ones
    Add(BTreeSet<StandardCommunity>),
    /// Remove the communities matched by a named community match
    DeleteMatching(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanExpr {
    True,
    False,
    /// True if the policy being evaluated was invoked through a `Call`
    CallExprContext,
    /// Invoke a policy and use its boolean result
    Call(String),
    Conjunction(Vec<BooleanExpr>),
    Disjunction(Vec<BooleanExpr>),
    Not(Box<BooleanExpr>),
    MatchPrefixSet(String),
    MatchCommunities(String),
    MatchAsPath(String),
    MatchMetric(u32),
    MatchTag(u32),
    MatchProtocol(BTreeSet<Protocol>),
    MatchInterface(BTreeSet<String>),
    /// True for 0.0.0.0/0
    MatchDefaultRoute,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    If {
        guard: BooleanExpr,
        then: Vec<Statement>,
        otherwise: Vec<Statement>,
    },
    /// A group of statements annotated with a description of where they come from
    Traceable {
        trace: String,
        statements: Vec<Statement>,
    },

    /* returns from the current policy */
    ReturnTrue,
    ReturnFalse,
    ReturnLocalDefaultAction,

    /* the local default-action register */
    SetLocalDefaultAction(DefaultAction),

    /* terminate the whole evaluation */
    ExitAccept,
    ExitReject,

    /* route attribute updates */
    SetLocalPreference(u32),
    SetMetric(u32),
    SetTag(u32),
    SetWeight(u32),
    SetOrigin(OriginType),
    SetNextHop(NextHopExpr),
    PrependAsPath(AsPathPrepend),
    SetCommunities(CommunitySetExpr),
    SetOspfMetricType(OspfMetricType),
    SetIsisMetricType(IsisMetricType),
    /// Strip the private AS numbers from the AS path
    RemovePrivateAs,
}

impl BooleanExpr {
    /// Build a conjunction, collapsing the trivial cases
    #[must_use]
    pub fn all(mut exprs: Vec<BooleanExpr>) -> BooleanExpr {
        match exprs.len() {
            0 => BooleanExpr::True,
            1 => exprs.remove(0),
            _ => BooleanExpr::Conjunction(exprs),
        }
    }
    /// Build a disjunction, collapsing the trivial cases
    #[must_use]
    pub fn any(mut exprs: Vec<BooleanExpr>) -> BooleanExpr {
        match exprs.len() {
            0 => BooleanExpr::False,
            1 => exprs.remove(0),
            _ => BooleanExpr::Disjunction(exprs),
        }
    }
}

impl Statement {
    #[must_use]
    pub fn if_then(guard: BooleanExpr, then: Vec<Statement>) -> Self {
        Statement::If {
            guard,
            then,
            otherwise: vec![],
        }
    }
    #[must_use]
    pub fn if_then_else(guard: BooleanExpr, then: Vec<Statement>, otherwise: Vec<Statement>) -> Self {
        Statement::If {
            guard,
            then,
            otherwise,
        }
    }
    /// Call a policy and return its result as the result of the current policy
    #[must_use]
    pub fn call(policy: &str) -> Self {
        Statement::if_then_else(
            BooleanExpr::Call(policy.to_owned()),
            vec![Statement::ReturnTrue],
            vec![Statement::ReturnFalse],
        )
    }
    /// Accept in a way that suits the calling context: return true if the
    /// current policy has been called from another, else accept the route.
    #[must_use]
    pub fn permit_in_context() -> Self {
        Statement::if_then_else(
            BooleanExpr::CallExprContext,
            vec![Statement::ReturnTrue],
            vec![Statement::ExitAccept],
        )
    }
    /// Reject in a way that suits the calling context
    #[must_use]
    pub fn deny_in_context() -> Self {
        Statement::if_then_else(
            BooleanExpr::CallExprContext,
            vec![Statement::ReturnFalse],
            vec![Statement::ExitReject],
        )
    }
    /// Call a policy and permit or deny in context depending on its result
    #[must_use]
    pub fn call_in_context(policy: &str) -> Self {
        Statement::if_then_else(
            BooleanExpr::Call(policy.to_owned()),
            vec![Statement::permit_in_context()],
            vec![Statement::deny_in_context()],
        )
    }
    /// Names of the policies this statement calls, directly or in nested statements
    pub fn called_policies<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Statement::If {
                guard,
                then,
                otherwise,
            } => {
                guard.called_policies(out);
                then.iter().for_each(|s| s.called_policies(out));
                otherwise.iter().for_each(|s| s.called_policies(out));
            }
            Statement::Traceable { statements, .. } => {
                statements.iter().for_each(|s| s.called_policies(out));
            }
            _ => {}
        }
    }
}

impl BooleanExpr {
    pub fn called_policies<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            BooleanExpr::Call(name) => out.push(name),
            BooleanExpr::Conjunction(exprs) | BooleanExpr::Disjunction(exprs) => {
                exprs.iter().for_each(|e| e.called_policies(out));
            }
            BooleanExpr::Not(expr) => expr.called_policies(out),
            _ => {}
        }
    }
}
