// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of vendor-neutral policies, mostly for logs and debugging

use std::fmt::{Display, Formatter};

use crate::community::StandardCommunity;
use crate::packet_policy::{PacketAction, PacketMatch, PacketPolicy, PacketStatement};
use crate::routing_policy::RoutingPolicy;
use crate::statement::{
    AsPathPrepend, BooleanExpr, CommunitySetExpr, DefaultAction, NextHopExpr, Statement,
};

const INDENT: usize = 2;

fn fmt_communities<'a>(
    f: &mut Formatter<'_>,
    communities: impl IntoIterator<Item = &'a StandardCommunity>,
) -> std::fmt::Result {
    let list: Vec<String> = communities.into_iter().map(ToString::to_string).collect();
    write!(f, "{{{}}}", list.join(", "))
}

fn fmt_list(f: &mut Formatter<'_>, sep: &str, exprs: &[BooleanExpr]) -> std::fmt::Result {
    write!(f, "(")?;
    for (n, expr) in exprs.iter().enumerate() {
        if n > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{expr}")?;
    }
    write!(f, ")")
}

impl Display for DefaultAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultAction::Unset => write!(f, "unset"),
            DefaultAction::Accept => write!(f, "accept"),
            DefaultAction::Reject => write!(f, "reject"),
        }
    }
}

impl Display for BooleanExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BooleanExpr::True => write!(f, "true"),
            BooleanExpr::False => write!(f, "false"),
            BooleanExpr::CallExprContext => write!(f, "called"),
            BooleanExpr::Call(policy) => write!(f, "call({policy})"),
            BooleanExpr::Conjunction(exprs) => fmt_list(f, "and", exprs),
            BooleanExpr::Disjunction(exprs) => fmt_list(f, "or", exprs),
            BooleanExpr::Not(expr) => write!(f, "not {expr}"),
            BooleanExpr::MatchPrefixSet(name) => write!(f, "prefix-set {name}"),
            BooleanExpr::MatchCommunities(name) => write!(f, "communities {name}"),
            BooleanExpr::MatchAsPath(name) => write!(f, "as-path {name}"),
            BooleanExpr::MatchMetric(metric) => write!(f, "metric == {metric}"),
            BooleanExpr::MatchTag(tag) => write!(f, "tag == {tag}"),
            BooleanExpr::MatchProtocol(protocols) => write!(f, "protocol in {protocols:?}"),
            BooleanExpr::MatchInterface(ifaces) => write!(f, "interface in {ifaces:?}"),
            BooleanExpr::MatchDefaultRoute => write!(f, "default-route"),
        }
    }
}

struct Indented<'a>(usize, &'a Statement);

impl Display for Indented<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Indented(depth, stmt) = *self;
        let pad = " ".repeat(depth * INDENT);
        match stmt {
            Statement::If {
                guard,
                then,
                otherwise,
            } => {
                writeln!(f, "{pad}if {guard}")?;
                for s in then {
                    write!(f, "{}", Indented(depth + 1, s))?;
                }
                if !otherwise.is_empty() {
                    writeln!(f, "{pad}else")?;
                    for s in otherwise {
                        write!(f, "{}", Indented(depth + 1, s))?;
                    }
                }
                Ok(())
            }
            Statement::Traceable { trace, statements } => {
                writeln!(f, "{pad}# {trace}")?;
                for s in statements {
                    write!(f, "{}", Indented(depth + 1, s))?;
                }
                Ok(())
            }
            Statement::ReturnTrue => writeln!(f, "{pad}return true"),
            Statement::ReturnFalse => writeln!(f, "{pad}return false"),
            Statement::ReturnLocalDefaultAction => writeln!(f, "{pad}return default-action"),
            Statement::SetLocalDefaultAction(action) => {
                writeln!(f, "{pad}default-action = {action}")
            }
            Statement::ExitAccept => writeln!(f, "{pad}accept"),
            Statement::ExitReject => writeln!(f, "{pad}reject"),
            Statement::SetLocalPreference(v) => writeln!(f, "{pad}set local-preference {v}"),
            Statement::SetMetric(v) => writeln!(f, "{pad}set metric {v}"),
            Statement::SetTag(v) => writeln!(f, "{pad}set tag {v}"),
            Statement::SetWeight(v) => writeln!(f, "{pad}set weight {v}"),
            Statement::SetOrigin(o) => writeln!(f, "{pad}set origin {o:?}"),
            Statement::SetNextHop(NextHopExpr::Ip(ip)) => writeln!(f, "{pad}set next-hop {ip}"),
            Statement::SetNextHop(NextHopExpr::SelfAddress) => {
                writeln!(f, "{pad}set next-hop self")
            }
            Statement::SetNextHop(NextHopExpr::Unchanged) => {
                writeln!(f, "{pad}set next-hop unchanged")
            }
            Statement::PrependAsPath(AsPathPrepend::LastAs(n)) => {
                writeln!(f, "{pad}prepend last-as {n}")
            }
            Statement::PrependAsPath(AsPathPrepend::Literal(asns)) => {
                writeln!(f, "{pad}prepend {asns:?}")
            }
            Statement::SetCommunities(expr) => {
                write!(f, "{pad}")?;
                match expr {
                    CommunitySetExpr::Replace(c) => {
                        write!(f, "set communities ")?;
                        fmt_communities(f, c)?;
                    }
                    CommunitySetExpr::Add(c) => {
                        write!(f, "add communities ")?;
                        fmt_communities(f, c)?;
                    }
                    CommunitySetExpr::DeleteMatching(name) => {
                        write!(f, "delete communities matching {name}")?;
                    }
                }
                writeln!(f)
            }
            Statement::SetOspfMetricType(t) => writeln!(f, "{pad}set ospf-metric-type {t:?}"),
            Statement::SetIsisMetricType(t) => writeln!(f, "{pad}set isis-metric-type {t:?}"),
            Statement::RemovePrivateAs => writeln!(f, "{pad}remove private-as"),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Indented(0, self))
    }
}

impl Display for RoutingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "policy {}:", self.name)?;
        for s in &self.statements {
            write!(f, "{}", Indented(1, s))?;
        }
        Ok(())
    }
}

impl Display for PacketAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketAction::FibLookup => write!(f, "fib-lookup"),
            PacketAction::FibLookupOverrideNextHop(hops) => {
                let hops: Vec<String> = hops.iter().map(ToString::to_string).collect();
                write!(f, "fib-lookup override {}", hops.join(" "))
            }
            PacketAction::Drop => write!(f, "drop"),
        }
    }
}

impl Display for PacketMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketMatch::True => write!(f, "true"),
            PacketMatch::False => write!(f, "false"),
            PacketMatch::PermittedByAcl(acl) => write!(f, "permitted-by {acl}"),
        }
    }
}

fn fmt_packet_statements(
    f: &mut Formatter<'_>,
    depth: usize,
    stmts: &[PacketStatement],
) -> std::fmt::Result {
    let pad = " ".repeat(depth * INDENT);
    for stmt in stmts {
        match stmt {
            PacketStatement::If { guard, then } => {
                writeln!(f, "{pad}if {guard}")?;
                fmt_packet_statements(f, depth + 1, then)?;
            }
            PacketStatement::Return(action) => writeln!(f, "{pad}return {action}")?,
        }
    }
    Ok(())
}

impl Display for PacketPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "packet-policy {}:", self.name)?;
        fmt_packet_statements(f, 1, &self.statements)?;
        writeln!(f, "  default {}", self.default_action)
    }
}
