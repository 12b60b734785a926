// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral route filters: route filter lists (from prefix lists),
//! community matches (from community lists) and as-path matches.
//! All of them are evaluated first-match, and deny if nothing matches.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::community::StandardCommunity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterAction {
    Permit,
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFilterLine {
    pub action: FilterAction,
    pub prefix: IpNet,
    pub min_len: u8,
    pub max_len: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFilterList {
    pub name: String,
    pub lines: Vec<RouteFilterLine>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityMatchLine {
    pub action: FilterAction,
    pub communities: BTreeSet<StandardCommunity>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityMatch {
    pub name: String,
    pub lines: Vec<CommunityMatchLine>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsPathMatchLine {
    pub action: FilterAction,
    pub regex: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsPathMatch {
    pub name: String,
    pub lines: Vec<AsPathMatchLine>,
}

impl RouteFilterLine {
    #[must_use]
    pub fn new(action: FilterAction, prefix: IpNet, min_len: u8, max_len: u8) -> Self {
        Self {
            action,
            prefix,
            min_len,
            max_len,
        }
    }
    /// Tell if a network is covered by the prefix of this line with an
    /// acceptable length
    #[must_use]
    pub fn matches(&self, network: &IpNet) -> bool {
        let len = network.prefix_len();
        len >= self.min_len
            && len <= self.max_len
            && self.prefix.prefix_len() <= len
            && self.prefix.contains(&network.network())
    }
}

impl RouteFilterList {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            lines: vec![],
        }
    }
    pub fn add_line(&mut self, line: RouteFilterLine) {
        self.lines.push(line);
    }
    #[must_use]
    pub fn permits(&self, network: &IpNet) -> bool {
        self.lines
            .iter()
            .find(|line| line.matches(network))
            .is_some_and(|line| line.action == FilterAction::Permit)
    }
}

impl CommunityMatch {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            lines: vec![],
        }
    }
    pub fn add_line(&mut self, action: FilterAction, communities: BTreeSet<StandardCommunity>) {
        self.lines.push(CommunityMatchLine {
            action,
            communities,
        });
    }
    /// Tell if a set of communities is permitted. A line matches if all of its
    /// communities are present.
    #[must_use]
    pub fn permits(&self, communities: &BTreeSet<StandardCommunity>) -> bool {
        self.lines
            .iter()
            .find(|line| line.communities.is_subset(communities))
            .is_some_and(|line| line.action == FilterAction::Permit)
    }
}

impl AsPathMatch {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            lines: vec![],
        }
    }
    pub fn add_line(&mut self, action: FilterAction, regex: &str) {
        self.lines.push(AsPathMatchLine {
            action,
            regex: regex.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> IpNet {
        s.parse().unwrap()
    }

    #[test]
    fn test_route_filter_list_first_match() {
        let mut rfl = RouteFilterList::new("PL");
        rfl.add_line(RouteFilterLine::new(FilterAction::Deny, net("10.1.0.0/16"), 16, 32));
        rfl.add_line(RouteFilterLine::new(FilterAction::Permit, net("10.0.0.0/8"), 8, 24));

        assert!(!rfl.permits(&net("10.1.2.0/24")));
        assert!(rfl.permits(&net("10.2.0.0/16")));
        assert!(rfl.permits(&net("10.0.0.0/8")));
        // too long for the permit line
        assert!(!rfl.permits(&net("10.2.3.4/32")));
        // not covered at all
        assert!(!rfl.permits(&net("192.168.0.0/16")));
        // shorter than the line prefix
        assert!(!rfl.permits(&net("10.0.0.0/7")));
    }

    #[test]
    fn test_community_match() {
        let mut cm = CommunityMatch::new("CL");
        cm.add_line(
            FilterAction::Deny,
            [StandardCommunity::NO_EXPORT].into_iter().collect(),
        );
        cm.add_line(
            FilterAction::Permit,
            [StandardCommunity::new(65000, 1), StandardCommunity::new(65000, 2)]
                .into_iter()
                .collect(),
        );
        let both: BTreeSet<_> = [StandardCommunity::new(65000, 1), StandardCommunity::new(65000, 2)]
            .into_iter()
            .collect();
        assert!(cm.permits(&both));

        let one: BTreeSet<_> = [StandardCommunity::new(65000, 1)].into_iter().collect();
        assert!(!cm.permits(&one));

        let mut denied = both.clone();
        denied.insert(StandardCommunity::NO_EXPORT);
        assert!(!cm.permits(&denied));
    }
}
