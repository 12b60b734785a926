// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Conversion of vendor filter lists: prefix lists, community lists and
//! as-path access lists.

use model::VendorConfig;
use model::lists::{AsPathAccessList, CommunityList};
use model::prefixlist::PrefixList;
use model::routemap::{Community, LineAction};
use policy::Configuration;
use policy::community::StandardCommunity;
use policy::filters::{AsPathMatch, CommunityMatch, FilterAction, RouteFilterLine, RouteFilterList};
use tracing::debug;

use crate::errors::ConvertError;

pub(crate) fn filter_action(action: LineAction) -> FilterAction {
    match action {
        LineAction::Permit => FilterAction::Permit,
        LineAction::Deny => FilterAction::Deny,
    }
}

pub(crate) fn standard_community(community: Community) -> StandardCommunity {
    match community {
        Community::Standard(high, low) => StandardCommunity::new(high, low),
        Community::NoAdvertise => StandardCommunity::NO_ADVERTISE,
        Community::NoExport => StandardCommunity::NO_EXPORT,
        Community::NoPeer => StandardCommunity::NO_PEER,
        Community::Blackhole => StandardCommunity::BLACKHOLE,
        Community::LocalAs => StandardCommunity::NO_EXPORT_SUBCONFED,
        Community::GracefulShutdown => StandardCommunity::GRACEFUL_SHUTDOWN,
        Community::AcceptOwn => StandardCommunity::ACCEPT_OWN,
    }
}

fn route_filter_list(plist: &PrefixList) -> RouteFilterList {
    let mut rfl = RouteFilterList::new(&plist.name);
    for (_, entry) in plist.entries() {
        let (min_len, max_len) = entry.length_range();
        rfl.add_line(RouteFilterLine::new(
            filter_action(entry.action),
            entry.prefix,
            min_len,
            max_len,
        ));
    }
    rfl
}

fn community_match(clist: &CommunityList) -> CommunityMatch {
    let mut cmatch = CommunityMatch::new(&clist.name);
    for entry in &clist.entries {
        cmatch.add_line(
            filter_action(entry.action),
            entry.communities.iter().copied().map(standard_community).collect(),
        );
    }
    cmatch
}

fn as_path_match(alist: &AsPathAccessList) -> AsPathMatch {
    let mut amatch = AsPathMatch::new(&alist.name);
    for entry in &alist.entries {
        amatch.add_line(filter_action(entry.action), &entry.regex);
    }
    amatch
}

/// Convert all the filter lists of a vendor configuration
pub fn convert_filters(vendor: &VendorConfig, config: &mut Configuration) -> Result<(), ConvertError> {
    for plist in vendor.prefix_lists.values() {
        debug!("Converting prefix-list {}", plist.name);
        config.add_route_filter_list(route_filter_list(plist))?;
    }
    for clist in vendor.community_lists.values() {
        debug!("Converting community-list {}", clist.name);
        config.add_community_match(community_match(clist))?;
    }
    for alist in vendor.as_path_lists.values() {
        debug!("Converting as-path access-list {}", alist.name);
        config.add_as_path_match(as_path_match(alist))?;
    }
    config.ip_access_lists.clone_from(&vendor.ip_access_lists);
    Ok(())
}
