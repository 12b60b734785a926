// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Resolution of BGP template inheritance.
//!
//! Neighbors may inherit from a neighbor template (`inherit peer`), from a
//! peer-session template (`inherit peer-session`) and, per address family,
//! from peer-policy templates (`inherit peer-policy <name> <priority>`).
//! Templates may inherit from templates of the same kind. Resolution merges
//! the fields left unset in a neighbor or template from what it inherits:
//! the first value set wins. Resolution happens in place and is idempotent.
//!
//! Every object carries a [`ResolveState`]. It is moved to `InProgress` before
//! resolving anything the object inherits from, so that an inheritance cycle
//! is cut when it re-enters an object. In that case, the object that closes the
//! cycle inherits the fields the re-entered object sets by itself.

use model::bgp::{AfConfig, BgpProcess, NeighborConfig, SessionConfig};
use model::templates::{PeerPolicyTemplate, PeerSessionTemplate, ResolveState, TemplateStore};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::settings::ConverterSettings;
use crate::warnings::Warnings;

/// Merge the fields left unset from another object of the same type
pub(crate) trait InheritUnset {
    fn inherit_unset(&mut self, parent: &Self);
}

macro_rules! inherit_fields {
    ($child:expr, $parent:expr, $($field:ident),+) => {
        $(
            if $child.$field.is_none() {
                $child.$field.clone_from(&$parent.$field);
            }
        )+
    };
}

impl InheritUnset for SessionConfig {
    fn inherit_unset(&mut self, parent: &Self) {
        inherit_fields!(
            self,
            parent,
            description,
            local_as,
            remote_as,
            ebgp_multihop,
            shutdown,
            update_source,
            remove_private_as,
            password
        );
    }
}

impl InheritUnset for AfConfig {
    /// The peer-policy templates of the parent are not inherited: the parent is
    /// resolved before, so their settings are already merged into it.
    fn inherit_unset(&mut self, parent: &Self) {
        inherit_fields!(
            self,
            parent,
            inbound_route_map,
            outbound_route_map,
            inbound_prefix_list,
            outbound_prefix_list,
            route_reflector_client,
            as_override,
            next_hop_self,
            send_community,
            send_community_extended,
            allowas_in,
            default_originate
        );
    }
}

impl InheritUnset for NeighborConfig {
    /// Session settings are merged, then address families. The address families
    /// of the parent that the child lacks are created.
    fn inherit_unset(&mut self, parent: &Self) {
        self.session.inherit_unset(&parent.session);
        for (af, parent_af) in &parent.address_families {
            self.address_families
                .entry(*af)
                .or_default()
                .inherit_unset(parent_af);
        }
    }
}

/// Names of the templates referred to by some neighbor or template
#[derive(Debug, Default)]
struct UsedTemplates {
    peers: BTreeSet<String>,
    peer_sessions: BTreeSet<String>,
    peer_policies: BTreeSet<String>,
}

impl UsedTemplates {
    fn add_af(&mut self, af: &AfConfig) {
        self.peer_policies
            .extend(af.inherit_peer_policy.values().cloned());
    }

    fn add_neighbor(&mut self, neighbor: &NeighborConfig) {
        self.peers.extend(neighbor.inherit_peer.iter().cloned());
        self.peer_sessions
            .extend(neighbor.inherit_peer_session.iter().cloned());
        for af in neighbor.address_families.values() {
            self.add_af(af);
        }
    }

    /// Collect the inheritance references of a BGP process. Resolution leaves
    /// them untouched, so this gives the same result before and after it.
    fn collect(bgp: &BgpProcess) -> Self {
        let mut used = Self::default();
        for vrf in bgp.vrfs.values() {
            for neighbor in vrf.neighbors.values().chain(vrf.passive_neighbors.values()) {
                used.add_neighbor(neighbor);
            }
        }
        let store = &bgp.templates;
        for template in store.peers.values() {
            used.add_neighbor(template);
        }
        for template in store.peer_sessions.values() {
            used.peer_sessions
                .extend(template.inherit_peer_session.iter().cloned());
        }
        for template in store.peer_policies.values() {
            used.add_af(&template.af);
        }
        used
    }
}

pub struct InheritanceResolver<'a> {
    settings: &'a ConverterSettings,
    warnings: &'a mut Warnings,
}

impl<'a> InheritanceResolver<'a> {
    #[must_use]
    pub fn new(settings: &'a ConverterSettings, warnings: &'a mut Warnings) -> Self {
        Self { settings, warnings }
    }

    fn cycle(&mut self, kind: &str, name: &str) {
        if self.settings.report_inheritance_cycles {
            self.warnings
                .red_flag(format!("Inheritance cycle through {kind} '{name}'"));
        }
    }

    /////////////////////////////////////////////////////////////////////
    // peer-session templates
    /////////////////////////////////////////////////////////////////////

    /// Resolve a peer-session template and get its session settings
    fn resolve_peer_session(
        &mut self,
        sessions: &mut BTreeMap<String, PeerSessionTemplate>,
        name: &str,
    ) -> Option<SessionConfig> {
        let template = sessions.get_mut(name)?;
        match template.state {
            ResolveState::Resolved => {}
            ResolveState::InProgress => self.cycle("peer-session template", name),
            ResolveState::Unresolved => {
                template.state = ResolveState::InProgress;
                let mut session = template.session.clone();
                let parent = template.inherit_peer_session.clone();
                if let Some(parent) = parent
                    && let Some(inherited) = self.inherited_peer_session(
                        sessions,
                        &parent,
                        &format!("peer-session template {name}"),
                    )
                {
                    session.inherit_unset(&inherited);
                }
                if let Some(template) = sessions.get_mut(name) {
                    template.session = session;
                    template.state = ResolveState::Resolved;
                }
                debug!("Resolved peer-session template {name}");
            }
        }
        sessions.get(name).map(|t| t.session.clone())
    }

    fn inherited_peer_session(
        &mut self,
        sessions: &mut BTreeMap<String, PeerSessionTemplate>,
        name: &str,
        usage: &str,
    ) -> Option<SessionConfig> {
        if !sessions.contains_key(name) {
            self.warnings
                .undefined_reference("peer-session template", name, usage);
            return None;
        }
        self.resolve_peer_session(sessions, name)
    }

    /////////////////////////////////////////////////////////////////////
    // peer-policy templates
    /////////////////////////////////////////////////////////////////////

    /// Merge the peer-policy templates an address family inherits from, by
    /// ascending priority
    fn inherit_peer_policies(
        &mut self,
        policies: &mut BTreeMap<String, PeerPolicyTemplate>,
        af: &mut AfConfig,
        usage: &str,
    ) {
        let parents: Vec<String> = af.inherit_peer_policy.values().cloned().collect();
        for parent in parents {
            if let Some(inherited) = self.inherited_peer_policy(policies, &parent, usage) {
                af.inherit_unset(&inherited);
            }
        }
    }

    /// Resolve a peer-policy template and get its address-family settings
    fn resolve_peer_policy(
        &mut self,
        policies: &mut BTreeMap<String, PeerPolicyTemplate>,
        name: &str,
    ) -> Option<AfConfig> {
        let template = policies.get_mut(name)?;
        match template.state {
            ResolveState::Resolved => {}
            ResolveState::InProgress => self.cycle("peer-policy template", name),
            ResolveState::Unresolved => {
                template.state = ResolveState::InProgress;
                let mut af = template.af.clone();
                self.inherit_peer_policies(
                    policies,
                    &mut af,
                    &format!("peer-policy template {name}"),
                );
                if let Some(template) = policies.get_mut(name) {
                    template.af = af;
                    template.state = ResolveState::Resolved;
                }
                debug!("Resolved peer-policy template {name}");
            }
        }
        policies.get(name).map(|t| t.af.clone())
    }

    fn inherited_peer_policy(
        &mut self,
        policies: &mut BTreeMap<String, PeerPolicyTemplate>,
        name: &str,
        usage: &str,
    ) -> Option<AfConfig> {
        if !policies.contains_key(name) {
            self.warnings
                .undefined_reference("peer-policy template", name, usage);
            return None;
        }
        self.resolve_peer_policy(policies, name)
    }

    /////////////////////////////////////////////////////////////////////
    // neighbors and neighbor templates
    /////////////////////////////////////////////////////////////////////

    /// Merge everything a neighbor (or neighbor template) inherits from:
    /// its peer-session template, then its neighbor template, then the
    /// peer-policy templates of each of its address families.
    fn inherit_neighbor(
        &mut self,
        store: &mut TemplateStore,
        neighbor: &mut NeighborConfig,
        usage: &str,
    ) {
        if let Some(parent) = neighbor.inherit_peer_session.clone()
            && let Some(inherited) =
                self.inherited_peer_session(&mut store.peer_sessions, &parent, usage)
        {
            neighbor.session.inherit_unset(&inherited);
        }
        if let Some(parent) = neighbor.inherit_peer.clone()
            && let Some(inherited) = self.inherited_peer(store, &parent, usage)
        {
            neighbor.inherit_unset(&inherited);
        }
        for af in neighbor.address_families.values_mut() {
            self.inherit_peer_policies(&mut store.peer_policies, af, usage);
        }
    }

    /// Resolve a neighbor template and get a copy of it
    fn resolve_peer(&mut self, store: &mut TemplateStore, name: &str) -> Option<NeighborConfig> {
        let template = store.peers.get_mut(name)?;
        match template.state {
            ResolveState::Resolved => {}
            ResolveState::InProgress => self.cycle("peer template", name),
            ResolveState::Unresolved => {
                template.state = ResolveState::InProgress;
                let mut resolved = template.clone();
                self.inherit_neighbor(store, &mut resolved, &format!("peer template {name}"));
                resolved.state = ResolveState::Resolved;
                store.peers.insert(name.to_owned(), resolved);
                debug!("Resolved peer template {name}");
            }
        }
        store.peers.get(name).cloned()
    }

    fn inherited_peer(
        &mut self,
        store: &mut TemplateStore,
        name: &str,
        usage: &str,
    ) -> Option<NeighborConfig> {
        if !store.peers.contains_key(name) {
            self.warnings
                .undefined_reference("peer template", name, usage);
            return None;
        }
        self.resolve_peer(store, name)
    }

    /// Resolve the inheritance of a single neighbor. A resolved neighbor is left untouched.
    pub fn resolve_neighbor(
        &mut self,
        store: &mut TemplateStore,
        neighbor: &mut NeighborConfig,
        usage: &str,
    ) {
        if neighbor.state != ResolveState::Unresolved {
            return;
        }
        neighbor.state = ResolveState::InProgress;
        self.inherit_neighbor(store, neighbor, usage);
        neighbor.state = ResolveState::Resolved;
        debug!("Resolved {usage}");
    }

    /// Resolve all the templates of a store, whether used or not
    pub fn resolve_templates(&mut self, store: &mut TemplateStore) {
        let sessions: Vec<String> = store.peer_sessions.keys().cloned().collect();
        for name in &sessions {
            self.resolve_peer_session(&mut store.peer_sessions, name);
        }
        let policies: Vec<String> = store.peer_policies.keys().cloned().collect();
        for name in &policies {
            self.resolve_peer_policy(&mut store.peer_policies, name);
        }
        let peers: Vec<String> = store.peers.keys().cloned().collect();
        for name in &peers {
            self.resolve_peer(store, name);
        }
    }

    fn report_unused(&mut self, used: &UsedTemplates, store: &TemplateStore) {
        let unused_peers = store.peers.keys().filter(|n| !used.peers.contains(*n));
        let unused_sessions = store
            .peer_sessions
            .keys()
            .filter(|n| !used.peer_sessions.contains(*n));
        let unused_policies = store
            .peer_policies
            .keys()
            .filter(|n| !used.peer_policies.contains(*n));

        let unused: Vec<(&str, &String)> = unused_peers
            .map(|n| ("peer template", n))
            .chain(unused_sessions.map(|n| ("peer-session template", n)))
            .chain(unused_policies.map(|n| ("peer-policy template", n)))
            .collect();
        for (kind, name) in unused {
            self.warnings.unused(kind, name);
        }
    }

    /// Resolve the inheritance of all neighbors and templates of a BGP process
    pub fn resolve(mut self, bgp: &mut BgpProcess) {
        let used = UsedTemplates::collect(bgp);
        let BgpProcess {
            vrfs, templates, ..
        } = bgp;
        for (vrf_name, vrf) in vrfs {
            for (address, neighbor) in &mut vrf.neighbors {
                let usage = format!("neighbor {address} (vrf {vrf_name})");
                self.resolve_neighbor(templates, neighbor, &usage);
            }
            for (prefix, neighbor) in &mut vrf.passive_neighbors {
                let usage = format!("neighbor {prefix} (vrf {vrf_name})");
                self.resolve_neighbor(templates, neighbor, &usage);
            }
        }
        self.resolve_templates(templates);
        if self.settings.report_unused_templates {
            self.report_unused(&used, templates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warnings::WarningKind;
    use model::bgp::{AddressFamily, BgpVrf};
    use pretty_assertions::assert_eq;
    use std::net::IpAddr;
    use tracing_test::traced_test;

    const NEIGHBOR: &str = "10.0.0.1";

    fn neighbor_address() -> IpAddr {
        NEIGHBOR.parse().unwrap()
    }

    fn process_with(neighbor: NeighborConfig, templates: TemplateStore) -> BgpProcess {
        let mut vrf = BgpVrf::new("default");
        vrf.add_neighbor(neighbor_address(), neighbor).unwrap();
        let mut bgp = BgpProcess::new(65000);
        bgp.add_vrf(vrf);
        bgp.templates = templates;
        bgp
    }

    fn resolve(bgp: &mut BgpProcess) -> Warnings {
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        InheritanceResolver::new(&settings, &mut warnings).resolve(bgp);
        warnings
    }

    fn neighbor(bgp: &BgpProcess) -> &NeighborConfig {
        bgp.get_vrf("default")
            .and_then(|vrf| vrf.get_neighbor(&neighbor_address()))
            .unwrap()
    }

    #[test]
    fn test_first_set_wins() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(PeerSessionTemplate::new(
                "SESS",
                SessionConfig::new()
                    .set_remote_as(65001)
                    .set_description("from session")
                    .set_ebgp_multihop(3),
            ))
            .unwrap();
        let mut tmpl = NeighborConfig::new().set_session(
            SessionConfig::new()
                .set_description("from peer")
                .set_update_source("lo0")
                .set_remote_as(65002),
        );
        tmpl.add_address_family(
            AddressFamily::Ipv4Unicast,
            AfConfig::new().set_route_map_in("RM-T").set_next_hop_self(true),
        )
        .unwrap();
        store.add_peer("PEER", tmpl).unwrap();

        let mut nbr = NeighborConfig::new()
            .set_session(SessionConfig::new().set_description("own"))
            .set_inherit_peer_session("SESS")
            .set_inherit_peer("PEER");
        nbr.add_address_family(AddressFamily::Ipv4Unicast, AfConfig::new().set_route_map_in("RM-N"))
            .unwrap();

        let mut bgp = process_with(nbr, store);
        let warnings = resolve(&mut bgp);
        assert!(warnings.is_empty());

        let n = neighbor(&bgp);
        assert!(n.is_resolved());
        assert_eq!(
            n.session,
            SessionConfig::new()
                .set_description("own")
                .set_remote_as(65001)
                .set_ebgp_multihop(3)
                .set_update_source("lo0")
        );
        let af = n.get_address_family(AddressFamily::Ipv4Unicast).unwrap();
        assert_eq!(af.inbound_route_map.as_deref(), Some("RM-N"));
        assert_eq!(af.next_hop_self, Some(true));
    }

    #[test]
    fn test_missing_address_family_is_created() {
        let mut store = TemplateStore::new();
        let mut tmpl = NeighborConfig::new();
        tmpl.add_address_family(AddressFamily::L2vpnEvpn, AfConfig::new().set_send_community(true))
            .unwrap();
        store.add_peer("PEER", tmpl).unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer("PEER"), store);
        resolve(&mut bgp);
        let af = neighbor(&bgp).get_address_family(AddressFamily::L2vpnEvpn);
        assert_eq!(af.and_then(|af| af.send_community), Some(true));
    }

    #[test]
    fn test_peer_policies_by_priority() {
        let mut store = TemplateStore::new();
        store
            .add_peer_policy(PeerPolicyTemplate::new(
                "LOW",
                AfConfig::new().set_route_map_in("RM-LOW").set_allowas_in(2),
            ))
            .unwrap();
        store
            .add_peer_policy(PeerPolicyTemplate::new(
                "HIGH",
                AfConfig::new()
                    .set_route_map_in("RM-HIGH")
                    .set_route_map_out("RM-OUT-HIGH"),
            ))
            .unwrap();
        let mut af = AfConfig::new();
        af.inherit_peer_policy("HIGH", 20).unwrap();
        af.inherit_peer_policy("LOW", 10).unwrap();
        let mut nbr = NeighborConfig::new();
        nbr.add_address_family(AddressFamily::Ipv4Unicast, af).unwrap();

        let mut bgp = process_with(nbr, store);
        resolve(&mut bgp);
        let af = neighbor(&bgp)
            .get_address_family(AddressFamily::Ipv4Unicast)
            .unwrap();
        assert_eq!(af.inbound_route_map.as_deref(), Some("RM-LOW"));
        assert_eq!(af.outbound_route_map.as_deref(), Some("RM-OUT-HIGH"));
        assert_eq!(af.allowas_in, Some(2));
    }

    #[test]
    fn test_multi_level_session_inheritance() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(PeerSessionTemplate::new(
                "BASE",
                SessionConfig::new().set_password("secret").set_remote_as(1),
            ))
            .unwrap();
        store
            .add_peer_session(
                PeerSessionTemplate::new("MID", SessionConfig::new().set_remote_as(2))
                    .set_inherit_peer_session("BASE"),
            )
            .unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer_session("MID"), store);
        let warnings = resolve(&mut bgp);
        assert!(warnings.is_empty());
        let session = &neighbor(&bgp).session;
        assert_eq!(session.remote_as, Some(2));
        assert_eq!(session.password.as_deref(), Some("secret"));
        let base = bgp.templates.get_peer_session("BASE").unwrap();
        assert_eq!(base.state, ResolveState::Resolved);
    }

    #[test]
    fn test_idempotent() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(PeerSessionTemplate::new(
                "SESS",
                SessionConfig::new().set_remote_as(65001),
            ))
            .unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer_session("SESS"), store);
        resolve(&mut bgp);
        let first = neighbor(&bgp).clone();

        // changing a template after resolution has no effect on a resolved neighbor
        if let Some(t) = bgp.templates.peer_sessions.get_mut("SESS") {
            t.session.description = Some("changed".to_string());
        }
        let warnings = resolve(&mut bgp);
        let second = neighbor(&bgp);
        assert_eq!(first.session, second.session);
        assert_eq!(first.address_families, second.address_families);
        assert!(warnings.is_empty());
    }

    #[test]
    #[traced_test]
    fn test_cycle_terminates() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(
                PeerSessionTemplate::new("A", SessionConfig::new().set_remote_as(1))
                    .set_inherit_peer_session("B"),
            )
            .unwrap();
        store
            .add_peer_session(
                PeerSessionTemplate::new("B", SessionConfig::new().set_password("pw"))
                    .set_inherit_peer_session("A"),
            )
            .unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer_session("A"), store);
        let warnings = resolve(&mut bgp);

        let session = &neighbor(&bgp).session;
        assert_eq!(session.remote_as, Some(1));
        assert_eq!(session.password.as_deref(), Some("pw"));
        // B closes the cycle and inherits what A sets by itself
        let b = bgp.templates.get_peer_session("B").unwrap();
        assert_eq!(b.session.remote_as, Some(1));
        assert_eq!(b.state, ResolveState::Resolved);

        assert_eq!(warnings.of_kind(WarningKind::RedFlag).count(), 1);
        assert!(logs_contain("Inheritance cycle through peer-session template 'A'"));
    }

    #[test]
    fn test_peer_template_self_cycle() {
        let mut store = TemplateStore::new();
        let tmpl = NeighborConfig::new()
            .set_session(SessionConfig::new().set_remote_as(7))
            .set_inherit_peer("SELF");
        store.add_peer("SELF", tmpl).unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer("SELF"), store);
        let warnings = resolve(&mut bgp);
        assert_eq!(neighbor(&bgp).session.remote_as, Some(7));
        assert_eq!(warnings.of_kind(WarningKind::RedFlag).count(), 1);
    }

    #[test]
    fn test_undefined_template_is_ignored() {
        let mut nbr = NeighborConfig::new()
            .set_session(SessionConfig::new().set_remote_as(65010))
            .set_inherit_peer("NOPE")
            .set_inherit_peer_session("NADA");
        let mut af = AfConfig::new().set_route_map_in("RM");
        af.inherit_peer_policy("ZILCH", 10).unwrap();
        nbr.add_address_family(AddressFamily::Ipv4Unicast, af.clone())
            .unwrap();
        let mut bgp = process_with(nbr, TemplateStore::new());
        let warnings = resolve(&mut bgp);

        let n = neighbor(&bgp);
        assert_eq!(n.session, SessionConfig::new().set_remote_as(65010));
        assert_eq!(n.get_address_family(AddressFamily::Ipv4Unicast), Some(&af));
        assert_eq!(warnings.of_kind(WarningKind::UndefinedReference).count(), 3);
    }

    #[test]
    fn test_unused_templates_reported() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(PeerSessionTemplate::new("USED", SessionConfig::new()))
            .unwrap();
        store
            .add_peer_session(PeerSessionTemplate::new("IDLE", SessionConfig::new()))
            .unwrap();
        store
            .add_peer_policy(PeerPolicyTemplate::new("IDLE-POL", AfConfig::new()))
            .unwrap();
        store.add_peer("IDLE-PEER", NeighborConfig::new()).unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer_session("USED"), store);

        let warnings = resolve(&mut bgp);
        let unused: Vec<&str> = warnings
            .of_kind(WarningKind::Unused)
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(
            unused,
            vec![
                "peer template 'IDLE-PEER' is never used",
                "peer-session template 'IDLE' is never used",
                "peer-policy template 'IDLE-POL' is never used",
            ]
        );

        let settings = ConverterSettings {
            report_unused_templates: false,
            ..Default::default()
        };
        let mut warnings = Warnings::new();
        let mut bgp = process_with(NeighborConfig::new(), TemplateStore::new());
        InheritanceResolver::new(&settings, &mut warnings).resolve(&mut bgp);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unused_report_stable_across_runs() {
        let mut store = TemplateStore::new();
        store
            .add_peer_session(PeerSessionTemplate::new("BASE", SessionConfig::new()))
            .unwrap();
        store
            .add_peer_session(
                PeerSessionTemplate::new("CHILD", SessionConfig::new())
                    .set_inherit_peer_session("BASE"),
            )
            .unwrap();
        store
            .add_peer_policy(PeerPolicyTemplate::new("POL", AfConfig::new()))
            .unwrap();
        let mut tmpl = NeighborConfig::new().set_inherit_peer_session("CHILD");
        let mut af = AfConfig::new();
        af.inherit_peer_policy("POL", 10).unwrap();
        tmpl.add_address_family(AddressFamily::Ipv4Unicast, af)
            .unwrap();
        store.add_peer("PEER", tmpl).unwrap();
        store.add_peer("IDLE", NeighborConfig::new()).unwrap();
        let mut bgp = process_with(NeighborConfig::new().set_inherit_peer("PEER"), store);

        for _ in 0..2 {
            let warnings = resolve(&mut bgp);
            let unused: Vec<&str> = warnings
                .of_kind(WarningKind::Unused)
                .map(|w| w.message.as_str())
                .collect();
            assert_eq!(unused, vec!["peer template 'IDLE' is never used"]);
        }
    }
}
