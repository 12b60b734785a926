// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Emission of routing policies into the neutral configuration.
//!
//! The emitter compiles each route-map at most once per conversion run and
//! builds the import and export policies of BGP peers on top of them.

use model::VendorConfig;
use model::prefixlist::IpVer;
use policy::statement::{BooleanExpr, NextHopExpr, OriginType, Protocol, Statement};
use policy::{Configuration, RoutingPolicy};
use std::collections::BTreeSet;
use tracing::debug;

use crate::errors::ConvertError;
use crate::namegen::{DEFAULT_ROUTE_EXPORT_POLICY, undefined_route_map_policy};
use crate::routemap::RouteMapCompiler;
use crate::settings::ConverterSettings;
use crate::warnings::Warnings;

/// What a BGP peer filters routes with in one direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerFilter<'f> {
    pub route_map: Option<&'f str>,
    pub prefix_list: Option<&'f str>,
}

/// Peer settings applied by the export policy of an address family
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSettings {
    pub next_hop_self: bool,
    /// next-hop-self leaves the routes reflected to an ibgp client untouched
    pub reflects_ibgp: bool,
    pub remove_private_as: bool,
    pub default_originate: bool,
    /// only routes learnt from bgp are exported
    pub bgp_routes_only: bool,
}

pub struct PolicyEmitter<'a> {
    vendor: &'a VendorConfig,
    settings: &'a ConverterSettings,
    warnings: &'a mut Warnings,
    /// route-maps whose policies have been added to the configuration
    emitted: BTreeSet<String>,
}

impl<'a> PolicyEmitter<'a> {
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
            emitted: BTreeSet::new(),
        }
    }

    pub(crate) fn warnings(&mut self) -> &mut Warnings {
        self.warnings
    }

    /// Get the name of the policy to call to evaluate route-map `name`,
    /// emitting it if needed. An undefined route-map stands for a policy
    /// that denies everything.
    pub fn route_map_policy(
        &mut self,
        config: &mut Configuration,
        name: &str,
        usage: &str,
    ) -> Result<String, ConvertError> {
        let Some(rmap) = self.vendor.route_maps.get(name) else {
            self.warnings.undefined_reference("route-map", name, usage);
            let policy = undefined_route_map_policy(name);
            if self.emitted.insert(policy.clone()) {
                config.add_routing_policy(RoutingPolicy::deny_all(&policy))?;
            }
            return Ok(policy);
        };
        if !self.emitted.contains(name) {
            let policies = RouteMapCompiler::new(self.vendor, self.settings, self.warnings)
                .compile(rmap)?;
            for policy in policies {
                config.add_routing_policy(policy)?;
            }
            self.emitted.insert(name.to_owned());
        }
        Ok(name.to_owned())
    }

    /// Compile all the route-maps of the vendor configuration, used or not
    pub fn emit_route_maps(&mut self, config: &mut Configuration) -> Result<(), ConvertError> {
        let vendor = self.vendor;
        for rmap in vendor.route_maps.values() {
            self.route_map_policy(config, &rmap.name, "configuration")?;
        }
        Ok(())
    }

    /// Statements filtering routes with a route-map or a prefix-list. The
    /// route-map is called only for routes that satisfy `guard`.
    fn filter_statements(
        &mut self,
        config: &mut Configuration,
        filter: PeerFilter<'_>,
        mut guard: Vec<BooleanExpr>,
        usage: &str,
    ) -> Result<Vec<Statement>, ConvertError> {
        let accept_guarded = |guard: Vec<BooleanExpr>| {
            vec![
                Statement::if_then(BooleanExpr::all(guard), vec![Statement::ExitAccept]),
                Statement::ExitReject,
            ]
        };
        let statements = match filter {
            PeerFilter {
                route_map: Some(rmap),
                prefix_list,
            } => {
                if let Some(plist) = prefix_list {
                    self.warnings.red_flag(format!(
                        "Both route-map {rmap} and prefix-list {plist} filter {usage}: only the route-map is used"
                    ));
                }
                let callee = self.route_map_policy(config, rmap, usage)?;
                guard.push(BooleanExpr::Call(callee));
                accept_guarded(guard)
            }
            PeerFilter {
                route_map: None,
                prefix_list: Some(plist),
            } => {
                let defined = self
                    .vendor
                    .prefix_lists
                    .get(plist)
                    .is_some_and(|p| p.ipver == IpVer::V4);
                if defined {
                    vec![Statement::if_then_else(
                        BooleanExpr::MatchPrefixSet(plist.to_owned()),
                        vec![Statement::ExitAccept],
                        vec![Statement::ExitReject],
                    )]
                } else {
                    // an undefined prefix-list accepts everything
                    self.warnings.undefined_reference("prefix-list", plist, usage);
                    vec![Statement::ExitAccept]
                }
            }
            PeerFilter {
                route_map: None,
                prefix_list: None,
            } if guard.is_empty() => vec![Statement::ExitAccept],
            PeerFilter {
                route_map: None,
                prefix_list: None,
            } => accept_guarded(guard),
        };
        Ok(statements)
    }

    /// Get the policy accepting the default route generated for peers with
    /// default-originate, emitting it if needed
    fn default_route_export_policy(
        &mut self,
        config: &mut Configuration,
    ) -> Result<String, ConvertError> {
        let name = DEFAULT_ROUTE_EXPORT_POLICY.to_owned();
        if self.emitted.insert(name.clone()) {
            let guard = BooleanExpr::all(vec![
                BooleanExpr::MatchDefaultRoute,
                BooleanExpr::MatchProtocol(BTreeSet::from([Protocol::Aggregate])),
            ]);
            config.add_routing_policy(RoutingPolicy::with_statements(
                &name,
                vec![
                    Statement::if_then(
                        guard,
                        vec![Statement::SetOrigin(OriginType::Igp), Statement::ReturnTrue],
                    ),
                    Statement::ReturnFalse,
                ],
            ))?;
        }
        Ok(name)
    }

    /// Emit the policy named `name` that filters the routes a BGP peer imports
    pub fn import_policy(
        &mut self,
        config: &mut Configuration,
        name: &str,
        filter: PeerFilter<'_>,
        usage: &str,
    ) -> Result<(), ConvertError> {
        let statements = self.filter_statements(config, filter, vec![], usage)?;
        debug!("Emitting policy {name} for {usage}");
        config.add_routing_policy(RoutingPolicy::with_statements(name, statements))?;
        Ok(())
    }

    /// Emit the policy named `name` that filters the routes a BGP peer is
    /// sent and sets the attributes the peer settings ask for.
    pub fn export_policy(
        &mut self,
        config: &mut Configuration,
        name: &str,
        filter: PeerFilter<'_>,
        export: ExportSettings,
        usage: &str,
    ) -> Result<(), ConvertError> {
        let mut statements = vec![];
        if export.next_hop_self {
            let next_hop_self = Statement::SetNextHop(NextHopExpr::SelfAddress);
            statements.push(if export.reflects_ibgp {
                Statement::if_then_else(
                    BooleanExpr::MatchProtocol(BTreeSet::from([Protocol::Ibgp])),
                    vec![],
                    vec![next_hop_self],
                )
            } else {
                next_hop_self
            });
        }
        if export.remove_private_as {
            statements.push(Statement::RemovePrivateAs);
        }
        // the default route skips the filters
        if export.default_originate {
            let callee = self.default_route_export_policy(config)?;
            statements.push(Statement::if_then(
                BooleanExpr::Call(callee),
                vec![Statement::ReturnTrue],
            ));
        }
        let guard = if export.bgp_routes_only {
            vec![BooleanExpr::MatchProtocol(BTreeSet::from([
                Protocol::Bgp,
                Protocol::Ibgp,
            ]))]
        } else {
            vec![]
        };
        statements.extend(self.filter_statements(config, filter, guard, usage)?);
        debug!("Emitting policy {name} for {usage}");
        config.add_routing_policy(RoutingPolicy::with_statements(name, statements))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warnings::WarningKind;
    use model::prefixlist::{IpVer, PrefixList};
    use model::routemap::{LineAction, RouteMap, RouteMapEntry};
    use policy::eval::{Route, evaluate};
    use policy::statement::Protocol;
    use pretty_assertions::assert_eq;

    fn vendor() -> VendorConfig {
        let mut vendor = VendorConfig::new("r");
        let mut rmap = RouteMap::new("RM");
        rmap.add_entry(RouteMapEntry::new(10, LineAction::Permit))
            .unwrap();
        vendor.add_route_map(rmap);
        vendor.add_prefix_list(PrefixList::new("PL", IpVer::V4, None));
        vendor
    }

    fn route() -> Route {
        Route::new("192.168.0.0/16".parse().unwrap(), Protocol::Bgp)
    }

    #[test]
    fn test_route_map_compiled_once() {
        let vendor = vendor();
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        emitter.emit_route_maps(&mut config).unwrap();
        let filter = PeerFilter {
            route_map: Some("RM"),
            prefix_list: None,
        };
        emitter
            .import_policy(&mut config, "IMPORT", filter, "peer 1")
            .unwrap();
        emitter
            .export_policy(&mut config, "EXPORT", filter, ExportSettings::default(), "peer 1")
            .unwrap();
        assert_eq!(config.routing_policies.len(), 4);
        config.validate().unwrap();
        assert!(evaluate(&config, "IMPORT", &route(), 1).unwrap().accepted);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_undefined_route_map_memoized() {
        let vendor = vendor();
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        let filter = PeerFilter {
            route_map: Some("GHOST"),
            prefix_list: None,
        };
        emitter
            .import_policy(&mut config, "IMPORT", filter, "peer 1")
            .unwrap();
        emitter
            .export_policy(&mut config, "EXPORT", filter, ExportSettings::default(), "peer 2")
            .unwrap();
        let undefined: Vec<&String> = config
            .routing_policies
            .keys()
            .filter(|name| name.ends_with("~undefined"))
            .collect();
        assert_eq!(undefined, vec!["GHOST~undefined"]);
        assert_eq!(
            config.get_routing_policy("IMPORT").unwrap().statements,
            vec![
                Statement::if_then(
                    BooleanExpr::Call("GHOST~undefined".to_string()),
                    vec![Statement::ExitAccept]
                ),
                Statement::ExitReject,
            ]
        );
        config.validate().unwrap();
        assert!(!evaluate(&config, "EXPORT", &route(), 1).unwrap().accepted);
        assert_eq!(warnings.of_kind(WarningKind::UndefinedReference).count(), 2);
    }

    #[test]
    fn test_prefix_list_filters() {
        let vendor = vendor();
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        emitter
            .import_policy(
                &mut config,
                "DEFINED",
                PeerFilter {
                    route_map: None,
                    prefix_list: Some("PL"),
                },
                "peer 1",
            )
            .unwrap();
        emitter
            .import_policy(
                &mut config,
                "UNDEFINED",
                PeerFilter {
                    route_map: None,
                    prefix_list: Some("NOPE"),
                },
                "peer 1",
            )
            .unwrap();
        emitter
            .import_policy(
                &mut config,
                "BOTH",
                PeerFilter {
                    route_map: Some("RM"),
                    prefix_list: Some("PL"),
                },
                "peer 1",
            )
            .unwrap();
        emitter
            .import_policy(&mut config, "NONE", PeerFilter::default(), "peer 1")
            .unwrap();

        assert_eq!(
            config.get_routing_policy("DEFINED").unwrap().statements,
            vec![Statement::if_then_else(
                BooleanExpr::MatchPrefixSet("PL".to_string()),
                vec![Statement::ExitAccept],
                vec![Statement::ExitReject]
            )]
        );
        assert_eq!(
            config.get_routing_policy("UNDEFINED").unwrap().statements,
            vec![Statement::ExitAccept]
        );
        assert_eq!(
            config.get_routing_policy("BOTH").unwrap().called_policies(),
            vec!["RM"]
        );
        assert_eq!(
            config.get_routing_policy("NONE").unwrap().statements,
            vec![Statement::ExitAccept]
        );
        assert_eq!(warnings.of_kind(WarningKind::UndefinedReference).count(), 1);
        assert_eq!(warnings.of_kind(WarningKind::RedFlag).count(), 1);
    }

    #[test]
    fn test_ipv6_prefix_list_is_undefined() {
        let mut vendor = vendor();
        vendor.add_prefix_list(PrefixList::new("PL6", IpVer::V6, None));
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        let filter = PeerFilter {
            route_map: None,
            prefix_list: Some("PL6"),
        };
        emitter
            .import_policy(&mut config, "IMPORT", filter, "peer 1")
            .unwrap();
        assert_eq!(
            config.get_routing_policy("IMPORT").unwrap().statements,
            vec![Statement::ExitAccept]
        );
        config.validate().unwrap();
        assert!(evaluate(&config, "IMPORT", &route(), 1).unwrap().accepted);
        assert_eq!(warnings.of_kind(WarningKind::UndefinedReference).count(), 1);
    }

    #[test]
    fn test_export_settings() {
        let vendor = vendor();
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        let filter = PeerFilter {
            route_map: Some("RM"),
            prefix_list: None,
        };
        let export = ExportSettings {
            next_hop_self: true,
            reflects_ibgp: true,
            remove_private_as: true,
            default_originate: true,
            bgp_routes_only: false,
        };
        // the default route policy is shared by all peers
        for name in ["EXPORT-1", "EXPORT-2"] {
            emitter
                .export_policy(&mut config, name, filter, export, "peer 1")
                .unwrap();
        }
        assert_eq!(
            config.get_routing_policy("EXPORT-1").unwrap().statements,
            vec![
                Statement::if_then_else(
                    BooleanExpr::MatchProtocol(BTreeSet::from([Protocol::Ibgp])),
                    vec![],
                    vec![Statement::SetNextHop(NextHopExpr::SelfAddress)],
                ),
                Statement::RemovePrivateAs,
                Statement::if_then(
                    BooleanExpr::Call(DEFAULT_ROUTE_EXPORT_POLICY.to_string()),
                    vec![Statement::ReturnTrue]
                ),
                Statement::if_then(
                    BooleanExpr::Call("RM".to_string()),
                    vec![Statement::ExitAccept]
                ),
                Statement::ExitReject,
            ]
        );
        config.validate().unwrap();

        let reflected = Route::new("10.0.0.0/8".parse().unwrap(), Protocol::Ibgp)
            .set_as_path(vec![65001, 64512]);
        let outcome = evaluate(&config, "EXPORT-1", &reflected, 1).unwrap();
        assert!(outcome.accepted);
        assert!(!outcome.route.next_hop_self);
        assert_eq!(outcome.route.as_path, vec![65001]);

        let outcome = evaluate(&config, "EXPORT-1", &route(), 1).unwrap();
        assert!(outcome.accepted);
        assert!(outcome.route.next_hop_self);

        let mut default_route = Route::new("0.0.0.0/0".parse().unwrap(), Protocol::Aggregate);
        default_route.origin = OriginType::Incomplete;
        let outcome = evaluate(&config, "EXPORT-2", &default_route, 1).unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.route.origin, OriginType::Igp);
    }

    #[test]
    fn test_export_bgp_routes_only() {
        let vendor = vendor();
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        let export = ExportSettings {
            bgp_routes_only: true,
            ..Default::default()
        };
        emitter
            .export_policy(&mut config, "EVPN", PeerFilter::default(), export, "peer 1")
            .unwrap();
        let filter = PeerFilter {
            route_map: Some("RM"),
            prefix_list: None,
        };
        emitter
            .export_policy(&mut config, "EVPN-RM", filter, export, "peer 1")
            .unwrap();

        let bgp = BooleanExpr::MatchProtocol(BTreeSet::from([Protocol::Bgp, Protocol::Ibgp]));
        assert_eq!(
            config.get_routing_policy("EVPN").unwrap().statements,
            vec![
                Statement::if_then(bgp.clone(), vec![Statement::ExitAccept]),
                Statement::ExitReject,
            ]
        );
        assert_eq!(
            config.get_routing_policy("EVPN-RM").unwrap().statements,
            vec![
                Statement::if_then(
                    BooleanExpr::Conjunction(vec![bgp, BooleanExpr::Call("RM".to_string())]),
                    vec![Statement::ExitAccept]
                ),
                Statement::ExitReject,
            ]
        );
        config.validate().unwrap();
        let connected = Route::new("10.0.0.0/24".parse().unwrap(), Protocol::Connected);
        assert!(!evaluate(&config, "EVPN-RM", &connected, 1).unwrap().accepted);
        assert!(evaluate(&config, "EVPN-RM", &route(), 1).unwrap().accepted);
        assert!(warnings.is_empty());
    }
}
