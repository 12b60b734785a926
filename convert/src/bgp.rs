// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Conversion of a resolved BGP process into neutral BGP peers

use model::bgp::{AddressFamily, AfConfig, BgpProcess, NeighborConfig};
use policy::Configuration;
use policy::bgp::{BgpAf, BgpPeerConfig, BgpProcess as NeutralBgp, BgpVrfPeers, PeerAfConfig, PeerId};
use tracing::debug;

use crate::emitter::{ExportSettings, PeerFilter, PolicyEmitter};
use crate::errors::ConvertError;
use crate::namegen::PeerPolicyNames;

fn bgp_af(af: AddressFamily) -> BgpAf {
    match af {
        AddressFamily::Ipv4Unicast => BgpAf::Ipv4Unicast,
        AddressFamily::Ipv6Unicast => BgpAf::Ipv6Unicast,
        AddressFamily::L2vpnEvpn => BgpAf::L2vpnEvpn,
    }
}

fn peer_af_config(af: &AfConfig, import_policy: String, export_policy: String) -> PeerAfConfig {
    PeerAfConfig {
        import_policy: Some(import_policy),
        export_policy: Some(export_policy),
        route_reflector_client: af.route_reflector_client.unwrap_or(false),
        as_override: af.as_override.unwrap_or(false),
        next_hop_self: af.next_hop_self.unwrap_or(false),
        send_community: af.send_community.unwrap_or(false),
        send_extended_community: af.send_community_extended.unwrap_or(false),
        allowas_in: af.allowas_in.unwrap_or(0),
        default_originate: af.default_originate.unwrap_or(false),
    }
}

/// What the export policy of an address family applies. Evpn routes only get
/// their private AS numbers removed.
fn export_settings(peer: &BgpPeerConfig, af: BgpAf, af_config: &AfConfig) -> ExportSettings {
    let remove_private_as = peer.remove_private_as;
    if af == BgpAf::L2vpnEvpn {
        return ExportSettings {
            remove_private_as,
            bgp_routes_only: true,
            ..Default::default()
        };
    }
    ExportSettings {
        next_hop_self: af_config.next_hop_self.unwrap_or(false),
        reflects_ibgp: af_config.route_reflector_client.unwrap_or(false) && !peer.is_ebgp(),
        remove_private_as,
        default_originate: af_config.default_originate.unwrap_or(false),
        bgp_routes_only: false,
    }
}

struct BgpConverter<'e, 'a> {
    emitter: &'e mut PolicyEmitter<'a>,
    asn: u32,
}

impl BgpConverter<'_, '_> {
    /// Build the neutral config of a neighbor. None if it can't establish a session.
    fn peer(
        &mut self,
        config: &mut Configuration,
        vrf: &str,
        peer: PeerId,
        neighbor: &NeighborConfig,
    ) -> Result<Option<BgpPeerConfig>, ConvertError> {
        let usage = format!("bgp neighbor {peer} (vrf {vrf})");
        let session = &neighbor.session;
        if session.shutdown == Some(true) {
            debug!("Skipping {usage}: shut down");
            return Ok(None);
        }
        if neighbor.address_families.is_empty() {
            self.emitter
                .warnings()
                .red_flag(format!("No supported address-family configured for {usage}"));
            return Ok(None);
        }
        let Some(remote_as) = session.remote_as else {
            self.emitter
                .warnings()
                .red_flag(format!("No remote-as configured for {usage}: ignored"));
            return Ok(None);
        };

        let mut out = BgpPeerConfig::new(peer, session.local_as.unwrap_or(self.asn));
        out.remote_as = Some(remote_as);
        out.description.clone_from(&session.description);
        out.ebgp_multihop = session.ebgp_multihop.unwrap_or(1);
        out.update_source.clone_from(&session.update_source);
        out.remove_private_as = session.remove_private_as.unwrap_or(false);
        out.password.clone_from(&session.password);

        for (&af, af_config) in &neighbor.address_families {
            let af = bgp_af(af);
            let import_policy = peer.import_policy(vrf, af);
            let export_policy = peer.export_policy(vrf, af);
            self.emitter.import_policy(
                config,
                &import_policy,
                PeerFilter {
                    route_map: af_config.inbound_route_map.as_deref(),
                    prefix_list: af_config.inbound_prefix_list.as_deref(),
                },
                &format!("{usage} {af} import"),
            )?;
            self.emitter.export_policy(
                config,
                &export_policy,
                PeerFilter {
                    route_map: af_config.outbound_route_map.as_deref(),
                    prefix_list: af_config.outbound_prefix_list.as_deref(),
                },
                export_settings(&out, af, af_config),
                &format!("{usage} {af} export"),
            )?;
            out.address_families
                .insert(af, peer_af_config(af_config, import_policy, export_policy));
        }
        debug!("Converted {usage}");
        Ok(Some(out))
    }
}

/// Convert a BGP process whose neighbors have been resolved. The import and
/// export policies of the peers are added to `config`.
pub fn convert_bgp(
    bgp: &BgpProcess,
    emitter: &mut PolicyEmitter<'_>,
    config: &mut Configuration,
) -> Result<NeutralBgp, ConvertError> {
    let mut converter = BgpConverter {
        emitter,
        asn: bgp.asn,
    };
    let mut out = NeutralBgp::new(bgp.asn, bgp.router_id);
    for vrf in bgp.vrfs.values() {
        let mut peers = BgpVrfPeers::new(&vrf.name, vrf.router_id.or(bgp.router_id));
        let active = vrf
            .neighbors
            .iter()
            .map(|(addr, n)| (PeerId::Active(*addr), n));
        let passive = vrf
            .passive_neighbors
            .iter()
            .map(|(prefix, n)| (PeerId::Passive(*prefix), n));
        for (peer, neighbor) in active.chain(passive) {
            if let Some(peer) = converter.peer(config, &vrf.name, peer, neighbor)? {
                peers.add_peer(peer);
            }
        }
        out.add_vrf(peers);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConverterSettings;
    use crate::warnings::{WarningKind, Warnings};
    use model::VendorConfig;
    use model::bgp::{BgpVrf, SessionConfig};
    use policy::eval::{Route, evaluate};
    use policy::statement::{Protocol, Statement};
    use pretty_assertions::assert_eq;

    fn neighbor_with_af(session: SessionConfig, af: AddressFamily) -> NeighborConfig {
        let mut neighbor = NeighborConfig::new().set_session(session);
        neighbor.add_address_family(af, AfConfig::new()).unwrap();
        neighbor
    }

    fn process() -> BgpProcess {
        let mut vrf = BgpVrf::new("default");
        let mut neighbor =
            NeighborConfig::new().set_session(SessionConfig::new().set_remote_as(65001));
        neighbor
            .add_address_family(
                AddressFamily::Ipv4Unicast,
                AfConfig::new()
                    .set_route_map_in("GHOST")
                    .set_rr_client(true)
                    .set_allowas_in(2),
            )
            .unwrap();
        vrf.add_neighbor("10.0.0.1".parse().unwrap(), neighbor)
            .unwrap();
        // no address family
        vrf.add_neighbor(
            "10.0.0.2".parse().unwrap(),
            NeighborConfig::new().set_session(SessionConfig::new().set_remote_as(65002)),
        )
        .unwrap();
        // shut down
        vrf.add_neighbor(
            "10.0.0.3".parse().unwrap(),
            neighbor_with_af(
                SessionConfig::new().set_remote_as(65003).set_shutdown(true),
                AddressFamily::Ipv4Unicast,
            ),
        )
        .unwrap();
        // no remote-as
        vrf.add_neighbor(
            "10.0.0.4".parse().unwrap(),
            neighbor_with_af(SessionConfig::new(), AddressFamily::Ipv4Unicast),
        )
        .unwrap();
        vrf.add_passive_neighbor(
            "10.1.0.0/16".parse().unwrap(),
            neighbor_with_af(
                SessionConfig::new()
                    .set_remote_as(65000)
                    .set_local_as(65100)
                    .set_ebgp_multihop(3)
                    .set_remove_private_as(true),
                AddressFamily::L2vpnEvpn,
            ),
        )
        .unwrap();
        let mut bgp = BgpProcess::new(65000);
        bgp.set_router_id("1.1.1.1".parse().unwrap());
        bgp.add_vrf(vrf);
        bgp
    }

    #[test]
    fn test_convert_bgp() {
        let vendor = VendorConfig::new("r");
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);
        let bgp = convert_bgp(&process(), &mut emitter, &mut config).unwrap();
        config.bgp = Some(bgp);
        config.validate().unwrap();

        let bgp = config.bgp.as_ref().unwrap();
        let vrf = bgp.get_vrf("default").unwrap();
        assert_eq!(vrf.router_id, Some("1.1.1.1".parse().unwrap()));
        assert_eq!(vrf.peers.len(), 2);

        let active = PeerId::Active("10.0.0.1".parse().unwrap());
        let peer = vrf.get_peer(&active).unwrap();
        assert!(peer.is_ebgp());
        assert_eq!(peer.ebgp_multihop, 1);
        assert_eq!(
            peer.get_af(BgpAf::Ipv4Unicast),
            Some(&PeerAfConfig {
                import_policy: Some(
                    "~BGP_PEER_IMPORT_POLICY:default:10.0.0.1:ipv4-unicast~".to_string()
                ),
                export_policy: Some(
                    "~BGP_PEER_EXPORT_POLICY:default:10.0.0.1:ipv4-unicast~".to_string()
                ),
                route_reflector_client: true,
                allowas_in: 2,
                ..Default::default()
            })
        );
        assert!(config.has_routing_policy("GHOST~undefined"));

        let passive = PeerId::Passive("10.1.0.0/16".parse().unwrap());
        let peer = vrf.get_peer(&passive).unwrap();
        assert_eq!(peer.local_as, 65100);
        assert_eq!(peer.ebgp_multihop, 3);
        assert!(peer.get_af(BgpAf::Ipv4Unicast).is_none());
        let export = config
            .get_routing_policy("~BGP_PEER_EXPORT_POLICY:default:10.1.0.0/16:l2vpn-evpn~")
            .unwrap();
        assert_eq!(export.statements.first(), Some(&Statement::RemovePrivateAs));

        for skipped in ["10.0.0.2", "10.0.0.3", "10.0.0.4"] {
            assert!(vrf.get_peer(&PeerId::Active(skipped.parse().unwrap())).is_none());
        }
        let red_flags: Vec<&str> = warnings
            .of_kind(WarningKind::RedFlag)
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(
            red_flags,
            vec![
                "No supported address-family configured for bgp neighbor 10.0.0.2 (vrf default)",
                "No remote-as configured for bgp neighbor 10.0.0.4 (vrf default): ignored",
            ]
        );
        assert_eq!(warnings.of_kind(WarningKind::UndefinedReference).count(), 1);
    }

    #[test]
    fn test_export_policy_attributes() {
        let vendor = VendorConfig::new("r");
        let settings = ConverterSettings::default();
        let mut warnings = Warnings::new();
        let mut config = Configuration::new("r");
        let mut emitter = PolicyEmitter::new(&vendor, &settings, &mut warnings);

        let mut vrf = BgpVrf::new("default");
        let mut client = NeighborConfig::new().set_session(SessionConfig::new().set_remote_as(65000));
        client
            .add_address_family(
                AddressFamily::Ipv4Unicast,
                AfConfig::new()
                    .set_rr_client(true)
                    .set_next_hop_self(true)
                    .set_default_originate(true),
            )
            .unwrap();
        vrf.add_neighbor("10.0.0.1".parse().unwrap(), client)
            .unwrap();
        let mut bgp = BgpProcess::new(65000);
        bgp.add_vrf(vrf);
        convert_bgp(&bgp, &mut emitter, &mut config).unwrap();
        config.validate().unwrap();

        let reflected = Route::new("10.2.0.0/16".parse().unwrap(), Protocol::Ibgp);
        let export = "~BGP_PEER_EXPORT_POLICY:default:10.0.0.1:ipv4-unicast~";
        let outcome = evaluate(&config, export, &reflected, 65000).unwrap();
        assert!(outcome.accepted);
        assert!(!outcome.route.next_hop_self);
        let learnt = Route::new("10.3.0.0/16".parse().unwrap(), Protocol::Bgp);
        assert!(evaluate(&config, export, &learnt, 65000).unwrap().route.next_hop_self);
        assert!(config.has_routing_policy("~BGP_DEFAULT_ROUTE_EXPORT_POLICY~"));
        assert!(warnings.is_empty());
    }
}
