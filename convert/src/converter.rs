// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Conversion of a whole vendor configuration

use model::VendorConfig;
use policy::Configuration;
use tracing::{error, info};

use crate::bgp::convert_bgp;
use crate::emitter::PolicyEmitter;
use crate::errors::ConvertError;
use crate::filters::convert_filters;
use crate::inherit::InheritanceResolver;
use crate::pbr::PbrCompiler;
use crate::settings::ConverterSettings;
use crate::warnings::Warnings;

/// The outcome of a conversion run
#[derive(Debug)]
pub struct Conversion {
    pub config: Configuration,
    pub warnings: Warnings,
}

/// Load a vendor configuration from YAML
pub fn load_vendor_config(yaml: &str) -> Result<VendorConfig, ConvertError> {
    serde_yaml_ng::from_str(yaml).map_err(|e| {
        error!("Failed to load vendor configuration: {e}");
        ConvertError::InvalidInput(e.to_string())
    })
}

/// Convert a vendor configuration into a vendor-neutral one. BGP template
/// inheritance is resolved in place before any policy is built.
pub fn convert(
    mut vendor: VendorConfig,
    settings: &ConverterSettings,
) -> Result<Conversion, ConvertError> {
    info!("Converting configuration of {}...", vendor.hostname);
    let mut warnings = Warnings::new();
    let mut config = Configuration::new(&vendor.hostname);

    if let Some(bgp) = vendor.bgp.as_mut() {
        InheritanceResolver::new(settings, &mut warnings).resolve(bgp);
    }

    convert_filters(&vendor, &mut config)?;
    PbrCompiler::new(&vendor, &mut warnings).convert(&mut config)?;

    let mut emitter = PolicyEmitter::new(&vendor, settings, &mut warnings);
    emitter.emit_route_maps(&mut config)?;
    if let Some(bgp) = &vendor.bgp {
        config.bgp = Some(convert_bgp(bgp, &mut emitter, &mut config)?);
    }

    config.validate()?;
    info!(
        "Converted configuration of {}: {} routing policies, {} warnings",
        config.hostname,
        config.routing_policies.len(),
        warnings.len()
    );
    Ok(Conversion { config, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::routemap::{LineAction, RouteMap, RouteMapEntry};

    #[test]
    fn test_convert_empty() {
        let conversion = convert(VendorConfig::new("spine-1"), &ConverterSettings::default())
            .unwrap();
        assert_eq!(conversion.config, Configuration::new("spine-1"));
        assert!(conversion.warnings.is_empty());
    }

    #[test]
    fn test_convert_backward_continue() {
        let mut vendor = VendorConfig::new("spine-1");
        let mut rmap = RouteMap::new("RM");
        rmap.add_entries([
            RouteMapEntry::new(10, LineAction::Permit).set_continue(10),
            RouteMapEntry::new(20, LineAction::Permit),
        ])
        .unwrap();
        vendor.add_route_map(rmap);
        assert_eq!(
            convert(vendor, &ConverterSettings::default()).map(|_| ()),
            Err(ConvertError::BackwardContinue("RM".to_string(), 10, 10))
        );
    }

    #[test]
    fn test_load_invalid_yaml() {
        assert!(matches!(
            load_vendor_config("hostname: [oops"),
            Err(ConvertError::InvalidInput(_))
        ));
    }
}
