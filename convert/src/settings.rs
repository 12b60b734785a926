// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Settings of a conversion run

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::ConvertError;

/// Knobs of the converter. A builder type `ConverterSettingsBuilder` is derived,
/// with defaults for every field. Settings can also be loaded from YAML, where
/// missing fields take the same defaults.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Report templates no neighbor or template inherits from
    #[builder(default = true)]
    pub report_unused_templates: bool,

    /// Report inheritance cycles among templates
    #[builder(default = true)]
    pub report_inheritance_cycles: bool,

    /// Annotate the statements of route-map entries with the entry they come from
    #[builder(default = true)]
    pub trace_route_map_entries: bool,

    /// Name of the file the configuration was parsed from, used in traces
    #[builder(setter(into), default = "config".to_string())]
    pub filename: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            report_unused_templates: true,
            report_inheritance_cycles: true,
            trace_route_map_entries: true,
            filename: "config".to_string(),
        }
    }
}

impl ConverterSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConvertError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            error!("Failed to load converter settings: {e}");
            ConvertError::InvalidSettings(e.to_string())
        })
    }
}
