// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Sink for the warnings of a conversion run. Every warning is also logged.

use serde::Serialize;
use std::fmt::Display;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// The configuration does something suspicious, or that is not modeled faithfully
    RedFlag,
    /// A named object is used but not defined
    UndefinedReference,
    /// The configuration uses a feature that is not supported
    Unimplemented,
    /// A named object is defined but never used
    Unused,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Warnings(Vec<Warning>);

impl Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::RedFlag => write!(f, "red-flag"),
            WarningKind::UndefinedReference => write!(f, "undefined-reference"),
            WarningKind::Unimplemented => write!(f, "unimplemented"),
            WarningKind::Unused => write!(f, "unused"),
        }
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Warnings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    fn push(&mut self, kind: WarningKind, message: String) {
        let warning = Warning { kind, message };
        match kind {
            WarningKind::Unused => info!("{warning}"),
            _ => warn!("{warning}"),
        }
        self.0.push(warning);
    }
    pub fn red_flag(&mut self, message: impl Into<String>) {
        self.push(WarningKind::RedFlag, message.into());
    }
    pub fn unimplemented(&mut self, message: impl Into<String>) {
        self.push(WarningKind::Unimplemented, message.into());
    }
    pub fn undefined_reference(&mut self, kind: &str, name: &str, usage: &str) {
        self.push(
            WarningKind::UndefinedReference,
            format!("Undefined {kind} '{name}' used by {usage}"),
        );
    }
    pub fn unused(&mut self, kind: &str, name: &str) {
        self.push(WarningKind::Unused, format!("{kind} '{name}' is never used"));
    }
    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.0.iter()
    }
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.0.iter().filter(move |w| w.kind == kind)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_warnings_are_logged() {
        let mut warnings = Warnings::new();
        warnings.undefined_reference("prefix-list", "PL1", "route-map RM entry 10");
        warnings.unused("peer-session template", "OLD");
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings.of_kind(WarningKind::Unused).count(), 1);
        assert!(logs_contain(
            "[undefined-reference] Undefined prefix-list 'PL1' used by route-map RM entry 10"
        ));
        assert!(logs_contain("[unused] peer-session template 'OLD' is never used"));
    }
}
