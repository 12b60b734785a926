// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Conversion errors. These are reserved to broken invariants of the input
//! model or of the produced configuration: undefined references and unsupported
//! features are reported as [`crate::warnings::Warning`]s instead.

use policy::PolicyError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Route-map {0} entry {1} continues to entry {2}, which does not follow it")]
    BackwardContinue(String, u32, u32),
    #[error("Invalid converter settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid vendor configuration: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
