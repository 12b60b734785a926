// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors when building or validating a vendor-neutral configuration

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("A {0} named '{1}' already exists")]
    DuplicateObject(&'static str, String),
    #[error("Policy '{0}' calls undefined policy '{1}'")]
    UndefinedPolicy(String, String),
    #[error("Policy '{0}' refers to undefined {1} '{2}'")]
    UndefinedReference(String, &'static str, String),
    #[error("Interface '{0}' uses undefined packet policy '{1}'")]
    UndefinedPacketPolicy(String, String),
}

pub type PolicyResult = Result<(), PolicyError>;
