// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for failures when building the vendor configuration model.
//! These errors can only be raised while the object graph is populated
//! (normally by a parser). Once built, the graph is assumed to be consistent.

use ipnet::IpNet;
use thiserror::Error;

use crate::bgp::AddressFamily;

/// The reasons why we may refuse to build a piece of the model
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Duplicate sequence {1} in {0}")]
    DuplicateSequence(String, u32),
    #[error("Prefix {1} has the wrong IP version for prefix list {0}")]
    IncompatiblePrefix(String, IpNet),
    #[error("Invalid length range ge {1:?} le {2:?} for prefix {0}")]
    InvalidLengthRange(IpNet, Option<u8>, Option<u8>),
    #[error("A {0} with name '{1}' already exists")]
    DuplicateName(&'static str, String),
    #[error("A neighbor with key '{0}' already exists in VRF '{1}'")]
    DuplicateNeighbor(String, String),
    #[error("Address family {0} is already configured")]
    DuplicateAddressFamily(AddressFamily),
    #[error("Priority {1} is already used, cannot inherit peer-policy '{0}'")]
    DuplicatePolicyPriority(String, u32),
}

/// Result-like type for model construction
pub type ModelResult = Result<(), ModelError>;
