// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral configuration. Vendor configurations are converted into
//! this representation: named routing policies made of statements, packet
//! policies, route filters and a BGP process whose peers are fully resolved.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod bgp;
pub mod community;
pub mod configuration;
pub mod display;
pub mod errors;
#[cfg(any(test, feature = "testing"))]
pub mod eval;
pub mod filters;
pub mod packet_policy;
pub mod routing_policy;
pub mod statement;

pub use configuration::Configuration; // re-export
pub use errors::{PolicyError, PolicyResult}; // re-export
pub use routing_policy::RoutingPolicy; // re-export
pub use statement::{BooleanExpr, DefaultAction, Statement}; // re-export
