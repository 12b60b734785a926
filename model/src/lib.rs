// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-specific configuration model. This is the object graph built by a
//! configuration parser for a single device: route-maps, filter lists and the
//! BGP process, including the templates that BGP neighbors may inherit from.
//! The graph is owned by a single conversion run.

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

pub mod bgp;
pub mod device;
pub mod display;
pub mod errors;
pub mod lists;
pub mod prefixlist;
pub mod routemap;
pub mod templates;

pub use device::VendorConfig; // re-export
pub use errors::{ModelError, ModelResult}; // re-export
