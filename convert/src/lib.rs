// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Conversion of vendor-specific device configurations into vendor-neutral ones.
//! Route-maps are compiled into routing policies, BGP neighbors get their
//! template inheritance resolved and are turned into peers with import and
//! export policies.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod bgp;
mod converter;
pub mod emitter;
mod errors;
pub mod filters;
pub mod inherit;
mod namegen;
pub mod pbr;
pub mod routemap;
mod settings;
pub mod warnings;

// re-exports
pub use converter::{Conversion, convert, load_vendor_config};
pub use errors::ConvertError;
pub use settings::{ConverterSettings, ConverterSettingsBuilder};
pub use warnings::{Warning, WarningKind, Warnings};
