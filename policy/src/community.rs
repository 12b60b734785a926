// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Standard BGP communities (RFC 1997)

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StandardCommunity(pub u32);

impl StandardCommunity {
    pub const GRACEFUL_SHUTDOWN: StandardCommunity = StandardCommunity(0xFFFF_0000);
    pub const ACCEPT_OWN: StandardCommunity = StandardCommunity(0xFFFF_0001);
    pub const BLACKHOLE: StandardCommunity = StandardCommunity(0xFFFF_029A);
    pub const NO_EXPORT: StandardCommunity = StandardCommunity(0xFFFF_FF01);
    pub const NO_ADVERTISE: StandardCommunity = StandardCommunity(0xFFFF_FF02);
    pub const NO_EXPORT_SUBCONFED: StandardCommunity = StandardCommunity(0xFFFF_FF03);
    pub const NO_PEER: StandardCommunity = StandardCommunity(0xFFFF_FF04);

    #[must_use]
    pub fn new(high: u16, low: u16) -> Self {
        Self((u32::from(high) << 16) | u32::from(low))
    }
    #[must_use]
    pub fn high(self) -> u16 {
        (self.0 >> 16) as u16
    }
    #[must_use]
    pub fn low(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

impl Display for StandardCommunity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.high(), self.low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_community() {
        let c = StandardCommunity::new(65000, 120);
        assert_eq!(c.high(), 65000);
        assert_eq!(c.low(), 120);
        assert_eq!(c.to_string(), "65000:120");
        assert_eq!(StandardCommunity::NO_EXPORT.to_string(), "65535:65281");
    }
}
