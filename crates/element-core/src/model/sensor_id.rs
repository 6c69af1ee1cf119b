use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vendor sensor id (the Decentlab device id), found in reading payloads
/// under `data.device_id` and in the header of every uplink.
///
/// Unrelated to the platform's own device id or the device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub u64);

impl SensorId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SensorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u32> for SensorId {
    fn from(value: u32) -> Self {
        Self(u64::from(value))
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SensorId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
