use serde::{Deserialize, Serialize};

use super::{Reading, SensorId, TagRef};

/// A device as returned by `tags/{folder}/devices` and `devices/{address}`.
///
/// `name` is the device *address* (e.g. `DEC0054B0`). Detail responses also
/// embed the most recent readings, which is how the sensor id of a device is
/// discovered without a separate readings query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default)]
    pub tags: Vec<TagRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_readings: Vec<Reading>,
}

impl Device {
    /// The address used in `devices/by-name/{name}` paths.
    pub fn address(&self) -> &str {
        &self.name
    }

    /// Slug of the first folder the device is assigned to.
    pub fn primary_folder(&self) -> Option<&str> {
        self.tags.first().map(|t| t.slug.as_str())
    }

    /// The embedded reading with the latest `measured_at`.
    pub fn latest_reading(&self) -> Option<&Reading> {
        self.last_readings.iter().max_by_key(|r| r.measured_at)
    }

    /// Sensor id of the most recent embedded reading.
    pub fn sensor_id(&self) -> Option<SensorId> {
        self.latest_reading().and_then(Reading::sensor_id)
    }
}
