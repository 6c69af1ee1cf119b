use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SensorId;

/// Key of the vendor sensor id inside `data`.
pub const SENSOR_ID_FIELD: &str = "device_id";

/// One parsed measurement set as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub id: String,

    /// Platform device id (a UUID), not the vendor sensor id.
    #[serde(default)]
    pub device_id: String,

    pub measured_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// Parsed fields, e.g. `air_temperature`, `battery_voltage`, `device_id`.
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_id: Option<String>,
}

impl Reading {
    /// The vendor sensor id carried in `data.device_id`.
    pub fn sensor_id(&self) -> Option<SensorId> {
        self.data
            .get(SENSOR_ID_FIELD)
            .and_then(Value::as_u64)
            .map(SensorId)
    }

    /// A numeric field of `data`.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(Value::as_f64)
    }
}
