use chrono::{DateTime, Utc};
use element_api::PacketType;
use element_codec::{Decoded, DeviceModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// A raw radio packet as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub device_id: String,

    pub packet_type: PacketType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transceived_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// Hex-encoded uplink payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_encoded: Option<String>,

    /// Radio metadata (frame counter, gateway stats).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Packet {
    /// Decode the payload with the codec for `model`.
    pub fn decode(
        &self,
        model: DeviceModel,
        expected_version: Option<u8>,
    ) -> Result<Decoded, CoreError> {
        let payload = self
            .payload_encoded
            .as_deref()
            .ok_or_else(|| CoreError::PayloadMissing {
                id: self.id.clone(),
            })?;
        Ok(element_codec::decode_hex(model, payload, expected_version)?)
    }
}
