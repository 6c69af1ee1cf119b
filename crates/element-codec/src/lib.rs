//! Decoders for the binary uplink payloads of Decentlab sensors.
//!
//! A payload is interpreted through a [`ProtocolLayout`]: a declarative,
//! per-model and per-version description of which sensor blocks exist, how
//! many 16-bit words each block occupies, and how those words convert into
//! physical quantities. The [`Registry`] keys layouts by
//! `(DeviceModel, protocol version)`; adding a model means adding a layout,
//! never touching the decode loop.
//!
//! ```
//! use element_codec::{DeviceModel, decode_hex};
//!
//! let reading = decode_hex(DeviceModel::Sht35, "0254A60003783F596E0C17", None).unwrap();
//! assert_eq!(reading.device_id(), Some(21670));
//! assert_eq!(reading.value("Battery voltage"), Some(3.095));
//! ```

pub mod decentlab;
pub mod error;
pub mod layout;
pub mod model;
pub mod registry;
pub mod value;

pub use error::DecodeError;
pub use layout::{Channel, Conversion, Derivation, Encoding, ProtocolLayout, SensorBlock};
pub use model::DeviceModel;
pub use registry::Registry;
pub use value::{Decoded, Field, Measurement};

/// Decode `payload` with the built-in layouts.
///
/// When `expected_version` is given, a payload carrying any other protocol
/// version is rejected before its fields are read.
pub fn decode(
    model: DeviceModel,
    payload: &[u8],
    expected_version: Option<u8>,
) -> Result<Decoded, DecodeError> {
    Registry::builtin().decode(model, payload, expected_version)
}

/// Decode a hex-encoded payload (as found in packet `payload_encoded`).
pub fn decode_hex(
    model: DeviceModel,
    payload: &str,
    expected_version: Option<u8>,
) -> Result<Decoded, DecodeError> {
    let bytes = hex::decode(payload.trim())?;
    decode(model, &bytes, expected_version)
}
