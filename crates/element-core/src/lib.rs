//! Telemetry access for Element IoT.
//!
//! - **[`TelemetryClient`]**: folder and device listings, readings and
//!   packets (paged or streamed) and identity resolution, over any
//!   [`element_api::Fetch`] implementation.
//! - **[`IdentityCache`]**: per-folder bijection between vendor sensor ids
//!   and device addresses, owned by the client.
//! - **Domain model** ([`model`]): `Folder`, `Device`, `Reading`, `Packet`,
//!   `SensorId`.
//! - **Requests** ([`request`]): `ReadingsQuery`, `PacketsQuery` and the
//!   device-or-folder [`Target`].

pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod request;

pub use client::TelemetryClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::CoreError;
pub use identity::IdentityCache;
pub use model::{Device, Folder, Packet, Reading, SensorId, TagRef};
pub use request::{DEFAULT_LIMIT, PacketsQuery, ReadingsQuery, Target};

// Re-exported so front ends need a single dependency for request values.
pub use element_api::{PacketType, SortDirection, SortField, Timestamp};
pub use element_codec::{Decoded, DeviceModel};
