// ── Core error types ──
//
// API and codec failures pass through unchanged so the remote status code
// and decode details reach the caller. The variants added here are the
// domain failures: identity resolution and request validation.

use thiserror::Error;

use crate::model::SensorId;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Wrapped layers ───────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] element_api::Error),

    #[error(transparent)]
    Decode(#[from] element_codec::DecodeError),

    // ── Identity resolution ──────────────────────────────────────────
    #[error("unable to find address for station: {id}")]
    AddressNotFound { id: SensorId },

    #[error("no reading of device {address} carries a sensor id")]
    SensorIdMissing { address: String },

    #[error("device {address} is not assigned to any folder")]
    FolderUnknown { address: String },

    // ── Request validation ───────────────────────────────────────────
    #[error("{message}")]
    Usage { message: &'static str },

    #[error("packet {id} has no encoded payload")]
    PayloadMissing { id: String },
}

impl CoreError {
    /// Remote HTTP status, when the failure came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}
