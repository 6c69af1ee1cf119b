use thiserror::Error;

/// Every way a payload can fail to decode.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The payload ended before the header or a flagged sensor block was complete.
    #[error("truncated payload: needed {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// No layout is registered for this model name.
    #[error("unsupported device model: {0}")]
    UnsupportedModel(String),

    /// The model is known, but not at the version embedded in the payload.
    #[error("unsupported protocol version {version} for {model}")]
    UnsupportedVersion { model: String, version: u8 },

    /// The caller pinned a protocol version and the payload disagrees.
    #[error("protocol version {embedded} doesn't match v{expected}")]
    VersionMismatch { embedded: u8, expected: u8 },

    /// A layout refers to a word or channel its block does not have.
    #[error("invalid layout for {model}: channel '{channel}' has no source value")]
    InvalidLayout { model: String, channel: &'static str },

    #[error("invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
