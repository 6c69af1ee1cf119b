use thiserror::Error;

/// Top-level error type for the `element-api` crate.
///
/// Covers transport, HTTP status, envelope and stream failures.
/// `element-core` wraps these without rewriting them, so the remote status
/// code always reaches the caller.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (TLS backend, header values).
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Reading a streamed body failed midway.
    #[error("stream read error: {0}")]
    StreamIo(#[from] std::io::Error),

    // ── Remote ──────────────────────────────────────────────────────
    /// Non-2xx response.
    #[error("HTTP Error {status}: {message}")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    /// The API key was rejected.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The server gave up executing a streamed query.
    #[error(
        "Database timeout. Try allowing more time by using the timeout query param \
         (in milliseconds). Current timeout: {}.",
        display_timeout(.timeout_ms)
    )]
    QueryTimeout { status: u16, timeout_ms: Option<u64> },

    // ── Data ────────────────────────────────────────────────────────
    /// A page that must be concatenated did not carry an array body.
    #[error("cannot handle pagination when `body` is not an array")]
    PaginationBodyNotArray,

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[allow(clippy::ref_option)]
fn display_timeout(timeout_ms: &Option<u64>) -> String {
    timeout_ms.map_or_else(|| "default".to_owned(), |ms| ms.to_string())
}

impl Error {
    /// Remote HTTP status, when the failure came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::QueryTimeout { status, .. } => Some(*status),
            Self::InvalidApiKey => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_query_timeout(&self) -> bool {
        matches!(self, Self::QueryTimeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Server-side query timeout or client-side request timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::QueryTimeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Build a `Deserialization` error carrying a bounded preview of `body`.
    pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}
