//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use element_config::ConfigError;
use element_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const DECODE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Element API")]
    #[diagnostic(
        code(element::connection_failed),
        help(
            "Check --api-location (or the profile's api_location) and your network.\n\
             Self-signed certificates need --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: element_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Invalid API key")]
    #[diagnostic(
        code(element::auth_failed),
        help("Verify the key under Account > API keys on the Element platform.")
    )]
    AuthFailed,

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(element::no_credentials),
        help(
            "Pass --api-key, set ELEMENT_API_KEY,\n\
             or add api_key / api_key_env to the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(element::not_found), help("{hint}"))]
    NotFound { message: String, hint: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(code(element::api_error))]
    Api {
        #[source]
        source: element_api::Error,
    },

    #[error("{source}")]
    #[diagnostic(
        code(element::timeout),
        help("Raise --timeout (seconds) or, for streams, --query-timeout (milliseconds).")
    )]
    Timeout {
        #[source]
        source: element_api::Error,
    },

    // ── Decoding ─────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(element::decode),
        help("Check the model name and the payload: DL-SHT35, DL-BLG and DL-ATM41 are supported.")
    )]
    Decode(#[from] element_codec::DecodeError),

    #[error("{0}")]
    #[diagnostic(code(element::decode))]
    PayloadMissing(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(element::usage), help("Pass exactly one of --device or --folder."))]
    Usage { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(element::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(element::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(element::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(element::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(element::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Decode(_) | Self::PayloadMissing(_) => exit_code::DECODE,
            Self::Usage { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    fn from_api(err: element_api::Error) -> Self {
        if matches!(err, element_api::Error::InvalidApiKey) {
            Self::AuthFailed
        } else if err.is_timeout() {
            Self::Timeout { source: err }
        } else if err.is_connect() {
            Self::ConnectionFailed { source: err }
        } else if err.is_not_found() {
            Self::NotFound {
                message: err.to_string(),
                hint: "Run: element folders, then element devices <FOLDER>".into(),
            }
        } else {
            Self::Api { source: err }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => Self::from_api(e),
            CoreError::Decode(e) => Self::Decode(e),
            CoreError::PayloadMissing { .. } => Self::PayloadMissing(err.to_string()),
            CoreError::Usage { message } => Self::Usage {
                message: message.into(),
            },
            CoreError::AddressNotFound { .. } => Self::NotFound {
                message: err.to_string(),
                hint: "No device in the folder reports this sensor id. Check --folder.".into(),
            },
            CoreError::SensorIdMissing { .. } | CoreError::FolderUnknown { .. } => Self::NotFound {
                message: err.to_string(),
                hint: "Run: element device <ADDRESS> to inspect its readings and folders".into(),
            },
        }
    }
}

impl From<element_api::Error> for CliError {
    fn from(err: element_api::Error) -> Self {
        Self::from_api(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
