use std::time::Duration;

use element_api::transport::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything needed to talk to one Element IoT instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://element-iot.com/api/v1/`.
    pub api_location: Url,
    pub api_key: SecretString,
    /// Bounds a single request, never a pagination or resolution loop.
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl ClientConfig {
    pub fn new(api_location: Url, api_key: SecretString) -> Self {
        Self {
            api_location,
            api_key,
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
