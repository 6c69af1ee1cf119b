// Blocking HTTP client for the Element IoT REST API.
//
// Base: the API location, e.g. `https://element-iot.com/api/v1/`
// Auth: `auth=<key>` query parameter, always first.

use std::fmt;
use std::io::BufReader;

use reqwest::StatusCode;
use reqwest::blocking::Response;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::query::{AUTH, Query};
use crate::transport::TransportConfig;

/// Blocking client for one Element IoT instance.
///
/// Owns the HTTP connection pool and the API key. Every request suspends
/// the caller until the response (or its timeout) arrives.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    api_key: SecretString,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API location, key, and transport config.
    pub fn new(
        api_location: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, api_location, api_key)
    }

    /// Wrap an existing `reqwest::blocking::Client`.
    pub fn with_client(
        http: reqwest::blocking::Client,
        api_location: &str,
        api_key: SecretString,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(api_location)?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Ensure the base ends with `/` so relative paths join beneath it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    /// The normalized API location.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn get(&self, path: &str, query: &Query) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!(url = %url, params = ?query.pairs(), "GET");

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(query.pairs().len() + 1);
        pairs.push((AUTH, self.api_key.expose_secret()));
        pairs.extend(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));

        let resp = self
            .http
            .get(url.clone())
            .query(&pairs)
            .send()
            .map_err(|e| Error::Transport(e.without_url()))?;

        let status = resp.status();
        trace!(url = %url, status = status.as_u16(), "response");
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Self::parse_error(status, &url, resp))
        }
    }

    fn parse_error(status: StatusCode, url: &Url, resp: Response) -> Error {
        if status == StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        let raw = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<Value>(&raw)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        Error::Http {
            status: status.as_u16(),
            message,
            url: url.to_string(),
        }
    }
}

/// Pull a human message out of an error payload.
///
/// Accepts `{"body": {"error": ..}}`, `{"body": ".."}`, `{"error": ..}`
/// and `{"message": ..}`.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    let candidates = [
        value.pointer("/body/error"),
        value.pointer("/body/message"),
        value.get("body"),
        value.get("error"),
        value.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_owned))
}

impl Fetch for ApiClient {
    fn fetch(&self, path: &str, query: &Query) -> Result<Envelope, Error> {
        let resp = self.get(path, query)?;
        let body = resp.text().map_err(|e| Error::Transport(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))
    }

    fn open_stream(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<Box<dyn std::io::BufRead + Send>, Error> {
        let resp = self.get(path, query)?;
        Ok(Box::new(BufReader::new(resp)))
    }
}

// ── Identity ─────────────────────────────────────────────────────────

/// `*************EFG`: only the last three characters survive.
fn mask_key(key: &str) -> String {
    let hidden = key.chars().count().saturating_sub(3);
    let tail: String = key.chars().skip(hidden).collect();
    format!("{}{tail}", "*".repeat(hidden))
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_location", &self.base_url.as_str())
            .field("api_key", &mask_key(self.api_key.expose_secret()))
            .finish_non_exhaustive()
    }
}

/// Two clients are equal when they target the same location with the same key.
impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.api_key.expose_secret() == other.api_key.expose_secret()
    }
}
