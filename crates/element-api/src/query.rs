// Query parameters understood by the Element IoT API
//
// Parameters are kept in insertion order so request URLs are stable and
// readable in logs. `auth` is never stored here; `ApiClient` prepends it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// ── Parameter names ─────────────────────────────────────────────────

pub const AUTH: &str = "auth";
pub const LIMIT: &str = "limit";
pub const SORT: &str = "sort";
pub const SORT_DIRECTION: &str = "sort_direction";
pub const AFTER: &str = "after";
pub const BEFORE: &str = "before";
pub const RETRIEVE_AFTER: &str = "retrieve_after";
pub const PACKET_TYPE: &str = "packet_type";
pub const TIMEOUT: &str = "timeout";

// ── Typed values ────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    MeasuredAt,
    InsertedAt,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Radio direction of a packet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum PacketType {
    Up,
    Down,
}

/// A time bound for `after` / `before`.
///
/// Naive times go to the server as-is (`2024-08-13T13:05:00`); zone-aware
/// times are converted to UTC and sent with a trailing `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Utc(value)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Utc(value.with_timezone(&Utc))
    }
}

// Sub-microsecond precision is dropped, matching the server's resolution.
fn write_iso(f: &mut fmt::Formatter<'_>, naive: &NaiveDateTime) -> fmt::Result {
    if naive.nanosecond() / 1_000 == 0 {
        write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S"))
    } else {
        write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive(naive) => write_iso(f, naive),
            Self::Utc(utc) => {
                write_iso(f, &utc.naive_utc())?;
                f.write_str("Z")
            }
        }
    }
}

/// Parses RFC 3339 (zone-aware) or `YYYY-MM-DDTHH:MM:SS[.f]` (naive).
impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match DateTime::parse_from_rfc3339(s) {
            Ok(aware) => Ok(aware.into()),
            Err(_) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(Self::Naive),
        }
    }
}

// ── Query ───────────────────────────────────────────────────────────

/// Ordered list of query parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, replacing an earlier value under the same key.
    pub fn set(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.insert(key, value.to_string());
        self
    }

    /// Like [`set`](Self::set), skipping `None`.
    pub fn set_opt<V: fmt::Display>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    fn insert(&mut self, key: &'static str, value: String) {
        if let Some(slot) = self.params.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.params.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Copy of this query with `key` removed.
    pub fn without(&self, key: &str) -> Self {
        Self {
            params: self
                .params
                .iter()
                .filter(|(k, _)| *k != key)
                .cloned()
                .collect(),
        }
    }

    /// Copy of this query continuing after `cursor`.
    pub fn with_cursor(&self, cursor: &str) -> Self {
        self.clone().set(RETRIEVE_AFTER, cursor)
    }

    /// The `timeout` parameter, in milliseconds.
    pub fn timeout_ms(&self) -> Option<u64> {
        self.get(TIMEOUT).and_then(|v| v.parse().ok())
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
