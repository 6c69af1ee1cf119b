// Element IoT response envelope
//
// Every collection and detail endpoint answers with
// `{ "body": ..., "ok": true, "status": 200, "retrieve_after_id": "..." }`.
// The cursor is present only while more pages remain.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

fn default_ok() -> bool {
    true
}

fn default_status() -> u16 {
    200
}

/// Parsed response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub body: Value,

    #[serde(default = "default_ok")]
    pub ok: bool,

    #[serde(default = "default_status")]
    pub status: u16,

    /// Opaque continuation cursor; `None` means this was the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieve_after_id: Option<String>,
}

impl Envelope {
    /// A successful envelope around an array of records, with no cursor.
    pub fn from_records(records: Vec<Value>) -> Self {
        Self {
            body: Value::Array(records),
            ok: true,
            status: 200,
            retrieve_after_id: None,
        }
    }

    /// `{ "body": [], "ok": true, "status": 200 }`
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn cursor(&self) -> Option<&str> {
        self.retrieve_after_id.as_deref()
    }

    /// Array body as a slice; `None` for object or scalar bodies.
    pub fn records(&self) -> Option<&[Value]> {
        self.body.as_array().map(Vec::as_slice)
    }

    /// True when the body is an empty array (or no array at all).
    pub fn is_empty(&self) -> bool {
        self.records().is_none_or(<[Value]>::is_empty)
    }

    /// Deserialize an array body into typed records.
    pub fn into_records<T: DeserializeOwned>(self) -> Result<Vec<T>, Error> {
        match self.body {
            Value::Array(_) => decode_body(self.body),
            other => Err(Error::Deserialization {
                message: "expected an array body".into(),
                body: other.to_string(),
            }),
        }
    }

    /// Deserialize an object body into one typed record.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, Error> {
        decode_body(self.body)
    }
}

fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, Error> {
    // Keep a copy for the error path; bodies are small detail or page payloads.
    let raw = body.to_string();
    serde_json::from_value(body).map_err(|e| Error::deserialization(&e, &raw))
}
