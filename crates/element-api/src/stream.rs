// Streaming ingestion
//
// `…/stream` endpoints answer with newline-delimited JSON records instead of
// a paged envelope. The ingestor drains the body into the same envelope
// shape the pager produces, so callers never see the difference.

use std::io::BufRead;

use serde_json::Value;
use tracing::{debug, trace};

use crate::client::error_message;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::query::{LIMIT, Query};

/// Status the service uses when a streamed query ran out of time.
pub const QUERY_TIMEOUT_STATUS: u16 = 504;

/// Read `{path}/stream` to the end and collect its records.
///
/// `limit` is dropped (streams are unbounded). A server-side query timeout,
/// whether signalled by the response status or by an in-stream error record,
/// surfaces as [`Error::QueryTimeout`] carrying the requested `timeout`.
pub fn ingest_stream<F: Fetch + ?Sized>(
    fetcher: &F,
    path: &str,
    query: &Query,
) -> Result<Envelope, Error> {
    let stream_path = format!("{}/stream", path.trim_end_matches('/'));
    let query = query.without(LIMIT);

    let reader = fetcher
        .open_stream(&stream_path, &query)
        .map_err(|e| enrich(e, &query))?;
    let records = read_records(reader, &stream_path, &query)?;

    if records.is_empty() {
        debug!(path = %stream_path, "stream returned no records");
        return Ok(Envelope::empty());
    }
    debug!(path = %stream_path, records = records.len(), "stream drained");
    Ok(Envelope::from_records(records))
}

fn read_records(reader: impl BufRead, path: &str, query: &Query) -> Result<Vec<Value>, Error> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Value =
            serde_json::from_str(line).map_err(|e| Error::deserialization(&e, line))?;
        if let Some(err) = error_record(&record, path, query) {
            return Err(err);
        }

        trace!(path, index = records.len(), "stream record");
        records.push(record);
    }
    Ok(records)
}

/// An in-stream `{"ok": false, "status": ..}` record, as an error.
fn error_record(record: &Value, path: &str, query: &Query) -> Option<Error> {
    if record.get("ok").and_then(Value::as_bool) != Some(false) {
        return None;
    }

    let status = record
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(500);
    if status == QUERY_TIMEOUT_STATUS {
        return Some(query_timeout(query));
    }

    Some(Error::Http {
        status,
        message: error_message(record).unwrap_or_else(|| record.to_string()),
        url: path.to_owned(),
    })
}

fn enrich(err: Error, query: &Query) -> Error {
    match err {
        Error::Http { status, .. } if status == QUERY_TIMEOUT_STATUS => query_timeout(query),
        other => other,
    }
}

fn query_timeout(query: &Query) -> Error {
    Error::QueryTimeout {
        status: QUERY_TIMEOUT_STATUS,
        timeout_ms: query.timeout_ms(),
    }
}
