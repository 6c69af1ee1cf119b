//! Scripted in-memory [`Fetch`] for tests.
//!
//! Replies are consumed front to back, one per call, regardless of path.
//! Every call is recorded so tests can assert on paths and parameters.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Cursor};

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::query::Query;

#[derive(Debug)]
enum Reply {
    /// A full envelope, e.g. `{"body": [...], "retrieve_after_id": "c1"}`.
    Page(Value),
    /// Raw NDJSON bytes for `open_stream`.
    Stream(Vec<u8>),
    Error(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Fetch,
    Stream,
}

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub path: String,
    pub query: Query,
}

#[derive(Debug, Default)]
pub struct ScriptedFetch {
    replies: RefCell<VecDeque<Reply>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an envelope for the next call.
    pub fn page(self, envelope: Value) -> Self {
        self.push(Reply::Page(envelope))
    }

    /// Queue `{"body": records}` with no cursor.
    pub fn records(self, records: Value) -> Self {
        self.page(serde_json::json!({ "body": records, "ok": true, "status": 200 }))
    }

    /// Queue a raw stream body for the next call.
    pub fn stream(self, body: impl Into<Vec<u8>>) -> Self {
        self.push(Reply::Stream(body.into()))
    }

    /// Queue a failure for the next call.
    pub fn error(self, err: Error) -> Self {
        self.push(Reply::Error(err))
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }

    fn next(&self, kind: CallKind, path: &str, query: &Query) -> Result<Reply, Error> {
        self.calls.borrow_mut().push(Call {
            kind,
            path: path.to_owned(),
            query: query.clone(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| script_error(path, "no scripted reply left"))
    }
}

fn script_error(path: &str, message: &str) -> Error {
    Error::Http {
        status: 500,
        message: message.to_owned(),
        url: path.to_owned(),
    }
}

impl Fetch for ScriptedFetch {
    fn fetch(&self, path: &str, query: &Query) -> Result<Envelope, Error> {
        match self.next(CallKind::Fetch, path, query)? {
            Reply::Page(value) => {
                let raw = value.to_string();
                serde_json::from_value(value).map_err(|e| Error::deserialization(&e, &raw))
            }
            Reply::Stream(_) => Err(script_error(path, "stream reply scripted for fetch")),
            Reply::Error(err) => Err(err),
        }
    }

    fn open_stream(&self, path: &str, query: &Query) -> Result<Box<dyn BufRead + Send>, Error> {
        match self.next(CallKind::Stream, path, query)? {
            Reply::Stream(bytes) => Ok(Box::new(Cursor::new(bytes))),
            Reply::Page(_) => Err(script_error(path, "page reply scripted for stream")),
            Reply::Error(err) => Err(err),
        }
    }
}
