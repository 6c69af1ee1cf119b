// element-api: blocking Rust client for the Element IoT REST API
//
// `ApiClient` is the only type that speaks HTTP. Everything above it
// (pagination, stream ingestion, the identity resolver in `element-core`)
// goes through the `Fetch` trait, so it can be driven by `ScriptedFetch`
// in tests.

pub mod client;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod pager;
pub mod query;
pub mod stream;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::Error;
pub use fetch::Fetch;
pub use pager::paginate;
pub use query::{PacketType, Query, SortDirection, SortField, Timestamp};
pub use stream::{QUERY_TIMEOUT_STATUS, ingest_stream};
pub use transport::TransportConfig;
