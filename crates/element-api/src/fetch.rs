use std::io::BufRead;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::query::Query;

/// One bounded request against a resource path.
///
/// Paths are relative to the API location (`tags`, `devices/by-name/X/readings`).
/// Implementations add authentication; callers never pass `auth`.
pub trait Fetch {
    /// GET `path` and parse the JSON envelope.
    fn fetch(&self, path: &str, query: &Query) -> Result<Envelope, Error>;

    /// GET `path` and hand back the body as a line reader, unparsed.
    fn open_stream(&self, path: &str, query: &Query) -> Result<Box<dyn BufRead + Send>, Error>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, path: &str, query: &Query) -> Result<Envelope, Error> {
        (**self).fetch(path, query)
    }

    fn open_stream(&self, path: &str, query: &Query) -> Result<Box<dyn BufRead + Send>, Error> {
        (**self).open_stream(path, query)
    }
}
