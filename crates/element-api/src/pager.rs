use serde_json::Value;
use tracing::trace;

use crate::envelope::Envelope;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::query::Query;

/// Follow `retrieve_after_id` cursors until the server stops sending one.
///
/// A first response without a cursor is returned untouched, whatever its
/// body. Every later page is concatenated onto the first, which requires
/// both bodies to be arrays. With `max_pages` the loop stops early and the
/// returned envelope keeps the cursor that was not followed.
pub fn paginate<F: Fetch + ?Sized>(
    fetcher: &F,
    path: &str,
    query: &Query,
    max_pages: Option<usize>,
) -> Result<Envelope, Error> {
    let max_pages = max_pages.map(|n| n.max(1));

    let mut merged = fetcher.fetch(path, query)?;
    let mut pages = 1_usize;
    trace!(path, page = pages, cursor = ?merged.cursor(), "fetched page");

    while let Some(cursor) = merged.retrieve_after_id.clone() {
        if max_pages.is_some_and(|max| pages >= max) {
            break;
        }

        let page = fetcher.fetch(path, &query.with_cursor(&cursor))?;
        pages += 1;
        trace!(path, page = pages, cursor = ?page.cursor(), "fetched page");

        let (Value::Array(acc), Value::Array(more)) = (&mut merged.body, page.body) else {
            return Err(Error::PaginationBodyNotArray);
        };
        acc.extend(more);
        merged.retrieve_after_id = page.retrieve_after_id;
        merged.ok = page.ok;
        merged.status = page.status;
    }

    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::query::{LIMIT, RETRIEVE_AFTER};
    use crate::testing::ScriptedFetch;

    #[test]
    fn concatenates_pages_in_order() {
        let fetch = ScriptedFetch::new()
            .page(json!({"body": [{"id": 1}, {"id": 2}], "retrieve_after_id": "c1"}))
            .page(json!({"body": [{"id": 3}], "retrieve_after_id": "c2"}))
            .page(json!({"body": [{"id": 4}]}));

        let query = Query::new().set(LIMIT, 100);
        let env = paginate(&fetch, "tags", &query, None).unwrap();

        assert_eq!(
            env.body,
            json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}])
        );
        assert_eq!(env.cursor(), None);

        let calls = fetch.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].query.get(RETRIEVE_AFTER), None);
        assert_eq!(calls[1].query.get(RETRIEVE_AFTER), Some("c1"));
        assert_eq!(calls[2].query.get(RETRIEVE_AFTER), Some("c2"));
        assert_eq!(calls[2].query.get(LIMIT), Some("100"));
    }

    #[test]
    fn single_object_response_is_returned_as_is() {
        let fetch = ScriptedFetch::new().page(json!({"body": {"id": "abc"}}));
        let env = paginate(&fetch, "devices/dec0054b0", &Query::new(), None).unwrap();
        assert_eq!(env.body, json!({"id": "abc"}));
        assert_eq!(fetch.call_count(), 1);
    }

    #[test]
    fn object_body_with_cursor_fails_on_merge() {
        let fetch = ScriptedFetch::new()
            .page(json!({"body": {"id": "abc"}, "retrieve_after_id": "c1"}))
            .page(json!({"body": [{"id": 1}]}));

        let err = paginate(&fetch, "tags", &Query::new(), None).unwrap_err();
        assert!(matches!(err, Error::PaginationBodyNotArray));
        assert_eq!(
            err.to_string(),
            "cannot handle pagination when `body` is not an array"
        );
        assert_eq!(fetch.call_count(), 2);
    }

    #[test]
    fn max_pages_keeps_unconsumed_cursor() {
        let fetch = ScriptedFetch::new()
            .page(json!({"body": [{"id": 1}], "retrieve_after_id": "c1"}))
            .page(json!({"body": [{"id": 2}]}));

        let env = paginate(&fetch, "tags", &Query::new(), Some(1)).unwrap();
        assert_eq!(env.body, json!([{"id": 1}]));
        assert_eq!(env.cursor(), Some("c1"));
        assert_eq!(fetch.call_count(), 1);
    }

    #[test]
    fn zero_max_pages_still_fetches_once() {
        let fetch = ScriptedFetch::new().page(json!({"body": [], "retrieve_after_id": "c1"}));
        let env = paginate(&fetch, "tags", &Query::new(), Some(0)).unwrap();
        assert_eq!(env.cursor(), Some("c1"));
        assert_eq!(fetch.call_count(), 1);
    }

    #[test]
    fn fetch_errors_propagate_unchanged() {
        let fetch = ScriptedFetch::new()
            .page(json!({"body": [{"id": 1}], "retrieve_after_id": "c1"}))
            .error(Error::Http {
                status: 502,
                message: "Bad Gateway".into(),
                url: "tags".into(),
            });

        let err = paginate(&fetch, "tags", &Query::new(), None).unwrap_err();
        assert_eq!(err.status(), Some(502));
    }
}
