//! Consistent batched reads
//!
//! Collections can be too large to fetch in one request, and writes keep
//! happening while a multi-page fetch runs. The discipline here:
//!
//! 1. Order by a compound key whose leading component is the write-time
//!    marker, with the record id breaking ties (write-time markers alone are
//!    not guaranteed unique enough for a stable cursor).
//! 2. Fetch pages with "start after the last item of the previous page"
//!    cursors until a short page.
//! 3. Deduplicate the accumulated set by id, keeping the most recently
//!    written occurrence of each.
//!
//! The result is NOT a point-in-time snapshot. A record written between page
//! fetches can appear in two pages in different states, and the final set can
//! mix pre- and post-write states of different records. The dedup pass
//! converts this into "the latest observed version of every record seen at
//! least once during the scan": a best-effort convergent view, which is the
//! strongest guarantee available without multi-page transactions. Callers
//! needing a true snapshot must stop the writers first.

use std::collections::HashSet;

use engagement_core::{Error, JsonMap, Result};
use engagement_docstore::Query;
use tracing::debug;

use crate::models::{HistoryEntry, Message};

/// Fetch a whole result set page by page
///
/// `query` supplies the compound ordering used for cursors (it must have at
/// least one `order_by` clause and no limit/cursor of its own); `fetch_page`
/// runs one page query against the backend. Pages are fetched until one
/// comes back shorter than `batch_size`.
///
/// Writes occurring between page fetches are observed, not excluded: the
/// caller is expected to follow with an id-level dedup pass such as
/// [`dedup_latest_messages`].
pub fn collect_batched<F>(query: &Query, batch_size: usize, mut fetch_page: F) -> Result<Vec<JsonMap>>
where
    F: FnMut(&Query) -> Result<Vec<JsonMap>>,
{
    if batch_size == 0 {
        return Err(Error::Precondition("batch_size must be positive".to_string()));
    }
    if query.order_clauses().is_empty() {
        return Err(Error::Precondition(
            "batched reads require an order_by clause for cursoring".to_string(),
        ));
    }
    if query.limit_clause().is_some() || query.start_after_clause().is_some() {
        return Err(Error::Precondition(
            "batched reads manage limit and cursor themselves".to_string(),
        ));
    }

    let mut results: Vec<JsonMap> = Vec::new();
    let mut cursor: Option<Vec<serde_json::Value>> = None;
    let mut pages = 0usize;

    loop {
        let mut page_query = query.clone().limit(batch_size);
        if let Some(cursor) = cursor.take() {
            page_query = page_query.start_after(cursor);
        }

        let page = fetch_page(&page_query)?;
        pages += 1;
        let short_page = page.len() < batch_size;
        cursor = page.last().map(|doc| query.order_key(doc));
        results.extend(page);

        if short_page {
            break;
        }
    }

    debug!(pages, total = results.len(), batch_size, "batched fetch complete");
    Ok(results)
}

/// Keep only the most recently written version of each message
///
/// Sorts by `last_updated` descending (ids break ties deterministically) and
/// drops all but the first occurrence of each `message_id`. Guarantees the
/// output contains no repeated id.
pub fn dedup_latest_messages(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by(|a, b| {
        b.last_updated
            .cmp(&a.last_updated)
            .then_with(|| a.message_id.cmp(&b.message_id))
    });

    let before = messages.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(messages.len());
    messages.retain(|m| seen.insert(m.message_id.clone()));
    if messages.len() < before {
        debug!(dropped = before - messages.len(), "dropped superseded message versions");
    }

    debug_assert_eq!(
        messages.len(),
        messages.iter().map(|m| &m.message_id).collect::<HashSet<_>>().len()
    );
    messages
}

/// Drop repeated history entries by id, preserving order
///
/// History entries are immutable once written, so two occurrences of an id
/// are identical; the only duplication source is page overlap during a
/// batched fetch.
pub fn dedup_history_by_id(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
    entries.retain(|e| seen.insert(e.history_entry_id.clone()));
    entries
}
