//! Audit-trailed message store client
//!
//! Typed records over a transactional document store, with one rule enforced
//! throughout: every write to a tracked record atomically appends a full
//! snapshot of the record to an append-only history collection. The history
//! is the record of record; the live collections are a materialised view of
//! the latest snapshots.
//!
//! [`EngagementDatabase`] is the entry point. Records are [`Message`] (the
//! only tracked kind today), [`HistoryEntry`] (the audit trail), and
//! [`CommandLogEntry`] (append-only invocation log, untracked). Reads come
//! in single-request and batched forms; the batched forms page with cursors
//! and resolve concurrent writes latest-wins, see [`reader`] for the exact
//! guarantee.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod models;
pub mod paths;
pub mod reader;

pub use database::EngagementDatabase;
pub use models::{
    CommandLogEntry, HistoryEntry, HistoryEntryOrigin, Label, Message, MessageDirection,
    MessageOrigin, MessageStatus, Provenance, TrackedDoc,
};
pub use paths::DbPaths;
