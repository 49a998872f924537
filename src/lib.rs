//! Audit-trailed engagement database
//!
//! Typed message records over a transactional, path-addressed document
//! store, with an enforced audit trail: every write to a tracked record
//! atomically appends a full snapshot of the record to an append-only
//! history collection, in the same commit.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use engagementdb::{
//!     DocPath, DocumentStore, EngagementDatabase, Message, MessageDirection,
//!     MessageOrigin, MessageStatus, Provenance, Timestamp,
//! };
//!
//! # fn main() -> engagementdb::Result<()> {
//! let store = Arc::new(DocumentStore::new());
//! let db = EngagementDatabase::init(store, DocPath::parse("databases/pilot")?)?;
//!
//! let provenance = Provenance::new(
//!     "user@example.com",
//!     "https://example.com/pipeline.git",
//!     "daily_sync",
//!     "0123abcd",
//! );
//!
//! let message = Message::new(
//!     "hello",
//!     Timestamp::now(),
//!     "participant-1",
//!     MessageDirection::In,
//!     "telegram",
//!     MessageStatus::Live,
//!     "pilot_demographics",
//!     vec![],
//!     MessageOrigin::new("rapid-pro-123", "rapid_pro"),
//! );
//!
//! let written = db.set_message(&message, provenance.origin("demo", &())?)?;
//! assert!(written.last_updated.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`engagement_core`](engagement_core): shared types: paths, timestamps,
//!   document conversion, the error taxonomy.
//! - [`engagement_docstore`](engagement_docstore): the transactional
//!   document store: atomic batches, read-validated transactions, ordered
//!   cursor queries.
//! - [`engagement_client`](engagement_client): the database client: audited
//!   writes, consistent batched reads, the command log.
//! - [`engagement_filesync`](engagement_filesync): name-addressed export
//!   sync to external blob storage, with bounded retry.

pub use engagement_client::{
    database::EngagementDatabase,
    models::{
        latest_labels, CommandLogEntry, HistoryEntry, HistoryEntryOrigin, Label, Message,
        MessageDirection, MessageOrigin, MessageStatus, Provenance, TrackedDoc,
    },
    paths::DbPaths,
    reader,
};
pub use engagement_core::{from_doc, to_doc, DocPath, Error, JsonMap, Result, Timestamp};
pub use engagement_docstore::{
    Condition, Direction, DocumentStore, FieldOp, OrderBy, Query, Transaction, UnitOfWork,
    WriteBatch, WriteOp,
};
pub use engagement_filesync::{
    BlobInfo, BlobTransport, FileSync, FlakyTransport, MemoryTransport, RetryConfig,
    TransportError,
};
