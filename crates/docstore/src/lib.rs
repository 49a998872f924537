//! In-memory transactional path-addressed document store
//!
//! This crate provides the backend the engagement database client runs
//! against: documents addressed by [`DocPath`](engagement_core::DocPath),
//! collection queries with ordering/filtering/limit/cursor, atomic
//! multi-document write batches, optimistic transactions, and server-assigned
//! monotonic write-time markers.
//!
//! The store never caches documents on behalf of callers: every read fetches
//! fresh state under the lock, so two readers always see independently-fetched
//! data. All mutual exclusion for read-then-write consistency comes from the
//! [`Transaction`] primitive.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod query;
pub mod store;
pub mod transaction;

pub use batch::{UnitOfWork, WriteBatch, WriteOp};
pub use query::{cmp_values, Condition, Direction, FieldOp, OrderBy, Query};
pub use store::DocumentStore;
pub use transaction::Transaction;
