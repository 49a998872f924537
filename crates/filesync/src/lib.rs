//! Sync pipeline outputs to external blob storage
//!
//! Exports (CSVs, analysis snapshots) are published by name into folders of
//! an external blob store. This crate provides the name-addressed,
//! idempotent upload layer: [`FileSync`] over a pluggable [`BlobTransport`],
//! with every transport call wrapped in bounded exponential-backoff retry
//! ([`RetryConfig`]). The engagement database itself never retries; network
//! flakiness is a blob-storage concern and is contained here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod retry;
pub mod sync;
pub mod transport;

pub use retry::RetryConfig;
pub use sync::FileSync;
pub use transport::{BlobInfo, BlobTransport, FlakyTransport, MemoryTransport, TransportError};
