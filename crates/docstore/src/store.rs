//! The in-memory document store
//!
//! `BTreeMap<DocPath, VersionedDoc>` behind a `parking_lot::RwLock`, with an
//! `AtomicU64` commit counter for versioning and an `AtomicU64` clock issuing
//! strictly monotonic write-time markers.
//!
//! # Design notes
//!
//! - Each path stores only its latest document plus the version of the commit
//!   that wrote it; versions drive optimistic transaction validation.
//! - Batches validate and apply under one write lock, so a batch is visible
//!   all-or-nothing and two batches never interleave.
//! - Reads clone documents out under the read lock; the store never hands out
//!   references into its own state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use engagement_core::{DocPath, Error, JsonMap, Result, Timestamp};

use crate::batch::{WriteBatch, WriteOp};
use crate::query::Query;
use crate::transaction::Transaction;

/// A stored document plus the version of the commit that last wrote it
#[derive(Debug, Clone)]
pub(crate) struct VersionedDoc {
    pub(crate) doc: JsonMap,
    pub(crate) version: u64,
}

/// Transactional, path-addressed, in-memory document store
#[derive(Debug)]
pub struct DocumentStore {
    /// Main data store: ordered map from path to versioned document
    data: RwLock<BTreeMap<DocPath, VersionedDoc>>,
    /// Commit counter; every document written by commit N carries version N
    version: AtomicU64,
    /// Last issued write-time marker, in microseconds since epoch
    clock: AtomicU64,
}

impl DocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            version: AtomicU64::new(0),
            clock: AtomicU64::new(0),
        }
    }

    /// Issue a server-assigned write-time marker
    ///
    /// Strictly monotonic: each call returns a timestamp greater than every
    /// previously issued one, even when many calls share a clock tick.
    pub fn write_time(&self) -> Timestamp {
        let now = Timestamp::now().as_micros();
        let issued = self
            .clock
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        // fetch_update returns the previous value; recompute the stored one
        Timestamp::from_micros(now.max(issued + 1))
    }

    /// Point lookup; `None` when no document exists at the path
    pub fn get(&self, path: &DocPath) -> Option<JsonMap> {
        self.data.read().get(path).map(|vd| vd.doc.clone())
    }

    /// Point lookup returning the document and its commit version together
    ///
    /// Transactions use this so the version they validate against is the one
    /// belonging to the document they actually read.
    pub(crate) fn get_versioned(&self, path: &DocPath) -> Option<(JsonMap, u64)> {
        self.data
            .read()
            .get(path)
            .map(|vd| (vd.doc.clone(), vd.version))
    }

    /// Run a query over the documents directly inside `collection`
    ///
    /// Returns matching documents in the query's order (store path order when
    /// the query has no ordering clauses). `start_after` requires at least
    /// one ordering clause.
    pub fn query(&self, collection: &DocPath, query: &Query) -> Result<Vec<JsonMap>> {
        if query.start_after_clause().is_some() && query.order_clauses().is_empty() {
            return Err(Error::Precondition(
                "start_after requires an order_by clause".to_string(),
            ));
        }

        let prefix = format!("{collection}/");
        let data = self.data.read();
        let mut results: Vec<JsonMap> = data
            .range(collection.clone()..)
            .take_while(|(path, _)| *path == collection || path.to_string().starts_with(&prefix))
            .filter(|(path, _)| path.is_in_collection(collection))
            .filter(|(_, vd)| query.matches(&vd.doc))
            .map(|(_, vd)| vd.doc.clone())
            .collect();
        drop(data);

        if !query.order_clauses().is_empty() {
            results.sort_by(|a, b| query.cmp_order_keys(&query.order_key(a), &query.order_key(b)));
        }

        if let Some(cursor) = query.start_after_clause() {
            results.retain(|doc| {
                query.cmp_order_keys(&query.order_key(doc), cursor) == std::cmp::Ordering::Greater
            });
        }

        if let Some(limit) = query.limit_clause() {
            results.truncate(limit);
        }

        Ok(results)
    }

    /// Hand out an empty batch for staging writes
    ///
    /// The caller owns the batch and must pass it to [`DocumentStore::commit`]
    /// exactly once.
    pub fn batch(&self) -> WriteBatch {
        WriteBatch::new()
    }

    /// Begin an optimistic transaction against this store
    pub fn transaction(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Commit a batch: validate, then apply every operation atomically
    ///
    /// A `Create` against an occupied path fails the whole batch with
    /// `Error::AlreadyExists`; no operation of a failed batch is applied.
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.apply(batch.into_ops(), &[])
    }

    /// Validate a read set and apply staged operations under one write lock
    ///
    /// `reads` pairs each read path with the document version observed at
    /// read time (`None` = absent). Any divergence aborts with
    /// `Error::TransactionConflict` before anything is applied.
    pub(crate) fn apply(&self, ops: Vec<WriteOp>, reads: &[(DocPath, Option<u64>)]) -> Result<()> {
        let mut data = self.data.write();

        // Phase 1: validation. First-committer-wins on the read set, then
        // create-mode occupancy checks against current state.
        for (path, read_version) in reads {
            let current = data.get(path).map(|vd| vd.version);
            if current != *read_version {
                return Err(Error::TransactionConflict { path: path.clone() });
            }
        }
        for op in &ops {
            if let WriteOp::Create { path, .. } = op {
                if data.contains_key(path) {
                    return Err(Error::AlreadyExists { path: path.clone() });
                }
            }
        }

        // Phase 2: apply. All ops in the group share one commit version.
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let op_count = ops.len();
        for op in ops {
            match op {
                WriteOp::Create { path, doc } | WriteOp::Set { path, doc } => {
                    data.insert(path, VersionedDoc { doc, version });
                }
                WriteOp::Merge { path, doc } => {
                    let merged = match data.get(&path) {
                        Some(existing) => {
                            let mut base = existing.doc.clone();
                            base.extend(doc);
                            base
                        }
                        None => doc,
                    };
                    data.insert(path, VersionedDoc { doc: merged, version });
                }
                WriteOp::Delete { path } => {
                    data.remove(&path);
                }
            }
        }

        debug!(version, ops = op_count, reads = reads.len(), "committed write group");
        Ok(())
    }

    /// Number of documents currently stored (all collections)
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
