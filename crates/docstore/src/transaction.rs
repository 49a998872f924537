//! Optimistic transactions
//!
//! A [`Transaction`] tracks every document version it reads alongside a
//! staged write set. Commit validates the read set under the store's write
//! lock (first-committer-wins): if any read document has since been written
//! or deleted, the commit aborts with `Error::TransactionConflict` and
//! nothing is applied. Otherwise the whole write set applies atomically, the
//! same way a plain batch does.
//!
//! Reads observe committed store state only; a transaction does not see its
//! own staged writes. Commit consumes the transaction, so its owner commits
//! exactly once.

use std::collections::BTreeMap;

use engagement_core::{DocPath, JsonMap, Result};

use crate::batch::{UnitOfWork, WriteBatch};
use crate::store::DocumentStore;

/// An optimistic read-validated unit of work against one store
pub struct Transaction<'a> {
    store: &'a DocumentStore,
    /// Path -> version observed at first read (`None` = absent at read time)
    reads: BTreeMap<DocPath, Option<u64>>,
    writes: WriteBatch,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            writes: WriteBatch::new(),
        }
    }

    /// Read a document, recording its version in the validation set
    ///
    /// Re-reading a path keeps the version observed first, so a conflicting
    /// concurrent write between two reads of the same path is still caught
    /// at commit.
    pub fn get(&mut self, path: &DocPath) -> Option<JsonMap> {
        let fetched = self.store.get_versioned(path);
        let version = fetched.as_ref().map(|(_, v)| *v);
        self.reads.entry(path.clone()).or_insert(version);
        fetched.map(|(doc, _)| doc)
    }

    /// Stage a create (fails at commit if the path is occupied)
    pub fn create(&mut self, path: DocPath, doc: JsonMap) {
        self.writes.create(path, doc);
    }

    /// Stage a set (upsert)
    pub fn set(&mut self, path: DocPath, doc: JsonMap) {
        self.writes.set(path, doc);
    }

    /// Stage a field merge
    pub fn merge(&mut self, path: DocPath, doc: JsonMap) {
        self.writes.merge(path, doc);
    }

    /// Stage a delete
    pub fn delete(&mut self, path: DocPath) {
        self.writes.delete(path);
    }

    /// Number of staged write operations
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Validate the read set and apply the write set atomically
    pub fn commit(self) -> Result<()> {
        let reads: Vec<(DocPath, Option<u64>)> = self.reads.into_iter().collect();
        self.store.apply(self.writes.into_ops(), &reads)
    }
}

impl UnitOfWork for Transaction<'_> {
    fn create(&mut self, path: DocPath, doc: JsonMap) {
        Transaction::create(self, path, doc);
    }

    fn set(&mut self, path: DocPath, doc: JsonMap) {
        Transaction::set(self, path, doc);
    }

    fn merge(&mut self, path: DocPath, doc: JsonMap) {
        Transaction::merge(self, path, doc);
    }

    fn delete(&mut self, path: DocPath) {
        Transaction::delete(self, path);
    }
}
