//! Atomic write batches
//!
//! A [`WriteBatch`] stages create/set/merge/delete operations against the
//! store. Nothing is visible until [`DocumentStore::commit`] applies the whole
//! batch under one write lock: callers see all of it or none of it.
//!
//! A batch obtained from the store must be committed exactly once by its
//! owner; components that stage operations onto a caller-supplied batch never
//! commit it themselves.
//!
//! [`DocumentStore::commit`]: crate::store::DocumentStore::commit

use engagement_core::{DocPath, JsonMap};

/// The staging surface shared by [`WriteBatch`] and optimistic transactions
///
/// Components that stage writes onto a caller-supplied unit of work take
/// `&mut impl UnitOfWork`, so the same coordinated write can ride a plain
/// batch or a read-validated transaction. The owner commits; staging
/// components never do.
pub trait UnitOfWork {
    /// Stage a create (fails at commit if the path is occupied)
    fn create(&mut self, path: DocPath, doc: JsonMap);

    /// Stage a set (upsert)
    fn set(&mut self, path: DocPath, doc: JsonMap);

    /// Stage a field merge
    fn merge(&mut self, path: DocPath, doc: JsonMap);

    /// Stage a delete
    fn delete(&mut self, path: DocPath);
}

/// One staged write operation
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Write a document at a path that must not already hold one.
    /// An occupied path fails the entire batch with `Error::AlreadyExists`.
    Create {
        /// Target document path
        path: DocPath,
        /// Full document contents
        doc: JsonMap,
    },
    /// Write a document, replacing any existing document at the path
    Set {
        /// Target document path
        path: DocPath,
        /// Full document contents
        doc: JsonMap,
    },
    /// Merge fields into the document at the path, creating it if absent
    Merge {
        /// Target document path
        path: DocPath,
        /// Fields to overlay onto the existing document
        doc: JsonMap,
    },
    /// Delete the document at the path (no-op if absent)
    Delete {
        /// Target document path
        path: DocPath,
    },
}

impl WriteOp {
    /// The path this operation targets
    pub fn path(&self) -> &DocPath {
        match self {
            WriteOp::Create { path, .. }
            | WriteOp::Set { path, .. }
            | WriteOp::Merge { path, .. }
            | WriteOp::Delete { path } => path,
        }
    }
}

/// An ordered group of writes applied all-or-nothing
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a create (fails the batch at commit if the path is occupied)
    pub fn create(&mut self, path: DocPath, doc: JsonMap) {
        self.ops.push(WriteOp::Create { path, doc });
    }

    /// Stage a set (upsert)
    pub fn set(&mut self, path: DocPath, doc: JsonMap) {
        self.ops.push(WriteOp::Set { path, doc });
    }

    /// Stage a field merge
    pub fn merge(&mut self, path: DocPath, doc: JsonMap) {
        self.ops.push(WriteOp::Merge { path, doc });
    }

    /// Stage a delete
    pub fn delete(&mut self, path: DocPath) {
        self.ops.push(WriteOp::Delete { path });
    }

    /// Number of staged operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether no operations have been staged
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The staged operations, in staging order
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub(crate) fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

impl UnitOfWork for WriteBatch {
    fn create(&mut self, path: DocPath, doc: JsonMap) {
        WriteBatch::create(self, path, doc);
    }

    fn set(&mut self, path: DocPath, doc: JsonMap) {
        WriteBatch::set(self, path, doc);
    }

    fn merge(&mut self, path: DocPath, doc: JsonMap) {
        WriteBatch::merge(self, path, doc);
    }

    fn delete(&mut self, path: DocPath) {
        WriteBatch::delete(self, path);
    }
}
