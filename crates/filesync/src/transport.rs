//! Blob storage transport abstraction
//!
//! A [`BlobTransport`] is the raw, retry-free interface to an external blob
//! store: flat folders of named blobs addressed by opaque ids. Transports
//! classify their own failures; the retry layer treats HTTP 500/503 and
//! timeout-class failures as transient and everything else as permanent.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;

/// A transport-level failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The backend answered with an HTTP error status
    #[error("HTTP {0}")]
    Http(u16),
    /// The call timed out at the socket or request level
    #[error("timeout: {0}")]
    Timeout(String),
    /// Anything else (auth, quota, malformed request)
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether retrying this failure can plausibly succeed
    ///
    /// Only backend-side server errors (500, 503) and timeouts qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(status) => matches!(status, 500 | 503),
            TransportError::Timeout(_) => true,
            TransportError::Other(_) => false,
        }
    }
}

/// Listing entry for one stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobInfo {
    /// Backend-assigned opaque id
    pub id: String,
    /// Name within its folder (not necessarily unique)
    pub name: String,
    /// Whether the object is a folder rather than a blob
    pub is_folder: bool,
}

/// Raw interface to an external blob store
///
/// Calls are single attempts; retry policy lives in the caller. Folder paths
/// are opaque strings to the transport.
pub trait BlobTransport {
    /// List every object directly under `folder`
    fn list_folder(&self, folder: &str) -> Result<Vec<BlobInfo>, TransportError>;

    /// Store a new blob, returning its backend-assigned id
    fn create_blob(&self, folder: &str, name: &str, bytes: &[u8]) -> Result<String, TransportError>;

    /// Replace the contents of an existing blob
    fn update_blob(&self, id: &str, bytes: &[u8]) -> Result<(), TransportError>;

    /// Permanently delete a blob, bypassing any trash
    fn delete_blob(&self, id: &str) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
struct StoredBlob {
    id: String,
    folder: String,
    name: String,
    bytes: Vec<u8>,
}

/// In-memory transport
///
/// Backs tests and local pipeline runs; allows several blobs with the same
/// name in one folder, as real backends do.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    blobs: Vec<StoredBlob>,
    next_id: u64,
}

impl MemoryTransport {
    /// An empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// The contents of the named blob, if exactly one exists in `folder`
    pub fn read(&self, folder: &str, name: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock();
        let mut found = inner
            .blobs
            .iter()
            .filter(|b| b.folder == folder && b.name == name);
        match (found.next(), found.next()) {
            (Some(blob), None) => Some(blob.bytes.clone()),
            _ => None,
        }
    }

    /// Number of blobs named `name` in `folder`
    pub fn count(&self, folder: &str, name: &str) -> usize {
        self.inner
            .lock()
            .blobs
            .iter()
            .filter(|b| b.folder == folder && b.name == name)
            .count()
    }

    /// Insert a blob directly, bypassing the transport interface
    ///
    /// Lets tests set up pre-existing state such as duplicate names.
    pub fn seed(&self, folder: &str, name: &str, bytes: &[u8]) -> String {
        let mut inner = self.inner.lock();
        let id = format!("blob-{}", inner.next_id);
        inner.next_id += 1;
        inner.blobs.push(StoredBlob {
            id: id.clone(),
            folder: folder.to_string(),
            name: name.to_string(),
            bytes: bytes.to_vec(),
        });
        id
    }
}

impl BlobTransport for MemoryTransport {
    fn list_folder(&self, folder: &str) -> Result<Vec<BlobInfo>, TransportError> {
        Ok(self
            .inner
            .lock()
            .blobs
            .iter()
            .filter(|b| b.folder == folder)
            .map(|b| BlobInfo {
                id: b.id.clone(),
                name: b.name.clone(),
                is_folder: false,
            })
            .collect())
    }

    fn create_blob(&self, folder: &str, name: &str, bytes: &[u8]) -> Result<String, TransportError> {
        Ok(self.seed(folder, name, bytes))
    }

    fn update_blob(&self, id: &str, bytes: &[u8]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        match inner.blobs.iter_mut().find(|b| b.id == id) {
            Some(blob) => {
                blob.bytes = bytes.to_vec();
                Ok(())
            }
            None => Err(TransportError::Other(format!("no blob with id {id}"))),
        }
    }

    fn delete_blob(&self, id: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        let before = inner.blobs.len();
        inner.blobs.retain(|b| b.id != id);
        if inner.blobs.len() == before {
            return Err(TransportError::Other(format!("no blob with id {id}")));
        }
        Ok(())
    }
}

/// Transport wrapper that injects scripted failures
///
/// Each transport call first consumes the next scripted outcome for that
/// method; an empty script delegates to the inner transport. Used to exercise
/// retry paths deterministically.
#[derive(Debug)]
pub struct FlakyTransport<T> {
    inner: T,
    failures: Mutex<HashMap<&'static str, Vec<TransportError>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl<T> FlakyTransport<T> {
    /// Wrap `inner` with no scripted failures
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Script the next calls to `method` to fail with `errors`, in order
    ///
    /// Method names are `"list_folder"`, `"create_blob"`, `"update_blob"`,
    /// `"delete_blob"`.
    pub fn fail_next(&self, method: &'static str, errors: Vec<TransportError>) {
        let mut failures = self.failures.lock();
        // Stored reversed so pop() yields them in scripted order.
        let entry = failures.entry(method).or_default();
        entry.extend(errors.into_iter().rev());
    }

    /// How many times `method` has been called
    pub fn calls(&self, method: &'static str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn intercept(&self, method: &'static str) -> Result<(), TransportError> {
        *self.calls.lock().entry(method).or_insert(0) += 1;
        match self.failures.lock().get_mut(method).and_then(Vec::pop) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<T: BlobTransport> BlobTransport for FlakyTransport<T> {
    fn list_folder(&self, folder: &str) -> Result<Vec<BlobInfo>, TransportError> {
        self.intercept("list_folder")?;
        self.inner.list_folder(folder)
    }

    fn create_blob(&self, folder: &str, name: &str, bytes: &[u8]) -> Result<String, TransportError> {
        self.intercept("create_blob")?;
        self.inner.create_blob(folder, name, bytes)
    }

    fn update_blob(&self, id: &str, bytes: &[u8]) -> Result<(), TransportError> {
        self.intercept("update_blob")?;
        self.inner.update_blob(id, bytes)
    }

    fn delete_blob(&self, id: &str) -> Result<(), TransportError> {
        self.intercept("delete_blob")?;
        self.inner.delete_blob(id)
    }
}
