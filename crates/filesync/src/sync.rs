//! Idempotent file sync over a blob transport
//!
//! Pipelines publish exports by name: "the folder's `summary.csv`" is the
//! unit of interest, not any particular blob id. [`FileSync`] resolves names
//! to blobs at call time and updates in place when a blob with the target
//! name already exists, so repeated publishes of the same name converge to
//! one blob rather than accumulating copies.
//!
//! Backends permit several blobs with the same name in one folder. An
//! ambiguous name aborts by default; with `fix_duplicates` enabled the
//! duplicates are deleted and the upload proceeds fresh.

use engagement_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::retry::RetryConfig;
use crate::transport::{BlobInfo, BlobTransport};

/// Name-addressed sync of local bytes to an external blob store
#[derive(Debug)]
pub struct FileSync<T> {
    transport: T,
    retry: RetryConfig,
    fix_duplicates: bool,
}

impl<T: BlobTransport> FileSync<T> {
    /// Sync through `transport` with default retry and no duplicate fixing
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            retry: RetryConfig::default(),
            fix_duplicates: false,
        }
    }

    /// Set the retry budget applied to every transport call
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Delete duplicate same-name blobs instead of aborting on them
    pub fn with_fix_duplicates(mut self, fix_duplicates: bool) -> Self {
        self.fix_duplicates = fix_duplicates;
        self
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload `bytes` as `folder`'s blob named `name`, updating in place
    ///
    /// If exactly one blob with the name exists it is updated; if none
    /// exists one is created. Several existing blobs with the name fail with
    /// [`Error::Precondition`] unless `fix_duplicates` is set, in which case
    /// they are deleted and a fresh blob is created. A folder bearing the
    /// name always fails.
    pub fn update_or_create(&self, folder: &str, name: &str, bytes: &[u8]) -> Result<()> {
        let listing = self
            .retry
            .run("list_folder", || self.transport.list_folder(folder))?;
        self.sync_one(folder, name, bytes, &listing)
    }

    /// Upload several files into `folder`, resolving names from one listing
    ///
    /// The folder is listed once up front; blobs created by earlier files in
    /// the batch are not visible to later ones, which only matters if the
    /// batch repeats a name.
    pub fn update_or_create_batch(&self, folder: &str, files: &[(String, Vec<u8>)]) -> Result<()> {
        let listing = self
            .retry
            .run("list_folder", || self.transport.list_folder(folder))?;
        for (i, (name, bytes)) in files.iter().enumerate() {
            info!(folder, name = %name, n = i + 1, of = files.len(), "uploading file");
            self.sync_one(folder, name, bytes, &listing)?;
        }
        Ok(())
    }

    /// Delete every blob named `name` in `folder`
    ///
    /// Deletion is permanent on backends that support a trash. Returns the
    /// number of blobs deleted; zero is not an error.
    pub fn delete(&self, folder: &str, name: &str) -> Result<usize> {
        let listing = self
            .retry
            .run("list_folder", || self.transport.list_folder(folder))?;
        let matches = Self::named_blobs(&listing, name)?;

        for blob in &matches {
            warn!(folder, name, id = %blob.id, "permanently deleting blob");
            self.retry
                .run("delete_blob", || self.transport.delete_blob(&blob.id))?;
        }
        Ok(matches.len())
    }

    fn sync_one(&self, folder: &str, name: &str, bytes: &[u8], listing: &[BlobInfo]) -> Result<()> {
        let mut matches = Self::named_blobs(listing, name)?;

        if matches.len() > 1 {
            if !self.fix_duplicates {
                return Err(Error::Precondition(format!(
                    "{} blobs named {name:?} in folder {folder:?}; enable fix_duplicates to \
                     delete them and upload fresh",
                    matches.len()
                )));
            }
            warn!(
                folder,
                name,
                duplicates = matches.len(),
                "deleting duplicate blobs before upload"
            );
            for blob in matches.drain(..) {
                self.retry
                    .run("delete_blob", || self.transport.delete_blob(&blob.id))?;
            }
        }

        match matches.first() {
            Some(existing) => {
                debug!(folder, name, id = %existing.id, "updating existing blob");
                self.retry
                    .run("update_blob", || self.transport.update_blob(&existing.id, bytes))
            }
            None => {
                debug!(folder, name, "creating new blob");
                self.retry
                    .run("create_blob", || self.transport.create_blob(folder, name, bytes))
                    .map(|_id| ())
            }
        }
    }

    /// The non-folder blobs named `name`; any folder with the name is fatal
    fn named_blobs<'l>(listing: &'l [BlobInfo], name: &str) -> Result<Vec<&'l BlobInfo>> {
        let matches: Vec<&BlobInfo> = listing.iter().filter(|b| b.name == name).collect();
        if matches.iter().any(|b| b.is_folder) {
            return Err(Error::Precondition(format!(
                "a folder named {name:?} is in the way"
            )));
        }
        Ok(matches)
    }
}
