//! Canonical paths within one engagement database
//!
//! All documents live under a configurable root, e.g. `databases/test-project`:
//! `messages/{message_id}`, `history/{history_entry_id}`,
//! `command_logs/{command_log_entry_id}`. A marker document at the root path
//! itself records the root so databases are discoverable by listing.

use engagement_core::{DocPath, Result};

/// Collection name for message records
pub const MESSAGES_COLLECTION: &str = "messages";
/// Collection name for history entries
pub const HISTORY_COLLECTION: &str = "history";
/// Collection name for command log entries
pub const COMMAND_LOGS_COLLECTION: &str = "command_logs";

/// Path helpers for one database root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPaths {
    root: DocPath,
}

impl DbPaths {
    /// Create path helpers for the database rooted at `root`
    pub fn new(root: DocPath) -> Self {
        Self { root }
    }

    /// The database root document path
    pub fn root(&self) -> &DocPath {
        &self.root
    }

    /// The messages collection
    pub fn messages(&self) -> Result<DocPath> {
        self.root.child(MESSAGES_COLLECTION)
    }

    /// A message document
    pub fn message(&self, message_id: &str) -> Result<DocPath> {
        self.messages()?.child(message_id)
    }

    /// The history collection
    pub fn history(&self) -> Result<DocPath> {
        self.root.child(HISTORY_COLLECTION)
    }

    /// A history entry document
    pub fn history_entry(&self, history_entry_id: &str) -> Result<DocPath> {
        self.history()?.child(history_entry_id)
    }

    /// The command logs collection
    pub fn command_logs(&self) -> Result<DocPath> {
        self.root.child(COMMAND_LOGS_COLLECTION)
    }

    /// A command log entry document
    pub fn command_log_entry(&self, command_log_entry_id: &str) -> Result<DocPath> {
        self.command_logs()?.child(command_log_entry_id)
    }
}
