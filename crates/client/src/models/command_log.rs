//! Command log entries
//!
//! Records one invocation of an external maintenance/admin action. Entries go
//! to an append-only collection and are not tracked records: writing one never
//! creates a history entry.

use engagement_core::{from_doc, to_doc, JsonMap, Result, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::history::Provenance;

/// One invocation of an external maintenance/admin command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLogEntry {
    /// Unique id (generated at construction)
    pub command_log_entry_id: String,
    /// The command that was run, as invoked
    pub command: String,
    /// Id of the user who ran the command
    pub user: String,
    /// Project the command belongs to
    pub project: String,
    /// Vcs commit id of the code that ran
    pub commit: String,
    /// Call site that recorded the entry
    pub line: String,
    /// Write-time marker; stamped by the store at write if not supplied
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl CommandLogEntry {
    /// Document kind discriminant
    pub const DOC_TYPE: &'static str = "command_log_entry";

    /// Construct an entry with a generated id and an automatic call site
    #[track_caller]
    pub fn new(command: &str, provenance: &Provenance) -> Self {
        let location = std::panic::Location::caller();
        Self {
            command_log_entry_id: Uuid::new_v4().to_string(),
            command: command.to_string(),
            user: provenance.user.clone(),
            project: provenance.project.clone(),
            commit: provenance.commit.clone(),
            line: location.to_string(),
            timestamp: None,
        }
    }

    /// Serialize to the stored document form
    pub fn to_doc(&self) -> Result<JsonMap> {
        to_doc(self)
    }

    /// Deserialize from the stored document form
    pub fn from_doc(doc: JsonMap) -> Result<Self> {
        from_doc(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provenance() -> Provenance {
        Provenance::new("user@example.com", "project", "pipeline", "0123abcd")
    }

    #[test]
    fn test_new_generates_id_and_call_site() {
        let entry = CommandLogEntry::new("archive_dataset --dataset age", &provenance());
        assert!(!entry.command_log_entry_id.is_empty());
        assert!(entry.line.contains("command_log.rs"));
        assert!(entry.timestamp.is_none());
    }

    #[test]
    fn test_doc_round_trip() {
        let mut entry = CommandLogEntry::new("delete_messages --dataset age", &provenance());
        entry.timestamp = Some(Timestamp::from_micros(99));
        let doc = entry.to_doc().unwrap();
        let restored = CommandLogEntry::from_doc(doc).unwrap();
        assert_eq!(entry, restored);
    }

    #[test]
    fn test_from_doc_without_timestamp() {
        let entry = CommandLogEntry::new("noop", &provenance());
        let mut doc = entry.to_doc().unwrap();
        doc.remove("timestamp");
        let restored = CommandLogEntry::from_doc(doc).unwrap();
        assert!(restored.timestamp.is_none());
    }
}
