//! History entries and their provenance
//!
//! Every coordinated write to a tracked record is paired with exactly one
//! immutable [`HistoryEntry`]: the path that was written, a full snapshot of
//! the document after the write, when it happened, and a
//! [`HistoryEntryOrigin`] saying who/what/why. Entries are never mutated and
//! only ever deleted as part of an explicit cascading purge of a record and
//! all its history.
//!
//! The snapshot is stored with a `doc_type` discriminant. Deserialization
//! dispatches on it with an exhaustive match over known kinds; an unknown tag
//! is `Error::InvalidFormat`, never guessed.

use engagement_core::{from_doc, to_doc, DocPath, Error, JsonMap, Result, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::command_log::CommandLogEntry;
use crate::models::message::Message;

/// Process-stable provenance for coordinated writes
///
/// Captures the fields that do not change over the run of one program: who
/// is running it, which project and pipeline it belongs to, and the code
/// revision. Construct one per coordinator instead of mutating process-wide
/// defaults, so provenance stays explicit and tests cannot leak state into
/// each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Id of the user running the program, e.g. "user@example.com"
    pub user: String,
    /// Project that created the update, ideally the repository origin url
    pub project: String,
    /// Name of the pipeline that created the update
    pub pipeline: String,
    /// Vcs commit id of the running code
    pub commit: String,
}

impl Provenance {
    /// Create a provenance context
    pub fn new(user: &str, project: &str, pipeline: &str, commit: &str) -> Self {
        Self {
            user: user.to_string(),
            project: project.to_string(),
            pipeline: pipeline.to_string(),
            commit: commit.to_string(),
        }
    }

    /// Build a [`HistoryEntryOrigin`] for one write
    ///
    /// `details` carries update-specific context that helps explain/justify
    /// the write (e.g. a copy of the source data and where it came from).
    /// It must be JSON-representable; anything else fails with
    /// `Error::InvalidFormat` before any write is attempted.
    ///
    /// The call site (`file:line`) is captured automatically.
    #[track_caller]
    pub fn origin<D: Serialize>(&self, origin_name: &str, details: &D) -> Result<HistoryEntryOrigin> {
        let location = std::panic::Location::caller();
        HistoryEntryOrigin::new(origin_name, self, details, &location.to_string())
    }
}

/// Origin description for one history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntryOrigin {
    /// Human-friendly name for the update, e.g. "Rapid Pro -> Database Sync"
    pub origin_name: String,
    /// Id of the user who ran the program that created the update
    pub user: String,
    /// Project that created the update
    pub project: String,
    /// Pipeline that created the update
    pub pipeline: String,
    /// Vcs commit id of the code that created the update
    pub commit: String,
    /// Call site that created the update, as "file:line:column"
    pub line: String,
    /// Update-specific details justifying the write (JSON-representable)
    pub details: Value,
}

impl HistoryEntryOrigin {
    /// Construct an origin, validating that `details` is JSON-representable
    pub fn new<D: Serialize>(
        origin_name: &str,
        provenance: &Provenance,
        details: &D,
        line: &str,
    ) -> Result<Self> {
        let details = serde_json::to_value(details)
            .map_err(|e| Error::InvalidFormat(format!("origin details not JSON-serializable: {e}")))?;
        Ok(Self {
            origin_name: origin_name.to_string(),
            user: provenance.user.clone(),
            project: provenance.project.clone(),
            pipeline: provenance.pipeline.clone(),
            commit: provenance.commit.clone(),
            line: line.to_string(),
            details,
        })
    }
}

/// Snapshot of a tracked document, tagged with its kind
///
/// One variant per document kind the history system knows how to snapshot.
/// Writes to messages are always tracked; command log entries are not
/// tracked in normal operation but their snapshots must still round-trip so
/// exported entries can be restored. New tracked kinds extend this enum and
/// the dispatch in [`TrackedDoc::from_doc`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrackedDoc {
    /// A message snapshot
    Message(Message),
    /// A command log entry snapshot
    CommandLogEntry(CommandLogEntry),
}

impl TrackedDoc {
    /// The `doc_type` discriminant stored with the snapshot
    pub fn doc_type(&self) -> &'static str {
        match self {
            TrackedDoc::Message(_) => Message::DOC_TYPE,
            TrackedDoc::CommandLogEntry(_) => CommandLogEntry::DOC_TYPE,
        }
    }

    /// Serialize the snapshot's fields
    pub fn to_doc(&self) -> Result<JsonMap> {
        match self {
            TrackedDoc::Message(message) => message.to_doc(),
            TrackedDoc::CommandLogEntry(entry) => entry.to_doc(),
        }
    }

    /// Deserialize a snapshot, dispatching on `doc_type`
    ///
    /// Unknown tags are a fatal format error: guessing the type would let a
    /// corrupted or future-versioned entry masquerade as a known kind.
    pub fn from_doc(doc_type: &str, doc: JsonMap) -> Result<Self> {
        match doc_type {
            Message::DOC_TYPE => Ok(TrackedDoc::Message(Message::from_doc(doc)?)),
            CommandLogEntry::DOC_TYPE => {
                Ok(TrackedDoc::CommandLogEntry(CommandLogEntry::from_doc(doc)?))
            }
            unknown => Err(Error::InvalidFormat(format!(
                "unknown doc_type {unknown:?} in history entry"
            ))),
        }
    }
}

/// Immutable audit record of one write to a tracked document
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Unique id (generated at construction)
    pub history_entry_id: String,
    /// Path of the document that was written, relative to the database root
    pub db_update_path: DocPath,
    /// Full snapshot of the document after the write
    pub updated_doc: TrackedDoc,
    /// Provenance of the write
    pub origin: HistoryEntryOrigin,
    /// Write-time marker of the write this entry describes
    pub timestamp: Timestamp,
}

/// Stored form of a history entry, with the snapshot kept as a raw document
/// beside its `doc_type` tag
#[derive(Serialize, Deserialize)]
struct HistoryEntryDoc {
    history_entry_id: String,
    db_update_path: DocPath,
    updated_doc: JsonMap,
    doc_type: String,
    origin: HistoryEntryOrigin,
    timestamp: Timestamp,
}

impl HistoryEntry {
    /// Construct an entry with a generated id
    pub fn new(
        db_update_path: DocPath,
        updated_doc: TrackedDoc,
        origin: HistoryEntryOrigin,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            history_entry_id: Uuid::new_v4().to_string(),
            db_update_path,
            updated_doc,
            origin,
            timestamp,
        }
    }

    /// The `doc_type` discriminant of the snapshot
    pub fn doc_type(&self) -> &'static str {
        self.updated_doc.doc_type()
    }

    /// Serialize to the stored document form
    pub fn to_doc(&self) -> Result<JsonMap> {
        to_doc(&HistoryEntryDoc {
            history_entry_id: self.history_entry_id.clone(),
            db_update_path: self.db_update_path.clone(),
            updated_doc: self.updated_doc.to_doc()?,
            doc_type: self.doc_type().to_string(),
            origin: self.origin.clone(),
            timestamp: self.timestamp,
        })
    }

    /// Deserialize from the stored document form
    pub fn from_doc(doc: JsonMap) -> Result<Self> {
        let raw: HistoryEntryDoc = from_doc(doc)?;
        Ok(Self {
            history_entry_id: raw.history_entry_id,
            db_update_path: raw.db_update_path,
            updated_doc: TrackedDoc::from_doc(&raw.doc_type, raw.updated_doc)?,
            origin: raw.origin,
            timestamp: raw.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::{MessageDirection, MessageOrigin, MessageStatus};
    use serde_json::json;

    fn provenance() -> Provenance {
        Provenance::new(
            "user@example.com",
            "https://example.com/project.git",
            "test_pipeline",
            "0123abcd",
        )
    }

    fn message() -> Message {
        Message::new(
            "hello",
            Timestamp::from_secs(1_700_000_000),
            "participant-1",
            MessageDirection::In,
            "telegram",
            MessageStatus::Live,
            "age",
            vec![],
            MessageOrigin::new("rp-1", "rapid_pro"),
        )
    }

    fn entry() -> HistoryEntry {
        let origin = provenance()
            .origin("Test -> Database Sync", &json!({"source": "test"}))
            .unwrap();
        HistoryEntry::new(
            DocPath::parse("databases/test/messages/m1").unwrap(),
            TrackedDoc::Message(message()),
            origin,
            Timestamp::from_micros(42),
        )
    }

    #[test]
    fn test_origin_captures_call_site_and_provenance() {
        let origin = provenance().origin("Sync", &json!({})).unwrap();
        assert_eq!(origin.user, "user@example.com");
        assert_eq!(origin.pipeline, "test_pipeline");
        assert!(origin.line.contains("history.rs"));
    }

    #[test]
    fn test_origin_rejects_unserializable_details() {
        use std::collections::HashMap;

        let mut details: HashMap<(u32, u32), String> = HashMap::new();
        details.insert((1, 2), "x".to_string());
        let err = provenance().origin("Sync", &details).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_history_entry_doc_round_trip() {
        let original = entry();
        let doc = original.to_doc().unwrap();
        assert_eq!(doc.get("doc_type").unwrap(), "message");
        let restored = HistoryEntry::from_doc(doc).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_unknown_doc_type_fails() {
        let mut doc = entry().to_doc().unwrap();
        doc.insert("doc_type".to_string(), json!("participant"));
        let err = HistoryEntry::from_doc(doc).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
        assert!(err.to_string().contains("participant"));
    }

    #[test]
    fn test_entry_ids_unique() {
        assert_ne!(entry().history_entry_id, entry().history_entry_id);
    }

    #[test]
    fn test_snapshot_preserves_message_fields() {
        let original = entry();
        let doc = original.to_doc().unwrap();
        let restored = HistoryEntry::from_doc(doc).unwrap();
        match restored.updated_doc {
            TrackedDoc::Message(snapshot) => {
                assert_eq!(snapshot.text, "hello");
                assert_eq!(snapshot.status, MessageStatus::Live);
            }
            other => panic!("expected a message snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_command_log_snapshot_round_trip() {
        let original = HistoryEntry::new(
            DocPath::parse("databases/test/command_logs/c1").unwrap(),
            TrackedDoc::CommandLogEntry(CommandLogEntry::new("export --all", &provenance())),
            provenance().origin("Export", &json!({})).unwrap(),
            Timestamp::from_micros(42),
        );
        let doc = original.to_doc().unwrap();
        assert_eq!(doc.get("doc_type").unwrap(), "command_log_entry");
        let restored = HistoryEntry::from_doc(doc).unwrap();
        assert_eq!(original, restored);
    }
}
