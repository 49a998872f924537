//! The engagement database client
//!
//! One [`EngagementDatabase`] wraps a document store and a root path, and
//! enforces the write discipline: every write to a tracked record goes to
//! the record path AND appends a [`HistoryEntry`] snapshot, committed in the
//! same atomic batch. Raw escape hatches ([`EngagementDatabase::delete_doc`],
//! [`EngagementDatabase::restore_doc`]) exist for maintenance tooling and are
//! deliberately noisy in the logs.
//!
//! Each write operation comes in two forms. The plain form commits its own
//! batch. The `stage_*` form appends to any caller-owned unit of work, a
//! [`WriteBatch`] or a read-validated [`Transaction`], so several records
//! can be committed atomically together; the caller commits.

use std::sync::Arc;

use engagement_core::{DocPath, Error, Result};
use engagement_docstore::{
    Direction, DocumentStore, FieldOp, Query, Transaction, UnitOfWork, WriteBatch,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::models::{CommandLogEntry, HistoryEntry, HistoryEntryOrigin, Message, TrackedDoc};
use crate::paths::DbPaths;
use crate::reader::{collect_batched, dedup_history_by_id, dedup_latest_messages};

/// Client for one engagement database
///
/// Cheap to clone; clones share the underlying store.
#[derive(Debug, Clone)]
pub struct EngagementDatabase {
    store: Arc<DocumentStore>,
    paths: DbPaths,
}

impl EngagementDatabase {
    /// Open the database rooted at `root`, creating the root marker document
    ///
    /// The marker records the root path at the root path itself, so existing
    /// databases are discoverable by listing marker documents. Merged rather
    /// than set, so re-opening never clobbers other root-level fields.
    pub fn init(store: Arc<DocumentStore>, root: DocPath) -> Result<Self> {
        let paths = DbPaths::new(root);

        let mut marker = engagement_core::JsonMap::new();
        marker.insert("database_path".to_string(), json!(paths.root().to_string()));
        let mut batch = store.batch();
        batch.merge(paths.root().clone(), marker);
        store.commit(batch)?;

        info!(root = %paths.root(), "opened engagement database");
        Ok(Self { store, paths })
    }

    /// The underlying document store
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// The path helpers for this database
    pub fn paths(&self) -> &DbPaths {
        &self.paths
    }

    /// A fresh write batch for multi-record atomic commits
    pub fn batch(&self) -> WriteBatch {
        self.store.batch()
    }

    /// A fresh read-validated transaction
    pub fn transaction(&self) -> Transaction<'_> {
        self.store.transaction()
    }

    /// Commit a batch assembled with the `stage_*` operations
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.store.commit(batch)
    }

    // ========================================================================
    // Messages: writes
    // ========================================================================

    /// Write a message and its history entry atomically
    ///
    /// Overwrites any existing document at the message's path. Returns the
    /// message as written, with `last_updated` stamped: the history snapshot
    /// and the stored document are byte-identical, including the marker.
    pub fn set_message(&self, message: &Message, origin: HistoryEntryOrigin) -> Result<Message> {
        let mut batch = self.store.batch();
        let stamped = self.stage_message(message, origin, &mut batch)?;
        self.store.commit(batch)?;
        Ok(stamped)
    }

    /// Stage [`EngagementDatabase::set_message`] into a caller-owned unit of
    /// work, either a batch or a read-validated transaction
    pub fn stage_message(
        &self,
        message: &Message,
        origin: HistoryEntryOrigin,
        writes: &mut impl UnitOfWork,
    ) -> Result<Message> {
        let stamped = self.stage_message_write(message, origin, writes, false)?;
        Ok(stamped)
    }

    /// Write a message that must not already exist, plus its history entry
    ///
    /// Fails the whole batch with [`Error::AlreadyExists`] at commit if a
    /// document already occupies the message's path.
    pub fn create_message(&self, message: &Message, origin: HistoryEntryOrigin) -> Result<Message> {
        let mut batch = self.store.batch();
        let stamped = self.stage_message_create(message, origin, &mut batch)?;
        self.store.commit(batch)?;
        Ok(stamped)
    }

    /// Stage [`EngagementDatabase::create_message`] into a caller-owned unit
    /// of work, either a batch or a read-validated transaction
    pub fn stage_message_create(
        &self,
        message: &Message,
        origin: HistoryEntryOrigin,
        writes: &mut impl UnitOfWork,
    ) -> Result<Message> {
        self.stage_message_write(message, origin, writes, true)
    }

    fn stage_message_write(
        &self,
        message: &Message,
        origin: HistoryEntryOrigin,
        writes: &mut impl UnitOfWork,
        create_only: bool,
    ) -> Result<Message> {
        // One marker for both the record and its history entry, drawn before
        // staging so the snapshot equals the post-write document exactly.
        let marker = self.store.write_time();
        let mut stamped = message.clone();
        stamped.last_updated = Some(marker);

        let path = self.paths.message(&stamped.message_id)?;
        let doc = stamped.to_doc()?;
        if create_only {
            writes.create(path.clone(), doc);
        } else {
            writes.set(path.clone(), doc);
        }

        let entry = HistoryEntry::new(
            path.clone(),
            TrackedDoc::Message(stamped.clone()),
            origin,
            marker,
        );
        writes.set(self.paths.history_entry(&entry.history_entry_id)?, entry.to_doc()?);

        debug!(
            message_id = %stamped.message_id,
            history_entry_id = %entry.history_entry_id,
            path = %path,
            create_only,
            "staged message write"
        );
        Ok(stamped)
    }

    /// Delete a message and every history entry that references its path
    ///
    /// The audit trail for the record is destroyed with it; this exists for
    /// data-protection erasure, not routine use. Returns the number of
    /// history entries deleted. A missing message with no history is a no-op.
    pub fn delete_message_and_history(&self, message_id: &str) -> Result<usize> {
        let message_path = self.paths.message(message_id)?;
        let history = self.get_history_for_message(message_id, &Query::new())?;

        if history.is_empty() && self.store.get(&message_path).is_none() {
            debug!(message_id, "nothing to erase");
            return Ok(0);
        }

        let mut batch = self.store.batch();
        batch.delete(message_path);
        for entry in &history {
            batch.delete(self.paths.history_entry(&entry.history_entry_id)?);
        }
        self.store.commit(batch)?;

        warn!(
            message_id,
            history_entries = history.len(),
            "erased message and its audit trail"
        );
        Ok(history.len())
    }

    // ========================================================================
    // Messages: reads
    // ========================================================================

    /// Fetch one message by id
    pub fn get_message(&self, message_id: &str) -> Result<Option<Message>> {
        self.store
            .get(&self.paths.message(message_id)?)
            .map(Message::from_doc)
            .transpose()
    }

    /// Fetch every message matching `filter`, in one request
    ///
    /// Suitable for result sets known to be small; use
    /// [`EngagementDatabase::get_messages_batched`] otherwise.
    pub fn get_messages(&self, filter: &Query) -> Result<Vec<Message>> {
        self.store
            .query(&self.paths.messages()?, filter)?
            .into_iter()
            .map(Message::from_doc)
            .collect()
    }

    /// Fetch every message matching `filter`, page by page
    ///
    /// `filter` supplies conditions only; ordering, limits, and cursors are
    /// managed here and a filter carrying its own is rejected. The result
    /// holds each matching message exactly once, in its most recently
    /// written observed state; see the crate docs for what that does and
    /// does not guarantee under concurrent writes.
    pub fn get_messages_batched(&self, filter: &Query, batch_size: usize) -> Result<Vec<Message>> {
        let key_query = Self::batched_key_query(filter, "last_updated", "message_id")?;
        let collection = self.paths.messages()?;
        let docs = collect_batched(&key_query, batch_size, |page_query| {
            self.store.query(&collection, page_query)
        })?;
        let messages = docs
            .into_iter()
            .map(Message::from_doc)
            .collect::<Result<Vec<_>>>()?;
        Ok(dedup_latest_messages(messages))
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Fetch every history entry matching `filter`, in one request
    pub fn get_history(&self, filter: &Query) -> Result<Vec<HistoryEntry>> {
        self.store
            .query(&self.paths.history()?, filter)?
            .into_iter()
            .map(HistoryEntry::from_doc)
            .collect()
    }

    /// Fetch every history entry matching `filter`, page by page
    ///
    /// Pages are keyed by `(timestamp, history_entry_id)`; the id keeps the
    /// cursor stable when several entries share one timestamp, so results
    /// come back in timestamp order with ties broken by id. Entries are
    /// immutable, so unlike the message variant no latest-wins resolution is
    /// needed; page-overlap duplicates are simply dropped.
    pub fn get_history_batched(
        &self,
        filter: &Query,
        batch_size: usize,
    ) -> Result<Vec<HistoryEntry>> {
        let key_query = Self::batched_key_query(filter, "timestamp", "history_entry_id")?;
        let collection = self.paths.history()?;
        let docs = collect_batched(&key_query, batch_size, |page_query| {
            self.store.query(&collection, page_query)
        })?;
        let entries = docs
            .into_iter()
            .map(HistoryEntry::from_doc)
            .collect::<Result<Vec<_>>>()?;
        Ok(dedup_history_by_id(entries))
    }

    /// Fetch the audit trail of one message, oldest first
    ///
    /// `filter` narrows further (e.g. entries after some timestamp); pass
    /// `Query::new()` for the full trail.
    pub fn get_history_for_message(
        &self,
        message_id: &str,
        filter: &Query,
    ) -> Result<Vec<HistoryEntry>> {
        let message_path = self.paths.message(message_id)?;
        let query = filter
            .clone()
            .filter("db_update_path", FieldOp::Eq, json!(message_path.to_string()))
            .order_by("timestamp", Direction::Ascending)
            .order_by("history_entry_id", Direction::Ascending);
        self.store
            .query(&self.paths.history()?, &query)?
            .into_iter()
            .map(HistoryEntry::from_doc)
            .collect()
    }

    // ========================================================================
    // Command log
    // ========================================================================

    /// Append a command log entry, stamping its timestamp if unset
    pub fn set_command_log_entry(&self, entry: &CommandLogEntry) -> Result<CommandLogEntry> {
        let mut batch = self.store.batch();
        let stamped = self.stage_command_log_entry(entry, &mut batch)?;
        self.store.commit(batch)?;
        Ok(stamped)
    }

    /// Stage [`EngagementDatabase::set_command_log_entry`] into a unit of work
    ///
    /// Command log entries are not tracked records: no history entry is
    /// written for them.
    pub fn stage_command_log_entry(
        &self,
        entry: &CommandLogEntry,
        writes: &mut impl UnitOfWork,
    ) -> Result<CommandLogEntry> {
        let mut stamped = entry.clone();
        if stamped.timestamp.is_none() {
            stamped.timestamp = Some(self.store.write_time());
        }
        writes.set(
            self.paths.command_log_entry(&stamped.command_log_entry_id)?,
            stamped.to_doc()?,
        );
        debug!(
            command_log_entry_id = %stamped.command_log_entry_id,
            command = %stamped.command,
            "staged command log entry"
        );
        Ok(stamped)
    }

    /// Fetch every command log entry matching `filter`
    pub fn get_command_log_entries(&self, filter: &Query) -> Result<Vec<CommandLogEntry>> {
        self.store
            .query(&self.paths.command_logs()?, filter)?
            .into_iter()
            .map(CommandLogEntry::from_doc)
            .collect()
    }

    // ========================================================================
    // Maintenance escape hatches
    // ========================================================================

    /// Write a previously-exported snapshot back to its path, without history
    ///
    /// Unlike [`EngagementDatabase::set_message`] the document is written
    /// exactly as given, `last_updated` included, and no history entry is
    /// appended: the exported audit trail is restored separately with
    /// [`EngagementDatabase::restore_history_entry`], reproducing the
    /// pre-delete state. `path` must lie inside this database.
    pub fn restore_doc(&self, doc: &TrackedDoc, path: &DocPath) -> Result<()> {
        let mut batch = self.store.batch();
        self.stage_restore_doc(doc, path, &mut batch)?;
        self.store.commit(batch)
    }

    /// Stage [`EngagementDatabase::restore_doc`] into a unit of work
    pub fn stage_restore_doc(
        &self,
        doc: &TrackedDoc,
        path: &DocPath,
        writes: &mut impl UnitOfWork,
    ) -> Result<()> {
        self.check_owned_path(path)?;
        writes.set(path.clone(), doc.to_doc()?);
        warn!(path = %path, doc_type = doc.doc_type(), "staged raw document restore");
        Ok(())
    }

    /// Write a previously-exported history entry back, verbatim
    ///
    /// No new history entry is created about the restore; history is its own
    /// record of record.
    pub fn restore_history_entry(&self, entry: &HistoryEntry) -> Result<()> {
        let mut batch = self.store.batch();
        self.stage_restore_history_entry(entry, &mut batch)?;
        self.store.commit(batch)
    }

    /// Stage [`EngagementDatabase::restore_history_entry`] into a unit of work
    pub fn stage_restore_history_entry(
        &self,
        entry: &HistoryEntry,
        writes: &mut impl UnitOfWork,
    ) -> Result<()> {
        writes.set(
            self.paths.history_entry(&entry.history_entry_id)?,
            entry.to_doc()?,
        );
        warn!(history_entry_id = %entry.history_entry_id, "staged history entry restore");
        Ok(())
    }

    /// Delete a document without writing any history
    ///
    /// The deletion leaves no trace in the audit trail. Maintenance tooling
    /// only; `path` must lie inside this database.
    pub fn delete_doc(&self, path: &DocPath) -> Result<()> {
        let mut batch = self.store.batch();
        self.stage_delete_doc(path, &mut batch)?;
        self.store.commit(batch)
    }

    /// Stage [`EngagementDatabase::delete_doc`] into a unit of work
    pub fn stage_delete_doc(&self, path: &DocPath, writes: &mut impl UnitOfWork) -> Result<()> {
        self.check_owned_path(path)?;
        writes.delete(path.clone());
        warn!(path = %path, "staged untracked delete");
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Build the compound-keyed page query for a batched read
    fn batched_key_query(filter: &Query, time_field: &str, id_field: &str) -> Result<Query> {
        if !filter.order_clauses().is_empty()
            || filter.limit_clause().is_some()
            || filter.start_after_clause().is_some()
        {
            return Err(Error::Precondition(
                "batched reads take conditions only; ordering, limit, and cursor are managed internally"
                    .to_string(),
            ));
        }
        Ok(filter
            .clone()
            .order_by(time_field, Direction::Ascending)
            .order_by(id_field, Direction::Ascending))
    }

    fn check_owned_path(&self, path: &DocPath) -> Result<()> {
        let root = self.paths.root().to_string();
        if path == self.paths.root() || !path.to_string().starts_with(&format!("{root}/")) {
            return Err(Error::Precondition(format!(
                "path {path} is outside database root {root}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageDirection, MessageOrigin, MessageStatus, Provenance};
    use engagement_core::Timestamp;

    fn open() -> EngagementDatabase {
        let store = Arc::new(DocumentStore::new());
        let root = DocPath::parse("databases/test").unwrap();
        EngagementDatabase::init(store, root).unwrap()
    }

    fn origin() -> HistoryEntryOrigin {
        Provenance::new("user@example.com", "project", "pipeline", "0123abcd")
            .origin("test", &serde_json::json!({}))
            .unwrap()
    }

    fn message(id: &str) -> Message {
        Message::new(
            "hello",
            Timestamp::from_micros(1_000_000),
            "participant-1",
            MessageDirection::In,
            "telegram",
            MessageStatus::Live,
            "pilot",
            vec![],
            MessageOrigin::new(id, "test"),
        )
        .with_message_id(id)
    }

    #[test]
    fn test_init_writes_root_marker() {
        let db = open();
        let marker = db.store().get(db.paths().root()).unwrap();
        assert_eq!(marker["database_path"], serde_json::json!("databases/test"));
    }

    #[test]
    fn test_set_message_writes_record_and_history() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();
        assert!(written.last_updated.is_some());

        let fetched = db.get_message("m1").unwrap().unwrap();
        assert_eq!(fetched, written);

        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].updated_doc, TrackedDoc::Message(written.clone()));
        assert_eq!(Some(trail[0].timestamp), written.last_updated);
    }

    #[test]
    fn test_set_message_restamps_last_updated() {
        let db = open();
        let first = db.set_message(&message("m1"), origin()).unwrap();
        let second = db.set_message(&first, origin()).unwrap();
        assert!(second.last_updated > first.last_updated);
    }

    #[test]
    fn test_create_message_rejects_existing() {
        let db = open();
        db.set_message(&message("m1"), origin()).unwrap();

        let err = db.create_message(&message("m1"), origin()).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));

        // The failed create must not have appended history either.
        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_staged_writes_commit_together() {
        let db = open();
        let mut batch = db.batch();
        db.stage_message(&message("m1"), origin(), &mut batch).unwrap();
        db.stage_message(&message("m2"), origin(), &mut batch).unwrap();

        // Nothing visible until the batch commits.
        assert!(db.get_message("m1").unwrap().is_none());
        db.commit(batch).unwrap();
        assert!(db.get_message("m1").unwrap().is_some());
        assert!(db.get_message("m2").unwrap().is_some());
    }

    #[test]
    fn test_get_messages_filters() {
        let db = open();
        let mut archived = message("m1");
        archived.status = MessageStatus::Archived;
        db.set_message(&archived, origin()).unwrap();
        db.set_message(&message("m2"), origin()).unwrap();

        let live = db
            .get_messages(&Query::new().filter("status", FieldOp::Eq, json!("live")))
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].message_id, "m2");
    }

    #[test]
    fn test_get_messages_batched_rejects_ordered_filter() {
        let db = open();
        let filter = Query::new().order_by("text", Direction::Ascending);
        let err = db.get_messages_batched(&filter, 10).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_history_for_message_is_scoped_and_ordered() {
        let db = open();
        let m1 = db.set_message(&message("m1"), origin()).unwrap();
        db.set_message(&message("m2"), origin()).unwrap();
        db.set_message(&m1, origin()).unwrap();

        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();
        assert_eq!(trail.len(), 2);
        assert!(trail[0].timestamp < trail[1].timestamp);
    }

    #[test]
    fn test_delete_message_and_history_erases_everything() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();
        db.set_message(&written, origin()).unwrap();

        let deleted = db.delete_message_and_history("m1").unwrap();
        assert_eq!(deleted, 2);
        assert!(db.get_message("m1").unwrap().is_none());
        assert!(db.get_history_for_message("m1", &Query::new()).unwrap().is_empty());
    }

    #[test]
    fn test_delete_message_and_history_missing_is_noop() {
        let db = open();
        assert_eq!(db.delete_message_and_history("missing").unwrap(), 0);
    }

    #[test]
    fn test_command_log_entry_stamped_on_write() {
        let db = open();
        let provenance = Provenance::new("user@example.com", "project", "pipeline", "0123abcd");
        let entry = CommandLogEntry::new("archive_dataset --all", &provenance);
        assert!(entry.timestamp.is_none());

        let stamped = db.set_command_log_entry(&entry).unwrap();
        assert!(stamped.timestamp.is_some());

        let fetched = db.get_command_log_entries(&Query::new()).unwrap();
        assert_eq!(fetched, vec![stamped]);
    }

    #[test]
    fn test_command_log_entry_is_not_tracked() {
        let db = open();
        let provenance = Provenance::new("user@example.com", "project", "pipeline", "0123abcd");
        db.set_command_log_entry(&CommandLogEntry::new("noop", &provenance))
            .unwrap();
        assert!(db.get_history(&Query::new()).unwrap().is_empty());
    }

    #[test]
    fn test_restore_doc_preserves_marker() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();
        db.delete_doc(&db.paths().message("m1").unwrap()).unwrap();
        assert!(db.get_message("m1").unwrap().is_none());

        let path = db.paths().message("m1").unwrap();
        db.restore_doc(&TrackedDoc::Message(written.clone()), &path)
            .unwrap();

        let restored = db.get_message("m1").unwrap().unwrap();
        assert_eq!(restored.last_updated, written.last_updated);
    }

    #[test]
    fn test_restore_doc_writes_no_history() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();
        let exported = db.get_history_for_message("m1", &Query::new()).unwrap();
        db.delete_message_and_history("m1").unwrap();

        let path = db.paths().message("m1").unwrap();
        db.restore_doc(&TrackedDoc::Message(written), &path).unwrap();
        assert!(db.get_history_for_message("m1", &Query::new()).unwrap().is_empty());

        // The exported trail comes back verbatim; nothing extra appears.
        db.restore_history_entry(&exported[0]).unwrap();
        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();
        assert_eq!(trail, exported);
    }

    #[test]
    fn test_stage_message_into_transaction() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();

        // Read-validate the current state, then stage an audited update.
        let mut txn = db.transaction();
        let current =
            Message::from_doc(txn.get(&db.paths().message("m1").unwrap()).unwrap()).unwrap();
        let mut updated = current.clone();
        updated.status = MessageStatus::Archived;
        db.stage_message(&updated, origin(), &mut txn).unwrap();
        txn.commit().unwrap();

        let fetched = db.get_message("m1").unwrap().unwrap();
        assert_eq!(fetched.status, MessageStatus::Archived);
        assert!(fetched.last_updated > written.last_updated);

        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_transactional_message_write_aborts_on_conflict() {
        let db = open();
        let written = db.set_message(&message("m1"), origin()).unwrap();

        let mut txn = db.transaction();
        let _ = txn.get(&db.paths().message("m1").unwrap());
        let mut updated = written.clone();
        updated.status = MessageStatus::Stale;
        db.stage_message(&updated, origin(), &mut txn).unwrap();

        // Concurrent writer lands between the read and the commit.
        db.set_message(&written, origin()).unwrap();

        let err = txn.commit().unwrap_err();
        assert!(matches!(err, Error::TransactionConflict { .. }));

        // Neither the record update nor its history entry was applied.
        let fetched = db.get_message("m1").unwrap().unwrap();
        assert_eq!(fetched.status, MessageStatus::Live);
        assert_eq!(db.get_history_for_message("m1", &Query::new()).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_doc_leaves_history_untouched() {
        let db = open();
        db.set_message(&message("m1"), origin()).unwrap();
        db.delete_doc(&db.paths().message("m1").unwrap()).unwrap();

        assert!(db.get_message("m1").unwrap().is_none());
        assert_eq!(db.get_history_for_message("m1", &Query::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_raw_operations_reject_foreign_paths() {
        let db = open();
        let foreign = DocPath::parse("databases/other/messages/m1").unwrap();
        assert!(matches!(db.delete_doc(&foreign), Err(Error::Precondition(_))));
        assert!(matches!(
            db.delete_doc(db.paths().root()),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn test_restore_history_entry_roundtrip() {
        let db = open();
        db.set_message(&message("m1"), origin()).unwrap();
        let trail = db.get_history_for_message("m1", &Query::new()).unwrap();

        db.delete_doc(&db.paths().history_entry(&trail[0].history_entry_id).unwrap())
            .unwrap();
        assert!(db.get_history(&Query::new()).unwrap().is_empty());

        db.restore_history_entry(&trail[0]).unwrap();
        let restored = db.get_history(&Query::new()).unwrap();
        assert_eq!(restored, trail);
    }
}
