//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use engagementdb::{
    DocPath, DocumentStore, EngagementDatabase, HistoryEntryOrigin, Label, Message,
    MessageDirection, MessageOrigin, MessageStatus, Provenance, Timestamp,
};

static INIT_TRACING: Once = Once::new();

fn ensure_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// ============================================================================
// TestDb - database wrapper over a fresh in-memory store
// ============================================================================

/// A fresh engagement database rooted at `databases/test-project`.
pub struct TestDb {
    pub store: Arc<DocumentStore>,
    pub db: EngagementDatabase,
}

impl TestDb {
    pub fn new() -> Self {
        ensure_tracing();
        let store = Arc::new(DocumentStore::new());
        let root = DocPath::parse("databases/test-project").unwrap();
        let db = EngagementDatabase::init(Arc::clone(&store), root).unwrap();
        Self { store, db }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn provenance() -> Provenance {
    Provenance::new(
        "user@example.com",
        "https://example.com/test-pipeline.git",
        "test_pipeline",
        "0123abcd",
    )
}

pub fn origin(name: &str) -> HistoryEntryOrigin {
    provenance().origin(name, &()).unwrap()
}

/// A fully-populated live message with a deterministic id.
pub fn message(id: &str) -> Message {
    Message::new(
        &format!("message text for {id}"),
        Timestamp::from_secs(1_700_000_000),
        "participant-1",
        MessageDirection::In,
        "telegram",
        MessageStatus::Live,
        "pilot_demographics",
        vec![Label::new("age", "age_10_15", "user@example.com")],
        MessageOrigin::new(&format!("rapid-pro-{id}"), "rapid_pro"),
    )
    .with_message_id(id)
}

/// `count` messages with ids `m000..` and strictly increasing send times.
pub fn numbered_messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let mut msg = message(&format!("m{i:03}"));
            msg.timestamp = Timestamp::from_secs(1_700_000_000 + i as u64);
            msg
        })
        .collect()
}
