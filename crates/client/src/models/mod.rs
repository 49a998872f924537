//! Typed records stored in the engagement database
//!
//! Each record maps two ways between its struct and a plain JSON document
//! (`to_doc` / `from_doc`); the store only ever sees the document form.

pub mod command_log;
pub mod history;
pub mod label;
pub mod message;

pub use command_log::CommandLogEntry;
pub use history::{HistoryEntry, HistoryEntryOrigin, Provenance, TrackedDoc};
pub use label::{latest_labels, Label};
pub use message::{Message, MessageDirection, MessageOrigin, MessageStatus};
