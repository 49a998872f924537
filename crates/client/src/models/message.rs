//! The message record
//!
//! A `Message` is one inbound/outbound communication with a participant. It
//! is the database's tracked record: every write to one must go through the
//! write coordinator so it gets paired with a history entry.
//!
//! `status` and `direction` are closed enums, so a value outside the
//! enumerated sets is unrepresentable in constructed messages and fails
//! deserialization (`Error::InvalidFormat`) when read from a document.

use engagement_core::{from_doc, to_doc, JsonMap, Result, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::label::{latest_labels, Label};

/// Lifecycle status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Part of the live data; should be used in analysis
    Live,
    /// Stale; usable until a newer answer arrives
    Stale,
    /// No longer relevant; ignored by analysis
    Archived,
    /// Personally identifiable details have been removed
    Anonymised,
}

/// Direction of a message relative to this system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    /// Sent from a participant to us
    In,
    /// Sent from us to a participant
    Out,
}

/// Where a message came from
///
/// Identifies the source dataset/system that produced the message. The same
/// message in the origin dataset is always assigned the same `origin_id`,
/// making re-imports idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOrigin {
    /// Unique identifier for this message in the origin dataset
    pub origin_id: String,
    /// Origin kind, e.g. "rapid_pro", "recovery_csv"
    pub origin_type: String,
}

impl MessageOrigin {
    /// Create a message origin
    pub fn new(origin_id: &str, origin_type: &str) -> Self {
        Self {
            origin_id: origin_id.to_string(),
            origin_type: origin_type.to_string(),
        }
    }
}

/// A single inbound/outbound communication record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Globally unique id (generated at construction if not supplied)
    pub message_id: String,
    /// Raw text of the message
    pub text: String,
    /// Time the message was sent/received (event time)
    pub timestamp: Timestamp,
    /// Id of the participant who sent/received the message
    pub participant_uuid: String,
    /// Message direction
    pub direction: MessageDirection,
    /// Operator of the channel that carried the message, e.g. "telegram"
    pub channel_operator: String,
    /// Lifecycle status
    pub status: MessageStatus,
    /// Dataset this message currently belongs to, e.g. "age"
    pub dataset: String,
    /// Labels assigned to this message, in assignment order
    pub labels: Vec<Label>,
    /// Source dataset/system provenance
    pub origin: MessageOrigin,
    /// External cross-reference id, optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coda_id: Option<String>,
    /// Write-time marker of the last coordinated write.
    /// Set only by the store; `None` until the message is first written.
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
    /// Datasets this message previously belonged to, oldest first
    #[serde(default)]
    pub previous_datasets: Vec<String>,
}

impl Message {
    /// Document kind discriminant recorded in history entries
    pub const DOC_TYPE: &'static str = "message";

    /// Construct a message with a generated id
    ///
    /// Write-assigned and optional fields (`message_id`, `coda_id`,
    /// `last_updated`, `previous_datasets`) are set through the
    /// builder-style methods on the constructed message instead.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        text: &str,
        timestamp: Timestamp,
        participant_uuid: &str,
        direction: MessageDirection,
        channel_operator: &str,
        status: MessageStatus,
        dataset: &str,
        labels: Vec<Label>,
        origin: MessageOrigin,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            timestamp,
            participant_uuid: participant_uuid.to_string(),
            direction,
            channel_operator: channel_operator.to_string(),
            status,
            dataset: dataset.to_string(),
            labels,
            origin,
            coda_id: None,
            last_updated: None,
            previous_datasets: Vec::new(),
        }
    }

    /// Replace the generated id with a caller-chosen one
    pub fn with_message_id(mut self, message_id: &str) -> Self {
        self.message_id = message_id.to_string();
        self
    }

    /// Set the external cross-reference id
    pub fn with_coda_id(mut self, coda_id: &str) -> Self {
        self.coda_id = Some(coda_id.to_string());
        self
    }

    /// The most recently assigned label for each scheme
    pub fn latest_labels(&self) -> Vec<&Label> {
        latest_labels(&self.labels)
    }

    /// Serialize to the stored document form
    pub fn to_doc(&self) -> Result<JsonMap> {
        to_doc(self)
    }

    /// Deserialize from the stored document form
    ///
    /// Accepts timestamps written either as ISO-8601 strings or raw integer
    /// microseconds. Unknown `status`/`direction` values fail with
    /// `Error::InvalidFormat`.
    pub fn from_doc(doc: JsonMap) -> Result<Self> {
        from_doc(doc)
    }
}
