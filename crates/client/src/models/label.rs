//! Message labels
//!
//! A label assigns a code from a labelling scheme to a message, together with
//! who assigned it and when. Messages accumulate labels over time; analysis
//! usually wants only the most recent label per scheme.

use engagement_core::Timestamp;
use serde::{Deserialize, Serialize};

/// One label assignment on a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Id of the labelling scheme this label belongs to
    pub scheme_id: String,
    /// Id of the assigned code within the scheme
    pub code_id: String,
    /// Who assigned this label (user id or pipeline name)
    pub assigned_by: String,
    /// When this label was assigned
    pub date_time: Timestamp,
}

impl Label {
    /// Create a label assigned now
    pub fn new(scheme_id: &str, code_id: &str, assigned_by: &str) -> Self {
        Self {
            scheme_id: scheme_id.to_string(),
            code_id: code_id.to_string(),
            assigned_by: assigned_by.to_string(),
            date_time: Timestamp::now(),
        }
    }
}

/// Select the most recently assigned label for each scheme
///
/// Output preserves the order in which schemes first appear in `labels`.
/// Ties on `date_time` keep the label that appears later in the sequence
/// (labels are appended chronologically, so later wins).
pub fn latest_labels(labels: &[Label]) -> Vec<&Label> {
    let mut scheme_order: Vec<&str> = Vec::new();
    let mut latest: std::collections::HashMap<&str, &Label> = std::collections::HashMap::new();

    for label in labels {
        match latest.get(label.scheme_id.as_str()) {
            Some(existing) if existing.date_time > label.date_time => {}
            Some(_) => {
                latest.insert(&label.scheme_id, label);
            }
            None => {
                scheme_order.push(&label.scheme_id);
                latest.insert(&label.scheme_id, label);
            }
        }
    }

    scheme_order.into_iter().map(|s| latest[s]).collect()
}
