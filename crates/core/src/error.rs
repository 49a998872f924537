//! Error types for the engagement database
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence of a document is never an error: point lookups return `Option` and
//! collection queries return possibly-empty vectors. Everything here describes
//! a real failure that aborts the in-flight operation.

use crate::path::DocPath;
use thiserror::Error;

/// Result type alias for engagement database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the engagement database
#[derive(Debug, Error)]
pub enum Error {
    /// A create-mode write targeted a path that already holds a document.
    /// The whole batch containing the write is aborted.
    #[error("document already exists at {path}")]
    AlreadyExists {
        /// Path of the occupied document
        path: DocPath,
    },

    /// Serialized data could not be interpreted: unknown `doc_type` tags,
    /// malformed documents, or payloads that are not JSON-representable.
    /// Never recovered from internally; the system does not guess.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A local precondition was violated at construction time
    /// (e.g. an invalid path segment).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A transaction's read set changed before commit (first-committer-wins).
    #[error("transaction conflict on {path}")]
    TransactionConflict {
        /// First path whose version no longer matched the read set
        path: DocPath,
    },

    /// A transient collaborator failure persisted through every allowed retry.
    #[error("retries exhausted after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        /// Number of attempts made, including the first
        attempts: u32,
        /// Description of the final failure
        last_error: String,
    },

    /// Storage layer error
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidFormat(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_already_exists() {
        let path = DocPath::parse("databases/test/messages/abc").unwrap();
        let err = Error::AlreadyExists { path };
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("messages/abc"));
    }

    #[test]
    fn test_error_display_invalid_format() {
        let err = Error::InvalidFormat("unknown doc_type `participant`".to_string());
        let msg = err.to_string();
        assert!(msg.contains("invalid format"));
        assert!(msg.contains("participant"));
    }

    #[test]
    fn test_error_display_precondition() {
        let err = Error::Precondition("empty path segment".to_string());
        assert!(err.to_string().contains("precondition violated"));
    }

    #[test]
    fn test_error_display_conflict() {
        let path = DocPath::parse("databases/test/messages/m1").unwrap();
        let err = Error::TransactionConflict { path };
        assert!(err.to_string().contains("transaction conflict"));
    }

    #[test]
    fn test_error_display_retries_exhausted() {
        let err = Error::RetriesExhausted {
            attempts: 3,
            last_error: "HTTP 503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<u64, serde_json::Error> =
            serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
