//! Path-addressed document locators
//!
//! Every document in the store lives at a `DocPath`: a sequence of non-empty
//! segments joined with `/`, e.g. `databases/test-project/messages/{id}`.
//! Paths alternate collection and document segments the way the backing
//! store addresses them, but this type only enforces segment validity;
//! collection conventions live in the client's path helpers.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Path to a document or collection, relative to the store root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    /// Parse a `/`-joined path string
    ///
    /// Fails with `Error::Precondition` on empty input or empty segments
    /// (leading, trailing, or doubled `/`).
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::Precondition("empty document path".to_string()));
        }
        let segments: Vec<String> = s.split('/').map(|seg| seg.to_string()).collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(Error::Precondition(format!(
                "empty segment in document path {s:?}"
            )));
        }
        Ok(DocPath { segments })
    }

    /// Extend this path with one segment
    ///
    /// Fails with `Error::Precondition` if the segment is empty or contains
    /// `/`; caller-supplied ids are not trusted to be path-safe.
    pub fn child(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() || segment.contains('/') {
            return Err(Error::Precondition(format!(
                "invalid path segment {segment:?}"
            )));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(DocPath { segments })
    }

    /// Number of segments in this path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this path has no segments (never true for parsed paths)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment (the document id for document paths)
    pub fn last_segment(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Parent path, or `None` for single-segment paths
    pub fn parent(&self) -> Option<DocPath> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(DocPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether this path addresses a document directly inside `collection`
    ///
    /// True exactly when `self` is one segment longer than `collection` and
    /// shares its prefix. Grandchildren (sub-collection documents) do not
    /// count as members.
    pub fn is_in_collection(&self, collection: &DocPath) -> bool {
        self.segments.len() == collection.segments.len() + 1
            && self.segments[..collection.segments.len()] == collection.segments[..]
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl Serialize for DocPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocPath::parse(&s).map_err(serde::de::Error::custom)
    }
}
