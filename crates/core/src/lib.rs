//! Core types for the engagement database
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: error type hierarchy shared by every crate
//! - Timestamp: microsecond-precision write-time marker
//! - DocPath: path-addressed document locator
//! - JsonMap / to_doc / from_doc: the document serialization contract

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod doc;
pub mod error;
pub mod path;
pub mod timestamp;

pub use doc::{from_doc, to_doc, JsonMap};
pub use error::{Error, Result};
pub use path::DocPath;
pub use timestamp::Timestamp;
