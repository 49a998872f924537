//! Document serialization contract
//!
//! Every record type maps two ways between its typed struct and a plain JSON
//! object (`JsonMap`). The store holds documents in this form; the typed
//! layer converts at the boundary with `to_doc` / `from_doc`.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A document's field map as stored: string keys, JSON values
pub type JsonMap = serde_json::Map<String, Value>;

/// Serialize a record to its stored document form
///
/// Fails with `Error::InvalidFormat` if the record does not serialize to a
/// JSON object (or cannot be represented as JSON at all, e.g. maps whose
/// keys are not strings).
pub fn to_doc<T: Serialize>(record: &T) -> Result<JsonMap> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidFormat(format!(
            "expected a JSON object document, got {other}"
        ))),
    }
}

/// Deserialize a record from its stored document form
pub fn from_doc<T: DeserializeOwned>(doc: JsonMap) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        count: u32,
    }

    #[test]
    fn test_to_doc_from_doc_round_trip() {
        let record = Record {
            id: "r1".to_string(),
            count: 7,
        };
        let doc = to_doc(&record).unwrap();
        assert_eq!(doc.get("id").unwrap(), "r1");
        let restored: Record = from_doc(doc).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_to_doc_rejects_non_object() {
        let err = to_doc(&42u32).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_to_doc_rejects_unrepresentable_keys() {
        use std::collections::HashMap;

        // Tuple map keys have no JSON representation.
        #[derive(Serialize)]
        struct Bad {
            lookup: HashMap<(u32, u32), String>,
        }
        let mut lookup = HashMap::new();
        lookup.insert((1, 2), "x".to_string());
        let err = to_doc(&Bad { lookup }).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_from_doc_missing_field_fails() {
        let mut doc = JsonMap::new();
        doc.insert("id".to_string(), Value::String("r1".to_string()));
        let result: Result<Record> = from_doc(doc);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }
}
