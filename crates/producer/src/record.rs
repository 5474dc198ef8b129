//! The unit of publication: one JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One structured message, an ordered string-keyed JSON object.
///
/// Key order follows the source text. No schema is enforced; consumers
/// interpret keys such as `message` or `author` by convention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a plain string as `{"message": <text>}`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("message".to_string(), Value::String(text.into()));
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize to the UTF-8 JSON bytes used as the Kafka payload.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_text_wraps_under_message() {
        let record = Record::from_text("hello");
        assert_eq!(record.get("message"), Some(&json!("hello")));
        assert_eq!(record.as_map().len(), 1);
    }

    #[test]
    fn test_payload_preserves_key_order() {
        let record: Record =
            serde_json::from_str(r#"{"message":"I love Python!","author":"Eve"}"#).unwrap();
        let payload = String::from_utf8(record.to_payload().unwrap()).unwrap();
        assert_eq!(payload, r#"{"message":"I love Python!","author":"Eve"}"#);
        assert_eq!(record.to_string(), payload);
    }
}
