//! Loading records from the data file or a literal override.

use crate::error::SourceError;
use crate::record::Record;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the producer's records come from. Resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// A single record repeated forever.
    Literal(Record),
    /// A JSON file holding an array of objects, re-read on every cycle.
    File(PathBuf),
}

impl SourceKind {
    /// Pick the source: a non-empty literal override wins over the data file.
    pub fn resolve(custom_message: Option<&str>, data_file: &Path) -> Self {
        match custom_message.filter(|raw| !raw.is_empty()) {
            Some(raw) => SourceKind::Literal(parse_literal(raw)),
            None => SourceKind::File(data_file.to_path_buf()),
        }
    }

    /// Fail early when the file source does not exist. Literal sources never fail.
    pub fn preflight(&self) -> Result<(), SourceError> {
        match self {
            SourceKind::Literal(_) => Ok(()),
            SourceKind::File(path) if path.exists() => Ok(()),
            SourceKind::File(path) => Err(SourceError::Missing { path: path.clone() }),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SourceKind::Literal(record) => format!("custom message {record}"),
            SourceKind::File(path) => format!("data file {}", path.display()),
        }
    }
}

/// Interpret a literal override.
///
/// A JSON object is used as-is. Anything else, including valid JSON that is
/// not an object, is sent as text under the `message` key.
pub fn parse_literal(raw: &str) -> Record {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            info!("Custom message parsed as JSON.");
            Record::from(map)
        }
        _ => {
            info!("CUSTOM_MESSAGE is not a JSON object; sending as text.");
            Record::from_text(raw)
        }
    }
}

/// Read and validate the data file.
///
/// The file must hold a non-empty JSON array whose elements are all objects.
pub fn load_records(path: &Path) -> Result<Vec<Record>, SourceError> {
    info!("Opening data file in read mode: {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    info!("Reading data from file: {}", path.display());
    let value: Value = serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let items = match value {
        Value::Array(items) if items.is_empty() => {
            return Err(SourceError::Schema {
                path: path.to_path_buf(),
                found: "an empty list".to_string(),
            });
        }
        Value::Array(items) => items,
        other => {
            return Err(SourceError::Schema {
                path: path.to_path_buf(),
                found: json_type_name(&other).to_string(),
            });
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(Record::from(map)),
            other => Err(SourceError::Schema {
                path: path.to_path_buf(),
                found: format!("{} at index {index}", json_type_name(&other)),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_records_in_order() {
        let file = write_source(
            r#"[{"message": "I love Python!", "author": "Eve"}, {"message": "b", "n": 2}]"#,
        );
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("author"), Some(&json!("Eve")));
        assert_eq!(records[1].get("n"), Some(&json!(2)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SourceError::Missing { .. }));
    }

    #[test]
    fn test_object_is_schema_error() {
        let file = write_source(r#"{"not": "a list"}"#);
        let err = load_records(file.path()).unwrap_err();
        match err {
            SourceError::Schema { found, .. } => assert_eq!(found, "object"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_element_is_schema_error() {
        let file = write_source(r#"[{"message": "a"}, 42]"#);
        let err = load_records(file.path()).unwrap_err();
        match err {
            SourceError::Schema { found, .. } => assert_eq!(found, "number at index 1"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_is_schema_error() {
        let file = write_source("[]");
        assert!(matches!(
            load_records(file.path()),
            Err(SourceError::Schema { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_source(r#"[{"message": "a",]"#);
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_directory_is_unexpected_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path()).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_parse_literal_object() {
        let record = parse_literal(r#"{"message": "hi", "author": "Zed"}"#);
        assert_eq!(record.get("author"), Some(&json!("Zed")));
    }

    #[test]
    fn test_parse_literal_plain_text() {
        let record = parse_literal("just some text");
        assert_eq!(record, Record::from_text("just some text"));
    }

    #[test]
    fn test_parse_literal_non_object_json_is_text() {
        assert_eq!(parse_literal("42"), Record::from_text("42"));
        assert_eq!(parse_literal("[1, 2]"), Record::from_text("[1, 2]"));
    }

    #[test]
    fn test_resolve_prefers_literal() {
        let path = Path::new("data/buzz.json");
        assert!(matches!(
            SourceKind::resolve(Some("hello"), path),
            SourceKind::Literal(_)
        ));
        assert_eq!(
            SourceKind::resolve(None, path),
            SourceKind::File(path.to_path_buf())
        );
        assert_eq!(
            SourceKind::resolve(Some(""), path),
            SourceKind::File(path.to_path_buf())
        );
    }

    #[test]
    fn test_preflight() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SourceKind::File(dir.path().join("absent.json"));
        assert!(matches!(
            missing.preflight(),
            Err(SourceError::Missing { .. })
        ));
        assert!(SourceKind::Literal(Record::from_text("x")).preflight().is_ok());
    }
}
