use super::types::{Creator, Har, Log, Page};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;

/// Fields the first entry must carry for the file to be accepted as a capture.
const REQUIRED_ENTRY_FIELDS: [&str; 4] = ["request", "response", "time", "startedDateTime"];

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        if !path.is_file() {
            return Err(Error::Validation(format!(
                "HAR file not found: {}",
                path.display()
            )));
        }

        let has_har_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("har"));
        if !has_har_extension {
            return Err(Error::InvalidFormat(format!(
                "File must have .har extension: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            Error::Validation(format!("Failed to read HAR file {}: {e}", path.display()))
        })?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::InvalidFormat(format!("Invalid encoding in HAR file: {e}")))?;

        let har = Self::from_str(&content)?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut value: Value = serde_json::from_str(content)
            .map_err(|e| Error::InvalidFormat(format!("Invalid JSON in HAR file: {e}")))?;

        Self::validate(&value)?;

        let log = match value.get_mut("log").map(Value::take) {
            Some(Value::Object(log)) => Self::read_log(log),
            _ => Log::default(),
        };

        Ok(Har { log })
    }

    /// Validate that a JSON document has the shape of a usable capture
    pub fn validate(value: &Value) -> Result<()> {
        tracing::debug!("Validating HAR structure");

        let root = value
            .as_object()
            .ok_or_else(|| invalid("HAR file must contain a JSON object"))?;

        let log = root
            .get("log")
            .ok_or_else(|| invalid("HAR file must contain a 'log' object"))?
            .as_object()
            .ok_or_else(|| invalid("HAR 'log' must be an object"))?;

        let entries = log
            .get("entries")
            .ok_or_else(|| invalid("HAR log must contain 'entries' array"))?
            .as_array()
            .ok_or_else(|| invalid("HAR entries must be an array"))?;

        let first = entries
            .first()
            .ok_or_else(|| invalid("HAR file contains no entries"))?;

        for field in REQUIRED_ENTRY_FIELDS {
            if first.get(field).is_none() {
                return Err(Error::InvalidFormat(format!(
                    "HAR entry missing required field: {field}"
                )));
            }
        }

        tracing::debug!("HAR structure is valid");
        Ok(())
    }

    /// Header fields are read one by one so a malformed `creator` or page
    /// never hides the rest of the metadata. Entries are moved out, not copied.
    fn read_log(mut log: Map<String, Value>) -> Log {
        let entries = match log.remove("entries") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };

        let pages = log
            .get("pages")
            .and_then(Value::as_array)
            .map(|pages| pages.iter().filter_map(|p| lenient::<Page>(Some(p))).collect())
            .unwrap_or_default();

        Log {
            version: lenient::<String>(log.get("version")),
            creator: lenient::<Creator>(log.get("creator")),
            browser: lenient::<Creator>(log.get("browser")),
            pages,
            entries,
            comment: lenient::<String>(log.get("comment")),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidFormat(message.to_string())
}

fn lenient<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    value.and_then(|v| T::deserialize(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_ENTRY: &str = r#"{
        "request": {"method": "GET", "url": "https://example.com/"},
        "response": {"status": 200, "content": {"size": 10, "mimeType": "text/html"}},
        "time": 12.5,
        "startedDateTime": "2025-01-01T10:00:00.000Z"
    }"#;

    fn document(entries: &str) -> String {
        format!(
            r#"{{
                "log": {{
                    "version": "1.2",
                    "creator": {{"name": "test", "version": "1.0"}},
                    "entries": [{entries}]
                }}
            }}"#
        )
    }

    #[test]
    fn test_parse_minimal_har() {
        let har = HarReader::from_str(&document(MINIMAL_ENTRY)).unwrap();
        assert_eq!(har.log.version.as_deref(), Some("1.2"));
        assert_eq!(har.log.entries.len(), 1);
        assert_eq!(
            har.log.creator.and_then(|c| c.name).as_deref(),
            Some("test")
        );
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = HarReader::from_str("invalid json content").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_missing_log() {
        let err = HarReader::from_str(r#"{"invalid": "structure"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains("'log'")));
    }

    #[test]
    fn test_rejects_non_array_entries() {
        let err = HarReader::from_str(r#"{"log": {"entries": {}}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains("array")));
    }

    #[test]
    fn test_rejects_empty_entries() {
        let err = HarReader::from_str(&document("")).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains("no entries")));
    }

    #[test]
    fn test_rejects_first_entry_missing_required_field() {
        let entry = r#"{"request": {"url": "https://example.com/"}, "response": {}, "time": 1}"#;
        let err = HarReader::from_str(&document(entry)).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains("startedDateTime")));
    }

    #[test]
    fn test_malformed_creator_keeps_other_metadata() {
        let content = format!(
            r#"{{"log": {{"version": "1.2", "creator": "not-an-object", "entries": [{MINIMAL_ENTRY}]}}}}"#
        );
        let har = HarReader::from_str(&content).unwrap();
        assert_eq!(har.log.version.as_deref(), Some("1.2"));
        assert!(har.log.creator.is_none());
    }

    #[test]
    fn test_entries_are_kept_raw_and_in_order() {
        let second = MINIMAL_ENTRY.replace("https://example.com/", "https://example.com/second");
        let content = format!(
            r#"{{"log": {{"comment": "after entries", "entries": [{MINIMAL_ENTRY}, {second}, "junk"]}}}}"#
        );

        let har = HarReader::from_str(&content).unwrap();

        assert_eq!(har.log.entries.len(), 3);
        assert_eq!(har.log.entries[0]["request"]["url"], "https://example.com/");
        assert_eq!(har.log.entries[1]["request"]["url"], "https://example.com/second");
        assert_eq!(har.log.entries[2], "junk");
        assert_eq!(har.log.comment.as_deref(), Some("after entries"));
    }

    #[test]
    fn test_accepts_byte_order_mark() {
        let content = format!("\u{feff}{}", document(MINIMAL_ENTRY));
        assert!(HarReader::from_str(&content).is_ok());
    }

    #[test]
    fn test_from_file_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        std::fs::write(&path, document(MINIMAL_ENTRY)).unwrap();

        let err = HarReader::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains(".har")));
    }

    #[test]
    fn test_from_file_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.har");
        std::fs::write(&path, [0xff, 0xfe, 0x7b]).unwrap();

        let err = HarReader::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(msg) if msg.contains("encoding")));
    }

    #[test]
    fn test_from_file_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = HarReader::from_file(&dir.path().join("missing.har")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_from_file_accepts_uppercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CAPTURE.HAR");
        std::fs::write(&path, document(MINIMAL_ENTRY)).unwrap();

        assert!(HarReader::from_file(&path).is_ok());
    }
}
