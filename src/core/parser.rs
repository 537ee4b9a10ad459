//! JSON parser for trace session data.
//!
//! This module parses the session format (version 1) into the internal
//! `TraceSession` structure. Offsets are taken as authored: they are not
//! checked against the duration and duplicates are not rejected.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::time::TIMELINE_DURATION_SECS;
use super::trace::{ActionKind, TraceRecord, TraceSession};

/// The session embedded in the binary.
pub const EMBEDDED_SESSION: &str = include_str!("../../assets/session.json");

/// Errors that can occur during session parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax error
    #[error("Invalid JSON syntax: {0}")]
    JsonSyntax(#[from] serde_json::Error),

    /// Unsupported format version
    #[error("Unsupported format version {version}: expected version 1")]
    UnsupportedVersion { version: u32 },

    /// Duration is negative or not a number
    #[error("Invalid session duration {value}: expected a non-negative number of seconds")]
    InvalidDuration { value: f64 },
}

// ============================================================================
// Intermediate JSON structures for deserialization
// ============================================================================

/// Top-level JSON structure.
#[derive(Debug, Deserialize)]
struct JsonSessionFile {
    version: u32,
    session: JsonSession,
    #[serde(default)]
    records: Vec<JsonRecord>,
}

/// Session header in JSON format.
#[derive(Debug, Deserialize)]
struct JsonSession {
    title: String,
    #[serde(default)]
    screenshot_url: String,
    #[serde(default)]
    duration_secs: Option<f64>,
}

/// Trace record in JSON format.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    offset_secs: f64,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    has_error: bool,
    title: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    visual_description: String,
    #[serde(default)]
    agent_rationale: String,
    #[serde(default)]
    payload: Value,
}

// ============================================================================
// Parser implementation
// ============================================================================

/// Parse a JSON string into a `TraceSession`.
///
/// Records keep the order they are written in.
pub fn parse_json(content: &str) -> Result<TraceSession, ParseError> {
    let file: JsonSessionFile = serde_json::from_str(content)?;

    if file.version != 1 {
        return Err(ParseError::UnsupportedVersion {
            version: file.version,
        });
    }

    let duration_secs = file.session.duration_secs.unwrap_or(TIMELINE_DURATION_SECS);
    if duration_secs.is_nan() || duration_secs < 0.0 {
        return Err(ParseError::InvalidDuration {
            value: duration_secs,
        });
    }

    let records = file.records.into_iter().map(convert_record).collect();

    Ok(TraceSession {
        title: file.session.title,
        screenshot_url: file.session.screenshot_url,
        duration_secs,
        records,
    })
}

/// Parse the session bundled with the application.
pub fn parse_embedded() -> Result<TraceSession, ParseError> {
    parse_json(EMBEDDED_SESSION)
}

/// Convert a JSON record to a TraceRecord.
fn convert_record(json: JsonRecord) -> TraceRecord {
    TraceRecord {
        offset_secs: json.offset_secs,
        action: json.action.as_deref().map(ActionKind::from_name),
        has_error: json.has_error,
        title: json.title,
        error_message: json.error_message,
        visual_description: json.visual_description,
        agent_rationale: json.agent_rationale,
        raw_payload: json.payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn minimal(records: &str) -> String {
        format!(
            r#"{{"version": 1, "session": {{"title": "Sheet", "duration_secs": 120}}, "records": {records}}}"#
        )
    }

    #[test]
    fn test_parse_minimal_session() {
        let session = parse_json(&minimal("[]")).unwrap();
        assert_eq!(session.title, "Sheet");
        assert_eq!(session.duration_secs, 120.0);
        assert!(session.records.is_empty());
        assert!(session.screenshot_url.is_empty());
    }

    #[test]
    fn test_parse_record_fields() {
        let json = minimal(
            r#"[{"offset_secs": 35, "action": "click", "title": "AI Response",
                 "visual_description": "Header row", "agent_rationale": "Open filter",
                 "payload": {"action": "click", "params": {"x": 4}}}]"#,
        );
        let session = parse_json(&json).unwrap();
        let record = &session.records[0];
        assert_eq!(record.offset_secs, 35.0);
        assert_eq!(record.action, Some(ActionKind::Click));
        assert!(!record.has_error);
        assert_eq!(record.display_label(), "0:35");
        assert_eq!(record.raw_payload["params"]["x"], 4);
    }

    #[test]
    fn test_parse_optional_fields_default() {
        let json = minimal(r#"[{"offset_secs": 0, "title": "Visual Marker"}]"#);
        let session = parse_json(&json).unwrap();
        let record = &session.records[0];
        assert_eq!(record.action, None);
        assert_eq!(record.error_message, None);
        assert_eq!(record.raw_payload, Value::Null);
    }

    #[test]
    fn test_parse_keeps_authored_order() {
        let json = minimal(
            r#"[{"offset_secs": 90, "title": "a"}, {"offset_secs": 10, "title": "b"},
                {"offset_secs": 60, "title": "c"}]"#,
        );
        let session = parse_json(&json).unwrap();
        let offsets: Vec<f64> = session.records.iter().map(|r| r.offset_secs).collect();
        assert_eq!(offsets, vec![90.0, 10.0, 60.0]);
    }

    #[test]
    fn test_parse_does_not_validate_offsets() {
        let json = minimal(r#"[{"offset_secs": 500, "title": "late"}]"#);
        let session = parse_json(&json).unwrap();
        assert_eq!(session.records[0].offset_secs, 500.0);
    }

    #[test]
    fn test_missing_duration_uses_default() {
        let json = r#"{"version": 1, "session": {"title": "Sheet"}}"#;
        let session = parse_json(json).unwrap();
        assert_eq!(session.duration_secs, TIMELINE_DURATION_SECS);
    }

    #[test]
    fn test_unsupported_version() {
        let json = r#"{"version": 2, "session": {"title": "Sheet"}}"#;
        match parse_json(json) {
            Err(ParseError::UnsupportedVersion { version }) => assert_eq!(version, 2),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{"version": 1, "session": {"title": "Sheet", "duration_secs": -1}}"#;
        assert!(matches!(
            parse_json(json),
            Err(ParseError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_json("{not json"),
            Err(ParseError::JsonSyntax(_))
        ));
    }

    #[test]
    fn test_embedded_session_is_well_formed() {
        let session = parse_embedded().unwrap();
        assert_eq!(session.title, "Google Sheets");
        assert_eq!(session.duration_secs, 300.0);
        assert!(!session.records.is_empty());

        let labels: HashSet<String> = session.records.iter().map(|r| r.display_label()).collect();
        assert_eq!(labels.len(), session.records.len(), "labels must be unique");
        assert!(session.records.iter().any(|r| r.has_error));
        assert!(
            session
                .records
                .iter()
                .all(|r| (0.0..=session.duration_secs).contains(&r.offset_secs))
        );
    }
}
