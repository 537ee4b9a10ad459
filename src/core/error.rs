//! Application error types for user-facing error handling.
//!
//! Errors here come from loading session data and from the settings file.
//! Trace records that represent agent failures are ordinary data, not errors.

use thiserror::Error;

use super::parser::ParseError;

/// Application-level errors that can be displayed to users.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Session data is malformed
    #[error("Invalid session data")]
    InvalidSessionData {
        /// Description of what's wrong
        message: String,
        /// Line number where the error occurred (1-indexed)
        line: Option<usize>,
        /// Column where the error occurred
        column: Option<usize>,
    },

    /// Session format version is not supported
    #[error("Unsupported version")]
    UnsupportedVersion {
        /// Version found in the data
        found: u32,
        /// Version supported by this application
        supported: u32,
    },

    /// Failed to save settings
    #[error("Failed to save settings")]
    SettingsSaveError {
        /// Reason for the failure
        reason: String,
    },

    /// Failed to load settings
    #[error("Failed to load settings")]
    SettingsLoadError {
        /// Reason for the failure
        reason: String,
    },
}

impl AppError {
    /// Get the title for the error panel.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::InvalidSessionData { .. } => "Invalid Session Data",
            Self::UnsupportedVersion { .. } => "Unsupported Version",
            Self::SettingsSaveError { .. } | Self::SettingsLoadError { .. } => "Settings Error",
        }
    }

    /// Get a brief description of the error suitable for display.
    pub fn brief_description(&self) -> String {
        match self {
            Self::InvalidSessionData { message, .. } => message.clone(),
            Self::UnsupportedVersion { found, supported } => format!(
                "Session format version {} is not supported. This viewer supports version {}.",
                found, supported
            ),
            Self::SettingsSaveError { reason } => format!("Could not save settings: {}", reason),
            Self::SettingsLoadError { reason } => format!("Could not load settings: {}", reason),
        }
    }

    /// Get detailed error information, including positions when known.
    pub fn detailed_info(&self) -> String {
        let mut lines = vec![
            format!("Error Type: {}", self.dialog_title()),
            format!("Description: {}", self.brief_description()),
        ];

        match self {
            Self::InvalidSessionData { line, column, .. } => {
                if let Some(l) = line {
                    lines.push(format!("Line: {}", l));
                }
                if let Some(c) = column {
                    lines.push(format!("Column: {}", c));
                }
            }
            Self::UnsupportedVersion { found, supported } => {
                lines.push(format!("Found Version: {}", found));
                lines.push(format!("Supported Version: {}", supported));
            }
            Self::SettingsSaveError { reason } | Self::SettingsLoadError { reason } => {
                lines.push(format!("Details: {}", reason));
            }
        }

        lines.join("\n")
    }
}

impl From<ParseError> for AppError {
    fn from(error: ParseError) -> Self {
        from_parse_error(&error)
    }
}

/// Create an AppError from a session parse error.
pub fn from_parse_error(error: &ParseError) -> AppError {
    match error {
        ParseError::JsonSyntax(e) => {
            let (line, column) = extract_json_position(e);
            AppError::InvalidSessionData {
                message: e.to_string(),
                line,
                column,
            }
        }
        ParseError::UnsupportedVersion { version } => AppError::UnsupportedVersion {
            found: *version,
            supported: 1,
        },
        ParseError::InvalidDuration { .. } => AppError::InvalidSessionData {
            message: error.to_string(),
            line: None,
            column: None,
        },
    }
}

/// Extract line and column from a serde_json::Error if available.
fn extract_json_position(error: &serde_json::Error) -> (Option<usize>, Option<usize>) {
    // serde_json reports 0 when the position is not applicable
    let line = Some(error.line()).filter(|&l| l > 0);
    let column = Some(error.column()).filter(|&c| c > 0);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_json;

    #[test]
    fn test_json_syntax_error_keeps_position() {
        let parse_error = parse_json("{\n  \"version\": 1,\n  oops\n}").unwrap_err();
        let error = AppError::from(parse_error);

        assert_eq!(error.dialog_title(), "Invalid Session Data");
        match &error {
            AppError::InvalidSessionData { line, column, .. } => {
                assert_eq!(*line, Some(3));
                assert!(column.is_some());
            }
            other => panic!("expected InvalidSessionData, got {other:?}"),
        }
        assert!(error.detailed_info().contains("Line: 3"));
    }

    #[test]
    fn test_unsupported_version_error() {
        let parse_error = parse_json(r#"{"version": 99, "session": {"title": "x"}}"#).unwrap_err();
        let error = AppError::from(parse_error);

        assert_eq!(error.dialog_title(), "Unsupported Version");
        assert!(error.brief_description().contains("99"));
        assert!(error.detailed_info().contains("Supported Version: 1"));
    }

    #[test]
    fn test_invalid_duration_error() {
        let parse_error =
            parse_json(r#"{"version": 1, "session": {"title": "x", "duration_secs": -3}}"#)
                .unwrap_err();
        let error = from_parse_error(&parse_error);
        assert!(error.brief_description().contains("-3"));
    }

    #[test]
    fn test_settings_errors() {
        let error = AppError::SettingsSaveError {
            reason: "disk full".to_string(),
        };
        assert_eq!(error.dialog_title(), "Settings Error");
        assert_eq!(error.brief_description(), "Could not save settings: disk full");
        assert!(error.detailed_info().contains("Details: disk full"));
    }
}
