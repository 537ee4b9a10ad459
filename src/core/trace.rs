//! Trace session data structures.
//!
//! This module defines the records an agent session is made of: each record
//! sits at an offset on the playback clock and carries the action taken,
//! descriptive text, and the raw payload logged for that step.

use serde_json::Value;

use super::time::format_trace_time;

/// Kind of action an agent performed at a trace step.
///
/// The set is open: unknown kinds are kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Pointer click on the workspace
    Click,
    /// Single key press or shortcut
    KeyPress,
    /// Text typed into a field
    TypeText,
    /// Scroll of the workspace
    Scroll,
    /// Screenshot capture
    Screenshot,
    /// Any other action name
    Other(String),
}

impl ActionKind {
    /// Parse an action name as written in session data.
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "key_press" => Self::KeyPress,
            "type_text" => Self::TypeText,
            "scroll" => Self::Scroll,
            "screenshot" => Self::Screenshot,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name of the action as written in session data.
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::KeyPress => "key_press",
            Self::TypeText => "type_text",
            Self::Scroll => "scroll",
            Self::Screenshot => "screenshot",
            Self::Other(name) => name,
        }
    }

    /// Human-readable badge text.
    pub fn label(&self) -> &str {
        match self {
            Self::Click => "Click",
            Self::KeyPress => "Key Press",
            Self::TypeText => "Type",
            Self::Scroll => "Scroll",
            Self::Screenshot => "Screenshot",
            Self::Other(name) => name,
        }
    }

    /// Glyph drawn in the agent-row badge.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Click => "👆",
            Self::KeyPress => "⌨",
            Self::TypeText => "✏",
            Self::Scroll => "↕",
            Self::Screenshot => "📷",
            Self::Other(_) => "•",
        }
    }
}

/// One logged step of an agent session.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    /// Position on the playback clock in seconds
    pub offset_secs: f64,
    /// Action performed at this step, if any
    pub action: Option<ActionKind>,
    /// Whether this step represents a failure
    pub has_error: bool,
    /// Card heading (e.g. "AI Response")
    pub title: String,
    /// Message shown in the error banner
    pub error_message: Option<String>,
    /// What the agent saw on screen
    pub visual_description: String,
    /// Why the agent chose this action
    pub agent_rationale: String,
    /// Raw action payload as logged
    pub raw_payload: Value,
}

impl TraceRecord {
    /// The `M:SS` label identifying this record across the UI.
    pub fn display_label(&self) -> String {
        format_trace_time(self.offset_secs)
    }

    /// The payload pretty-printed with two-space indentation.
    pub fn pretty_payload(&self) -> String {
        serde_json::to_string_pretty(&self.raw_payload).unwrap_or_else(|_| "null".to_string())
    }
}

/// A recorded session: workspace info plus its trace records.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceSession {
    /// Workspace name shown above the screenshot
    pub title: String,
    /// Screenshot of the workspace
    pub screenshot_url: String,
    /// Total playback length in seconds
    pub duration_secs: f64,
    /// Records in authored display order
    pub records: Vec<TraceRecord>,
}

/// Per-record timeline data derived by the trace list.
///
/// The three lists are index-aligned with the records they came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceTimings {
    /// Offsets in seconds
    pub offsets: Vec<f64>,
    /// Action per record
    pub actions: Vec<Option<ActionKind>>,
    /// Error flag per record
    pub errors: Vec<bool>,
}

impl TraceTimings {
    /// Extract timings from records, preserving their order.
    pub fn from_records(records: &[TraceRecord]) -> Self {
        Self {
            offsets: records.iter().map(|r| r.offset_secs).collect(),
            actions: records.iter().map(|r| r.action.clone()).collect(),
            errors: records.iter().map(|r| r.has_error).collect(),
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether there are no events.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn record(offset_secs: f64, action: Option<&str>, has_error: bool) -> TraceRecord {
    TraceRecord {
        offset_secs,
        action: action.map(ActionKind::from_name),
        has_error,
        title: "Step".to_string(),
        error_message: None,
        visual_description: String::new(),
        agent_rationale: String::new(),
        raw_payload: Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_kind_round_trips_known_names() {
        for name in ["click", "key_press", "type_text", "scroll", "screenshot"] {
            assert_eq!(ActionKind::from_name(name).name(), name);
        }
    }

    #[test]
    fn test_action_kind_keeps_unknown_names() {
        let kind = ActionKind::from_name("drag_drop");
        assert_eq!(kind, ActionKind::Other("drag_drop".to_string()));
        assert_eq!(kind.label(), "drag_drop");
        assert_eq!(kind.glyph(), "•");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(record(35.0, None, false).display_label(), "0:35");
        assert_eq!(record(125.7, None, false).display_label(), "2:05");
    }

    #[test]
    fn test_pretty_payload_uses_two_space_indent() {
        let mut rec = record(0.0, Some("click"), false);
        rec.raw_payload = json!({ "action": "click", "params": { "x": 10 } });
        let pretty = rec.pretty_payload();
        assert!(pretty.contains("\n  \"action\": \"click\""));
        assert!(pretty.contains("\n    \"x\": 10"));
    }

    #[test]
    fn test_timings_preserve_order() {
        let records = vec![
            record(300.0, Some("click"), false),
            record(35.0, None, true),
            record(90.0, Some("scroll"), false),
        ];
        let timings = TraceTimings::from_records(&records);
        assert_eq!(timings.len(), 3);
        assert_eq!(timings.offsets, vec![300.0, 35.0, 90.0]);
        assert_eq!(timings.errors, vec![false, true, false]);
        assert_eq!(timings.actions[0], Some(ActionKind::Click));
        assert_eq!(timings.actions[1], None);
    }
}
