//! Shared selection between the timeline and the trace list.

use tracing::info;

/// The selected marker, identified by its `M:SS` display label.
///
/// Owned by the session root. The timeline and trace list only read it and
/// request changes through actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a label. Returns `true` if the selection changed.
    pub fn select(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.selected.as_deref() == Some(label.as_str()) {
            return false;
        }
        info!(label = %label, "selection changed");
        self.selected = Some(label);
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let selection = SelectionState::new();
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_select_reports_changes() {
        let mut selection = SelectionState::new();
        assert!(selection.select("0:35"));
        assert!(!selection.select("0:35"));
        assert!(selection.select("1:30"));
        assert_eq!(selection.selected(), Some("1:30"));
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionState::new();
        selection.select("0:35");
        selection.clear();
        assert_eq!(selection.selected(), None);
    }
}
