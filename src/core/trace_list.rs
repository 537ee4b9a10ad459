//! Trace list state: per-card UI state and selection synchronization.
//!
//! The list renders records in the order given and keeps track of which card
//! to bring into view when the shared selection changes.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{Duration, Instant};

use tracing::debug;

use super::trace::{TraceRecord, TraceTimings};

/// How long the "Copied!" feedback stays visible.
const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Thumbs up/down feedback on a card. Local UI state only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Up,
    Down,
}

/// Local state for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardState {
    /// Whether the rationale text is shown
    pub rationale_expanded: bool,
    pub rating: Option<Rating>,
    /// Whether the branch button has been pressed
    pub branched: bool,
    /// When the payload was last copied
    pub copied_at: Option<Instant>,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            rationale_expanded: true,
            rating: None,
            branched: false,
            copied_at: None,
        }
    }
}

impl CardState {
    /// Whether the "Copied!" feedback should still be shown.
    pub fn copy_feedback_visible(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < COPY_FEEDBACK_DURATION)
    }
}

/// State of the trace list across frames.
#[derive(Debug, Default)]
pub struct TraceListState {
    cards: Vec<CardState>,
    /// Selection the list last reacted to
    last_seen_selection: Option<String>,
    /// Fingerprint of the record set timings were reported for
    reported_for: Option<u64>,
}

impl TraceListState {
    pub fn new(record_count: usize) -> Self {
        Self {
            cards: vec![CardState::default(); record_count],
            last_seen_selection: None,
            reported_for: None,
        }
    }

    pub fn card(&self, index: usize) -> Option<&CardState> {
        self.cards.get(index)
    }

    /// Report the derived timings for `records`, once per record set.
    ///
    /// Returns `None` when the same record set has already been reported.
    pub fn report_timings(&mut self, records: &[TraceRecord]) -> Option<TraceTimings> {
        let fingerprint = fingerprint(records);
        if self.reported_for == Some(fingerprint) {
            return None;
        }
        self.reported_for = Some(fingerprint);
        if self.cards.len() != records.len() {
            self.cards = vec![CardState::default(); records.len()];
        }
        debug!(records = records.len(), "reporting trace timings");
        Some(TraceTimings::from_records(records))
    }

    /// React to the shared selection.
    ///
    /// Returns the index of the card to scroll into view, only on the first
    /// call after the selection changed. With duplicate labels the first
    /// matching card wins.
    pub fn sync_selection(&mut self, selected: Option<&str>, records: &[TraceRecord]) -> Option<usize> {
        if self.last_seen_selection.as_deref() == selected {
            return None;
        }
        self.last_seen_selection = selected.map(str::to_string);
        let label = selected?;
        let index = records.iter().position(|r| r.display_label() == label);
        debug!(label, ?index, "scrolling trace card into view");
        index
    }

    /// Indices of every card matching the selection.
    pub fn highlighted(selected: Option<&str>, records: &[TraceRecord]) -> Vec<usize> {
        let Some(label) = selected else {
            return Vec::new();
        };
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.display_label() == label)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn toggle_rationale(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.rationale_expanded = !card.rationale_expanded;
        }
    }

    /// Set a rating; rating the same way twice clears it.
    pub fn rate(&mut self, index: usize, rating: Rating) {
        if let Some(card) = self.cards.get_mut(index) {
            card.rating = if card.rating == Some(rating) {
                None
            } else {
                Some(rating)
            };
        }
    }

    pub fn toggle_branch(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.branched = !card.branched;
        }
    }

    pub fn mark_copied(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.copied_at = Some(Instant::now());
        }
    }
}

/// Identity of a record set, from its labels and offsets.
fn fingerprint(records: &[TraceRecord]) -> u64 {
    let mut hasher = DefaultHasher::new();
    records.len().hash(&mut hasher);
    for record in records {
        record.display_label().hash(&mut hasher);
        record.offset_secs.to_bits().hash(&mut hasher);
        record.has_error.hash(&mut hasher);
    }
    hasher.finish()
}
