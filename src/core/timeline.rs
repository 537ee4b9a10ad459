//! Timeline layout and node interaction.
//!
//! Places one video/agent node pair per event on a normalized `[0, 1]` axis
//! and decides what a pointer click on the track means.

use super::time::format_trace_time;
use super::trace::{ActionKind, TraceTimings};

/// Which row of the track a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeVariant {
    /// Video-frame row; shows a preview tooltip on hover
    Video,
    /// Agent-action row; always shows an icon badge
    Agent,
}

/// A positioned marker on the track.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineNode {
    /// Normalized position, `offset / duration`
    pub position: f32,
    pub variant: NodeVariant,
    /// Badge glyph (agent nodes)
    pub icon: Option<&'static str>,
    /// `M:SS` label used for selection
    pub display_time: String,
    pub has_error: bool,
    pub is_selected: bool,
}

impl TimelineNode {
    /// Whether the node is drawn emphasized (wide, full opacity, glow).
    ///
    /// Selection only affects video nodes.
    pub fn is_emphasized(&self, hovered: bool) -> bool {
        hovered || (self.variant == NodeVariant::Video && self.is_selected)
    }

    /// Whether hovering this node reveals the preview tooltip.
    pub fn shows_preview(&self, hovered: bool) -> bool {
        hovered && self.variant == NodeVariant::Video
    }
}

/// The video and agent nodes for one event.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePair {
    pub video: TimelineNode,
    pub agent: TimelineNode,
}

/// Normalized positions for event offsets.
///
/// Positions are not clamped: an offset outside `[0, duration]` lands outside
/// the track. Zoom plays no part here.
pub fn node_positions(offsets: &[f64], duration: f64) -> Vec<f32> {
    if duration <= 0.0 {
        return vec![0.0; offsets.len()];
    }
    offsets
        .iter()
        .map(|offset| (offset / duration) as f32)
        .collect()
}

/// Build the node pairs for a set of timings, in timing order.
pub fn layout_nodes(timings: &TraceTimings, duration: f64, selected: Option<&str>) -> Vec<NodePair> {
    let positions = node_positions(&timings.offsets, duration);
    positions
        .into_iter()
        .enumerate()
        .map(|(i, position)| {
            let display_time = format_trace_time(timings.offsets[i]);
            let has_error = timings.errors.get(i).copied().unwrap_or(false);
            let is_selected = selected == Some(display_time.as_str());
            let icon = Some(
                timings
                    .actions
                    .get(i)
                    .and_then(Option::as_ref)
                    .map_or("•", ActionKind::glyph),
            );
            NodePair {
                video: TimelineNode {
                    position,
                    variant: NodeVariant::Video,
                    icon: None,
                    display_time: display_time.clone(),
                    has_error,
                    is_selected,
                },
                agent: TimelineNode {
                    position,
                    variant: NodeVariant::Agent,
                    icon,
                    display_time,
                    has_error,
                    is_selected,
                },
            }
        })
        .collect()
}

/// Pixel x of a normalized position on a track of `base_width` at `zoom`.
pub fn pixel_offset(position: f32, base_width: f32, zoom: f32) -> f32 {
    position * base_width * zoom
}

/// Per-track hover state: which node pair, if any, the pointer is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeHover {
    hovered: Option<(usize, NodeVariant)>,
}

impl NodeHover {
    pub fn enter(&mut self, index: usize, variant: NodeVariant) {
        self.hovered = Some((index, variant));
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn is_hovered(&self, index: usize, variant: NodeVariant) -> bool {
        self.hovered == Some((index, variant))
    }

    pub fn hovered(&self) -> Option<(usize, NodeVariant)> {
        self.hovered
    }
}

/// Outcome of a click on the timeline area.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackClick {
    /// A node preview was clicked: select it, do not seek
    Select(String),
    /// The bare track was clicked: seek
    Seek(f32),
    /// The click hit the scrubber handle: nothing
    Ignored,
}

/// Decide what a click means, with node previews taking precedence over seeking.
pub fn resolve_track_click(preview_hit: Option<&str>, seek: Option<f32>) -> TrackClick {
    match (preview_hit, seek) {
        (Some(label), _) => TrackClick::Select(label.to_string()),
        (None, Some(fraction)) => TrackClick::Seek(fraction),
        (None, None) => TrackClick::Ignored,
    }
}

/// Ruler tick times (seconds) every `step` up to `duration`.
pub fn ruler_ticks(duration: f64, step: f64) -> Vec<f64> {
    if duration <= 0.0 || step <= 0.0 {
        return vec![0.0];
    }
    let count = (duration / step).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// Ruler spacing that keeps labels readable at the given zoom.
pub fn ruler_step(zoom: f32) -> f64 {
    if zoom >= 2.0 {
        15.0
    } else if zoom >= 1.0 {
        30.0
    } else {
        60.0
    }
}
