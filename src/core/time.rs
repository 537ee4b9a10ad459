//! Time formatting shared by the timeline and the trace list.
//!
//! Every component agrees on a point in time through its `M:SS` display label,
//! so this module is the single place that label is produced.

/// Default session length in seconds (0:00 to 5:00).
pub const TIMELINE_DURATION_SECS: f64 = 300.0;

/// Format a seconds offset as `M:SS`.
///
/// Minutes are unbounded and seconds are zero-padded to two digits. Negative
/// or non-finite input is treated as zero.
pub fn format_trace_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

/// Labels for `count` events spread evenly over the default duration.
pub fn display_timestamps(count: usize) -> Vec<String> {
    match count {
        0 => Vec::new(),
        1 => vec![format_trace_time(0.0)],
        _ => (0..count)
            .map(|i| {
                let fraction = i as f64 / (count - 1) as f64;
                format_trace_time(fraction * TIMELINE_DURATION_SECS)
            })
            .collect(),
    }
}
