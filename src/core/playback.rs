//! Playback clock management for continuous-time playback.
//!
//! This module provides the PlaybackClock structure that manages the current time,
//! playback speed, zoom level, and the repeating tick that advances time while playing.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::time::TIMELINE_DURATION_SECS;

/// Real-time interval between playback ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Clock time advanced by one tick at 1x speed, in seconds.
pub const TICK_SECS: f64 = 0.1;

/// Default playback speed (1.0 = normal speed).
pub const DEFAULT_SPEED: f64 = 1.0;

/// Available speed presets, in cycle order.
pub const SPEED_OPTIONS: &[f64] = &[0.5, 0.75, 1.0, 1.5, 2.0];

/// Default zoom level.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Minimum zoom level.
pub const MIN_ZOOM: f32 = 0.5;

/// Maximum zoom level.
pub const MAX_ZOOM: f32 = 3.0;

/// Zoom change per zoom-in/zoom-out step.
pub const ZOOM_STEP: f32 = 0.25;

/// Handle to the repeating playback tick.
///
/// The timer exists only while playing. Dropping it cancels it.
#[derive(Debug)]
pub struct TickTimer {
    interval: Duration,
    next_due: Instant,
}

impl TickTimer {
    /// Start a timer whose first tick is one interval from `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Number of ticks that have come due by `now`, advancing the schedule.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while self.next_due <= now {
            self.next_due += self.interval;
            due += 1;
        }
        due
    }

    /// Time left until the next tick.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

/// Manages playback state including current time, speed, and zoom.
#[derive(Debug)]
pub struct PlaybackClock {
    /// Current position on the clock, in seconds.
    current_time: f64,

    /// Total playback length, in seconds.
    duration: f64,

    /// Playback speed multiplier, one of SPEED_OPTIONS.
    speed: f64,

    /// Horizontal stretch of the track.
    zoom: f32,

    /// Repeating tick; present iff playing.
    timer: Option<TickTimer>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(TIMELINE_DURATION_SECS)
    }
}

impl PlaybackClock {
    /// Create a paused clock at time zero.
    pub fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration: duration.max(0.0),
            speed: DEFAULT_SPEED,
            zoom: DEFAULT_ZOOM,
            timer: None,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Scrubber position: current time as a fraction of the duration.
    pub fn position(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.current_time / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Start playback, scheduling the first tick one interval from `now`.
    ///
    /// Playing from the end rewinds to the start first.
    pub fn play(&mut self, now: Instant) {
        if self.timer.is_some() {
            return;
        }
        if self.current_time >= self.duration {
            self.current_time = 0.0;
        }
        self.timer = Some(TickTimer::start(TICK_INTERVAL, now));
        info!(time = self.current_time, speed = self.speed, "playback started");
    }

    /// Stop playback and cancel the tick timer.
    pub fn pause(&mut self) {
        if self.timer.take().is_some() {
            info!(time = self.current_time, "playback paused");
        }
    }

    /// Toggle between playing and paused.
    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Advance the clock by one tick.
    ///
    /// Reaching the end clamps to the duration and stops playback.
    pub fn tick(&mut self) {
        let next = self.current_time + TICK_SECS * self.speed;
        if next >= self.duration {
            self.current_time = self.duration;
            self.timer = None;
            info!("playback reached end");
        } else {
            self.current_time = next;
        }
    }

    /// Run every tick that has come due by `now`.
    ///
    /// Returns the time until the next tick, or `None` when not playing.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        let due = self.timer.as_mut()?.take_due(now);
        for _ in 0..due {
            if !self.is_playing() {
                break;
            }
            self.tick();
        }
        self.timer.as_ref().map(|timer| timer.until_next(now))
    }

    /// Seek to a fraction of the duration. Does not change the playing state.
    pub fn seek_fraction(&mut self, fraction: f32) {
        let fraction = f64::from(fraction.clamp(0.0, 1.0));
        self.current_time = fraction * self.duration;
        debug!(time = self.current_time, "seek");
    }

    /// Seek to an absolute time, clamped to the duration.
    pub fn seek_to(&mut self, seconds: f64) {
        self.current_time = seconds.clamp(0.0, self.duration);
        debug!(time = self.current_time, "seek");
    }

    /// Go to the start.
    pub fn go_to_start(&mut self) {
        self.seek_to(0.0);
    }

    /// Go to the end.
    pub fn go_to_end(&mut self) {
        self.seek_to(self.duration);
    }

    /// Jump to the closest event offset before the current time.
    pub fn step_to_previous(&mut self, offsets: &[f64]) {
        let target = offsets
            .iter()
            .copied()
            .filter(|&t| t < self.current_time - f64::EPSILON)
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.max(t))));
        if let Some(target) = target {
            self.seek_to(target);
        }
    }

    /// Jump to the closest event offset after the current time.
    pub fn step_to_next(&mut self, offsets: &[f64]) {
        let target = offsets
            .iter()
            .copied()
            .filter(|&t| t > self.current_time + f64::EPSILON)
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))));
        if let Some(target) = target {
            self.seek_to(target);
        }
    }

    /// Advance to the next speed preset, wrapping past the last one.
    pub fn cycle_speed(&mut self) {
        self.speed = next_speed(self.speed);
        info!(speed = self.speed, "playback speed changed");
    }

    /// Increase zoom by one step, up to the maximum.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Decrease zoom by one step, down to the minimum.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// The speed preset after `current` in SPEED_OPTIONS order.
///
/// A speed that is not a preset moves to the first preset above it.
pub fn next_speed(current: f64) -> f64 {
    let index = SPEED_OPTIONS
        .iter()
        .position(|&preset| (preset - current).abs() < 1e-9);
    match index {
        Some(i) => SPEED_OPTIONS[(i + 1) % SPEED_OPTIONS.len()],
        None => SPEED_OPTIONS
            .iter()
            .copied()
            .find(|&preset| preset > current)
            .unwrap_or(SPEED_OPTIONS[0]),
    }
}

/// Speed as shown on the speed toggle, e.g. `1.0x` or `0.75x`.
pub fn speed_label(speed: f64) -> String {
    if speed.fract() == 0.0 {
        format!("{:.1}x", speed)
    } else {
        format!("{}x", speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::format_trace_time;

    #[test]
    fn test_new_default_values() {
        let clock = PlaybackClock::new(300.0);
        assert_eq!(clock.current_time(), 0.0);
        assert_eq!(clock.duration(), 300.0);
        assert_eq!(clock.speed(), 1.0);
        assert_eq!(clock.zoom(), 1.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_tick_advances_by_speed() {
        let mut clock = PlaybackClock::new(300.0);
        clock.play(Instant::now());
        clock.tick();
        assert!((clock.current_time() - 0.1).abs() < 1e-9);

        clock.cycle_speed();
        clock.cycle_speed(); // 1.0 -> 1.5 -> 2.0
        assert_eq!(clock.speed(), 2.0);
        clock.tick();
        assert!((clock.current_time() - 0.3).abs() < 1e-9);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_tick_stops_exactly_at_end() {
        let mut clock = PlaybackClock::new(300.0);
        clock.seek_to(300.0 - 0.05);
        clock.play(Instant::now());

        clock.tick();

        assert_eq!(clock.current_time(), 300.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_poll_runs_due_ticks() {
        let mut clock = PlaybackClock::new(300.0);
        let start = Instant::now();
        clock.play(start);

        assert_eq!(clock.poll(start + Duration::from_millis(50)), Some(Duration::from_millis(50)));
        assert_eq!(clock.current_time(), 0.0);

        let remaining = clock.poll(start + Duration::from_millis(350));
        assert!((clock.current_time() - 0.3).abs() < 1e-9);
        assert_eq!(remaining, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_poll_stops_ticking_at_end() {
        let mut clock = PlaybackClock::new(1.0);
        let start = Instant::now();
        clock.play(start);

        let remaining = clock.poll(start + Duration::from_secs(5));

        assert_eq!(remaining, None);
        assert_eq!(clock.current_time(), 1.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_poll_when_paused_does_nothing() {
        let mut clock = PlaybackClock::new(300.0);
        assert_eq!(clock.poll(Instant::now() + Duration::from_secs(1)), None);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_pause_cancels_timer() {
        let mut clock = PlaybackClock::new(300.0);
        let start = Instant::now();
        clock.play(start);
        clock.pause();
        assert!(!clock.is_playing());
        assert_eq!(clock.poll(start + Duration::from_secs(10)), None);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_play_from_end_rewinds() {
        let mut clock = PlaybackClock::new(300.0);
        clock.go_to_end();
        clock.toggle(Instant::now());
        assert!(clock.is_playing());
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_speed_cycle_wraps() {
        let mut clock = PlaybackClock::new(300.0);
        let mut seen = Vec::new();
        for _ in 0..SPEED_OPTIONS.len() {
            clock.cycle_speed();
            seen.push(clock.speed());
        }
        assert_eq!(seen, vec![1.5, 2.0, 0.5, 0.75, 1.0]);
        assert_eq!(next_speed(2.0), 0.5);
    }

    #[test]
    fn test_next_speed_from_off_preset_value() {
        assert_eq!(next_speed(1.2), 1.5);
        assert_eq!(next_speed(9.0), 0.5);
    }

    #[test]
    fn test_speed_label() {
        let labels: Vec<String> = SPEED_OPTIONS.iter().map(|&s| speed_label(s)).collect();
        assert_eq!(labels, vec!["0.5x", "0.75x", "1.0x", "1.5x", "2.0x"]);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut clock = PlaybackClock::new(300.0);
        for _ in 0..20 {
            clock.zoom_in();
        }
        assert_eq!(clock.zoom(), MAX_ZOOM);
        for _ in 0..20 {
            clock.zoom_out();
        }
        assert_eq!(clock.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_seek_keeps_playing_state() {
        let mut clock = PlaybackClock::new(300.0);
        clock.seek_fraction(0.5);
        assert_eq!(clock.current_time(), 150.0);
        assert!(!clock.is_playing());
        assert_eq!(format_trace_time(clock.current_time()), "2:30");

        clock.play(Instant::now());
        clock.seek_fraction(0.25);
        assert_eq!(clock.current_time(), 75.0);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_position_is_clamped_fraction() {
        let mut clock = PlaybackClock::new(300.0);
        clock.seek_to(75.0);
        assert_eq!(clock.position(), 0.25);

        let empty = PlaybackClock::new(0.0);
        assert_eq!(empty.position(), 0.0);
    }

    #[test]
    fn test_step_between_markers() {
        let offsets = [300.0, 35.0, 0.0, 180.0, 90.0];
        let mut clock = PlaybackClock::new(300.0);
        clock.seek_to(50.0);

        clock.step_to_next(&offsets);
        assert_eq!(clock.current_time(), 90.0);

        clock.step_to_previous(&offsets);
        assert_eq!(clock.current_time(), 35.0);

        clock.go_to_start();
        clock.step_to_previous(&offsets);
        assert_eq!(clock.current_time(), 0.0);

        clock.go_to_end();
        clock.step_to_next(&offsets);
        assert_eq!(clock.current_time(), 300.0);
    }
}
