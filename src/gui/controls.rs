//! Playback controls module.
//!
//! This module handles the rendering and interaction of the controls under the
//! timeline: zoom, the clock readout, transport buttons, and the speed toggle.

use eframe::egui::{self, RichText};

use crate::core::playback::{MAX_ZOOM, MIN_ZOOM, PlaybackClock, speed_label};
use crate::core::time::format_trace_time;

/// User actions that can be triggered from the controls panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Toggle between play and pause
    TogglePlayPause,
    /// Go to the start of the session
    GoToStart,
    /// Go to the end of the session
    GoToEnd,
    /// Jump to the previous event marker
    PreviousMarker,
    /// Jump to the next event marker
    NextMarker,
    /// Advance to the next speed preset
    CycleSpeed,
    /// Stretch the track
    ZoomIn,
    /// Shrink the track
    ZoomOut,
}

/// Renders playback controls and returns any actions triggered by user interaction.
pub struct ControlsRenderer<'a> {
    /// Whether controls should be enabled
    enabled: bool,
    /// Playback clock being controlled
    clock: &'a PlaybackClock,
}

impl<'a> ControlsRenderer<'a> {
    /// Create a new controls renderer.
    pub fn new(enabled: bool, clock: &'a PlaybackClock) -> Self {
        Self { enabled, clock }
    }

    /// Render the controls and return any triggered action.
    pub fn render(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action: Option<ControlAction> = None;

        ui.add_enabled_ui(self.enabled, |ui| {
            ui.horizontal(|ui| {
                action = self.render_zoom_control(ui).or(action);
                ui.separator();
                self.render_clock(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    action = self.render_speed_control(ui).or(action);
                    ui.separator();
                    action = self.render_transport_buttons(ui).or(action);
                });
            });
        });

        action
    }

    /// Render zoom out/in buttons around the zoom readout.
    fn render_zoom_control(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action = None;
        let zoom = self.clock.zoom();

        if ui
            .add_enabled(zoom > MIN_ZOOM, egui::Button::new("➖"))
            .on_hover_text("Zoom out (-)")
            .clicked()
        {
            action = Some(ControlAction::ZoomOut);
        }
        ui.label(RichText::new(format!("Zoom {:.2}x", zoom)).small().strong());
        if ui
            .add_enabled(zoom < MAX_ZOOM, egui::Button::new("➕"))
            .on_hover_text("Zoom in (+)")
            .clicked()
        {
            action = Some(ControlAction::ZoomIn);
        }

        action
    }

    /// Render the current time / duration readout.
    fn render_clock(&self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(format_trace_time(self.clock.current_time()))
                .monospace()
                .strong(),
        );
        ui.label(
            RichText::new(format!("/ {}", format_trace_time(self.clock.duration())))
                .monospace()
                .weak(),
        );
    }

    /// Render transport buttons (laid out right to left).
    fn render_transport_buttons(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action = None;

        if ui.button("⏭").on_hover_text("Go to end (End)").clicked() {
            action = Some(ControlAction::GoToEnd);
        }
        if ui
            .button("⏩")
            .on_hover_text("Next marker (→)")
            .clicked()
        {
            action = Some(ControlAction::NextMarker);
        }

        let (btn_text, hover_text) = if self.clock.is_playing() {
            ("⏸", "Pause (Space)")
        } else {
            ("▶", "Play (Space)")
        };
        if ui.button(btn_text).on_hover_text(hover_text).clicked() {
            action = Some(ControlAction::TogglePlayPause);
        }

        if ui
            .button("⏪")
            .on_hover_text("Previous marker (←)")
            .clicked()
        {
            action = Some(ControlAction::PreviousMarker);
        }
        if ui.button("⏮").on_hover_text("Go to start (Home)").clicked() {
            action = Some(ControlAction::GoToStart);
        }

        action
    }

    /// Render the speed toggle, which cycles through the presets.
    fn render_speed_control(&self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action = None;

        if ui
            .button(speed_label(self.clock.speed()))
            .on_hover_text("Cycle playback speed (S)")
            .clicked()
        {
            action = Some(ControlAction::CycleSpeed);
        }
        ui.label(RichText::new("Speed").small());

        action
    }
}
