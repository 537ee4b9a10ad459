//! Main application state and GUI logic.
//!
//! This module defines the session view, which owns the shared selection and
//! wires the timeline track and the trace panel together.

use std::time::Instant;

use eframe::egui;
use tracing::{debug, error, info, warn};

use crate::core::config::AppSettings;
use crate::core::error::AppError;
use crate::core::parser::{self, ParseError};
use crate::core::playback::PlaybackClock;
use crate::core::selection::SelectionState;
use crate::core::time::format_trace_time;
use crate::core::trace::{TraceSession, TraceTimings};
use crate::core::trace_list::TraceListState;

use super::controls::{ControlAction, ControlsRenderer};
use super::header::{HeaderRenderer, HeaderState};
use super::timeline::{TimelineAction, TimelineRenderer, TimelineView};
use super::trace_panel::{TracePanelAction, TracePanelRenderer, TraceTab};
use super::workspace::WorkspaceRenderer;

/// Application state indicating whether the session loaded.
#[derive(Debug, Clone)]
pub enum AppState {
    /// The session is loaded and ready for viewing
    Ready,
    /// The session could not be loaded
    Error(AppError),
}

impl AppState {
    /// Returns true if playback controls should be enabled.
    pub fn controls_enabled(&self) -> bool {
        matches!(self, AppState::Ready)
    }
}

/// Kind of status message to display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    /// Success message (shown in green)
    Success,
    /// Error message (shown in red)
    Error,
}

/// A status message with its kind and timestamp.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text
    pub text: String,
    /// Kind of message (success/error)
    pub kind: StatusKind,
    /// When the message was created (for auto-dismiss)
    pub created_at: Instant,
}

impl StatusMessage {
    /// Create a new status message.
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    /// Duration to show status messages before auto-dismissing.
    const DISPLAY_DURATION: std::time::Duration = std::time::Duration::from_secs(5);

    /// Check if the message should still be displayed.
    pub fn is_visible(&self) -> bool {
        self.created_at.elapsed() < Self::DISPLAY_DURATION
    }
}

/// The session view: root of the UI and owner of the selection.
pub struct TraceViewerApp {
    state: AppState,
    session: Option<TraceSession>,
    header: HeaderState,
    clock: PlaybackClock,
    timeline: TimelineView,
    /// Single source of truth for the selected display label
    selection: SelectionState,
    trace_list: TraceListState,
    trace_tab: TraceTab,
    /// Per-record timings reported by the trace list
    timings: Option<TraceTimings>,
    status_message: Option<StatusMessage>,
    settings: AppSettings,
}

impl TraceViewerApp {
    /// Create a new application instance with the embedded session.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        // Loaders for the workspace screenshot
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Self::with_settings(settings)
    }

    fn with_settings(settings: AppSettings) -> Self {
        let mut app = Self {
            state: AppState::Ready,
            session: None,
            header: HeaderState::default(),
            clock: PlaybackClock::default(),
            timeline: TimelineView::default(),
            selection: SelectionState::new(),
            trace_list: TraceListState::default(),
            trace_tab: TraceTab::default(),
            timings: None,
            status_message: None,
            settings,
        };
        app.load_session(parser::parse_embedded());
        app
    }

    /// Install a parsed session, or enter the error state.
    fn load_session(&mut self, result: Result<TraceSession, ParseError>) {
        match result {
            Ok(session) => {
                info!(
                    title = %session.title,
                    records = session.records.len(),
                    duration = session.duration_secs,
                    "session loaded"
                );
                self.clock = PlaybackClock::new(session.duration_secs);
                self.trace_list = TraceListState::new(session.records.len());
                self.timings = None;
                self.selection.clear();
                self.set_status(
                    format!(
                        "Loaded: {} ({} records, {})",
                        session.title,
                        session.records.len(),
                        format_trace_time(session.duration_secs)
                    ),
                    StatusKind::Success,
                );
                self.session = Some(session);
                self.state = AppState::Ready;
            }
            Err(e) => {
                error!(error = %e, "failed to load session");
                self.session = None;
                self.state = AppState::Error(AppError::from(e));
            }
        }
    }

    /// Show a status message in the header.
    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status_message = Some(StatusMessage::new(text, kind));
    }

    /// Save settings, reporting failures as a status message.
    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            warn!(error = %e.brief_description(), "settings not saved");
            self.set_status(e.brief_description(), StatusKind::Error);
        }
    }
}

impl eframe::App for TraceViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Run due playback ticks and wake up for the next one
        if let Some(wait) = self.clock.poll(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        if let Some(action) = self.handle_keyboard_shortcuts(ctx) {
            self.handle_control_action(action);
        }

        self.render_header(ctx);
        self.render_trace_panel(ctx);
        self.render_controls(ctx);
        self.render_timeline(ctx);
        self.render_workspace(ctx);

        self.handle_close_request(ctx);
    }
}

impl TraceViewerApp {
    /// Handle keyboard shortcuts for playback control.
    ///
    /// Returns an action if a keyboard shortcut was triggered, None otherwise.
    fn handle_keyboard_shortcuts(&self, ctx: &egui::Context) -> Option<ControlAction> {
        if !self.state.controls_enabled() || ctx.wants_keyboard_input() {
            return None;
        }

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Space) {
                return Some(ControlAction::TogglePlayPause);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                return Some(ControlAction::PreviousMarker);
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                return Some(ControlAction::NextMarker);
            }
            if i.key_pressed(egui::Key::Home) {
                return Some(ControlAction::GoToStart);
            }
            if i.key_pressed(egui::Key::End) {
                return Some(ControlAction::GoToEnd);
            }
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                return Some(ControlAction::ZoomIn);
            }
            if i.key_pressed(egui::Key::Minus) {
                return Some(ControlAction::ZoomOut);
            }
            if i.key_pressed(egui::Key::S) {
                return Some(ControlAction::CycleSpeed);
            }
            None
        })
    }

    /// Render the header with the session selectors and status message.
    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Trace Session Viewer");
                ui.separator();
                HeaderRenderer::new(&mut self.header).render(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_status_message(ui);
                });
            });
        });
    }

    /// Render the status message if one is active.
    fn render_status_message(&mut self, ui: &mut egui::Ui) {
        if self
            .status_message
            .as_ref()
            .is_some_and(|msg| !msg.is_visible())
        {
            self.status_message = None;
            return;
        }

        let Some(msg) = &self.status_message else {
            return;
        };
        let color = match msg.kind {
            StatusKind::Success => self.settings.colors.status_success_color(),
            StatusKind::Error => self.settings.colors.status_error_color(),
        };
        let text = msg.text.clone();

        let mut dismiss_clicked = false;
        ui.horizontal(|ui| {
            if ui.small_button("✕").clicked() {
                dismiss_clicked = true;
            }
            ui.colored_label(color, text);
        });
        if dismiss_clicked {
            self.status_message = None;
        }
    }

    /// Render the trace panel on the right.
    fn render_trace_panel(&mut self, ctx: &egui::Context) {
        let Some(session) = &self.session else {
            return;
        };

        if let Some(timings) = self.trace_list.report_timings(&session.records) {
            debug!(markers = timings.len(), "timeline markers updated");
            self.timings = Some(timings);
        }
        let scroll_to = self
            .trace_list
            .sync_selection(self.selection.selected(), &session.records);

        let mut action: Option<TracePanelAction> = None;
        let response = egui::SidePanel::right("trace_panel")
            .resizable(true)
            .default_width(self.settings.trace_panel_width)
            .show(ctx, |ui| {
                let renderer = TracePanelRenderer::new(
                    &session.records,
                    self.selection.selected(),
                    &self.trace_list,
                    scroll_to,
                    self.trace_tab,
                    &self.settings.colors,
                );
                action = renderer.render(ui);
            });
        self.settings
            .set_trace_panel_width(response.response.rect.width());

        if let Some(action) = action {
            self.handle_trace_action(ctx, action);
        }
    }

    /// Handle an action triggered from the trace panel.
    fn handle_trace_action(&mut self, ctx: &egui::Context, action: TracePanelAction) {
        match action {
            TracePanelAction::Select(label) => {
                self.selection.select(label);
            }
            TracePanelAction::ToggleRationale(index) => self.trace_list.toggle_rationale(index),
            TracePanelAction::Rate(index, rating) => self.trace_list.rate(index, rating),
            TracePanelAction::ToggleBranch(index) => self.trace_list.toggle_branch(index),
            TracePanelAction::CopyPayload(index) => {
                let payload = self
                    .session
                    .as_ref()
                    .and_then(|s| s.records.get(index))
                    .map(|r| r.pretty_payload());
                if let Some(payload) = payload {
                    ctx.copy_text(payload);
                    self.trace_list.mark_copied(index);
                }
            }
            TracePanelAction::SetTab(tab) => self.trace_tab = tab,
        }
    }

    /// Render the playback controls at the very bottom.
    fn render_controls(&mut self, ctx: &egui::Context) {
        let controls_enabled = self.state.controls_enabled();
        let mut action: Option<ControlAction> = None;

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            let renderer = ControlsRenderer::new(controls_enabled, &self.clock);
            action = renderer.render(ui);
            ui.add_space(4.0);
        });

        if let Some(action) = action {
            self.handle_control_action(action);
        }
    }

    /// Handle a control action triggered by user interaction.
    fn handle_control_action(&mut self, action: ControlAction) {
        match action {
            ControlAction::TogglePlayPause => self.clock.toggle(Instant::now()),
            ControlAction::GoToStart => self.clock.go_to_start(),
            ControlAction::GoToEnd => self.clock.go_to_end(),
            ControlAction::PreviousMarker => {
                if let Some(timings) = self.timings.as_ref().filter(|t| !t.is_empty()) {
                    self.clock.step_to_previous(&timings.offsets);
                }
            }
            ControlAction::NextMarker => {
                if let Some(timings) = self.timings.as_ref().filter(|t| !t.is_empty()) {
                    self.clock.step_to_next(&timings.offsets);
                }
            }
            ControlAction::CycleSpeed => self.clock.cycle_speed(),
            ControlAction::ZoomIn => self.clock.zoom_in(),
            ControlAction::ZoomOut => self.clock.zoom_out(),
        }
    }

    /// Render the timeline track above the controls.
    fn render_timeline(&mut self, ctx: &egui::Context) {
        if !self.state.controls_enabled() {
            return;
        }

        let mut action: Option<TimelineAction> = None;
        egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| {
                let renderer = TimelineRenderer::new(
                    &self.clock,
                    self.timings.as_ref(),
                    self.selection.selected(),
                    &self.settings.colors,
                );
                action = renderer.render(ui, &mut self.timeline);
            });

        if let Some(action) = action {
            self.handle_timeline_action(action);
        }
    }

    /// Handle an action triggered from the timeline track.
    fn handle_timeline_action(&mut self, action: TimelineAction) {
        match action {
            TimelineAction::Seek(fraction) => self.clock.seek_fraction(fraction),
            TimelineAction::Select(label) => {
                self.selection.select(label);
            }
        }
    }

    /// Render the workspace, or the error details when loading failed.
    fn render_workspace(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match &self.state {
            AppState::Ready => {
                if let Some(session) = &self.session {
                    WorkspaceRenderer::new(&session.title, &session.screenshot_url).render(ui);
                }
            }
            AppState::Error(error) => {
                render_error_details(ui, error);
            }
        });
    }

    /// Persist window size and panel width when the window closes.
    fn handle_close_request(&mut self, ctx: &egui::Context) {
        let (close_requested, inner_rect) =
            ctx.input(|i| (i.viewport().close_requested(), i.viewport().inner_rect));
        if !close_requested {
            return;
        }
        if let Some(rect) = inner_rect {
            self.settings.set_window_size(rect.width(), rect.height());
        }
        self.save_settings();
    }
}

/// Show an error's description and details with a copy button.
fn render_error_details(ui: &mut egui::Ui, error: &AppError) {
    let detailed = error.detailed_info();

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading(format!("⚠ {}", error.dialog_title()));
        ui.add_space(8.0);
        ui.label(error.brief_description());
    });

    ui.add_space(12.0);
    egui::Frame::new()
        .fill(egui::Color32::from_gray(30))
        .inner_margin(8.0)
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(&detailed)
                    .monospace()
                    .color(egui::Color32::LIGHT_GRAY),
            );
        });

    ui.add_space(8.0);
    if ui
        .button("📋 Copy Error")
        .on_hover_text("Copy error details to clipboard")
        .clicked()
    {
        ui.ctx().copy_text(detailed);
    }
}
