//! Timeline track rendering module.
//!
//! Draws the time ruler, the video and agent rows with their node pairs, and
//! the scrubber. Pointer interaction is turned into `TimelineAction`s; the
//! track never changes the selection itself.

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, RichText, Sense, Stroke,
    StrokeKind,
};

use crate::core::config::ColorSettings;
use crate::core::playback::PlaybackClock;
use crate::core::scrubber::{ScrubTarget, ScrubberControl, TrackBounds};
use crate::core::time::format_trace_time;
use crate::core::timeline::{
    NodeHover, NodePair, NodeVariant, TimelineNode, TrackClick, layout_nodes, pixel_offset,
    resolve_track_click, ruler_step, ruler_ticks,
};
use crate::core::trace::TraceTimings;

/// Width of the row label column on the left side.
const LABEL_WIDTH: f32 = 120.0;

/// Height of the time ruler.
const RULER_HEIGHT: f32 = 20.0;

/// Height of the video and agent rows.
const ROW_HEIGHT: f32 = 56.0;

/// Width of the pointer hit area around a node.
const NODE_HIT_WIDTH: f32 = 12.0;

/// Width of the scrubber handle's hit area.
const HANDLE_HIT_WIDTH: f32 = 18.0;

/// Radius of the scrubber knob.
const HANDLE_RADIUS: f32 = 9.5;

/// Radius of the agent badge.
const BADGE_RADIUS: f32 = 11.0;

/// Size of the placeholder frame thumbnail in the preview.
const PREVIEW_THUMB_SIZE: egui::Vec2 = egui::vec2(112.0, 63.0);

/// User actions that can be triggered from the timeline track.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    /// Seek to a fraction of the duration (scrubber click or drag)
    Seek(f32),
    /// Select the marker with this display label
    Select(String),
}

/// Timeline state kept across frames.
#[derive(Debug, Default)]
pub struct TimelineView {
    /// Scrubber drag gesture
    pub scrubber: ScrubberControl,
    /// Hovered node, if any
    pub hover: NodeHover,
    /// Where the preview tooltip was drawn last frame
    preview_rect: Option<Rect>,
}

/// Renders the timeline track and returns any action triggered.
pub struct TimelineRenderer<'a> {
    clock: &'a PlaybackClock,
    timings: Option<&'a TraceTimings>,
    selected: Option<&'a str>,
    colors: &'a ColorSettings,
}

impl<'a> TimelineRenderer<'a> {
    pub fn new(
        clock: &'a PlaybackClock,
        timings: Option<&'a TraceTimings>,
        selected: Option<&'a str>,
        colors: &'a ColorSettings,
    ) -> Self {
        Self {
            clock,
            timings,
            selected,
            colors,
        }
    }

    /// Total height of the track.
    pub fn height() -> f32 {
        RULER_HEIGHT + ROW_HEIGHT * 2.0
    }

    /// Render the track and return any triggered action.
    pub fn render(&self, ui: &mut egui::Ui, view: &mut TimelineView) -> Option<TimelineAction> {
        let nodes = self
            .timings
            .map(|t| layout_nodes(t, self.clock.duration(), self.selected))
            .unwrap_or_default();

        let mut action = None;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            self.draw_row_labels(ui);

            let base_width = ui.available_width().max(1.0);
            egui::ScrollArea::horizontal()
                .id_salt("timeline_scroll")
                .show(ui, |ui| {
                    let width = base_width * self.clock.zoom();
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(width, Self::height()), Sense::hover());
                    action = self.render_track(ui, rect, base_width, &nodes, view);
                });
        });
        action
    }

    /// Draw the row labels column.
    fn draw_row_labels(&self, ui: &mut egui::Ui) {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(LABEL_WIDTH, Self::height()), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.colors.label_background_color());

        let rows = [("🎞", "Video Frames"), ("👆", "Agent Actions")];
        for (i, (glyph, label)) in rows.iter().enumerate() {
            let center_y = rect.top() + RULER_HEIGHT + ROW_HEIGHT * (i as f32 + 0.5);
            painter.text(
                Pos2::new(rect.left() + 8.0, center_y),
                Align2::LEFT_CENTER,
                format!("{} {}", glyph, label),
                FontId::proportional(11.0),
                self.colors.text_label_color(),
            );
        }

        painter.line_segment(
            [rect.right_top(), rect.right_bottom()],
            Stroke::new(1.0, self.colors.grid_color()),
        );
    }

    /// Render the scrollable track area.
    fn render_track(
        &self,
        ui: &mut egui::Ui,
        rect: Rect,
        base_width: f32,
        nodes: &[NodePair],
        view: &mut TimelineView,
    ) -> Option<TimelineAction> {
        let zoom = self.clock.zoom();
        let painter = ui.painter_at(rect);
        let video_row = Rect::from_min_size(
            Pos2::new(rect.left(), rect.top() + RULER_HEIGHT),
            egui::vec2(rect.width(), ROW_HEIGHT),
        );
        let agent_row = video_row.translate(egui::vec2(0.0, ROW_HEIGHT));

        self.draw_background(&painter, rect, video_row, agent_row);
        self.draw_ruler(&painter, rect, base_width);

        // Seek math uses the painted (zoomed) rectangle.
        let bounds = TrackBounds::new(rect.left(), rect.width());
        let node_x = |node: &TimelineNode| rect.left() + pixel_offset(node.position, base_width, zoom);

        // Registered first so nodes and the handle sit on top of it.
        let track_response = ui.interact(rect, ui.id().with("scrub_track"), Sense::click());

        // Node hit areas swallow clicks so a marker never reseeks.
        let mut hovered_now = None;
        let mut hit_rects = Vec::with_capacity(nodes.len() * 2);
        for (i, pair) in nodes.iter().enumerate() {
            for (node, row) in [(&pair.video, video_row), (&pair.agent, agent_row)] {
                let hit = Rect::from_center_size(
                    Pos2::new(node_x(node), row.center().y),
                    egui::vec2(NODE_HIT_WIDTH, ROW_HEIGHT),
                );
                let response = ui.interact(
                    hit,
                    ui.id().with(("timeline_node", i, node.variant == NodeVariant::Video)),
                    Sense::click(),
                );
                if response.hovered() {
                    hovered_now = Some((i, node.variant));
                }
                hit_rects.push(((i, node.variant), hit));
            }
        }

        // The preview covers its marker, so hover holds while the pointer is
        // on either of them.
        if hovered_now.is_none()
            && let Some(pointer) = ui.ctx().pointer_hover_pos()
        {
            hovered_now = view.hover.hovered().filter(|current| {
                let on_marker = hit_rects
                    .iter()
                    .any(|(key, hit)| key == current && hit.contains(pointer));
                let on_preview = view.preview_rect.is_some_and(|r| r.contains(pointer));
                on_marker || on_preview
            });
        }
        match hovered_now {
            Some((i, variant)) => view.hover.enter(i, variant),
            None => view.hover.leave(),
        }

        for (i, pair) in nodes.iter().enumerate() {
            let x = node_x(&pair.video);
            self.draw_node(
                &painter,
                &pair.video,
                x,
                video_row,
                view.hover.is_hovered(i, NodeVariant::Video),
            );
            self.draw_node(
                &painter,
                &pair.agent,
                x,
                agent_row,
                view.hover.is_hovered(i, NodeVariant::Agent),
            );
        }

        let preview_hit = self.render_preview(ui, nodes, video_row, &node_x, view);

        // Scrubber handle
        let handle_x = rect.left() + pixel_offset(self.clock.position(), base_width, zoom);
        let handle_rect = Rect::from_center_size(
            Pos2::new(handle_x, rect.center().y),
            egui::vec2(HANDLE_HIT_WIDTH, rect.height()),
        );
        let handle_response =
            ui.interact(handle_rect, ui.id().with("scrub_handle"), Sense::click_and_drag());

        let mut seek = None;
        if handle_response.drag_started() {
            view.scrubber.begin_drag();
        }
        if handle_response.dragged() {
            if let Some(pointer) = ui.ctx().pointer_interact_pos() {
                seek = view.scrubber.drag_to(pointer.x, bounds);
            }
        } else if view.scrubber.is_dragging() {
            view.scrubber.end_drag();
        }

        let click_target = if handle_response.clicked() {
            Some(ScrubTarget::Handle)
        } else if track_response.clicked() {
            Some(ScrubTarget::Track)
        } else {
            None
        };
        if let Some(target) = click_target {
            let pointer = track_response
                .interact_pointer_pos()
                .or_else(|| handle_response.interact_pointer_pos());
            if let Some(pointer) = pointer {
                seek = view.scrubber.click(target, pointer.x, bounds).or(seek);
            }
        }

        if handle_response.hovered() || handle_response.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        } else if track_response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        self.draw_scrubber(&painter, rect, handle_x, view.scrubber.is_dragging());

        match resolve_track_click(preview_hit.as_deref(), seek) {
            TrackClick::Select(label) => Some(TimelineAction::Select(label)),
            TrackClick::Seek(fraction) => Some(TimelineAction::Seek(fraction)),
            TrackClick::Ignored => None,
        }
    }

    /// Draw the track background and row separators.
    fn draw_background(&self, painter: &Painter, rect: Rect, video_row: Rect, agent_row: Rect) {
        painter.rect_filled(rect, 0.0, self.colors.background_color());
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, self.colors.grid_color()),
            StrokeKind::Inside,
        );

        for y in [video_row.top(), agent_row.top()] {
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(0.5, self.colors.grid_color()),
            );
        }
    }

    /// Draw the time ruler with labels spaced for the current zoom.
    fn draw_ruler(&self, painter: &Painter, rect: Rect, base_width: f32) {
        let duration = self.clock.duration();
        if duration <= 0.0 {
            return;
        }
        let zoom = self.clock.zoom();

        for tick in ruler_ticks(duration, ruler_step(zoom)) {
            let position = (tick / duration) as f32;
            let x = rect.left() + pixel_offset(position, base_width, zoom);

            painter.line_segment(
                [
                    Pos2::new(x, rect.top() + RULER_HEIGHT - 5.0),
                    Pos2::new(x, rect.bottom()),
                ],
                Stroke::new(0.5, self.colors.grid_color()),
            );

            let align = if position >= 1.0 {
                Align2::RIGHT_CENTER
            } else {
                Align2::LEFT_CENTER
            };
            painter.text(
                Pos2::new(x + if position >= 1.0 { -3.0 } else { 3.0 }, rect.top() + RULER_HEIGHT / 2.0),
                align,
                format_trace_time(tick),
                FontId::monospace(10.0),
                self.colors.text_header_color(),
            );
        }
    }

    /// Draw one node marker.
    fn draw_node(&self, painter: &Painter, node: &TimelineNode, x: f32, row: Rect, hovered: bool) {
        let base = if node.has_error {
            self.colors.error_color()
        } else if node.variant == NodeVariant::Video && node.is_selected {
            self.colors.selection_color()
        } else {
            match node.variant {
                NodeVariant::Video => self.colors.video_marker_color(),
                NodeVariant::Agent => self.colors.agent_marker_color(),
            }
        };

        let emphasized = node.is_emphasized(hovered);
        let center = Pos2::new(x, row.center().y);
        if emphasized {
            painter.rect_filled(
                Rect::from_center_size(center, egui::vec2(12.0, row.height())),
                2.0,
                base.gamma_multiply(0.25),
            );
        }

        let (width, color) = if emphasized {
            (4.0, base)
        } else {
            (1.0, base.gamma_multiply(0.7))
        };
        painter.rect_filled(
            Rect::from_center_size(center, egui::vec2(width, row.height())),
            2.0,
            color,
        );

        if let (NodeVariant::Agent, Some(icon)) = (node.variant, node.icon) {
            painter.circle_filled(center, BADGE_RADIUS, self.colors.agent_badge_color());
            painter.circle_stroke(center, BADGE_RADIUS, Stroke::new(1.0, base));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                icon,
                FontId::proportional(12.0),
                self.colors.text_label_color(),
            );
        }
    }

    /// Show the frame preview for a hovered video node.
    ///
    /// Returns the node's label when the preview was clicked.
    fn render_preview(
        &self,
        ui: &egui::Ui,
        nodes: &[NodePair],
        video_row: Rect,
        node_x: &dyn Fn(&TimelineNode) -> f32,
        view: &mut TimelineView,
    ) -> Option<String> {
        view.preview_rect = None;

        let (index, variant) = view.hover.hovered()?;
        let node = &nodes.get(index)?.video;
        if variant != NodeVariant::Video || !node.shows_preview(true) {
            return None;
        }

        // Centered on the marker so the pointer never crosses a gap to reach it
        let anchor = Pos2::new(node_x(node), video_row.center().y);
        let border = if node.has_error {
            self.colors.error_color()
        } else {
            self.colors.selection_color()
        };

        let area = egui::Area::new(ui.id().with(("node_preview", index)))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .pivot(Align2::CENTER_CENTER)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(Stroke::new(1.0, border))
                    .show(ui, |ui| {
                        ui.label(RichText::new(format!("Frame @ {}", node.display_time)).small());
                        let (thumb, thumb_response) =
                            ui.allocate_exact_size(PREVIEW_THUMB_SIZE, Sense::click());
                        ui.painter().rect_filled(thumb, 2.0, self.colors.label_background_color());
                        ui.painter().text(
                            thumb.center(),
                            Align2::CENTER_CENTER,
                            &node.display_time,
                            FontId::monospace(12.0),
                            Color32::GRAY,
                        );
                        let button = ui.small_button("Show trace");
                        thumb_response.clicked() || button.clicked()
                    })
                    .inner
            });

        view.preview_rect = Some(area.response.rect);
        area.inner.then(|| node.display_time.clone())
    }

    /// Draw the scrubber line and knob.
    fn draw_scrubber(&self, painter: &Painter, rect: Rect, x: f32, dragging: bool) {
        let color = self.colors.scrubber_color();
        let knob_center = Pos2::new(x, rect.top() + HANDLE_RADIUS + 1.0);

        painter.line_segment(
            [
                Pos2::new(x, knob_center.y + HANDLE_RADIUS),
                Pos2::new(x, rect.bottom()),
            ],
            Stroke::new(if dragging { 2.0 } else { 1.0 }, color),
        );
        painter.circle_filled(knob_center, HANDLE_RADIUS, Color32::BLACK);
        painter.circle_stroke(knob_center, HANDLE_RADIUS - 0.5, Stroke::new(1.0, color));
    }
}
