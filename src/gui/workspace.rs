//! Workspace view: the screenshot area above the timeline.

use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, RichText, Stroke, StrokeKind};
use eframe::egui::load::TexturePoll;

use crate::core::time::display_timestamps;

/// Number of frame timestamps along the bottom of the screenshot.
const FILMSTRIP_FRAMES: usize = 5;

/// Height of the timestamp strip.
const FILMSTRIP_HEIGHT: f32 = 22.0;

/// Renders the workspace header and the session screenshot.
pub struct WorkspaceRenderer<'a> {
    title: &'a str,
    screenshot_url: &'a str,
}

impl<'a> WorkspaceRenderer<'a> {
    pub fn new(title: &'a str, screenshot_url: &'a str) -> Self {
        Self {
            title,
            screenshot_url,
        }
    }

    pub fn render(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("📷 Workspace View: {}", self.title)).small());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !self.screenshot_url.is_empty() {
                    ui.hyperlink_to(RichText::new("Full View").small().strong(), self.screenshot_url);
                }
            });
        });
        ui.separator();
        self.draw_screenshot_frame(ui);
    }

    /// Draw the screenshot with a strip of frame timestamps under it.
    fn draw_screenshot_frame(&self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let outer = response.rect;
        painter.rect_filled(outer, 0.0, Color32::from_rgb(20, 20, 24));

        let mut rect = outer.shrink(24.0);
        if rect.width() <= 0.0 || rect.height() <= FILMSTRIP_HEIGHT {
            return;
        }
        let strip = egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - FILMSTRIP_HEIGHT),
            rect.max,
        );
        rect.set_bottom(strip.top() - 4.0);
        match self.load_screenshot(ui, rect) {
            ScreenshotState::Ready => {}
            ScreenshotState::Loading => draw_placeholder(&painter, rect, "Loading screenshot..."),
            ScreenshotState::Unavailable => {
                draw_placeholder(&painter, rect, "Agent Workspace Screenshot")
            }
        }

        // Frame timestamps spread across the recording
        let labels = display_timestamps(FILMSTRIP_FRAMES);
        let cell = strip.width() / labels.len() as f32;
        for (i, label) in labels.iter().enumerate() {
            painter.text(
                egui::pos2(strip.left() + cell * (i as f32 + 0.5), strip.center().y),
                Align2::CENTER_CENTER,
                label,
                FontId::monospace(11.0),
                Color32::GRAY,
            );
        }
    }

    /// Paint the screenshot fitted into `rect` once the loader has it.
    fn load_screenshot(&self, ui: &egui::Ui, rect: Rect) -> ScreenshotState {
        if self.screenshot_url.is_empty() {
            return ScreenshotState::Unavailable;
        }
        let image = egui::Image::new(self.screenshot_url);
        match image.load_for_size(ui.ctx(), rect.size()) {
            Ok(TexturePoll::Ready { texture }) if texture.size.min_elem() > 0.0 => {
                let scale = (rect.width() / texture.size.x).min(rect.height() / texture.size.y);
                image.paint_at(ui, Rect::from_center_size(rect.center(), texture.size * scale));
                ScreenshotState::Ready
            }
            Ok(TexturePoll::Pending { .. }) => ScreenshotState::Loading,
            Ok(TexturePoll::Ready { .. }) | Err(_) => ScreenshotState::Unavailable,
        }
    }
}

/// Where the screenshot stands this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenshotState {
    Ready,
    Loading,
    Unavailable,
}

/// Draw a spreadsheet-like frame standing in for the screenshot.
fn draw_placeholder(painter: &Painter, rect: Rect, caption: &str) {
    let stroke = Stroke::new(1.0, Color32::from_rgb(60, 60, 66));
    painter.rect_filled(rect, 4.0, Color32::from_rgb(36, 36, 42));
    painter.rect_stroke(rect, 4.0, stroke, StrokeKind::Inside);

    // Spreadsheet grid
    let rows = 8;
    let cols = 6;
    let row_height = rect.height() / rows as f32;
    let col_width = rect.width() / cols as f32;
    for i in 1..rows {
        let y = rect.top() + row_height * i as f32;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
    }
    for i in 1..cols {
        let x = rect.left() + col_width * i as f32;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
    }

    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        caption,
        FontId::proportional(16.0),
        Color32::DARK_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::headless::Harness;

    #[test]
    fn test_placeholder_when_screenshot_cannot_load() {
        let mut harness = Harness::new(800.0, 500.0);
        // No loaders are installed on a bare context
        harness.frame(Vec::new(), |ui| {
            WorkspaceRenderer::new("Google Sheets", "https://example.com/shot.png").render(ui);
            None::<()>
        });
        assert!(harness.text_rect("Agent Workspace Screenshot").is_some());
        assert!(harness.text_rect("0:00").is_some());
    }

    #[test]
    fn test_placeholder_without_url() {
        let mut harness = Harness::new(800.0, 500.0);
        harness.frame(Vec::new(), |ui| {
            WorkspaceRenderer::new("Google Sheets", "").render(ui);
            None::<()>
        });
        assert!(harness.text_rect("Agent Workspace Screenshot").is_some());
        assert!(harness.text_rect("Full View").is_none());
    }
}
