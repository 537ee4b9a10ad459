//! Headless egui driver for renderer tests.
//!
//! Runs whole frames against an `egui::Context` with synthetic pointer
//! events, so tests can click on what a renderer actually drew.

use eframe::egui::{self, Event, Modifiers, PointerButton, Pos2, RawInput, Rect, Shape};

const FRAME_DT: f64 = 1.0 / 60.0;

pub(crate) struct Harness {
    pub ctx: egui::Context,
    screen: Rect,
    time: f64,
    shapes: Vec<Shape>,
}

impl Harness {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            ctx: egui::Context::default(),
            screen: Rect::from_min_size(Pos2::ZERO, egui::vec2(width, height)),
            time: 0.0,
            shapes: Vec::new(),
        }
    }

    /// Run one frame with `events`, handing the whole context to `run_ui`.
    ///
    /// Returns the last `Some` produced across all passes of the frame.
    pub fn frame_ctx<A>(
        &mut self,
        events: Vec<Event>,
        mut run_ui: impl FnMut(&egui::Context) -> Option<A>,
    ) -> Option<A> {
        let input = RawInput {
            screen_rect: Some(self.screen),
            time: Some(self.time),
            predicted_dt: FRAME_DT as f32,
            events,
            ..Default::default()
        };
        self.time += FRAME_DT;

        let mut result = None;
        let output = self.ctx.run(input, |ctx| {
            if let Some(action) = run_ui(ctx) {
                result = Some(action);
            }
        });
        self.shapes = output.shapes.into_iter().map(|clipped| clipped.shape).collect();
        result
    }

    /// Run one frame with `events`, showing `add_contents` in a central panel.
    pub fn frame<A>(
        &mut self,
        events: Vec<Event>,
        mut add_contents: impl FnMut(&mut egui::Ui) -> Option<A>,
    ) -> Option<A> {
        self.frame_ctx(events, |ctx| {
            egui::CentralPanel::default()
                .show(ctx, |ui| add_contents(ui))
                .inner
        })
    }

    /// Move the pointer to `pos` and run a frame there.
    pub fn hover<A>(
        &mut self,
        pos: Pos2,
        add_contents: impl FnMut(&mut egui::Ui) -> Option<A>,
    ) -> Option<A> {
        self.frame(vec![Event::PointerMoved(pos)], add_contents)
    }

    /// Move to `pos`, press and release the primary button over three frames.
    ///
    /// Returns the last action any of those frames produced.
    pub fn click_ctx<A>(
        &mut self,
        pos: Pos2,
        mut run_ui: impl FnMut(&egui::Context) -> Option<A>,
    ) -> Option<A> {
        let button = |pressed| Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::default(),
        };
        let mut result = None;
        for events in [
            vec![Event::PointerMoved(pos)],
            vec![button(true)],
            vec![button(false)],
        ] {
            if let Some(action) = self.frame_ctx(events, &mut run_ui) {
                result = Some(action);
            }
        }
        result
    }

    /// `click_ctx` with `add_contents` shown in a central panel.
    pub fn click<A>(
        &mut self,
        pos: Pos2,
        mut add_contents: impl FnMut(&mut egui::Ui) -> Option<A>,
    ) -> Option<A> {
        self.click_ctx(pos, |ctx| {
            egui::CentralPanel::default()
                .show(ctx, |ui| add_contents(ui))
                .inner
        })
    }

    /// Screen rect of the last painted text exactly equal to `text`.
    pub fn text_rect(&self, text: &str) -> Option<Rect> {
        find_shape(&self.shapes, &|shape| match shape {
            Shape::Text(t) if t.galley.text() == text => Some(t.visual_bounding_rect()),
            _ => None,
        })
    }

    /// Screen rect of the last painted rectangle filled with `fill`.
    pub fn filled_rect(&self, fill: egui::Color32) -> Option<Rect> {
        find_shape(&self.shapes, &|shape| match shape {
            Shape::Rect(r) if r.fill == fill => Some(r.rect),
            _ => None,
        })
    }
}

fn find_shape(shapes: &[Shape], matcher: &dyn Fn(&Shape) -> Option<Rect>) -> Option<Rect> {
    shapes.iter().rev().find_map(|shape| match shape {
        Shape::Vec(inner) => find_shape(inner, matcher),
        other => matcher(other),
    })
}
