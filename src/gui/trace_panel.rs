//! Trace panel: the scrollable list of trace cards beside the workspace.
//!
//! Cards render in data order. Clicking a card selects its time label; the
//! card matching the shared selection is highlighted and scrolled into view
//! once per selection change.

use std::time::Duration;

use eframe::egui::{self, RichText, Sense, Stroke, UiBuilder};

use crate::core::config::ColorSettings;
use crate::core::trace::TraceRecord;
use crate::core::trace_list::{CardState, Rating, TraceListState};

/// Tabs at the top of the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceTab {
    #[default]
    Trace,
    Analysis,
}

/// User actions that can be triggered from the trace panel.
#[derive(Debug, Clone, PartialEq)]
pub enum TracePanelAction {
    /// Select the record with this display label
    Select(String),
    /// Expand or collapse a card's rationale
    ToggleRationale(usize),
    /// Thumbs up/down on a card
    Rate(usize, Rating),
    /// Toggle the branch marker on a card
    ToggleBranch(usize),
    /// Copy a card's payload to the clipboard
    CopyPayload(usize),
    /// Switch tabs
    SetTab(TraceTab),
}

/// Renders the trace panel and returns any action triggered.
pub struct TracePanelRenderer<'a> {
    records: &'a [TraceRecord],
    selected: Option<&'a str>,
    list: &'a TraceListState,
    /// Card to bring into view this frame
    scroll_to: Option<usize>,
    tab: TraceTab,
    colors: &'a ColorSettings,
}

impl<'a> TracePanelRenderer<'a> {
    pub fn new(
        records: &'a [TraceRecord],
        selected: Option<&'a str>,
        list: &'a TraceListState,
        scroll_to: Option<usize>,
        tab: TraceTab,
        colors: &'a ColorSettings,
    ) -> Self {
        Self {
            records,
            selected,
            list,
            scroll_to,
            tab,
            colors,
        }
    }

    /// Render the panel and return any triggered action.
    pub fn render(&self, ui: &mut egui::Ui) -> Option<TracePanelAction> {
        let mut action = self.render_tabs(ui);
        ui.separator();

        // Footer first so the list takes the remaining height
        egui::TopBottomPanel::bottom("trace_footer")
            .show_separator_line(true)
            .show_inside(ui, |ui| {
                ui.horizontal(|ui| {
                    let _ = ui.button("Export Logs");
                    let _ = ui.button("Debug View");
                });
            });

        match self.tab {
            TraceTab::Trace => {
                egui::ScrollArea::vertical()
                    .id_salt("trace_cards")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        if let Some(card_action) = self.render_cards(ui) {
                            action = Some(card_action);
                        }
                    });
            }
            TraceTab::Analysis => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(RichText::new("Analysis view coming soon").weak());
                });
            }
        }

        action
    }

    fn render_tabs(&self, ui: &mut egui::Ui) -> Option<TracePanelAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            for (tab, label) in [(TraceTab::Trace, "Trace"), (TraceTab::Analysis, "Analysis")] {
                if ui.selectable_label(self.tab == tab, label).clicked() && self.tab != tab {
                    action = Some(TracePanelAction::SetTab(tab));
                }
            }
        });
        action
    }

    fn render_cards(&self, ui: &mut egui::Ui) -> Option<TracePanelAction> {
        let highlighted = TraceListState::highlighted(self.selected, self.records);
        let default_card = CardState::default();
        let mut action = None;

        for (index, record) in self.records.iter().enumerate() {
            let card = self.list.card(index).unwrap_or(&default_card);
            let is_highlighted = highlighted.contains(&index);

            let response = ui.scope_builder(
                UiBuilder::new().id_salt(("trace_card", index)).sense(Sense::click()),
                |ui| self.render_card(ui, index, record, card, is_highlighted),
            );
            if let Some(inner) = response.inner {
                action = Some(inner);
            } else if response.response.clicked() {
                action = Some(TracePanelAction::Select(record.display_label()));
            }

            if self.scroll_to == Some(index) {
                response.response.scroll_to_me(None);
            }
            ui.add_space(6.0);
        }

        action
    }

    fn render_card(
        &self,
        ui: &mut egui::Ui,
        index: usize,
        record: &TraceRecord,
        card: &CardState,
        is_highlighted: bool,
    ) -> Option<TracePanelAction> {
        let mut action = None;
        let (fill, stroke) = if is_highlighted {
            (
                self.colors.selection_color_alpha(40),
                Stroke::new(1.5, self.colors.selection_color()),
            )
        } else {
            (
                self.colors.label_background_color(),
                Stroke::new(1.0, self.colors.grid_color()),
            )
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                // Text must not take clicks meant for the card
                ui.style_mut().interaction.selectable_labels = false;

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(record.display_label())
                            .monospace()
                            .color(self.colors.text_label_color()),
                    );
                    ui.label(RichText::new(&record.title).strong().color(self.colors.text_header_color()));
                });

                if record.has_error {
                    self.render_error_banner(ui, record);
                }

                if let Some(kind) = &record.action {
                    ui.horizontal(|ui| {
                        egui::Frame::new()
                            .fill(self.colors.agent_badge_color())
                            .corner_radius(4.0)
                            .inner_margin(egui::Margin::symmetric(6, 2))
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(format!("{} {}", kind.glyph(), kind.label()))
                                        .small()
                                        .color(egui::Color32::WHITE),
                                )
                                .on_hover_text(kind.name());
                            });
                    });
                }
                if !record.visual_description.is_empty() {
                    ui.label(&record.visual_description);
                }

                ui.add_space(4.0);
                let header = if card.rationale_expanded {
                    "▼ Agent Rationale"
                } else {
                    "▶ Agent Rationale"
                };
                if ui.add(egui::Button::new(header).frame(false)).clicked() {
                    action = Some(TracePanelAction::ToggleRationale(index));
                }
                if card.rationale_expanded && !record.agent_rationale.is_empty() {
                    ui.label(RichText::new(&record.agent_rationale).italics());
                }

                ui.add_space(4.0);
                if let Some(payload_action) = self.render_payload(ui, index, record, card) {
                    action = Some(payload_action);
                }

                ui.add_space(4.0);
                if let Some(feedback_action) = self.render_feedback_row(ui, index, card) {
                    action = Some(feedback_action);
                }
            });

        action
    }

    fn render_error_banner(&self, ui: &mut egui::Ui, record: &TraceRecord) {
        egui::Frame::new()
            .fill(self.colors.error_color_alpha(40))
            .stroke(Stroke::new(1.0, self.colors.error_color()))
            .corner_radius(4.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new("⚠ Execution Error").strong().color(self.colors.error_color()));
                if let Some(message) = &record.error_message {
                    ui.label(RichText::new(message).small().color(self.colors.error_color()));
                }
            });
    }

    fn render_payload(
        &self,
        ui: &mut egui::Ui,
        index: usize,
        record: &TraceRecord,
        card: &CardState,
    ) -> Option<TracePanelAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Payload").small().weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("📋").on_hover_text("Copy payload").clicked() {
                    action = Some(TracePanelAction::CopyPayload(index));
                }
                if card.copy_feedback_visible() {
                    ui.label(
                        RichText::new("Copied!")
                            .small()
                            .color(self.colors.status_success_color()),
                    );
                    // Repaint so the feedback disappears on time
                    ui.ctx().request_repaint_after(Duration::from_millis(200));
                }
            });
        });

        egui::Frame::new()
            .fill(self.colors.payload_background_color())
            .corner_radius(4.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(record.pretty_payload())
                        .monospace()
                        .small()
                        .color(self.colors.payload_text_color()),
                );
            });

        action
    }

    fn render_feedback_row(
        &self,
        ui: &mut egui::Ui,
        index: usize,
        card: &CardState,
    ) -> Option<TracePanelAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui
                .selectable_label(card.branched, "⑂ Branch")
                .on_hover_text("Branch from this step")
                .clicked()
            {
                action = Some(TracePanelAction::ToggleBranch(index));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .selectable_label(card.rating == Some(Rating::Down), "👎")
                    .clicked()
                {
                    action = Some(TracePanelAction::Rate(index, Rating::Down));
                }
                if ui
                    .selectable_label(card.rating == Some(Rating::Up), "👍")
                    .clicked()
                {
                    action = Some(TracePanelAction::Rate(index, Rating::Up));
                }
            });
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trace::record;
    use crate::gui::headless::Harness;

    fn records() -> Vec<TraceRecord> {
        let mut header = record(35.0, Some("click"), false);
        header.visual_description = "Header row of the sheet".to_string();
        let mut filter = record(90.0, None, false);
        filter.visual_description = "Filter dialog is open".to_string();
        vec![header, filter]
    }

    #[test]
    fn test_clicking_description_text_selects_card() {
        let records = records();
        let list = TraceListState::new(records.len());
        let colors = ColorSettings::default();
        let render = |ui: &mut egui::Ui| {
            TracePanelRenderer::new(&records, None, &list, None, TraceTab::Trace, &colors).render(ui)
        };
        let mut harness = Harness::new(420.0, 900.0);
        harness.frame(Vec::new(), render);

        let text = harness
            .text_rect("Filter dialog is open")
            .expect("description painted");
        let action = harness.click(text.center(), render);

        assert_eq!(action, Some(TracePanelAction::Select("1:30".to_string())));
    }

    #[test]
    fn test_clicking_time_label_selects_card() {
        let records = records();
        let list = TraceListState::new(records.len());
        let colors = ColorSettings::default();
        let render = |ui: &mut egui::Ui| {
            TracePanelRenderer::new(&records, None, &list, None, TraceTab::Trace, &colors).render(ui)
        };
        let mut harness = Harness::new(420.0, 900.0);
        harness.frame(Vec::new(), render);

        let label = harness.text_rect("0:35").expect("time label painted");
        let action = harness.click(label.center(), render);

        assert_eq!(action, Some(TracePanelAction::Select("0:35".to_string())));
    }

    #[test]
    fn test_card_buttons_win_over_card_click() {
        let records = records();
        let list = TraceListState::new(records.len());
        let colors = ColorSettings::default();
        let render = |ui: &mut egui::Ui| {
            TracePanelRenderer::new(&records, None, &list, None, TraceTab::Trace, &colors).render(ui)
        };
        let mut harness = Harness::new(420.0, 900.0);
        harness.frame(Vec::new(), render);

        let rationale = harness
            .text_rect("▶ Agent Rationale")
            .expect("rationale toggle painted");
        assert_eq!(
            harness.click(rationale.center(), render),
            Some(TracePanelAction::ToggleRationale(1))
        );

        let branch = harness.text_rect("⑂ Branch").expect("branch toggle painted");
        assert_eq!(
            harness.click(branch.center(), render),
            Some(TracePanelAction::ToggleBranch(1))
        );
    }
}
