//! Header bar with the run, environment, model and job selectors.
//!
//! These are plain controlled dropdowns; their values do not feed into
//! playback or selection.

use eframe::egui::{self, RichText};

const RUN_OPTIONS: &[&str] = &["Run 2024-02-16 10:30", "Run 2024-02-15 14:20"];
const ENVIRONMENT_OPTIONS: &[&str] = &["Production", "Staging"];
const MODEL_OPTIONS: &[&str] = &["GPT-4", "GPT-3.5-Turbo"];
const JOB_OPTIONS: &[&str] = &["Data Analysis", "Report Generation"];

/// Current header selector values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderState {
    pub run: String,
    pub environment: String,
    pub model: String,
    pub job: String,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            run: RUN_OPTIONS[0].to_string(),
            environment: ENVIRONMENT_OPTIONS[0].to_string(),
            model: MODEL_OPTIONS[0].to_string(),
            job: JOB_OPTIONS[0].to_string(),
        }
    }
}

/// Renders the header selectors, writing choices straight into the state.
pub struct HeaderRenderer<'a> {
    state: &'a mut HeaderState,
}

impl<'a> HeaderRenderer<'a> {
    pub fn new(state: &'a mut HeaderState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            selector(ui, "Select Run", "run_combo", &mut self.state.run, RUN_OPTIONS);
            ui.separator();
            selector(
                ui,
                "Environment",
                "environment_combo",
                &mut self.state.environment,
                ENVIRONMENT_OPTIONS,
            );
            selector(ui, "Model", "model_combo", &mut self.state.model, MODEL_OPTIONS);
            selector(ui, "Job", "job_combo", &mut self.state.job, JOB_OPTIONS);
        });
    }
}

/// A labelled dropdown over fixed options.
fn selector(ui: &mut egui::Ui, label: &str, id: &str, value: &mut String, options: &[&str]) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label.to_uppercase()).small().weak());
        egui::ComboBox::from_id_salt(id)
            .selected_text(value.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    ui.selectable_value(value, option.to_string(), *option);
                }
            });
    });
}
