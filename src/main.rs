//! Trace Session Viewer - a debugging dashboard for recorded agent sessions.

mod core;
mod gui;

use tracing_subscriber::EnvFilter;

use core::config::AppSettings;
use gui::TraceViewerApp;

const DEFAULT_WINDOW_SIZE: [f32; 2] = [1280.0, 800.0];

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = AppSettings::load();
    let inner_size = settings
        .window_size
        .map(|(w, h)| [w, h])
        .unwrap_or(DEFAULT_WINDOW_SIZE);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trace Session Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(TraceViewerApp::new(cc, settings)))),
    )
}
