//! GUI module for the trace session viewer.
//!
//! This module contains the egui-based user interface components
//! including the session view, header, workspace, timeline, controls and
//! trace panel.

mod app;
mod controls;
#[cfg(test)]
mod headless;
mod header;
mod timeline;
mod trace_panel;
mod workspace;

pub use app::TraceViewerApp;
