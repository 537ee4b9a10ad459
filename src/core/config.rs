//! Configuration and settings module.
//!
//! This module handles persistent viewer settings: colors, window size and
//! panel layout. Playback state (time, speed, zoom, selection) is never stored.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use super::error::AppError;

/// Settings filename for persistence.
const SETTINGS_FILENAME: &str = "config.json";

/// Application directory under the user's config directory.
const APP_DIR: &str = "trace-session-viewer";

/// Default width of the trace panel in points.
pub const DEFAULT_TRACE_PANEL_WIDTH: f32 = 380.0;

/// Color settings for the application UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    // Timeline markers
    /// Video-row marker color
    pub video_marker: [u8; 3],
    /// Agent-row marker color
    pub agent_marker: [u8; 3],
    /// Agent badge background
    pub agent_badge: [u8; 3],
    /// Marker and banner color for failed steps
    pub error: [u8; 3],
    /// Selected card / accent color
    pub selection: [u8; 3],
    /// Scrubber handle and line
    pub scrubber: [u8; 3],

    // Backgrounds
    /// Timeline background
    pub background: [u8; 3],
    /// Row label column background
    pub label_background: [u8; 3],
    /// Raw payload block background
    pub payload_background: [u8; 3],

    // Lines and text
    /// Grid and ruler lines
    pub grid: [u8; 3],
    /// Ruler text
    pub text_header: [u8; 3],
    /// Row label text
    pub text_label: [u8; 3],
    /// Payload text
    pub payload_text: [u8; 3],

    // Status colors
    /// Success status color
    pub status_success: [u8; 3],
    /// Error status color
    pub status_error: [u8; 3],
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            video_marker: [230, 230, 235],   // Near white
            agent_marker: [153, 153, 153],   // Grey
            agent_badge: [70, 70, 78],       // Dark grey
            error: [244, 67, 54],            // Red
            selection: [59, 130, 246],       // Blue
            scrubber: [255, 255, 255],       // White

            background: [30, 30, 35],        // Dark gray
            label_background: [35, 35, 40],  // Slightly lighter
            payload_background: [15, 23, 42], // Slate

            grid: [50, 50, 55],              // Medium gray
            text_header: [128, 128, 128],    // Gray
            text_label: [211, 211, 211],     // Light gray
            payload_text: [52, 211, 153],    // Emerald

            status_success: [76, 175, 80],   // Green
            status_error: [244, 67, 54],     // Red
        }
    }
}

impl ColorSettings {
    /// Convert a color array to egui Color32.
    #[inline]
    pub fn to_color32(color: [u8; 3]) -> Color32 {
        Color32::from_rgb(color[0], color[1], color[2])
    }

    /// Convert a color array to egui Color32 with alpha.
    #[inline]
    pub fn to_color32_alpha(color: [u8; 3], alpha: u8) -> Color32 {
        Color32::from_rgba_unmultiplied(color[0], color[1], color[2], alpha)
    }

    pub fn video_marker_color(&self) -> Color32 {
        Self::to_color32(self.video_marker)
    }

    pub fn agent_marker_color(&self) -> Color32 {
        Self::to_color32(self.agent_marker)
    }

    pub fn agent_badge_color(&self) -> Color32 {
        Self::to_color32(self.agent_badge)
    }

    pub fn error_color(&self) -> Color32 {
        Self::to_color32(self.error)
    }

    /// Get error color with alpha (banner fill).
    pub fn error_color_alpha(&self, alpha: u8) -> Color32 {
        Self::to_color32_alpha(self.error, alpha)
    }

    pub fn selection_color(&self) -> Color32 {
        Self::to_color32(self.selection)
    }

    /// Get selection color with alpha (marker glow, card fill).
    pub fn selection_color_alpha(&self, alpha: u8) -> Color32 {
        Self::to_color32_alpha(self.selection, alpha)
    }

    pub fn scrubber_color(&self) -> Color32 {
        Self::to_color32(self.scrubber)
    }

    pub fn background_color(&self) -> Color32 {
        Self::to_color32(self.background)
    }

    pub fn label_background_color(&self) -> Color32 {
        Self::to_color32(self.label_background)
    }

    pub fn payload_background_color(&self) -> Color32 {
        Self::to_color32(self.payload_background)
    }

    pub fn grid_color(&self) -> Color32 {
        Self::to_color32(self.grid)
    }

    pub fn text_header_color(&self) -> Color32 {
        Self::to_color32(self.text_header)
    }

    pub fn text_label_color(&self) -> Color32 {
        Self::to_color32(self.text_label)
    }

    pub fn payload_text_color(&self) -> Color32 {
        Self::to_color32(self.payload_text)
    }

    pub fn status_success_color(&self) -> Color32 {
        Self::to_color32(self.status_success)
    }

    pub fn status_error_color(&self) -> Color32 {
        Self::to_color32(self.status_error)
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Color customization settings.
    pub colors: ColorSettings,

    /// Window size to restore on startup (width, height).
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,

    /// Width of the trace panel.
    #[serde(default = "default_trace_panel_width")]
    pub trace_panel_width: f32,
}

fn default_trace_panel_width() -> f32 {
    DEFAULT_TRACE_PANEL_WIDTH
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            colors: ColorSettings::default(),
            window_size: None,
            trace_panel_width: DEFAULT_TRACE_PANEL_WIDTH,
        }
    }
}

impl AppSettings {
    /// Get the settings file path in the user's config directory.
    fn get_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(APP_DIR);
            path.push(SETTINGS_FILENAME);
            path
        })
    }

    /// Load settings from disk, returning defaults if loading fails.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e.brief_description(), "using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from disk. A missing file yields defaults.
    pub fn try_load() -> Result<Self, AppError> {
        let Some(path) = Self::get_settings_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| AppError::SettingsLoadError {
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse settings from their JSON form.
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|e| AppError::SettingsLoadError {
            reason: e.to_string(),
        })
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<(), AppError> {
        let path = Self::get_settings_path().ok_or_else(|| AppError::SettingsSaveError {
            reason: "Could not determine config directory".to_string(),
        })?;

        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::SettingsSaveError {
                reason: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| AppError::SettingsSaveError {
                reason: format!("Failed to serialize settings: {}", e),
            })?;

        std::fs::write(&path, content).map_err(|e| AppError::SettingsSaveError {
            reason: format!("Failed to write settings file: {}", e),
        })?;

        info!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Set the window size.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_size = Some((width, height));
    }

    /// Set the trace panel width, keeping it within a usable range.
    pub fn set_trace_panel_width(&mut self, width: f32) {
        self.trace_panel_width = width.clamp(260.0, 720.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_settings_default() {
        let settings = ColorSettings::default();
        assert_eq!(settings.error, [244, 67, 54]);
        assert_eq!(settings.agent_marker, [153, 153, 153]);
    }

    #[test]
    fn test_color32_conversion() {
        let color32 = ColorSettings::to_color32([255, 128, 64]);
        assert_eq!(color32, Color32::from_rgb(255, 128, 64));
    }

    #[test]
    fn test_color32_alpha_conversion() {
        let color32 = ColorSettings::to_color32_alpha([255, 128, 64], 100);
        assert_eq!(color32, Color32::from_rgba_unmultiplied(255, 128, 64, 100));
    }

    #[test]
    fn test_app_settings_default() {
        let settings = AppSettings::default();
        assert_eq!(settings.colors, ColorSettings::default());
        assert!(settings.window_size.is_none());
        assert_eq!(settings.trace_panel_width, DEFAULT_TRACE_PANEL_WIDTH);
    }

    #[test]
    fn test_trace_panel_width_is_clamped() {
        let mut settings = AppSettings::default();
        settings.set_trace_panel_width(10.0);
        assert_eq!(settings.trace_panel_width, 260.0);
        settings.set_trace_panel_width(5000.0);
        assert_eq!(settings.trace_panel_width, 720.0);
    }

    #[test]
    fn test_settings_serialization() {
        let mut settings = AppSettings::default();
        settings.set_window_size(1280.0, 720.0);
        settings.set_trace_panel_width(420.0);

        let json = serde_json::to_string(&settings).unwrap();
        let restored = AppSettings::from_json(&json).unwrap();

        assert_eq!(restored, settings);
    }

    #[test]
    fn test_backward_compatible_deserialization() {
        let json = serde_json::to_string(&serde_json::json!({
            "colors": ColorSettings::default(),
        }))
        .unwrap();

        let settings = AppSettings::from_json(&json).unwrap();

        assert!(settings.window_size.is_none());
        assert_eq!(settings.trace_panel_width, DEFAULT_TRACE_PANEL_WIDTH);
    }

    #[test]
    fn test_invalid_settings_json() {
        let error = AppSettings::from_json("{").unwrap_err();
        assert!(matches!(error, AppError::SettingsLoadError { .. }));
    }
}
