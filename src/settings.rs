use crate::drawing::DrawMode;
use crate::style::{Color, StyleState};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Window position of the canvas border's top-left corner.
    pub canvas_origin: [f32; 2],
    pub border: f32,
    pub min_canvas_size: [u32; 2],
    pub background: Color,
    pub style: StyleState,
    pub draw_mode: DrawMode,
    /// Disables corner radii even though the raster supports them.
    pub rounded_rects: bool,
    pub gallery_dir: PathBuf,
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_origin: [16.0, 16.0],
            border: 2.0,
            min_canvas_size: [640, 480],
            background: Color::WHITE,
            style: StyleState::default(),
            draw_mode: DrawMode::default(),
            rounded_rects: true,
            gallery_dir: PathBuf::from("gallery"),
            debug_logging: false,
        }
    }
}

impl Settings {
    pub const ENV_VAR: &'static str = "WPAINT_SETTINGS";

    pub fn default_path() -> PathBuf {
        std::env::var_os(Self::ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("settings.json"))
    }

    /// A missing or empty file yields the defaults. Any other read failure
    /// is an error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err).with_context(|| format!("failed to read {}", path.display())),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        Ok(Settings {
            style: settings.style.sanitized(),
            ..settings
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Canvas size that fills the window to the right of and below the
    /// origin, never smaller than the configured minimum.
    pub fn canvas_size_for(&self, window_width: u32, window_height: u32) -> (u32, u32) {
        let inset_x = self.canvas_origin[0] * 2.0 + self.border * 2.0;
        let inset_y = self.canvas_origin[1] * 2.0 + self.border * 2.0;
        let width = (window_width as f32 - inset_x).max(0.0) as u32;
        let height = (window_height as f32 - inset_y).max(0.0) as u32;
        (
            width.max(self.min_canvas_size[0]),
            height.max(self.min_canvas_size[1]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults_and_sanitizes_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r##"{"background": "#202020", "drawMode": "ellipse", "style": {"lineWidth": -3, "fillMode": true}}"##,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.background, Color::rgb(0x20, 0x20, 0x20));
        assert_eq!(settings.draw_mode, DrawMode::Ellipse);
        assert_eq!(settings.style.line_width(), 1.0);
        assert_eq!(settings.min_canvas_size, [640, 480]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, [0xff, 0xfe, b'{', 0x80]).unwrap();
        assert!(Settings::load(&path).is_err());

        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn keys_are_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        for key in ["canvasOrigin", "minCanvasSize", "drawMode", "roundedRects", "galleryDir", "debugLogging"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["style"].get("lineWidth").is_some());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.rounded_rects = false;
        settings.style.set_global_alpha(0.25);
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn canvas_never_shrinks_below_minimum() {
        let settings = Settings::default();
        assert_eq!(settings.canvas_size_for(200, 100), (640, 480));
        assert_eq!(settings.canvas_size_for(1000, 800), (1000 - 36, 800 - 36));
    }
}
