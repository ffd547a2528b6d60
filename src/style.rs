use crate::drawing::DrawMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color \"{0}\" is not a hex value or a known name")]
    Unrecognized(String),
    #[error("color \"{0}\" has invalid hex digits")]
    InvalidHex(String),
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let Some(hex) = value.strip_prefix('#') else {
            return match value.to_ascii_lowercase().as_str() {
                "black" => Ok(Color::BLACK),
                "white" => Ok(Color::WHITE),
                "red" => Ok(Color::rgb(255, 0, 0)),
                "green" => Ok(Color::rgb(0, 128, 0)),
                "blue" => Ok(Color::rgb(0, 0, 255)),
                "transparent" => Ok(Color::TRANSPARENT),
                _ => Err(ColorParseError::Unrecognized(s.to_string())),
            };
        };

        let invalid = || ColorParseError::InvalidHex(s.to_string());
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

/// Brush shape offered by the control panel; sets cap and join together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapStyle {
    Round,
    Square,
}

impl CapStyle {
    pub fn cap_and_join(self) -> (LineCap, LineJoin) {
        match self {
            CapStyle::Round => (LineCap::Round, LineJoin::Round),
            CapStyle::Square => (LineCap::Square, LineJoin::Miter),
        }
    }
}

/// A single control-panel change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleChange {
    /// Sets stroke and fill color together.
    Color(Color),
    StrokeColor(Color),
    FillColor(Color),
    Width(f32),
    FillMode(bool),
    CapStyle(CapStyle),
    GlobalAlpha(f32),
    CornerRadius(f32),
    DrawMode(DrawMode),
}

/// Current drawing style shared by the committed and draft surfaces.
///
/// Turning fill mode on forces the line width to 1. Changing the width later
/// leaves fill mode on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleState {
    stroke_color: Color,
    fill_color: Color,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    global_alpha: f32,
    fill_mode: bool,
    corner_radius: f32,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 8.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            global_alpha: 1.0,
            fill_mode: false,
            corner_radius: 0.0,
        }
    }
}

impl StyleState {
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    pub fn fill_mode(&self) -> bool {
        self.fill_mode
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn set_color(&mut self, color: Color) {
        self.stroke_color = color;
        self.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Ignores widths that are not positive and finite.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        } else {
            log::debug!("ignoring invalid line width {width}");
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    pub fn set_cap_style(&mut self, style: CapStyle) {
        let (cap, join) = style.cap_and_join();
        self.line_cap = cap;
        self.line_join = join;
    }

    /// Ignores values outside `0.0..=1.0`.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if (0.0..=1.0).contains(&alpha) {
            self.global_alpha = alpha;
        } else {
            log::debug!("ignoring out-of-range alpha {alpha}");
        }
    }

    pub fn set_fill_mode(&mut self, enabled: bool) {
        self.fill_mode = enabled;
        if enabled {
            self.line_width = 1.0;
        }
    }

    /// Negative radii clamp to zero; non-finite values are ignored.
    pub fn set_corner_radius(&mut self, radius: f32) {
        if radius.is_finite() {
            self.corner_radius = radius.max(0.0);
        } else {
            log::debug!("ignoring invalid corner radius {radius}");
        }
    }

    /// Applies a control-panel change. Draw-mode changes are not style and
    /// are left to the caller; returns `false` for them.
    pub fn apply(&mut self, change: StyleChange) -> bool {
        match change {
            StyleChange::Color(color) => self.set_color(color),
            StyleChange::StrokeColor(color) => self.set_stroke_color(color),
            StyleChange::FillColor(color) => self.set_fill_color(color),
            StyleChange::Width(width) => self.set_line_width(width),
            StyleChange::FillMode(enabled) => self.set_fill_mode(enabled),
            StyleChange::CapStyle(style) => self.set_cap_style(style),
            StyleChange::GlobalAlpha(alpha) => self.set_global_alpha(alpha),
            StyleChange::CornerRadius(radius) => self.set_corner_radius(radius),
            StyleChange::DrawMode(_) => return false,
        }
        true
    }

    /// Re-validates every field through its setter. Used for styles that did
    /// not come through the setters, such as a deserialized settings file.
    pub fn sanitized(self) -> Self {
        let mut style = StyleState::default();
        style.set_stroke_color(self.stroke_color);
        style.set_fill_color(self.fill_color);
        style.set_line_width(self.line_width);
        style.set_line_cap(self.line_cap);
        style.set_line_join(self.line_join);
        style.set_global_alpha(self.global_alpha);
        style.set_corner_radius(self.corner_radius);
        style.set_fill_mode(self.fill_mode);
        style
    }
}
