// File: crates/chart-core/src/paint.rs
// Summary: Backend-neutral visual attributes: colors, strokes and fonts.

use serde::{Deserialize, Serialize};

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_argb(255, 0, 0, 0);
    pub const WHITE: Color = Color::from_argb(255, 255, 255, 255);
    pub const GRAY: Color = Color::from_argb(255, 128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::from_argb(255, 192, 192, 192);
    pub const RED: Color = Color::from_argb(255, 255, 0, 0);
    pub const GREEN: Color = Color::from_argb(255, 0, 255, 0);
    pub const BLUE: Color = Color::from_argb(255, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::from_argb(0, 0, 0, 0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Line drawing attributes. An empty `dash` means a solid line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl Stroke {
    pub fn new(width: f64) -> Self {
        Self { width: width.max(0.0), dash: Vec::new() }
    }

    pub fn dashed(width: f64, dash: Vec<f64>) -> Self {
        Self { width: width.max(0.0), dash }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self { family: family.into(), size: size.max(1.0), bold: false }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 12.0)
    }
}
