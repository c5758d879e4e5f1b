// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (sizes, paddings).

use serde::{Deserialize, Serialize};

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 640;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Insets {
    /// Create new insets; negative values are clamped to zero.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left: left.max(0.0), right: right.max(0.0), top: top.max(0.0), bottom: bottom.max(0.0) }
    }
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

impl Default for Insets {
    /// Room for the range axis on the left and the domain axis at the bottom.
    fn default() -> Self {
        Self::new(72.0, 24.0, 24.0, 56.0)
    }
}
