// File: crates/chart-core/src/renderer/mod.rs
// Summary: Renderers: per-series visual attributes and the XY and category renderer families.
// Notes:
// - Attribute lookup order: explicit per-series override, then the theme
//   palette when auto-populating, then the renderer default.

pub mod category;
pub mod spline;
pub mod xy;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use category::{CategoryContext, CategoryRenderer, CategoryRendererKind};
pub use xy::{XyContext, XyRenderer, XyRendererKind};

use crate::canvas::Marker;
use crate::paint::{Color, Stroke};
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesAttributes {
    paint: BTreeMap<usize, Color>,
    fill_paint: BTreeMap<usize, Color>,
    stroke: BTreeMap<usize, Stroke>,
    marker: BTreeMap<usize, Marker>,
    visible: BTreeMap<usize, bool>,
    visible_in_legend: BTreeMap<usize, bool>,
    pub default_paint: Color,
    pub default_stroke: Stroke,
    pub default_marker: Marker,
    pub marker_size: f64,
    /// Take paints from the theme palette and markers from the marker sequence
    /// for series without an override.
    pub auto_populate: bool,
}

impl Default for SeriesAttributes {
    fn default() -> Self {
        Self {
            paint: BTreeMap::new(),
            fill_paint: BTreeMap::new(),
            stroke: BTreeMap::new(),
            marker: BTreeMap::new(),
            visible: BTreeMap::new(),
            visible_in_legend: BTreeMap::new(),
            default_paint: Color::BLUE,
            default_stroke: Stroke::new(1.5),
            default_marker: Marker::Square,
            marker_size: 6.0,
            auto_populate: true,
        }
    }
}

impl SeriesAttributes {
    pub fn paint(&self, series: usize, theme: &Theme) -> Color {
        if let Some(c) = self.paint.get(&series) {
            return *c;
        }
        if self.auto_populate {
            if let Some(c) = theme.series_paint(series) {
                return c;
            }
        }
        self.default_paint
    }

    /// Falls back to the series paint.
    pub fn fill_paint(&self, series: usize, theme: &Theme) -> Color {
        self.fill_paint.get(&series).copied().unwrap_or_else(|| self.paint(series, theme))
    }

    pub fn stroke(&self, series: usize) -> &Stroke {
        self.stroke.get(&series).unwrap_or(&self.default_stroke)
    }

    pub fn marker(&self, series: usize) -> Marker {
        if let Some(m) = self.marker.get(&series) {
            return *m;
        }
        if self.auto_populate {
            return Marker::SEQUENCE[series % Marker::SEQUENCE.len()];
        }
        self.default_marker
    }

    pub fn is_visible(&self, series: usize) -> bool {
        self.visible.get(&series).copied().unwrap_or(true)
    }

    pub fn is_visible_in_legend(&self, series: usize) -> bool {
        self.is_visible(series) && self.visible_in_legend.get(&series).copied().unwrap_or(true)
    }

    /// `None` clears the override.
    pub fn set_paint(&mut self, series: usize, paint: Option<Color>) {
        set_or_clear(&mut self.paint, series, paint);
    }

    pub fn set_fill_paint(&mut self, series: usize, paint: Option<Color>) {
        set_or_clear(&mut self.fill_paint, series, paint);
    }

    pub fn set_stroke(&mut self, series: usize, stroke: Option<Stroke>) {
        set_or_clear(&mut self.stroke, series, stroke);
    }

    pub fn set_marker(&mut self, series: usize, marker: Option<Marker>) {
        set_or_clear(&mut self.marker, series, marker);
    }

    pub fn set_visible(&mut self, series: usize, visible: Option<bool>) {
        set_or_clear(&mut self.visible, series, visible);
    }

    pub fn set_visible_in_legend(&mut self, series: usize, visible: Option<bool>) {
        set_or_clear(&mut self.visible_in_legend, series, visible);
    }
}

fn set_or_clear<T>(map: &mut BTreeMap<usize, T>, series: usize, value: Option<T>) {
    match value {
        Some(v) => {
            map.insert(series, v);
        }
        None => {
            map.remove(&series);
        }
    }
}
