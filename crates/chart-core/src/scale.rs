// File: crates/chart-core/src/scale.rs
// Summary: Resolved value-to-pixel transform for a numeric axis (linear or logarithmic).

use crate::data::Range;
use crate::geometry::{Edge, Rect};

/// Smallest value a log scale can show.
pub const LOG_SMALLEST_VALUE: f64 = 1e-100;

/// A value axis frozen to one effective range. Built by `ValueAxis::mapping`
/// for each draw; nothing is cached between draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisMapping {
    pub lower: f64,
    pub upper: f64,
    /// `Some(base)` for a logarithmic scale.
    pub log_base: Option<f64>,
    pub inverted: bool,
}

impl AxisMapping {
    pub fn linear(range: Range) -> Self {
        Self { lower: range.lower(), upper: range.upper(), log_base: None, inverted: false }
    }

    pub fn range(&self) -> Range {
        Range::spanning(self.lower, self.upper)
    }

    fn transform(&self, v: f64) -> f64 {
        match self.log_base {
            Some(base) if v > 0.0 => v.ln() / base.ln(),
            Some(_) => f64::NAN,
            None => v,
        }
    }

    fn untransform(&self, t: f64) -> f64 {
        match self.log_base {
            Some(base) => base.powf(t),
            None => t,
        }
    }

    /// Pixel coordinate of `value` along `edge` of `area`. NaN for values a
    /// log scale cannot show; callers skip those items.
    #[inline]
    pub fn to_screen(&self, value: f64, area: &Rect, edge: Edge) -> f64 {
        let lo = self.transform(self.lower.max(if self.log_base.is_some() { LOG_SMALLEST_VALUE } else { f64::MIN }));
        let hi = self.transform(self.upper);
        let v = self.transform(value);
        let span = (hi - lo).max(1e-12);
        let frac = (v - lo) / span;
        if edge.is_horizontal() {
            if self.inverted {
                area.right - frac * area.width()
            } else {
                area.left + frac * area.width()
            }
        } else if self.inverted {
            area.top + frac * area.height()
        } else {
            area.bottom - frac * area.height()
        }
    }

    /// Inverse of [`to_screen`](Self::to_screen).
    #[inline]
    pub fn from_screen(&self, px: f64, area: &Rect, edge: Edge) -> f64 {
        let lo = self.transform(self.lower.max(if self.log_base.is_some() { LOG_SMALLEST_VALUE } else { f64::MIN }));
        let hi = self.transform(self.upper);
        let len = if edge.is_horizontal() { area.width() } else { area.height() }.max(1e-12);
        let frac = if edge.is_horizontal() {
            if self.inverted { (area.right - px) / len } else { (px - area.left) / len }
        } else if self.inverted {
            (px - area.top) / len
        } else {
            (area.bottom - px) / len
        };
        self.untransform(lo + frac * (hi - lo))
    }
}
