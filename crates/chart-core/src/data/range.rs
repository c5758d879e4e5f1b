// File: crates/chart-core/src/data/range.rs
// Summary: Closed numeric interval [lower, upper] and its combinators.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Closed interval `[lower, upper]` with `lower <= upper`, both finite or infinite but never NaN.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub struct Range {
    lower: f64,
    upper: f64,
}

/// Unchecked wire form; loading goes through [`Range::new`].
#[derive(Deserialize)]
struct RangeRepr {
    lower: f64,
    upper: f64,
}

impl TryFrom<RangeRepr> for Range {
    type Error = ChartError;

    fn try_from(r: RangeRepr) -> Result<Self> {
        Range::new(r.lower, r.upper)
    }
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(ChartError::invalid("range bounds must not be NaN"));
        }
        if lower > upper {
            return Err(ChartError::invalid(format!("require lower ({lower}) <= upper ({upper})")));
        }
        Ok(Self { lower, upper })
    }

    /// Range spanning two values given in any order.
    ///
    /// Callers filter NaN values first.
    pub(crate) fn spanning(a: f64, b: f64) -> Self {
        debug_assert!(!a.is_nan() && !b.is_nan());
        Self { lower: a.min(b), upper: a.max(b) }
    }

    pub fn lower(&self) -> f64 { self.lower }
    pub fn upper(&self) -> f64 { self.upper }
    pub fn length(&self) -> f64 { self.upper - self.lower }
    pub fn central_value(&self) -> f64 { self.lower / 2.0 + self.upper / 2.0 }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// True if `[b0, b1]` overlaps this range.
    pub fn intersects(&self, b0: f64, b1: f64) -> bool {
        if b0 <= self.lower {
            b1 > self.lower
        } else {
            b0 < self.upper && b1 >= b0
        }
    }

    pub fn intersects_range(&self, other: &Range) -> bool {
        self.intersects(other.lower, other.upper)
    }

    /// The value within the range closest to `value`.
    pub fn constrain(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Union of two optional ranges. `None` is the identity, so the
    /// operation is associative and commutative.
    pub fn combine(a: Option<Range>, b: Option<Range>) -> Option<Range> {
        match (a, b) {
            (None, r) | (r, None) => r,
            (Some(a), Some(b)) => Some(Range { lower: a.lower.min(b.lower), upper: a.upper.max(b.upper) }),
        }
    }

    /// Extend an optional range so that it includes `value`. NaN leaves it unchanged.
    pub fn expand_to_include(range: Option<Range>, value: f64) -> Option<Range> {
        if value.is_nan() {
            return range;
        }
        match range {
            None => Some(Range { lower: value, upper: value }),
            Some(r) if value < r.lower => Some(Range { lower: value, upper: r.upper }),
            Some(r) if value > r.upper => Some(Range { lower: r.lower, upper: value }),
            Some(r) => Some(r),
        }
    }

    /// Add margins expressed as fractions of the current length. Margins that
    /// would invert the range collapse it onto its midpoint.
    pub fn expand(&self, lower_margin: f64, upper_margin: f64) -> Range {
        let length = self.length();
        let mut lower = self.lower - length * lower_margin;
        let mut upper = self.upper + length * upper_margin;
        if lower > upper {
            lower = lower / 2.0 + upper / 2.0;
            upper = lower;
        }
        Range { lower, upper }
    }

    /// Shift both bounds by `delta`. Without `allow_zero_crossing`, a bound
    /// that would change sign stops at zero instead.
    pub fn shift(&self, delta: f64, allow_zero_crossing: bool) -> Range {
        if allow_zero_crossing {
            Range { lower: self.lower + delta, upper: self.upper + delta }
        } else {
            Range {
                lower: shift_no_zero_crossing(self.lower, delta),
                upper: shift_no_zero_crossing(self.upper, delta),
            }
        }
    }

    /// Multiply both bounds by a non-negative `factor`.
    pub fn scale(&self, factor: f64) -> Result<Range> {
        if !(factor >= 0.0) {
            return Err(ChartError::invalid("negative scale factor"));
        }
        Range::new(self.lower * factor, self.upper * factor)
    }
}

fn shift_no_zero_crossing(value: f64, delta: f64) -> f64 {
    if value > 0.0 {
        (value + delta).max(0.0)
    } else if value < 0.0 {
        (value + delta).min(0.0)
    } else {
        value + delta
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Range[{},{}]", self.lower, self.upper)
    }
}
