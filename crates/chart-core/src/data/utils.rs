// File: crates/chart-core/src/data/utils.rs
// Summary: Range computation over datasets. Absent and NaN values are skipped.

use crate::data::range::Range;
use crate::data::{CategoryDataset, PieDataset, XyDataset};

/// Bounds of the x values, or of the x intervals when `include_interval`.
pub fn find_domain_bounds(dataset: &dyn XyDataset, include_interval: bool) -> Option<Range> {
    let mut out = None;
    for s in 0..dataset.series_count() {
        for i in 0..dataset.item_count(s) {
            if include_interval {
                out = Range::expand_to_include(out, dataset.start_x(s, i));
                out = Range::expand_to_include(out, dataset.end_x(s, i));
            } else {
                out = Range::expand_to_include(out, dataset.x(s, i));
            }
        }
    }
    out
}

/// Bounds of the y values, or of the y intervals when `include_interval`.
pub fn find_range_bounds(dataset: &dyn XyDataset, include_interval: bool) -> Option<Range> {
    let mut out = None;
    for s in 0..dataset.series_count() {
        for i in 0..dataset.item_count(s) {
            if include_interval {
                out = include(out, dataset.start_y(s, i));
                out = include(out, dataset.end_y(s, i));
            } else {
                out = include(out, dataset.y(s, i));
            }
        }
    }
    out
}

/// Bounds of the y values restricted to items whose x lies in `x_range`.
/// OHLC items contribute their low and high.
pub fn find_range_bounds_within(dataset: &dyn XyDataset, x_range: &Range, include_interval: bool) -> Option<Range> {
    let mut out = None;
    for s in 0..dataset.series_count() {
        for i in 0..dataset.item_count(s) {
            if !x_range.contains(dataset.x(s, i)) {
                continue;
            }
            if let Some(o) = dataset.ohlc(s, i) {
                out = Range::expand_to_include(Range::expand_to_include(out, o.low), o.high);
            } else if include_interval {
                out = include(out, dataset.start_y(s, i));
                out = include(out, dataset.end_y(s, i));
            } else {
                out = include(out, dataset.y(s, i));
            }
        }
    }
    out
}

/// Bounds of the low/high values of an OHLC dataset; plain y values otherwise.
pub fn find_ohlc_range_bounds(dataset: &dyn XyDataset) -> Option<Range> {
    let mut out = None;
    for s in 0..dataset.series_count() {
        for i in 0..dataset.item_count(s) {
            match dataset.ohlc(s, i) {
                Some(v) => {
                    out = Range::expand_to_include(out, v.low);
                    out = Range::expand_to_include(out, v.high);
                }
                None => out = include(out, dataset.y(s, i)),
            }
        }
    }
    out
}

/// Bounds of the values, or of the item intervals when `include_interval`.
pub fn find_category_range_bounds(dataset: &dyn CategoryDataset, include_interval: bool) -> Option<Range> {
    let mut out = None;
    for r in 0..dataset.row_count() {
        for c in 0..dataset.column_count() {
            match (include_interval, dataset.interval(r, c)) {
                (true, Some((start, end))) => {
                    out = Range::expand_to_include(out, start);
                    out = Range::expand_to_include(out, end);
                }
                _ => out = include(out, dataset.value(r, c)),
            }
        }
    }
    out
}

/// Bounds of the per-category stacks, positives and negatives stacked apart from `base`.
pub fn find_stacked_range_bounds(dataset: &dyn CategoryDataset, base: f64) -> Option<Range> {
    let mut out = None;
    for c in 0..dataset.column_count() {
        let mut positive = base;
        let mut negative = base;
        let mut any = false;
        for r in 0..dataset.row_count() {
            match dataset.value(r, c) {
                Some(v) if v.is_finite() && v > 0.0 => positive += v,
                Some(v) if v.is_finite() && v < 0.0 => negative += v,
                _ => continue,
            }
            any = true;
        }
        if any {
            out = Range::combine(out, Some(Range::spanning(negative, positive)));
        }
    }
    out
}

/// Total of a pie dataset, or `None` when no item has a positive value.
pub fn pie_total(dataset: &PieDataset) -> Option<f64> {
    let total = dataset.total();
    (total > 0.0).then_some(total)
}

fn include(range: Option<Range>, value: Option<f64>) -> Option<Range> {
    match value {
        Some(v) => Range::expand_to_include(range, v),
        None => range,
    }
}
