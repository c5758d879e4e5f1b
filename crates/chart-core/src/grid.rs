// File: crates/chart-core/src/grid.rs
// Summary: Simple grid/tick layout helpers.

use crate::scale::AxisMapping;

/// 1, 2, 5 x 10^k step closest to `raw`.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let exp = raw.log10().floor();
    let base = 10f64.powf(exp);
    let frac = raw / base;
    let nice = if frac < 1.5 { 1.0 } else if frac < 3.0 { 2.0 } else if frac < 7.0 { 5.0 } else { 10.0 };
    nice * base
}

/// Tick values inside the mapping's range, about `target` of them.
/// Returns the ticks and the step (0 for log ticks).
pub fn ticks(mapping: &AxisMapping, target: usize) -> (Vec<f64>, f64) {
    if let Some(base) = mapping.log_base {
        let lo = mapping.lower.max(crate::scale::LOG_SMALLEST_VALUE).ln() / base.ln();
        let hi = mapping.upper.ln() / base.ln();
        if hi.is_finite() && lo.is_finite() && (hi.floor() - lo.ceil()) >= 1.0 {
            // a base near 1 spans many exponents: keep about `target` of them
            let (first, last) = (lo.ceil(), hi.floor());
            let stride = ((last - first) / target.max(1) as f64).ceil().max(1.0);
            let count = ((last - first) / stride).floor() as usize + 1;
            let values = (0..count).map(|k| base.powf(first + k as f64 * stride)).collect();
            return (values, 0.0);
        }
    }
    let span = mapping.upper - mapping.lower;
    if !(span > 0.0) {
        return (vec![mapping.lower], 0.0);
    }
    let step = nice_step(span / target.max(1) as f64);
    (stepped(mapping.lower, mapping.upper, step), step)
}

const SECOND: f64 = 1000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Calendar-friendly tick steps in milliseconds, with the label pattern for each.
const DATE_UNITS: [(f64, &str); 18] = [
    (SECOND, "%H:%M:%S"),
    (5.0 * SECOND, "%H:%M:%S"),
    (15.0 * SECOND, "%H:%M:%S"),
    (30.0 * SECOND, "%H:%M:%S"),
    (MINUTE, "%H:%M"),
    (5.0 * MINUTE, "%H:%M"),
    (15.0 * MINUTE, "%H:%M"),
    (30.0 * MINUTE, "%H:%M"),
    (HOUR, "%H:%M"),
    (3.0 * HOUR, "%d %b %H:%M"),
    (6.0 * HOUR, "%d %b %H:%M"),
    (12.0 * HOUR, "%d %b %H:%M"),
    (DAY, "%d %b"),
    (2.0 * DAY, "%d %b"),
    (7.0 * DAY, "%d %b"),
    (30.0 * DAY, "%b %Y"),
    (91.0 * DAY, "%b %Y"),
    (365.0 * DAY, "%Y"),
];

/// Smallest standard date step at least `raw` milliseconds, and its label pattern.
pub fn date_step(raw: f64) -> (f64, &'static str) {
    DATE_UNITS
        .iter()
        .copied()
        .find(|(step, _)| *step >= raw)
        .unwrap_or_else(|| {
            let years = (raw / (365.0 * DAY)).ceil().max(1.0);
            (years * 365.0 * DAY, "%Y")
        })
}

/// Multiples of `step` inside `lower..=upper`.
pub fn stepped(lower: f64, upper: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !(upper >= lower) {
        return vec![lower];
    }
    let first = (lower / step).ceil();
    let last = (upper / step + 1e-9).floor();
    if last - first > 1000.0 {
        return vec![lower, upper];
    }
    (first as i64..=last as i64).map(|k| k as f64 * step).collect()
}
