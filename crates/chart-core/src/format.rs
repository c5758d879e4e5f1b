// File: crates/chart-core/src/format.rs
// Summary: Number formats for tick labels: decimal patterns and logarithmic exponent labels.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Subset of decimal format patterns: `0` is a required digit, `#` an
/// optional one, `,` in the integer part enables thousands grouping.
/// Examples: `0.0#`, `0.00`, `#,##0.###`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalFormat {
    pattern: String,
    min_integer: usize,
    min_fraction: usize,
    max_fraction: usize,
    grouping: bool,
}

impl DecimalFormat {
    pub fn new(pattern: &str) -> Result<Self> {
        let (int_part, frac_part) = match pattern.split_once('.') {
            Some((i, f)) => (i, f),
            None => (pattern, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ChartError::invalid("empty decimal pattern"));
        }
        if let Some(c) = int_part.chars().find(|c| !matches!(c, '0' | '#' | ',')) {
            return Err(ChartError::invalid(format!("unsupported character '{c}' in pattern '{pattern}'")));
        }
        if let Some(c) = frac_part.chars().find(|c| !matches!(c, '0' | '#')) {
            return Err(ChartError::invalid(format!("unsupported character '{c}' in pattern '{pattern}'")));
        }
        if frac_part.trim_start_matches('0').contains('0') {
            return Err(ChartError::invalid(format!("optional digit before required digit in '{pattern}'")));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            min_integer: int_part.chars().filter(|c| *c == '0').count(),
            min_fraction: frac_part.chars().filter(|c| *c == '0').count(),
            max_fraction: frac_part.len(),
            grouping: int_part.contains(','),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
        }
        let fixed = format!("{:.*}", self.max_fraction, value.abs());
        let (int_digits, frac_digits) = match fixed.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (fixed.clone(), String::new()),
        };
        let mut frac = frac_digits;
        while frac.len() > self.min_fraction && frac.ends_with('0') {
            frac.pop();
        }
        let mut int = int_digits.trim_start_matches('0').to_string();
        while int.len() < self.min_integer {
            int.insert(0, '0');
        }
        if self.grouping {
            int = group_thousands(&int);
        }
        let negative = value < 0.0 && (int.chars().any(|c| c.is_ascii_digit() && c != '0') || frac.chars().any(|c| c != '0'));
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&int);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        if out.is_empty() || out == "-" {
            out = "0".to_string();
        }
        out
    }
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self { pattern: "0.0#".to_string(), min_integer: 1, min_fraction: 1, max_fraction: 2, grouping: false }
    }
}

fn group_thousands(digits: &str) -> String {
    let n = digits.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a value as its logarithm, e.g. `10^2.0` for 100.
///
/// Equality covers every field, including the exponent format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogFormat {
    base: f64,
    base_label: String,
    power_label: String,
    show_base: bool,
    exponent_format: DecimalFormat,
}

impl LogFormat {
    pub fn new(base: f64, base_label: impl Into<String>, power_label: impl Into<String>, show_base: bool) -> Result<Self> {
        if !(base > 0.0) || base == 1.0 || !base.is_finite() {
            return Err(ChartError::invalid(format!("invalid logarithm base {base}")));
        }
        Ok(Self {
            base,
            base_label: base_label.into(),
            power_label: power_label.into(),
            show_base,
            exponent_format: DecimalFormat::default(),
        })
    }

    pub fn base(&self) -> f64 { self.base }
    pub fn base_label(&self) -> &str { &self.base_label }
    pub fn power_label(&self) -> &str { &self.power_label }
    pub fn show_base(&self) -> bool { self.show_base }

    pub fn exponent_format(&self) -> &DecimalFormat {
        &self.exponent_format
    }

    pub fn set_exponent_format(&mut self, format: DecimalFormat) {
        self.exponent_format = format;
    }

    pub fn format(&self, value: f64) -> String {
        let mut out = String::new();
        if self.show_base {
            out.push_str(&self.base_label);
            out.push_str(&self.power_label);
        }
        out.push_str(&self.exponent_format.format(value.ln() / self.base.ln()));
        out
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            base: 10.0,
            base_label: "10".to_string(),
            power_label: "^".to_string(),
            show_base: true,
            exponent_format: DecimalFormat::default(),
        }
    }
}
