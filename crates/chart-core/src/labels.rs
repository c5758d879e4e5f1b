// File: crates/chart-core/src/labels.rs
// Summary: Tooltip and URL text for chart entities.
// Notes:
// - Tooltip patterns use `{0}`, `{1}` and `{2}` placeholders. For XY items they
//   are series key, x and y; for category items series, category and value; for
//   pie sections key, value and percent.

use serde::{Deserialize, Serialize};

use crate::format::DecimalFormat;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolTipGenerator {
    pattern: String,
    number_format: DecimalFormat,
}

impl ToolTipGenerator {
    pub fn new(pattern: impl Into<String>, number_format: DecimalFormat) -> Self {
        Self { pattern: pattern.into(), number_format }
    }

    /// `{0}: ({1}, {2})`
    pub fn xy() -> Self {
        Self::new("{0}: ({1}, {2})", DecimalFormat::default())
    }

    /// `({0}, {1}) = {2}`
    pub fn category() -> Self {
        Self::new("({0}, {1}) = {2}", DecimalFormat::default())
    }

    /// `{0} = {1} ({2})`
    pub fn pie() -> Self {
        Self::new("{0} = {1} ({2})", DecimalFormat::default())
    }

    pub fn pattern(&self) -> &str { &self.pattern }

    pub fn format_value(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => self.number_format.format(v),
            None => "null".to_string(),
        }
    }

    /// Substitute the three placeholders in one pass; argument text is never rescanned.
    pub fn generate(&self, args: [&str; 3]) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        let mut rest = self.pattern.as_str();
        while let Some(at) = rest.find('{') {
            out.push_str(&rest[..at]);
            let tail = &rest[at..];
            let index = match tail.as_bytes() {
                [b'{', d @ b'0'..=b'2', b'}', ..] => Some(usize::from(d - b'0')),
                _ => None,
            };
            match index {
                Some(i) => {
                    out.push_str(args[i]);
                    rest = &tail[3..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Builds `prefix?series=..&item=..` links for image maps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UrlGenerator {
    prefix: String,
    series_parameter: String,
    item_parameter: String,
}

impl UrlGenerator {
    pub fn new(prefix: impl Into<String>, series_parameter: impl Into<String>, item_parameter: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), series_parameter: series_parameter.into(), item_parameter: item_parameter.into() }
    }

    pub fn generate(&self, series: &str, item: &str) -> String {
        let sep = if self.prefix.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}&{}={}",
            self.prefix,
            sep,
            self.series_parameter,
            encode(series),
            self.item_parameter,
            encode(item)
        )
    }
}

impl Default for UrlGenerator {
    fn default() -> Self {
        Self::new("index.html", "series", "item")
    }
}

/// Percent-encode everything outside the unreserved URL characters.
fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
