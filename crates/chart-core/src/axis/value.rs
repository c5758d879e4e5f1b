// File: crates/chart-core/src/axis/value.rs
// Summary: Numeric axis: auto range, value/pixel mapping, ticks, labels and drawing.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape, TextAnchor};
use crate::data::Range;
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};
use crate::format::{DecimalFormat, LogFormat};
use crate::geometry::{Edge, Point, Rect};
use crate::grid;
use crate::paint::{Font, Stroke};
use crate::scale::{AxisMapping, LOG_SMALLEST_VALUE};
use crate::theme::Theme;

/// Pixels between neighbouring ticks the tick layout aims for.
const TICK_SPACING: f64 = 72.0;
const TICK_LENGTH: f64 = 4.0;
const LABEL_GAP: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AxisScale {
    Linear,
    Log { base: f64 },
}

/// How tick values are turned into text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickLabels {
    /// `None` picks the decimals from the tick step.
    Number(Option<DecimalFormat>),
    Log(LogFormat),
    /// Values are epoch milliseconds (UTC). `None` picks a pattern from the step.
    Date(Option<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueAxisRepr")]
pub struct ValueAxis {
    label: String,
    scale: AxisScale,
    range: Range,
    auto_range: bool,
    default_auto_range: Range,
    lower_margin: f64,
    upper_margin: f64,
    auto_range_includes_zero: bool,
    auto_range_sticky_zero: bool,
    auto_range_minimum_size: f64,
    fixed_auto_range: Option<f64>,
    inverted: bool,
    visible: bool,
    tick_labels: TickLabels,
    label_font: Font,
    tick_font: Font,
    #[serde(skip)]
    notifier: Notifier,
}

/// Unchecked wire form; loading goes through the validating setters.
#[derive(Deserialize)]
struct ValueAxisRepr {
    label: String,
    scale: AxisScale,
    range: Range,
    auto_range: bool,
    default_auto_range: Range,
    lower_margin: f64,
    upper_margin: f64,
    auto_range_includes_zero: bool,
    auto_range_sticky_zero: bool,
    auto_range_minimum_size: f64,
    fixed_auto_range: Option<f64>,
    inverted: bool,
    visible: bool,
    tick_labels: TickLabels,
    label_font: Font,
    tick_font: Font,
}

impl TryFrom<ValueAxisRepr> for ValueAxis {
    type Error = ChartError;

    fn try_from(r: ValueAxisRepr) -> Result<Self> {
        let mut axis = ValueAxis::new(r.label);
        axis.set_scale(r.scale)?;
        axis.set_range(r.range)?;
        axis.set_auto_range(r.auto_range)?;
        axis.set_default_auto_range(r.default_auto_range)?;
        axis.set_margins(r.lower_margin, r.upper_margin)?;
        axis.set_auto_range_includes_zero(r.auto_range_includes_zero)?;
        axis.set_auto_range_sticky_zero(r.auto_range_sticky_zero)?;
        axis.set_auto_range_minimum_size(r.auto_range_minimum_size)?;
        axis.set_fixed_auto_range(r.fixed_auto_range)?;
        axis.set_inverted(r.inverted)?;
        axis.set_visible(r.visible)?;
        axis.set_tick_labels(r.tick_labels)?;
        axis.set_label_font(r.label_font)?;
        axis.set_tick_font(r.tick_font)?;
        Ok(axis)
    }
}

impl ValueAxis {
    /// Linear number axis with auto range including zero.
    pub fn new(label: impl Into<String>) -> Self {
        let unit = Range::spanning(0.0, 1.0);
        Self {
            label: label.into(),
            scale: AxisScale::Linear,
            range: unit,
            auto_range: true,
            default_auto_range: unit,
            lower_margin: 0.05,
            upper_margin: 0.05,
            auto_range_includes_zero: true,
            auto_range_sticky_zero: true,
            auto_range_minimum_size: 1e-8,
            fixed_auto_range: None,
            inverted: false,
            visible: true,
            tick_labels: TickLabels::Number(None),
            label_font: Font::new("sans-serif", 12.0),
            tick_font: Font::new("sans-serif", 10.0),
            notifier: Notifier::new(),
        }
    }

    /// Logarithmic axis; labels render as powers of `base`.
    pub fn log(label: impl Into<String>, base: f64) -> Result<Self> {
        let format = LogFormat::new(base, format_base(base), "^", true)?;
        let mut axis = Self::new(label);
        axis.scale = AxisScale::Log { base };
        axis.default_auto_range = Range::spanning(0.01, 1.0);
        axis.range = axis.default_auto_range;
        axis.auto_range_includes_zero = false;
        axis.tick_labels = TickLabels::Log(format);
        Ok(axis)
    }

    /// Linear axis over epoch milliseconds with date labels.
    pub fn date(label: impl Into<String>) -> Self {
        let mut axis = Self::new(label);
        axis.auto_range_includes_zero = false;
        axis.tick_labels = TickLabels::Date(None);
        axis
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn scale(&self) -> AxisScale { self.scale }
    pub fn range(&self) -> Range { self.range }
    pub fn is_auto_range(&self) -> bool { self.auto_range }
    pub fn default_auto_range(&self) -> Range { self.default_auto_range }
    pub fn lower_margin(&self) -> f64 { self.lower_margin }
    pub fn upper_margin(&self) -> f64 { self.upper_margin }
    pub fn auto_range_includes_zero(&self) -> bool { self.auto_range_includes_zero }
    pub fn auto_range_minimum_size(&self) -> f64 { self.auto_range_minimum_size }
    pub fn fixed_auto_range(&self) -> Option<f64> { self.fixed_auto_range }
    pub fn is_inverted(&self) -> bool { self.inverted }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn tick_labels(&self) -> &TickLabels { &self.tick_labels }
    pub fn label_font(&self) -> &Font { &self.label_font }
    pub fn tick_font(&self) -> &Font { &self.tick_font }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Axis)
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        self.label = label.into();
        self.changed()
    }

    pub fn set_scale(&mut self, scale: AxisScale) -> Result<()> {
        if let AxisScale::Log { base } = scale {
            if !(base > 0.0) || base == 1.0 || !base.is_finite() {
                return Err(ChartError::invalid(format!("invalid logarithm base {base}")));
            }
        }
        self.scale = scale;
        self.changed()
    }

    /// Fix the range; turns auto range off. Log axes need a positive lower bound.
    pub fn set_range(&mut self, range: Range) -> Result<()> {
        if matches!(self.scale, AxisScale::Log { .. }) && range.lower() <= 0.0 {
            return Err(ChartError::invalid("log axis range must be positive"));
        }
        self.range = range;
        self.auto_range = false;
        self.changed()
    }

    pub fn set_auto_range(&mut self, auto: bool) -> Result<()> {
        self.auto_range = auto;
        self.changed()
    }

    pub fn set_default_auto_range(&mut self, range: Range) -> Result<()> {
        self.default_auto_range = range;
        self.changed()
    }

    /// Margins as fractions of the data length added below and above.
    pub fn set_margins(&mut self, lower: f64, upper: f64) -> Result<()> {
        if !(lower >= 0.0) || !(upper >= 0.0) {
            return Err(ChartError::invalid("axis margins must be >= 0"));
        }
        self.lower_margin = lower;
        self.upper_margin = upper;
        self.changed()
    }

    pub fn set_auto_range_includes_zero(&mut self, include: bool) -> Result<()> {
        self.auto_range_includes_zero = include;
        self.changed()
    }

    /// With sticky zero, margins never push the range across zero.
    pub fn set_auto_range_sticky_zero(&mut self, sticky: bool) -> Result<()> {
        self.auto_range_sticky_zero = sticky;
        self.changed()
    }

    pub fn set_auto_range_minimum_size(&mut self, size: f64) -> Result<()> {
        if !(size > 0.0) {
            return Err(ChartError::invalid("minimum auto range size must be positive"));
        }
        self.auto_range_minimum_size = size;
        self.changed()
    }

    /// Show only the last `length` units of data (a sliding window).
    pub fn set_fixed_auto_range(&mut self, length: Option<f64>) -> Result<()> {
        if let Some(l) = length {
            if !(l > 0.0) {
                return Err(ChartError::invalid("fixed auto range must be positive"));
            }
        }
        self.fixed_auto_range = length;
        self.changed()
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<()> {
        self.inverted = inverted;
        self.changed()
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.changed()
    }

    pub fn set_tick_labels(&mut self, labels: TickLabels) -> Result<()> {
        self.tick_labels = labels;
        self.changed()
    }

    pub fn set_label_font(&mut self, font: Font) -> Result<()> {
        self.label_font = font;
        self.changed()
    }

    pub fn set_tick_font(&mut self, font: Font) -> Result<()> {
        self.tick_font = font;
        self.changed()
    }

    /// The range the axis shows for `data` (the combined data bounds of the
    /// plot). With auto range off this is the fixed range.
    pub fn effective_range(&self, data: Option<Range>) -> Range {
        if !self.auto_range {
            return self.range;
        }
        match self.scale {
            AxisScale::Linear => self.linear_auto_range(data),
            AxisScale::Log { base } => self.log_auto_range(data, base),
        }
    }

    fn linear_auto_range(&self, data: Option<Range>) -> Range {
        let Some(r) = data else { return self.default_auto_range };
        let mut lower = r.lower();
        let mut upper = r.upper();
        if let Some(fixed) = self.fixed_auto_range {
            return Range::spanning(upper - fixed, upper);
        }
        if self.auto_range_includes_zero {
            lower = lower.min(0.0);
            upper = upper.max(0.0);
        }
        let mut length = upper - lower;
        if length == 0.0 {
            // a single value: widen by a tenth of its magnitude
            let adjust = if lower == 0.0 { 0.5 } else { lower.abs() / 10.0 };
            lower -= adjust;
            upper += adjust;
            length = upper - lower;
        } else if length < self.auto_range_minimum_size {
            let expand = (self.auto_range_minimum_size - length) / 2.0;
            lower -= expand;
            upper += expand;
            length = upper - lower;
        }
        let lower_gap = length * self.lower_margin;
        let upper_gap = length * self.upper_margin;
        if self.auto_range_includes_zero && self.auto_range_sticky_zero {
            upper = if upper <= 0.0 { (upper + upper_gap).min(0.0) } else { upper + upper_gap };
            lower = if lower >= 0.0 { (lower - lower_gap).max(0.0) } else { lower - lower_gap };
        } else {
            upper += upper_gap;
            lower -= lower_gap;
        }
        Range::spanning(lower, upper)
    }

    fn log_auto_range(&self, data: Option<Range>, base: f64) -> Range {
        let r = match data {
            Some(r) if r.upper() > 0.0 => r,
            _ => return self.default_auto_range,
        };
        let upper = r.upper();
        let mut lower = r.lower().max(LOG_SMALLEST_VALUE);
        if let Some(fixed) = self.fixed_auto_range {
            lower = (upper - fixed).max(LOG_SMALLEST_VALUE);
            return Range::spanning(lower.min(upper), upper);
        }
        let log = |v: f64| v.ln() / base.ln();
        let (mut log_lower, mut log_upper) = (log(lower), log(upper));
        if log_upper - log_lower == 0.0 {
            log_lower -= 0.5;
            log_upper += 0.5;
        }
        let span = log_upper - log_lower;
        log_upper += span * self.upper_margin;
        log_lower -= span * self.lower_margin;
        Range::spanning(base.powf(log_lower).max(LOG_SMALLEST_VALUE), base.powf(log_upper))
    }

    /// Freeze the axis to the effective range for `data`.
    pub fn mapping(&self, data: Option<Range>) -> AxisMapping {
        let range = self.effective_range(data);
        AxisMapping {
            lower: range.lower(),
            upper: range.upper(),
            log_base: match self.scale {
                AxisScale::Log { base } => Some(base),
                AxisScale::Linear => None,
            },
            inverted: self.inverted,
        }
    }

    pub fn value_to_screen(&self, value: f64, data: Option<Range>, area: &Rect, edge: Edge) -> f64 {
        self.mapping(data).to_screen(value, area, edge)
    }

    pub fn screen_to_value(&self, px: f64, data: Option<Range>, area: &Rect, edge: Edge) -> f64 {
        self.mapping(data).from_screen(px, area, edge)
    }

    /// Tick values for an axis `length` pixels long, with the step between them
    /// (0 for logarithmic ticks).
    pub fn ticks(&self, mapping: &AxisMapping, length: f64) -> (Vec<f64>, f64) {
        let target = (length / TICK_SPACING).floor().clamp(2.0, 20.0) as usize;
        match &self.tick_labels {
            TickLabels::Date(_) if mapping.log_base.is_none() => {
                let (step, _) = grid::date_step((mapping.upper - mapping.lower) / target as f64);
                (grid::stepped(mapping.lower, mapping.upper, step), step)
            }
            _ => grid::ticks(mapping, target),
        }
    }

    pub fn tick_label(&self, value: f64, step: f64) -> String {
        match &self.tick_labels {
            TickLabels::Number(Some(format)) => format.format(value),
            TickLabels::Number(None) => auto_number_label(value, step),
            TickLabels::Log(format) => format.format(value),
            TickLabels::Date(pattern) => {
                let pattern = pattern.as_deref().unwrap_or_else(|| grid::date_step(step).1);
                match DateTime::from_timestamp_millis(value.round() as i64) {
                    Some(dt) => dt.format(pattern).to_string(),
                    None => auto_number_label(value, step),
                }
            }
        }
    }

    /// Zoom to the part of `current` between two fractions of its length.
    /// Log axes zoom in log space.
    pub fn zoom_range(&mut self, current: &AxisMapping, lower_pct: f64, upper_pct: f64) -> Result<()> {
        if !(lower_pct < upper_pct) {
            return Err(ChartError::invalid("zoom fractions must be increasing"));
        }
        let (lo, hi) = to_space(current);
        let len = hi - lo;
        let range = Range::new(from_space(current, lo + len * lower_pct), from_space(current, lo + len * upper_pct))?;
        self.set_range(range)
    }

    /// Shift the visible range by `percent` of its length.
    pub fn pan(&mut self, current: &AxisMapping, percent: f64) -> Result<()> {
        let (lo, hi) = to_space(current);
        let delta = (hi - lo) * percent;
        let range = Range::new(from_space(current, lo + delta), from_space(current, hi + delta))?;
        self.set_range(range)
    }

    /// Scale the visible range by `factor` around `anchor` (a data value).
    pub fn resize_around(&mut self, current: &AxisMapping, factor: f64, anchor: f64) -> Result<()> {
        if !(factor > 0.0) {
            return Err(ChartError::invalid("zoom factor must be positive"));
        }
        let (lo, hi) = to_space(current);
        let a = match current.log_base {
            Some(base) if anchor > 0.0 => anchor.ln() / base.ln(),
            Some(_) => lo,
            None => anchor,
        };
        let range = Range::new(from_space(current, a - (a - lo) * factor), from_space(current, a + (hi - a) * factor))?;
        self.set_range(range)
    }

    /// Space needed outside the data area: tick marks, tick labels and the axis label.
    pub fn reserved_space(&self, canvas: &dyn Canvas, mapping: &AxisMapping, edge: Edge, length: f64) -> f64 {
        if !self.visible {
            return 0.0;
        }
        let label_h = if self.label.is_empty() { 0.0 } else { canvas.text_height(&self.label_font) + LABEL_GAP };
        if edge.is_horizontal() {
            TICK_LENGTH + LABEL_GAP + canvas.text_height(&self.tick_font) + label_h
        } else {
            let (ticks, step) = self.ticks(mapping, length);
            let widest = ticks
                .iter()
                .map(|v| canvas.text_width(&self.tick_label(*v, step), &self.tick_font))
                .fold(0.0, f64::max);
            TICK_LENGTH + LABEL_GAP + widest + LABEL_GAP
        }
    }

    /// Axis line, tick marks, tick labels and the label along `edge` of `data_area`.
    pub fn draw(&self, canvas: &mut dyn Canvas, mapping: &AxisMapping, data_area: &Rect, edge: Edge, theme: &Theme) {
        if !self.visible {
            return;
        }
        let line_stroke = Stroke::new(1.0);
        let (a, b) = match edge {
            Edge::Bottom => (Point::new(data_area.left, data_area.bottom), Point::new(data_area.right, data_area.bottom)),
            Edge::Top => (Point::new(data_area.left, data_area.top), Point::new(data_area.right, data_area.top)),
            Edge::Left => (Point::new(data_area.left, data_area.top), Point::new(data_area.left, data_area.bottom)),
            Edge::Right => (Point::new(data_area.right, data_area.top), Point::new(data_area.right, data_area.bottom)),
        };
        canvas.stroke(&Shape::line(a, b), theme.axis_line, &line_stroke);

        let length = if edge.is_horizontal() { data_area.width() } else { data_area.height() };
        let (ticks, step) = self.ticks(mapping, length);
        for v in ticks {
            let px = mapping.to_screen(v, data_area, edge);
            if !px.is_finite() {
                continue;
            }
            let text = self.tick_label(v, step);
            let (mark, at, anchor) = match edge {
                Edge::Bottom => (
                    Shape::line(Point::new(px, a.y), Point::new(px, a.y + TICK_LENGTH)),
                    Point::new(px, a.y + TICK_LENGTH + LABEL_GAP),
                    TextAnchor::TopCenter,
                ),
                Edge::Top => (
                    Shape::line(Point::new(px, a.y), Point::new(px, a.y - TICK_LENGTH)),
                    Point::new(px, a.y - TICK_LENGTH - LABEL_GAP),
                    TextAnchor::BottomCenter,
                ),
                Edge::Left => (
                    Shape::line(Point::new(a.x, px), Point::new(a.x - TICK_LENGTH, px)),
                    Point::new(a.x - TICK_LENGTH - LABEL_GAP, px),
                    TextAnchor::CenterRight,
                ),
                Edge::Right => (
                    Shape::line(Point::new(a.x, px), Point::new(a.x + TICK_LENGTH, px)),
                    Point::new(a.x + TICK_LENGTH + LABEL_GAP, px),
                    TextAnchor::CenterLeft,
                ),
            };
            canvas.stroke(&mark, theme.tick, &line_stroke);
            canvas.text(&text, at, anchor, &self.tick_font, theme.axis_label);
        }

        if self.label.is_empty() {
            return;
        }
        let tick_h = canvas.text_height(&self.tick_font);
        let (at, anchor) = match edge {
            Edge::Bottom => (
                Point::new(data_area.center().x, a.y + TICK_LENGTH + LABEL_GAP * 2.0 + tick_h),
                TextAnchor::TopCenter,
            ),
            Edge::Top => (
                Point::new(data_area.center().x, a.y - TICK_LENGTH - LABEL_GAP * 2.0 - tick_h),
                TextAnchor::BottomCenter,
            ),
            // vertical axes carry their label above the axis line
            Edge::Left => (Point::new(a.x, data_area.top - LABEL_GAP), TextAnchor::BottomLeft),
            Edge::Right => (Point::new(a.x, data_area.top - LABEL_GAP), TextAnchor::BottomRight),
        };
        canvas.text(&self.label, at, anchor, &self.label_font, theme.axis_label);
    }
}

impl Observable for ValueAxis {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Axis }
}

fn to_space(m: &AxisMapping) -> (f64, f64) {
    match m.log_base {
        Some(base) => (m.lower.max(LOG_SMALLEST_VALUE).ln() / base.ln(), m.upper.ln() / base.ln()),
        None => (m.lower, m.upper),
    }
}

fn from_space(m: &AxisMapping, t: f64) -> f64 {
    match m.log_base {
        Some(base) => base.powf(t),
        None => t,
    }
}

fn format_base(base: f64) -> String {
    if (base - std::f64::consts::E).abs() < 1e-12 {
        "e".to_string()
    } else if base.fract() == 0.0 {
        format!("{}", base as i64)
    } else {
        format!("{base}")
    }
}

fn auto_number_label(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 { (-step.log10().floor()) as usize } else { 0 };
    let text = format!("{:.*}", decimals.min(10), value);
    // avoid "-0" for values that round to zero
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}
