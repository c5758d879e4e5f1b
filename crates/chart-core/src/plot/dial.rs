// File: crates/chart-core/src/plot/dial.rs
// Summary: Dial plot: a single value shown by a needle over a circular scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canvas::{ArcClosure, Canvas, Shape, TextAnchor};
use crate::data::ValueDataset;
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, Result};
use crate::event::{shared, ChangeKind, Notifier, Observable, Shared};
use crate::format::DecimalFormat;
use crate::geometry::{Point, Rect};
use crate::paint::{Color, Font, Stroke};
use crate::plot::{shared_eq, Binding, PlotStyle, Source};
use crate::theme::Theme;

/// Maps values onto angles of the dial face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DialScaleRepr")]
pub struct DialScale {
    lower: f64,
    upper: f64,
    /// Angle of `lower`, degrees, 0 at three o'clock.
    start_angle: f64,
    /// Sweep from `lower` to `upper`; negative runs clockwise.
    extent: f64,
    major_tick_increment: f64,
    minor_tick_count: u32,
}

#[derive(Deserialize)]
struct DialScaleRepr {
    lower: f64,
    upper: f64,
    start_angle: f64,
    extent: f64,
    major_tick_increment: f64,
    minor_tick_count: u32,
}

impl TryFrom<DialScaleRepr> for DialScale {
    type Error = ChartError;

    fn try_from(r: DialScaleRepr) -> Result<Self> {
        DialScale::new(r.lower, r.upper, r.start_angle, r.extent, r.major_tick_increment, r.minor_tick_count)
    }
}

impl Default for DialScale {
    fn default() -> Self {
        Self { lower: 0.0, upper: 100.0, start_angle: 175.0, extent: -170.0, major_tick_increment: 10.0, minor_tick_count: 4 }
    }
}

impl DialScale {
    pub fn new(lower: f64, upper: f64, start_angle: f64, extent: f64, major_tick_increment: f64, minor_tick_count: u32) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(ChartError::invalid("dial scale needs finite lower < upper"));
        }
        if !(start_angle.is_finite() && extent.is_finite() && extent != 0.0) {
            return Err(ChartError::invalid("dial scale needs a finite non-zero extent"));
        }
        if !(major_tick_increment > 0.0) {
            return Err(ChartError::invalid("major tick increment must be positive"));
        }
        Ok(Self { lower, upper, start_angle, extent, major_tick_increment, minor_tick_count })
    }

    pub fn lower(&self) -> f64 { self.lower }
    pub fn upper(&self) -> f64 { self.upper }
    pub fn start_angle(&self) -> f64 { self.start_angle }
    pub fn extent(&self) -> f64 { self.extent }
    pub fn major_tick_increment(&self) -> f64 { self.major_tick_increment }
    pub fn minor_tick_count(&self) -> u32 { self.minor_tick_count }

    /// Angle for `value`, clamped to the scale bounds.
    pub fn value_to_angle(&self, value: f64) -> f64 {
        let v = value.clamp(self.lower, self.upper);
        self.start_angle + (v - self.lower) / (self.upper - self.lower) * self.extent
    }

    pub fn major_ticks(&self) -> Vec<f64> {
        crate::grid::stepped(self.lower, self.upper, self.major_tick_increment)
    }

    fn minor_ticks(&self) -> Vec<f64> {
        if self.minor_tick_count == 0 {
            return Vec::new();
        }
        let step = self.major_tick_increment / (self.minor_tick_count + 1) as f64;
        let majors = self.major_ticks();
        majors
            .iter()
            .flat_map(|m| (1..=self.minor_tick_count).map(move |k| m + k as f64 * step))
            .filter(|v| *v < self.upper)
            .collect()
    }
}

impl Source for Shared<ValueDataset> {
    fn with_notifier<R>(&self, f: impl FnOnce(&Notifier) -> R) -> R {
        f(self.borrow().notifier())
    }

    fn deep_clone(&self) -> Self {
        shared(self.borrow().clone())
    }

    fn content_eq(&self, other: &Self) -> bool {
        shared_eq(self, other)
    }
}

pub struct DialPlot {
    dataset: Option<Binding<Shared<ValueDataset>>>,
    scale: DialScale,
    /// `None` uses the theme's first series color.
    needle_paint: Option<Color>,
    cap_paint: Option<Color>,
    dial_background: Option<Color>,
    value_format: DecimalFormat,
    value_font: Font,
    tick_font: Font,
    style: PlotStyle,
    notifier: Notifier,
}

impl DialPlot {
    pub fn new(dataset: Option<Shared<ValueDataset>>) -> Self {
        let notifier = Notifier::new();
        Self {
            dataset: dataset.map(|d| Binding::bind(d, &notifier)),
            scale: DialScale::default(),
            needle_paint: None,
            cap_paint: None,
            dial_background: None,
            value_format: DecimalFormat::default(),
            value_font: Font::new("sans-serif", 14.0).bold(),
            tick_font: Font::new("sans-serif", 10.0),
            style: PlotStyle::default(),
            notifier,
        }
    }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Plot)
    }

    pub fn dataset(&self) -> Option<&Shared<ValueDataset>> {
        self.dataset.as_ref().map(|b| &b.source)
    }

    pub fn set_dataset(&mut self, dataset: Option<Shared<ValueDataset>>) -> Result<Option<Shared<ValueDataset>>> {
        let old = self.dataset.take().map(Binding::unbind);
        self.dataset = dataset.map(|d| Binding::bind(d, &self.notifier));
        self.changed()?;
        Ok(old)
    }

    pub fn scale(&self) -> &DialScale { &self.scale }
    pub fn needle_paint(&self) -> Option<Color> { self.needle_paint }
    pub fn cap_paint(&self) -> Option<Color> { self.cap_paint }

    pub fn set_scale(&mut self, scale: DialScale) -> Result<()> {
        self.scale = scale;
        self.changed()
    }

    pub fn set_needle_paint(&mut self, paint: Option<Color>) -> Result<()> {
        self.needle_paint = paint;
        self.changed()
    }

    pub fn set_cap_paint(&mut self, paint: Option<Color>) -> Result<()> {
        self.cap_paint = paint;
        self.changed()
    }

    pub fn set_dial_background(&mut self, paint: Option<Color>) -> Result<()> {
        self.dial_background = paint;
        self.changed()
    }

    pub fn set_value_format(&mut self, format: DecimalFormat) -> Result<()> {
        self.value_format = format;
        self.changed()
    }

    pub fn style(&self) -> &PlotStyle { &self.style }

    pub fn set_style(&mut self, style: PlotStyle) -> Result<()> {
        self.style = style;
        self.changed()
    }

    pub fn value(&self) -> Option<f64> {
        self.dataset().and_then(|d| d.borrow().value())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, entities: Option<&mut EntityCollection>) -> Rect {
        let inner = area.shrink(&self.style.insets);
        self.style.fill_background(canvas, &inner, theme);
        let radius = inner.width().min(inner.height()) / 2.0 * 0.9;
        let center = inner.center();
        let face = Rect::from_ltrb(center.x - radius, center.y - radius, center.x + radius, center.y + radius);
        canvas.fill(&Shape::Ellipse(face), self.dial_background.unwrap_or(theme.plot_background));
        canvas.stroke(&Shape::Ellipse(face), theme.outline, &Stroke::new(2.0));
        if let Some(e) = entities {
            e.add(ChartEntity::new(Shape::Ellipse(face), EntityKind::Plot));
        }

        let s = &self.scale;
        let track = Shape::Arc { center, radius: radius * 0.88, start_deg: s.start_angle, extent_deg: s.extent, closure: ArcClosure::Open };
        canvas.stroke(&track, theme.axis_line, &Stroke::new(1.0));
        for v in s.major_ticks() {
            let a = s.value_to_angle(v);
            tick(canvas, center, radius * 0.80, radius * 0.88, a, theme.tick, 2.0);
            let at = Shape::point_on_circle(center, radius * 0.70, a);
            canvas.text(&self.value_format.format(v), at, TextAnchor::Center, &self.tick_font, theme.axis_label);
        }
        for v in s.minor_ticks() {
            tick(canvas, center, radius * 0.84, radius * 0.88, s.value_to_angle(v), theme.tick, 1.0);
        }

        let needle = self.needle_paint.unwrap_or_else(|| theme.series_paint(0).unwrap_or(Color::RED));
        if let Some(v) = self.value() {
            let a = s.value_to_angle(v);
            let tip = Shape::point_on_circle(center, radius * 0.82, a);
            let left = Shape::point_on_circle(center, radius * 0.04, a + 90.0);
            let right = Shape::point_on_circle(center, radius * 0.04, a - 90.0);
            canvas.fill(&Shape::Polygon(vec![left, tip, right]), needle);
            let text_at = Point::new(center.x, center.y + radius * 0.45);
            canvas.text(&self.value_format.format(v), text_at, TextAnchor::Center, &self.value_font, theme.title);
        } else {
            self.style.draw_no_data(canvas, &inner, theme);
        }
        let cap = radius * 0.06;
        let cap_rect = Rect::from_ltrb(center.x - cap, center.y - cap, center.x + cap, center.y + cap);
        canvas.fill(&Shape::Ellipse(cap_rect), self.cap_paint.unwrap_or(theme.axis_line));
        face
    }
}

fn tick(canvas: &mut dyn Canvas, center: Point, r0: f64, r1: f64, angle: f64, color: Color, width: f64) {
    let a = Shape::point_on_circle(center, r0, angle);
    let b = Shape::point_on_circle(center, r1, angle);
    canvas.stroke(&Shape::line(a, b), color, &Stroke::new(width));
}

impl Observable for DialPlot {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Plot }
}

impl Clone for DialPlot {
    fn clone(&self) -> Self {
        let notifier = Notifier::new();
        Self {
            dataset: self.dataset.as_ref().map(|b| Binding::bind(b.source.deep_clone(), &notifier)),
            scale: self.scale.clone(),
            needle_paint: self.needle_paint,
            cap_paint: self.cap_paint,
            dial_background: self.dial_background,
            value_format: self.value_format.clone(),
            value_font: self.value_font.clone(),
            tick_font: self.tick_font.clone(),
            style: self.style.clone(),
            notifier,
        }
    }
}

impl PartialEq for DialPlot {
    fn eq(&self, other: &Self) -> bool {
        let datasets = match (&self.dataset, &other.dataset) {
            (Some(a), Some(b)) => a.source.content_eq(&b.source),
            (None, None) => true,
            _ => false,
        };
        datasets
            && self.scale == other.scale
            && self.needle_paint == other.needle_paint
            && self.cap_paint == other.cap_paint
            && self.dial_background == other.dial_background
            && self.value_format == other.value_format
            && self.value_font == other.value_font
            && self.tick_font == other.tick_font
            && self.style == other.style
    }
}

impl fmt::Debug for DialPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialPlot").field("id", &self.notifier.id()).field("scale", &self.scale).finish()
    }
}
