// File: crates/chart-core/src/axis/category.rs
// Summary: Category axis: slot geometry for categories and series within them.

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape, TextAnchor};
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::{Edge, Point, Rect};
use crate::paint::{Font, Stroke};
use crate::theme::Theme;

const LABEL_GAP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxis {
    label: String,
    lower_margin: f64,
    upper_margin: f64,
    /// Share of the axis length used for gaps between categories.
    category_margin: f64,
    visible: bool,
    label_font: Font,
    tick_font: Font,
    #[serde(skip)]
    notifier: Notifier,
}

impl CategoryAxis {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lower_margin: 0.05,
            upper_margin: 0.05,
            category_margin: 0.2,
            visible: true,
            label_font: Font::new("sans-serif", 12.0),
            tick_font: Font::new("sans-serif", 10.0),
            notifier: Notifier::new(),
        }
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn lower_margin(&self) -> f64 { self.lower_margin }
    pub fn upper_margin(&self) -> f64 { self.upper_margin }
    pub fn category_margin(&self) -> f64 { self.category_margin }
    pub fn is_visible(&self) -> bool { self.visible }

    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        self.label = label.into();
        self.notifier.fire(ChangeKind::Axis)
    }

    /// Fractions of the axis length; together they must leave room for the categories.
    pub fn set_margins(&mut self, lower: f64, upper: f64, category: f64) -> Result<()> {
        let all = [lower, upper, category];
        if all.iter().any(|m| !(*m >= 0.0)) || lower + upper + category >= 1.0 {
            return Err(ChartError::invalid("category axis margins must be >= 0 and sum below 1"));
        }
        self.lower_margin = lower;
        self.upper_margin = upper;
        self.category_margin = category;
        self.notifier.fire(ChangeKind::Axis)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.notifier.fire(ChangeKind::Axis)
    }

    pub fn set_tick_font(&mut self, font: Font) -> Result<()> {
        self.tick_font = font;
        self.notifier.fire(ChangeKind::Axis)
    }

    fn span(area: &Rect, edge: Edge) -> (f64, f64) {
        if edge.is_horizontal() { (area.left, area.width()) } else { (area.top, area.height()) }
    }

    /// Width of one category slot.
    pub fn category_size(&self, count: usize, area: &Rect, edge: Edge) -> f64 {
        let (_, available) = Self::span(area, edge);
        let margins = self.lower_margin + self.upper_margin;
        if count > 1 {
            available * (1.0 - margins - self.category_margin) / count as f64
        } else {
            available * (1.0 - margins)
        }
    }

    fn gap_size(&self, count: usize, area: &Rect, edge: Edge) -> f64 {
        let (_, available) = Self::span(area, edge);
        if count > 1 { available * self.category_margin / (count - 1) as f64 } else { 0.0 }
    }

    pub fn category_start(&self, index: usize, count: usize, area: &Rect, edge: Edge) -> f64 {
        let (origin, available) = Self::span(area, edge);
        origin
            + available * self.lower_margin
            + index as f64 * (self.category_size(count, area, edge) + self.gap_size(count, area, edge))
    }

    pub fn category_middle(&self, index: usize, count: usize, area: &Rect, edge: Edge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge) / 2.0
    }

    pub fn category_end(&self, index: usize, count: usize, area: &Rect, edge: Edge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge)
    }

    /// Middle of the slot of `series` inside category `index`, with `item_margin`
    /// of the category width spread between the series slots.
    pub fn category_series_middle(
        &self,
        index: usize,
        count: usize,
        series: usize,
        series_count: usize,
        item_margin: f64,
        area: &Rect,
        edge: Edge,
    ) -> f64 {
        let start = self.category_start(index, count, area, edge);
        let width = self.category_size(count, area, edge);
        if series_count <= 1 {
            return start + width / 2.0;
        }
        let gap = width * item_margin / (series_count - 1) as f64;
        let slot = width * (1.0 - item_margin) / series_count as f64;
        start + series as f64 * (slot + gap) + slot / 2.0
    }

    pub fn reserved_space(&self, canvas: &dyn Canvas, labels: &[&str], edge: Edge) -> f64 {
        if !self.visible {
            return 0.0;
        }
        let label_h = if self.label.is_empty() { 0.0 } else { canvas.text_height(&self.label_font) + LABEL_GAP };
        if edge.is_horizontal() {
            LABEL_GAP + canvas.text_height(&self.tick_font) + label_h
        } else {
            let widest = labels.iter().map(|l| canvas.text_width(l, &self.tick_font)).fold(0.0, f64::max);
            LABEL_GAP * 2.0 + widest
        }
    }

    /// Axis line, one label per category and the axis label.
    pub fn draw(&self, canvas: &mut dyn Canvas, labels: &[&str], data_area: &Rect, edge: Edge, theme: &Theme) {
        if !self.visible {
            return;
        }
        let (a, b) = match edge {
            Edge::Bottom => (Point::new(data_area.left, data_area.bottom), Point::new(data_area.right, data_area.bottom)),
            Edge::Top => (Point::new(data_area.left, data_area.top), Point::new(data_area.right, data_area.top)),
            Edge::Left => (Point::new(data_area.left, data_area.top), Point::new(data_area.left, data_area.bottom)),
            Edge::Right => (Point::new(data_area.right, data_area.top), Point::new(data_area.right, data_area.bottom)),
        };
        canvas.stroke(&Shape::line(a, b), theme.axis_line, &Stroke::new(1.0));
        let count = labels.len();
        for (i, text) in labels.iter().enumerate() {
            let m = self.category_middle(i, count, data_area, edge);
            let (at, anchor) = match edge {
                Edge::Bottom => (Point::new(m, a.y + LABEL_GAP), TextAnchor::TopCenter),
                Edge::Top => (Point::new(m, a.y - LABEL_GAP), TextAnchor::BottomCenter),
                Edge::Left => (Point::new(a.x - LABEL_GAP, m), TextAnchor::CenterRight),
                Edge::Right => (Point::new(a.x + LABEL_GAP, m), TextAnchor::CenterLeft),
            };
            canvas.text(text, at, anchor, &self.tick_font, theme.axis_label);
        }
        if self.label.is_empty() {
            return;
        }
        let tick_h = canvas.text_height(&self.tick_font);
        let (at, anchor) = match edge {
            Edge::Bottom => (Point::new(data_area.center().x, a.y + LABEL_GAP * 2.0 + tick_h), TextAnchor::TopCenter),
            Edge::Top => (Point::new(data_area.center().x, a.y - LABEL_GAP * 2.0 - tick_h), TextAnchor::BottomCenter),
            Edge::Left => (Point::new(a.x, data_area.top - LABEL_GAP), TextAnchor::BottomLeft),
            Edge::Right => (Point::new(a.x, data_area.top - LABEL_GAP), TextAnchor::BottomRight),
        };
        canvas.text(&self.label, at, anchor, &self.label_font, theme.axis_label);
    }
}

impl Observable for CategoryAxis {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Axis }
}
