// File: crates/chart-core/src/plot/pie.rs
// Summary: Pie plot: one wedge per positive value of a keyed dataset.
// Notes:
// - Angles follow the canvas arc convention; the first section starts at
//   `start_angle` and sections proceed in `direction`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canvas::{ArcClosure, Canvas, Shape, TextAnchor};
use crate::data::PieDataset;
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, Result};
use crate::event::{shared, ChangeKind, Notifier, Observable, Shared};
use crate::geometry::{Point, Rect};
use crate::labels::{ToolTipGenerator, UrlGenerator};
use crate::legend::LegendItem;
use crate::paint::{Color, Font, Stroke};
use crate::plot::{shared_eq, Binding, PlotStyle, Source};
use crate::theme::Theme;

/// Share of the plot radius kept free for section labels.
const LABEL_GAP: f64 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieDirection {
    #[default]
    Clockwise,
    AntiClockwise,
}

impl Source for Shared<PieDataset> {
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

pub struct PiePlot {
    dataset: Option<Binding<Shared<PieDataset>>>,
    start_angle: f64,
    direction: PieDirection,
    section_paints: BTreeMap<String, Color>,
    explode_percents: BTreeMap<String, f64>,
    ignore_null_values: bool,
    ignore_zero_values: bool,
    labels_visible: bool,
    label_font: Font,
    tooltips: Option<ToolTipGenerator>,
    urls: Option<UrlGenerator>,
    style: PlotStyle,
    notifier: Notifier,
}

/// A section ready to draw.
struct Section<'a> {
    index: usize,
    key: &'a str,
    value: f64,
    start: f64,
    extent: f64,
}

impl PiePlot {
    pub fn new(dataset: Option<Shared<PieDataset>>) -> Self {
        let notifier = Notifier::new();
        Self {
            dataset: dataset.map(|d| Binding::bind(d, &notifier)),
            start_angle: 90.0,
            direction: PieDirection::Clockwise,
            section_paints: BTreeMap::new(),
            explode_percents: BTreeMap::new(),
            ignore_null_values: false,
            ignore_zero_values: false,
            labels_visible: true,
            label_font: Font::new("sans-serif", 10.0),
            tooltips: None,
            urls: None,
            style: PlotStyle::default(),
            notifier,
        }
    }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Plot)
    }

    pub fn dataset(&self) -> Option<&Shared<PieDataset>> {
        self.dataset.as_ref().map(|b| &b.source)
    }

    pub fn set_dataset(&mut self, dataset: Option<Shared<PieDataset>>) -> Result<Option<Shared<PieDataset>>> {
        let old = self.dataset.take().map(Binding::unbind);
        self.dataset = dataset.map(|d| Binding::bind(d, &self.notifier));
        self.changed()?;
        Ok(old)
    }

    pub fn start_angle(&self) -> f64 { self.start_angle }
    pub fn direction(&self) -> PieDirection { self.direction }
    pub fn ignore_null_values(&self) -> bool { self.ignore_null_values }
    pub fn ignore_zero_values(&self) -> bool { self.ignore_zero_values }
    pub fn labels_visible(&self) -> bool { self.labels_visible }
    pub fn tooltips(&self) -> Option<&ToolTipGenerator> { self.tooltips.as_ref() }
    pub fn urls(&self) -> Option<&UrlGenerator> { self.urls.as_ref() }

    pub fn section_paint(&self, key: &str) -> Option<Color> {
        self.section_paints.get(key).copied()
    }

    pub fn explode_percent(&self, key: &str) -> f64 {
        self.explode_percents.get(key).copied().unwrap_or(0.0)
    }

    /// Degrees, 0 at three o'clock.
    pub fn set_start_angle(&mut self, degrees: f64) -> Result<()> {
        if !degrees.is_finite() {
            return Err(ChartError::invalid("start angle must be finite"));
        }
        self.start_angle = degrees;
        self.changed()
    }

    pub fn set_direction(&mut self, direction: PieDirection) -> Result<()> {
        self.direction = direction;
        self.changed()
    }

    pub fn set_section_paint(&mut self, key: impl Into<String>, paint: Option<Color>) -> Result<()> {
        let key = key.into();
        match paint {
            Some(p) => self.section_paints.insert(key, p),
            None => self.section_paints.remove(&key),
        };
        self.changed()
    }

    /// Offset of the section from the center, as a fraction of the radius.
    pub fn set_explode_percent(&mut self, key: impl Into<String>, percent: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&percent) {
            return Err(ChartError::invalid("explode percent must be within 0..=1"));
        }
        let key = key.into();
        if percent == 0.0 {
            self.explode_percents.remove(&key);
        } else {
            self.explode_percents.insert(key, percent);
        }
        self.changed()
    }

    pub fn set_ignore_null_values(&mut self, ignore: bool) -> Result<()> {
        self.ignore_null_values = ignore;
        self.changed()
    }

    pub fn set_ignore_zero_values(&mut self, ignore: bool) -> Result<()> {
        self.ignore_zero_values = ignore;
        self.changed()
    }

    pub fn set_labels_visible(&mut self, visible: bool) -> Result<()> {
        self.labels_visible = visible;
        self.changed()
    }

    pub fn set_tooltips(&mut self, tooltips: Option<ToolTipGenerator>) -> Result<()> {
        self.tooltips = tooltips;
        self.changed()
    }

    pub fn set_urls(&mut self, urls: Option<UrlGenerator>) -> Result<()> {
        self.urls = urls;
        self.changed()
    }

    pub fn style(&self) -> &PlotStyle { &self.style }

    pub fn set_style(&mut self, style: PlotStyle) -> Result<()> {
        self.style = style;
        self.changed()
    }

    /// Paint of the section at `index`: explicit per key, else the palette.
    fn paint_for(&self, key: &str, index: usize, theme: &Theme) -> Color {
        self.section_paint(key).or_else(|| theme.series_paint(index)).unwrap_or(Color::GRAY)
    }

    /// Legend entries; a key is listed unless its value is ignored.
    pub fn legend_items(&self, theme: &Theme) -> Vec<LegendItem> {
        let Some(d) = self.dataset() else { return Vec::new() };
        let d = d.borrow();
        d.iter()
            .enumerate()
            .filter(|(_, (_, v))| self.listed(*v))
            .map(|(i, (k, _))| LegendItem { label: k.to_string(), paint: self.paint_for(k, i, theme), marker: None, line: false, series: i })
            .collect()
    }

    fn listed(&self, value: Option<f64>) -> bool {
        match value {
            None => !self.ignore_null_values,
            Some(v) if v == 0.0 => !self.ignore_zero_values,
            Some(v) => v > 0.0,
        }
    }

    fn sections<'a>(&self, dataset: &'a PieDataset) -> Vec<Section<'a>> {
        let total = dataset.total();
        if !(total > 0.0) {
            return Vec::new();
        }
        let sign = match self.direction {
            PieDirection::Clockwise => -1.0,
            PieDirection::AntiClockwise => 1.0,
        };
        let mut angle = self.start_angle;
        let mut out = Vec::new();
        for (index, (key, value)) in dataset.iter().enumerate() {
            let Some(value) = value.filter(|v| *v > 0.0) else { continue };
            let extent = sign * value / total * 360.0;
            out.push(Section { index, key, value, start: angle, extent });
            angle += extent;
        }
        out
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, mut entities: Option<&mut EntityCollection>) -> Rect {
        let inner = area.shrink(&self.style.insets);
        self.style.fill_background(canvas, &inner, theme);
        if let Some(e) = entities.as_deref_mut() {
            e.add(ChartEntity::new(Shape::Rect(inner), EntityKind::Plot));
        }
        let Some(dataset) = self.dataset() else {
            self.style.draw_no_data(canvas, &inner, theme);
            return inner;
        };
        let dataset = dataset.borrow();
        let sections = self.sections(&dataset);
        if sections.is_empty() {
            self.style.draw_no_data(canvas, &inner, theme);
            return inner;
        }

        let max_explode = sections.iter().map(|s| self.explode_percent(s.key)).fold(0.0, f64::max);
        let label_room = if self.labels_visible { 1.0 - LABEL_GAP } else { 1.0 };
        let radius = inner.width().min(inner.height()) / 2.0 * label_room / (1.0 + max_explode);
        let center = inner.center();
        let total = dataset.total();

        for s in &sections {
            let explode = self.explode_percent(s.key) * radius;
            let c = Shape::point_on_circle(center, explode, s.start + s.extent / 2.0);
            let wedge = Shape::Arc { center: c, radius, start_deg: s.start, extent_deg: s.extent, closure: ArcClosure::Pie };
            canvas.fill(&wedge, self.paint_for(s.key, s.index, theme));
            canvas.stroke(&wedge, theme.background, &Stroke::new(1.0));

            if self.labels_visible {
                let at = Shape::point_on_circle(c, radius * (1.0 + LABEL_GAP / 2.0), s.start + s.extent / 2.0);
                let anchor = if at.x < center.x { TextAnchor::CenterRight } else { TextAnchor::CenterLeft };
                canvas.text(s.key, at, anchor, &self.label_font, theme.axis_label);
            }

            if let Some(e) = entities.as_deref_mut() {
                let mut entity = ChartEntity::new(wedge, EntityKind::PieSection { index: s.index, key: s.key.to_string() });
                if let Some(t) = &self.tooltips {
                    let percent = format!("{:.0}%", s.value / total * 100.0);
                    entity.tooltip = Some(t.generate([s.key, &t.format_value(Some(s.value)), &percent]));
                }
                if let Some(u) = &self.urls {
                    entity.url = Some(u.generate(s.key, &s.index.to_string()));
                }
                e.add(entity);
            }
        }
        self.style.stroke_outline(canvas, &inner, theme);
        Rect::from_ltrb(center.x - radius, center.y - radius, center.x + radius, center.y + radius)
    }

    /// Key of the section under `point`, if any.
    pub fn section_at(&self, area: Rect, point: Point, theme: &Theme) -> Option<String> {
        let mut canvas = crate::canvas::RecordingCanvas::new();
        let mut entities = EntityCollection::new();
        self.draw(&mut canvas, area, theme, Some(&mut entities));
        match entities.entity_at(point).map(|e| &e.kind) {
            Some(EntityKind::PieSection { key, .. }) => Some(key.clone()),
            _ => None,
        }
    }
}

impl Observable for PiePlot {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Plot }
}

impl Clone for PiePlot {
    fn clone(&self) -> Self {
        let notifier = Notifier::new();
        Self {
            dataset: self.dataset.as_ref().map(|b| Binding::bind(b.source.deep_clone(), &notifier)),
            start_angle: self.start_angle,
            direction: self.direction,
            section_paints: self.section_paints.clone(),
            explode_percents: self.explode_percents.clone(),
            ignore_null_values: self.ignore_null_values,
            ignore_zero_values: self.ignore_zero_values,
            labels_visible: self.labels_visible,
            label_font: self.label_font.clone(),
            tooltips: self.tooltips.clone(),
            urls: self.urls.clone(),
            style: self.style.clone(),
            notifier,
        }
    }
}

impl PartialEq for PiePlot {
    fn eq(&self, other: &Self) -> bool {
        let datasets = match (&self.dataset, &other.dataset) {
            (Some(a), Some(b)) => a.source.content_eq(&b.source),
            (None, None) => true,
            _ => false,
        };
        datasets
            && self.start_angle == other.start_angle
            && self.direction == other.direction
            && self.section_paints == other.section_paints
            && self.explode_percents == other.explode_percents
            && self.ignore_null_values == other.ignore_null_values
            && self.ignore_zero_values == other.ignore_zero_values
            && self.labels_visible == other.labels_visible
            && self.label_font == other.label_font
            && self.tooltips == other.tooltips
            && self.urls == other.urls
            && self.style == other.style
    }
}

impl fmt::Debug for PiePlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiePlot")
            .field("id", &self.notifier.id())
            .field("start_angle", &self.start_angle)
            .field("direction", &self.direction)
            .finish()
    }
}
