// File: crates/chart-core/src/plot/category.rs
// Summary: Category plot: a category axis against a value axis, one renderer per dataset index.

use std::collections::BTreeMap;
use std::fmt;

use crate::axis::{CategoryAxis, ValueAxis};
use crate::canvas::{Canvas, Shape};
use crate::data::{CategoryDataset, CategoryTable, Range, TaskSeriesCollection};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::Result;
use crate::event::{shared, ChangeKind, Notifier, Observable, Shared};
use crate::geometry::{Orientation, Rect};
use crate::legend::LegendItem;
use crate::paint::Stroke;
use crate::plot::xy::{axis_band, gridline};
use crate::plot::{adopt, disown, shared_eq, Binding, PlotStyle, Source};
use crate::renderer::{CategoryContext, CategoryRenderer};
use crate::scale::AxisMapping;
use crate::theme::Theme;

/// A shared category dataset of any supported kind.
#[derive(Clone, Debug)]
pub enum CategorySource {
    Table(Shared<CategoryTable>),
    Gantt(Shared<TaskSeriesCollection>),
}

impl CategorySource {
    pub fn with<R>(&self, f: impl FnOnce(&dyn CategoryDataset) -> R) -> R {
        match self {
            CategorySource::Table(d) => f(&*d.borrow()),
            CategorySource::Gantt(d) => f(&*d.borrow()),
        }
    }
}

impl Source for CategorySource {
    fn with_notifier<R>(&self, f: impl FnOnce(&Notifier) -> R) -> R {
        match self {
            CategorySource::Table(d) => f(d.borrow().notifier()),
            CategorySource::Gantt(d) => f(d.borrow().notifier()),
        }
    }

    fn deep_clone(&self) -> Self {
        match self {
            CategorySource::Table(d) => CategorySource::Table(shared(d.borrow().clone())),
            CategorySource::Gantt(d) => CategorySource::Gantt(shared(d.borrow().clone())),
        }
    }

    fn content_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CategorySource::Table(a), CategorySource::Table(b)) => shared_eq(a, b),
            (CategorySource::Gantt(a), CategorySource::Gantt(b)) => shared_eq(a, b),
            _ => false,
        }
    }
}

impl From<Shared<CategoryTable>> for CategorySource {
    fn from(d: Shared<CategoryTable>) -> Self { CategorySource::Table(d) }
}

impl From<Shared<TaskSeriesCollection>> for CategorySource {
    fn from(d: Shared<TaskSeriesCollection>) -> Self { CategorySource::Gantt(d) }
}

pub struct CategoryPlot {
    datasets: BTreeMap<usize, Binding<CategorySource>>,
    renderers: BTreeMap<usize, CategoryRenderer>,
    domain_axis: CategoryAxis,
    range_axis: ValueAxis,
    orientation: Orientation,
    range_gridlines: bool,
    style: PlotStyle,
    notifier: Notifier,
}

impl CategoryPlot {
    pub fn new(dataset: Option<CategorySource>, domain_axis: CategoryAxis, range_axis: ValueAxis, renderer: CategoryRenderer) -> Self {
        let mut plot = Self {
            datasets: BTreeMap::new(),
            renderers: BTreeMap::from([(0, renderer)]),
            domain_axis,
            range_axis,
            orientation: Orientation::Vertical,
            range_gridlines: true,
            style: PlotStyle::default(),
            notifier: Notifier::new(),
        };
        plot.adopt_children();
        if let Some(d) = dataset {
            plot.datasets.insert(0, Binding::bind(d, &plot.notifier));
        }
        plot
    }

    fn adopt_children(&self) {
        for r in self.renderers.values() {
            adopt(r, &self.notifier);
        }
        adopt(&self.domain_axis, &self.notifier);
        adopt(&self.range_axis, &self.notifier);
    }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Plot)
    }

    pub fn dataset(&self, index: usize) -> Option<&CategorySource> {
        self.datasets.get(&index).map(|b| &b.source)
    }

    pub fn set_dataset(&mut self, index: usize, dataset: Option<CategorySource>) -> Result<Option<CategorySource>> {
        let old = self.datasets.remove(&index).map(Binding::unbind);
        if let Some(d) = dataset {
            self.datasets.insert(index, Binding::bind(d, &self.notifier));
        }
        self.changed()?;
        Ok(old)
    }

    pub fn renderer(&self, index: usize) -> Option<&CategoryRenderer> {
        self.renderers.get(&index)
    }

    pub fn renderer_mut(&mut self, index: usize) -> Option<&mut CategoryRenderer> {
        self.renderers.get_mut(&index)
    }

    pub fn renderer_for(&self, index: usize) -> Option<&CategoryRenderer> {
        self.renderers.get(&index).or_else(|| self.renderers.get(&0))
    }

    pub fn set_renderer(&mut self, index: usize, renderer: CategoryRenderer) -> Result<()> {
        adopt(&renderer, &self.notifier);
        if let Some(old) = self.renderers.insert(index, renderer) {
            disown(&old, &self.notifier);
        }
        self.changed()
    }

    pub fn domain_axis(&self) -> &CategoryAxis { &self.domain_axis }
    pub fn domain_axis_mut(&mut self) -> &mut CategoryAxis { &mut self.domain_axis }
    pub fn range_axis(&self) -> &ValueAxis { &self.range_axis }
    pub fn range_axis_mut(&mut self) -> &mut ValueAxis { &mut self.range_axis }

    pub fn set_range_axis(&mut self, axis: ValueAxis) -> Result<()> {
        adopt(&axis, &self.notifier);
        let old = std::mem::replace(&mut self.range_axis, axis);
        disown(&old, &self.notifier);
        self.changed()
    }

    pub fn orientation(&self) -> Orientation { self.orientation }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        self.orientation = orientation;
        self.changed()
    }

    pub fn set_range_gridlines_visible(&mut self, visible: bool) -> Result<()> {
        self.range_gridlines = visible;
        self.changed()
    }

    pub fn style(&self) -> &PlotStyle { &self.style }

    pub fn set_style(&mut self, style: PlotStyle) -> Result<()> {
        self.style = style;
        self.changed()
    }

    /// Combined value bounds of every dataset, each measured by its renderer.
    pub fn data_range(&self) -> Option<Range> {
        let mut out = None;
        for (i, b) in &self.datasets {
            let Some(r) = self.renderer_for(*i) else { continue };
            out = Range::combine(out, b.source.with(|d| r.find_range_bounds(d)));
        }
        out
    }

    pub fn range_mapping(&self) -> AxisMapping {
        self.range_axis.mapping(self.data_range())
    }

    /// Category labels, taken from the primary dataset's columns.
    pub fn categories(&self) -> Vec<String> {
        self.datasets
            .get(&0)
            .map(|b| b.source.with(|d| (0..d.column_count()).map(|c| d.column_key(c).to_string()).collect()))
            .unwrap_or_default()
    }

    fn layout(&self, canvas: &dyn Canvas, area: Rect, labels: &[&str], rm: &AxisMapping) -> Rect {
        let inner = area.shrink(&self.style.insets);
        let (d_edge, r_edge) = (self.orientation.domain_edge(), self.orientation.range_edge());
        let d_space = self.domain_axis.reserved_space(canvas, labels, d_edge);
        let r_len = if r_edge.is_horizontal() { inner.width() } else { inner.height() };
        let r_space = self.range_axis.reserved_space(canvas, rm, r_edge, r_len);
        let mut top = inner.top;
        let vertical_label = if r_edge.is_horizontal() { self.domain_axis.label() } else { self.range_axis.label() };
        if !vertical_label.is_empty() {
            top += canvas.text_height(self.range_axis.label_font()) + 4.0;
        }
        let (left, bottom) = if d_edge.is_horizontal() { (r_space, d_space) } else { (d_space, r_space) };
        Rect::from_ltrb(inner.left + left, top, inner.right, inner.bottom - bottom)
    }

    pub fn legend_items(&self, theme: &Theme) -> Vec<LegendItem> {
        let mut items = Vec::new();
        for (i, b) in &self.datasets {
            if let Some(r) = self.renderer_for(*i) {
                items.extend(b.source.with(|d| r.legend_items(d, theme)));
            }
        }
        items
    }

    fn has_data(&self) -> bool {
        self.datasets.values().any(|b| b.source.with(|d| d.row_count() > 0 && d.column_count() > 0))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, mut entities: Option<&mut EntityCollection>) -> Rect {
        let rm = self.range_mapping();
        let categories = self.categories();
        let labels: Vec<&str> = categories.iter().map(String::as_str).collect();
        let data_area = self.layout(canvas, area, &labels, &rm);
        self.style.fill_background(canvas, &data_area, theme);
        if let Some(e) = entities.as_deref_mut() {
            e.add(ChartEntity::new(Shape::Rect(data_area), EntityKind::Plot));
        }

        let (d_edge, r_edge) = (self.orientation.domain_edge(), self.orientation.range_edge());
        if self.range_gridlines {
            let length = if r_edge.is_horizontal() { data_area.width() } else { data_area.height() };
            let (ticks, _) = self.range_axis.ticks(&rm, length);
            for v in ticks {
                gridline(canvas, &data_area, rm.to_screen(v, &data_area, r_edge), r_edge, theme, &Stroke::new(0.5));
            }
        }

        canvas.clip(data_area);
        if self.has_data() {
            for (i, b) in &self.datasets {
                let Some(r) = self.renderer_for(*i) else { continue };
                let ctx = CategoryContext {
                    data_area,
                    orientation: self.orientation,
                    domain: &self.domain_axis,
                    range: rm,
                    theme,
                    dataset_index: *i,
                };
                b.source.with(|d| r.draw(canvas, d, &ctx, entities.as_deref_mut()));
            }
        } else {
            self.style.draw_no_data(canvas, &data_area, theme);
        }
        canvas.reset_clip();

        self.style.stroke_outline(canvas, &data_area, theme);
        self.domain_axis.draw(canvas, &labels, &data_area, d_edge, theme);
        self.range_axis.draw(canvas, &rm, &data_area, r_edge, theme);
        if let Some(e) = entities {
            e.add(ChartEntity::new(Shape::Rect(axis_band(&data_area, &area, d_edge)), EntityKind::DomainAxis));
            e.add(ChartEntity::new(Shape::Rect(axis_band(&data_area, &area, r_edge)), EntityKind::RangeAxis));
        }
        data_area
    }
}

impl Observable for CategoryPlot {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Plot }
}

impl Clone for CategoryPlot {
    fn clone(&self) -> Self {
        let mut plot = Self {
            datasets: BTreeMap::new(),
            renderers: self.renderers.clone(),
            domain_axis: self.domain_axis.clone(),
            range_axis: self.range_axis.clone(),
            orientation: self.orientation,
            range_gridlines: self.range_gridlines,
            style: self.style.clone(),
            notifier: Notifier::new(),
        };
        plot.adopt_children();
        for (i, b) in &self.datasets {
            let copy = Binding::bind(b.source.deep_clone(), &plot.notifier);
            plot.datasets.insert(*i, copy);
        }
        plot
    }
}

impl PartialEq for CategoryPlot {
    fn eq(&self, other: &Self) -> bool {
        self.datasets.len() == other.datasets.len()
            && self
                .datasets
                .iter()
                .zip(&other.datasets)
                .all(|((i, a), (j, b))| i == j && a.source.content_eq(&b.source))
            && self.renderers == other.renderers
            && self.domain_axis == other.domain_axis
            && self.range_axis == other.range_axis
            && self.orientation == other.orientation
            && self.range_gridlines == other.range_gridlines
            && self.style == other.style
    }
}

impl fmt::Debug for CategoryPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryPlot")
            .field("id", &self.notifier.id())
            .field("datasets", &self.datasets.keys().collect::<Vec<_>>())
            .field("renderers", &self.renderers)
            .field("orientation", &self.orientation)
            .finish()
    }
}
