// File: crates/chart-core/src/plot/xy.rs
// Summary: XY plot: bound XY datasets, renderers by dataset index, two value axes and overlays.

use std::collections::BTreeMap;
use std::fmt;

use crate::annotation::{Crosshair, XyAnnotation};
use crate::axis::ValueAxis;
use crate::canvas::{Canvas, Shape};
use crate::data::{OhlcSeriesCollection, Range, TimeSeriesCollection, XyDataset, XySeriesCollection};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{check_index, Result};
use crate::event::{shared, ChangeKind, Notifier, Observable, Shared};
use crate::geometry::{Edge, Orientation, Point, Rect};
use crate::legend::LegendItem;
use crate::paint::Stroke;
use crate::plot::{adopt, disown, shared_eq, AxisKind, Binding, PlotStyle, Source};
use crate::renderer::{XyContext, XyRenderer};
use crate::scale::AxisMapping;
use crate::theme::Theme;

/// A shared XY dataset of any supported kind.
#[derive(Clone, Debug)]
pub enum XySource {
    Series(Shared<XySeriesCollection>),
    Time(Shared<TimeSeriesCollection>),
    Ohlc(Shared<OhlcSeriesCollection>),
}

impl XySource {
    /// Run `f` with read access to the dataset.
    pub fn with<R>(&self, f: impl FnOnce(&dyn XyDataset) -> R) -> R {
        match self {
            XySource::Series(d) => f(&*d.borrow()),
            XySource::Time(d) => f(&*d.borrow()),
            XySource::Ohlc(d) => f(&*d.borrow()),
        }
    }
}

impl Source for XySource {
    fn with_notifier<R>(&self, f: impl FnOnce(&Notifier) -> R) -> R {
        match self {
            XySource::Series(d) => f(d.borrow().notifier()),
            XySource::Time(d) => f(d.borrow().notifier()),
            XySource::Ohlc(d) => f(d.borrow().notifier()),
        }
    }

    fn deep_clone(&self) -> Self {
        match self {
            XySource::Series(d) => XySource::Series(shared(d.borrow().clone())),
            XySource::Time(d) => XySource::Time(shared(d.borrow().clone())),
            XySource::Ohlc(d) => XySource::Ohlc(shared(d.borrow().clone())),
        }
    }

    fn content_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (XySource::Series(a), XySource::Series(b)) => shared_eq(a, b),
            (XySource::Time(a), XySource::Time(b)) => shared_eq(a, b),
            (XySource::Ohlc(a), XySource::Ohlc(b)) => shared_eq(a, b),
            _ => false,
        }
    }
}

impl From<Shared<XySeriesCollection>> for XySource {
    fn from(d: Shared<XySeriesCollection>) -> Self { XySource::Series(d) }
}

impl From<Shared<TimeSeriesCollection>> for XySource {
    fn from(d: Shared<TimeSeriesCollection>) -> Self { XySource::Time(d) }
}

impl From<Shared<OhlcSeriesCollection>> for XySource {
    fn from(d: Shared<OhlcSeriesCollection>) -> Self { XySource::Ohlc(d) }
}

pub struct XyPlot {
    datasets: BTreeMap<usize, Binding<XySource>>,
    /// Dataset `i` uses renderer `i`, falling back to renderer 0.
    renderers: BTreeMap<usize, XyRenderer>,
    domain_axis: ValueAxis,
    range_axis: ValueAxis,
    orientation: Orientation,
    annotations: Vec<XyAnnotation>,
    domain_crosshair: Crosshair,
    range_crosshair: Crosshair,
    domain_gridlines: bool,
    range_gridlines: bool,
    style: PlotStyle,
    notifier: Notifier,
}

impl XyPlot {
    pub fn new(dataset: Option<XySource>, domain_axis: ValueAxis, range_axis: ValueAxis, renderer: XyRenderer) -> Self {
        let mut plot = Self {
            datasets: BTreeMap::new(),
            renderers: BTreeMap::from([(0, renderer)]),
            domain_axis,
            range_axis,
            orientation: Orientation::Vertical,
            annotations: Vec::new(),
            domain_crosshair: Crosshair::new(),
            range_crosshair: Crosshair::new(),
            domain_gridlines: true,
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
        for a in &self.annotations {
            adopt(a, &self.notifier);
        }
        adopt(&self.domain_crosshair, &self.notifier);
        adopt(&self.range_crosshair, &self.notifier);
    }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Plot)
    }

    pub fn dataset(&self, index: usize) -> Option<&XySource> {
        self.datasets.get(&index).map(|b| &b.source)
    }

    /// Bound datasets in index order.
    pub fn datasets(&self) -> impl Iterator<Item = (usize, &XySource)> {
        self.datasets.iter().map(|(i, b)| (*i, &b.source))
    }

    /// Bind `dataset` at `index` (replacing and unbinding any previous one);
    /// `None` only unbinds.
    pub fn set_dataset(&mut self, index: usize, dataset: Option<XySource>) -> Result<Option<XySource>> {
        let old = self.datasets.remove(&index).map(Binding::unbind);
        if let Some(d) = dataset {
            self.datasets.insert(index, Binding::bind(d, &self.notifier));
        }
        self.changed()?;
        Ok(old)
    }

    pub fn renderer(&self, index: usize) -> Option<&XyRenderer> {
        self.renderers.get(&index)
    }

    pub fn renderer_mut(&mut self, index: usize) -> Option<&mut XyRenderer> {
        self.renderers.get_mut(&index)
    }

    /// The renderer drawing dataset `index`.
    pub fn renderer_for(&self, index: usize) -> Option<&XyRenderer> {
        self.renderers.get(&index).or_else(|| self.renderers.get(&0))
    }

    pub fn set_renderer(&mut self, index: usize, renderer: XyRenderer) -> Result<()> {
        adopt(&renderer, &self.notifier);
        if let Some(old) = self.renderers.insert(index, renderer) {
            disown(&old, &self.notifier);
        }
        self.changed()
    }

    pub fn domain_axis(&self) -> &ValueAxis { &self.domain_axis }
    pub fn domain_axis_mut(&mut self) -> &mut ValueAxis { &mut self.domain_axis }
    pub fn range_axis(&self) -> &ValueAxis { &self.range_axis }
    pub fn range_axis_mut(&mut self) -> &mut ValueAxis { &mut self.range_axis }

    pub fn set_domain_axis(&mut self, axis: ValueAxis) -> Result<()> {
        adopt(&axis, &self.notifier);
        let old = std::mem::replace(&mut self.domain_axis, axis);
        disown(&old, &self.notifier);
        self.changed()
    }

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

    pub fn annotations(&self) -> &[XyAnnotation] { &self.annotations }

    pub fn annotation_mut(&mut self, index: usize) -> Option<&mut XyAnnotation> {
        self.annotations.get_mut(index)
    }

    pub fn add_annotation(&mut self, annotation: XyAnnotation) -> Result<()> {
        adopt(&annotation, &self.notifier);
        self.annotations.push(annotation);
        self.changed()
    }

    pub fn remove_annotation(&mut self, index: usize) -> Result<XyAnnotation> {
        check_index(index, self.annotations.len())?;
        let removed = self.annotations.remove(index);
        disown(&removed, &self.notifier);
        self.changed()?;
        Ok(removed)
    }

    pub fn clear_annotations(&mut self) -> Result<()> {
        for a in self.annotations.drain(..) {
            disown(&a, &self.notifier);
        }
        self.changed()
    }

    pub fn domain_crosshair(&self) -> &Crosshair { &self.domain_crosshair }
    pub fn domain_crosshair_mut(&mut self) -> &mut Crosshair { &mut self.domain_crosshair }
    pub fn range_crosshair(&self) -> &Crosshair { &self.range_crosshair }
    pub fn range_crosshair_mut(&mut self) -> &mut Crosshair { &mut self.range_crosshair }

    pub fn set_gridlines_visible(&mut self, domain: bool, range: bool) -> Result<()> {
        self.domain_gridlines = domain;
        self.range_gridlines = range;
        self.changed()
    }

    pub fn style(&self) -> &PlotStyle { &self.style }

    pub fn set_style(&mut self, style: PlotStyle) -> Result<()> {
        self.style = style;
        self.changed()
    }

    /// Combined bounds of every bound dataset along `axis`, each measured by
    /// the renderer that draws it.
    pub fn data_range(&self, axis: AxisKind) -> Option<Range> {
        let mut out = None;
        for (i, b) in &self.datasets {
            let Some(r) = self.renderer_for(*i) else { continue };
            let bounds = b.source.with(|d| match axis {
                AxisKind::Domain => r.find_domain_bounds(d),
                AxisKind::Range => r.find_range_bounds(d),
            });
            out = Range::combine(out, bounds);
        }
        out
    }

    pub fn domain_mapping(&self) -> AxisMapping {
        self.domain_axis.mapping(self.data_range(AxisKind::Domain))
    }

    pub fn range_mapping(&self) -> AxisMapping {
        self.range_axis.mapping(self.data_range(AxisKind::Range))
    }

    fn has_data(&self) -> bool {
        self.datasets.values().any(|b| b.source.with(|d| (0..d.series_count()).any(|s| d.item_count(s) > 0)))
    }

    /// Split `area` into axis bands and the data area.
    pub fn data_area(&self, canvas: &dyn Canvas, area: Rect) -> Rect {
        let dm = self.domain_mapping();
        let rm = self.range_mapping();
        self.layout(canvas, area, &dm, &rm)
    }

    fn layout(&self, canvas: &dyn Canvas, area: Rect, dm: &AxisMapping, rm: &AxisMapping) -> Rect {
        let inner = area.shrink(&self.style.insets);
        let (d_edge, r_edge) = (self.orientation.domain_edge(), self.orientation.range_edge());
        let mut edges = [(Edge::Left, 0.0f64), (Edge::Right, 0.0), (Edge::Top, 0.0), (Edge::Bottom, 0.0)];
        for (axis, mapping, edge) in [(&self.domain_axis, dm, d_edge), (&self.range_axis, rm, r_edge)] {
            let length = if edge.is_horizontal() { inner.width() } else { inner.height() };
            let space = axis.reserved_space(canvas, mapping, edge, length);
            for e in edges.iter_mut().filter(|e| e.0 == edge) {
                e.1 += space;
            }
            if !edge.is_horizontal() && axis.is_visible() && !axis.label().is_empty() {
                edges[2].1 = edges[2].1.max(canvas.text_height(axis.label_font()) + 4.0);
            }
        }
        Rect::from_ltrb(inner.left + edges[0].1, inner.top + edges[2].1, inner.right - edges[1].1, inner.bottom - edges[3].1)
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

    /// Draw into `area`; returns the data area.
    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, mut entities: Option<&mut EntityCollection>) -> Rect {
        let dm = self.domain_mapping();
        let rm = self.range_mapping();
        let data_area = self.layout(canvas, area, &dm, &rm);
        self.style.fill_background(canvas, &data_area, theme);
        if let Some(e) = entities.as_deref_mut() {
            e.add(ChartEntity::new(Shape::Rect(data_area), EntityKind::Plot));
        }

        let (d_edge, r_edge) = (self.orientation.domain_edge(), self.orientation.range_edge());
        let grid = Stroke::new(0.5);
        if self.domain_gridlines {
            let (ticks, _) = self.domain_axis.ticks(&dm, axis_length(&data_area, d_edge));
            for v in ticks {
                gridline(canvas, &data_area, dm.to_screen(v, &data_area, d_edge), d_edge, theme, &grid);
            }
        }
        if self.range_gridlines {
            let (ticks, _) = self.range_axis.ticks(&rm, axis_length(&data_area, r_edge));
            for v in ticks {
                gridline(canvas, &data_area, rm.to_screen(v, &data_area, r_edge), r_edge, theme, &grid);
            }
        }

        canvas.clip(data_area);
        if self.has_data() {
            for (i, b) in &self.datasets {
                let Some(r) = self.renderer_for(*i) else { continue };
                let ctx = XyContext { data_area, orientation: self.orientation, domain: dm, range: rm, theme, dataset_index: *i };
                b.source.with(|d| r.draw(canvas, d, &ctx, entities.as_deref_mut()));
            }
        } else {
            self.style.draw_no_data(canvas, &data_area, theme);
        }
        let ctx = XyContext { data_area, orientation: self.orientation, domain: dm, range: rm, theme, dataset_index: 0 };
        for (i, a) in self.annotations.iter().enumerate() {
            a.draw(canvas, &ctx, i, entities.as_deref_mut());
        }
        self.domain_crosshair.draw(canvas, &ctx, true);
        self.range_crosshair.draw(canvas, &ctx, false);
        canvas.reset_clip();

        self.style.stroke_outline(canvas, &data_area, theme);
        self.domain_axis.draw(canvas, &dm, &data_area, d_edge, theme);
        self.range_axis.draw(canvas, &rm, &data_area, r_edge, theme);
        if let Some(e) = entities {
            e.add(ChartEntity::new(Shape::Rect(axis_band(&data_area, &area, d_edge)), EntityKind::DomainAxis));
            e.add(ChartEntity::new(Shape::Rect(axis_band(&data_area, &area, r_edge)), EntityKind::RangeAxis));
        }
        data_area
    }
}

fn axis_length(area: &Rect, edge: Edge) -> f64 {
    if edge.is_horizontal() { area.width() } else { area.height() }
}

/// Gridline across `area` at pixel `px` along the axis on `edge`.
pub(crate) fn gridline(canvas: &mut dyn Canvas, area: &Rect, px: f64, edge: Edge, theme: &Theme, stroke: &Stroke) {
    if !px.is_finite() {
        return;
    }
    let line = if edge.is_horizontal() {
        Shape::line(Point::new(px, area.top), Point::new(px, area.bottom))
    } else {
        Shape::line(Point::new(area.left, px), Point::new(area.right, px))
    };
    canvas.stroke(&line, theme.grid, stroke);
}

/// The band between the data area and the outer plot area on `edge`.
pub(crate) fn axis_band(data_area: &Rect, outer: &Rect, edge: Edge) -> Rect {
    match edge {
        Edge::Bottom => Rect::from_ltrb(data_area.left, data_area.bottom, data_area.right, outer.bottom),
        Edge::Top => Rect::from_ltrb(data_area.left, outer.top, data_area.right, data_area.top),
        Edge::Left => Rect::from_ltrb(outer.left, data_area.top, data_area.left, data_area.bottom),
        Edge::Right => Rect::from_ltrb(data_area.right, data_area.top, outer.right, data_area.bottom),
    }
}

impl Observable for XyPlot {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Plot }
}

impl Clone for XyPlot {
    fn clone(&self) -> Self {
        let mut plot = Self {
            datasets: BTreeMap::new(),
            renderers: self.renderers.clone(),
            domain_axis: self.domain_axis.clone(),
            range_axis: self.range_axis.clone(),
            orientation: self.orientation,
            annotations: self.annotations.clone(),
            domain_crosshair: self.domain_crosshair.clone(),
            range_crosshair: self.range_crosshair.clone(),
            domain_gridlines: self.domain_gridlines,
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

impl PartialEq for XyPlot {
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
            && self.annotations == other.annotations
            && self.domain_crosshair == other.domain_crosshair
            && self.range_crosshair == other.range_crosshair
            && self.domain_gridlines == other.domain_gridlines
            && self.range_gridlines == other.range_gridlines
            && self.style == other.style
    }
}

impl fmt::Debug for XyPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XyPlot")
            .field("id", &self.notifier.id())
            .field("datasets", &self.datasets.keys().collect::<Vec<_>>())
            .field("renderers", &self.renderers)
            .field("orientation", &self.orientation)
            .field("annotations", &self.annotations.len())
            .finish()
    }
}
