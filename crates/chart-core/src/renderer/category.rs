// File: crates/chart-core/src/renderer/category.rs
// Summary: Category renderer family: bar, stacked bar, line, area and gantt.

use serde::{Deserialize, Serialize};

use crate::axis::CategoryAxis;
use crate::canvas::{Canvas, Shape};
use crate::data::utils::{find_category_range_bounds, find_stacked_range_bounds};
use crate::data::{CategoryDataset, Range};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::{Orientation, Point, Rect};
use crate::labels::{ToolTipGenerator, UrlGenerator};
use crate::legend::LegendItem;
use crate::paint::{Color, Stroke};
use crate::renderer::SeriesAttributes;
use crate::scale::AxisMapping;
use crate::theme::Theme;

const HIT_RADIUS: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CategoryRendererKind {
    /// Side-by-side bars from `base`. `item_margin` is the share of each
    /// category spent on gaps between series; `maximum_bar_width` caps a bar
    /// at that share of the axis length.
    Bar { item_margin: f64, maximum_bar_width: f64, base: f64 },
    /// One bar per category, series stacked; negatives stack below zero.
    StackedBar { maximum_bar_width: f64 },
    /// Lines between category middles. An absent value breaks the line to
    /// both neighbours.
    Line { lines: bool, shapes: bool },
    Area,
    /// Task bars from start to end with a percent-complete strip.
    Gantt { item_margin: f64, complete: Option<Color>, incomplete: Option<Color> },
}

pub struct CategoryContext<'a> {
    pub data_area: Rect,
    pub orientation: Orientation,
    pub domain: &'a CategoryAxis,
    pub range: AxisMapping,
    pub theme: &'a Theme,
    pub dataset_index: usize,
}

impl CategoryContext<'_> {
    fn range_px(&self, v: f64) -> f64 {
        self.range.to_screen(v, &self.data_area, self.orientation.range_edge())
    }

    fn base_px(&self, v: f64) -> f64 {
        self.range_px(v.clamp(self.range.lower, self.range.upper))
    }

    fn domain_length(&self) -> f64 {
        if self.orientation.domain_edge().is_horizontal() { self.data_area.width() } else { self.data_area.height() }
    }

    fn middle(&self, column: usize, columns: usize) -> f64 {
        self.domain.category_middle(column, columns, &self.data_area, self.orientation.domain_edge())
    }

    fn start(&self, column: usize, columns: usize) -> f64 {
        self.domain.category_start(column, columns, &self.data_area, self.orientation.domain_edge())
    }

    fn point(&self, d: f64, r: f64) -> Point {
        self.orientation.point(d, r)
    }

    fn bar(&self, d0: f64, d1: f64, r0: f64, r1: f64) -> Rect {
        Rect::from_points(self.point(d0, r0), self.point(d1, r1))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CategoryRendererRepr")]
pub struct CategoryRenderer {
    kind: CategoryRendererKind,
    attributes: SeriesAttributes,
    tooltips: Option<ToolTipGenerator>,
    urls: Option<UrlGenerator>,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct CategoryRendererRepr {
    kind: CategoryRendererKind,
    attributes: SeriesAttributes,
    tooltips: Option<ToolTipGenerator>,
    urls: Option<UrlGenerator>,
}

impl TryFrom<CategoryRendererRepr> for CategoryRenderer {
    type Error = ChartError;

    fn try_from(r: CategoryRendererRepr) -> Result<Self> {
        let mut renderer = CategoryRenderer::new(r.kind)?;
        renderer.attributes = r.attributes;
        renderer.tooltips = r.tooltips;
        renderer.urls = r.urls;
        Ok(renderer)
    }
}

/// Bar margins lie within 0..1 and bar widths are positive.
fn check_kind(kind: &CategoryRendererKind) -> Result<()> {
    let ok = match kind {
        CategoryRendererKind::Bar { item_margin, maximum_bar_width, .. } => {
            (0.0..1.0).contains(item_margin) && *maximum_bar_width > 0.0
        }
        CategoryRendererKind::StackedBar { maximum_bar_width } => *maximum_bar_width > 0.0,
        CategoryRendererKind::Gantt { item_margin, .. } => (0.0..1.0).contains(item_margin),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(ChartError::invalid("bar margins must be within 0..1 and widths positive"))
    }
}

impl CategoryRenderer {
    pub fn new(kind: CategoryRendererKind) -> Result<Self> {
        check_kind(&kind)?;
        Ok(Self::preset(kind))
    }

    fn preset(kind: CategoryRendererKind) -> Self {
        Self { kind, attributes: SeriesAttributes::default(), tooltips: None, urls: None, notifier: Notifier::new() }
    }

    pub fn bar() -> Self {
        Self::preset(CategoryRendererKind::Bar { item_margin: 0.2, maximum_bar_width: 1.0, base: 0.0 })
    }

    pub fn stacked_bar() -> Self {
        Self::preset(CategoryRendererKind::StackedBar { maximum_bar_width: 1.0 })
    }

    pub fn line() -> Self {
        Self::preset(CategoryRendererKind::Line { lines: true, shapes: true })
    }

    pub fn area() -> Self {
        Self::preset(CategoryRendererKind::Area)
    }

    pub fn gantt() -> Self {
        Self::preset(CategoryRendererKind::Gantt { item_margin: 0.2, complete: None, incomplete: None })
    }

    pub fn kind(&self) -> &CategoryRendererKind { &self.kind }
    pub fn attributes(&self) -> &SeriesAttributes { &self.attributes }
    pub fn tooltips(&self) -> Option<&ToolTipGenerator> { self.tooltips.as_ref() }

    pub fn set_kind(&mut self, kind: CategoryRendererKind) -> Result<()> {
        check_kind(&kind)?;
        self.kind = kind;
        self.notifier.fire(ChangeKind::Renderer)
    }

    pub fn modify_attributes(&mut self, edit: impl FnOnce(&mut SeriesAttributes)) -> Result<()> {
        edit(&mut self.attributes);
        self.notifier.fire(ChangeKind::Renderer)
    }

    pub fn set_series_paint(&mut self, series: usize, paint: Option<Color>) -> Result<()> {
        self.modify_attributes(|a| a.set_paint(series, paint))
    }

    pub fn set_series_visible(&mut self, series: usize, visible: Option<bool>) -> Result<()> {
        self.modify_attributes(|a| a.set_visible(series, visible))
    }

    pub fn set_tooltips(&mut self, tooltips: Option<ToolTipGenerator>) -> Result<()> {
        self.tooltips = tooltips;
        self.notifier.fire(ChangeKind::Renderer)
    }

    pub fn set_urls(&mut self, urls: Option<UrlGenerator>) -> Result<()> {
        self.urls = urls;
        self.notifier.fire(ChangeKind::Renderer)
    }

    /// Value bounds this renderer needs to show `dataset`.
    pub fn find_range_bounds(&self, dataset: &dyn CategoryDataset) -> Option<Range> {
        match self.kind {
            CategoryRendererKind::Bar { base, .. } => {
                find_category_range_bounds(dataset, false).and_then(|r| Range::expand_to_include(Some(r), base))
            }
            CategoryRendererKind::StackedBar { .. } => find_stacked_range_bounds(dataset, 0.0),
            CategoryRendererKind::Area => {
                find_category_range_bounds(dataset, false).and_then(|r| Range::expand_to_include(Some(r), 0.0))
            }
            CategoryRendererKind::Gantt { .. } => find_category_range_bounds(dataset, true),
            CategoryRendererKind::Line { .. } => find_category_range_bounds(dataset, false),
        }
    }

    pub fn legend_items(&self, dataset: &dyn CategoryDataset, theme: &Theme) -> Vec<LegendItem> {
        let (line, shapes) = match self.kind {
            CategoryRendererKind::Line { lines, shapes } => (lines, shapes),
            _ => (false, false),
        };
        (0..dataset.row_count())
            .filter(|r| self.attributes.is_visible_in_legend(*r))
            .map(|r| LegendItem {
                label: dataset.row_key(r).to_string(),
                paint: self.attributes.paint(r, theme),
                marker: shapes.then(|| self.attributes.marker(r)),
                line,
                series: r,
            })
            .collect()
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        mut entities: Option<&mut EntityCollection>,
    ) {
        match &self.kind {
            CategoryRendererKind::Bar { item_margin, maximum_bar_width, base } => {
                self.draw_bars(canvas, dataset, ctx, *item_margin, *maximum_bar_width, *base, entities.as_deref_mut())
            }
            CategoryRendererKind::StackedBar { maximum_bar_width } => {
                self.draw_stacked(canvas, dataset, ctx, *maximum_bar_width, entities.as_deref_mut())
            }
            CategoryRendererKind::Line { lines, shapes } => {
                self.draw_lines(canvas, dataset, ctx, *lines, *shapes, entities.as_deref_mut())
            }
            CategoryRendererKind::Area => self.draw_area(canvas, dataset, ctx, entities.as_deref_mut()),
            CategoryRendererKind::Gantt { item_margin, complete, incomplete } => {
                self.draw_gantt(canvas, dataset, ctx, *item_margin, *complete, *incomplete, entities.as_deref_mut())
            }
        }
    }

    fn add_entity(
        &self,
        entities: Option<&mut EntityCollection>,
        area: Shape,
        dataset: &dyn CategoryDataset,
        row: usize,
        column: usize,
        ctx: &CategoryContext,
    ) {
        let Some(entities) = entities else { return };
        let mut e = ChartEntity::new(area, EntityKind::CategoryItem { dataset: ctx.dataset_index, row, column });
        let (row_key, column_key) = (dataset.row_key(row), dataset.column_key(column));
        if let Some(t) = &self.tooltips {
            let v = t.format_value(dataset.value(row, column));
            e.tooltip = Some(t.generate([row_key, column_key, &v]));
        }
        if let Some(u) = &self.urls {
            e.url = Some(u.generate(row_key, column_key));
        }
        entities.add(e);
    }

    /// Bar thickness shared by every bar: the usable axis length split over
    /// all series slots, capped by `maximum_bar_width`.
    fn bar_width(&self, ctx: &CategoryContext, rows: usize, columns: usize, item_margin: f64, maximum_bar_width: f64) -> f64 {
        let space = ctx.domain_length();
        let axis = ctx.domain;
        let category_margin = if columns > 1 { axis.category_margin() } else { 0.0 };
        let item_margin = if rows > 1 { item_margin } else { 0.0 };
        let used = space * (1.0 - axis.lower_margin() - axis.upper_margin() - category_margin - item_margin);
        let slots = (rows * columns).max(1) as f64;
        (used / slots).min(space * maximum_bar_width)
    }

    /// Domain pixel where the bar of `row` in `column` starts.
    #[allow(clippy::too_many_arguments)]
    fn bar_start(&self, ctx: &CategoryContext, row: usize, rows: usize, column: usize, columns: usize, item_margin: f64, width: f64) -> f64 {
        if rows <= 1 {
            return ctx.middle(column, columns) - width / 2.0;
        }
        let space = ctx.domain_length();
        let axis = ctx.domain;
        let mut factor = 1.0 - item_margin - axis.lower_margin() - axis.upper_margin();
        if columns > 1 {
            factor -= axis.category_margin();
        }
        let series_w = space * factor / (columns * rows) as f64;
        let series_gap = space * item_margin / (columns * (rows - 1)) as f64;
        ctx.start(column, columns) + row as f64 * (series_w + series_gap) + series_w / 2.0 - width / 2.0
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bars(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        item_margin: f64,
        maximum_bar_width: f64,
        base: f64,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let (rows, columns) = (dataset.row_count(), dataset.column_count());
        let width = self.bar_width(ctx, rows, columns, item_margin, maximum_bar_width);
        let base_px = ctx.base_px(base);
        for row in (0..rows).filter(|r| self.attributes.is_visible(*r)) {
            let fill = self.attributes.fill_paint(row, ctx.theme);
            for column in 0..columns {
                let Some(v) = dataset.value(row, column) else { continue };
                let r = ctx.range_px(v);
                if !r.is_finite() {
                    continue;
                }
                let d0 = self.bar_start(ctx, row, rows, column, columns, item_margin, width);
                let bar = ctx.bar(d0, d0 + width, base_px, r);
                canvas.fill(&Shape::Rect(bar), fill);
                self.add_entity(entities.as_deref_mut(), Shape::Rect(bar), dataset, row, column, ctx);
            }
        }
    }

    fn draw_stacked(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        maximum_bar_width: f64,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let (rows, columns) = (dataset.row_count(), dataset.column_count());
        let width = self.bar_width(ctx, 1, columns, 0.0, maximum_bar_width);
        for column in 0..columns {
            let d0 = ctx.middle(column, columns) - width / 2.0;
            let (mut positive, mut negative) = (0.0f64, 0.0f64);
            for row in 0..rows {
                let Some(v) = dataset.value(row, column).filter(|v| v.is_finite()) else { continue };
                let (from, to) = if v >= 0.0 {
                    positive += v;
                    (positive - v, positive)
                } else {
                    negative += v;
                    (negative - v, negative)
                };
                if !self.attributes.is_visible(row) {
                    continue;
                }
                let (r0, r1) = (ctx.base_px(from), ctx.base_px(to));
                if !(r0.is_finite() && r1.is_finite()) {
                    continue;
                }
                let bar = ctx.bar(d0, d0 + width, r0, r1);
                canvas.fill(&Shape::Rect(bar), self.attributes.fill_paint(row, ctx.theme));
                self.add_entity(entities.as_deref_mut(), Shape::Rect(bar), dataset, row, column, ctx);
            }
        }
    }

    fn draw_lines(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        lines: bool,
        shapes: bool,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let (rows, columns) = (dataset.row_count(), dataset.column_count());
        for row in (0..rows).filter(|r| self.attributes.is_visible(*r)) {
            let paint = self.attributes.paint(row, ctx.theme);
            let stroke = self.attributes.stroke(row);
            let marker = self.attributes.marker(row);
            let placed: Vec<Option<Point>> = (0..columns)
                .map(|c| {
                    let r = ctx.range_px(dataset.value(row, c)?);
                    r.is_finite().then(|| ctx.point(ctx.middle(c, columns), r))
                })
                .collect();
            if lines {
                for w in placed.windows(2) {
                    if let (Some(a), Some(b)) = (w[0], w[1]) {
                        canvas.stroke(&Shape::line(a, b), paint, stroke);
                    }
                }
            }
            for (column, p) in placed.iter().enumerate() {
                let Some(p) = *p else { continue };
                let hit = if shapes {
                    let shape = marker.at(p, self.attributes.marker_size);
                    canvas.fill(&shape, paint);
                    shape
                } else {
                    Shape::Ellipse(Rect::from_ltrb(p.x - HIT_RADIUS, p.y - HIT_RADIUS, p.x + HIT_RADIUS, p.y + HIT_RADIUS))
                };
                self.add_entity(entities.as_deref_mut(), hit, dataset, row, column, ctx);
            }
        }
    }

    fn draw_area(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let (rows, columns) = (dataset.row_count(), dataset.column_count());
        let zero = ctx.base_px(0.0);
        for row in (0..rows).filter(|r| self.attributes.is_visible(*r)) {
            let fill = self.attributes.fill_paint(row, ctx.theme);
            let mut run: Vec<(f64, f64)> = Vec::new();
            for column in 0..columns {
                let r = dataset.value(row, column).map(|v| ctx.range_px(v)).filter(|r| r.is_finite());
                match r {
                    Some(r) => {
                        let d = ctx.middle(column, columns);
                        run.push((d, r));
                        let p = ctx.point(d, r);
                        let hit = Shape::Ellipse(Rect::from_ltrb(p.x - HIT_RADIUS, p.y - HIT_RADIUS, p.x + HIT_RADIUS, p.y + HIT_RADIUS));
                        self.add_entity(entities.as_deref_mut(), hit, dataset, row, column, ctx);
                    }
                    None => fill_area_run(canvas, ctx, &mut run, zero, fill),
                }
            }
            fill_area_run(canvas, ctx, &mut run, zero, fill);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_gantt(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn CategoryDataset,
        ctx: &CategoryContext,
        item_margin: f64,
        complete: Option<Color>,
        incomplete: Option<Color>,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let (rows, columns) = (dataset.row_count(), dataset.column_count());
        let width = self.bar_width(ctx, rows, columns, item_margin, 1.0);
        let complete = complete.unwrap_or(ctx.theme.candle_up);
        let incomplete = incomplete.unwrap_or(ctx.theme.candle_down);
        for row in (0..rows).filter(|r| self.attributes.is_visible(*r)) {
            let fill = self.attributes.fill_paint(row, ctx.theme);
            for column in 0..columns {
                let Some((start, end)) = dataset.interval(row, column) else { continue };
                let (r0, r1) = (ctx.range_px(start), ctx.range_px(end));
                if !(r0.is_finite() && r1.is_finite()) {
                    continue;
                }
                let d0 = self.bar_start(ctx, row, rows, column, columns, item_margin, width);
                let bar = ctx.bar(d0, d0 + width, r0, r1);
                canvas.fill(&Shape::Rect(bar), fill);
                if let Some(p) = dataset.percent_complete(row, column) {
                    // strip through the middle third of the bar
                    let (s0, s1) = (d0 + width * 0.35, d0 + width * 0.65);
                    let split = r0 + (r1 - r0) * p.clamp(0.0, 1.0);
                    canvas.fill(&Shape::Rect(ctx.bar(s0, s1, r0, split)), complete);
                    canvas.fill(&Shape::Rect(ctx.bar(s0, s1, split, r1)), incomplete);
                }
                canvas.stroke(&Shape::Rect(bar), ctx.theme.outline, &Stroke::new(0.5));
                self.add_entity(entities.as_deref_mut(), Shape::Rect(bar), dataset, row, column, ctx);
            }
        }
    }
}

/// Fill the polygon between a run of (domain px, range px) points and the
/// zero line, then start a new run.
fn fill_area_run(canvas: &mut dyn Canvas, ctx: &CategoryContext, run: &mut Vec<(f64, f64)>, zero: f64, fill: Color) {
    if run.len() > 1 {
        let mut pts = vec![ctx.point(run[0].0, zero)];
        pts.extend(run.iter().map(|(d, r)| ctx.point(*d, *r)));
        pts.push(ctx.point(run[run.len() - 1].0, zero));
        canvas.fill(&Shape::Polygon(pts), fill);
    }
    run.clear();
}

impl Observable for CategoryRenderer {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Renderer }
}
