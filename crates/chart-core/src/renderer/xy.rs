// File: crates/chart-core/src/renderer/xy.rs
// Summary: XY renderer family: line/shape, step, area, bar, candlestick, spline and sampling.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape};
use crate::data::utils::{find_domain_bounds, find_ohlc_range_bounds, find_range_bounds};
use crate::data::{Range, XyDataset};
use crate::downsample::lttb_indices;
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::{Orientation, Point, Rect};
use crate::labels::{ToolTipGenerator, UrlGenerator};
use crate::legend::LegendItem;
use crate::paint::{Color, Stroke};
use crate::renderer::spline::natural_cubic;
use crate::renderer::SeriesAttributes;
use crate::scale::AxisMapping;
use crate::theme::Theme;

/// Pixel radius of the hit area around points drawn without a marker.
const HIT_RADIUS: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum XyRendererKind {
    /// Lines between consecutive items and/or a marker per item. An absent
    /// value breaks the line.
    Line { lines: bool, shapes: bool },
    /// Horizontal then vertical segments between consecutive items.
    Step,
    /// Filled area between the line and zero.
    Area,
    /// Bars across each item's x interval from `base` to y. `margin` is the
    /// share of the bar width left empty.
    Bar { margin: f64, base: f64 },
    /// OHLC candles. `None` paints come from the theme; `None` width is
    /// derived from the item spacing.
    Candlestick { up: Option<Color>, down: Option<Color>, candle_width: Option<f64> },
    /// Natural cubic spline with `precision` samples per segment.
    Spline { precision: usize, shapes: bool },
    /// Line reduced with LTTB when there are more items than pixels.
    Sampling,
}

/// Everything an XY renderer needs to place items for one draw.
pub struct XyContext<'a> {
    pub data_area: Rect,
    pub orientation: Orientation,
    pub domain: AxisMapping,
    pub range: AxisMapping,
    pub theme: &'a Theme,
    pub dataset_index: usize,
}

impl XyContext<'_> {
    pub(crate) fn domain_px(&self, x: f64) -> f64 {
        self.domain.to_screen(x, &self.data_area, self.orientation.domain_edge())
    }

    pub(crate) fn range_px(&self, y: f64) -> f64 {
        self.range.to_screen(y, &self.data_area, self.orientation.range_edge())
    }

    /// (domain px, range px), or `None` when the item cannot be placed.
    fn place(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (d, r) = (self.domain_px(x), self.range_px(y));
        (d.is_finite() && r.is_finite()).then_some((d, r))
    }

    pub(crate) fn point(&self, d: f64, r: f64) -> Point {
        self.orientation.point(d, r)
    }

    /// Range pixel of `value` clamped into the visible range.
    fn base_px(&self, value: f64) -> f64 {
        let v = value.clamp(self.range.lower, self.range.upper);
        self.range_px(v)
    }

    fn domain_length(&self) -> f64 {
        if self.orientation.domain_edge().is_horizontal() { self.data_area.width() } else { self.data_area.height() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "XyRendererRepr")]
pub struct XyRenderer {
    kind: XyRendererKind,
    attributes: SeriesAttributes,
    tooltips: Option<ToolTipGenerator>,
    urls: Option<UrlGenerator>,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct XyRendererRepr {
    kind: XyRendererKind,
    attributes: SeriesAttributes,
    tooltips: Option<ToolTipGenerator>,
    urls: Option<UrlGenerator>,
}

impl TryFrom<XyRendererRepr> for XyRenderer {
    type Error = ChartError;

    fn try_from(r: XyRendererRepr) -> Result<Self> {
        let mut renderer = XyRenderer::new(r.kind)?;
        renderer.attributes = r.attributes;
        renderer.tooltips = r.tooltips;
        renderer.urls = r.urls;
        Ok(renderer)
    }
}

fn check_kind(kind: &XyRendererKind) -> Result<()> {
    match kind {
        XyRendererKind::Bar { margin, .. } if !(0.0..1.0).contains(margin) => {
            Err(ChartError::invalid("bar margin must be within 0..1"))
        }
        XyRendererKind::Spline { precision: 0, .. } => Err(ChartError::invalid("spline precision must be positive")),
        XyRendererKind::Candlestick { candle_width: Some(w), .. } if !(*w > 0.0) => {
            Err(ChartError::invalid("candle width must be positive"))
        }
        _ => Ok(()),
    }
}

impl XyRenderer {
    pub fn new(kind: XyRendererKind) -> Result<Self> {
        check_kind(&kind)?;
        Ok(Self::preset(kind))
    }

    fn preset(kind: XyRendererKind) -> Self {
        Self { kind, attributes: SeriesAttributes::default(), tooltips: None, urls: None, notifier: Notifier::new() }
    }

    pub fn line() -> Self { Self::preset(XyRendererKind::Line { lines: true, shapes: false }) }
    pub fn line_and_shapes() -> Self { Self::preset(XyRendererKind::Line { lines: true, shapes: true }) }
    pub fn scatter() -> Self { Self::preset(XyRendererKind::Line { lines: false, shapes: true }) }
    pub fn step() -> Self { Self::preset(XyRendererKind::Step) }
    pub fn area() -> Self { Self::preset(XyRendererKind::Area) }
    pub fn bar() -> Self { Self::preset(XyRendererKind::Bar { margin: 0.0, base: 0.0 }) }
    pub fn spline() -> Self { Self::preset(XyRendererKind::Spline { precision: 5, shapes: true }) }
    pub fn sampling() -> Self { Self::preset(XyRendererKind::Sampling) }

    pub fn candlestick() -> Self {
        Self::preset(XyRendererKind::Candlestick { up: None, down: None, candle_width: None })
    }

    pub fn kind(&self) -> &XyRendererKind { &self.kind }
    pub fn attributes(&self) -> &SeriesAttributes { &self.attributes }
    pub fn tooltips(&self) -> Option<&ToolTipGenerator> { self.tooltips.as_ref() }
    pub fn urls(&self) -> Option<&UrlGenerator> { self.urls.as_ref() }

    pub fn set_kind(&mut self, kind: XyRendererKind) -> Result<()> {
        check_kind(&kind)?;
        self.kind = kind;
        self.notifier.fire(ChangeKind::Renderer)
    }

    /// Edit the series attributes and fire a single event afterwards.
    pub fn modify_attributes(&mut self, edit: impl FnOnce(&mut SeriesAttributes)) -> Result<()> {
        edit(&mut self.attributes);
        self.notifier.fire(ChangeKind::Renderer)
    }

    pub fn set_series_paint(&mut self, series: usize, paint: Option<Color>) -> Result<()> {
        self.modify_attributes(|a| a.set_paint(series, paint))
    }

    pub fn set_series_stroke(&mut self, series: usize, stroke: Option<Stroke>) -> Result<()> {
        self.modify_attributes(|a| a.set_stroke(series, stroke))
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

    /// X bounds this renderer needs to show `dataset`.
    pub fn find_domain_bounds(&self, dataset: &dyn XyDataset) -> Option<Range> {
        let interval = matches!(self.kind, XyRendererKind::Bar { .. } | XyRendererKind::Candlestick { .. });
        find_domain_bounds(dataset, interval)
    }

    /// Y bounds this renderer needs to show `dataset`.
    pub fn find_range_bounds(&self, dataset: &dyn XyDataset) -> Option<Range> {
        match self.kind {
            XyRendererKind::Candlestick { .. } => find_ohlc_range_bounds(dataset),
            XyRendererKind::Bar { base, .. } => {
                find_range_bounds(dataset, true).map(|r| Range::expand_to_include(Some(r), base).unwrap_or(r))
            }
            XyRendererKind::Area => find_range_bounds(dataset, false).and_then(|r| Range::expand_to_include(Some(r), 0.0)),
            _ => find_range_bounds(dataset, false),
        }
    }

    pub fn legend_items(&self, dataset: &dyn XyDataset, theme: &Theme) -> Vec<LegendItem> {
        let line = matches!(
            self.kind,
            XyRendererKind::Line { lines: true, .. } | XyRendererKind::Step | XyRendererKind::Spline { .. } | XyRendererKind::Sampling
        );
        let marker = match self.kind {
            XyRendererKind::Line { shapes: true, .. } | XyRendererKind::Spline { shapes: true, .. } => true,
            _ => false,
        };
        (0..dataset.series_count())
            .filter(|s| self.attributes.is_visible_in_legend(*s))
            .map(|s| LegendItem {
                label: dataset.series_key(s).to_string(),
                paint: self.attributes.paint(s, theme),
                marker: marker.then(|| self.attributes.marker(s)),
                line,
                series: s,
            })
            .collect()
    }

    /// Draw every visible series of `dataset`. Entities are added when a
    /// collection is supplied.
    pub fn draw(&self, canvas: &mut dyn Canvas, dataset: &dyn XyDataset, ctx: &XyContext, mut entities: Option<&mut EntityCollection>) {
        for series in 0..dataset.series_count() {
            if !self.attributes.is_visible(series) {
                continue;
            }
            let ents = entities.as_deref_mut();
            match &self.kind {
                XyRendererKind::Line { lines, shapes } => self.draw_line(canvas, dataset, series, ctx, *lines, *shapes, ents),
                XyRendererKind::Step => self.draw_step(canvas, dataset, series, ctx, ents),
                XyRendererKind::Area => self.draw_area(canvas, dataset, series, ctx, ents),
                XyRendererKind::Bar { margin, base } => self.draw_bars(canvas, dataset, series, ctx, *margin, *base, ents),
                XyRendererKind::Candlestick { up, down, candle_width } => {
                    self.draw_candles(canvas, dataset, series, ctx, *up, *down, *candle_width, ents)
                }
                XyRendererKind::Spline { precision, shapes } => {
                    self.draw_spline(canvas, dataset, series, ctx, *precision, *shapes, ents)
                }
                XyRendererKind::Sampling => self.draw_sampled(canvas, dataset, series, ctx, ents),
            }
        }
    }

    /// Runs of consecutive placeable items as (item index, domain px, range px).
    fn runs(&self, dataset: &dyn XyDataset, series: usize, ctx: &XyContext) -> Vec<Vec<(usize, f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        let mut skipped = 0usize;
        for item in 0..dataset.item_count(series) {
            let placed = dataset.y(series, item).and_then(|y| {
                let p = ctx.place(dataset.x(series, item), y);
                if p.is_none() {
                    skipped += 1;
                }
                p
            });
            match placed {
                Some((d, r)) => current.push((item, d, r)),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        if skipped > 0 {
            warn!("skipped {} items of series '{}' that cannot be placed on the axes", skipped, dataset.series_key(series));
        }
        runs
    }

    fn add_entity(
        &self,
        entities: Option<&mut EntityCollection>,
        area: Shape,
        dataset: &dyn XyDataset,
        series: usize,
        item: usize,
        ctx: &XyContext,
    ) {
        let Some(entities) = entities else { return };
        let mut e = ChartEntity::new(area, EntityKind::XyItem { dataset: ctx.dataset_index, series, item });
        let key = dataset.series_key(series);
        if let Some(t) = &self.tooltips {
            let x = t.format_value(Some(dataset.x(series, item)));
            let y = t.format_value(dataset.y(series, item));
            e.tooltip = Some(t.generate([key, &x, &y]));
        }
        if let Some(u) = &self.urls {
            e.url = Some(u.generate(key, &item.to_string()));
        }
        entities.add(e);
    }

    fn point_hit(&self, p: Point) -> Shape {
        Shape::Ellipse(Rect::from_ltrb(p.x - HIT_RADIUS, p.y - HIT_RADIUS, p.x + HIT_RADIUS, p.y + HIT_RADIUS))
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        lines: bool,
        shapes: bool,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let paint = self.attributes.paint(series, ctx.theme);
        let stroke = self.attributes.stroke(series);
        let marker = self.attributes.marker(series);
        for run in self.runs(dataset, series, ctx) {
            if lines && run.len() > 1 {
                let pts = run.iter().map(|(_, d, r)| ctx.point(*d, *r)).collect();
                canvas.stroke(&Shape::Polyline(pts), paint, stroke);
            }
            for (item, d, r) in run {
                let p = ctx.point(d, r);
                let hit = if shapes {
                    let shape = marker.at(p, self.attributes.marker_size);
                    canvas.fill(&shape, paint);
                    shape
                } else {
                    self.point_hit(p)
                };
                self.add_entity(entities.as_deref_mut(), hit, dataset, series, item, ctx);
            }
        }
    }

    fn draw_step(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let paint = self.attributes.paint(series, ctx.theme);
        let stroke = self.attributes.stroke(series);
        for run in self.runs(dataset, series, ctx) {
            if run.len() > 1 {
                let mut pts = Vec::with_capacity(run.len() * 2);
                pts.push(ctx.point(run[0].1, run[0].2));
                for w in run.windows(2) {
                    pts.push(ctx.point(w[1].1, w[0].2));
                    pts.push(ctx.point(w[1].1, w[1].2));
                }
                canvas.stroke(&Shape::Polyline(pts), paint, stroke);
            }
            for (item, d, r) in run {
                self.add_entity(entities.as_deref_mut(), self.point_hit(ctx.point(d, r)), dataset, series, item, ctx);
            }
        }
    }

    fn draw_area(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let fill = self.attributes.fill_paint(series, ctx.theme);
        let zero = ctx.base_px(0.0);
        for run in self.runs(dataset, series, ctx) {
            let (first, last) = (run[0].1, run[run.len() - 1].1);
            let mut pts = Vec::with_capacity(run.len() + 2);
            pts.push(ctx.point(first, zero));
            pts.extend(run.iter().map(|(_, d, r)| ctx.point(*d, *r)));
            pts.push(ctx.point(last, zero));
            canvas.fill(&Shape::Polygon(pts), fill);
            for (item, d, r) in run {
                self.add_entity(entities.as_deref_mut(), self.point_hit(ctx.point(d, r)), dataset, series, item, ctx);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bars(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        margin: f64,
        base: f64,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let fill = self.attributes.fill_paint(series, ctx.theme);
        let base_px = ctx.base_px(base);
        for item in 0..dataset.item_count(series) {
            let Some(y) = dataset.y(series, item) else { continue };
            let d0 = ctx.domain_px(dataset.start_x(series, item));
            let d1 = ctx.domain_px(dataset.end_x(series, item));
            let r = ctx.range_px(y);
            if !(d0.is_finite() && d1.is_finite() && r.is_finite()) {
                continue;
            }
            let (lo, hi) = (d0.min(d1), d0.max(d1));
            let cut = (hi - lo) * margin;
            let (lo, hi) = (lo + cut / 2.0, hi - cut / 2.0);
            let bar = Rect::from_points(ctx.point(lo, base_px), ctx.point(hi, r));
            canvas.fill(&Shape::Rect(bar), fill);
            self.add_entity(entities.as_deref_mut(), Shape::Rect(bar), dataset, series, item, ctx);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_candles(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        up: Option<Color>,
        down: Option<Color>,
        candle_width: Option<f64>,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let up = up.unwrap_or(ctx.theme.candle_up);
        let down = down.unwrap_or(ctx.theme.candle_down);
        let count = dataset.item_count(series);
        let centers: Vec<f64> = (0..count).map(|i| ctx.domain_px(dataset.x(series, i))).collect();
        let width = candle_width.unwrap_or_else(|| auto_candle_width(&centers, ctx.domain_length()));
        let wick = Stroke::new(1.0);
        for (item, &c) in centers.iter().enumerate() {
            let Some(v) = dataset.ohlc(series, item) else { continue };
            if !c.is_finite() {
                continue;
            }
            let (o, h, l, cl) = (ctx.range_px(v.open), ctx.range_px(v.high), ctx.range_px(v.low), ctx.range_px(v.close));
            if ![o, h, l, cl].iter().all(|p| p.is_finite()) {
                continue;
            }
            let color = if v.is_up() { up } else { down };
            canvas.stroke(&Shape::line(ctx.point(c, h), ctx.point(c, l)), color, &wick);
            let body = Rect::from_points(ctx.point(c - width / 2.0, o), ctx.point(c + width / 2.0, cl));
            if (o - cl).abs() < 1.0 {
                canvas.stroke(&Shape::line(ctx.point(c - width / 2.0, o), ctx.point(c + width / 2.0, o)), color, &wick);
            } else {
                canvas.fill(&Shape::Rect(body), color);
            }
            let hit = Rect::from_points(ctx.point(c - width / 2.0, h), ctx.point(c + width / 2.0, l));
            self.add_entity(entities.as_deref_mut(), Shape::Rect(hit), dataset, series, item, ctx);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_spline(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        precision: usize,
        shapes: bool,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let paint = self.attributes.paint(series, ctx.theme);
        let stroke = self.attributes.stroke(series);
        let marker = self.attributes.marker(series);
        for run in self.runs(dataset, series, ctx) {
            if run.len() > 1 {
                let screen: Vec<(f64, f64)> = run.iter().map(|(_, d, r)| (*d, *r)).collect();
                // the spline runs along the domain; a reversed domain is sampled backwards
                let reversed = screen[0].0 > screen[screen.len() - 1].0;
                let mut along = screen.clone();
                if reversed {
                    along.reverse();
                }
                let curve = natural_cubic(&along, precision).unwrap_or(along);
                let pts = curve.iter().map(|(d, r)| ctx.point(*d, *r)).collect();
                canvas.stroke(&Shape::Polyline(pts), paint, stroke);
            }
            for (item, d, r) in run {
                let p = ctx.point(d, r);
                let hit = if shapes {
                    let shape = marker.at(p, self.attributes.marker_size);
                    canvas.fill(&shape, paint);
                    shape
                } else {
                    self.point_hit(p)
                };
                self.add_entity(entities.as_deref_mut(), hit, dataset, series, item, ctx);
            }
        }
    }

    fn draw_sampled(
        &self,
        canvas: &mut dyn Canvas,
        dataset: &dyn XyDataset,
        series: usize,
        ctx: &XyContext,
        mut entities: Option<&mut EntityCollection>,
    ) {
        let paint = self.attributes.paint(series, ctx.theme);
        let stroke = self.attributes.stroke(series);
        let runs = self.runs(dataset, series, ctx);
        let total: usize = runs.iter().map(Vec::len).sum();
        let budget = ctx.domain_length().max(2.0) as usize;
        for run in runs {
            let screen: Vec<(f64, f64)> = run.iter().map(|(_, d, r)| (*d, *r)).collect();
            let keep = if total > budget { (budget * run.len() / total.max(1)).max(2) } else { run.len() };
            let picked = lttb_indices(&screen, keep);
            if picked.len() > 1 {
                let pts = picked.iter().map(|&i| ctx.point(screen[i].0, screen[i].1)).collect();
                canvas.stroke(&Shape::Polyline(pts), paint, stroke);
            }
            for i in picked {
                let (item, d, r) = run[i];
                self.add_entity(entities.as_deref_mut(), self.point_hit(ctx.point(d, r)), dataset, series, item, ctx);
            }
        }
    }
}

impl Observable for XyRenderer {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Renderer }
}

/// 70% of the smallest spacing between candle centers, within 1..=24 px.
fn auto_candle_width(centers: &[f64], domain_length: f64) -> f64 {
    let mut sorted: Vec<f64> = centers.iter().copied().filter(|c| c.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let gap = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|g| *g > 0.0)
        .reduce(f64::min)
        .unwrap_or(domain_length * 0.05);
    (gap * 0.7).clamp(1.0, 24.0)
}
