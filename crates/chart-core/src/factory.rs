// File: crates/chart-core/src/factory.rs
// Summary: One-call constructors for the common chart kinds.
// Notes:
// - Every chart gets a title (when non-empty) and a legend (when asked for).
// - XY, time series and candlestick charts do not force zero into the range.

use crate::axis::{CategoryAxis, ValueAxis};
use crate::chart::Chart;
use crate::data::{CategoryTable, OhlcSeriesCollection, PieDataset, TaskSeriesCollection, TimeSeriesCollection, ValueDataset, XySeriesCollection};
use crate::error::Result;
use crate::event::Shared;
use crate::geometry::Orientation;
use crate::labels::ToolTipGenerator;
use crate::plot::{CategoryPlot, CategorySource, DialPlot, PiePlot, XyPlot, XySource};
use crate::renderer::{CategoryRenderer, XyRenderer};

/// Axis labels and layout shared by the category and XY factories.
#[derive(Clone, Debug, Default)]
pub struct ChartOptions<'a> {
    pub title: &'a str,
    pub domain_label: &'a str,
    pub range_label: &'a str,
    pub orientation: Orientation,
    pub legend: bool,
    pub tooltips: bool,
}

impl<'a> ChartOptions<'a> {
    pub fn new(title: &'a str, domain_label: &'a str, range_label: &'a str) -> Self {
        Self { title, domain_label, range_label, orientation: Orientation::Vertical, legend: true, tooltips: false }
    }
}

fn category_chart(opts: &ChartOptions, dataset: CategorySource, mut renderer: CategoryRenderer) -> Result<Chart> {
    if opts.tooltips {
        renderer.set_tooltips(Some(ToolTipGenerator::category()))?;
    }
    let mut plot = CategoryPlot::new(Some(dataset), CategoryAxis::new(opts.domain_label), ValueAxis::new(opts.range_label), renderer);
    plot.set_orientation(opts.orientation)?;
    Ok(Chart::with_title(opts.title, plot, opts.legend))
}

pub fn create_line_chart(opts: &ChartOptions, dataset: Shared<CategoryTable>) -> Result<Chart> {
    category_chart(opts, dataset.into(), CategoryRenderer::line())
}

pub fn create_bar_chart(opts: &ChartOptions, dataset: Shared<CategoryTable>) -> Result<Chart> {
    category_chart(opts, dataset.into(), CategoryRenderer::bar())
}

pub fn create_stacked_bar_chart(opts: &ChartOptions, dataset: Shared<CategoryTable>) -> Result<Chart> {
    category_chart(opts, dataset.into(), CategoryRenderer::stacked_bar())
}

pub fn create_area_chart(opts: &ChartOptions, dataset: Shared<CategoryTable>) -> Result<Chart> {
    category_chart(opts, dataset.into(), CategoryRenderer::area())
}

/// Gantt charts plot task spans on a date axis.
pub fn create_gantt_chart(opts: &ChartOptions, dataset: Shared<TaskSeriesCollection>) -> Result<Chart> {
    let mut renderer = CategoryRenderer::gantt();
    if opts.tooltips {
        renderer.set_tooltips(Some(ToolTipGenerator::category()))?;
    }
    let range_axis = ValueAxis::date(opts.range_label);
    let mut plot = CategoryPlot::new(Some(dataset.into()), CategoryAxis::new(opts.domain_label), range_axis, renderer);
    plot.set_orientation(Orientation::Horizontal)?;
    Ok(Chart::with_title(opts.title, plot, opts.legend))
}

pub fn create_pie_chart(title: &str, dataset: Shared<PieDataset>, legend: bool, tooltips: bool) -> Result<Chart> {
    let mut plot = PiePlot::new(Some(dataset));
    if tooltips {
        plot.set_tooltips(Some(ToolTipGenerator::pie()))?;
    }
    Ok(Chart::with_title(title, plot, legend))
}

fn xy_chart(opts: &ChartOptions, dataset: XySource, domain_axis: ValueAxis, mut renderer: XyRenderer) -> Result<Chart> {
    if opts.tooltips {
        renderer.set_tooltips(Some(ToolTipGenerator::xy()))?;
    }
    let mut range_axis = ValueAxis::new(opts.range_label);
    range_axis.set_auto_range_includes_zero(false)?;
    let mut plot = XyPlot::new(Some(dataset), domain_axis, range_axis, renderer);
    plot.set_orientation(opts.orientation)?;
    Ok(Chart::with_title(opts.title, plot, opts.legend))
}

fn number_domain(label: &str) -> Result<ValueAxis> {
    let mut axis = ValueAxis::new(label);
    axis.set_auto_range_includes_zero(false)?;
    Ok(axis)
}

pub fn create_xy_line_chart(opts: &ChartOptions, dataset: Shared<XySeriesCollection>) -> Result<Chart> {
    xy_chart(opts, dataset.into(), number_domain(opts.domain_label)?, XyRenderer::line())
}

pub fn create_scatter_plot(opts: &ChartOptions, dataset: Shared<XySeriesCollection>) -> Result<Chart> {
    xy_chart(opts, dataset.into(), number_domain(opts.domain_label)?, XyRenderer::scatter())
}

pub fn create_xy_step_chart(opts: &ChartOptions, dataset: Shared<XySeriesCollection>) -> Result<Chart> {
    xy_chart(opts, dataset.into(), number_domain(opts.domain_label)?, XyRenderer::step())
}

pub fn create_time_series_chart(opts: &ChartOptions, dataset: Shared<TimeSeriesCollection>) -> Result<Chart> {
    xy_chart(opts, dataset.into(), ValueAxis::date(opts.domain_label), XyRenderer::line())
}

pub fn create_candlestick_chart(opts: &ChartOptions, dataset: Shared<OhlcSeriesCollection>) -> Result<Chart> {
    xy_chart(opts, dataset.into(), ValueAxis::date(opts.domain_label), XyRenderer::candlestick())
}

/// A dial chart never has a legend.
pub fn create_dial_chart(title: &str, dataset: Shared<ValueDataset>) -> Result<Chart> {
    Ok(Chart::with_title(title, DialPlot::new(Some(dataset)), false))
}
