// File: crates/chart-core/tests/render.rs
// Purpose: Drawing through the recording canvas: line gaps, entities, tooltips, pie hit testing and no-data messages.

use chrono::{Duration, NaiveDate};
use freechart_core::canvas::DrawOp;
use freechart_core::data::{CategoryTable, PieDataset, Task, TaskSeries, TaskSeriesCollection, TimeSpan, ValueDataset, XySeries, XySeriesCollection};
use freechart_core::factory::{
    create_area_chart, create_bar_chart, create_dial_chart, create_gantt_chart, create_line_chart, create_pie_chart, create_scatter_plot,
    create_stacked_bar_chart, create_xy_line_chart, create_xy_step_chart,
};
use freechart_core::{
    shared, CategoryRenderer, CategoryRendererKind, Chart, ChartOptions, ChartRenderingInfo, Color, Edge, EntityKind, Point, RecordingCanvas, Rect, Result, Shape, ToolTipGenerator,
    ValueAxis, XyAnnotation, XyPlot, XyRenderer, XyRendererKind,
};

const AREA: Rect = Rect::from_ltwh(0.0, 0.0, 640.0, 480.0);

fn draw(chart: &Chart) -> (RecordingCanvas, ChartRenderingInfo) {
    let mut canvas = RecordingCanvas::new();
    let info = chart.draw(&mut canvas, AREA);
    (canvas, info)
}

fn gappy() -> XySeriesCollection {
    let mut s = XySeries::new("s");
    for (x, y) in [(1.0, Some(1.0)), (2.0, Some(2.0)), (3.0, None), (4.0, Some(4.0)), (5.0, Some(5.0))] {
        s.add(x, y).unwrap();
    }
    XySeriesCollection::with_series(s).unwrap()
}

fn line_plot(data: XySeriesCollection) -> XyPlot {
    XyPlot::new(Some(shared(data).into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line())
}

fn xy_items(info: &ChartRenderingInfo) -> Vec<usize> {
    info.entities
        .iter()
        .filter_map(|e| match e.kind {
            EntityKind::XyItem { item, .. } => Some(item),
            _ => None,
        })
        .collect()
}

#[test]
fn missing_values_break_the_line() {
    let chart = Chart::new(line_plot(gappy()));
    let (canvas, info) = draw(&chart);

    let polylines: Vec<usize> = canvas
        .strokes()
        .filter_map(|(shape, _)| match shape {
            Shape::Polyline(pts) => Some(pts.len()),
            _ => None,
        })
        .collect();
    assert_eq!(polylines, vec![2, 2]);
    assert_eq!(xy_items(&info), vec![0, 1, 3, 4]);
}

#[test]
fn drawing_is_clipped_to_the_data_area() {
    let chart = Chart::new(line_plot(gappy()));
    let (canvas, info) = draw(&chart);
    let clip = canvas.ops.iter().position(|op| matches!(op, DrawOp::Clip(r) if *r == info.data_area));
    let reset = canvas.ops.iter().position(|op| matches!(op, DrawOp::ResetClip));
    assert!(clip.is_some() && reset.is_some() && clip < reset);
    assert!(info.data_area.left >= info.plot_area.left && info.data_area.bottom <= info.plot_area.bottom);
}

#[test]
fn titled_chart_records_every_entity_kind() -> Result<()> {
    let mut plot = line_plot(gappy());
    plot.renderer_mut(0).expect("renderer").set_tooltips(Some(ToolTipGenerator::xy()))?;
    let chart = Chart::with_title("Prices", plot, true);
    let (_, info) = draw(&chart);

    let kinds: Vec<&EntityKind> = info.entities.iter().map(|e| &e.kind).collect();
    for expected in [EntityKind::Title, EntityKind::Plot, EntityKind::DomainAxis, EntityKind::RangeAxis, EntityKind::LegendItem { series: 0 }] {
        assert!(kinds.contains(&&expected), "missing {expected:?}");
    }

    // hit test the second item at its pixel position
    let xy = chart.plot().as_xy().expect("xy plot");
    let px = xy.domain_mapping().to_screen(2.0, &info.data_area, Edge::Bottom);
    let py = xy.range_mapping().to_screen(2.0, &info.data_area, Edge::Left);
    let hit = info.entities.entity_at(Point::new(px, py)).expect("item entity");
    assert_eq!(hit.kind, EntityKind::XyItem { dataset: 0, series: 0, item: 1 });
    assert_eq!(hit.tooltip.as_deref(), Some("s: (2.0, 2.0)"));
    Ok(())
}

#[test]
fn hidden_series_draw_nothing() -> Result<()> {
    let mut plot = line_plot(gappy());
    plot.renderer_mut(0).expect("renderer").set_series_visible(0, Some(false))?;
    let (canvas, info) = draw(&Chart::new(plot));
    assert!(xy_items(&info).is_empty());
    assert!(!canvas.strokes().any(|(s, _)| matches!(s, Shape::Polyline(_))));
    Ok(())
}

#[test]
fn annotations_with_tooltips_become_entities() -> Result<()> {
    let mut plot = line_plot(gappy());
    let mut band = XyAnnotation::rect((1.5, 0.0), (2.5, 3.0), Color::RED.with_alpha(64));
    band.set_tooltip(Some("window".into()))?;
    plot.add_annotation(band)?;
    plot.add_annotation(XyAnnotation::text("peak", (5.0, 5.0)))?;
    let (canvas, info) = draw(&Chart::new(plot));

    let annotations: Vec<_> = info.entities.iter().filter(|e| matches!(e.kind, EntityKind::Annotation { .. })).collect();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].kind, EntityKind::Annotation { index: 0 });
    assert_eq!(annotations[0].tooltip.as_deref(), Some("window"));
    assert!(canvas.texts().any(|t| t == "peak"));
    Ok(())
}

#[test]
fn empty_plots_show_the_no_data_message() -> Result<()> {
    let empty_xy = Chart::new(XyPlot::new(None, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line()));
    let (canvas, _) = draw(&empty_xy);
    assert!(canvas.texts().any(|t| t == "No data to display"));

    let pie = create_pie_chart("Empty", shared(PieDataset::new()), true, false)?;
    let (canvas, info) = draw(&pie);
    assert!(canvas.texts().any(|t| t == "No data to display"));
    assert!(!info.entities.iter().any(|e| matches!(e.kind, EntityKind::PieSection { .. })));

    let dial = create_dial_chart("Dial", shared(ValueDataset::new(None)))?;
    let (canvas, _) = draw(&dial);
    assert!(canvas.texts().any(|t| t == "No data to display"));
    Ok(())
}

fn share() -> PieDataset {
    let mut d = PieDataset::new();
    d.set_value("A", 1.0).unwrap();
    d.set_value("B", 3.0).unwrap();
    d.set_value("C", 0.0).unwrap();
    d.set_value("D", None).unwrap();
    d
}

#[test]
fn pie_sections_skip_empty_values_and_carry_tooltips() -> Result<()> {
    let chart = create_pie_chart("Share", shared(share()), false, true)?;
    let (canvas, info) = draw(&chart);

    let sections: Vec<(usize, String, Option<String>)> = info
        .entities
        .iter()
        .filter_map(|e| match &e.kind {
            EntityKind::PieSection { index, key } => Some((*index, key.clone(), e.tooltip.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        sections,
        vec![(0, "A".to_string(), Some("A = 1.0 (25%)".to_string())), (1, "B".to_string(), Some("B = 3.0 (75%)".to_string()))]
    );
    // wedges are pie arcs; clockwise sections have negative extents
    let arcs: Vec<f64> = canvas
        .fills()
        .filter_map(|(s, _)| match s {
            Shape::Arc { extent_deg, .. } => Some(*extent_deg),
            _ => None,
        })
        .collect();
    assert_eq!(arcs.len(), 2);
    assert!((arcs[0] + 90.0).abs() < 1e-9 && (arcs[1] + 270.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn pie_hit_testing_finds_the_section_under_a_point() -> Result<()> {
    let chart = create_pie_chart("Share", shared(share()), false, false)?;
    let (_, info) = draw(&chart);
    let c = info.data_area.center();

    // A runs clockwise from twelve to three o'clock
    let pie = chart.plot().as_pie().expect("pie plot");
    assert_eq!(pie.section_at(info.plot_area, Point::new(c.x + 10.0, c.y - 10.0), chart.theme()).as_deref(), Some("A"));
    assert_eq!(pie.section_at(info.plot_area, Point::new(c.x - 10.0, c.y + 10.0), chart.theme()).as_deref(), Some("B"));
    assert_eq!(pie.section_at(info.plot_area, Point::new(info.plot_area.left + 1.0, info.plot_area.top + 1.0), chart.theme()), None);

    // legend lists zero values but not missing ones once nulls are ignored
    let mut chart = chart;
    let pie = chart.plot_mut().as_pie_mut().expect("pie plot");
    pie.set_ignore_null_values(true)?;
    let labels: Vec<String> = chart.legend_items().into_iter().map(|i| i.label).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    Ok(())
}

#[test]
fn bars_are_drawn_per_present_value() -> Result<()> {
    let mut table = CategoryTable::new();
    table.add_value(3.0, "Up", "Mon")?;
    table.add_value(1.0, "Down", "Mon")?;
    table.add_value(2.0, "Up", "Tue")?;
    table.add_value(None, "Down", "Tue")?;
    let opts = ChartOptions { tooltips: true, ..ChartOptions::new("Sessions", "Day", "Count") };
    let chart = create_bar_chart(&opts, shared(table))?;
    let (canvas, info) = draw(&chart);

    let items: Vec<(usize, usize)> = info
        .entities
        .iter()
        .filter_map(|e| match e.kind {
            EntityKind::CategoryItem { row, column, .. } => Some((row, column)),
            _ => None,
        })
        .collect();
    assert_eq!(items, vec![(0, 0), (0, 1), (1, 0)]);
    let tip = info.entities.iter().find(|e| e.kind == EntityKind::CategoryItem { dataset: 0, row: 0, column: 1 });
    assert_eq!(tip.and_then(|e| e.tooltip.as_deref()), Some("(Up, Tue) = 2.0"));
    assert!(canvas.texts().any(|t| t == "Mon") && canvas.texts().any(|t| t == "Tue"));
    Ok(())
}

#[test]
fn gantt_tasks_draw_as_horizontal_bars_with_progress() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date").and_hms_opt(0, 0, 0).expect("time");
    let mut series = TaskSeries::new("Scheduled");
    series.add(Task::new("Design", TimeSpan::new(start, start + Duration::days(5))?).with_percent_complete(0.5)?)?;
    series.add(Task::new("Build", TimeSpan::new(start + Duration::days(5), start + Duration::days(12))?))?;
    let mut tasks = TaskSeriesCollection::new();
    tasks.add_series(series)?;

    let opts = ChartOptions { tooltips: true, ..ChartOptions::new("Plan", "Task", "Date") };
    let chart = create_gantt_chart(&opts, shared(tasks))?;
    let (canvas, info) = draw(&chart);

    let bars: Vec<Rect> = info
        .entities
        .iter()
        .filter_map(|e| match (&e.kind, &e.area) {
            (EntityKind::CategoryItem { .. }, Shape::Rect(r)) => Some(*r),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 2);
    // horizontal: later tasks sit lower and start further right
    assert!(bars[1].top > bars[0].top);
    assert!(bars[1].left > bars[0].left);
    let design = info.entities.iter().find(|e| matches!(e.kind, EntityKind::CategoryItem { column: 0, .. })).expect("design bar");
    assert!(design.tooltip.as_deref().is_some_and(|t| t.starts_with("(Scheduled, Design)")));

    // only the task with progress gets the progress strip
    let theme = chart.theme();
    assert_eq!(canvas.fills().filter(|(_, c)| *c == theme.candle_up).count(), 1);
    Ok(())
}

#[test]
fn dial_draws_needle_and_value() -> Result<()> {
    let chart = create_dial_chart("Speed", shared(ValueDataset::new(42.0)))?;
    let (canvas, info) = draw(&chart);
    assert!(canvas.texts().any(|t| t == "42.0"));
    assert!(canvas.fills().any(|(s, _)| matches!(s, Shape::Polygon(p) if p.len() == 3)));
    assert!(chart.legend().is_none());
    assert!(info.entities.iter().any(|e| e.kind == EntityKind::Plot));
    Ok(())
}

#[test]
fn factory_xy_chart_does_not_force_zero() -> Result<()> {
    let mut s = XySeries::new("far");
    s.add(100.0, 50.0)?;
    s.add(200.0, 60.0)?;
    let chart = create_xy_line_chart(&ChartOptions::new("Far", "x", "y"), shared(XySeriesCollection::with_series(s)?))?;
    let xy = chart.plot().as_xy().expect("xy plot");
    assert!(xy.domain_mapping().lower > 90.0);
    assert!(xy.range_mapping().lower > 40.0);
    assert_eq!(chart.title().map(|t| t.text()), Some("Far"));
    Ok(())
}

#[test]
fn factories_pick_the_renderer_for_the_chart_kind() -> Result<()> {
    let opts = ChartOptions::new("", "x", "y");
    let scatter = create_scatter_plot(&opts, shared(gappy()))?;
    let step = create_xy_step_chart(&opts, shared(gappy()))?;
    let kind = |c: &Chart| c.plot().as_xy().and_then(|p| p.renderer(0)).map(|r| r.kind().clone());
    assert_eq!(kind(&scatter), Some(XyRendererKind::Line { lines: false, shapes: true }));
    assert_eq!(kind(&step), Some(XyRendererKind::Step));
    assert!(scatter.title().is_none());

    let table = || -> Result<CategoryTable> {
        let mut t = CategoryTable::new();
        t.add_value(3.0, "Up", "Mon")?;
        t.add_value(1.0, "Down", "Mon")?;
        t.add_value(2.0, "Up", "Tue")?;
        Ok(t)
    };
    let stacked = create_stacked_bar_chart(&opts, shared(table()?))?;
    let plot = stacked.plot().as_category().expect("category plot");
    assert!(matches!(plot.renderer(0).map(|r| r.kind()), Some(CategoryRendererKind::StackedBar { .. })));
    // Mon stacks to 4, plus the upper margin
    assert!((plot.range_mapping().upper - 4.2).abs() < 1e-9);

    let line = create_line_chart(&opts, shared(table()?))?;
    let area = create_area_chart(&opts, shared(table()?))?;
    let ckind = |c: &Chart| c.plot().as_category().and_then(|p| p.renderer(0)).map(|r| r.kind().clone());
    assert_eq!(ckind(&line), Some(CategoryRendererKind::Line { lines: true, shapes: true }));
    assert_eq!(ckind(&area), Some(CategoryRendererKind::Area));
    Ok(())
}

#[test]
fn tooltip_placeholders_in_keys_are_left_alone() -> Result<()> {
    let tips = ToolTipGenerator::category();
    assert_eq!(tips.generate(["Up {1}", "Tue", "2.0"]), "(Up {1}, Tue) = 2.0");
    assert_eq!(ToolTipGenerator::xy().generate(["{2}", "{0}", "{x}"]), "{2}: ({0}, {x})");

    let mut table = CategoryTable::new();
    table.add_value(2.0, "Up {2}", "Tue")?;
    let opts = ChartOptions { tooltips: true, ..ChartOptions::new("Sessions", "Day", "Count") };
    let chart = create_bar_chart(&opts, shared(table))?;
    let (_, info) = draw(&chart);
    let tip = info.entities.iter().find(|e| matches!(e.kind, EntityKind::CategoryItem { .. }));
    assert_eq!(tip.and_then(|e| e.tooltip.as_deref()), Some("(Up {2}, Tue) = 2.0"));
    Ok(())
}

#[test]
fn stacked_bars_skip_values_that_are_not_numbers() -> Result<()> {
    let stack = |first: Option<f64>| -> Result<Vec<(usize, Rect)>> {
        let mut table = CategoryTable::new();
        table.add_value(first, "A", "Mon")?;
        table.add_value(2.0, "B", "Mon")?;
        table.add_value(1.0, "A", "Tue")?;
        let chart = create_stacked_bar_chart(&ChartOptions::new("", "Day", "Count"), shared(table))?;
        let (_, info) = draw(&chart);
        Ok(info
            .entities
            .iter()
            .filter_map(|e| match (&e.kind, &e.area) {
                (EntityKind::CategoryItem { row, .. }, Shape::Rect(r)) => Some((*row, *r)),
                _ => None,
            })
            .collect())
    };
    let with_nan = stack(Some(f64::NAN))?;
    assert_eq!(with_nan, stack(None)?);
    assert_eq!(with_nan.iter().map(|(row, _)| *row).collect::<Vec<_>>(), vec![1, 0]);
    assert!(with_nan.iter().all(|(_, r)| r.width() > 0.0 && r.height() > 0.0));
    Ok(())
}

#[test]
fn renderer_constructors_check_the_kind() {
    assert!(XyRenderer::new(XyRendererKind::Bar { margin: 1.5, base: 0.0 }).is_err());
    assert!(XyRenderer::new(XyRendererKind::Spline { precision: 0, shapes: false }).is_err());
    assert!(XyRenderer::new(XyRendererKind::Candlestick { up: None, down: None, candle_width: Some(-2.0) }).is_err());
    assert!(XyRenderer::new(XyRendererKind::Bar { margin: 0.1, base: 0.0 }).is_ok());

    assert!(CategoryRenderer::new(CategoryRendererKind::StackedBar { maximum_bar_width: 0.0 }).is_err());
    assert!(CategoryRenderer::new(CategoryRendererKind::Gantt { item_margin: 1.0, complete: None, incomplete: None }).is_err());
    let bar = CategoryRenderer::new(CategoryRendererKind::Bar { item_margin: 0.1, maximum_bar_width: 0.5, base: 0.0 });
    assert!(bar.is_ok_and(|r| matches!(r.kind(), CategoryRendererKind::Bar { .. })));
}
