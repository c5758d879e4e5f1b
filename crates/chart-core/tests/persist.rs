// File: crates/chart-core/tests/persist.rs
// Purpose: JSON persistence of datasets, axes, renderers, annotations and themes; rejection of invalid documents; deep copies.

use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use freechart_core::data::{
    CategoryTable, Ohlc, OhlcItem, OhlcSeries, OhlcSeriesCollection, PieDataset, Range, Task, TaskSeries, TaskSeriesCollection, TimePeriod, TimeSeries,
    TimeSeriesCollection, TimeSpan, XySeries, XySeriesCollection,
};
use freechart_core::{
    persist, shared, theme, CategoryRenderer, ChangeEvent, Chart, ChartError, Color, Crosshair, DialScale, Observable, Result, Shared, Theme,
    ToolTipGenerator, UrlGenerator, ValueAxis, XyAnnotation, XyPlot, XyRenderer, XySource,
};

fn collection() -> XySeriesCollection {
    let mut s = XySeries::new("s");
    s.add(1.0, 1.0).unwrap();
    s.add(2.0, None).unwrap();
    s.add(3.0, 9.0).unwrap();
    XySeriesCollection::with_series(s).unwrap()
}

#[test]
fn datasets_survive_a_json_round_trip_without_listeners() -> Result<()> {
    let original = collection();
    original.on_change(|_: &ChangeEvent| Ok(()));

    let loaded: XySeriesCollection = persist::from_json(&persist::to_json(&original)?)?;
    assert_eq!(loaded, original);
    assert_ne!(loaded.id(), original.id());
    assert_eq!(loaded.notifier().listener_count(), 0);
    assert_eq!(loaded.series(0).and_then(|s| s.items().get(1)).and_then(|i| i.y), None);
    Ok(())
}

#[test]
fn time_and_pie_datasets_keep_their_order() -> Result<()> {
    let mut ts = TimeSeries::new("daily");
    ts.add(TimePeriod::Millisecond(5_000), 2.0)?;
    ts.add(TimePeriod::Millisecond(1_000), 1.0)?;
    let mut times = TimeSeriesCollection::new();
    times.add_series(ts)?;
    let loaded: TimeSeriesCollection = persist::from_json(&persist::to_json(&times)?)?;
    assert_eq!(loaded, times);

    let mut pie = PieDataset::new();
    pie.set_value("z", 1.0)?;
    pie.set_value("a", None)?;
    let loaded: PieDataset = persist::from_json(&persist::to_json(&pie)?)?;
    assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    assert_eq!(loaded, pie);
    Ok(())
}

#[test]
fn axes_and_renderers_round_trip() -> Result<()> {
    let mut axis = ValueAxis::log("volume", 10.0)?;
    axis.set_inverted(true)?;
    let loaded: ValueAxis = persist::from_json(&persist::to_json(&axis)?)?;
    assert_eq!(loaded, axis);

    let mut renderer = XyRenderer::step();
    renderer.set_tooltips(Some(ToolTipGenerator::xy()))?;
    renderer.set_urls(Some(UrlGenerator::new("detail.html", "series", "item")))?;
    renderer.set_series_visible(1, Some(false))?;
    let loaded: XyRenderer = persist::from_json(&persist::to_json(&renderer)?)?;
    assert_eq!(loaded, renderer);
    Ok(())
}

#[test]
fn themes_save_and_load_from_disk() -> Result<()> {
    let path = std::env::temp_dir().join(format!("freechart-theme-{}.json", std::process::id()));
    let dark = Theme::dark();
    persist::save_json(&dark, &path)?;
    let loaded: Theme = persist::load_json(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(loaded, dark);
    Ok(())
}

#[test]
fn persistence_errors_are_reported() {
    let bad = persist::from_json::<Theme>("{ not json");
    assert!(matches!(bad, Err(ChartError::Persist(_))));

    let missing = persist::load_json::<Theme>(std::env::temp_dir().join("freechart-does-not-exist.json"));
    assert!(matches!(missing, Err(ChartError::Io(_))));
}

#[test]
fn theme_lookup_is_case_insensitive_with_a_light_fallback() {
    assert_eq!(theme::find("DARK").name, "dark");
    assert_eq!(theme::find("no-such-theme"), Theme::light());
    let names: Vec<String> = theme::presets().into_iter().map(|t| t.name).collect();
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|n| !n.is_empty()));
}

#[test]
fn plot_clone_deep_copies_datasets() -> Result<()> {
    let data = shared(collection());
    let plot = XyPlot::new(Some(data.clone().into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let copy = plot.clone();
    assert_eq!(copy, plot);
    assert_ne!(copy.id(), plot.id());

    match copy.dataset(0) {
        Some(XySource::Series(d)) => assert!(!Shared::ptr_eq(d, &data)),
        other => panic!("unexpected dataset {other:?}"),
    }

    let seen = Rc::new(std::cell::Cell::new(0));
    let s = Rc::clone(&seen);
    copy.on_change(move |_: &ChangeEvent| {
        s.set(s.get() + 1);
        Ok(())
    });
    data.update(|d| d.add(0, 4.0, 16.0))?;
    assert_eq!(seen.get(), 0);
    assert_ne!(copy, plot);
    Ok(())
}

#[test]
fn chart_clone_is_equal_but_independent() -> Result<()> {
    let plot = XyPlot::new(Some(shared(collection()).into()), ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line());
    let chart = Chart::with_title("Copy me", plot, true);
    let mut copy = chart.clone();
    assert_eq!(copy, chart);
    assert_ne!(copy.id(), chart.id());

    copy.set_theme(Theme::dark())?;
    assert_ne!(copy, chart);
    Ok(())
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("date").and_hms_opt(0, 0, 0).expect("time")
}

fn rejected<T: serde::de::DeserializeOwned>(json: &str) -> bool {
    matches!(persist::from_json::<T>(json), Err(ChartError::Persist(_)))
}

#[test]
fn ohlc_gantt_and_category_datasets_round_trip() -> Result<()> {
    let mut prices = OhlcSeries::new("ACME");
    prices.add(OhlcItem::new(TimePeriod::day(2024, 3, 4)?, 10.0, 12.0, 9.5, 11.0)?)?;
    prices.add(OhlcItem::new(TimePeriod::day(2024, 3, 1)?, 9.0, 10.5, 8.0, 10.0)?)?;
    let mut candles = OhlcSeriesCollection::new();
    candles.add_series(prices)?;
    let loaded: OhlcSeriesCollection = persist::from_json(&persist::to_json(&candles)?)?;
    assert_eq!(loaded, candles);

    let mut design = Task::new("Design", TimeSpan::new(start(), start() + Duration::days(5))?).with_percent_complete(0.5)?;
    design.add_subtask(Task::new("Sketch", TimeSpan::new(start(), start() + Duration::days(2))?));
    let mut plan = TaskSeries::new("Scheduled");
    plan.add(design)?;
    plan.add(Task::new("Review", None))?;
    let mut tasks = TaskSeriesCollection::new();
    tasks.add_series(plan)?;
    let loaded: TaskSeriesCollection = persist::from_json(&persist::to_json(&tasks)?)?;
    assert_eq!(loaded, tasks);

    let mut table = CategoryTable::new();
    table.add_value(3.0, "Up", "Mon")?;
    table.add_value(None, "Down", "Mon")?;
    table.add_value(2.0, "Up", "Tue")?;
    let loaded: CategoryTable = persist::from_json(&persist::to_json(&table)?)?;
    assert_eq!(loaded, table);
    Ok(())
}

#[test]
fn overlays_and_category_renderers_round_trip() -> Result<()> {
    let mut note = XyAnnotation::text("peak", (2.0, 4.0));
    note.set_tooltip(Some("highest reading".into()))?;
    let loaded: XyAnnotation = persist::from_json(&persist::to_json(&note)?)?;
    assert_eq!(loaded, note);

    let mut crosshair = Crosshair::new();
    crosshair.set_value(3.5)?;
    crosshair.set_visible(true)?;
    crosshair.set_paint(Some(Color::BLACK))?;
    let loaded: Crosshair = persist::from_json(&persist::to_json(&crosshair)?)?;
    assert_eq!(loaded, crosshair);

    let mut renderer = CategoryRenderer::stacked_bar();
    renderer.set_tooltips(Some(ToolTipGenerator::category()))?;
    renderer.set_series_visible(0, Some(false))?;
    let loaded: CategoryRenderer = persist::from_json(&persist::to_json(&renderer)?)?;
    assert_eq!(loaded, renderer);
    Ok(())
}

#[test]
fn invalid_values_are_rejected_on_load() -> Result<()> {
    assert!(rejected::<Range>(r#"{"lower":5.0,"upper":1.0}"#));
    assert!(rejected::<TimePeriod>(r#"{"Quarter":{"year":2024,"quarter":0}}"#));
    assert!(rejected::<TimePeriod>(r#"{"Hour":{"date":"2024-03-01","hour":24}}"#));
    assert!(rejected::<Ohlc>(r#"{"open":1.0,"high":2.0,"low":1.5,"close":1.2}"#));
    assert!(rejected::<DialScale>(r#"{"lower":10.0,"upper":0.0,"start_angle":225.0,"extent":-270.0,"major_tick_increment":1.0,"minor_tick_count":4}"#));
    assert!(rejected::<TimeSpan>(r#"{"start":"2024-03-05T00:00:00","end":"2024-03-01T00:00:00"}"#));

    let loaded: Range = persist::from_json(r#"{"lower":1.0,"upper":5.0}"#)?;
    assert_eq!(loaded, Range::new(1.0, 5.0)?);
    Ok(())
}

#[test]
fn broken_containers_are_rejected_on_load() -> Result<()> {
    let mut series = XySeriesCollection::new();
    series.add_series(XySeries::new("a"))?;
    series.add_series(XySeries::new("b"))?;
    let json = serde_json::to_string(&series)?;
    let duplicated = json.replace(r#""key":"b""#, r#""key":"a""#);
    assert_ne!(duplicated, json);
    assert!(rejected::<XySeriesCollection>(&duplicated));

    let triangle = XyAnnotation::polygon(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], Color::BLACK)?;
    let json = serde_json::to_string(&triangle)?;
    let segment = json.replace(",[1.0,1.0]]", "]");
    assert_ne!(segment, json);
    assert!(rejected::<XyAnnotation>(&segment));

    let json = serde_json::to_string(&CategoryRenderer::bar())?;
    let wide = json.replace(r#""item_margin":0.2"#, r#""item_margin":1.2"#);
    assert_ne!(wide, json);
    assert!(rejected::<CategoryRenderer>(&wide));

    let task = Task::new("Design", None).with_percent_complete(0.5)?;
    let json = serde_json::to_string(&task)?;
    let overdone = json.replace(r#""percent_complete":0.5"#, r#""percent_complete":1.5"#);
    assert_ne!(overdone, json);
    assert!(rejected::<Task>(&overdone));
    Ok(())
}
