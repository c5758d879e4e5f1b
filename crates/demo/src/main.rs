// File: crates/demo/src/main.rs
// Summary: Demo loads OHLC rows from CSV (or synthesizes them) and renders one PNG per chart kind.
// Usage: freechart-demo [csv-path] [--theme name|path.json] [--out dir]

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use freechart_core::data::{
    CategoryTable, OhlcItem, OhlcSeries, OhlcSeriesCollection, PieDataset, Task, TaskSeries, TaskSeriesCollection, TimePeriod,
    TimeSeries, TimeSeriesCollection, TimeSpan, ValueDataset,
};
use freechart_core::factory::{
    create_bar_chart, create_candlestick_chart, create_dial_chart, create_gantt_chart, create_pie_chart, create_time_series_chart,
};
use freechart_core::{persist, shared, theme, Chart, ChartOptions, Theme, XyRenderer};
use freechart_render_skia::{render_to_png, RenderOptions};
use log::{info, warn};
use std::path::{Path, PathBuf};

struct Args {
    input: Option<PathBuf>,
    theme: Theme,
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args(std::env::args().skip(1))?;

    let rows = match &args.input {
        Some(raw) => {
            let (path, used_alt) = resolve_path(raw)?;
            info!("using input file {}", path.display());
            if used_alt {
                info!("  (extension swapped between .csv/.cvs)");
            }
            load_ohlc_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
        None => {
            info!("no input file; using synthetic prices");
            synthetic_rows(240)
        }
    };
    if rows.is_empty() {
        bail!("no candles loaded; check headers/delimiter.");
    }
    info!("loaded {} candles", rows.len());

    let opts = RenderOptions::default();
    for (name, mut chart) in build_charts(&rows)? {
        chart.set_theme(args.theme.clone())?;
        let out = args.out.join(format!("chart_{name}.png"));
        let info = render_to_png(&chart, &opts, &out)?;
        info!("wrote {} ({} entities)", out.display(), info.entities.len());
    }
    Ok(())
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args { input: None, theme: Theme::dark(), out: PathBuf::from("target/out") };
    while let Some(a) = it.next() {
        match a.as_str() {
            "--theme" => {
                let v = it.next().context("--theme needs a name or a JSON file")?;
                args.theme = if v.ends_with(".json") {
                    persist::load_json(&v).with_context(|| format!("loading theme {v}"))?
                } else {
                    theme::find(&v)
                };
            }
            "--out" => args.out = PathBuf::from(it.next().context("--out needs a directory")?),
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => args.input = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

/// One parsed CSV row.
#[derive(Clone, Copy, Debug)]
struct Row {
    period: TimePeriod,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

fn build_charts(rows: &[Row]) -> Result<Vec<(&'static str, Chart)>> {
    let mut charts = Vec::new();

    // 1) Candlesticks
    let mut ohlc = OhlcSeries::new("Price");
    for r in rows {
        match OhlcItem::new(r.period, r.open, r.high, r.low, r.close) {
            Ok(item) => ohlc.add(item)?,
            Err(e) => warn!("skipping row at {:?}: {e}", r.period),
        }
    }
    let bucket = rows.len().div_ceil(1500).max(1);
    let mut candles = OhlcSeriesCollection::new();
    candles.add_series(ohlc.aggregate(bucket))?;
    charts.push(("candles", create_candlestick_chart(&ChartOptions::new("Candles", "Time", "Price"), shared(candles))?));

    // 2) Closing prices, sampled down to the pixel width
    let mut closes = TimeSeries::new("Close");
    for r in rows {
        closes.add(r.period, r.close)?;
    }
    let mut series = TimeSeriesCollection::new();
    series.add_series(closes)?;
    let mut line = create_time_series_chart(&ChartOptions::new("Close", "Time", "Price"), shared(series))?;
    if let Some(p) = line.plot_mut().as_xy_mut() {
        p.set_renderer(0, XyRenderer::sampling())?;
    }
    charts.push(("close", line));

    // 3) Up and down sessions per weekday
    let mut table = CategoryTable::new();
    let mut ups = 0usize;
    for r in rows {
        let day = period_weekday(&r.period);
        let key = if r.close >= r.open { "Up" } else { "Down" };
        if r.close >= r.open {
            ups += 1;
        }
        if table.value_by_key(key, day).is_none() {
            table.add_value(0.0, key, day)?;
        }
        table.increment_value(1.0, key, day)?;
    }
    charts.push(("sessions", create_bar_chart(&ChartOptions::new("Sessions", "Weekday", "Count"), shared(table))?));

    // 4) Share of up sessions
    let mut pie = PieDataset::new();
    pie.set_value("Up", ups as f64)?;
    pie.set_value("Down", (rows.len() - ups) as f64)?;
    charts.push(("share", create_pie_chart("Up vs down", shared(pie), true, true)?));

    // 5) Last close against the observed range
    let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.low), hi.max(r.high)));
    let last = rows.last().map(|r| r.close);
    let mut dial = create_dial_chart("Last close", shared(ValueDataset::new(last)))?;
    if let Some(p) = dial.plot_mut().as_dial_mut() {
        if hi > lo {
            let step = freechart_core::grid::nice_step((hi - lo) / 8.0);
            p.set_scale(freechart_core::DialScale::new(lo, hi, 175.0, -170.0, step, 4)?)?;
        }
    }
    charts.push(("last", dial));

    // 6) A small project plan
    charts.push(("plan", create_gantt_chart(&ChartOptions::new("Plan", "Task", "Date"), shared(plan()?))?));
    Ok(charts)
}

fn plan() -> Result<TaskSeriesCollection> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("date")?.and_hms_opt(0, 0, 0).context("time")?;
    let span = |from: i64, days: i64| TimeSpan::new(start + Duration::days(from), start + Duration::days(from + days));
    let mut scheduled = TaskSeries::new("Scheduled");
    scheduled.add(Task::new("Design", span(0, 10)?).with_percent_complete(1.0)?)?;
    scheduled.add(Task::new("Build", span(8, 20)?).with_percent_complete(0.6)?)?;
    scheduled.add(Task::new("Test", span(25, 10)?).with_percent_complete(0.1)?)?;
    let mut collection = TaskSeriesCollection::new();
    collection.add_series(scheduled)?;
    Ok(collection)
}

fn period_weekday(p: &TimePeriod) -> &'static str {
    use chrono::Datelike;
    const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let ms = p.start_millis();
    DateTime::from_timestamp_millis(ms).map_or("?", |d| NAMES[d.weekday().num_days_from_monday() as usize])
}

fn synthetic_rows(n: usize) -> Vec<Row> {
    let Some(base) = NaiveDate::from_ymd_opt(2024, 1, 1) else { return Vec::new() };
    let mut price = 100.0f64;
    (0..n)
        .map(|i| {
            let open = price;
            let close = open + (i as f64 * 0.37).sin() * 2.0 + 0.1;
            price = close;
            Row {
                period: TimePeriod::Day(base + Duration::days(i as i64)),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(p: &Path) -> Result<(PathBuf, bool)> {
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    bail!("file not found: {}", p.display());
}

/// Load Binance-like OHLC CSV rows.
fn load_ohlc_csv(path: &Path) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    info!("headers: {:?}", headers);

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };

    // Common Binance headers
    let i_time = idx(&["time", "timestamp", "open_time", "date", "datetime"]);
    let i_open = idx(&["open", "o"]);
    let i_high = idx(&["high", "h"]);
    let i_low = idx(&["low", "l"]);
    let i_close = idx(&["close", "c", "adj_close", "close_price"]);

    if i_open.is_none() || i_high.is_none() || i_low.is_none() || i_close.is_none() {
        warn!("could not find one of open/high/low/close columns");
    }

    let mut out = Vec::new();
    for (row_index, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let parse = |i: Option<usize>| -> Option<f64> { i.and_then(|ix| rec.get(ix)).and_then(|s| s.trim().parse::<f64>().ok()) };

        // rows without a usable time are spaced a minute apart
        let millis = i_time
            .and_then(|ix| rec.get(ix))
            .and_then(parse_time_to_millis)
            .unwrap_or(row_index as i64 * 60_000);

        if let (Some(open), Some(high), Some(low), Some(close)) = (parse(i_open), parse(i_high), parse(i_low), parse(i_close)) {
            out.push(Row { period: TimePeriod::Millisecond(millis), open, high, low, close });
        }
    }
    Ok(out)
}

fn parse_time_to_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms, else epoch sec
        return Some(if n > 10_i64.pow(12) { n } else { n * 1000 });
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc().timestamp_millis())
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
