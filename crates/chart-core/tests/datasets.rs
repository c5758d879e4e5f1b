// File: crates/chart-core/tests/datasets.rs
// Purpose: Dataset containers and range helpers: ordering, keys, validation and bounds.

use chrono::NaiveDate;
use freechart_core::data::utils::{find_domain_bounds, find_range_bounds, find_stacked_range_bounds, pie_total};
use freechart_core::data::{
    CategoryDataset, CategoryTable, OhlcItem, OhlcSeries, PeriodAnchor, PeriodKind, PieDataset, Range, Task, TaskSeries,
    TaskSeriesCollection, TimePeriod, TimeSeries, TimeSeriesCollection, TimeSpan, XyDataset, XySeries, XySeriesCollection,
};
use freechart_core::{ChartError, Result};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn range_rejects_inverted_and_nan_bounds() {
    assert!(Range::new(2.0, 1.0).is_err());
    assert!(Range::new(f64::NAN, 1.0).is_err());
    assert!(Range::new(f64::NEG_INFINITY, f64::INFINITY).is_ok());
}

#[test]
fn range_combine_treats_none_as_identity() -> Result<()> {
    let a = Range::new(0.0, 2.0)?;
    let b = Range::new(-1.0, 1.0)?;
    let c = Range::new(5.0, 6.0)?;
    assert_eq!(Range::combine(None, Some(a)), Some(a));
    assert_eq!(Range::combine(Some(a), None), Some(a));
    assert_eq!(Range::combine(None, None), None);
    let left = Range::combine(Range::combine(Some(a), Some(b)), Some(c));
    let right = Range::combine(Some(a), Range::combine(Some(b), Some(c)));
    assert_eq!(left, right);
    assert_eq!(left, Some(Range::new(-1.0, 6.0)?));
    Ok(())
}

#[test]
fn range_expand_shift_and_scale() -> Result<()> {
    let r = Range::new(0.0, 10.0)?;
    assert_eq!(r.expand(0.1, 0.1), Range::new(-1.0, 11.0)?);
    // margins that would invert the range collapse it on the midpoint
    assert_eq!(r.expand(-0.6, -0.6), Range::new(5.0, 5.0)?);

    assert_eq!(Range::expand_to_include(None, 3.0), Some(Range::new(3.0, 3.0)?));
    assert_eq!(Range::expand_to_include(Some(r), f64::NAN), Some(r));
    assert_eq!(Range::expand_to_include(Some(r), -2.0), Some(Range::new(-2.0, 10.0)?));

    let p = Range::new(1.0, 5.0)?;
    assert_eq!(p.shift(-2.0, true), Range::new(-1.0, 3.0)?);
    assert_eq!(p.shift(-2.0, false), Range::new(0.0, 3.0)?);
    assert!(p.scale(-1.0).is_err());
    assert_eq!(p.scale(2.0)?, Range::new(2.0, 10.0)?);

    assert!(r.intersects(-5.0, 1.0));
    assert!(!r.intersects(11.0, 12.0));
    assert_eq!(r.constrain(42.0), 10.0);
    Ok(())
}

#[test]
fn xy_series_sorts_and_enforces_options() -> Result<()> {
    let mut s = XySeries::new("s");
    s.add(3.0, 30.0)?;
    s.add(1.0, 10.0)?;
    s.add(2.0, None)?;
    let xs: Vec<f64> = s.items().iter().map(|it| it.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    assert_eq!(s.y(1), None);

    let mut unique = XySeries::with_options("u", true, false);
    unique.add(1.0, 1.0)?;
    assert!(matches!(unique.add(1.0, 2.0), Err(ChartError::DuplicateKey(_))));

    s.set_maximum_item_count(2);
    let xs: Vec<f64> = s.items().iter().map(|it| it.x).collect();
    assert_eq!(xs, vec![2.0, 3.0]);

    assert!(s.add(f64::NAN, 1.0).is_err());
    assert!(matches!(s.remove(9), Err(ChartError::IndexOutOfBounds { index: 9, len: 2 })));
    Ok(())
}

#[test]
fn xy_collection_keys_are_unique_and_intervals_follow_spacing() -> Result<()> {
    let mut s = XySeries::new("a");
    for x in [0.0, 2.0, 3.0] {
        s.add(x, x)?;
    }
    let mut c = XySeriesCollection::with_series(s)?;
    assert!(matches!(c.add_series(XySeries::new("a")), Err(ChartError::DuplicateKey(_))));

    assert_eq!(c.interval_width(), 1.0);
    assert_eq!(c.start_x(0, 1), 1.5);
    assert_eq!(c.end_x(0, 1), 2.5);

    c.set_interval_width(Some(4.0))?;
    c.set_interval_position(0.0)?;
    assert_eq!(c.start_x(0, 1), 2.0);
    assert_eq!(c.end_x(0, 1), 6.0);
    assert!(c.set_interval_width(Some(0.0)).is_err());
    assert!(c.set_interval_position(1.5).is_err());
    Ok(())
}

#[test]
fn bounds_skip_absent_values() -> Result<()> {
    let mut s = XySeries::new("s");
    s.add(1.0, 5.0)?;
    s.add(2.0, None)?;
    s.add(4.0, -3.0)?;
    let c = XySeriesCollection::with_series(s)?;
    assert_eq!(find_domain_bounds(&c, false), Some(Range::new(1.0, 4.0)?));
    assert_eq!(find_range_bounds(&c, false), Some(Range::new(-3.0, 5.0)?));

    let empty = XySeriesCollection::with_series(XySeries::new("e"))?;
    assert_eq!(find_range_bounds(&empty, false), None);
    Ok(())
}

#[test]
fn time_periods_validate_and_step() -> Result<()> {
    assert!(TimePeriod::month(2024, 13).is_err());
    assert!(TimePeriod::quarter(2024, 0).is_err());
    assert!(TimePeriod::day(2023, 2, 29).is_err());
    assert!(TimePeriod::hour(date(2024, 1, 1), 24).is_err());

    assert_eq!(TimePeriod::month(2024, 12)?.next(), Some(TimePeriod::month(2025, 1)?));
    assert_eq!(TimePeriod::day(2024, 3, 1)?.previous(), Some(TimePeriod::day(2024, 2, 29)?));
    assert_eq!(
        TimePeriod::minute(date(2024, 1, 1), 23, 59)?.next(),
        Some(TimePeriod::minute(date(2024, 1, 2), 0, 0)?)
    );
    assert_eq!(
        TimePeriod::minute(date(2024, 3, 1), 0, 0)?.previous(),
        Some(TimePeriod::minute(date(2024, 2, 29), 23, 59)?)
    );
    assert_eq!(TimePeriod::minute(date(2024, 3, 1), 7, 0)?.previous(), Some(TimePeriod::minute(date(2024, 3, 1), 6, 59)?));

    let at = date(2024, 5, 10).and_hms_opt(13, 45, 0).unwrap();
    assert_eq!(TimePeriod::containing(PeriodKind::Quarter, at), TimePeriod::quarter(2024, 2)?);
    assert_eq!(TimePeriod::containing(PeriodKind::Hour, at), TimePeriod::hour(date(2024, 5, 10), 13)?);

    let day = TimePeriod::day(1970, 1, 2)?;
    assert_eq!(day.start_millis(), 86_400_000);
    assert_eq!(day.end_millis(), 2 * 86_400_000 - 1);
    Ok(())
}

#[test]
fn time_series_keeps_one_period_kind_in_order() -> Result<()> {
    let mut s = TimeSeries::new("t");
    s.add(TimePeriod::day(2024, 1, 3)?, 3.0)?;
    s.add(TimePeriod::day(2024, 1, 1)?, 1.0)?;
    assert_eq!(s.items()[0].period, TimePeriod::day(2024, 1, 1)?);
    assert!(matches!(s.add(TimePeriod::day(2024, 1, 1)?, 9.0), Err(ChartError::DuplicateKey(_))));
    assert!(s.add(TimePeriod::month(2024, 2)?, 2.0).is_err());

    assert_eq!(s.add_or_update(TimePeriod::day(2024, 1, 3)?, 30.0)?, Some(3.0));
    assert_eq!(s.value(&TimePeriod::day(2024, 1, 3)?), Some(30.0));
    assert!(s.delete(&TimePeriod::day(2024, 1, 9)?).is_err());
    Ok(())
}

#[test]
fn time_series_collection_x_follows_anchor() -> Result<()> {
    let mut s = TimeSeries::new("t");
    let day = TimePeriod::day(1970, 1, 2)?;
    s.add(day, 1.0)?;
    let mut c = TimeSeriesCollection::new();
    c.add_series(s)?;

    assert_eq!(c.x(0, 0), 86_400_000.0);
    c.set_anchor(PeriodAnchor::Middle)?;
    assert_eq!(c.x(0, 0), (86_400_000 + 43_199_999) as f64);
    c.set_anchor(PeriodAnchor::End)?;
    assert_eq!(c.x(0, 0), (2 * 86_400_000 - 1) as f64);
    assert_eq!(c.start_x(0, 0), 86_400_000.0);
    Ok(())
}

#[test]
fn ohlc_items_validate_and_aggregate() -> Result<()> {
    assert!(OhlcItem::new(TimePeriod::day(2024, 1, 1)?, 10.0, 9.0, 8.0, 9.5).is_err());
    assert!(OhlcItem::new(TimePeriod::day(2024, 1, 1)?, 10.0, 12.0, 10.5, 11.0).is_err());

    let mut s = OhlcSeries::new("p");
    let rows = [(1, 10.0, 12.0, 9.0, 11.0), (2, 11.0, 15.0, 10.0, 14.0), (3, 14.0, 14.5, 7.0, 8.0), (4, 8.0, 9.0, 6.0, 8.5)];
    for (d, o, h, l, c) in rows {
        s.add(OhlcItem::new(TimePeriod::day(2024, 1, d)?, o, h, l, c)?)?;
    }
    assert!(s.add(OhlcItem::new(TimePeriod::month(2024, 2)?, 1.0, 1.0, 1.0, 1.0)?).is_err());

    let merged = s.aggregate(2);
    assert_eq!(merged.len(), 2);
    let first = merged.items()[0].values;
    assert_eq!((first.open, first.high, first.low, first.close), (10.0, 15.0, 9.0, 14.0));
    let second = merged.items()[1];
    assert_eq!(second.period, TimePeriod::day(2024, 1, 3)?);
    assert_eq!((second.values.open, second.values.low, second.values.close), (14.0, 6.0, 8.5));
    assert_eq!(s.aggregate(1), s);
    Ok(())
}

#[test]
fn pie_total_and_consolidation() -> Result<()> {
    let mut p = PieDataset::new();
    p.set_value("A", 50.0)?;
    p.set_value("B", 30.0)?;
    p.set_value("C", 2.0)?;
    p.set_value("D", 1.0)?;
    p.set_value("E", None)?;
    p.set_value("F", -4.0)?;
    assert_eq!(p.total(), 83.0);
    assert_eq!(pie_total(&p), Some(83.0));
    assert_eq!(pie_total(&PieDataset::new()), None);

    let folded = p.consolidated("Other", 0.05, 2);
    let keys: Vec<&str> = folded.keys().collect();
    assert!(keys.contains(&"Other"));
    assert!(!keys.contains(&"C"));
    assert_eq!(folded.value("Other"), Some(2.0 + 1.0 - 4.0));

    // fewer small items than required: nothing folds
    let kept = p.consolidated("Other", 0.05, 10);
    assert_eq!(kept.index_of("Other"), None);

    p.sort_by_values(true)?;
    assert_eq!(p.key(0), Some("A"));
    p.insert_value(0, "Z", 1.0)?;
    assert_eq!(p.key(0), Some("Z"));
    assert!(p.remove("missing").is_err());
    Ok(())
}

#[test]
fn category_table_grows_keys_and_increments() -> Result<()> {
    let mut t = CategoryTable::new();
    t.set_value(1.0, "S1", "C1")?;
    t.set_value(2.0, "S2", "C2")?;
    assert_eq!((t.row_count(), t.column_count()), (2, 2));
    assert_eq!(t.value_by_key("S1", "C2"), None);

    t.increment_value(4.0, "S1", "C1")?;
    assert_eq!(t.value_by_key("S1", "C1"), Some(5.0));
    t.increment_value(3.0, "S1", "C2")?;
    assert_eq!(t.value_by_key("S1", "C2"), Some(3.0));
    assert!(matches!(t.increment_value(1.0, "S9", "C1"), Err(ChartError::UnknownKey(_))));

    t.remove_row("S2")?;
    assert_eq!(t.row_count(), 1);
    Ok(())
}

#[test]
fn stacked_bounds_split_positives_and_negatives() -> Result<()> {
    let mut t = CategoryTable::new();
    t.set_value(3.0, "A", "x")?;
    t.set_value(-2.0, "B", "x")?;
    t.set_value(4.0, "C", "x")?;
    t.set_value(1.0, "A", "y")?;
    assert_eq!(find_stacked_range_bounds(&t, 0.0), Some(Range::new(-2.0, 7.0)?));
    Ok(())
}

#[test]
fn task_collection_columns_are_task_descriptions() -> Result<()> {
    let start = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
    let end = date(2024, 1, 11).and_hms_opt(0, 0, 0).unwrap();
    assert!(TimeSpan::new(end, start).is_err());
    assert!(Task::new("x", None).with_percent_complete(1.5).is_err());

    let span = TimeSpan::new(start, end)?;
    let mut planned = TaskSeries::new("Planned");
    planned.add(Task::new("Design", span).with_percent_complete(0.5)?)?;
    planned.add(Task::new("Build", span))?;
    assert!(matches!(planned.add(Task::new("Build", None)), Err(ChartError::DuplicateKey(_))));
    let mut actual = TaskSeries::new("Actual");
    actual.add(Task::new("Test", span))?;

    let mut c = TaskSeriesCollection::new();
    c.add_series(planned)?;
    c.add_series(actual)?;
    assert_eq!(c.column_count(), 3);
    assert_eq!(c.column_key(2), "Test");
    assert_eq!(c.interval(0, 0), Some((span.start_millis(), span.end_millis())));
    assert_eq!(c.value(0, 0), Some(span.start_millis()));
    assert_eq!(c.interval(1, 0), None);
    assert_eq!(c.percent_complete(0, 0), Some(0.5));

    c.set_percent_complete(0, "Build", Some(1.0))?;
    assert_eq!(c.percent_complete(0, 1), Some(1.0));
    assert!(c.set_percent_complete(0, "Nope", None).is_err());
    Ok(())
}
