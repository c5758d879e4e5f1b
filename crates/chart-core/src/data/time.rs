// File: crates/chart-core/src/data/time.rs
// Summary: Regular time periods (UTC), time series and the notifying time series collection.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::data::XyDataset;
use crate::error::{check_index, ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};

/// Granularity of a [`TimePeriod`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    Year,
    Quarter,
    Month,
    Day,
    Hour,
    Minute,
    Millisecond,
}

/// A regular time period. All periods are interpreted in UTC.
///
/// Ordering is chronological between periods of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TimePeriodRepr")]
pub enum TimePeriod {
    Year(i32),
    Quarter { year: i32, quarter: u32 },
    Month { year: i32, month: u32 },
    Day(NaiveDate),
    Hour { date: NaiveDate, hour: u32 },
    Minute { date: NaiveDate, hour: u32, minute: u32 },
    Millisecond(i64),
}

/// Unchecked wire form of [`TimePeriod`]; loading goes through the constructors.
#[derive(Deserialize)]
enum TimePeriodRepr {
    Year(i32),
    Quarter { year: i32, quarter: u32 },
    Month { year: i32, month: u32 },
    Day(NaiveDate),
    Hour { date: NaiveDate, hour: u32 },
    Minute { date: NaiveDate, hour: u32, minute: u32 },
    Millisecond(i64),
}

impl TryFrom<TimePeriodRepr> for TimePeriod {
    type Error = ChartError;

    fn try_from(r: TimePeriodRepr) -> Result<Self> {
        match r {
            TimePeriodRepr::Year(y) => TimePeriod::year(y),
            TimePeriodRepr::Quarter { year, quarter } => TimePeriod::quarter(year, quarter),
            TimePeriodRepr::Month { year, month } => TimePeriod::month(year, month),
            TimePeriodRepr::Day(d) => Ok(TimePeriod::Day(d)),
            TimePeriodRepr::Hour { date, hour } => TimePeriod::hour(date, hour),
            TimePeriodRepr::Minute { date, hour, minute } => TimePeriod::minute(date, hour, minute),
            TimePeriodRepr::Millisecond(ms) => Ok(TimePeriod::Millisecond(ms)),
        }
    }
}

impl TimePeriod {
    pub fn year(year: i32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| ChartError::invalid(format!("year {year} out of range")))?;
        Ok(TimePeriod::Year(year))
    }

    pub fn quarter(year: i32, quarter: u32) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(ChartError::invalid(format!("quarter {quarter} not in 1..=4")));
        }
        Self::year(year)?;
        Ok(TimePeriod::Quarter { year, quarter })
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ChartError::invalid(format!("invalid month {year}-{month}")))?;
        Ok(TimePeriod::Month { year, month })
    }

    pub fn day(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(TimePeriod::Day)
            .ok_or_else(|| ChartError::invalid(format!("invalid date {year}-{month}-{day}")))
    }

    pub fn hour(date: NaiveDate, hour: u32) -> Result<Self> {
        if hour > 23 {
            return Err(ChartError::invalid(format!("hour {hour} not in 0..=23")));
        }
        Ok(TimePeriod::Hour { date, hour })
    }

    pub fn minute(date: NaiveDate, hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(ChartError::invalid(format!("invalid time {hour}:{minute}")));
        }
        Ok(TimePeriod::Minute { date, hour, minute })
    }

    /// The period of `kind` that contains `at`.
    pub fn containing(kind: PeriodKind, at: NaiveDateTime) -> Self {
        let date = at.date();
        match kind {
            PeriodKind::Year => TimePeriod::Year(date.year()),
            PeriodKind::Quarter => TimePeriod::Quarter { year: date.year(), quarter: (date.month() - 1) / 3 + 1 },
            PeriodKind::Month => TimePeriod::Month { year: date.year(), month: date.month() },
            PeriodKind::Day => TimePeriod::Day(date),
            PeriodKind::Hour => TimePeriod::Hour { date, hour: at.hour() },
            PeriodKind::Minute => TimePeriod::Minute { date, hour: at.hour(), minute: at.minute() },
            PeriodKind::Millisecond => TimePeriod::Millisecond(at.and_utc().timestamp_millis()),
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            TimePeriod::Year(_) => PeriodKind::Year,
            TimePeriod::Quarter { .. } => PeriodKind::Quarter,
            TimePeriod::Month { .. } => PeriodKind::Month,
            TimePeriod::Day(_) => PeriodKind::Day,
            TimePeriod::Hour { .. } => PeriodKind::Hour,
            TimePeriod::Minute { .. } => PeriodKind::Minute,
            TimePeriod::Millisecond(_) => PeriodKind::Millisecond,
        }
    }

    /// First millisecond of the period since the Unix epoch.
    pub fn start_millis(&self) -> i64 {
        match *self {
            TimePeriod::Year(y) => date_millis(y, 1, 1),
            TimePeriod::Quarter { year, quarter } => date_millis(year, (quarter - 1) * 3 + 1, 1),
            TimePeriod::Month { year, month } => date_millis(year, month, 1),
            TimePeriod::Day(d) => midnight_millis(d),
            TimePeriod::Hour { date, hour } => midnight_millis(date) + hour as i64 * 3_600_000,
            TimePeriod::Minute { date, hour, minute } => {
                midnight_millis(date) + hour as i64 * 3_600_000 + minute as i64 * 60_000
            }
            TimePeriod::Millisecond(ms) => ms,
        }
    }

    /// Last millisecond of the period.
    pub fn end_millis(&self) -> i64 {
        match self.next() {
            Some(n) => n.start_millis() - 1,
            None => i64::MAX,
        }
    }

    pub fn middle_millis(&self) -> i64 {
        let (s, e) = (self.start_millis(), self.end_millis());
        s + (e - s) / 2
    }

    pub fn next(&self) -> Option<Self> {
        Some(match *self {
            TimePeriod::Year(y) => TimePeriod::Year(y.checked_add(1)?),
            TimePeriod::Quarter { year, quarter: 4 } => TimePeriod::Quarter { year: year.checked_add(1)?, quarter: 1 },
            TimePeriod::Quarter { year, quarter } => TimePeriod::Quarter { year, quarter: quarter + 1 },
            TimePeriod::Month { year, month: 12 } => TimePeriod::Month { year: year.checked_add(1)?, month: 1 },
            TimePeriod::Month { year, month } => TimePeriod::Month { year, month: month + 1 },
            TimePeriod::Day(d) => TimePeriod::Day(d.succ_opt()?),
            TimePeriod::Hour { date, hour: 23 } => TimePeriod::Hour { date: date.succ_opt()?, hour: 0 },
            TimePeriod::Hour { date, hour } => TimePeriod::Hour { date, hour: hour + 1 },
            TimePeriod::Minute { date, hour, minute: 59 } => match (TimePeriod::Hour { date, hour }).next()? {
                TimePeriod::Hour { date, hour } => TimePeriod::Minute { date, hour, minute: 0 },
                _ => return None,
            },
            TimePeriod::Minute { date, hour, minute } => TimePeriod::Minute { date, hour, minute: minute + 1 },
            TimePeriod::Millisecond(ms) => TimePeriod::Millisecond(ms.checked_add(1)?),
        })
    }

    pub fn previous(&self) -> Option<Self> {
        Some(match *self {
            TimePeriod::Year(y) => TimePeriod::Year(y.checked_sub(1)?),
            TimePeriod::Quarter { year, quarter: 1 } => TimePeriod::Quarter { year: year.checked_sub(1)?, quarter: 4 },
            TimePeriod::Quarter { year, quarter } => TimePeriod::Quarter { year, quarter: quarter - 1 },
            TimePeriod::Month { year, month: 1 } => TimePeriod::Month { year: year.checked_sub(1)?, month: 12 },
            TimePeriod::Month { year, month } => TimePeriod::Month { year, month: month - 1 },
            TimePeriod::Day(d) => TimePeriod::Day(d.pred_opt()?),
            TimePeriod::Hour { date, hour: 0 } => TimePeriod::Hour { date: date.pred_opt()?, hour: 23 },
            TimePeriod::Hour { date, hour } => TimePeriod::Hour { date, hour: hour - 1 },
            TimePeriod::Minute { date, hour, minute: 0 } => match (TimePeriod::Hour { date, hour }).previous()? {
                TimePeriod::Hour { date, hour } => TimePeriod::Minute { date, hour, minute: 59 },
                _ => return None,
            },
            TimePeriod::Minute { date, hour, minute } => TimePeriod::Minute { date, hour, minute: minute - 1 },
            TimePeriod::Millisecond(ms) => TimePeriod::Millisecond(ms.checked_sub(1)?),
        })
    }
}

fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::default()).and_utc().timestamp_millis()
}

fn date_millis(year: i32, month: u32, day: u32) -> i64 {
    // constructors validated the date
    NaiveDate::from_ymd_opt(year, month, day).map(midnight_millis).unwrap_or(i64::MIN)
}

/// Which instant of a period is used as its x value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl PeriodAnchor {
    pub fn millis(self, period: &TimePeriod) -> i64 {
        match self {
            PeriodAnchor::Start => period.start_millis(),
            PeriodAnchor::Middle => period.middle_millis(),
            PeriodAnchor::End => period.end_millis(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesItem {
    pub period: TimePeriod,
    pub value: Option<f64>,
}

/// Values keyed by unique periods of a single kind, kept in time order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesRepr")]
pub struct TimeSeries {
    key: String,
    kind: Option<PeriodKind>,
    items: Vec<TimeSeriesItem>,
    maximum_item_count: usize,
}

/// Unchecked wire form; loading re-adds every item.
#[derive(Deserialize)]
struct TimeSeriesRepr {
    key: String,
    kind: Option<PeriodKind>,
    items: Vec<TimeSeriesItem>,
    maximum_item_count: usize,
}

impl TryFrom<TimeSeriesRepr> for TimeSeries {
    type Error = ChartError;

    fn try_from(r: TimeSeriesRepr) -> Result<Self> {
        let mut series = TimeSeries::new(r.key);
        series.kind = r.kind;
        for item in r.items {
            series.add(item.period, item.value)?;
        }
        series.set_maximum_item_count(r.maximum_item_count);
        Ok(series)
    }
}

impl TimeSeries {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), kind: None, items: Vec::new(), maximum_item_count: usize::MAX }
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn items(&self) -> &[TimeSeriesItem] { &self.items }
    pub fn period_kind(&self) -> Option<PeriodKind> { self.kind }

    pub fn index_of(&self, period: &TimePeriod) -> Option<usize> {
        self.items.binary_search_by(|it| it.period.cmp(period)).ok()
    }

    pub fn value(&self, period: &TimePeriod) -> Option<f64> {
        self.index_of(period).and_then(|i| self.items[i].value)
    }

    pub fn set_maximum_item_count(&mut self, maximum: usize) {
        self.maximum_item_count = maximum;
        self.trim();
    }

    fn check_kind(&self, period: &TimePeriod) -> Result<()> {
        match self.kind {
            Some(k) if k != period.kind() => Err(ChartError::invalid(format!(
                "series '{}' holds {:?} periods, got {:?}",
                self.key,
                k,
                period.kind()
            ))),
            _ => Ok(()),
        }
    }

    /// Add a new period. Duplicates and periods of another kind are rejected.
    pub fn add(&mut self, period: TimePeriod, value: impl Into<Option<f64>>) -> Result<()> {
        self.check_kind(&period)?;
        match self.items.binary_search_by(|it| it.period.cmp(&period)) {
            Ok(_) => Err(ChartError::DuplicateKey(format!("{period:?} in series '{}'", self.key))),
            Err(at) => {
                self.items.insert(at, TimeSeriesItem { period, value: value.into() });
                self.kind = Some(period.kind());
                self.trim();
                Ok(())
            }
        }
    }

    /// Add or replace; returns the previous value when the period existed.
    pub fn add_or_update(&mut self, period: TimePeriod, value: impl Into<Option<f64>>) -> Result<Option<f64>> {
        self.check_kind(&period)?;
        let value = value.into();
        match self.items.binary_search_by(|it| it.period.cmp(&period)) {
            Ok(i) => Ok(std::mem::replace(&mut self.items[i].value, value)),
            Err(_) => {
                self.add(period, value)?;
                Ok(None)
            }
        }
    }

    pub fn update(&mut self, period: &TimePeriod, value: impl Into<Option<f64>>) -> Result<()> {
        let i = self.index_of(period).ok_or_else(|| ChartError::UnknownKey(format!("{period:?}")))?;
        self.items[i].value = value.into();
        Ok(())
    }

    pub fn delete(&mut self, period: &TimePeriod) -> Result<()> {
        let i = self.index_of(period).ok_or_else(|| ChartError::UnknownKey(format!("{period:?}")))?;
        self.items.remove(i);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn trim(&mut self) {
        if self.items.len() > self.maximum_item_count {
            let excess = self.items.len() - self.maximum_item_count;
            self.items.drain(..excess);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeSeriesCollectionRepr")]
pub struct TimeSeriesCollection {
    series: Vec<TimeSeries>,
    anchor: PeriodAnchor,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct TimeSeriesCollectionRepr {
    series: Vec<TimeSeries>,
    anchor: PeriodAnchor,
}

impl TryFrom<TimeSeriesCollectionRepr> for TimeSeriesCollection {
    type Error = ChartError;

    fn try_from(r: TimeSeriesCollectionRepr) -> Result<Self> {
        let mut c = TimeSeriesCollection { anchor: r.anchor, ..Self::default() };
        for s in r.series {
            c.add_series(s)?;
        }
        Ok(c)
    }
}

impl TimeSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, index: usize) -> Option<&TimeSeries> {
        self.series.get(index)
    }

    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key == key)
    }

    pub fn anchor(&self) -> PeriodAnchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: PeriodAnchor) -> Result<()> {
        self.anchor = anchor;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn add_series(&mut self, series: TimeSeries) -> Result<()> {
        if self.series_index(&series.key).is_some() {
            return Err(ChartError::DuplicateKey(series.key));
        }
        self.series.push(series);
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_series(&mut self, index: usize) -> Result<TimeSeries> {
        check_index(index, self.series.len())?;
        let removed = self.series.remove(index);
        self.notifier.fire(ChangeKind::Dataset)?;
        Ok(removed)
    }

    pub fn add(&mut self, series: usize, period: TimePeriod, value: impl Into<Option<f64>>) -> Result<()> {
        self.modify_series(series, |s| s.add(period, value))
    }

    pub fn add_or_update(&mut self, series: usize, period: TimePeriod, value: impl Into<Option<f64>>) -> Result<Option<f64>> {
        self.modify_series(series, |s| s.add_or_update(period, value))
    }

    pub fn delete(&mut self, series: usize, period: &TimePeriod) -> Result<()> {
        self.modify_series(series, |s| s.delete(period))
    }

    /// Apply several edits to one series and fire a single event afterwards.
    pub fn modify_series<R>(&mut self, series: usize, edit: impl FnOnce(&mut TimeSeries) -> Result<R>) -> Result<R> {
        check_index(series, self.series.len())?;
        let out = edit(&mut self.series[series])?;
        self.notifier.fire(ChangeKind::Series { index: series })?;
        Ok(out)
    }
}

impl XyDataset for TimeSeriesCollection {
    fn series_count(&self) -> usize { self.series.len() }
    fn series_key(&self, series: usize) -> &str { &self.series[series].key }
    fn item_count(&self, series: usize) -> usize { self.series[series].items.len() }

    fn x(&self, series: usize, item: usize) -> f64 {
        self.anchor.millis(&self.series[series].items[item].period) as f64
    }

    fn y(&self, series: usize, item: usize) -> Option<f64> {
        self.series[series].items[item].value
    }

    fn start_x(&self, series: usize, item: usize) -> f64 {
        self.series[series].items[item].period.start_millis() as f64
    }

    fn end_x(&self, series: usize, item: usize) -> f64 {
        self.series[series].items[item].period.end_millis() as f64
    }
}

impl Observable for TimeSeriesCollection {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
