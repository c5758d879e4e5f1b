// File: crates/chart-core/src/data/ohlc.rs
// Summary: OHLC items, series and the notifying OHLC series collection.

use serde::{Deserialize, Serialize};

use crate::data::time::{PeriodAnchor, TimePeriod};
use crate::data::XyDataset;
use crate::error::{check_index, ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};

/// Open/high/low/close prices.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OhlcRepr")]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Deserialize)]
struct OhlcRepr {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl TryFrom<OhlcRepr> for Ohlc {
    type Error = ChartError;

    fn try_from(r: OhlcRepr) -> Result<Self> {
        Ohlc::try_new(r.open, r.high, r.low, r.close)
    }
}

impl Ohlc {
    /// Construct enforcing `low <= min(open, close)`, `high >= max(open, close)`.
    pub fn try_new(open: f64, high: f64, low: f64, close: f64) -> Result<Self> {
        if [open, high, low, close].iter().any(|v| v.is_nan()) {
            return Err(ChartError::invalid("OHLC values must not be NaN"));
        }
        if low > open.min(close) {
            return Err(ChartError::invalid("low above min(open, close)"));
        }
        if high < open.max(close) {
            return Err(ChartError::invalid("high below max(open, close)"));
        }
        Ok(Self { open, high, low, close })
    }

    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcItem {
    pub period: TimePeriod,
    pub values: Ohlc,
}

impl OhlcItem {
    pub fn new(period: TimePeriod, open: f64, high: f64, low: f64, close: f64) -> Result<Self> {
        Ok(Self { period, values: Ohlc::try_new(open, high, low, close)? })
    }
}

/// OHLC items with unique periods in time order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OhlcSeriesRepr")]
pub struct OhlcSeries {
    key: String,
    items: Vec<OhlcItem>,
}

/// Unchecked wire form; loading re-adds every item.
#[derive(Deserialize)]
struct OhlcSeriesRepr {
    key: String,
    items: Vec<OhlcItem>,
}

impl TryFrom<OhlcSeriesRepr> for OhlcSeries {
    type Error = ChartError;

    fn try_from(r: OhlcSeriesRepr) -> Result<Self> {
        let mut series = OhlcSeries::new(r.key);
        for item in r.items {
            series.add(item)?;
        }
        Ok(series)
    }
}

impl OhlcSeries {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), items: Vec::new() }
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn items(&self) -> &[OhlcItem] { &self.items }

    pub fn add(&mut self, item: OhlcItem) -> Result<()> {
        if let Some(first) = self.items.first() {
            if first.period.kind() != item.period.kind() {
                return Err(ChartError::invalid("all items of a series must share a period kind"));
            }
        }
        match self.items.binary_search_by(|it| it.period.cmp(&item.period)) {
            Ok(_) => Err(ChartError::DuplicateKey(format!("{:?} in series '{}'", item.period, self.key))),
            Err(at) => {
                self.items.insert(at, item);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<OhlcItem> {
        check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    /// Merge consecutive runs of `bucket` items: open of the first, close of
    /// the last, extreme high and low, period of the first.
    pub fn aggregate(&self, bucket: usize) -> OhlcSeries {
        if bucket <= 1 || self.items.len() <= 2 {
            return self.clone();
        }
        let items = self
            .items
            .chunks(bucket)
            .map(|chunk| {
                let first = chunk[0];
                let last = chunk[chunk.len() - 1];
                let high = chunk.iter().map(|c| c.values.high).fold(f64::NEG_INFINITY, f64::max);
                let low = chunk.iter().map(|c| c.values.low).fold(f64::INFINITY, f64::min);
                OhlcItem {
                    period: first.period,
                    values: Ohlc { open: first.values.open, high, low, close: last.values.close },
                }
            })
            .collect();
        OhlcSeries { key: self.key.clone(), items }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OhlcSeriesCollectionRepr")]
pub struct OhlcSeriesCollection {
    series: Vec<OhlcSeries>,
    anchor: PeriodAnchor,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct OhlcSeriesCollectionRepr {
    series: Vec<OhlcSeries>,
    anchor: PeriodAnchor,
}

impl TryFrom<OhlcSeriesCollectionRepr> for OhlcSeriesCollection {
    type Error = ChartError;

    fn try_from(r: OhlcSeriesCollectionRepr) -> Result<Self> {
        let mut c = OhlcSeriesCollection { anchor: r.anchor, ..Self::default() };
        for s in r.series {
            c.add_series(s)?;
        }
        Ok(c)
    }
}

impl Default for OhlcSeriesCollection {
    fn default() -> Self {
        Self { series: Vec::new(), anchor: PeriodAnchor::Middle, notifier: Notifier::new() }
    }
}

impl OhlcSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, index: usize) -> Option<&OhlcSeries> {
        self.series.get(index)
    }

    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key == key)
    }

    pub fn set_anchor(&mut self, anchor: PeriodAnchor) -> Result<()> {
        self.anchor = anchor;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn add_series(&mut self, series: OhlcSeries) -> Result<()> {
        if self.series_index(&series.key).is_some() {
            return Err(ChartError::DuplicateKey(series.key));
        }
        self.series.push(series);
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_series(&mut self, index: usize) -> Result<OhlcSeries> {
        check_index(index, self.series.len())?;
        let removed = self.series.remove(index);
        self.notifier.fire(ChangeKind::Dataset)?;
        Ok(removed)
    }

    pub fn add(&mut self, series: usize, item: OhlcItem) -> Result<()> {
        self.modify_series(series, |s| s.add(item))
    }

    pub fn modify_series<R>(&mut self, series: usize, edit: impl FnOnce(&mut OhlcSeries) -> Result<R>) -> Result<R> {
        check_index(series, self.series.len())?;
        let out = edit(&mut self.series[series])?;
        self.notifier.fire(ChangeKind::Series { index: series })?;
        Ok(out)
    }

    fn item(&self, series: usize, item: usize) -> &OhlcItem {
        &self.series[series].items[item]
    }
}

impl XyDataset for OhlcSeriesCollection {
    fn series_count(&self) -> usize { self.series.len() }
    fn series_key(&self, series: usize) -> &str { &self.series[series].key }
    fn item_count(&self, series: usize) -> usize { self.series[series].items.len() }

    fn x(&self, series: usize, item: usize) -> f64 {
        self.anchor.millis(&self.item(series, item).period) as f64
    }

    fn y(&self, series: usize, item: usize) -> Option<f64> {
        Some(self.item(series, item).values.close)
    }

    fn start_x(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).period.start_millis() as f64
    }

    fn end_x(&self, series: usize, item: usize) -> f64 {
        self.item(series, item).period.end_millis() as f64
    }

    fn start_y(&self, series: usize, item: usize) -> Option<f64> {
        Some(self.item(series, item).values.low)
    }

    fn end_y(&self, series: usize, item: usize) -> Option<f64> {
        Some(self.item(series, item).values.high)
    }

    fn ohlc(&self, series: usize, item: usize) -> Option<Ohlc> {
        Some(self.item(series, item).values)
    }
}

impl Observable for OhlcSeriesCollection {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
