// File: crates/chart-core/src/data/xy.rs
// Summary: XY series and the notifying XY series collection.

use serde::{Deserialize, Serialize};

use crate::data::XyDataset;
use crate::error::{check_index, ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XyItem {
    pub x: f64,
    pub y: Option<f64>,
}

/// A keyed sequence of (x, y) items. Plain value: change notification is
/// done by the collection that owns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "XySeriesRepr")]
pub struct XySeries {
    key: String,
    items: Vec<XyItem>,
    auto_sort: bool,
    allow_duplicate_x: bool,
    maximum_item_count: usize,
}

/// Unchecked wire form; loading re-adds every item.
#[derive(Deserialize)]
struct XySeriesRepr {
    key: String,
    items: Vec<XyItem>,
    auto_sort: bool,
    allow_duplicate_x: bool,
    maximum_item_count: usize,
}

impl TryFrom<XySeriesRepr> for XySeries {
    type Error = ChartError;

    fn try_from(r: XySeriesRepr) -> Result<Self> {
        let mut series = XySeries::with_options(r.key, r.auto_sort, r.allow_duplicate_x);
        for item in r.items {
            series.add(item.x, item.y)?;
        }
        series.set_maximum_item_count(r.maximum_item_count);
        Ok(series)
    }
}

impl XySeries {
    /// Sorted series allowing duplicate x values.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_options(key, true, true)
    }

    pub fn with_options(key: impl Into<String>, auto_sort: bool, allow_duplicate_x: bool) -> Self {
        Self { key: key.into(), items: Vec::new(), auto_sort, allow_duplicate_x, maximum_item_count: usize::MAX }
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn items(&self) -> &[XyItem] { &self.items }
    pub fn auto_sort(&self) -> bool { self.auto_sort }
    pub fn allows_duplicate_x(&self) -> bool { self.allow_duplicate_x }
    pub fn maximum_item_count(&self) -> usize { self.maximum_item_count }

    pub fn x(&self, index: usize) -> f64 { self.items[index].x }
    pub fn y(&self, index: usize) -> Option<f64> { self.items[index].y }

    /// Cap the item count; the oldest items are dropped first.
    pub fn set_maximum_item_count(&mut self, maximum: usize) {
        self.maximum_item_count = maximum;
        self.trim();
    }

    pub fn index_of(&self, x: f64) -> Option<usize> {
        if self.auto_sort {
            let i = self.items.partition_point(|it| it.x < x);
            (i < self.items.len() && self.items[i].x == x).then_some(i)
        } else {
            self.items.iter().position(|it| it.x == x)
        }
    }

    pub fn add(&mut self, x: f64, y: impl Into<Option<f64>>) -> Result<()> {
        if x.is_nan() {
            return Err(ChartError::invalid("x value must not be NaN"));
        }
        if !self.allow_duplicate_x && self.index_of(x).is_some() {
            return Err(ChartError::DuplicateKey(format!("x = {x} in series '{}'", self.key)));
        }
        let item = XyItem { x, y: y.into() };
        if self.auto_sort {
            // after any existing items with the same x
            let at = self.items.partition_point(|it| it.x <= x);
            self.items.insert(at, item);
        } else {
            self.items.push(item);
        }
        self.trim();
        Ok(())
    }

    pub fn update_y(&mut self, x: f64, y: impl Into<Option<f64>>) -> Result<()> {
        let i = self.index_of(x).ok_or_else(|| ChartError::UnknownKey(format!("x = {x}")))?;
        self.items[i].y = y.into();
        Ok(())
    }

    pub fn update_by_index(&mut self, index: usize, y: impl Into<Option<f64>>) -> Result<()> {
        check_index(index, self.items.len())?;
        self.items[index].y = y.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<XyItem> {
        check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Smallest gap between neighbouring x values, if any is positive.
    fn min_x_gap(&self) -> Option<f64> {
        let mut xs: Vec<f64> = self.items.iter().map(|it| it.x).collect();
        xs.sort_by(f64::total_cmp);
        xs.windows(2).map(|w| w[1] - w[0]).filter(|d| *d > 0.0).reduce(f64::min)
    }

    fn trim(&mut self) {
        if self.items.len() > self.maximum_item_count {
            let excess = self.items.len() - self.maximum_item_count;
            self.items.drain(..excess);
        }
    }
}

/// Ordered collection of [`XySeries`] with unique keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "XySeriesCollectionRepr")]
pub struct XySeriesCollection {
    series: Vec<XySeries>,
    /// Fixed bar width in x units; `None` uses the smallest x gap.
    interval_width: Option<f64>,
    /// Where x sits within its interval (0 = start, 0.5 = centered, 1 = end).
    interval_position: f64,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct XySeriesCollectionRepr {
    series: Vec<XySeries>,
    interval_width: Option<f64>,
    interval_position: f64,
}

impl TryFrom<XySeriesCollectionRepr> for XySeriesCollection {
    type Error = ChartError;

    fn try_from(r: XySeriesCollectionRepr) -> Result<Self> {
        let mut c = XySeriesCollection::new();
        for s in r.series {
            c.add_series(s)?;
        }
        c.set_interval_width(r.interval_width)?;
        c.set_interval_position(r.interval_position)?;
        Ok(c)
    }
}

impl Default for XySeriesCollection {
    fn default() -> Self {
        Self { series: Vec::new(), interval_width: None, interval_position: 0.5, notifier: Notifier::new() }
    }
}

impl XySeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(series: XySeries) -> Result<Self> {
        let mut c = Self::new();
        c.add_series(series)?;
        Ok(c)
    }

    pub fn series(&self, index: usize) -> Option<&XySeries> {
        self.series.get(index)
    }

    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key == key)
    }

    pub fn all_series(&self) -> &[XySeries] {
        &self.series
    }

    pub fn add_series(&mut self, series: XySeries) -> Result<()> {
        if self.series_index(&series.key).is_some() {
            return Err(ChartError::DuplicateKey(series.key));
        }
        self.series.push(series);
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_series(&mut self, index: usize) -> Result<XySeries> {
        check_index(index, self.series.len())?;
        let removed = self.series.remove(index);
        self.notifier.fire(ChangeKind::Dataset)?;
        Ok(removed)
    }

    pub fn remove_all_series(&mut self) -> Result<()> {
        self.series.clear();
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn add(&mut self, series: usize, x: f64, y: impl Into<Option<f64>>) -> Result<()> {
        self.modify_series(series, |s| s.add(x, y))
    }

    pub fn update_y(&mut self, series: usize, x: f64, y: impl Into<Option<f64>>) -> Result<()> {
        self.modify_series(series, |s| s.update_y(x, y))
    }

    pub fn remove_item(&mut self, series: usize, index: usize) -> Result<XyItem> {
        self.modify_series(series, |s| s.remove(index))
    }

    pub fn clear_series(&mut self, series: usize) -> Result<()> {
        self.modify_series(series, |s| {
            s.clear();
            Ok(())
        })
    }

    /// Apply several edits to one series and fire a single event afterwards.
    /// No event is fired when `edit` fails.
    pub fn modify_series<R>(&mut self, series: usize, edit: impl FnOnce(&mut XySeries) -> Result<R>) -> Result<R> {
        check_index(series, self.series.len())?;
        let out = edit(&mut self.series[series])?;
        self.notifier.fire(ChangeKind::Series { index: series })?;
        Ok(out)
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
            .or_else(|| self.series.iter().filter_map(XySeries::min_x_gap).reduce(f64::min))
            .unwrap_or(1.0)
    }

    pub fn set_interval_width(&mut self, width: Option<f64>) -> Result<()> {
        if let Some(w) = width {
            if !(w > 0.0) {
                return Err(ChartError::invalid("interval width must be positive"));
            }
        }
        self.interval_width = width;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn set_interval_position(&mut self, position: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&position) {
            return Err(ChartError::invalid("interval position must be within 0..=1"));
        }
        self.interval_position = position;
        self.notifier.fire(ChangeKind::Dataset)
    }
}

impl XyDataset for XySeriesCollection {
    fn series_count(&self) -> usize { self.series.len() }
    fn series_key(&self, series: usize) -> &str { &self.series[series].key }
    fn item_count(&self, series: usize) -> usize { self.series[series].items.len() }
    fn x(&self, series: usize, item: usize) -> f64 { self.series[series].items[item].x }
    fn y(&self, series: usize, item: usize) -> Option<f64> { self.series[series].items[item].y }

    fn start_x(&self, series: usize, item: usize) -> f64 {
        self.x(series, item) - self.interval_width() * self.interval_position
    }

    fn end_x(&self, series: usize, item: usize) -> f64 {
        self.start_x(series, item) + self.interval_width()
    }
}

impl Observable for XySeriesCollection {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
