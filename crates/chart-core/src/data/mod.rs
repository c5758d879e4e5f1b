// File: crates/chart-core/src/data/mod.rs
// Summary: Dataset layer: keyed containers, read traits shared by plots and renderers, range helpers.
// Notes:
// - Read traits index by position; positions must be valid (like slice indexing).
// - Every concrete dataset owns a `Notifier` and fires exactly one event per
//   successful mutating call.

pub mod category;
pub mod gantt;
pub mod keyed;
pub mod ohlc;
pub mod pie;
pub mod range;
pub mod time;
pub mod utils;
pub mod value;
pub mod xy;

pub use category::CategoryTable;
pub use gantt::{Task, TaskSeries, TaskSeriesCollection, TimeSpan};
pub use keyed::{KeyedValues, KeyedValues2D};
pub use ohlc::{Ohlc, OhlcItem, OhlcSeries, OhlcSeriesCollection};
pub use pie::PieDataset;
pub use range::Range;
pub use time::{PeriodAnchor, PeriodKind, TimePeriod, TimeSeries, TimeSeriesCollection};
pub use value::ValueDataset;
pub use xy::{XyItem, XySeries, XySeriesCollection};

/// Read access to series of (x, y) items, optionally with intervals and OHLC values.
pub trait XyDataset {
    fn series_count(&self) -> usize;
    fn series_key(&self, series: usize) -> &str;
    fn item_count(&self, series: usize) -> usize;
    fn x(&self, series: usize, item: usize) -> f64;
    fn y(&self, series: usize, item: usize) -> Option<f64>;

    fn start_x(&self, series: usize, item: usize) -> f64 {
        self.x(series, item)
    }
    fn end_x(&self, series: usize, item: usize) -> f64 {
        self.x(series, item)
    }
    fn start_y(&self, series: usize, item: usize) -> Option<f64> {
        self.y(series, item)
    }
    fn end_y(&self, series: usize, item: usize) -> Option<f64> {
        self.y(series, item)
    }
    fn ohlc(&self, _series: usize, _item: usize) -> Option<Ohlc> {
        None
    }
}

/// Read access to a table of values: rows are series, columns are categories.
pub trait CategoryDataset {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn row_key(&self, row: usize) -> &str;
    fn column_key(&self, column: usize) -> &str;
    fn value(&self, row: usize, column: usize) -> Option<f64>;

    /// Start and end of an interval item (gantt tasks).
    fn interval(&self, _row: usize, _column: usize) -> Option<(f64, f64)> {
        None
    }
    fn percent_complete(&self, _row: usize, _column: usize) -> Option<f64> {
        None
    }
}
