// File: crates/chart-core/src/data/category.rs
// Summary: Category table dataset (rows = series, columns = categories).

use serde::{Deserialize, Serialize};

use crate::data::keyed::KeyedValues2D;
use crate::data::CategoryDataset;
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    data: KeyedValues2D,
    #[serde(skip)]
    notifier: Notifier,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &str> { self.data.row_keys() }
    pub fn column_keys(&self) -> impl Iterator<Item = &str> { self.data.column_keys() }
    pub fn row_index(&self, key: &str) -> Option<usize> { self.data.row_index(key) }
    pub fn column_index(&self, key: &str) -> Option<usize> { self.data.column_index(key) }

    pub fn value_by_key(&self, row_key: &str, column_key: &str) -> Option<f64> {
        self.data.value_by_key(row_key, column_key)
    }

    /// Set a cell, adding the row and column keys if they are new.
    pub fn set_value(&mut self, value: impl Into<Option<f64>>, row_key: impl Into<String>, column_key: impl Into<String>) -> Result<()> {
        self.data.set_value(value.into(), row_key, column_key);
        self.notifier.fire(ChangeKind::Dataset)
    }

    /// Same as [`set_value`](Self::set_value).
    pub fn add_value(&mut self, value: impl Into<Option<f64>>, row_key: impl Into<String>, column_key: impl Into<String>) -> Result<()> {
        self.set_value(value, row_key, column_key)
    }

    /// Add `delta` to an existing cell; an absent value counts as zero.
    pub fn increment_value(&mut self, delta: f64, row_key: &str, column_key: &str) -> Result<()> {
        if self.data.row_index(row_key).is_none() {
            return Err(ChartError::UnknownKey(row_key.to_string()));
        }
        if self.data.column_index(column_key).is_none() {
            return Err(ChartError::UnknownKey(column_key.to_string()));
        }
        let current = self.data.value_by_key(row_key, column_key).unwrap_or(0.0);
        self.set_value(current + delta, row_key, column_key)
    }

    pub fn remove_value(&mut self, row_key: &str, column_key: &str) -> Result<()> {
        self.data.remove_value(row_key, column_key)?;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_row(&mut self, row_key: &str) -> Result<()> {
        self.data.remove_row(row_key)?;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_column(&mut self, column_key: &str) -> Result<()> {
        self.data.remove_column(column_key)?;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data.clear();
        self.notifier.fire(ChangeKind::Dataset)
    }
}

impl CategoryDataset for CategoryTable {
    fn row_count(&self) -> usize { self.data.row_count() }
    fn column_count(&self) -> usize { self.data.column_count() }
    fn row_key(&self, row: usize) -> &str { self.data.row_key(row).unwrap_or("") }
    fn column_key(&self, column: usize) -> &str { self.data.column_key(column).unwrap_or("") }
    fn value(&self, row: usize, column: usize) -> Option<f64> { self.data.value(row, column) }
}

impl Observable for CategoryTable {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
