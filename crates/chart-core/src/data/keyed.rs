// File: crates/chart-core/src/data/keyed.rs
// Summary: Ordered keyed value containers backing the pie and category datasets.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{check_index, ChartError, Result};

/// Ordered mapping of unique keys to optional values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyedValues {
    entries: IndexMap<String, Option<f64>>,
}

impl KeyedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.entries.get_index(index).map(|(k, _)| k.as_str())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Value for `key`; `None` both for unknown keys and for absent values.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied().flatten()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.entries.get_index(index).and_then(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Replace the value of an existing key in place, or append a new key.
    pub fn set_value(&mut self, key: impl Into<String>, value: Option<f64>) {
        self.entries.insert(key.into(), value);
    }

    /// Insert at `position`; an existing key is moved there.
    pub fn insert_value(&mut self, position: usize, key: impl Into<String>, value: Option<f64>) -> Result<()> {
        if position > self.entries.len() {
            return Err(ChartError::IndexOutOfBounds { index: position, len: self.entries.len() });
        }
        let key = key.into();
        self.entries.shift_remove(&key);
        let position = position.min(self.entries.len());
        self.entries.shift_insert(position, key, value);
        Ok(())
    }

    pub fn remove_value(&mut self, key: &str) -> Result<Option<f64>> {
        self.entries.shift_remove(key).ok_or_else(|| ChartError::UnknownKey(key.to_string()))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<(String, Option<f64>)> {
        check_index(index, self.entries.len())?;
        self.entries.shift_remove_index(index).ok_or(ChartError::IndexOutOfBounds { index, len: self.entries.len() })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn sort_by_keys(&mut self, descending: bool) {
        self.entries.sort_by(|a, _, b, _| if descending { b.cmp(a) } else { a.cmp(b) });
    }

    /// Sort by value; absent values always go last.
    pub fn sort_by_values(&mut self, descending: bool) {
        self.entries.sort_by(|_, a, _, b| compare_optional(*a, *b, descending));
    }
}

fn compare_optional(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let o = x.total_cmp(&y);
            if descending { o.reverse() } else { o }
        }
    }
}

/// Table of optional values indexed by (row key, column key).
///
/// Column order is shared by all rows; a row need not hold every column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "KeyedValues2DRepr")]
pub struct KeyedValues2D {
    rows: IndexMap<String, IndexMap<String, Option<f64>>>,
    columns: IndexSet<String>,
}

/// Loaded tables are rebuilt cell by cell so every row column is listed.
#[derive(Deserialize)]
struct KeyedValues2DRepr {
    rows: IndexMap<String, IndexMap<String, Option<f64>>>,
    columns: IndexSet<String>,
}

impl From<KeyedValues2DRepr> for KeyedValues2D {
    fn from(r: KeyedValues2DRepr) -> Self {
        let mut table = KeyedValues2D { rows: IndexMap::new(), columns: r.columns };
        for (row_key, cells) in r.rows {
            table.rows.entry(row_key.clone()).or_default();
            for (column_key, value) in cells {
                table.set_value(value, row_key.clone(), column_key);
            }
        }
        table
    }
}

impl KeyedValues2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize { self.rows.len() }
    pub fn column_count(&self) -> usize { self.columns.len() }

    pub fn row_keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn row_key(&self, row: usize) -> Option<&str> {
        self.rows.get_index(row).map(|(k, _)| k.as_str())
    }

    pub fn column_key(&self, column: usize) -> Option<&str> {
        self.columns.get_index(column).map(String::as_str)
    }

    pub fn row_index(&self, key: &str) -> Option<usize> {
        self.rows.get_index_of(key)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.get_index_of(key)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        let column_key = self.columns.get_index(column)?;
        self.rows.get_index(row)?.1.get(column_key).copied().flatten()
    }

    pub fn value_by_key(&self, row_key: &str, column_key: &str) -> Option<f64> {
        self.rows.get(row_key)?.get(column_key).copied().flatten()
    }

    /// Set a cell, creating the row and column as needed.
    pub fn set_value(&mut self, value: Option<f64>, row_key: impl Into<String>, column_key: impl Into<String>) {
        let column_key = column_key.into();
        self.columns.insert(column_key.clone());
        self.rows.entry(row_key.into()).or_default().insert(column_key, value);
    }

    /// Clear a cell, then drop its row and column if nothing but absent values remain.
    pub fn remove_value(&mut self, row_key: &str, column_key: &str) -> Result<()> {
        let row = self.rows.get_mut(row_key).ok_or_else(|| ChartError::UnknownKey(row_key.to_string()))?;
        if !self.columns.contains(column_key) {
            return Err(ChartError::UnknownKey(column_key.to_string()));
        }
        row.insert(column_key.to_string(), None);
        if row.values().all(Option::is_none) {
            self.rows.shift_remove(row_key);
        }
        let column_empty = self.rows.values().all(|r| r.get(column_key).copied().flatten().is_none());
        if column_empty {
            self.remove_column(column_key)?;
        }
        Ok(())
    }

    pub fn remove_row(&mut self, row_key: &str) -> Result<()> {
        self.rows.shift_remove(row_key).map(|_| ()).ok_or_else(|| ChartError::UnknownKey(row_key.to_string()))
    }

    pub fn remove_column(&mut self, column_key: &str) -> Result<()> {
        if !self.columns.shift_remove(column_key) {
            return Err(ChartError::UnknownKey(column_key.to_string()));
        }
        for row in self.rows.values_mut() {
            row.shift_remove(column_key);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }
}
