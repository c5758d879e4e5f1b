// File: crates/chart-core/src/data/pie.rs
// Summary: Pie dataset: ordered keyed values with change notification.

use serde::{Deserialize, Serialize};

use crate::data::keyed::KeyedValues;
use crate::error::Result;
use crate::event::{ChangeKind, Notifier, Observable};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PieDataset {
    data: KeyedValues,
    #[serde(skip)]
    notifier: Notifier,
}

impl PieDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.data.keys() }
    pub fn key(&self, index: usize) -> Option<&str> { self.data.key(index) }
    pub fn index_of(&self, key: &str) -> Option<usize> { self.data.index_of(key) }
    pub fn value(&self, key: &str) -> Option<f64> { self.data.value(key) }
    pub fn value_at(&self, index: usize) -> Option<f64> { self.data.value_at(index) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> { self.data.iter() }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Option<f64>>) -> Result<()> {
        self.data.set_value(key, value.into());
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn insert_value(&mut self, position: usize, key: impl Into<String>, value: impl Into<Option<f64>>) -> Result<()> {
        self.data.insert_value(position, key, value.into())?;
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.data.remove_value(key)?;
        self.notifier.fire(ChangeKind::Dataset)
    }

    /// Remove every item. Fires only if there was something to remove.
    pub fn clear(&mut self) -> Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        self.data.clear();
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn sort_by_keys(&mut self, descending: bool) -> Result<()> {
        self.data.sort_by_keys(descending);
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn sort_by_values(&mut self, descending: bool) -> Result<()> {
        self.data.sort_by_values(descending);
        self.notifier.fire(ChangeKind::Dataset)
    }

    /// Sum of the positive values; absent and non-positive values are ignored.
    pub fn total(&self) -> f64 {
        self.data.iter().filter_map(|(_, v)| v).filter(|v| *v > 0.0).sum()
    }

    /// Copy in which items below `minimum_percent` of the total are folded into
    /// a single `other_key` item, provided at least `min_items` qualify.
    pub fn consolidated(&self, other_key: &str, minimum_percent: f64, min_items: usize) -> PieDataset {
        let total = self.total();
        let small: Vec<&str> = self
            .data
            .iter()
            .filter_map(|(k, v)| v.filter(|v| v / total < minimum_percent).map(|_| k))
            .collect();
        let fold = small.len() >= min_items;
        let mut result = PieDataset::new();
        let mut other = 0.0;
        for (k, v) in self.data.iter() {
            let Some(v) = v else { continue };
            if fold && small.contains(&k) {
                other += v;
            } else {
                result.data.set_value(k, Some(v));
            }
        }
        if fold {
            result.data.set_value(other_key, Some(other));
        }
        result
    }
}

impl Observable for PieDataset {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
