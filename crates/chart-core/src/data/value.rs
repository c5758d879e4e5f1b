// File: crates/chart-core/src/data/value.rs
// Summary: Single-value dataset feeding the dial plot.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{ChangeKind, Notifier, Observable};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDataset {
    value: Option<f64>,
    #[serde(skip)]
    notifier: Notifier,
}

impl ValueDataset {
    pub fn new(value: impl Into<Option<f64>>) -> Self {
        Self { value: value.into(), notifier: Notifier::new() }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: impl Into<Option<f64>>) -> Result<()> {
        self.value = value.into();
        self.notifier.fire(ChangeKind::Dataset)
    }
}

impl Observable for ValueDataset {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
