// File: crates/chart-core/src/axis/mod.rs
// Summary: Axes: numeric value axes (linear, log, date) and category axes.

pub mod category;
pub mod value;

pub use category::CategoryAxis;
pub use value::{AxisScale, TickLabels, ValueAxis};
