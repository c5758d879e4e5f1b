// File: crates/chart-core/src/data/gantt.rs
// Summary: Gantt model: tasks with time spans grouped in task series.
// Notes:
// - As a category dataset, rows are task series and columns are the distinct
//   task descriptions in first-seen order.

use chrono::NaiveDateTime;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::data::CategoryDataset;
use crate::error::{check_index, ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};

/// Closed time interval with `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeSpanRepr")]
pub struct TimeSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct TimeSpanRepr {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<TimeSpanRepr> for TimeSpan {
    type Error = ChartError;

    fn try_from(r: TimeSpanRepr) -> Result<Self> {
        TimeSpan::new(r.start, r.end)
    }
}

impl TimeSpan {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ChartError::invalid("time span ends before it starts"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime { self.start }
    pub fn end(&self) -> NaiveDateTime { self.end }

    pub fn start_millis(&self) -> f64 {
        self.start.and_utc().timestamp_millis() as f64
    }

    pub fn end_millis(&self) -> f64 {
        self.end.and_utc().timestamp_millis() as f64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRepr")]
pub struct Task {
    description: String,
    duration: Option<TimeSpan>,
    percent_complete: Option<f64>,
    subtasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskRepr {
    description: String,
    duration: Option<TimeSpan>,
    percent_complete: Option<f64>,
    subtasks: Vec<Task>,
}

impl TryFrom<TaskRepr> for Task {
    type Error = ChartError;

    fn try_from(r: TaskRepr) -> Result<Self> {
        let mut task = Task::new(r.description, r.duration);
        task.set_percent_complete(r.percent_complete)?;
        task.subtasks = r.subtasks;
        Ok(task)
    }
}

impl Task {
    pub fn new(description: impl Into<String>, duration: impl Into<Option<TimeSpan>>) -> Self {
        Self { description: description.into(), duration: duration.into(), percent_complete: None, subtasks: Vec::new() }
    }

    pub fn description(&self) -> &str { &self.description }
    pub fn duration(&self) -> Option<TimeSpan> { self.duration }
    pub fn percent_complete(&self) -> Option<f64> { self.percent_complete }
    pub fn subtasks(&self) -> &[Task] { &self.subtasks }

    /// Completion as a fraction in `0..=1`.
    pub fn with_percent_complete(mut self, percent: f64) -> Result<Self> {
        self.set_percent_complete(Some(percent))?;
        Ok(self)
    }

    pub fn set_percent_complete(&mut self, percent: Option<f64>) -> Result<()> {
        if let Some(p) = percent {
            if !(0.0..=1.0).contains(&p) {
                return Err(ChartError::invalid(format!("percent complete {p} not in 0..=1")));
            }
        }
        self.percent_complete = percent;
        Ok(())
    }

    pub fn add_subtask(&mut self, task: Task) {
        self.subtasks.push(task);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskSeriesRepr")]
pub struct TaskSeries {
    key: String,
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskSeriesRepr {
    key: String,
    tasks: Vec<Task>,
}

impl TryFrom<TaskSeriesRepr> for TaskSeries {
    type Error = ChartError;

    fn try_from(r: TaskSeriesRepr) -> Result<Self> {
        let mut series = TaskSeries::new(r.key);
        for task in r.tasks {
            series.add(task)?;
        }
        Ok(series)
    }
}

impl TaskSeries {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), tasks: Vec::new() }
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn tasks(&self) -> &[Task] { &self.tasks }

    pub fn task(&self, description: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.description == description)
    }

    /// Task descriptions are unique within a series.
    pub fn add(&mut self, task: Task) -> Result<()> {
        if self.task(&task.description).is_some() {
            return Err(ChartError::DuplicateKey(task.description));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn remove(&mut self, description: &str) -> Result<Task> {
        let i = self
            .tasks
            .iter()
            .position(|t| t.description == description)
            .ok_or_else(|| ChartError::UnknownKey(description.to_string()))?;
        Ok(self.tasks.remove(i))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskSeriesCollectionRepr")]
pub struct TaskSeriesCollection {
    series: Vec<TaskSeries>,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct TaskSeriesCollectionRepr {
    series: Vec<TaskSeries>,
}

impl TryFrom<TaskSeriesCollectionRepr> for TaskSeriesCollection {
    type Error = ChartError;

    fn try_from(r: TaskSeriesCollectionRepr) -> Result<Self> {
        let mut c = TaskSeriesCollection::new();
        for s in r.series {
            c.add_series(s)?;
        }
        Ok(c)
    }
}

impl TaskSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, index: usize) -> Option<&TaskSeries> {
        self.series.get(index)
    }

    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key == key)
    }

    pub fn add_series(&mut self, series: TaskSeries) -> Result<()> {
        if self.series_index(&series.key).is_some() {
            return Err(ChartError::DuplicateKey(series.key));
        }
        self.series.push(series);
        self.notifier.fire(ChangeKind::Dataset)
    }

    pub fn remove_series(&mut self, index: usize) -> Result<TaskSeries> {
        check_index(index, self.series.len())?;
        let removed = self.series.remove(index);
        self.notifier.fire(ChangeKind::Dataset)?;
        Ok(removed)
    }

    pub fn add_task(&mut self, series: usize, task: Task) -> Result<()> {
        self.modify_series(series, |s| s.add(task))
    }

    pub fn remove_task(&mut self, series: usize, description: &str) -> Result<Task> {
        self.modify_series(series, |s| s.remove(description))
    }

    pub fn set_percent_complete(&mut self, series: usize, description: &str, percent: Option<f64>) -> Result<()> {
        self.modify_series(series, |s| {
            let task = s
                .tasks
                .iter_mut()
                .find(|t| t.description == description)
                .ok_or_else(|| ChartError::UnknownKey(description.to_string()))?;
            task.set_percent_complete(percent)
        })
    }

    pub fn modify_series<R>(&mut self, series: usize, edit: impl FnOnce(&mut TaskSeries) -> Result<R>) -> Result<R> {
        check_index(series, self.series.len())?;
        let out = edit(&mut self.series[series])?;
        self.notifier.fire(ChangeKind::Series { index: series })?;
        Ok(out)
    }

    fn descriptions(&self) -> IndexSet<&str> {
        self.series.iter().flat_map(|s| s.tasks.iter().map(|t| t.description.as_str())).collect()
    }

    fn task_at(&self, row: usize, column: usize) -> Option<&Task> {
        let description = *self.descriptions().get_index(column)?;
        self.series.get(row)?.task(description)
    }
}

impl CategoryDataset for TaskSeriesCollection {
    fn row_count(&self) -> usize { self.series.len() }
    fn column_count(&self) -> usize { self.descriptions().len() }
    fn row_key(&self, row: usize) -> &str { &self.series[row].key }

    fn column_key(&self, column: usize) -> &str {
        self.descriptions().get_index(column).copied().unwrap_or("")
    }

    /// Start of the task, in epoch milliseconds.
    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.interval(row, column).map(|(s, _)| s)
    }

    fn interval(&self, row: usize, column: usize) -> Option<(f64, f64)> {
        let span = self.task_at(row, column)?.duration?;
        Some((span.start_millis(), span.end_millis()))
    }

    fn percent_complete(&self, row: usize, column: usize) -> Option<f64> {
        self.task_at(row, column)?.percent_complete
    }
}

impl Observable for TaskSeriesCollection {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Dataset }
}
