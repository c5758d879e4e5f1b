// File: crates/chart-core/src/entity.rs
// Summary: Hit-testable regions recorded while drawing, and the per-draw rendering info.

use crate::canvas::Shape;
use crate::geometry::{Point, Rect};

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    XyItem { dataset: usize, series: usize, item: usize },
    CategoryItem { dataset: usize, row: usize, column: usize },
    PieSection { index: usize, key: String },
    Annotation { index: usize },
    DomainAxis,
    RangeAxis,
    Plot,
    Title,
    LegendItem { series: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartEntity {
    pub area: Shape,
    pub kind: EntityKind,
    pub tooltip: Option<String>,
    pub url: Option<String>,
}

impl ChartEntity {
    pub fn new(area: Shape, kind: EntityKind) -> Self {
        Self { area, kind, tooltip: None, url: None }
    }
}

/// Entities in drawing order; later entities sit on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityCollection {
    entities: Vec<ChartEntity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: ChartEntity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize { self.entities.len() }
    pub fn is_empty(&self) -> bool { self.entities.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &ChartEntity> { self.entities.iter() }
    pub fn get(&self, index: usize) -> Option<&ChartEntity> { self.entities.get(index) }

    /// The top-most entity whose area contains `p`.
    pub fn entity_at(&self, p: Point) -> Option<&ChartEntity> {
        self.entities.iter().rev().find(|e| e.area.contains(p))
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// What one `Chart::draw` produced, for hit testing and tooltips.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartRenderingInfo {
    pub chart_area: Rect,
    pub plot_area: Rect,
    /// Area inside the axes where data is drawn.
    pub data_area: Rect,
    pub entities: EntityCollection,
}
