// File: crates/chart-core/src/geometry.rs
// Summary: Lightweight geometry helpers for layout and hit testing (Java2D-style, y grows down).

use serde::{Deserialize, Serialize};

use crate::types::Insets;

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    /// Normalised rectangle spanning two corners in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::from_ltrb(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right && other.left <= self.right && self.top <= other.bottom && other.top <= self.bottom
    }
    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ltrb(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
    /// Shrink by `insets`; never produces a negative size.
    pub fn shrink(&self, insets: &Insets) -> Rect {
        let left = self.left + insets.left;
        let top = self.top + insets.top;
        let right = (self.right - insets.right).max(left);
        let bottom = (self.bottom - insets.bottom).max(top);
        Rect::from_ltrb(left, top, right, bottom)
    }
    pub fn grow(&self, d: f64) -> Rect {
        Rect::from_ltrb(self.left - d, self.top - d, self.right + d, self.bottom + d)
    }
}

/// Side of the data area an axis is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// Direction of the range axis: `Vertical` puts the domain along X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn domain_edge(self) -> Edge {
        match self {
            Orientation::Vertical => Edge::Bottom,
            Orientation::Horizontal => Edge::Left,
        }
    }
    pub fn range_edge(self) -> Edge {
        match self {
            Orientation::Vertical => Edge::Left,
            Orientation::Horizontal => Edge::Bottom,
        }
    }
    /// Screen point for a (domain, range) pair of already-translated coordinates.
    pub fn point(self, domain_px: f64, range_px: f64) -> Point {
        match self {
            Orientation::Vertical => Point::new(domain_px, range_px),
            Orientation::Horizontal => Point::new(range_px, domain_px),
        }
    }
}
