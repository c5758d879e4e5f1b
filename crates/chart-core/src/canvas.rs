// File: crates/chart-core/src/canvas.rs
// Summary: Drawing primitives and the Canvas seam to a 2D backend, plus a recording canvas.
// Notes:
// - Arc angles are in degrees, 0 at three o'clock, positive counter-clockwise on
//   screen (y grows downwards).

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::paint::{Color, Font, Stroke};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcClosure {
    /// Just the arc.
    Open,
    /// Arc closed through the center (pie wedge).
    Pie,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line { from: Point, to: Point },
    Rect(Rect),
    Ellipse(Rect),
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
    Arc { center: Point, radius: f64, start_deg: f64, extent_deg: f64, closure: ArcClosure },
}

/// Tolerance in pixels for hit testing on line-like shapes.
const LINE_HIT_TOLERANCE: f64 = 2.0;

impl Shape {
    pub fn line(from: Point, to: Point) -> Self {
        Shape::Line { from, to }
    }

    /// Point on a circle at `deg` using the arc angle convention.
    pub fn point_on_circle(center: Point, radius: f64, deg: f64) -> Point {
        let r = deg.to_radians();
        Point::new(center.x + radius * r.cos(), center.y - radius * r.sin())
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Line { from, to } => Rect::from_points(*from, *to),
            Shape::Rect(r) | Shape::Ellipse(r) => *r,
            Shape::Polyline(pts) | Shape::Polygon(pts) => points_bounds(pts),
            Shape::Arc { center, radius, .. } => {
                Rect::from_ltrb(center.x - radius, center.y - radius, center.x + radius, center.y + radius)
            }
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Line { from, to } => segment_distance(p, *from, *to) <= LINE_HIT_TOLERANCE,
            Shape::Polyline(pts) => pts.windows(2).any(|w| segment_distance(p, w[0], w[1]) <= LINE_HIT_TOLERANCE),
            Shape::Rect(r) => r.contains(p),
            Shape::Ellipse(r) => {
                let c = r.center();
                let (rx, ry) = (r.width() * 0.5, r.height() * 0.5);
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - c.x) / rx;
                let dy = (p.y - c.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Shape::Polygon(pts) => polygon_contains(pts, p),
            Shape::Arc { center, radius, start_deg, extent_deg, closure } => {
                let d = p.distance(*center);
                match closure {
                    ArcClosure::Open => (d - radius).abs() <= LINE_HIT_TOLERANCE && angle_within(*center, p, *start_deg, *extent_deg),
                    ArcClosure::Pie => d <= *radius && angle_within(*center, p, *start_deg, *extent_deg),
                }
            }
        }
    }
}

fn points_bounds(pts: &[Point]) -> Rect {
    let mut it = pts.iter();
    let Some(first) = it.next() else { return Rect::default() };
    it.fold(Rect::from_points(*first, *first), |acc, p| acc.union(&Rect::from_points(*p, *p)))
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

fn polygon_contains(pts: &[Point], p: Point) -> bool {
    if pts.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn angle_within(center: Point, p: Point, start_deg: f64, extent_deg: f64) -> bool {
    if extent_deg.abs() >= 360.0 {
        return true;
    }
    let angle = (-(p.y - center.y)).atan2(p.x - center.x).to_degrees();
    let (lo, span) = if extent_deg >= 0.0 { (start_deg, extent_deg) } else { (start_deg + extent_deg, -extent_deg) };
    (angle - lo).rem_euclid(360.0) <= span
}

/// Marker shapes drawn at data points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Square,
    Circle,
    UpTriangle,
    Diamond,
    DownTriangle,
}

impl Marker {
    /// Default marker sequence handed out per series.
    pub const SEQUENCE: [Marker; 5] = [Marker::Square, Marker::Circle, Marker::UpTriangle, Marker::Diamond, Marker::DownTriangle];

    /// Shape of this marker with `size` pixels across, centered on `c`.
    pub fn at(self, c: Point, size: f64) -> Shape {
        let h = size * 0.5;
        match self {
            Marker::Square => Shape::Rect(Rect::from_ltrb(c.x - h, c.y - h, c.x + h, c.y + h)),
            Marker::Circle => Shape::Ellipse(Rect::from_ltrb(c.x - h, c.y - h, c.x + h, c.y + h)),
            Marker::UpTriangle => Shape::Polygon(vec![
                Point::new(c.x, c.y - h),
                Point::new(c.x + h, c.y + h),
                Point::new(c.x - h, c.y + h),
            ]),
            Marker::DownTriangle => Shape::Polygon(vec![
                Point::new(c.x - h, c.y - h),
                Point::new(c.x + h, c.y - h),
                Point::new(c.x, c.y + h),
            ]),
            Marker::Diamond => Shape::Polygon(vec![
                Point::new(c.x, c.y - h),
                Point::new(c.x + h, c.y),
                Point::new(c.x, c.y + h),
                Point::new(c.x - h, c.y),
            ]),
        }
    }
}

/// Which point of the text box sits on the anchor coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl TextAnchor {
    /// Top-left corner of a `width` x `height` box anchored at `at`.
    pub fn top_left(self, at: Point, width: f64, height: f64) -> Point {
        let dx = match self {
            TextAnchor::TopLeft | TextAnchor::CenterLeft | TextAnchor::BottomLeft => 0.0,
            TextAnchor::TopCenter | TextAnchor::Center | TextAnchor::BottomCenter => width * 0.5,
            TextAnchor::TopRight | TextAnchor::CenterRight | TextAnchor::BottomRight => width,
        };
        let dy = match self {
            TextAnchor::TopLeft | TextAnchor::TopCenter | TextAnchor::TopRight => 0.0,
            TextAnchor::CenterLeft | TextAnchor::Center | TextAnchor::CenterRight => height * 0.5,
            TextAnchor::BottomLeft | TextAnchor::BottomCenter | TextAnchor::BottomRight => height,
        };
        Point::new(at.x - dx, at.y - dy)
    }
}

/// A 2D drawing surface. Implemented by rendering backends.
pub trait Canvas {
    fn fill(&mut self, shape: &Shape, color: Color);
    fn stroke(&mut self, shape: &Shape, color: Color, stroke: &Stroke);
    fn text(&mut self, text: &str, at: Point, anchor: TextAnchor, font: &Font, color: Color);

    /// Advance width of `text`. Backends without shaping use this estimate.
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size * 0.6
    }

    fn text_height(&self, font: &Font) -> f64 {
        font.size * 1.2
    }

    fn clip(&mut self, rect: Rect);
    fn reset_clip(&mut self);
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Fill { shape: Shape, color: Color },
    Stroke { shape: Shape, color: Color, stroke: Stroke },
    Text { text: String, at: Point, anchor: TextAnchor, size: f64, color: Color },
    Clip(Rect),
    ResetClip,
}

/// Canvas that records every call. Used headless and in tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Shape, Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { shape, color } => Some((shape, *color)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&Shape, Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke { shape, color, .. } => Some((shape, *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill(&mut self, shape: &Shape, color: Color) {
        self.ops.push(DrawOp::Fill { shape: shape.clone(), color });
    }

    fn stroke(&mut self, shape: &Shape, color: Color, stroke: &Stroke) {
        self.ops.push(DrawOp::Stroke { shape: shape.clone(), color, stroke: stroke.clone() });
    }

    fn text(&mut self, text: &str, at: Point, anchor: TextAnchor, font: &Font, color: Color) {
        self.ops.push(DrawOp::Text { text: text.to_string(), at, anchor, size: font.size, color });
    }

    fn clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn reset_clip(&mut self) {
        self.ops.push(DrawOp::ResetClip);
    }
}
