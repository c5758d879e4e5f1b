// File: crates/chart-render-skia/src/canvas.rs
// Summary: Skia implementation of the core Canvas seam.
// Notes:
// - Core arcs run counter-clockwise on screen; Skia sweeps clockwise, so
//   angles are negated on the way through.

use freechart_core::{ArcClosure, Canvas, Color, Font, Point, Rect, Shape, Stroke, TextAnchor};
use skia_safe as skia;

use crate::text::TextShaper;

pub(crate) fn to_skia_color(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn to_skia_rect(r: &Rect) -> skia::Rect {
    skia::Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
}

fn to_skia_point(p: Point) -> skia::Point {
    skia::Point::new(p.x as f32, p.y as f32)
}

fn polyline_path(points: &[Point], close: bool) -> skia::Path {
    let mut path = skia::Path::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(to_skia_point(*first));
        for p in rest {
            path.line_to(to_skia_point(*p));
        }
        if close {
            path.close();
        }
    }
    path
}

pub struct SkiaCanvas<'a> {
    canvas: &'a skia::Canvas,
    shaper: &'a TextShaper,
    draw_labels: bool,
    clip_depth: usize,
}

impl<'a> SkiaCanvas<'a> {
    pub fn new(canvas: &'a skia::Canvas, shaper: &'a TextShaper, draw_labels: bool) -> Self {
        Self { canvas, shaper, draw_labels, clip_depth: 0 }
    }

    fn draw(&self, shape: &Shape, paint: &skia::Paint) {
        match shape {
            Shape::Line { from, to } => {
                self.canvas.draw_line(to_skia_point(*from), to_skia_point(*to), paint);
            }
            Shape::Rect(r) => {
                self.canvas.draw_rect(to_skia_rect(r), paint);
            }
            Shape::Ellipse(r) => {
                self.canvas.draw_oval(to_skia_rect(r), paint);
            }
            Shape::Polyline(points) => {
                self.canvas.draw_path(&polyline_path(points, false), paint);
            }
            Shape::Polygon(points) => {
                self.canvas.draw_path(&polyline_path(points, true), paint);
            }
            Shape::Arc { center, radius, start_deg, extent_deg, closure } => {
                let oval = skia::Rect::from_ltrb(
                    (center.x - radius) as f32,
                    (center.y - radius) as f32,
                    (center.x + radius) as f32,
                    (center.y + radius) as f32,
                );
                let use_center = matches!(closure, ArcClosure::Pie);
                self.canvas.draw_arc(oval, -*start_deg as f32, -*extent_deg as f32, use_center, paint);
            }
        }
    }
}

impl Canvas for SkiaCanvas<'_> {
    fn fill(&mut self, shape: &Shape, color: Color) {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Fill);
        paint.set_color(to_skia_color(color));
        self.draw(shape, &paint);
    }

    fn stroke(&mut self, shape: &Shape, color: Color, stroke: &Stroke) {
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Stroke);
        paint.set_stroke_width(stroke.width as f32);
        paint.set_color(to_skia_color(color));
        if !stroke.dash.is_empty() {
            let intervals: Vec<f32> = stroke.dash.iter().map(|d| *d as f32).collect();
            paint.set_path_effect(skia::PathEffect::dash(&intervals, 0.0));
        }
        self.draw(shape, &paint);
    }

    fn text(&mut self, text: &str, at: Point, anchor: TextAnchor, font: &Font, color: Color) {
        if !self.draw_labels || text.is_empty() {
            return;
        }
        let (w, h) = self.shaper.measure(text, font);
        let tl = anchor.top_left(at, w as f64, h as f64);
        self.shaper.draw_top_left(self.canvas, text, tl.x as f32, tl.y as f32, font, to_skia_color(color));
    }

    // Without labels the layout uses fixed estimates so output does not
    // depend on installed fonts.
    fn text_width(&self, text: &str, font: &Font) -> f64 {
        if self.draw_labels {
            self.shaper.measure(text, font).0 as f64
        } else {
            text.chars().count() as f64 * font.size * 0.6
        }
    }

    fn text_height(&self, font: &Font) -> f64 {
        if self.draw_labels { self.shaper.measure("Ag", font).1 as f64 } else { font.size * 1.2 }
    }

    fn clip(&mut self, rect: Rect) {
        self.canvas.save();
        self.canvas.clip_rect(to_skia_rect(&rect), None, Some(true));
        self.clip_depth += 1;
    }

    fn reset_clip(&mut self) {
        while self.clip_depth > 0 {
            self.canvas.restore();
            self.clip_depth -= 1;
        }
    }
}
