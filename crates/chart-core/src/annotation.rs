// File: crates/chart-core/src/annotation.rs
// Summary: Overlay layer for XY plots: annotations in data coordinates and crosshairs.
// Notes:
// - Annotations are drawn after the renderers, clipped to the data area.
// - Each annotation and crosshair owns a notifier; the owning plot relays it.

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape, TextAnchor};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, Result};
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::Rect;
use crate::paint::{Color, Font, Stroke};
use crate::renderer::XyContext;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum XyAnnotationKind {
    Line { from: (f64, f64), to: (f64, f64), paint: Color, stroke: Stroke },
    Text { text: String, at: (f64, f64), anchor: TextAnchor, font: Font, paint: Color },
    /// Rectangle between two corners.
    Box { corner: (f64, f64), opposite: (f64, f64), outline: Option<(Color, Stroke)>, fill: Option<Color> },
    Polygon { points: Vec<(f64, f64)>, outline: Option<(Color, Stroke)>, fill: Option<Color> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "XyAnnotationRepr")]
pub struct XyAnnotation {
    kind: XyAnnotationKind,
    tooltip: Option<String>,
    url: Option<String>,
    #[serde(skip)]
    notifier: Notifier,
}

#[derive(Deserialize)]
struct XyAnnotationRepr {
    kind: XyAnnotationKind,
    tooltip: Option<String>,
    url: Option<String>,
}

impl TryFrom<XyAnnotationRepr> for XyAnnotation {
    type Error = ChartError;

    fn try_from(r: XyAnnotationRepr) -> Result<Self> {
        let mut annotation = XyAnnotation::new(r.kind)?;
        annotation.tooltip = r.tooltip;
        annotation.url = r.url;
        Ok(annotation)
    }
}

impl XyAnnotation {
    pub fn new(kind: XyAnnotationKind) -> Result<Self> {
        validate(&kind)?;
        Ok(Self { kind, tooltip: None, url: None, notifier: Notifier::new() })
    }

    pub fn line(from: (f64, f64), to: (f64, f64), paint: Color) -> Self {
        Self::from_kind(XyAnnotationKind::Line { from, to, paint, stroke: Stroke::new(1.0) })
    }

    pub fn text(text: impl Into<String>, at: (f64, f64)) -> Self {
        Self::from_kind(XyAnnotationKind::Text {
            text: text.into(),
            at,
            anchor: TextAnchor::Center,
            font: Font::default(),
            paint: Color::BLACK,
        })
    }

    pub fn rect(corner: (f64, f64), opposite: (f64, f64), fill: Color) -> Self {
        Self::from_kind(XyAnnotationKind::Box { corner, opposite, outline: None, fill: Some(fill) })
    }

    pub fn polygon(points: Vec<(f64, f64)>, fill: Color) -> Result<Self> {
        Self::new(XyAnnotationKind::Polygon { points, outline: None, fill: Some(fill) })
    }

    fn from_kind(kind: XyAnnotationKind) -> Self {
        Self { kind, tooltip: None, url: None, notifier: Notifier::new() }
    }

    pub fn kind(&self) -> &XyAnnotationKind { &self.kind }
    pub fn tooltip(&self) -> Option<&str> { self.tooltip.as_deref() }
    pub fn url(&self) -> Option<&str> { self.url.as_deref() }

    pub fn set_kind(&mut self, kind: XyAnnotationKind) -> Result<()> {
        validate(&kind)?;
        self.kind = kind;
        self.notifier.fire(ChangeKind::Annotation)
    }

    pub fn set_tooltip(&mut self, tooltip: Option<String>) -> Result<()> {
        self.tooltip = tooltip;
        self.notifier.fire(ChangeKind::Annotation)
    }

    pub fn set_url(&mut self, url: Option<String>) -> Result<()> {
        self.url = url;
        self.notifier.fire(ChangeKind::Annotation)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, ctx: &XyContext, index: usize, entities: Option<&mut EntityCollection>) {
        let at = |(x, y): (f64, f64)| ctx.point(ctx.domain_px(x), ctx.range_px(y));
        let hit = match &self.kind {
            XyAnnotationKind::Line { from, to, paint, stroke } => {
                let shape = Shape::line(at(*from), at(*to));
                canvas.stroke(&shape, *paint, stroke);
                shape
            }
            XyAnnotationKind::Text { text, at: pos, anchor, font, paint } => {
                let p = at(*pos);
                canvas.text(text, p, *anchor, font, *paint);
                let (w, h) = (canvas.text_width(text, font), canvas.text_height(font));
                let tl = anchor.top_left(p, w, h);
                Shape::Rect(Rect::from_ltwh(tl.x, tl.y, w, h))
            }
            XyAnnotationKind::Box { corner, opposite, outline, fill } => {
                let shape = Shape::Rect(Rect::from_points(at(*corner), at(*opposite)));
                paint_shape(canvas, &shape, outline, *fill);
                shape
            }
            XyAnnotationKind::Polygon { points, outline, fill } => {
                let shape = Shape::Polygon(points.iter().map(|p| at(*p)).collect());
                paint_shape(canvas, &shape, outline, *fill);
                shape
            }
        };
        if let Some(entities) = entities {
            if self.tooltip.is_some() || self.url.is_some() {
                let mut e = ChartEntity::new(hit, EntityKind::Annotation { index });
                e.tooltip = self.tooltip.clone();
                e.url = self.url.clone();
                entities.add(e);
            }
        }
    }
}

impl Observable for XyAnnotation {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Annotation }
}

fn validate(kind: &XyAnnotationKind) -> Result<()> {
    let finite = |p: &(f64, f64)| p.0.is_finite() && p.1.is_finite();
    let ok = match kind {
        XyAnnotationKind::Line { from, to, .. } => finite(from) && finite(to),
        XyAnnotationKind::Text { at, .. } => finite(at),
        XyAnnotationKind::Box { corner, opposite, .. } => finite(corner) && finite(opposite),
        XyAnnotationKind::Polygon { points, .. } => points.len() >= 3 && points.iter().all(finite),
    };
    if ok { Ok(()) } else { Err(ChartError::invalid("annotation needs finite coordinates (polygons at least three points)")) }
}

fn paint_shape(canvas: &mut dyn Canvas, shape: &Shape, outline: &Option<(Color, Stroke)>, fill: Option<Color>) {
    if let Some(f) = fill {
        canvas.fill(shape, f);
    }
    if let Some((c, s)) = outline {
        canvas.stroke(shape, *c, s);
    }
}

/// A line across the data area at a fixed data value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crosshair {
    value: f64,
    visible: bool,
    /// `None` uses the theme's crosshair color.
    paint: Option<Color>,
    stroke: Stroke,
    /// Snap to the nearest data item when moved.
    locked_on_data: bool,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Crosshair {
    fn default() -> Self {
        Self {
            value: 0.0,
            visible: false,
            paint: None,
            stroke: Stroke::dashed(1.0, vec![4.0, 4.0]),
            locked_on_data: true,
            notifier: Notifier::new(),
        }
    }
}

impl Crosshair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 { self.value }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn paint(&self) -> Option<Color> { self.paint }
    pub fn stroke(&self) -> &Stroke { &self.stroke }
    pub fn is_locked_on_data(&self) -> bool { self.locked_on_data }

    pub fn set_value(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ChartError::invalid("crosshair value must be finite"));
        }
        if value == self.value {
            return Ok(());
        }
        self.value = value;
        self.notifier.fire(ChangeKind::Crosshair)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.notifier.fire(ChangeKind::Crosshair)
    }

    pub fn set_paint(&mut self, paint: Option<Color>) -> Result<()> {
        self.paint = paint;
        self.notifier.fire(ChangeKind::Crosshair)
    }

    pub fn set_stroke(&mut self, stroke: Stroke) -> Result<()> {
        self.stroke = stroke;
        self.notifier.fire(ChangeKind::Crosshair)
    }

    pub fn set_locked_on_data(&mut self, locked: bool) -> Result<()> {
        self.locked_on_data = locked;
        self.notifier.fire(ChangeKind::Crosshair)
    }

    /// Draw across the data area. `domain` selects which axis the value is on.
    pub fn draw(&self, canvas: &mut dyn Canvas, ctx: &XyContext, domain: bool) {
        if !self.visible {
            return;
        }
        let area = ctx.data_area;
        let paint = self.paint.unwrap_or(ctx.theme.crosshair);
        let (a, b) = if domain {
            let d = ctx.domain_px(self.value);
            let (r0, r1) = range_extent(ctx, &area);
            (ctx.point(d, r0), ctx.point(d, r1))
        } else {
            let r = ctx.range_px(self.value);
            let (d0, d1) = domain_extent(ctx, &area);
            (ctx.point(d0, r), ctx.point(d1, r))
        };
        if [a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            canvas.stroke(&Shape::line(a, b), paint, &self.stroke);
        }
    }
}

impl Observable for Crosshair {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Crosshair }
}

fn domain_extent(ctx: &XyContext, area: &Rect) -> (f64, f64) {
    if ctx.orientation.domain_edge().is_horizontal() { (area.left, area.right) } else { (area.top, area.bottom) }
}

fn range_extent(ctx: &XyContext, area: &Rect) -> (f64, f64) {
    if ctx.orientation.range_edge().is_horizontal() { (area.left, area.right) } else { (area.top, area.bottom) }
}
