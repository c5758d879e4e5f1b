// File: crates/chart-core/src/legend.rs
// Summary: Legend items derived from renderers and the legend block that lays them out.

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Marker, Shape, TextAnchor};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::Result;
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::{Edge, Point, Rect};
use crate::paint::{Color, Font, Stroke};
use crate::theme::Theme;

const SWATCH: f64 = 10.0;
const GAP: f64 = 6.0;
const ITEM_GAP: f64 = 14.0;

/// One entry of the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub paint: Color,
    /// Marker drawn as the swatch; `None` draws a filled square.
    pub marker: Option<Marker>,
    /// Draw a short line through the swatch (line-style renderers).
    pub line: bool,
    pub series: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    position: Edge,
    font: Font,
    visible: bool,
    background: Option<Color>,
    #[serde(skip)]
    notifier: Notifier,
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Legend {
    pub fn new() -> Self {
        Self {
            position: Edge::Bottom,
            font: Font::new("sans-serif", 11.0),
            visible: true,
            background: None,
            notifier: Notifier::new(),
        }
    }

    pub fn position(&self) -> Edge { self.position }
    pub fn font(&self) -> &Font { &self.font }
    pub fn is_visible(&self) -> bool { self.visible }

    pub fn set_position(&mut self, position: Edge) -> Result<()> {
        self.position = position;
        self.notifier.fire(ChangeKind::Legend)
    }

    pub fn set_font(&mut self, font: Font) -> Result<()> {
        self.font = font;
        self.notifier.fire(ChangeKind::Legend)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.notifier.fire(ChangeKind::Legend)
    }

    pub fn set_background(&mut self, background: Option<Color>) -> Result<()> {
        self.background = background;
        self.notifier.fire(ChangeKind::Legend)
    }

    fn item_width(&self, canvas: &dyn Canvas, item: &LegendItem) -> f64 {
        SWATCH + GAP + canvas.text_width(&item.label, &self.font)
    }

    /// Item origins (top-left) inside a block starting at `origin`, and the block size.
    fn layout(&self, canvas: &dyn Canvas, items: &[LegendItem], max_width: f64) -> (Vec<Point>, f64, f64) {
        let row_h = canvas.text_height(&self.font).max(SWATCH) + 4.0;
        let mut origins = Vec::with_capacity(items.len());
        if self.position.is_horizontal() {
            let (mut x, mut y, mut widest) = (0.0f64, 0.0f64, 0.0f64);
            for item in items {
                let w = self.item_width(canvas, item);
                if x > 0.0 && x + w > max_width {
                    x = 0.0;
                    y += row_h;
                }
                origins.push(Point::new(x, y));
                x += w + ITEM_GAP;
                widest = widest.max(x - ITEM_GAP);
            }
            (origins, widest, y + row_h)
        } else {
            let mut widest = 0.0f64;
            for (i, item) in items.iter().enumerate() {
                origins.push(Point::new(0.0, i as f64 * row_h));
                widest = widest.max(self.item_width(canvas, item));
            }
            (origins, widest, items.len() as f64 * row_h)
        }
    }

    /// Draw `items` along the legend edge of `area`; returns what is left of `area`.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        items: &[LegendItem],
        area: Rect,
        theme: &Theme,
        mut entities: Option<&mut EntityCollection>,
    ) -> Rect {
        if !self.visible || items.is_empty() {
            return area;
        }
        let (origins, w, h) = self.layout(canvas, items, area.width() - GAP * 2.0);
        let (block, rest) = match self.position {
            Edge::Bottom => (
                Rect::from_ltwh(area.center().x - w / 2.0, area.bottom - h - GAP, w, h),
                Rect::from_ltrb(area.left, area.top, area.right, area.bottom - h - GAP * 2.0),
            ),
            Edge::Top => (
                Rect::from_ltwh(area.center().x - w / 2.0, area.top + GAP, w, h),
                Rect::from_ltrb(area.left, area.top + h + GAP * 2.0, area.right, area.bottom),
            ),
            Edge::Left => (
                Rect::from_ltwh(area.left + GAP, area.center().y - h / 2.0, w, h),
                Rect::from_ltrb(area.left + w + GAP * 2.0, area.top, area.right, area.bottom),
            ),
            Edge::Right => (
                Rect::from_ltwh(area.right - w - GAP, area.center().y - h / 2.0, w, h),
                Rect::from_ltrb(area.left, area.top, area.right - w - GAP * 2.0, area.bottom),
            ),
        };
        if let Some(bg) = self.background {
            canvas.fill(&Shape::Rect(block.grow(2.0)), bg);
        }
        let row_h = canvas.text_height(&self.font).max(SWATCH) + 4.0;
        for (item, o) in items.iter().zip(origins) {
            let top_left = Point::new(block.left + o.x, block.top + o.y);
            let swatch_c = Point::new(top_left.x + SWATCH / 2.0, top_left.y + row_h / 2.0);
            let shape = item.marker.unwrap_or(Marker::Square).at(swatch_c, SWATCH);
            if item.line {
                let l = Shape::line(
                    Point::new(swatch_c.x - SWATCH, swatch_c.y),
                    Point::new(swatch_c.x + SWATCH, swatch_c.y),
                );
                canvas.stroke(&l, item.paint, &Stroke::new(2.0));
            }
            canvas.fill(&shape, item.paint);
            canvas.text(
                &item.label,
                Point::new(top_left.x + SWATCH + GAP, swatch_c.y),
                TextAnchor::CenterLeft,
                &self.font,
                theme.axis_label,
            );
            if let Some(entities) = entities.as_deref_mut() {
                let hit = Rect::from_ltwh(top_left.x, top_left.y, self.item_width(canvas, item), row_h);
                let mut e = ChartEntity::new(Shape::Rect(hit), EntityKind::LegendItem { series: item.series });
                e.tooltip = Some(item.label.clone());
                entities.add(e);
            }
        }
        rest
    }
}

impl Observable for Legend {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Legend }
}
