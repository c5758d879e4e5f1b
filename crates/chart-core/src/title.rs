// File: crates/chart-core/src/title.rs
// Summary: Text title drawn along one edge of the chart.

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Shape, TextAnchor};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::Result;
use crate::event::{ChangeKind, Notifier, Observable};
use crate::geometry::{Edge, Point, Rect};
use crate::paint::{Color, Font};
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextTitle {
    text: String,
    font: Font,
    position: Edge,
    /// `None` uses the theme's title color.
    paint: Option<Color>,
    padding: f64,
    visible: bool,
    #[serde(skip)]
    notifier: Notifier,
}

impl TextTitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: Font::new("sans-serif", 18.0).bold(),
            position: Edge::Top,
            paint: None,
            padding: 6.0,
            visible: true,
            notifier: Notifier::new(),
        }
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn font(&self) -> &Font { &self.font }
    pub fn position(&self) -> Edge { self.position }
    pub fn paint(&self) -> Option<Color> { self.paint }
    pub fn is_visible(&self) -> bool { self.visible }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.text = text.into();
        self.notifier.fire(ChangeKind::Title)
    }

    pub fn set_font(&mut self, font: Font) -> Result<()> {
        self.font = font;
        self.notifier.fire(ChangeKind::Title)
    }

    pub fn set_position(&mut self, position: Edge) -> Result<()> {
        self.position = position;
        self.notifier.fire(ChangeKind::Title)
    }

    pub fn set_paint(&mut self, paint: Option<Color>) -> Result<()> {
        self.paint = paint;
        self.notifier.fire(ChangeKind::Title)
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.notifier.fire(ChangeKind::Title)
    }

    /// Draw inside `area` along the title's edge; returns what is left of `area`.
    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, entities: Option<&mut EntityCollection>) -> Rect {
        if !self.visible || self.text.is_empty() {
            return area;
        }
        let h = canvas.text_height(&self.font) + self.padding * 2.0;
        let w = canvas.text_width(&self.text, &self.font) + self.padding * 2.0;
        let (block, rest) = match self.position {
            Edge::Top => (
                Rect::from_ltrb(area.left, area.top, area.right, area.top + h),
                Rect::from_ltrb(area.left, area.top + h, area.right, area.bottom),
            ),
            Edge::Bottom => (
                Rect::from_ltrb(area.left, area.bottom - h, area.right, area.bottom),
                Rect::from_ltrb(area.left, area.top, area.right, area.bottom - h),
            ),
            Edge::Left => (
                Rect::from_ltrb(area.left, area.top, area.left + w, area.bottom),
                Rect::from_ltrb(area.left + w, area.top, area.right, area.bottom),
            ),
            Edge::Right => (
                Rect::from_ltrb(area.right - w, area.top, area.right, area.bottom),
                Rect::from_ltrb(area.left, area.top, area.right - w, area.bottom),
            ),
        };
        let c = block.center();
        canvas.text(&self.text, Point::new(c.x, c.y), TextAnchor::Center, &self.font, self.paint.unwrap_or(theme.title));
        if let Some(entities) = entities {
            let text_box = Rect::from_ltwh(c.x - w / 2.0, c.y - h / 2.0, w, h);
            let mut e = ChartEntity::new(Shape::Rect(text_box), EntityKind::Title);
            e.tooltip = Some(self.text.clone());
            entities.add(e);
        }
        rest
    }
}

impl Observable for TextTitle {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Title }
}
