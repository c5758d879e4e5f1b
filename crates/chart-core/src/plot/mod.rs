// File: crates/chart-core/src/plot/mod.rs
// Summary: Plot kinds behind one tagged union, shared plot style and dataset bindings.
// Notes:
// - A plot relays the events of everything it holds (datasets, renderers,
//   axes, annotations) as `Plot` events with the child's event as cause.
// - Cloning a plot deep-copies bound datasets into new shared handles and
//   registers fresh relays; equality compares dataset contents.

pub mod category;
pub mod dial;
pub mod pie;
pub mod xy;

use log::debug;
use serde::{Deserialize, Serialize};

pub use category::{CategoryPlot, CategorySource};
pub use dial::{DialPlot, DialScale};
pub use pie::{PieDirection, PiePlot};
pub use xy::{XyPlot, XySource};

use crate::canvas::{Canvas, Shape, TextAnchor};
use crate::entity::EntityCollection;
use crate::error::Result;
use crate::event::{relay, unrelay, ChangeKind, ListenerId, Notifier, Observable, Shared};
use crate::geometry::{Point, Rect};
use crate::legend::LegendItem;
use crate::paint::{Color, Font, Stroke};
use crate::theme::Theme;
use crate::types::Insets;

/// Which value axis of a plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisKind {
    Domain,
    Range,
}

/// Appearance shared by every plot kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// `None` uses the theme's plot background.
    pub background: Option<Color>,
    /// `None` uses the theme's outline color; draw no outline with `Some(TRANSPARENT)`.
    pub outline: Option<Color>,
    pub insets: Insets,
    pub no_data_message: String,
    pub no_data_font: Font,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            background: None,
            outline: None,
            insets: Insets::uniform(4.0),
            no_data_message: "No data to display".to_string(),
            no_data_font: Font::new("sans-serif", 12.0),
        }
    }
}

impl PlotStyle {
    pub(crate) fn fill_background(&self, canvas: &mut dyn Canvas, area: &Rect, theme: &Theme) {
        canvas.fill(&Shape::Rect(*area), self.background.unwrap_or(theme.plot_background));
    }

    pub(crate) fn stroke_outline(&self, canvas: &mut dyn Canvas, area: &Rect, theme: &Theme) {
        let c = self.outline.unwrap_or(theme.outline);
        if c.a > 0 {
            canvas.stroke(&Shape::Rect(*area), c, &Stroke::new(1.0));
        }
    }

    pub(crate) fn draw_no_data(&self, canvas: &mut dyn Canvas, area: &Rect, theme: &Theme) {
        let c = area.center();
        canvas.text(&self.no_data_message, Point::new(c.x, c.y), TextAnchor::Center, &self.no_data_font, theme.axis_label);
    }
}

/// A dataset handle bound into a plot, with the relay registered on it.
#[derive(Debug)]
pub(crate) struct Binding<S> {
    pub(crate) source: S,
    listener: ListenerId,
}

/// Shared-dataset handles a plot can bind.
pub(crate) trait Source: Sized {
    fn with_notifier<R>(&self, f: impl FnOnce(&Notifier) -> R) -> R;
    fn deep_clone(&self) -> Self;
    fn content_eq(&self, other: &Self) -> bool;
}

impl<S: Source> Binding<S> {
    pub(crate) fn bind(source: S, parent: &Notifier) -> Self {
        let listener = source.with_notifier(|n| {
            debug!("bind dataset {} to plot {}", n.id(), parent.id());
            relay(n, parent, ChangeKind::Plot)
        });
        Self { source, listener }
    }

    pub(crate) fn unbind(self) -> S {
        self.source.with_notifier(|n| {
            debug!("unbind dataset {}", n.id());
            n.remove_listener(self.listener)
        });
        self.source
    }
}

/// Relay an owned child to its plot.
pub(crate) fn adopt(child: &impl Observable, parent: &Notifier) {
    relay(child.notifier(), parent, ChangeKind::Plot);
}

/// Undo `adopt` for a child leaving its plot.
pub(crate) fn disown(child: &impl Observable, parent: &Notifier) {
    unrelay(child.notifier(), parent);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Plot {
    Xy(XyPlot),
    Category(CategoryPlot),
    Pie(PiePlot),
    Dial(DialPlot),
}

impl Plot {
    pub fn style(&self) -> &PlotStyle {
        match self {
            Plot::Xy(p) => p.style(),
            Plot::Category(p) => p.style(),
            Plot::Pie(p) => p.style(),
            Plot::Dial(p) => p.style(),
        }
    }

    pub fn set_style(&mut self, style: PlotStyle) -> Result<()> {
        match self {
            Plot::Xy(p) => p.set_style(style),
            Plot::Category(p) => p.set_style(style),
            Plot::Pie(p) => p.set_style(style),
            Plot::Dial(p) => p.set_style(style),
        }
    }

    /// Draw into `area`; returns the data area.
    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect, theme: &Theme, entities: Option<&mut EntityCollection>) -> Rect {
        match self {
            Plot::Xy(p) => p.draw(canvas, area, theme, entities),
            Plot::Category(p) => p.draw(canvas, area, theme, entities),
            Plot::Pie(p) => p.draw(canvas, area, theme, entities),
            Plot::Dial(p) => p.draw(canvas, area, theme, entities),
        }
    }

    pub fn legend_items(&self, theme: &Theme) -> Vec<LegendItem> {
        match self {
            Plot::Xy(p) => p.legend_items(theme),
            Plot::Category(p) => p.legend_items(theme),
            Plot::Pie(p) => p.legend_items(theme),
            Plot::Dial(_) => Vec::new(),
        }
    }

    pub fn as_xy(&self) -> Option<&XyPlot> {
        match self { Plot::Xy(p) => Some(p), _ => None }
    }

    pub fn as_xy_mut(&mut self) -> Option<&mut XyPlot> {
        match self { Plot::Xy(p) => Some(p), _ => None }
    }

    pub fn as_category(&self) -> Option<&CategoryPlot> {
        match self { Plot::Category(p) => Some(p), _ => None }
    }

    pub fn as_category_mut(&mut self) -> Option<&mut CategoryPlot> {
        match self { Plot::Category(p) => Some(p), _ => None }
    }

    pub fn as_pie(&self) -> Option<&PiePlot> {
        match self { Plot::Pie(p) => Some(p), _ => None }
    }

    pub fn as_pie_mut(&mut self) -> Option<&mut PiePlot> {
        match self { Plot::Pie(p) => Some(p), _ => None }
    }

    pub fn as_dial(&self) -> Option<&DialPlot> {
        match self { Plot::Dial(p) => Some(p), _ => None }
    }

    pub fn as_dial_mut(&mut self) -> Option<&mut DialPlot> {
        match self { Plot::Dial(p) => Some(p), _ => None }
    }
}

impl Observable for Plot {
    fn notifier(&self) -> &Notifier {
        match self {
            Plot::Xy(p) => p.notifier(),
            Plot::Category(p) => p.notifier(),
            Plot::Pie(p) => p.notifier(),
            Plot::Dial(p) => p.notifier(),
        }
    }

    fn change_kind(&self) -> ChangeKind { ChangeKind::Plot }
}

impl From<XyPlot> for Plot {
    fn from(p: XyPlot) -> Self { Plot::Xy(p) }
}

impl From<CategoryPlot> for Plot {
    fn from(p: CategoryPlot) -> Self { Plot::Category(p) }
}

impl From<PiePlot> for Plot {
    fn from(p: PiePlot) -> Self { Plot::Pie(p) }
}

impl From<DialPlot> for Plot {
    fn from(p: DialPlot) -> Self { Plot::Dial(p) }
}

/// Compare two shared handles by content; the same handle is trivially equal.
pub(crate) fn shared_eq<T: PartialEq>(a: &Shared<T>, b: &Shared<T>) -> bool {
    Shared::ptr_eq(a, b) || *a.borrow() == *b.borrow()
}
