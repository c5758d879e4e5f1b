// File: crates/chart-core/src/chart.rs
// Summary: Chart: title, legend and one plot drawn onto a canvas, with change relays to the top.
// Notes:
// - Events from the plot, title and legend reach chart listeners as `Chart`
//   events whose cause chain leads back to the originating object.
// - A chart draws whatever its plot holds at call time; nothing is cached.

use std::fmt;

use log::trace;

use crate::canvas::{Canvas, Shape};
use crate::entity::{ChartRenderingInfo, EntityCollection};
use crate::error::Result;
use crate::event::{relay, unrelay, ChangeKind, Notifier, Observable};
use crate::geometry::Rect;
use crate::legend::{Legend, LegendItem};
use crate::paint::Color;
use crate::plot::Plot;
use crate::theme::Theme;
use crate::title::TextTitle;
use crate::types::Insets;

pub struct Chart {
    title: Option<TextTitle>,
    legend: Option<Legend>,
    plot: Plot,
    /// `None` uses the theme background.
    background: Option<Color>,
    padding: Insets,
    theme: Theme,
    notifier: Notifier,
}

impl Chart {
    /// A chart around `plot` with a legend and no title.
    pub fn new(plot: impl Into<Plot>) -> Self {
        let chart = Self {
            title: None,
            legend: Some(Legend::new()),
            plot: plot.into(),
            background: None,
            padding: Insets::uniform(8.0),
            theme: Theme::light(),
            notifier: Notifier::new(),
        };
        chart.relay_children();
        chart
    }

    /// Title and legend in one go, matching the chart factory conventions.
    pub fn with_title(title: impl Into<String>, plot: impl Into<Plot>, legend: bool) -> Self {
        let mut chart = Self::new(plot);
        let text: String = title.into();
        if !text.is_empty() {
            let t = TextTitle::new(text);
            relay(t.notifier(), &chart.notifier, ChangeKind::Chart);
            chart.title = Some(t);
        }
        if !legend {
            chart.legend = None;
        }
        chart
    }

    fn relay_children(&self) {
        relay(self.plot.notifier(), &self.notifier, ChangeKind::Chart);
        if let Some(t) = &self.title {
            relay(t.notifier(), &self.notifier, ChangeKind::Chart);
        }
        if let Some(l) = &self.legend {
            relay(l.notifier(), &self.notifier, ChangeKind::Chart);
        }
    }

    fn changed(&self) -> Result<()> {
        self.notifier.fire(ChangeKind::Chart)
    }

    pub fn title(&self) -> Option<&TextTitle> { self.title.as_ref() }
    pub fn title_mut(&mut self) -> Option<&mut TextTitle> { self.title.as_mut() }
    pub fn legend(&self) -> Option<&Legend> { self.legend.as_ref() }
    pub fn legend_mut(&mut self) -> Option<&mut Legend> { self.legend.as_mut() }
    pub fn plot(&self) -> &Plot { &self.plot }
    pub fn plot_mut(&mut self) -> &mut Plot { &mut self.plot }
    pub fn background(&self) -> Option<Color> { self.background }
    pub fn padding(&self) -> Insets { self.padding }
    pub fn theme(&self) -> &Theme { &self.theme }

    pub fn set_title(&mut self, title: Option<TextTitle>) -> Result<()> {
        if let Some(t) = &title {
            relay(t.notifier(), &self.notifier, ChangeKind::Chart);
        }
        if let Some(old) = std::mem::replace(&mut self.title, title) {
            unrelay(old.notifier(), &self.notifier);
        }
        self.changed()
    }

    pub fn set_legend(&mut self, legend: Option<Legend>) -> Result<()> {
        if let Some(l) = &legend {
            relay(l.notifier(), &self.notifier, ChangeKind::Chart);
        }
        if let Some(old) = std::mem::replace(&mut self.legend, legend) {
            unrelay(old.notifier(), &self.notifier);
        }
        self.changed()
    }

    /// Replace the plot; returns the old one.
    pub fn set_plot(&mut self, plot: impl Into<Plot>) -> Result<Plot> {
        let plot = plot.into();
        relay(plot.notifier(), &self.notifier, ChangeKind::Chart);
        let old = std::mem::replace(&mut self.plot, plot);
        unrelay(old.notifier(), &self.notifier);
        self.changed()?;
        Ok(old)
    }

    pub fn set_background(&mut self, background: Option<Color>) -> Result<()> {
        self.background = background;
        self.changed()
    }

    pub fn set_padding(&mut self, padding: Insets) -> Result<()> {
        self.padding = padding;
        self.changed()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.changed()
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        self.plot.legend_items(&self.theme)
    }

    /// Draw the whole chart into `area`, collecting entities for hit testing.
    pub fn draw(&self, canvas: &mut dyn Canvas, area: Rect) -> ChartRenderingInfo {
        trace!("draw chart {} into {:?}", self.notifier.id(), area);
        let mut entities = EntityCollection::new();
        canvas.fill(&Shape::Rect(area), self.background.unwrap_or(self.theme.background));
        let mut rest = area.shrink(&self.padding);
        if let Some(t) = &self.title {
            rest = t.draw(canvas, rest, &self.theme, Some(&mut entities));
        }
        if let Some(l) = &self.legend {
            let items = self.legend_items();
            rest = l.draw(canvas, &items, rest, &self.theme, Some(&mut entities));
        }
        let data_area = self.plot.draw(canvas, rest, &self.theme, Some(&mut entities));
        ChartRenderingInfo { chart_area: area, plot_area: rest, data_area, entities }
    }
}

impl Observable for Chart {
    fn notifier(&self) -> &Notifier { &self.notifier }
    fn change_kind(&self) -> ChangeKind { ChangeKind::Chart }
}

impl Clone for Chart {
    fn clone(&self) -> Self {
        let chart = Self {
            title: self.title.clone(),
            legend: self.legend.clone(),
            plot: self.plot.clone(),
            background: self.background,
            padding: self.padding,
            theme: self.theme.clone(),
            notifier: Notifier::new(),
        };
        chart.relay_children();
        chart
    }
}

impl PartialEq for Chart {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.legend == other.legend
            && self.plot == other.plot
            && self.background == other.background
            && self.padding == other.padding
            && self.theme == other.theme
    }
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("id", &self.notifier.id())
            .field("title", &self.title.as_ref().map(TextTitle::text))
            .field("plot", &self.plot)
            .finish()
    }
}
