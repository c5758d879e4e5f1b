// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the chart model, datasets, plots and the canvas seam.

pub mod annotation;
pub mod axis;
pub mod canvas;
pub mod chart;
pub mod data;
pub mod downsample;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod labels;
pub mod legend;
pub mod paint;
pub mod persist;
pub mod plot;
pub mod renderer;
pub mod scale;
pub mod theme;
pub mod title;
pub mod types;
pub mod view;

pub use annotation::{Crosshair, XyAnnotation, XyAnnotationKind};
pub use axis::{AxisScale, CategoryAxis, TickLabels, ValueAxis};
pub use canvas::{ArcClosure, Canvas, Marker, RecordingCanvas, Shape, TextAnchor};
pub use chart::Chart;
pub use entity::{ChartEntity, ChartRenderingInfo, EntityCollection, EntityKind};
pub use error::{ChartError, Result};
pub use event::{relay, shared, unrelay, ChangeEvent, ChangeKind, ListenerId, Notifier, ObjectId, Observable, Shared};
pub use factory::ChartOptions;
pub use format::{DecimalFormat, LogFormat};
pub use geometry::{Edge, Orientation, Point, Rect};
pub use labels::{ToolTipGenerator, UrlGenerator};
pub use legend::{Legend, LegendItem};
pub use paint::{Color, Font, Stroke};
pub use plot::{AxisKind, CategoryPlot, CategorySource, DialPlot, DialScale, PieDirection, PiePlot, Plot, PlotStyle, XyPlot, XySource};
pub use renderer::{CategoryRenderer, CategoryRendererKind, SeriesAttributes, XyRenderer, XyRendererKind};
pub use theme::Theme;
pub use title::TextTitle;
pub use types::Insets;
