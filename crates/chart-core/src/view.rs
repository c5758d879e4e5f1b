// File: crates/chart-core/src/view.rs
// Summary: Interactive navigation for XY plots: zoom, pan, autoscale and crosshair placement.
// Notes:
// - Every operation starts from the range currently shown (auto or fixed) and
//   leaves the touched axis with a fixed range; `restore_auto_bounds` undoes that.
// - Pixel arguments are relative to the data area returned by the last draw.

use log::debug;

use crate::data::utils::find_range_bounds_within;
use crate::data::{Range, XyDataset};
use crate::error::{ChartError, Result};
use crate::geometry::{Edge, Point, Rect};
use crate::plot::{AxisKind, XyPlot};
use crate::scale::AxisMapping;

impl XyPlot {
    /// Zoom the domain axis to the part between two fractions of its current length.
    pub fn zoom_domain(&mut self, lower_pct: f64, upper_pct: f64) -> Result<()> {
        let current = self.domain_mapping();
        self.domain_axis_mut().zoom_range(&current, lower_pct, upper_pct)
    }

    /// Zoom the range axis to the part between two fractions of its current length.
    pub fn zoom_range(&mut self, lower_pct: f64, upper_pct: f64) -> Result<()> {
        let current = self.range_mapping();
        self.range_axis_mut().zoom_range(&current, lower_pct, upper_pct)
    }

    /// Drag the content by a pixel delta; the data follows the pointer.
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64, data_area: &Rect) -> Result<()> {
        let (d_edge, r_edge) = (self.orientation().domain_edge(), self.orientation().range_edge());
        let dm = self.domain_mapping();
        let rm = self.range_mapping();
        let d_pct = drag_percent(&dm, d_edge, dx, dy, data_area);
        let r_pct = drag_percent(&rm, r_edge, dx, dy, data_area);
        if d_pct != 0.0 {
            self.domain_axis_mut().pan(&dm, d_pct)?;
        }
        if r_pct != 0.0 {
            self.range_axis_mut().pan(&rm, r_pct)?;
        }
        Ok(())
    }

    /// Wheel zoom around the cursor: positive `scroll` zooms in. The data
    /// value under the cursor stays put.
    pub fn zoom_at_pixel(&mut self, scroll: f64, cursor: Point, data_area: &Rect) -> Result<()> {
        if !scroll.is_finite() {
            return Err(ChartError::invalid("scroll amount must be finite"));
        }
        let factor = (1.0 - scroll).clamp(0.1, 10.0);
        let c = Point::new(cursor.x.clamp(data_area.left, data_area.right), cursor.y.clamp(data_area.top, data_area.bottom));
        let (d_edge, r_edge) = (self.orientation().domain_edge(), self.orientation().range_edge());
        let dm = self.domain_mapping();
        let rm = self.range_mapping();
        let d_anchor = dm.from_screen(along(c, d_edge), data_area, d_edge);
        let r_anchor = rm.from_screen(along(c, r_edge), data_area, r_edge);
        debug!("zoom x{factor:.3} at ({d_anchor}, {r_anchor})");
        self.domain_axis_mut().resize_around(&dm, factor, d_anchor)?;
        self.range_axis_mut().resize_around(&rm, factor, r_anchor)
    }

    /// Back to auto range on both axes.
    pub fn restore_auto_bounds(&mut self) -> Result<()> {
        self.domain_axis_mut().set_auto_range(true)?;
        self.range_axis_mut().set_auto_range(true)
    }

    /// Fit the range axis to the items inside the visible domain. Returns
    /// `false` (and leaves the axis alone) when no item is visible.
    pub fn autoscale_range_to_visible_domain(&mut self) -> Result<bool> {
        let visible = self.domain_mapping().range();
        let mut bounds = None;
        for (_, source) in self.datasets() {
            bounds = Range::combine(bounds, source.with(|d| find_range_bounds_within(d, &visible, true)));
        }
        let Some(bounds) = bounds else { return Ok(false) };
        let mut auto_axis = self.range_axis().clone();
        auto_axis.set_auto_range(true)?;
        let range = auto_axis.effective_range(Some(bounds));
        self.range_axis_mut().set_range(range)?;
        Ok(true)
    }

    /// Move both crosshairs to the data point under `cursor`. A crosshair
    /// locked on data snaps to the item nearest in the domain.
    pub fn move_crosshairs_to(&mut self, cursor: Point, data_area: &Rect) -> Result<()> {
        let (d_edge, r_edge) = (self.orientation().domain_edge(), self.orientation().range_edge());
        let dm = self.domain_mapping();
        let rm = self.range_mapping();
        let mut x = dm.from_screen(along(cursor, d_edge), data_area, d_edge);
        let mut y = rm.from_screen(along(cursor, r_edge), data_area, r_edge);
        if self.domain_crosshair().is_locked_on_data() || self.range_crosshair().is_locked_on_data() {
            if let Some((sx, sy)) = self.nearest_item(x) {
                if self.domain_crosshair().is_locked_on_data() {
                    x = sx;
                }
                if self.range_crosshair().is_locked_on_data() {
                    y = sy;
                }
            }
        }
        self.domain_crosshair_mut().set_value(x)?;
        self.range_crosshair_mut().set_value(y)
    }

    /// Item with a present y value whose x is closest to `x`.
    fn nearest_item(&self, x: f64) -> Option<(f64, f64)> {
        let mut best: Option<(f64, (f64, f64))> = None;
        for (_, source) in self.datasets() {
            source.with(|d| {
                for s in 0..d.series_count() {
                    for i in 0..d.item_count(s) {
                        let (ix, Some(iy)) = (d.x(s, i), d.y(s, i)) else { continue };
                        let dist = (ix - x).abs();
                        if best.map_or(true, |(b, _)| dist < b) {
                            best = Some((dist, (ix, iy)));
                        }
                    }
                }
            });
        }
        best.map(|(_, p)| p)
    }

    /// Range currently shown on `axis`.
    pub fn visible_range(&self, axis: AxisKind) -> Range {
        match axis {
            AxisKind::Domain => self.domain_mapping().range(),
            AxisKind::Range => self.range_mapping().range(),
        }
    }
}

fn along(p: Point, edge: Edge) -> f64 {
    if edge.is_horizontal() { p.x } else { p.y }
}

/// Fraction of the axis length to pan when the pointer moves by (dx, dy).
fn drag_percent(mapping: &AxisMapping, edge: Edge, dx: f64, dy: f64, area: &Rect) -> f64 {
    let pct = if edge.is_horizontal() {
        -dx / area.width().max(1.0)
    } else {
        dy / area.height().max(1.0)
    };
    if mapping.inverted { -pct } else { pct }
}
