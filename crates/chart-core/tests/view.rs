// File: crates/chart-core/tests/view.rs
// Purpose: XY plot navigation: zoom, pan, wheel zoom, autoscale, restore and crosshair snapping.

use freechart_core::data::{Range, XySeries, XySeriesCollection};
use freechart_core::{shared, AxisKind, Point, Rect, Result, ValueAxis, XyPlot, XyRenderer};

const AREA: Rect = Rect::from_ltwh(0.0, 0.0, 100.0, 100.0);

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

fn assert_range(r: Range, lower: f64, upper: f64) {
    assert!(approx(r.lower(), lower) && approx(r.upper(), upper), "got {r:?}, want [{lower}, {upper}]");
}

fn tight_axis(label: &str) -> ValueAxis {
    let mut axis = ValueAxis::new(label);
    axis.set_auto_range_includes_zero(false).unwrap();
    axis.set_margins(0.0, 0.0).unwrap();
    axis
}

/// y = x for x in 0, 10, ..., 100, shown on [0, 100] x [0, 100].
fn diagonal() -> XyPlot {
    let mut s = XySeries::new("diag");
    for i in 0..=10 {
        let x = i as f64 * 10.0;
        s.add(x, x).unwrap();
    }
    let data = XySeriesCollection::with_series(s).unwrap();
    XyPlot::new(Some(shared(data).into()), tight_axis("x"), tight_axis("y"), XyRenderer::line())
}

#[test]
fn zoom_fixes_the_zoomed_axis_only() -> Result<()> {
    let mut plot = diagonal();
    assert_range(plot.visible_range(AxisKind::Domain), 0.0, 100.0);

    plot.zoom_domain(0.25, 0.5)?;
    assert_range(plot.visible_range(AxisKind::Domain), 25.0, 50.0);
    assert!(!plot.domain_axis().is_auto_range());
    assert!(plot.range_axis().is_auto_range());

    plot.zoom_range(0.0, 0.1)?;
    assert_range(plot.visible_range(AxisKind::Range), 0.0, 10.0);
    assert!(plot.zoom_domain(0.9, 0.1).is_err());
    Ok(())
}

#[test]
fn dragging_moves_the_data_with_the_pointer() -> Result<()> {
    let mut plot = diagonal();
    // left by 10px shows data further right; down by 20px shows data further up
    plot.pan_by_pixels(-10.0, 20.0, &AREA)?;
    assert_range(plot.visible_range(AxisKind::Domain), 10.0, 110.0);
    assert_range(plot.visible_range(AxisKind::Range), 20.0, 120.0);

    // a purely horizontal drag leaves the range axis alone
    let mut plot = diagonal();
    plot.pan_by_pixels(5.0, 0.0, &AREA)?;
    assert!(plot.range_axis().is_auto_range());
    assert_range(plot.visible_range(AxisKind::Domain), -5.0, 95.0);
    Ok(())
}

#[test]
fn wheel_zoom_keeps_the_value_under_the_cursor() -> Result<()> {
    let mut plot = diagonal();
    plot.zoom_at_pixel(0.5, Point::new(50.0, 50.0), &AREA)?;
    assert_range(plot.visible_range(AxisKind::Domain), 25.0, 75.0);
    assert_range(plot.visible_range(AxisKind::Range), 25.0, 75.0);

    let mut plot = diagonal();
    plot.zoom_at_pixel(0.5, Point::new(20.0, 80.0), &AREA)?;
    // cursor sits on x = 20, y = 20
    assert_range(plot.visible_range(AxisKind::Domain), 10.0, 60.0);
    assert_range(plot.visible_range(AxisKind::Range), 10.0, 60.0);

    assert!(plot.zoom_at_pixel(f64::NAN, Point::new(0.0, 0.0), &AREA).is_err());
    Ok(())
}

#[test]
fn autoscale_fits_the_range_to_visible_items() -> Result<()> {
    let mut plot = diagonal();
    plot.zoom_domain(0.2, 0.4)?;
    assert!(plot.autoscale_range_to_visible_domain()?);
    assert_range(plot.visible_range(AxisKind::Range), 20.0, 40.0);
    assert!(!plot.range_axis().is_auto_range());

    // nothing visible: the range axis keeps its range
    plot.domain_axis_mut().set_range(Range::new(200.0, 300.0)?)?;
    assert!(!plot.autoscale_range_to_visible_domain()?);
    assert_range(plot.visible_range(AxisKind::Range), 20.0, 40.0);
    Ok(())
}

#[test]
fn restore_returns_both_axes_to_auto_range() -> Result<()> {
    let mut plot = diagonal();
    plot.zoom_at_pixel(0.5, Point::new(50.0, 50.0), &AREA)?;
    plot.restore_auto_bounds()?;
    assert!(plot.domain_axis().is_auto_range() && plot.range_axis().is_auto_range());
    assert_range(plot.visible_range(AxisKind::Domain), 0.0, 100.0);
    assert_range(plot.visible_range(AxisKind::Range), 0.0, 100.0);
    Ok(())
}

#[test]
fn crosshairs_snap_to_the_nearest_item() -> Result<()> {
    let mut plot = diagonal();
    assert!(plot.domain_crosshair().is_locked_on_data());
    plot.move_crosshairs_to(Point::new(34.0, 90.0), &AREA)?;
    assert!(approx(plot.domain_crosshair().value(), 30.0));
    assert!(approx(plot.range_crosshair().value(), 30.0));

    plot.domain_crosshair_mut().set_locked_on_data(false)?;
    plot.range_crosshair_mut().set_locked_on_data(false)?;
    plot.move_crosshairs_to(Point::new(34.0, 90.0), &AREA)?;
    assert!(approx(plot.domain_crosshair().value(), 34.0));
    assert!(approx(plot.range_crosshair().value(), 10.0));
    Ok(())
}

#[test]
fn crosshair_rejects_non_finite_values() {
    let mut plot = diagonal();
    assert!(plot.domain_crosshair_mut().set_value(f64::INFINITY).is_err());
    assert!(plot.range_crosshair_mut().set_value(f64::NAN).is_err());
}
