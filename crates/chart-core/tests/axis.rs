// File: crates/chart-core/tests/axis.rs
// Purpose: Value axis auto range, mapping, zoom/pan, tick labels, number formats and dial scales.

use freechart_core::data::Range;
use freechart_core::scale::AxisMapping;
use freechart_core::{grid, AxisScale, CategoryAxis, DecimalFormat, DialScale, Edge, LogFormat, Rect, Result, TickLabels, ValueAxis};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

fn assert_range(r: Range, lower: f64, upper: f64) {
    assert!(approx(r.lower(), lower) && approx(r.upper(), upper), "got {r:?}, want [{lower}, {upper}]");
}

fn data(lower: f64, upper: f64) -> Option<Range> {
    Some(Range::new(lower, upper).unwrap())
}

#[test]
fn auto_range_includes_zero_and_sticks_to_it() {
    let axis = ValueAxis::new("y");
    assert_range(axis.effective_range(data(2.0, 6.0)), 0.0, 6.3);
    assert_range(axis.effective_range(data(-6.0, -2.0)), -6.3, 0.0);
}

#[test]
fn auto_range_without_zero_adds_margins() -> Result<()> {
    let mut axis = ValueAxis::new("y");
    axis.set_auto_range_includes_zero(false)?;
    assert_range(axis.effective_range(data(2.0, 6.0)), 1.8, 6.2);
    axis.set_margins(0.0, 0.25)?;
    assert_range(axis.effective_range(data(2.0, 6.0)), 2.0, 7.0);
    assert!(axis.set_margins(-0.1, 0.0).is_err());
    Ok(())
}

#[test]
fn single_value_is_widened() -> Result<()> {
    let mut axis = ValueAxis::new("y");
    axis.set_auto_range_includes_zero(false)?;
    assert_range(axis.effective_range(data(5.0, 5.0)), 4.45, 5.55);
    assert_range(axis.effective_range(data(0.0, 0.0)), -0.55, 0.55);
    Ok(())
}

#[test]
fn no_data_uses_default_auto_range() {
    assert_range(ValueAxis::new("y").effective_range(None), 0.0, 1.0);
    assert_range(ValueAxis::log("y", 10.0).unwrap().effective_range(None), 0.01, 1.0);
}

#[test]
fn minimum_size_and_fixed_auto_range() -> Result<()> {
    let mut axis = ValueAxis::new("y");
    axis.set_auto_range_includes_zero(false)?;
    axis.set_auto_range_minimum_size(1.0)?;
    assert_range(axis.effective_range(data(5.0, 5.5)), 4.7, 5.8);

    axis.set_fixed_auto_range(Some(10.0))?;
    assert_range(axis.effective_range(data(0.0, 100.0)), 90.0, 100.0);
    Ok(())
}

#[test]
fn fixed_range_turns_auto_range_off() -> Result<()> {
    let mut axis = ValueAxis::new("y");
    axis.set_range(Range::new(-3.0, 3.0)?)?;
    assert!(!axis.is_auto_range());
    assert_range(axis.effective_range(data(100.0, 200.0)), -3.0, 3.0);
    axis.set_auto_range(true)?;
    assert_range(axis.effective_range(data(2.0, 6.0)), 0.0, 6.3);
    Ok(())
}

#[test]
fn value_and_pixel_mapping_per_edge() -> Result<()> {
    let mut axis = ValueAxis::new("x");
    axis.set_range(Range::new(0.0, 10.0)?)?;
    let area = Rect::from_ltwh(0.0, 0.0, 100.0, 50.0);

    assert!(approx(axis.value_to_screen(5.0, None, &area, Edge::Bottom), 50.0));
    assert!(approx(axis.value_to_screen(5.0, None, &area, Edge::Left), 25.0));
    assert!(approx(axis.value_to_screen(10.0, None, &area, Edge::Left), 0.0));
    assert!(approx(axis.screen_to_value(30.0, None, &area, Edge::Bottom), 3.0));

    axis.set_inverted(true)?;
    assert!(approx(axis.value_to_screen(2.0, None, &area, Edge::Bottom), 80.0));
    assert!(approx(axis.screen_to_value(80.0, None, &area, Edge::Bottom), 2.0));
    Ok(())
}

#[test]
fn zoom_pan_and_resize_on_a_linear_axis() -> Result<()> {
    let current = AxisMapping::linear(Range::new(0.0, 10.0)?);
    let mut axis = ValueAxis::new("x");

    axis.zoom_range(&current, 0.2, 0.5)?;
    assert!(!axis.is_auto_range());
    assert_range(axis.range(), 2.0, 5.0);
    assert!(axis.zoom_range(&current, 0.5, 0.2).is_err());

    axis.pan(&current, 0.1)?;
    assert_range(axis.range(), 1.0, 11.0);

    axis.resize_around(&current, 0.5, 4.0)?;
    assert_range(axis.range(), 2.0, 7.0);
    assert!(axis.resize_around(&current, 0.0, 4.0).is_err());
    Ok(())
}

#[test]
fn log_axis_zooms_in_log_space() -> Result<()> {
    let mut axis = ValueAxis::log("y", 10.0)?;
    let current = axis.mapping(None);
    assert_eq!(current.log_base, Some(10.0));

    let decade = AxisMapping { lower: 1.0, upper: 100.0, log_base: Some(10.0), inverted: false };
    axis.zoom_range(&decade, 0.5, 1.0)?;
    assert_range(axis.range(), 10.0, 100.0);

    assert!(axis.set_range(Range::new(0.0, 10.0)?).is_err());
    assert!(ValueAxis::log("y", 1.0).is_err());
    assert!(axis.set_scale(AxisScale::Log { base: -2.0 }).is_err());
    Ok(())
}

#[test]
fn log_auto_range_pads_in_log_space() -> Result<()> {
    let axis = ValueAxis::log("y", 10.0)?;
    let r = axis.effective_range(data(1.0, 1000.0));
    assert!(r.lower() > 0.5 && r.lower() < 1.0, "{r:?}");
    assert!(r.upper() > 1000.0 && r.upper() < 1500.0, "{r:?}");
    // non-positive data cannot be shown
    assert_range(axis.effective_range(data(-5.0, 0.0)), 0.01, 1.0);
    Ok(())
}

#[test]
fn log_ticks_are_powers_of_the_base() -> Result<()> {
    let axis = ValueAxis::log("y", 10.0)?;
    let mapping = AxisMapping { lower: 0.5, upper: 2000.0, log_base: Some(10.0), inverted: false };
    let (ticks, step) = axis.ticks(&mapping, 300.0);
    assert_eq!(ticks, vec![1.0, 10.0, 100.0, 1000.0]);
    assert_eq!(step, 0.0);
    assert_eq!(axis.tick_label(100.0, step), "10^2.0");
    Ok(())
}

#[test]
fn log_ticks_near_base_one_stay_bounded() -> Result<()> {
    let axis = ValueAxis::log("y", 1.0001)?;
    let mapping = AxisMapping { lower: 0.01, upper: 100.0, log_base: Some(1.0001), inverted: false };
    let (ticks, _) = axis.ticks(&mapping, 300.0);
    assert!(ticks.len() >= 2 && ticks.len() <= 5, "got {} ticks", ticks.len());
    assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    assert!(ticks.iter().all(|&t| t > 0.0099 && t < 100.01));
    Ok(())
}

#[test]
fn loading_an_axis_checks_its_scale() {
    let json = serde_json::to_string(&ValueAxis::log("y", 10.0).unwrap()).unwrap();
    assert!(serde_json::from_str::<ValueAxis>(&json).is_ok());
    let broken = json.replace("\"base\":10.0", "\"base\":1.0");
    assert_ne!(broken, json);
    assert!(serde_json::from_str::<ValueAxis>(&broken).is_err());
}

#[test]
fn linear_ticks_use_nice_steps() {
    let axis = ValueAxis::new("y");
    let mapping = AxisMapping::linear(Range::new(0.0, 10.0).unwrap());
    let (ticks, step) = axis.ticks(&mapping, 360.0);
    assert_eq!(step, 2.0);
    assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

    assert!(approx(grid::nice_step(0.04), 0.05));
    assert_eq!(grid::nice_step(2.4), 2.0);
    assert_eq!(grid::nice_step(0.0), 1.0);
}

#[test]
fn number_labels_follow_the_step() -> Result<()> {
    let mut axis = ValueAxis::new("y");
    assert_eq!(axis.tick_label(0.25, 0.05), "0.25");
    assert_eq!(axis.tick_label(3.0, 1.0), "3");
    assert_eq!(axis.tick_label(-0.0001, 0.5), "0.0");

    axis.set_tick_labels(TickLabels::Number(Some(DecimalFormat::new("0.00")?)))?;
    assert_eq!(axis.tick_label(1234.5, 100.0), "1234.50");
    Ok(())
}

#[test]
fn date_labels_pick_a_pattern_from_the_step() -> Result<()> {
    let mut axis = ValueAxis::date("time");
    assert_eq!(axis.tick_label(0.0, 86_400_000.0), "01 Jan");
    assert_eq!(axis.tick_label(3_600_000.0, 60_000.0), "01:00");

    axis.set_tick_labels(TickLabels::Date(Some("%Y-%m-%d".into())))?;
    assert_eq!(axis.tick_label(86_400_000.0, 1000.0), "1970-01-02");
    Ok(())
}

#[test]
fn decimal_format_patterns() -> Result<()> {
    assert_eq!(DecimalFormat::new("#,##0.###")?.format(1_234_567.891), "1,234,567.891");
    assert_eq!(DecimalFormat::new("0.00")?.format(2.0), "2.00");
    assert_eq!(DecimalFormat::new("0")?.format(-2.6), "-3");
    assert_eq!(DecimalFormat::default().format(-0.0001), "0.0");
    assert_eq!(DecimalFormat::default().format(1.2), "1.2");
    assert_eq!(DecimalFormat::default().format(f64::NAN), "NaN");

    assert!(DecimalFormat::new("0.#0").is_err());
    assert!(DecimalFormat::new("abc").is_err());
    assert!(DecimalFormat::new("").is_err());
    Ok(())
}

#[test]
fn log_format_labels_and_equality() -> Result<()> {
    let f = LogFormat::default();
    assert_eq!(f.format(1000.0), "10^3.0");

    let bare = LogFormat::new(10.0, "10", "^", false)?;
    assert_eq!(bare.format(100.0), "2.0");
    assert_ne!(bare, f);

    let mut other = LogFormat::default();
    assert_eq!(other, f);
    other.set_exponent_format(DecimalFormat::new("0")?);
    assert_ne!(other, f);

    assert!(LogFormat::new(1.0, "1", "^", true).is_err());
    assert!(LogFormat::new(0.0, "0", "^", true).is_err());
    Ok(())
}

#[test]
fn category_slots_share_the_axis() -> Result<()> {
    let axis = CategoryAxis::new("c");
    let area = Rect::from_ltwh(0.0, 0.0, 100.0, 40.0);
    // 100 * (1 - 0.1 - 0.2) / 2 = 35 wide, one gap of 20
    assert!(approx(axis.category_size(2, &area, Edge::Bottom), 35.0));
    assert!(approx(axis.category_start(0, 2, &area, Edge::Bottom), 5.0));
    assert!(approx(axis.category_start(1, 2, &area, Edge::Bottom), 60.0));
    assert!(approx(axis.category_middle(1, 2, &area, Edge::Bottom), 77.5));
    assert!(approx(axis.category_end(1, 2, &area, Edge::Bottom), 95.0));
    // a lone category takes everything but the outer margins
    assert!(approx(axis.category_size(1, &area, Edge::Bottom), 90.0));

    let mut axis = axis;
    assert!(axis.set_margins(0.4, 0.4, 0.3).is_err());
    axis.set_margins(0.0, 0.0, 0.0)?;
    assert!(approx(axis.category_series_middle(0, 1, 1, 2, 0.0, &area, Edge::Bottom), 75.0));
    Ok(())
}

#[test]
fn dial_scale_maps_values_to_angles() -> Result<()> {
    let scale = DialScale::new(0.0, 100.0, 175.0, -170.0, 10.0, 4)?;
    assert!(approx(scale.value_to_angle(50.0), 90.0));
    assert!(approx(scale.value_to_angle(0.0), 175.0));
    // clamped to the scale bounds
    assert!(approx(scale.value_to_angle(200.0), 5.0));
    assert_eq!(scale.major_ticks().len(), 11);

    assert!(DialScale::new(5.0, 5.0, 0.0, 90.0, 1.0, 0).is_err());
    assert!(DialScale::new(0.0, 1.0, 0.0, 0.0, 1.0, 0).is_err());
    assert!(DialScale::new(0.0, 1.0, 0.0, 90.0, 0.0, 0).is_err());
    Ok(())
}
