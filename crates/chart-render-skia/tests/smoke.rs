// File: crates/chart-render-skia/tests/smoke.rs
// Purpose: End-to-end render smoke tests writing PNGs for each plot kind.

use freechart_core::data::{CategoryTable, PieDataset, ValueDataset, XySeries, XySeriesCollection};
use freechart_core::factory::{create_bar_chart, create_dial_chart, create_pie_chart, create_xy_line_chart};
use freechart_core::{shared, Chart, ChartOptions, EntityKind, Point};
use freechart_render_skia::{render_to_png, render_to_png_bytes, RenderOptions};

fn xy_chart() -> Chart {
    let mut s = XySeries::new("wave");
    for (x, y) in [(0.0, 0.0), (1.0, 2.0), (2.0, 1.0), (3.0, 3.5), (4.0, 2.5)] {
        s.add(x, y).unwrap();
    }
    let data = shared(XySeriesCollection::with_series(s).unwrap());
    create_xy_line_chart(&ChartOptions::new("Smoke", "X", "Y"), data).unwrap()
}

#[test]
fn render_smoke_png() {
    let chart = xy_chart();
    let opts = RenderOptions::default();
    let out = std::path::PathBuf::from("target/test_out/smoke.png");

    let info = render_to_png(&chart, &opts, &out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");
    assert!(info.entities.iter().any(|e| matches!(e.kind, EntityKind::Title)));

    // Also verify in-memory API works
    let bytes = render_to_png_bytes(&chart, &opts).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
}

#[test]
fn render_bar_pie_and_dial() {
    let mut table = CategoryTable::new();
    table.add_value(4.0, "2023", "Q1").unwrap();
    table.add_value(6.0, "2023", "Q2").unwrap();
    table.add_value(5.0, "2024", "Q1").unwrap();
    let bar = create_bar_chart(&ChartOptions::new("Bars", "Quarter", "Sales"), shared(table)).unwrap();

    let mut pie = PieDataset::new();
    pie.set_value("Apples", 3.0).unwrap();
    pie.set_value("Pears", 1.0).unwrap();
    let pie = create_pie_chart("Fruit", shared(pie), true, true).unwrap();

    let dial = create_dial_chart("Speed", shared(ValueDataset::new(42.0))).unwrap();

    let opts = RenderOptions { width: 400, height: 300, ..RenderOptions::default() };
    for (name, chart) in [("bar", bar), ("pie", pie), ("dial", dial)] {
        let bytes = render_to_png_bytes(&chart, &opts).expect(name);
        let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
        assert_eq!((img.width(), img.height()), (400, 300), "{name}");
    }
}

#[test]
fn pie_entities_hit_sections() {
    let mut pie = PieDataset::new();
    pie.set_value("Only", 1.0).unwrap();
    let chart = create_pie_chart("", shared(pie), false, true).unwrap();
    let opts = RenderOptions { width: 200, height: 200, draw_labels: false, ..RenderOptions::default() };
    let info = render_to_png(&chart, &opts, "target/test_out/pie_hit.png").unwrap();
    let center = info.data_area.center();
    let hit = info.entities.entity_at(Point::new(center.x, center.y)).expect("entity at center");
    assert!(matches!(&hit.kind, EntityKind::PieSection { key, .. } if key == "Only"));
    assert_eq!(hit.tooltip.as_deref(), Some("Only = 1.0 (100%)"));
}
