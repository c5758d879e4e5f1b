use criterion::{black_box, criterion_group, criterion_main, Criterion};
use freechart_core::data::{XySeries, XySeriesCollection};
use freechart_core::factory::create_xy_line_chart;
use freechart_core::{shared, Chart, ChartOptions, RecordingCanvas, Rect, XyRenderer};

fn build_chart_xy(n: usize, sampled: bool) -> Chart {
    let mut series = XySeries::new("wave");
    for i in 0..n {
        let _ = series.add(i as f64, (i as f64 * 0.01).sin() * 10.0 + i as f64 * 0.0001);
    }
    let mut data = XySeriesCollection::new();
    let _ = data.add_series(series);
    let mut chart = create_xy_line_chart(&ChartOptions::new("Wave", "X", "Y"), shared(data)).expect("xy chart");
    if sampled {
        if let Some(p) = chart.plot_mut().as_xy_mut() {
            let _ = p.set_renderer(0, XyRenderer::sampling());
        }
    }
    chart
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_recording");
    let area = Rect::from_ltwh(0.0, 0.0, 800.0, 500.0);
    for &n in &[10_000usize, 50_000usize] {
        for (name, sampled) in [("line", false), ("sampled", true)] {
            let chart = build_chart_xy(n, sampled);
            group.bench_function(format!("{name}_{n}"), |b| {
                b.iter(|| {
                    let mut canvas = RecordingCanvas::new();
                    let info = chart.draw(&mut canvas, area);
                    black_box((canvas.ops.len(), info.entities.len()));
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
