use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use freechart_core::data::utils::{find_domain_bounds, find_range_bounds};
use freechart_core::data::{OhlcItem, OhlcSeries, TimePeriod, XySeries, XySeriesCollection};

fn gen_collection(n: usize, series: usize) -> XySeriesCollection {
    let mut out = XySeriesCollection::new();
    for s in 0..series {
        let mut xs = XySeries::new(format!("s{s}"));
        for i in 0..n {
            // every 97th value is missing
            let y = if i % 97 == 0 { None } else { Some((i as f64 * 0.01 + s as f64).sin() * 10.0) };
            let _ = xs.add(i as f64, y);
        }
        let _ = out.add_series(xs);
    }
    out
}

fn gen_ohlc(n: usize) -> OhlcSeries {
    let mut out = OhlcSeries::new("price");
    let mut price = 100.0f64;
    for i in 0..n {
        let open = price;
        let close = open + (i as f64 * 0.37).sin();
        price = close;
        if let Ok(item) = OhlcItem::new(TimePeriod::Millisecond(i as i64 * 60_000), open, open.max(close) + 1.0, open.min(close) - 1.0, close) {
            let _ = out.add(item);
        }
    }
    out
}

fn bench_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounds");
    for &n in &[10_000usize, 100_000usize] {
        let data = gen_collection(n, 4);
        group.bench_with_input(BenchmarkId::new("domain", n), &data, |b, d| b.iter(|| black_box(find_domain_bounds(d, true))));
        group.bench_with_input(BenchmarkId::new("range", n), &data, |b, d| b.iter(|| black_box(find_range_bounds(d, true))));
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_ohlc");
    let data = gen_ohlc(100_000);
    for &bucket in &[5usize, 10usize, 20usize] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("b{bucket}")), &bucket, |b, &bk| {
            b.iter(|| black_box(data.aggregate(bk)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bounds, bench_aggregate);
criterion_main!(benches);
