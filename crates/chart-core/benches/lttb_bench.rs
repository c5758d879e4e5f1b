use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use freechart_core::downsample::{lttb, lttb_indices};

fn gen_xy(n: usize) -> Vec<(f64, f64)> {
    // simple waveform with drift
    (0..n).map(|i| (i as f64, (i as f64 * 0.01).sin() * 10.0 + i as f64 * 0.0001)).collect()
}

fn bench_lttb(c: &mut Criterion) {
    let mut group = c.benchmark_group("lttb");
    for &n in &[50_000usize, 100_000usize] {
        let data = gen_xy(n);
        for &target in &[1_000usize, 2_000usize, 5_000usize] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_t{target}")), &target, |b, &t| {
                b.iter_batched(
                    || data.clone(),
                    |d| {
                        let _ = black_box(lttb(&d, t));
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_lttb_indices(c: &mut Criterion) {
    let data = gen_xy(100_000);
    c.bench_function("lttb_indices_n100000_t1500", |b| b.iter(|| black_box(lttb_indices(&data, 1_500))));
}

criterion_group!(benches, bench_lttb, bench_lttb_indices);
criterion_main!(benches);
