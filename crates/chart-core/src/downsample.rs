// File: crates/chart-core/src/downsample.rs
// Summary: Largest-Triangle-Three-Buckets downsampling for XY items.

/// Indices of up to `threshold` points of `points` that preserve the overall
/// shape. First and last points are always kept; indices are ascending.
pub fn lttb_indices(points: &[(f64, f64)], threshold: usize) -> Vec<usize> {
    let n = points.len();
    if threshold == 0 || n == 0 { return Vec::new(); }
    if threshold >= n || n <= 2 { return (0..n).collect(); }
    if threshold == 1 { return vec![0]; }
    if threshold == 2 { return vec![0, n - 1]; }

    let bucket_size = (n - 2) as f64 / (threshold - 2) as f64;
    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(0);

    // index of the point picked from the previous bucket
    let mut a = 0usize;

    for i in 0..(threshold - 2) {
        let start = (1.0 + (i as f64) * bucket_size).floor() as usize;
        let end = (1.0 + ((i + 1) as f64) * bucket_size).floor().min((n - 1) as f64) as usize;

        let next_end = (1.0 + ((i + 2) as f64) * bucket_size).floor().min(n as f64 - 1.0) as usize;
        let rs = end.max(1);
        let re = next_end.max(rs + 1).min(n);
        let (mut avg_x, mut avg_y) = (0.0f64, 0.0f64);
        for p in &points[rs..re] {
            avg_x += p.0;
            avg_y += p.1;
        }
        let count = (re - rs).max(1) as f64;
        avg_x /= count;
        avg_y /= count;

        let (a_x, a_y) = points[a];
        let mut max_area = -1.0f64;
        let mut max_idx = start;
        for k in start..end.max(start + 1) {
            let area = ((a_x - points[k].0) * (avg_y - a_y) - (a_x - avg_x) * (points[k].1 - a_y)).abs();
            if area > max_area {
                max_area = area;
                max_idx = k;
            }
        }
        sampled.push(max_idx);
        a = max_idx;
    }

    sampled.push(n - 1);
    sampled
}

/// The sampled points themselves.
pub fn lttb(points: &[(f64, f64)], threshold: usize) -> Vec<(f64, f64)> {
    lttb_indices(points, threshold).into_iter().map(|i| points[i]).collect()
}
