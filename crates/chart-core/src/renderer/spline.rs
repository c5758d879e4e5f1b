// File: crates/chart-core/src/renderer/spline.rs
// Summary: Natural cubic spline through screen points.

/// Sample a natural cubic spline through `points` (x strictly increasing),
/// `precision` samples per segment. Returns `None` when x is not increasing.
pub fn natural_cubic(points: &[(f64, f64)], precision: usize) -> Option<Vec<(f64, f64)>> {
    let n = points.len();
    if n < 3 {
        return Some(points.to_vec());
    }
    let h: Vec<f64> = points.windows(2).map(|w| w[1].0 - w[0].0).collect();
    if h.iter().any(|d| !(*d > 0.0)) {
        return None;
    }
    let a: Vec<f64> = points.iter().map(|p| p.1).collect();

    let mut alpha = vec![0.0; n];
    for i in 1..n - 1 {
        alpha[i] = 3.0 / h[i] * (a[i + 1] - a[i]) - 3.0 / h[i - 1] * (a[i] - a[i - 1]);
    }
    let mut l = vec![1.0; n];
    let mut mu = vec![0.0; n];
    let mut z = vec![0.0; n];
    for i in 1..n - 1 {
        l[i] = 2.0 * (points[i + 1].0 - points[i - 1].0) - h[i - 1] * mu[i - 1];
        mu[i] = h[i] / l[i];
        z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
    }
    let mut b = vec![0.0; n];
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    for j in (0..n - 1).rev() {
        c[j] = z[j] - mu[j] * c[j + 1];
        b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
        d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
    }

    let precision = precision.max(1);
    let mut out = Vec::with_capacity((n - 1) * precision + 1);
    for j in 0..n - 1 {
        for k in 0..precision {
            let t = h[j] * k as f64 / precision as f64;
            out.push((points[j].0 + t, a[j] + b[j] * t + c[j] * t * t + d[j] * t * t * t));
        }
    }
    out.push(points[n - 1]);
    Some(out)
}
