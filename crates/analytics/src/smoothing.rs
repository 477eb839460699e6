//! Cubic spline resampling of the balance series for charting.
//!
//! Nothing in here feeds a metric. The curve is a presentation aid only.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A cubic spline needs at least this many knots.
pub const MIN_SPLINE_POINTS: usize = 4;

/// Resamples `balance` onto `target_point_count` evenly spaced positions
/// spanning the original index range `[0, n - 1]`.
///
/// With fewer than [`MIN_SPLINE_POINTS`] values the series is returned as is.
pub fn smooth_series(balance: &[Decimal], target_point_count: usize) -> Vec<f64> {
    // Every `Decimal` lies within +/-8e28 and so converts to `f64`; a knot is
    // never dropped or substituted here.
    let values: Vec<f64> = balance.iter().filter_map(|v| v.to_f64()).collect();

    let Some(spline) = CubicSpline::not_a_knot(&values) else {
        return values;
    };

    let last_index = (values.len() - 1) as f64;
    match target_point_count {
        0 => Vec::new(),
        1 => vec![values[0]],
        n => {
            let step = last_index / (n - 1) as f64;
            (0..n)
                .map(|k| {
                    // Pin the final sample to the last knot to avoid float drift past it.
                    let x = if k == n - 1 { last_index } else { k as f64 * step };
                    spline.evaluate(x)
                })
                .collect()
        }
    }
}

/// Interpolating cubic spline over unit-spaced knots `0, 1, .., n - 1` with
/// not-a-knot end conditions (the third derivative is continuous at the
/// second and second-to-last knots).
#[derive(Debug, Clone)]
struct CubicSpline {
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    fn not_a_knot(y: &[f64]) -> Option<Self> {
        let n = y.len();
        if n < MIN_SPLINE_POINTS {
            return None;
        }

        // Interior equations for unit spacing:
        //   m[i-1] + 4 m[i] + m[i+1] = 6 (y[i+1] - 2 y[i] + y[i-1])
        // Not-a-knot gives m[0] = 2 m[1] - m[2] and m[n-1] = 2 m[n-2] - m[n-3];
        // substituting those reduces the first and last rows to 6 m[i] = rhs.
        let unknowns = n - 2;
        let mut lower = vec![1.0; unknowns];
        let mut diag = vec![4.0; unknowns];
        let mut upper = vec![1.0; unknowns];
        let rhs: Vec<f64> = (1..n - 1)
            .map(|i| 6.0 * (y[i + 1] - 2.0 * y[i] + y[i - 1]))
            .collect();

        diag[0] = 6.0;
        upper[0] = 0.0;
        diag[unknowns - 1] = 6.0;
        lower[unknowns - 1] = 0.0;

        let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs);

        let mut m = Vec::with_capacity(n);
        m.push(2.0 * interior[0] - interior[1]);
        m.extend_from_slice(&interior);
        m.push(2.0 * interior[unknowns - 1] - interior[unknowns - 2]);

        Some(Self { y: y.to_vec(), m })
    }

    fn evaluate(&self, x: f64) -> f64 {
        let last_segment = self.y.len() - 2;
        let i = (x.floor().max(0.0) as usize).min(last_segment);
        let t = x - i as f64;
        let s = 1.0 - t;

        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);

        m0 * s.powi(3) / 6.0 + m1 * t.powi(3) / 6.0 + (y0 - m0 / 6.0) * s + (y1 - m1 / 6.0) * t
    }
}

/// Thomas algorithm. The system built above is diagonally dominant, so no
/// pivoting is needed.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = upper[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - lower[i] * c[i - 1];
        c[i] = upper[i] / denom;
        d[i] = (rhs[i] - lower[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}
