//! Inequality measures over a numeric sample: Gini coefficient and Lorenz
//! curve.
//!
//! Both sort the sample in descending order first, so the curve reads as
//! "share of the total held by the top p-fraction of items".

/// Number of points on the Lorenz curve: p = 0.00, 0.01, ..., 1.00.
pub const LORENZ_POINTS: usize = 101;

const LORENZ_STEP: f64 = 0.01;

fn sorted_descending(values: &[f64]) -> Vec<f64> {
    let mut d = values.to_vec();
    d.sort_by(|a, b| b.total_cmp(a));
    d
}

/// Gini coefficient with the small-sample correction `n / (n - 1)`.
///
/// With `d` sorted descending and `c_i` its running sums:
///
/// ```text
/// s = 2 * Σ c_i / Σ d - 1
/// R = n / (n - 1) * (s / n - 1)
/// ```
///
/// A uniform sample gives 0 and a single nonzero value among zeros gives 1.
/// Returns NaN when there are fewer than two values or the total is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gini_coeff(values: &[f64]) -> f64 {
    let d = sorted_descending(values);
    let n = d.len();
    let total: f64 = d.iter().sum();
    if n < 2 || total == 0.0 {
        return f64::NAN;
    }

    let mut running = 0.0;
    let mut sq = 0.0;
    for x in &d {
        running += x;
        sq += running;
    }

    let n = n as f64;
    let s = 2.0 * sq / total - 1.0;
    n / (n - 1.0) * (1.0 / n * s - 1.0)
}

/// Lorenz curve sampled at p = 0.00, 0.01, ..., 1.00.
///
/// Returns `(p, share)` where `share[i]` is the fraction of the total held
/// by the `floor(n * p[i])` largest values. `share` is 0 at p = 0 and 1 at
/// p = 1. When the total is zero every share past p = 0 is NaN.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn lorenz(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let d = sorted_descending(values);
    let n = d.len();
    let total: f64 = d.iter().sum();

    let mut p = Vec::with_capacity(LORENZ_POINTS);
    let mut share = Vec::with_capacity(LORENZ_POINTS);

    for i in 0..LORENZ_POINTS {
        let x = i as f64 * LORENZ_STEP;
        p.push(x);
        if i == 0 {
            share.push(0.0);
            continue;
        }
        if total == 0.0 {
            share.push(f64::NAN);
            continue;
        }
        let items = ((n as f64 * x).floor() as usize).min(n);
        share.push(d[..items].iter().sum::<f64>() / total);
    }

    (p, share)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gini_uniform_is_zero() {
        assert!(gini_coeff(&[1.0, 1.0, 1.0, 1.0]).abs() < 1e-12);
        assert!(gini_coeff(&[3.0; 17]).abs() < 1e-12);
    }

    #[test]
    fn gini_single_holder_is_one() {
        assert!((gini_coeff(&[10.0, 0.0, 0.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!((gini_coeff(&[0.0, 0.0, 5.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gini_order_does_not_matter() {
        let a = gini_coeff(&[1.0, 2.0, 3.0, 10.0]);
        let b = gini_coeff(&[10.0, 3.0, 1.0, 2.0]);
        assert!((a - b).abs() < 1e-15);
        // Hand computation: d = [10,3,2,1], running = 10,13,15,16, sq = 54,
        // s = 2*54/16 - 1 = 5.75, R = 4/3 * (5.75/4 - 1) = 0.583333...
        assert!((a - 0.583_333_333_333_333_4).abs() < 1e-9);
    }

    #[test]
    fn gini_degenerate_samples_are_nan() {
        assert!(gini_coeff(&[]).is_nan());
        assert!(gini_coeff(&[4.0]).is_nan());
        assert!(gini_coeff(&[0.0, 0.0]).is_nan());
    }

    #[test]
    fn lorenz_shape() {
        let (p, c) = lorenz(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.len(), LORENZ_POINTS);
        assert_eq!(c.len(), LORENZ_POINTS);
        assert_eq!(c[0], 0.0);
        assert!((c[100] - 1.0).abs() < 1e-12);
        // Top quarter (one item, value 4) holds 40%.
        assert!((c[25] - 0.4).abs() < 1e-12);
        // p = 0.24 covers floor(0.96) = 0 items.
        assert_eq!(c[24], 0.0);
    }

    #[test]
    fn lorenz_zero_total_is_nan_past_origin() {
        let (_, c) = lorenz(&[0.0, 0.0]);
        assert_eq!(c[0], 0.0);
        assert!(c[1..].iter().all(|v| v.is_nan()));
    }
}
