//! Small descriptive helpers shared by the graph and sample statistics.

use crate::error::{Result, StatsError};

/// Arithmetic mean; NaN for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`); NaN for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn variance(values: &[f64]) -> f64 {
    let mu = mean(values);
    if mu.is_nan() {
        return f64::NAN;
    }
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64
}

/// Convert a degree sequence to floats.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_f64(values: &[usize]) -> Vec<f64> {
    values.iter().map(|&v| v as f64).collect()
}

/// Reject a percentile outside `[0, 100]`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidPercentile`] for NaN or out-of-range `q`.
pub fn check_percentile(q: f64) -> Result<f64> {
    if (0.0..=100.0).contains(&q) {
        Ok(q)
    } else {
        Err(StatsError::InvalidPercentile(q))
    }
}

/// The `q`-th percentile with linear interpolation between closest ranks.
///
/// `q` is in `[0, 100]` (see [`check_percentile`]). Returns `None` for an
/// empty sample. NaN values sort last.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * q / 100.0;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
