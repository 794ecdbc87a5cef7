//! Densification power law: edge count as a power of node count.
//!
//! Growing networks tend to follow `m(t) = n(t)^alpha` with `alpha > 1`
//! (Leskovec, Kleinberg & Faloutsos, 2007). [`fit_densification`] estimates
//! `alpha` from the `n` and `m` columns of a statistics table by non-linear
//! least squares and reports the coefficient of determination of the fit.
//!
//! # Fit
//!
//! One-parameter Levenberg–Marquardt on the residuals `m_i - n_i^alpha`,
//! starting at `alpha = 1`. The Jacobian is `n^alpha * ln n`; points with
//! `n = 0` contribute no gradient.
//!
//! # Plotting
//!
//! Rendering is left to the caller. Pass a [`PlotSink`] to receive the
//! observed points as markers and the fitted curve as a line.

use serde::Serialize;
use tracing::{instrument, warn};

use crate::error::{Result, StatsError};
use crate::table::StatisticsTable;

const INITIAL_ALPHA: f64 = 1.0;
const INITIAL_DAMPING: f64 = 1e-3;
const MAX_ITER: usize = 200;
const STEP_TOLERANCE: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Output sink
// ---------------------------------------------------------------------------

/// Receiver for the series a fit would draw.
pub trait PlotSink {
    /// Observed data points.
    fn markers(&mut self, x: &[f64], y: &[f64]);

    /// A fitted curve.
    fn line(&mut self, x: &[f64], y: &[f64]);
}

/// A [`PlotSink`] that keeps every series it receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesRecorder {
    pub markers: Vec<(Vec<f64>, Vec<f64>)>,
    pub lines: Vec<(Vec<f64>, Vec<f64>)>,
}

impl PlotSink for SeriesRecorder {
    fn markers(&mut self, x: &[f64], y: &[f64]) {
        self.markers.push((x.to_vec(), y.to_vec()));
    }

    fn line(&mut self, x: &[f64], y: &[f64]) {
        self.lines.push((x.to_vec(), y.to_vec()));
    }
}

// ---------------------------------------------------------------------------
// Fit
// ---------------------------------------------------------------------------

/// Result of [`fit_densification`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Densification {
    /// Coefficient of determination, with the fitted curve as the reference
    /// series and the observed edge counts as the predictions.
    pub r2: f64,
    /// Fitted exponent.
    pub alpha: f64,
}

/// Fit `m = n^alpha` over the rows of `table`.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] for an empty table and
/// [`StatsError::FitDiverged`] if a node or edge count is not finite.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn fit_densification<L>(
    table: &StatisticsTable<L>,
    sink: Option<&mut dyn PlotSink>,
) -> Result<Densification> {
    let (Some(n), Some(m)) = (table.column("n"), table.column("m")) else {
        return Err(StatsError::EmptySample("densification table"));
    };
    if n.is_empty() {
        return Err(StatsError::EmptySample("densification table"));
    }

    let alpha = fit_power_law(&n, &m)?;
    let fitted: Vec<f64> = n.iter().map(|x| x.powf(alpha)).collect();

    if let Some(sink) = sink {
        sink.markers(&n, &m);
        sink.line(&n, &fitted);
    }

    Ok(Densification {
        r2: r2_score(&fitted, &m),
        alpha,
    })
}

/// Least-squares exponent of `y = x^alpha`.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] for empty input,
/// [`StatsError::LengthMismatch`] when `x` and `y` differ in length and
/// [`StatsError::FitDiverged`] when the residuals at `alpha = 1` are not
/// finite (non-finite or overflowing input).
pub fn fit_power_law(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch(x.len(), y.len()));
    }
    if x.is_empty() {
        return Err(StatsError::EmptySample("power-law fit"));
    }

    let mut alpha = INITIAL_ALPHA;
    let mut damping = INITIAL_DAMPING;
    let mut ssr = sum_squared_residuals(x, y, alpha);
    if !ssr.is_finite() {
        return Err(StatsError::FitDiverged);
    }

    for _ in 0..MAX_ITER {
        let (gradient, curvature) = normal_equation(x, y, alpha);
        if curvature == 0.0 {
            return Ok(alpha);
        }

        let step = gradient / (curvature * (1.0 + damping));
        let candidate = alpha + step;
        let candidate_ssr = sum_squared_residuals(x, y, candidate);

        if candidate.is_finite() && candidate_ssr <= ssr {
            alpha = candidate;
            ssr = candidate_ssr;
            damping /= 10.0;
            if step.abs() <= STEP_TOLERANCE * (alpha.abs() + STEP_TOLERANCE) {
                return Ok(alpha);
            }
        } else {
            damping *= 10.0;
            if !damping.is_finite() {
                // No downhill step exists at any damping: alpha is a minimum.
                return Ok(alpha);
            }
        }
    }

    warn!(alpha, "densification fit stopped at the iteration limit");
    Ok(alpha)
}

/// `(Σ J r, Σ J²)` at `alpha`.
fn normal_equation(x: &[f64], y: &[f64], alpha: f64) -> (f64, f64) {
    x.iter().zip(y).fold((0.0, 0.0), |(g, h), (&xi, &yi)| {
        if xi <= 0.0 {
            return (g, h);
        }
        let fx = xi.powf(alpha);
        let jac = fx * xi.ln();
        (g + jac * (yi - fx), h + jac * jac)
    })
}

fn sum_squared_residuals(x: &[f64], y: &[f64], alpha: f64) -> f64 {
    x.iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - xi.powf(alpha)).powi(2))
        .sum()
}

/// Coefficient of determination of `predicted` against `reference`.
///
/// NaN with fewer than two points. A constant reference gives 1.0 for a
/// perfect match and 0.0 otherwise.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn r2_score(reference: &[f64], predicted: &[f64]) -> f64 {
    if reference.len() < 2 {
        return f64::NAN;
    }
    let mean = reference.iter().sum::<f64>() / reference.len() as f64;
    let ss_res: f64 = reference
        .iter()
        .zip(predicted)
        .map(|(r, p)| (r - p).powi(2))
        .sum();
    let ss_tot: f64 = reference.iter().map(|r| (r - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
