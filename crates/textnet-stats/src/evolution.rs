//! Table builders: statistics over time buckets and over sigma thresholds.
//!
//! Both iterate `(label, graph)` pairs, compute [`graph_statistics`] for each
//! graph and collect the records into a [`StatisticsTable`] indexed by the
//! label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use textnet_graph::{NeighborMap, TimeIndex, evolving_graphs, to_graph};
use tracing::{debug, instrument};

use crate::attachment::linear_attachment_score;
use crate::error::{Result, StatsError};
use crate::graph_stats::graph_statistics;
use crate::table::StatisticsTable;

/// Lower degree bound used by the sigma sweep.
const SWEEP_LOWER_DEGREE_BOUND: i64 = 0;

/// Sigma values visited by [`eval_sigmas`]: `min_sigma + step` up to
/// `max_sigma`, step `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    #[serde(default = "default_min_sigma")]
    pub min_sigma: f64,
    #[serde(default = "default_max_sigma")]
    pub max_sigma: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            min_sigma: default_min_sigma(),
            max_sigma: default_max_sigma(),
            step: default_step(),
        }
    }
}

const fn default_min_sigma() -> f64 {
    0.0
}

const fn default_max_sigma() -> f64 {
    1.0
}

const fn default_step() -> f64 {
    0.01
}

impl SweepRange {
    /// The sigma values of this range; see [`sigma_range`].
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidStep`] for a non-positive step or one
    /// that yields more than [`MAX_SWEEP_STEPS`] values.
    pub fn values(&self) -> Result<Vec<f64>> {
        sigma_range(self.min_sigma, self.max_sigma, self.step)
    }

    /// Number of sigma values without materializing them.
    ///
    /// # Errors
    ///
    /// Same as [`SweepRange::values`].
    pub fn step_count(&self) -> Result<usize> {
        sweep_len(self.min_sigma, self.max_sigma, self.step)
    }
}

/// Upper bound on the number of graphs a single sweep builds.
pub const MAX_SWEEP_STEPS: usize = 1_000_000;

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn sweep_len(min_sigma: f64, max_sigma: f64, step: f64) -> Result<usize> {
    if !(step.is_finite() && step > 0.0) {
        return Err(StatsError::InvalidStep(step));
    }
    let start = min_sigma + step;
    let stop = max_sigma + step;
    let count = ((stop - start) / step).ceil();
    if !(count.is_finite() && count > 0.0) {
        return Ok(0);
    }
    if count > MAX_SWEEP_STEPS as f64 {
        return Err(StatsError::InvalidStep(step));
    }
    Ok(count as usize)
}

/// `ceil((stop - start) / step)` values `start + i * step` with
/// `start = min_sigma + step` and `stop = max_sigma + step`.
///
/// With the defaults this yields 0.01, 0.02, ..., 1.00.
///
/// # Errors
///
/// Returns [`StatsError::InvalidStep`] if `step` is not positive and finite,
/// or is so small that the range would exceed [`MAX_SWEEP_STEPS`] values.
#[allow(clippy::cast_precision_loss)]
pub fn sigma_range(min_sigma: f64, max_sigma: f64, step: f64) -> Result<Vec<f64>> {
    let count = sweep_len(min_sigma, max_sigma, step)?;
    let start = min_sigma + step;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Statistics of the cumulative neighbor graph at each time bucket.
///
/// `groupby` maps a timestamp to its bucket, e.g. `|t| t.year()` for yearly
/// snapshots or `|t| t.year() / 10 * 10` for decades. Rows are ordered by
/// bucket; the table index is named `time`.
///
/// # Errors
///
/// Returns [`StatsError::MissingTimestamp`] if a sample or a selected
/// neighbor has no timestamp.
#[instrument(skip(neighbors, time_index, groupby))]
pub fn evolving_graph_statistics<K, F>(
    neighbors: &NeighborMap,
    time_index: &TimeIndex,
    groupby: F,
    sigma: f64,
    lower_degree_bound: i64,
) -> Result<StatisticsTable<K>>
where
    K: Ord + Clone + std::fmt::Debug,
    F: Fn(DateTime<Utc>) -> K,
{
    let mut table = StatisticsTable::new("time");
    for (bucket, graph) in evolving_graphs(neighbors, time_index, groupby, sigma)? {
        let stats = graph_statistics(&graph.graph, lower_degree_bound);
        debug!(?bucket, n = stats.n, m = stats.m, "snapshot statistics");
        table.push(bucket, stats);
    }
    Ok(table)
}

/// Statistics of the neighbor graph at each sigma in `range`, with the
/// linear attachment score (normalized) as the extra column `la`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidStep`] for a bad range and
/// [`StatsError::MissingTimestamp`] if the attachment score needs a
/// timestamp the index lacks.
#[instrument(skip(neighbors, time_index))]
pub fn eval_sigmas(
    neighbors: &NeighborMap,
    time_index: &TimeIndex,
    range: &SweepRange,
) -> Result<StatisticsTable<f64>> {
    let mut table = StatisticsTable::new("sigma");
    for sigma in range.values()? {
        let graph = to_graph(neighbors, sigma);
        let stats = graph_statistics(&graph.graph, SWEEP_LOWER_DEGREE_BOUND);
        let la = linear_attachment_score(neighbors, time_index, sigma, true)?;
        debug!(sigma, n = stats.n, m = stats.m, la, "sigma step");
        table.push_with(sigma, stats, [("la", la)]);
    }
    Ok(table)
}
