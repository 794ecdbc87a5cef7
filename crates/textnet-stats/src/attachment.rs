//! Linear attachment score: how far back in time samples reach for their
//! neighbors.
//!
//! For every sample with at least one neighbor selected at sigma, the score
//! averages the day distance to those neighbors. The normalized variant
//! rescales each distance by `span / age`, where `age` is the number of days
//! since the earliest timestamp, so late samples (which could reach back
//! further) are not favored. Per-sample averages are averaged again and
//! divided by the total span in days.

use chrono::{DateTime, Utc};
use textnet_graph::{NeighborMap, TimeIndex, days_between};
use tracing::instrument;

use crate::describe::mean;
use crate::error::Result;

/// Linear attachment score of `neighbors` at threshold `sigma`.
///
/// Returns NaN when no sample has a neighbor at or above `sigma`, or when
/// every timestamp falls within the same day.
///
/// # Errors
///
/// Returns [`crate::StatsError::MissingTimestamp`] if a sample with selected
/// neighbors, or one of those neighbors, is not in `time_index`.
#[instrument(skip(neighbors, time_index), fields(samples = neighbors.len()))]
pub fn linear_attachment_score(
    neighbors: &NeighborMap,
    time_index: &TimeIndex,
    sigma: f64,
    normalized: bool,
) -> Result<f64> {
    let (Some(t_min), Some(t_max)) = (time_index.min(), time_index.max()) else {
        return Ok(f64::NAN);
    };
    let span = days_between(t_max, t_min);

    let mut scores = Vec::new();
    for (sample, candidates) in neighbors.iter() {
        let mut diffs = Vec::new();
        for (neighbor, &score) in candidates {
            if score < sigma {
                continue;
            }
            let t1 = time_index.require(sample)?;
            let t2 = time_index.require(neighbor)?;
            diffs.push(if normalized {
                normalized_distance(t1, t2, t_min, span)
            } else {
                days_f64(days_between(t1, t2))
            });
        }
        if !diffs.is_empty() {
            scores.push(mean(&diffs));
        }
    }

    if scores.is_empty() || span == 0 {
        return Ok(f64::NAN);
    }
    Ok(mean(&scores) / days_f64(span))
}

/// `(t1 - t2) * span / (t1 - t_min)` in days; 0 when `t1` is on the first day.
fn normalized_distance(
    t1: DateTime<Utc>,
    t2: DateTime<Utc>,
    t_min: DateTime<Utc>,
    span: i64,
) -> f64 {
    let age = days_between(t1, t_min);
    if age == 0 {
        return 0.0;
    }
    days_f64(days_between(t1, t2) * span) / days_f64(age)
}

#[allow(clippy::cast_precision_loss)]
const fn days_f64(days: i64) -> f64 {
    days as f64
}
