//! Analysis parameters, loadable from a TOML file.
//!
//! ```toml
//! sigma = 0.5
//! lower_degree_bound = 0
//! normalized_attachment = true
//!
//! [sweep]
//! min_sigma = 0.0
//! max_sigma = 1.0
//! step = 0.01
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use textnet_graph::{NeighborMap, TimeIndex};

use crate::attachment::linear_attachment_score;
use crate::error::StatsError;
use crate::evolution::{SweepRange, eval_sigmas, evolving_graph_statistics};
use crate::table::StatisticsTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Neighbor score threshold for graph edges.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Degree bound for the mean-degree and Gini statistics; -1 keeps
    /// isolated nodes.
    #[serde(default)]
    pub lower_degree_bound: i64,
    #[serde(default = "default_true")]
    pub normalized_attachment: bool,
    #[serde(default)]
    pub sweep: SweepRange,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            sigma: default_sigma(),
            lower_degree_bound: 0,
            normalized_attachment: default_true(),
            sweep: SweepRange::default(),
        }
    }
}

const fn default_sigma() -> f64 {
    0.5
}

const fn default_true() -> bool {
    true
}

impl StatsConfig {
    /// Reject parameters no computation can use.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidStep`] for a non-positive sweep step or
    /// one too fine for a single sweep.
    pub fn validate(&self) -> std::result::Result<(), StatsError> {
        self.sweep.step_count().map(|_| ())
    }

    /// [`evolving_graph_statistics`] with this config's sigma and degree bound.
    ///
    /// # Errors
    ///
    /// See [`evolving_graph_statistics`].
    pub fn evolving_statistics<K, F>(
        &self,
        neighbors: &NeighborMap,
        time_index: &TimeIndex,
        groupby: F,
    ) -> std::result::Result<StatisticsTable<K>, StatsError>
    where
        K: Ord + Clone + std::fmt::Debug,
        F: Fn(DateTime<Utc>) -> K,
    {
        evolving_graph_statistics(
            neighbors,
            time_index,
            groupby,
            self.sigma,
            self.lower_degree_bound,
        )
    }

    /// [`eval_sigmas`] over this config's sweep range.
    ///
    /// # Errors
    ///
    /// See [`eval_sigmas`].
    pub fn sigma_sweep(
        &self,
        neighbors: &NeighborMap,
        time_index: &TimeIndex,
    ) -> std::result::Result<StatisticsTable<f64>, StatsError> {
        eval_sigmas(neighbors, time_index, &self.sweep)
    }

    /// [`linear_attachment_score`] at this config's sigma.
    ///
    /// # Errors
    ///
    /// See [`linear_attachment_score`].
    pub fn attachment_score(
        &self,
        neighbors: &NeighborMap,
        time_index: &TimeIndex,
    ) -> std::result::Result<f64, StatsError> {
        linear_attachment_score(neighbors, time_index, self.sigma, self.normalized_attachment)
    }
}

/// Load a [`StatsConfig`] from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, is not valid
/// TOML, or fails [`StatsConfig::validate`].
pub fn load_config(path: &Path) -> Result<StatsConfig> {
    if !path.exists() {
        return Ok(StatsConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: StatsConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}
