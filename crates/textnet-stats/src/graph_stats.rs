//! Graph-level topology statistics.
//!
//! # Statistics Provided
//!
//! | key | meaning |
//! |-----|---------|
//! | `n`, `m` | node and edge counts |
//! | `D` | directed diameter (longest finite directed shortest path) |
//! | `ED` | effective diameter: 90th percentile of node eccentricities |
//! | `APL` | average undirected shortest-path length over connected pairs |
//! | `CC` | average local clustering coefficient (undirected, simple) |
//! | `k`, `k_var` | mean total degree above the lower bound; variance over all nodes |
//! | `k_in`, `k_in_var` | the same for in-degree |
//! | `density` | `m / (n (n - 1))` |
//! | `gini_d`, `gini_d_in` | Gini coefficient of degrees / in-degrees above the bound |
//! | `comp_f` | fraction of nodes in the largest weakly connected component |
//!
//! Unreachable pairs never enter a path statistic; they are missing rather
//! than infinite. Statistics that have no defined value for the given graph
//! (for example `APL` without a connected pair) are NaN.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use textnet_graph::paths::{
    average_local_clustering, average_path_length, bfs_distances, diameter, eccentricities,
    weak_component_sizes,
};
use textnet_graph::{GraphView, PathMode};
use tracing::{instrument, trace};

use crate::describe::{as_f64, check_percentile, mean, percentile, variance};
use crate::error::Result;
use crate::inequality::gini_coeff;

/// Percentile used for the `ED` entry of [`GraphStatistics`].
pub const EFFECTIVE_DIAMETER_PERCENTILE: f64 = 90.0;

/// Metric keys in record order.
pub const METRIC_NAMES: [&str; 14] = [
    "n", "m", "D", "ED", "APL", "CC", "k", "k_var", "k_in", "k_in_var", "density", "gini_d",
    "gini_d_in", "comp_f",
];

// ---------------------------------------------------------------------------
// GraphStatistics
// ---------------------------------------------------------------------------

/// Topology summary of one graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub n: usize,
    pub m: usize,
    /// Directed diameter; NaN for a graph without nodes.
    #[serde(rename = "D")]
    pub diameter: f64,
    /// Effective diameter; `None` when no eccentricity exists.
    #[serde(rename = "ED")]
    pub effective_diameter: Option<f64>,
    #[serde(rename = "APL")]
    pub average_path_length: f64,
    #[serde(rename = "CC")]
    pub clustering: f64,
    pub k: f64,
    pub k_var: f64,
    pub k_in: f64,
    pub k_in_var: f64,
    pub density: f64,
    pub gini_d: f64,
    pub gini_d_in: f64,
    pub comp_f: f64,
}

impl GraphStatistics {
    /// Value of the metric named `name` (one of [`METRIC_NAMES`]).
    ///
    /// A missing effective diameter reads as NaN.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(key, _)| *key == name).map(|(_, v)| v)
    }

    /// `(name, value)` pairs in record order.
    #[allow(clippy::cast_precision_loss)]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        let values = [
            self.n as f64,
            self.m as f64,
            self.diameter,
            self.effective_diameter.unwrap_or(f64::NAN),
            self.average_path_length,
            self.clustering,
            self.k,
            self.k_var,
            self.k_in,
            self.k_in_var,
            self.density,
            self.gini_d,
            self.gini_d_in,
            self.comp_f,
        ];
        METRIC_NAMES.into_iter().zip(values)
    }
}

/// Compute [`GraphStatistics`] for `graph`.
///
/// `lower_degree_bound` restricts the `k`, `k_in`, `gini_d` and `gini_d_in`
/// entries to nodes whose degree exceeds it: 0 drops isolated nodes, -1
/// keeps every node. The variances always cover every node.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph), fields(n = graph.node_count(), m = graph.edge_count()))]
pub fn graph_statistics<G: GraphView + ?Sized>(
    graph: &G,
    lower_degree_bound: i64,
) -> GraphStatistics {
    let n = graph.node_count();
    let m = graph.edge_count();

    let degrees = graph.degrees();
    let in_degrees = graph.in_degrees();
    let above = |ds: &[usize]| -> Vec<f64> {
        ds.iter()
            .filter(|&&d| i64::try_from(d).map_or(true, |d| d > lower_degree_bound))
            .map(|&d| d as f64)
            .collect()
    };
    let degrees_above = above(&degrees);
    let in_degrees_above = above(&in_degrees);

    let comp_f = weak_component_sizes(graph)
        .first()
        .map_or(0.0, |&largest| largest as f64 / n as f64);

    let stats = GraphStatistics {
        n,
        m,
        diameter: diameter(graph, PathMode::Out).map_or(f64::NAN, |d| d as f64),
        effective_diameter: eccentricity_percentile(graph, EFFECTIVE_DIAMETER_PERCENTILE),
        average_path_length: average_path_length(graph, PathMode::All).unwrap_or(f64::NAN),
        clustering: average_local_clustering(graph).unwrap_or(f64::NAN),
        k: mean(&degrees_above),
        k_var: variance(&as_f64(&degrees)),
        k_in: mean(&in_degrees_above),
        k_in_var: variance(&as_f64(&in_degrees)),
        density: density(n, m),
        gini_d: gini_coeff(&degrees_above),
        gini_d_in: gini_coeff(&in_degrees_above),
        comp_f,
    };
    trace!(?stats, "graph statistics");
    stats
}

/// Directed density `m / (n (n - 1))`; 0.0 for fewer than two nodes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    edge_count as f64 / (node_count * (node_count - 1)) as f64
}

// ---------------------------------------------------------------------------
// Effective diameter
// ---------------------------------------------------------------------------

/// How [`effective_diameter`] measures each node's reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiameterMode {
    /// Node eccentricities, computed with edge direction ignored.
    Eccentricity,
    /// Row maxima of the full shortest-path matrix under the given mode.
    Matrix(PathMode),
}

impl Default for DiameterMode {
    fn default() -> Self {
        Self::Matrix(PathMode::All)
    }
}

/// The `q`-th percentile of per-node reach.
///
/// Returns `Ok(None)` for a graph without nodes.
///
/// # Errors
///
/// Returns [`crate::StatsError::InvalidPercentile`] if `q` is outside
/// `[0, 100]`.
pub fn effective_diameter<G: GraphView + ?Sized>(
    graph: &G,
    mode: DiameterMode,
    q: f64,
) -> Result<Option<f64>> {
    let q = check_percentile(q)?;
    Ok(match mode {
        DiameterMode::Eccentricity => eccentricity_percentile(graph, q),
        DiameterMode::Matrix(path_mode) => {
            let reach = row_max_finite(&distance_matrix(graph, path_mode));
            percentile(&reach, q)
        }
    })
}

fn eccentricity_percentile<G: GraphView + ?Sized>(graph: &G, q: f64) -> Option<f64> {
    let ecc = as_f64(&eccentricities(graph, PathMode::All));
    percentile(&ecc, q)
}

/// All-pairs hop distances; NaN where the target is unreachable.
#[allow(clippy::cast_precision_loss)]
pub fn distance_matrix<G: GraphView + ?Sized>(graph: &G, mode: PathMode) -> DMatrix<f64> {
    let n = graph.node_count();
    let mut matrix = DMatrix::from_element(n, n, f64::NAN);
    for source in 0..n {
        for (target, d) in bfs_distances(graph, source, mode).into_iter().enumerate() {
            if let Some(d) = d {
                matrix[(source, target)] = d as f64;
            }
        }
    }
    matrix
}

fn row_max_finite(matrix: &DMatrix<f64>) -> Vec<f64> {
    matrix
        .row_iter()
        .map(|row| {
            row.iter()
                .copied()
                .filter(|v| !v.is_nan())
                .fold(f64::NAN, f64::max)
        })
        .filter(|v| !v.is_nan())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::DiGraph;

    fn graph(node_count: usize, edges: &[(usize, usize)]) -> DiGraph<(), ()> {
        let mut g = DiGraph::new();
        let nodes: Vec<_> = (0..node_count).map(|_| g.add_node(())).collect();
        for &(a, b) in edges {
            g.add_edge(nodes[a], nodes[b], ());
        }
        g
    }

    #[test]
    fn density_cases() {
        assert!((density(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((density(1, 0) - 0.0).abs() < f64::EPSILON);
        assert!((density(2, 1) - 0.5).abs() < 1e-12);
        assert!((density(3, 6) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn metric_lookup_by_name() {
        let stats = graph_statistics(&graph(2, &[(0, 1)]), 0);
        assert_eq!(stats.get("n"), Some(2.0));
        assert_eq!(stats.get("m"), Some(1.0));
        assert_eq!(stats.get("density"), Some(0.5));
        assert_eq!(stats.get("nope"), None);
        assert_eq!(stats.iter().count(), METRIC_NAMES.len());
    }

    #[test]
    fn serializes_with_metric_keys() {
        let stats = graph_statistics(&graph(2, &[(0, 1)]), 0);
        let json = serde_json::to_value(&stats).expect("serializable");
        for key in METRIC_NAMES {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn lower_bound_minus_one_keeps_isolated_nodes() {
        // 0 → 1 plus isolated node 2; degrees [1, 1, 0].
        let g = graph(3, &[(0, 1)]);
        let strict = graph_statistics(&g, 0);
        let all = graph_statistics(&g, -1);
        assert!((strict.k - 1.0).abs() < 1e-12);
        assert!((all.k - 2.0 / 3.0).abs() < 1e-12);
        // In-degrees [0, 1, 0]: only node 1 passes the default bound.
        assert!((strict.k_in - 1.0).abs() < 1e-12);
        assert!((all.k_in - 1.0 / 3.0).abs() < 1e-12);
        // Variance ignores the bound.
        assert!((strict.k_var - all.k_var).abs() < 1e-12);
    }

    #[test]
    fn effective_diameter_modes() {
        // Chain 0 → 1 → 2 → 3.
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);

        // Undirected eccentricities [3, 2, 2, 3]; p90 = 3.
        let ecc = effective_diameter(&g, DiameterMode::Eccentricity, 90.0).expect("valid q");
        assert_eq!(ecc, Some(3.0));

        // Directed row maxima [3, 2, 1, 0]; p50 = 1.5.
        let out = effective_diameter(&g, DiameterMode::Matrix(PathMode::Out), 50.0)
            .expect("valid q");
        assert_eq!(out, Some(1.5));

        let none = effective_diameter(&graph(0, &[]), DiameterMode::default(), 90.0)
            .expect("valid q");
        assert_eq!(none, None);

        assert!(effective_diameter(&g, DiameterMode::Eccentricity, 101.0).is_err());
    }

    #[test]
    fn distance_matrix_masks_unreachable() {
        let g = graph(3, &[(0, 1)]);
        let d = distance_matrix(&g, PathMode::Out);
        assert_eq!(d[(0, 1)], 1.0);
        assert!(d[(1, 0)].is_nan());
        assert!(d[(0, 2)].is_nan());
        assert_eq!(d[(2, 2)], 0.0);
    }
}
