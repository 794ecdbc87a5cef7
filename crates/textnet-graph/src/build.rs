//! Graph construction from neighbor maps.
//!
//! # Overview
//!
//! An edge `a → b` means "`b` was selected as a nearest neighbor of `a` with
//! a score of at least sigma". Every sample that has an entry in the
//! neighbor map becomes a node, even when none of its candidates pass the
//! threshold, so downstream metrics see isolated samples too.
//!
//! ## Evolving graphs
//!
//! [`evolving_graphs`] buckets samples by a caller-supplied function of their
//! timestamp (year, decade, month, ...) and yields one cumulative snapshot
//! per bucket, in bucket order: the snapshot for bucket `b` holds every
//! sample whose bucket is `<= b` and the edges among them.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Deref;

use chrono::{DateTime, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::neighbors::{NeighborMap, TimeIndex};

// ---------------------------------------------------------------------------
// NeighborGraph
// ---------------------------------------------------------------------------

/// A directed graph of sample ids built from a [`NeighborMap`].
///
/// Edge weights carry the neighbor score. Dereferences to the underlying
/// [`DiGraph`], which implements [`crate::view::GraphView`].
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    /// Directed graph: nodes = sample ids, edges = selected neighbors.
    pub graph: DiGraph<String, f64>,
    /// Mapping from sample id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl NeighborGraph {
    /// Look up the `NodeIndex` for a sample id.
    #[must_use]
    pub fn node_index(&self, sample: &str) -> Option<NodeIndex> {
        self.node_map.get(sample).copied()
    }

    /// Return the sample id label for a node.
    #[must_use]
    pub fn sample_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Whether the graph has an edge `from → to`.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    fn ensure_node(&mut self, sample: &str) -> NodeIndex {
        if let Some(idx) = self.node_index(sample) {
            return idx;
        }
        let idx = self.graph.add_node(sample.to_string());
        self.node_map.insert(sample.to_string(), idx);
        idx
    }
}

impl Deref for NeighborGraph {
    type Target = DiGraph<String, f64>;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

/// Build the neighbor graph of `neighbors` at threshold `sigma`.
///
/// Samples are inserted in lexicographic order, followed by any selected
/// neighbor that has no entry of its own.
#[must_use]
#[instrument(skip(neighbors), fields(samples = neighbors.len()))]
pub fn to_graph(neighbors: &NeighborMap, sigma: f64) -> NeighborGraph {
    assemble(neighbors, sigma, |_| true)
}

fn assemble(neighbors: &NeighborMap, sigma: f64, keep: impl Fn(&str) -> bool) -> NeighborGraph {
    let mut ng = NeighborGraph::default();

    for (target, _) in neighbors.iter() {
        if keep(target) {
            ng.ensure_node(target);
        }
    }

    for (target, neighbor, score) in neighbors.selected(sigma) {
        if !(keep(target) && keep(neighbor)) {
            continue;
        }
        let from = ng.ensure_node(target);
        let to = ng.ensure_node(neighbor);
        ng.graph.add_edge(from, to, score);
    }

    ng
}

// ---------------------------------------------------------------------------
// Evolving graphs
// ---------------------------------------------------------------------------

/// Cumulative snapshots of the neighbor graph, one per time bucket.
///
/// `groupby` maps a timestamp to its bucket; buckets are visited in
/// ascending order. Snapshots are built lazily as the iterator advances.
///
/// # Errors
///
/// Returns [`GraphError::MissingTimestamp`] if a sample in the neighbor map,
/// or a neighbor selected at `sigma`, has no timestamp.
pub fn evolving_graphs<'a, K, F>(
    neighbors: &'a NeighborMap,
    time_index: &TimeIndex,
    groupby: F,
    sigma: f64,
) -> Result<impl Iterator<Item = (K, NeighborGraph)> + use<'a, K, F>, GraphError>
where
    K: Ord + Clone,
    F: Fn(DateTime<Utc>) -> K,
{
    let mut bucket_of: BTreeMap<&'a str, K> = BTreeMap::new();
    let mut buckets = BTreeSet::new();

    for (target, _) in neighbors.iter() {
        let bucket = groupby(time_index.require(target)?);
        buckets.insert(bucket.clone());
        bucket_of.insert(target, bucket);
    }
    for (_, neighbor, _) in neighbors.selected(sigma) {
        if !bucket_of.contains_key(neighbor) {
            let bucket = groupby(time_index.require(neighbor)?);
            buckets.insert(bucket.clone());
            bucket_of.insert(neighbor, bucket);
        }
    }

    debug!(buckets = buckets.len(), "bucketed samples for evolving graphs");

    Ok(buckets.into_iter().map(move |bucket| {
        let graph = assemble(neighbors, sigma, |sample| {
            bucket_of.get(sample).is_some_and(|b| *b <= bucket)
        });
        (bucket, graph)
    }))
}
