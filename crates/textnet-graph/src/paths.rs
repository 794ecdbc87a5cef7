//! Unweighted shortest paths, components and clustering over [`GraphView`].
//!
//! Every routine here is a plain BFS/DFS on dense node indices. Unreachable
//! targets are reported as `None` and never enter an aggregate, so a
//! disconnected graph yields the statistics of its connected pairs.

use std::collections::{BTreeSet, VecDeque};

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::view::GraphView;

/// Which edge directions a path may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Follow edges from source to target only.
    Out,
    /// Follow edges backwards only.
    In,
    /// Ignore direction.
    #[default]
    All,
}

impl PathMode {
    fn neighbors<G: GraphView + ?Sized>(self, graph: &G, node: usize) -> Vec<usize> {
        match self {
            Self::Out => graph.adjacent(node, Direction::Outgoing),
            Self::In => graph.adjacent(node, Direction::Incoming),
            Self::All => {
                let mut both = graph.adjacent(node, Direction::Outgoing);
                both.extend(graph.adjacent(node, Direction::Incoming));
                both
            }
        }
    }
}

/// Hop distance from `source` to every node; `None` where unreachable.
#[must_use]
pub fn bfs_distances<G: GraphView + ?Sized>(
    graph: &G,
    source: usize,
    mode: PathMode,
) -> Vec<Option<usize>> {
    let mut dist = vec![None; graph.node_count()];
    if source >= dist.len() {
        return dist;
    }
    dist[source] = Some(0);

    let mut queue = VecDeque::from([source]);
    while let Some(node) = queue.pop_front() {
        let next = dist[node].map_or(0, |d| d + 1);
        for neighbor in mode.neighbors(graph, node) {
            if dist[neighbor].is_none() {
                dist[neighbor] = Some(next);
                queue.push_back(neighbor);
            }
        }
    }
    dist
}

/// Greatest finite distance from `node` to any reachable node.
///
/// An isolated node has eccentricity 0.
#[must_use]
pub fn eccentricity<G: GraphView + ?Sized>(graph: &G, node: usize, mode: PathMode) -> usize {
    bfs_distances(graph, node, mode)
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
}

/// Eccentricity of every node, by dense index.
#[must_use]
pub fn eccentricities<G: GraphView + ?Sized>(graph: &G, mode: PathMode) -> Vec<usize> {
    (0..graph.node_count())
        .map(|v| eccentricity(graph, v, mode))
        .collect()
}

/// Longest finite shortest path under `mode`.
///
/// Returns `None` for a graph without nodes; 0 when no two nodes are
/// connected.
#[must_use]
pub fn diameter<G: GraphView + ?Sized>(graph: &G, mode: PathMode) -> Option<usize> {
    if graph.node_count() == 0 {
        return None;
    }
    Some(eccentricities(graph, mode).into_iter().max().unwrap_or(0))
}

/// Mean shortest-path length over ordered pairs `(u, v)`, `u != v`, with a
/// path from `u` to `v` under `mode`.
///
/// Returns `None` when no such pair exists.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_path_length<G: GraphView + ?Sized>(graph: &G, mode: PathMode) -> Option<f64> {
    let mut total = 0usize;
    let mut pairs = 0usize;
    for source in 0..graph.node_count() {
        for (target, d) in bfs_distances(graph, source, mode).into_iter().enumerate() {
            if target == source {
                continue;
            }
            if let Some(d) = d {
                total += d;
                pairs += 1;
            }
        }
    }
    (pairs > 0).then(|| total as f64 / pairs as f64)
}

/// Sizes of the weakly connected components, largest first.
#[must_use]
pub fn weak_component_sizes<G: GraphView + ?Sized>(graph: &G) -> Vec<usize> {
    let node_count = graph.node_count();
    let mut visited = vec![false; node_count];
    let mut sizes = Vec::new();

    for start in 0..node_count {
        if visited[start] {
            continue;
        }

        let mut stack = vec![start];
        let mut component_size = 0usize;
        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            component_size += 1;

            for neighbor in PathMode::All.neighbors(graph, node) {
                if !visited[neighbor] {
                    stack.push(neighbor);
                }
            }
        }
        sizes.push(component_size);
    }

    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// Distinct undirected neighbors of every node, self-loops dropped.
#[must_use]
pub fn undirected_neighbor_sets<G: GraphView + ?Sized>(graph: &G) -> Vec<BTreeSet<usize>> {
    (0..graph.node_count())
        .map(|v| {
            PathMode::All
                .neighbors(graph, v)
                .into_iter()
                .filter(|&u| u != v)
                .collect()
        })
        .collect()
}

/// Local clustering coefficient of every node on the simple undirected
/// projection of the graph.
///
/// Nodes with fewer than two distinct neighbors have no coefficient.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn local_clustering<G: GraphView + ?Sized>(graph: &G) -> Vec<Option<f64>> {
    let sets = undirected_neighbor_sets(graph);
    sets.iter()
        .map(|neigh| {
            let k = neigh.len();
            if k < 2 {
                return None;
            }
            let members: Vec<usize> = neigh.iter().copied().collect();
            let mut links = 0usize;
            for (i, &u) in members.iter().enumerate() {
                for &w in &members[i + 1..] {
                    if sets[u].contains(&w) {
                        links += 1;
                    }
                }
            }
            let possible = k * (k - 1) / 2;
            Some(links as f64 / possible as f64)
        })
        .collect()
}

/// Mean of [`local_clustering`] over the nodes that have a coefficient.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_local_clustering<G: GraphView + ?Sized>(graph: &G) -> Option<f64> {
    let defined: Vec<f64> = local_clustering(graph).into_iter().flatten().collect();
    if defined.is_empty() {
        return None;
    }
    Some(defined.iter().sum::<f64>() / defined.len() as f64)
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
    fn bfs_respects_direction() {
        let g = graph(3, &[(0, 1), (1, 2)]);
        assert_eq!(bfs_distances(&g, 0, PathMode::Out), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(bfs_distances(&g, 0, PathMode::In), vec![Some(0), None, None]);
        assert_eq!(bfs_distances(&g, 2, PathMode::All), vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn bfs_out_of_range_source_reaches_nothing() {
        let g = graph(2, &[(0, 1)]);
        assert_eq!(bfs_distances(&g, 5, PathMode::Out), vec![None, None]);
    }

    #[test]
    fn eccentricity_of_isolated_node_is_zero() {
        let g = graph(3, &[(0, 1)]);
        assert_eq!(eccentricity(&g, 2, PathMode::All), 0);
        assert_eq!(eccentricities(&g, PathMode::Out), vec![1, 0, 0]);
    }

    #[test]
    fn diameter_cases() {
        assert_eq!(diameter(&graph(0, &[]), PathMode::Out), None);
        assert_eq!(diameter(&graph(2, &[]), PathMode::Out), Some(0));
        assert_eq!(diameter(&graph(4, &[(0, 1), (1, 2), (2, 3)]), PathMode::Out), Some(3));
    }

    #[test]
    fn average_path_length_chain() {
        // Undirected chain 0-1-2: distances 1,2,1 each way → 8 / 6.
        let g = graph(3, &[(0, 1), (1, 2)]);
        let apl = average_path_length(&g, PathMode::All).expect("connected pairs");
        assert!((apl - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(average_path_length(&graph(2, &[]), PathMode::All), None);
    }

    #[test]
    fn components_sorted_descending() {
        let g = graph(6, &[(0, 1), (2, 3), (3, 4)]);
        assert_eq!(weak_component_sizes(&g), vec![3, 2, 1]);
        assert!(weak_component_sizes(&graph(0, &[])).is_empty());
    }

    #[test]
    fn clustering_triangle_with_tail() {
        // Triangle 0,1,2 plus tail 2→3.
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let cc = local_clustering(&g);
        assert_eq!(cc[0], Some(1.0));
        assert_eq!(cc[1], Some(1.0));
        let c2 = cc[2].expect("degree 3");
        assert!((c2 - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cc[3], None);

        let avg = average_local_clustering(&g).expect("defined");
        assert!((avg - 7.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn clustering_ignores_mutual_edges_and_loops() {
        let g = graph(3, &[(0, 1), (1, 0), (0, 0), (0, 2)]);
        let sets = undirected_neighbor_sets(&g);
        assert_eq!(sets[0], BTreeSet::from([1, 2]));
        assert_eq!(local_clustering(&g)[0], Some(0.0));
    }
}
