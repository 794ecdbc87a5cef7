//! Read-only graph capability set shared by every statistic.
//!
//! # Overview
//!
//! Statistics never look at a concrete graph type. They only need node and
//! edge counts plus adjacency by dense node index, which [`GraphView`]
//! provides. Two adapters are implemented here:
//!
//! - [`petgraph::graph::DiGraph`]: index-based graph, parallel edges allowed.
//!   Node indices are already dense.
//! - [`petgraph::graphmap::DiGraphMap`]: key-based graph without parallel
//!   edges. Keys are mapped to dense indices in insertion order through
//!   [`NodeIndexable`].
//!
//! Degree sequences, shortest paths and components are derived from the
//! required methods (see [`crate::paths`]), so both representations report
//! identical statistics for the same topology.

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    graphmap::{DiGraphMap, NodeTrait},
    visit::NodeIndexable,
};

/// Minimal read-only view of a directed graph.
///
/// Nodes are addressed by dense indices `0..node_count()`.
pub trait GraphView {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges, parallel edges included.
    fn edge_count(&self) -> usize;

    /// Dense indices of the nodes adjacent to `node` in direction `dir`.
    ///
    /// A node reached through `k` parallel edges appears `k` times. A
    /// self-loop shows up in both directions.
    fn adjacent(&self, node: usize, dir: Direction) -> Vec<usize>;

    /// In-degree of every node, by dense index.
    fn in_degrees(&self) -> Vec<usize> {
        (0..self.node_count())
            .map(|v| self.adjacent(v, Direction::Incoming).len())
            .collect()
    }

    /// Out-degree of every node, by dense index.
    fn out_degrees(&self) -> Vec<usize> {
        (0..self.node_count())
            .map(|v| self.adjacent(v, Direction::Outgoing).len())
            .collect()
    }

    /// Total degree (in + out) of every node, by dense index.
    fn degrees(&self) -> Vec<usize> {
        self.in_degrees()
            .into_iter()
            .zip(self.out_degrees())
            .map(|(i, o)| i + o)
            .collect()
    }
}

impl<G: GraphView + ?Sized> GraphView for &G {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn adjacent(&self, node: usize, dir: Direction) -> Vec<usize> {
        (**self).adjacent(node, dir)
    }
}

impl<N, E> GraphView for DiGraph<N, E> {
    fn node_count(&self) -> usize {
        Self::node_count(self)
    }

    fn edge_count(&self) -> usize {
        Self::edge_count(self)
    }

    fn adjacent(&self, node: usize, dir: Direction) -> Vec<usize> {
        self.neighbors_directed(NodeIndex::new(node), dir)
            .map(NodeIndex::index)
            .collect()
    }
}

impl<N: NodeTrait, E> GraphView for DiGraphMap<N, E> {
    fn node_count(&self) -> usize {
        Self::node_count(self)
    }

    fn edge_count(&self) -> usize {
        Self::edge_count(self)
    }

    fn adjacent(&self, node: usize, dir: Direction) -> Vec<usize> {
        let key = NodeIndexable::from_index(self, node);
        self.neighbors_directed(key, dir)
            .map(|other| NodeIndexable::to_index(self, other))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_digraph() -> DiGraph<&'static str, ()> {
        let mut g = DiGraph::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(a, b, ());
        g.add_edge(b, c, ());
        g
    }

    #[test]
    fn digraph_degrees() {
        let g = chain_digraph();
        assert_eq!(GraphView::in_degrees(&g), vec![0, 1, 1]);
        assert_eq!(GraphView::out_degrees(&g), vec![1, 1, 0]);
        assert_eq!(GraphView::degrees(&g), vec![1, 2, 1]);
    }

    #[test]
    fn digraph_parallel_edges_are_counted() {
        let mut g = DiGraph::<(), ()>::new();
        let a = g.add_node(());
        let b = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(a, b, ());
        assert_eq!(GraphView::edge_count(&g), 2);
        assert_eq!(GraphView::adjacent(&g, 0, Direction::Outgoing), vec![1, 1]);
    }

    #[test]
    fn graphmap_uses_insertion_order_indices() {
        let mut g = DiGraphMap::<u32, ()>::new();
        g.add_node(30);
        g.add_node(10);
        g.add_edge(30, 10, ());
        g.add_edge(10, 20, ());
        assert_eq!(GraphView::node_count(&g), 3);
        assert_eq!(GraphView::adjacent(&g, 0, Direction::Outgoing), vec![1]);
        assert_eq!(GraphView::adjacent(&g, 2, Direction::Incoming), vec![1]);
        assert_eq!(GraphView::in_degrees(&g), vec![0, 1, 1]);
    }

    #[test]
    fn reference_delegates() {
        let g = chain_digraph();
        let r = &g;
        assert_eq!(GraphView::edge_count(&r), 2);
        assert_eq!(GraphView::degrees(&r), vec![1, 2, 1]);
    }
}
