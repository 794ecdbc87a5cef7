//! Property tests for neighbor-graph construction and the graph adapters.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use proptest::prelude::*;

use textnet_graph::paths::weak_component_sizes;
use textnet_graph::{GraphView, NeighborMap, TimeIndex, evolving_graphs, to_graph};

/// Up to 12 samples `s0..s11`, each scoring a handful of others.
fn neighbor_map() -> impl Strategy<Value = NeighborMap> {
    prop::collection::vec((0_usize..12, 0_usize..12, 0.0_f64..1.0), 0..48).prop_map(|triples| {
        let mut map = NeighborMap::new();
        for (target, neighbor, score) in triples {
            map.insert(format!("s{target}"), format!("s{neighbor}"), score);
        }
        map
    })
}

fn stamped() -> TimeIndex {
    let origin: DateTime<Utc> = Utc
        .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    (0..12)
        .map(|i| (format!("s{i}"), origin + Duration::days(200 * i)))
        .collect()
}

proptest! {
    #[test]
    fn one_edge_per_selected_neighbor(map in neighbor_map(), sigma in 0.0_f64..1.0) {
        let g = to_graph(&map, sigma);
        prop_assert_eq!(g.edge_count(), map.selected(sigma).count());
        prop_assert!(g.node_count() >= map.len());
    }

    #[test]
    fn raising_sigma_never_adds_edges(map in neighbor_map(), lo in 0.0_f64..1.0, hi in 0.0_f64..1.0) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        prop_assert!(to_graph(&map, hi).edge_count() <= to_graph(&map, lo).edge_count());
    }

    #[test]
    fn degree_sequences_sum_to_edge_count(map in neighbor_map(), sigma in 0.0_f64..1.0) {
        let g = to_graph(&map, sigma);
        let m = GraphView::edge_count(&g.graph);
        prop_assert_eq!(g.graph.out_degrees().iter().sum::<usize>(), m);
        prop_assert_eq!(g.graph.in_degrees().iter().sum::<usize>(), m);
        prop_assert_eq!(g.graph.degrees().iter().sum::<usize>(), 2 * m);
    }

    #[test]
    fn components_partition_nodes(map in neighbor_map(), sigma in 0.0_f64..1.0) {
        let g = to_graph(&map, sigma);
        let sizes = weak_component_sizes(&g.graph);
        prop_assert_eq!(sizes.iter().sum::<usize>(), g.node_count());
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn snapshots_grow_to_full_graph(map in neighbor_map(), sigma in 0.0_f64..1.0) {
        let index = stamped();
        let snapshots: Vec<_> = evolving_graphs(&map, &index, |t| t.year(), sigma)
            .expect("every sample stamped")
            .collect();

        for pair in snapshots.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
            prop_assert!(pair[0].1.node_count() <= pair[1].1.node_count());
            prop_assert!(pair[0].1.edge_count() <= pair[1].1.edge_count());
        }

        let full = to_graph(&map, sigma);
        match snapshots.last() {
            Some((_, last)) => {
                prop_assert_eq!(last.edge_count(), full.edge_count());
                prop_assert_eq!(last.node_count(), full.node_count());
            }
            None => prop_assert!(map.is_empty()),
        }
    }
}
