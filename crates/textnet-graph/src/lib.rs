#![forbid(unsafe_code)]
//! textnet-graph library.
//!
//! Builds directed graphs from time-indexed nearest-neighbor maps and exposes
//! them, together with plain petgraph graphs, through the [`GraphView`]
//! capability trait used by `textnet-stats`.
//!
//! ## Pipeline
//!
//! ```text
//! NeighborMap (+ TimeIndex)
//!        ↓  build::to_graph() / build::evolving_graphs()
//! NeighborGraph (DiGraph<String, f64>)
//!        ↓  view::GraphView
//! paths::{bfs_distances, eccentricities, weak_component_sizes, ...}
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`GraphError`] via `thiserror`.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`).

pub mod build;
pub mod error;
pub mod neighbors;
pub mod paths;
pub mod view;

pub use build::{NeighborGraph, evolving_graphs, to_graph};
pub use error::GraphError;
pub use neighbors::{NeighborMap, TimeIndex, days_between};
pub use paths::PathMode;
pub use view::GraphView;

pub use petgraph::Direction;
