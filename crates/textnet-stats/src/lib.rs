#![forbid(unsafe_code)]
//! textnet-stats library.
//!
//! Descriptive statistics for graphs built from time-indexed nearest-neighbor
//! maps: topology summaries per snapshot, sweeps over time and over the
//! neighbor threshold, inequality measures, empirical distributions and the
//! densification power law.
//!
//! ```rust,ignore
//! use textnet_graph::{NeighborMap, TimeIndex, to_graph};
//! use textnet_stats::{graph_statistics, eval_sigmas, fit_densification, SweepRange};
//!
//! let neighbors: NeighborMap = /* bootstrap neighbors */;
//! let stats = graph_statistics(&to_graph(&neighbors, 0.5).graph, 0);
//! println!("n={} m={} density={:.3}", stats.n, stats.m, stats.density);
//!
//! let table = eval_sigmas(&neighbors, &time_index, &SweepRange::default())?;
//! let fit = fit_densification(&table, None)?;
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`StatsError`] via `thiserror`; config loading uses
//!   `anyhow::Result`.
//! - **Degenerate input**: empty graphs and samples too small for a
//!   statistic produce 0 or NaN, never an error.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`, `trace!`).

pub mod attachment;
pub mod config;
pub mod densification;
pub mod describe;
pub mod distribution;
pub mod error;
pub mod evolution;
pub mod graph_stats;
pub mod inequality;
pub mod table;

pub use attachment::linear_attachment_score;
pub use config::{StatsConfig, load_config};
pub use densification::{Densification, PlotSink, SeriesRecorder, fit_densification};
pub use distribution::{DegreeMode, KsResult, ccdf, cdf, degree_hist, kolmogorov_smirnoff};
pub use error::StatsError;
pub use evolution::{SweepRange, eval_sigmas, evolving_graph_statistics, sigma_range};
pub use graph_stats::{DiameterMode, GraphStatistics, effective_diameter, graph_statistics};
pub use inequality::{gini_coeff, lorenz};
pub use table::{StatisticsRow, StatisticsTable};
