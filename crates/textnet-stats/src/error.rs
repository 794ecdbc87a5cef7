use textnet_graph::GraphError;

/// Errors returned by the statistics functions.
///
/// Degenerate numeric input (empty graphs, single-value samples, zero
/// totals) is not an error; those cases return 0 or NaN.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// A sample required by the computation is empty.
    #[error("empty sample: {0}")]
    EmptySample(&'static str),

    /// A sample id has no entry in the time index.
    #[error("no timestamp for sample '{0}'")]
    MissingTimestamp(String),

    /// Percentile outside `[0, 100]`.
    #[error("percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    /// Sweep step that is not positive and finite, or too fine for one sweep.
    #[error("sigma step must be positive, finite and coarse enough for one sweep, got {0}")]
    InvalidStep(f64),

    /// Paired series of different lengths.
    #[error("series lengths differ: {0} vs {1}")]
    LengthMismatch(usize, usize),

    /// The least-squares objective is not finite at the starting point.
    #[error("densification fit diverged")]
    FitDiverged,
}

impl From<GraphError> for StatsError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::MissingTimestamp(sample) => Self::MissingTimestamp(sample),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;
