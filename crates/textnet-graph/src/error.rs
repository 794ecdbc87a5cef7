/// Errors raised while assembling graphs from neighbor maps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A sample referenced by the neighbor map has no entry in the time index.
    #[error("no timestamp for sample '{0}'")]
    MissingTimestamp(String),
}
