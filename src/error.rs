//! Crate-wide error type.

/// Errors produced while configuring, loading, or running a descriptor fit.
///
/// Mutation operators never fail: an operator whose preconditions are not
/// met returns `None` and the search moves on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A comparison metric identifier that is not one of `l1`, `l2`,
    /// `cosine`, `js`.
    #[error("unknown comparison metric: {0}")]
    UnknownMetric(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Area data that cannot be turned into a target distribution.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
