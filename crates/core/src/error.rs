use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum DashError {
    /// `latest()` or `view()` was requested before the first tick.
    #[error("no readings yet: the sample window is empty")]
    EmptyBuffer,

    /// A consumer references a column the record type does not provide.
    #[error("schema mismatch: {consumer} references column '{column}', available: [{}]", available.join(", "))]
    SchemaMismatch {
        consumer:  String,
        column:    String,
        available: Vec<String>,
    },

    #[error("clock error: {0}")]
    Clock(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;

/// Returned by [`fit_trend`](crate::trend::fit_trend) when fewer than two
/// samples exist. Consumers draw the scatter without a regression line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no trend available: {samples} sample(s), at least 2 required")]
pub struct NoTrendAvailable {
    pub samples: usize,
}
