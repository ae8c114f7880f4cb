use thiserror::Error;

/// Main error type for rankeval
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Cutoff K must be at least 1
    #[error("Invalid cutoff: k must be greater than 0, got {0}")]
    InvalidCutoff(usize),

    /// Relevance value that is NaN, infinite or negative
    #[error("Invalid relevance value {value} at rank {position}")]
    InvalidRelevance { position: usize, value: f64 },

    /// Inconsistent query data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Judgment file is not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient Result type using MetricsError
pub type Result<T> = std::result::Result<T, MetricsError>;
