//! Error types for mixin generation.

use thiserror::Error;

/// Result type alias for mixer operations.
pub type MixerResult<T> = Result<T, MixerError>;

/// Errors that can occur while generating mixin artifacts.
#[derive(Error, Debug)]
pub enum MixerError {
    /// The template engine rejected the snippet. The message is the engine's own.
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Evaluator program '{program}' could not be started: {source}")]
    EvaluatorUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Format conversion failed: {0}")]
    Format(String),

    #[error("Dashboards are not an object of dashboard documents: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Dashboard name {0:?} does not name a file")]
    InvalidDashboardName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
