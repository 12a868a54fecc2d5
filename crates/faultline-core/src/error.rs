//! Error types for fault tree analysis

use thiserror::Error;

/// Result type for analysis operations
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while setting up or running an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Analysis parameter outside of its valid domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Indexed fault tree violates a structural precondition
    #[error("Invalid fault tree: {0}")]
    InvalidTree(String),

    /// Cut set literal refers to an event missing from the database
    #[error("Unknown basic event: {0}")]
    UnknownEvent(String),

    /// Cut set literal is neither `id` nor `not id`
    #[error("Malformed literal: '{0}'")]
    MalformedLiteral(String),

    /// Probability distribution rejected for a basic event
    #[error("Invalid distribution for '{event}': {reason}")]
    InvalidDistribution { event: String, reason: String },

    /// Settings could not be parsed or validated
    #[error("Settings error: {0}")]
    Settings(String),

    /// I/O error reading a settings file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Settings(err.to_string())
    }
}
