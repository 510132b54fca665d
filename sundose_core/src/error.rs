//! Error types for the sundose_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sundose_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Date or time parsing error
    #[error("invalid date or time: {0}")]
    Time(#[from] chrono::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User profile error
    #[error("Profile error: {0}")]
    Profile(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    Input(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
