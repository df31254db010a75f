//! Error types for flowsift-core

use thiserror::Error;

/// Result type alias for flowsift-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in flowsift-core
#[derive(Error, Debug)]
pub enum Error {
    /// Flowfile content is not valid for the transform
    #[error("invalid flowfile content: {message}")]
    InvalidContent {
        /// Description of what's invalid
        message: String,
    },

    /// Field mapping is malformed
    #[error("invalid field mapping: {message}")]
    InvalidMapping {
        /// Description of what's invalid
        message: String,
    },

    /// Record source failure (connection or query)
    #[error("record source error: {message}")]
    Source {
        /// Description of the failure
        message: String,
    },

    /// Transform execution error
    #[error("transform error in '{transform}': {message}")]
    Transform {
        /// Name of the transform
        transform: String,
        /// Description of the error
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
