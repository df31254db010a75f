//! Error types for flowsift-db

use thiserror::Error;

/// Result type alias for flowsift-db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading reference records
#[derive(Error, Debug)]
pub enum Error {
    /// Connection or query failure from the database driver
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<Error> for flowsift_core::Error {
    fn from(err: Error) -> Self {
        flowsift_core::Error::Source {
            message: err.to_string(),
        }
    }
}
