//! Common error types for booktag

use thiserror::Error;

/// Common result type for booktag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across booktag crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single row of a bulk insert failed; the batch was rolled back
    #[error("Failed to insert tags for book '{title}': {source}")]
    Insert {
        title: String,
        #[source]
        source: sqlx::Error,
    },

    /// CSV decoding error in the library export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
