//! Common error types for cotrack

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for cotrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across cotrack crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus file is not valid JSON or lacks the `playlists` array
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single playlist record could not be resolved to songs
    #[error("Malformed playlist #{playlist_index} in {}: {reason}", slice.display())]
    MalformedRecord {
        slice: PathBuf,
        playlist_index: usize,
        reason: String,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input or contract violation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
