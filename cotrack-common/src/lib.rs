//! # cotrack common library
//!
//! Shared code for the cotrack crates:
//! - Song and playlist identity types
//! - Error type used across the workspace
//! - Configuration loading and path resolution
//! - SQLite database initialization

pub mod config;
pub mod db;
pub mod error;
pub mod song;

pub use error::{Error, Result};
pub use song::{Playlist, Song};
