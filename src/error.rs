//! Error types for the simulator
//!
//! This module defines all error types used throughout the simulator.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.

use thiserror::Error;

/// The primary error type for simulator operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration-related errors (invalid config file, bad interval,
    /// another emitter already owning the socket path, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Socket lifecycle errors (bind/listen failures with path context)
    #[error("Socket error: {0}")]
    Socket(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;
