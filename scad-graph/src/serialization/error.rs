//! Persistence error types

use thiserror::Error;

/// Errors that can occur while saving or loading a circuit.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// IO error reading/writing the underlying file or stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A per-command JSON payload failed to parse or serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The OPEN target does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The frame's magic bytes, or a command payload inside it, are wrong.
    #[error("file corrupted: {reason}")]
    FileCorrupted { reason: String },

    /// The frame's version byte does not match [`super::version::PROTOCOL_VERSION`].
    #[error("incompatible file: found version {found}, expected {expected}")]
    IncompatibleFile { found: u8, expected: u8 },
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
