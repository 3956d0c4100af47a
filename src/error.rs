//! Custom error types for ritual.
//!
//! This module provides structured error types that enable better
//! error handling and reporting throughout the application.
//!
//! Internal inconsistencies (the single-writer discipline was violated
//! upstream) are not represented here: those are programming faults and
//! surface as panics, never as recoverable errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ritual operations
#[derive(Error, Debug)]
pub enum RitualError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    /// Snapshot bytes could not be decoded
    #[error("Snapshot decode error: {message}")]
    SnapshotDecode { message: String },

    /// Snapshot could not be encoded
    #[error("Snapshot encode error: {message}")]
    SnapshotEncode { message: String },

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Task store operation failed
    #[error("Store error at {path}: {message}")]
    Store { message: String, path: PathBuf },

    // =========================================================================
    // Task Lookup Errors
    // =========================================================================
    /// No task with the given name
    #[error("Unknown task: {name}")]
    UnknownTask { name: String },

    /// A task with the given name already exists
    #[error("Task already exists: {name}")]
    DuplicateTask { name: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RitualError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a snapshot decode error
    pub fn snapshot_decode(message: impl Into<String>) -> Self {
        Self::SnapshotDecode {
            message: message.into(),
        }
    }

    /// Create a snapshot encode error
    pub fn snapshot_encode(message: impl Into<String>) -> Self {
        Self::SnapshotEncode {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Store {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an unknown-task error
    pub fn unknown_task(name: impl Into<String>) -> Self {
        Self::UnknownTask { name: name.into() }
    }

    /// Check if this error means user input referenced a missing task
    pub fn is_unknown_task(&self) -> bool {
        matches!(self, Self::UnknownTask { .. })
    }
}

/// Type alias for ritual results
pub type Result<T> = std::result::Result<T, RitualError>;
