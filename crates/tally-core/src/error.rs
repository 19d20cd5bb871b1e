//! Error types shared across the tally crates.

use std::path::PathBuf;

use thiserror::Error;

/// A shared error type for the tally storage layer.
///
/// Every failure a caller of the store can observe is one of these
/// variants. Corruption found while loading is not represented here:
/// the load path recovers from it internally and never surfaces it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document rejected by the validator before any disk mutation.
    #[error("invalid dashboard state: {reason}")]
    Validation { reason: String },

    /// Cross-process lock contention exceeded the configured timeout.
    /// Disk state is unchanged; the critical section never started.
    #[error("could not acquire store lock at {path} within {waited_ms} ms")]
    LockTimeout { path: PathBuf, waited_ms: u64 },

    /// OS-level failure during the write path (disk full, permissions, ...).
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization of an in-memory document failed.
    #[error("failed to serialize dashboard state: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Creates a Validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates an Io error tagged with the failed operation and path.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
