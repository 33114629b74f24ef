//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::message::RecordError;
use crate::transport::TransportError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the store file failed.
    #[error("Storage I/O error on {}: {source}", path.display())]
    StorageIo {
        /// File the operation was working on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON array of message records.
    #[error("Corrupt message file {}: {source}", path.display())]
    CorruptData {
        /// File that failed to parse.
        path: PathBuf,
        /// Parse error reported by the JSON decoder.
        #[source]
        source: serde_json::Error,
    },

    /// A record was rejected before being stored.
    #[error("Invalid message record: {0}")]
    InvalidRecord(#[from] RecordError),

    /// A message the caller expected to exist is not stored.
    #[error("Message not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error outside the store file (attachments, imports).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mail transport reported a failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Wraps an I/O error together with the store file it concerns.
    pub(crate) fn storage_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageIo {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
