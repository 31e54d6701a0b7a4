//! Error types for the similarity pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or reading a similarity matrix
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// Original error
        #[source]
        source: std::io::Error,
    },

    /// Missing, empty or structurally unusable input
    #[error("Input error: {0}")]
    Input(String),

    /// Corpus cannot produce a meaningful matrix
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A similarity value broke the matrix invariants
    #[error("Numeric anomaly at ({row}, {col}): {value} ({reason})")]
    NumericAnomaly {
        /// Row occupation key
        row: String,
        /// Column occupation key
        col: String,
        /// Offending value
        value: f64,
        /// Which invariant failed
        reason: &'static str,
    },

    /// Lookup key is not part of the matrix
    #[error("Occupation not found in similarity index: {0}")]
    UnknownOccupation(String),

    /// Persisted artifact does not have the expected layout
    #[error("Malformed matrix artifact {path}: {reason}")]
    Format {
        /// Artifact path
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// CBOR snapshot encode/decode failure
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format { path: path.into(), reason: reason.into() }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PipelineError>;
