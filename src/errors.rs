//! Typed error hierarchy for the job board.
//!
//! Two enums cover the two layers:
//! - `BoardError` — precondition violations raised by the board core
//! - `StorageError` — failures of the JSON file store used by the shells

use thiserror::Error;

use crate::board::models::JobId;

/// Errors from the board core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Job application {id} not found")]
    JobNotFound { id: JobId },

    #[error("Unknown stage '{value}' (expected one of: {expected})")]
    UnknownStage { value: String, expected: String },
}

/// Errors from the file-backed job store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read job file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write job file at {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock job file at {path}: {source}")]
    Lock {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job file at {path} is not a valid job list: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize job list: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Job file at {path} changed while this command was running; nothing was saved")]
    Conflict { path: std::path::PathBuf },
}
