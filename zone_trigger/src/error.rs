//! Error types shared by the editor, the arbitration engine and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected editor input.  The editor still returns to default mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("'{0}' is not a valid number (expected a digit 0-9)")]
    InvalidNumber(char),
}

/// A key actuator could not deliver a press or release.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("key actuation failed for '{key}': {message}")]
pub struct ActuationError {
    pub key: char,
    pub message: String,
}

impl ActuationError {
    pub fn new(key: char, message: impl Into<String>) -> Self {
        ActuationError { key, message: message.into() }
    }
}

/// Reading or writing a zone save file failed.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("save file I/O failed for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("save file '{}' is not valid zone data: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no save file has been recorded yet")]
    NoSavePath,
}
