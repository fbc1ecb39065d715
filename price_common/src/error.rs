//! Error types shared by the poller crates.
//!
//! The `PollerError` enum unifies failures from configuration loading, symbol file
//! parsing, response decoding, the HTTP transport and internal synchronization, so
//! every fallible function in the workspace can return a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the workspace.
#[derive(Error, Debug)]
pub enum PollerError {
    /// I/O error originating from the standard library (files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be read from `path`.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Configuration passed parsing but failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// YAML configuration could not be parsed.
    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml_bw::Error),

    /// Error while parsing a symbols file.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// Failure while decoding JSON via serde_json.
    #[error("JSON deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport-level fetch failure (connection, timeout, non-success status).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// A background thread could not be spawned or terminated abnormally.
    #[error("Thread error: {0}")]
    Thread(String),

    /// A poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for PollerError {
    fn from(err: PoisonError<T>) -> Self {
        PollerError::MutexLock(err.to_string())
    }
}
