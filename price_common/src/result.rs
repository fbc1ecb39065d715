//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `PollerError`, so functions can simply return
//! `Result<T>`.
use crate::error::PollerError;

/// Workspace-wide `Result` alias with `PollerError` as the default error.
pub type Result<T, E = PollerError> = std::result::Result<T, E>;
