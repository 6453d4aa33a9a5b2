//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `LinecastError`, so functions can simply return `Result<T>`.
use crate::error::LinecastError;

/// Workspace-wide `Result` alias with `LinecastError` as the default error.
pub type Result<T, E = LinecastError> = std::result::Result<T, E>;
