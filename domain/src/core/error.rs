//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Invalid write kind: {0}")]
    InvalidWriteKind(String),
}
