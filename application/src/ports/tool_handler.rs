//! Tool handler port
//!
//! Defines the interface for a tool's domain logic — the external
//! collaborator the gateway fronts. Implementations (the managed system's
//! adapters) live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;
use toolgate_domain::tool::{ToolCall, ToolOutput};

/// Errors raised by a tool's domain logic.
///
/// These are caught at the result-adapter boundary and converted to a
/// canonical failure; a raw handler error never reaches the caller.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Execution(String),

    #[error("Managed system unavailable: {0}")]
    Unavailable(String),
}

/// Port for a single tool's domain logic.
///
/// The gateway calls [`execute()`](ToolHandler::execute) only after every
/// policy check has passed. Handlers report their outcome as a
/// [`ToolOutput`]; returning `Err` signals an unexpected execution failure.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput, HandlerError>;
}
