//! Application layer for toolgate
//!
//! This crate contains the gateway use cases, port definitions, the rate
//! limiter service, and the execution event bus. It depends only on the
//! domain layer.

pub mod events;
pub mod ports;
pub mod rate_limiter;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use events::{ExecutionEventBus, ExecutionEventSubscriber};
pub use ports::{
    audit_sink::{AuditSink, AuditSinkError, NoAuditSink},
    permissions::{AllowAllPermissions, PermissionChecker, category_permission},
    rate_limit_store::{QuotaExceeded, RateLimitStore, UsageSnapshot},
    tool_handler::{HandlerError, ToolHandler},
};
pub use rate_limiter::{RateLimitStatus, RateLimiter};
pub use registry::ToolRegistry;
pub use use_cases::{
    execute_tool::{ExecuteToolInput, ExecuteToolUseCase},
    status::{GatewayStatus, StatusUseCase},
};
