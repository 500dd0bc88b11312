//! Domain layer for toolgate
//!
//! This crate contains the gateway's core types and policy logic. It has no
//! dependencies on infrastructure or presentation concerns and performs no
//! I/O.
//!
//! # Core Concepts
//!
//! ## Policy
//!
//! Every tool call passes four checks before its domain logic may run:
//!
//! - **Category permission**: the caller holds `"use <category>"`
//! - **Scope**: the connection's scope set covers the operation kind
//! - **Global modes**: read-only mode (hard kill switch) and config-only
//!   mode (write-kind allow-list); read-only always wins
//! - **Rate limits**: fixed-window quotas per caller and class
//!
//! ## Accounting
//!
//! Each terminal decision produces one [`AuditEntry`] and one
//! [`ExecutionEvent`], and every heterogeneous tool output is normalized
//! into a single [`CanonicalResult`] so callers see one response contract
//! regardless of which layer failed.

pub mod audit;
pub mod context;
pub mod core;
pub mod event;
pub mod policy;
pub mod ratelimit;
pub mod scope;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use audit::{AuditEntry, AuditOutcome};
pub use context::{CallContext, ContextGuard};
pub use core::DomainError;
pub use event::{ExecutionEvent, FailureReason};
pub use policy::{
    Decision, Denial, PolicyConfig, RateLimitSettings, evaluate_modes, is_write_kind_allowed,
};
pub use ratelimit::{Quota, QuotaClass, WindowUsage, classes_for, quota_catalog};
pub use scope::{Scope, ScopeAuthority, ScopeSet, resolve_scopes};
pub use tool::{
    CanonicalResult, ChargeClass, DefaultToolValidator, ErrorCode, OperationKind, ToolCall,
    ToolCatalog, ToolDescriptor, ToolOutput, ToolParameter, ToolValidator, WriteKind,
    default_write_kind,
};
