//! Tool domain module
//!
//! Defines what the gateway knows about the operations it fronts: the
//! immutable [`ToolDescriptor`] registered per operation, the [`ToolCall`]
//! invocation shape, the [`ToolOutput`] sum type every handler produces, and
//! the [`CanonicalResult`] every caller receives.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌─────────────────┐
//! │ ToolCatalog  │───▶│ ToolCall     │───▶│ ToolOutput   │───▶│ CanonicalResult │
//! │ (registry)   │    │ (invocation) │    │ (raw output) │    │ (one contract)  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └─────────────────┘
//! ```
//!
//! The descriptor carries everything policy evaluation needs — category,
//! operation kind, write kind, charge class — so the gateway never inspects
//! a tool's business logic. Validation ([`DefaultToolValidator`]) is pure
//! domain logic run before any policy check.

pub mod call;
pub mod catalog;
pub mod descriptor;
pub mod output;
pub mod validate;

pub use call::ToolCall;
pub use catalog::ToolCatalog;
pub use descriptor::{
    ChargeClass, OperationKind, ToolDescriptor, ToolParameter, WriteKind, default_write_kind,
};
pub use output::{CanonicalResult, ErrorCode, ToolOutput};
pub use validate::{DefaultToolValidator, ToolValidator};
