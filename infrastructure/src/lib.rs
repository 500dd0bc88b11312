//! Infrastructure layer for toolgate
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, the JSONL audit sink, the
//! in-memory rate-limit store, the config-driven permission checker, event
//! subscribers, and the built-in demo tool handlers.

pub mod audit;
pub mod config;
pub mod events;
pub mod identity;
pub mod permissions;
pub mod ratelimit;
pub mod tools;
pub mod tracker;

// Re-export commonly used types
pub use audit::JsonlAuditSink;
pub use config::{ConfigLoader, FileConfig};
pub use events::TracingEventLogger;
pub use identity::{derive_caller_id, local_fingerprint, short_display};
pub use permissions::ConfigPermissionChecker;
pub use ratelimit::InMemoryRateLimitStore;
pub use tools::default_registry;
pub use tracker::{ChangeRecord, ChangeTracker};
