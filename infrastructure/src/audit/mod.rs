//! Audit persistence adapters.

mod jsonl_sink;

pub use jsonl_sink::JsonlAuditSink;
