//! Audit sink port
//!
//! Defines how audit entries are persisted. Recording is fire-and-forget
//! from the gateway's perspective: a sink failure never fails the tool call
//! it describes, but it is surfaced through the event bus so observability
//! subscribers can alert on it.

use thiserror::Error;
use toolgate_domain::audit::AuditEntry;

/// Errors from the audit persistence layer.
#[derive(Error, Debug)]
pub enum AuditSinkError {
    #[error("audit I/O error: {0}")]
    Io(String),

    #[error("audit serialization error: {0}")]
    Serialize(String),
}

/// Port for the append-only audit log.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> Result<(), AuditSinkError>;
}

/// Sink that discards every entry. Used when audit logging is disabled and
/// in tests.
#[derive(Debug, Clone, Default)]
pub struct NoAuditSink;

impl AuditSink for NoAuditSink {
    fn record(&self, _entry: &AuditEntry) -> Result<(), AuditSinkError> {
        Ok(())
    }
}
