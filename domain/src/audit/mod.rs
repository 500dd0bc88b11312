//! Audit entries — the durable record of every policy decision and
//! execution outcome.
//!
//! Entries are append-only: created once per terminal decision, never
//! mutated or deleted by this subsystem. The shape is stable for downstream
//! log/SIEM tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Terminal outcome of a gateway decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Tool ran and reported success
    Success,
    /// Tool ran and reported failure, or validation/execution failed
    Failure,
    /// A policy check denied the call before domain logic ran
    Denied,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
            AuditOutcome::Denied => "denied",
        }
    }
}

/// One appended audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Caller identity
    pub actor: String,
    /// The operation performed (tool id)
    pub action: String,
    /// Tool category
    pub target_type: String,
    /// Identifier of the affected target
    pub target_id: String,
    pub outcome: AuditOutcome,
    pub timestamp: DateTime<Utc>,
    /// Additional context. Callers must sanitize sensitive values before
    /// attaching them (see [`crate::util::sanitize_map`]).
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            target_type: target_type.into(),
            target_id: target_id.into(),
            outcome,
            timestamp: Utc::now(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata_map(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}
