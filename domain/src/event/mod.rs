//! Execution events — the gateway's lifecycle notifications.
//!
//! Emission order for one call: `Started` (before domain logic runs) →
//! exactly one of `Succeeded`/`Failed` (after normalization). Arguments
//! carried on events are sanitized before emission.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Why a call failed. `policy_denied_*` reasons short-circuit before domain
/// execution; `validation` and `execution` happen around the handler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PolicyDeniedScope,
    PolicyDeniedMode,
    PolicyDeniedCategory,
    PolicyDeniedRateLimit,
    Validation,
    Execution,
    AccessDenied,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::PolicyDeniedScope => "policy_denied_scope",
            FailureReason::PolicyDeniedMode => "policy_denied_mode",
            FailureReason::PolicyDeniedCategory => "policy_denied_category",
            FailureReason::PolicyDeniedRateLimit => "policy_denied_rate_limit",
            FailureReason::Validation => "validation",
            FailureReason::Execution => "execution",
            FailureReason::AccessDenied => "access_denied",
        }
    }

    /// Whether this failure was a policy short-circuit (domain logic never ran).
    pub fn is_policy_denial(&self) -> bool {
        matches!(
            self,
            FailureReason::PolicyDeniedScope
                | FailureReason::PolicyDeniedMode
                | FailureReason::PolicyDeniedCategory
                | FailureReason::PolicyDeniedRateLimit
                | FailureReason::AccessDenied
        )
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A gateway lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionEvent {
    Started {
        tool_id: String,
        request_id: String,
        arguments: Map<String, Value>,
    },
    Succeeded {
        tool_id: String,
        request_id: String,
        arguments: Map<String, Value>,
        duration_ms: u64,
    },
    Failed {
        tool_id: String,
        request_id: String,
        arguments: Map<String, Value>,
        duration_ms: u64,
        reason: FailureReason,
        /// Underlying error summary, when one exists
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ExecutionEvent {
    pub fn tool_id(&self) -> &str {
        match self {
            ExecutionEvent::Started { tool_id, .. }
            | ExecutionEvent::Succeeded { tool_id, .. }
            | ExecutionEvent::Failed { tool_id, .. } => tool_id,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            ExecutionEvent::Started { request_id, .. }
            | ExecutionEvent::Succeeded { request_id, .. }
            | ExecutionEvent::Failed { request_id, .. } => request_id,
        }
    }
}
