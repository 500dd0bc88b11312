//! Tool outputs and the canonical result shape.
//!
//! Every handler produces a [`ToolOutput`] — a closed sum type, so the
//! adapter never probes ad hoc maps for "is this key present". The gateway
//! converts it (or a policy denial, or a caught handler error) into one
//! [`CanonicalResult`], the single response contract every caller sees
//! regardless of which layer failed.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Gateway error codes. Stable identifiers consumed by callers and
/// downstream log tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AccessDenied,
    InsufficientScope,
    ReadOnlyMode,
    ConfigOnlyMode,
    RateLimitExceeded,
    ValidationError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::InsufficientScope => "INSUFFICIENT_SCOPE",
            ErrorCode::ReadOnlyMode => "READ_ONLY_MODE",
            ErrorCode::ConfigOnlyMode => "CONFIG_ONLY_MODE",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw output of a tool handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ToolOutput {
    Success {
        /// Optional human-readable message; defaults to "Success." downstream
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        /// Structured payload returned to the caller
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Map<String, Value>>,
    },
    Failure {
        /// Tool-specific error code (e.g. "NOT_FOUND"), when the handler has one
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        /// Optional message; defaults to "Tool execution failed." downstream
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ToolOutput {
    pub fn success() -> Self {
        ToolOutput::Success {
            message: None,
            data: None,
        }
    }

    pub fn success_with_message(message: impl Into<String>) -> Self {
        ToolOutput::Success {
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_data(self, data: Map<String, Value>) -> Self {
        match self {
            ToolOutput::Success { message, .. } => ToolOutput::Success {
                message,
                data: Some(data),
            },
            failure => failure,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        ToolOutput::Failure {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutput::Success { .. })
    }
}

/// The single normalized shape every tool output, execution error, and
/// policy denial is converted into before it reaches the caller, the audit
/// log, or the event bus.
///
/// Serializes as `{success: true, message, data}` on success and
/// `{success: false, error, code[, retry_after]}` otherwise, matching the
/// wire contract expected by callers.
#[derive(Debug, Clone)]
pub struct CanonicalResult {
    pub success: bool,
    pub message: String,
    pub data: Option<Map<String, Value>>,
    pub error_code: Option<String>,
    /// Seconds until a rate-limited caller may retry
    pub retry_after: Option<u64>,
}

impl CanonicalResult {
    const DEFAULT_SUCCESS: &'static str = "Success.";
    const DEFAULT_FAILURE: &'static str = "Tool execution failed.";

    pub fn success(message: impl Into<String>, data: Option<Map<String, Value>>) -> Self {
        let message = non_empty_or(message.into(), Self::DEFAULT_SUCCESS);
        Self {
            success: true,
            message,
            data,
            error_code: None,
            retry_after: None,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = non_empty_or(message.into(), Self::DEFAULT_FAILURE);
        Self {
            success: false,
            message,
            data: None,
            error_code: Some(code.into()),
            retry_after: None,
        }
    }

    /// A policy denial. Same shape as any other failure; callers see one
    /// response contract regardless of which layer denied.
    pub fn denied(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::failure(code.as_str(), message)
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Normalize a handler's raw output, applying the default messages.
    pub fn from_output(output: ToolOutput) -> Self {
        match output {
            ToolOutput::Success { message, data } => {
                Self::success(message.unwrap_or_default(), data)
            }
            ToolOutput::Failure { code, message } => {
                let message = non_empty_or(message.unwrap_or_default(), Self::DEFAULT_FAILURE);
                Self {
                    success: false,
                    message,
                    data: None,
                    error_code: code,
                    retry_after: None,
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

fn non_empty_or(message: String, default: &str) -> String {
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

impl Serialize for CanonicalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.success)?;
        if self.success {
            map.serialize_entry("message", &self.message)?;
            if let Some(data) = &self.data {
                map.serialize_entry("data", data)?;
            }
        } else {
            map.serialize_entry("error", &self.message)?;
            if let Some(code) = &self.error_code {
                map.serialize_entry("code", code)?;
            }
            if let Some(retry_after) = self.retry_after {
                map.serialize_entry("retry_after", &retry_after)?;
            }
        }
        map.end()
    }
}
