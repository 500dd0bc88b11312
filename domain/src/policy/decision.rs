//! Policy decisions.

use crate::tool::{CanonicalResult, ErrorCode};

/// A terminal policy denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub code: ErrorCode,
    pub reason: String,
    /// Seconds until retry, for rate-limit denials
    pub retry_after: Option<u64>,
}

impl Denial {
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Convert into the caller-facing result shape.
    pub fn into_result(self) -> CanonicalResult {
        let result = CanonicalResult::denied(self.code, self.reason);
        match self.retry_after {
            Some(seconds) => result.with_retry_after(seconds),
            None => result,
        }
    }
}

/// Outcome of a policy evaluation. Denials are deterministic: same inputs
/// produce the same decision, modulo rate-limit window state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn denied(code: ErrorCode, reason: impl Into<String>) -> Self {
        Decision::Denied(Denial::new(code, reason))
    }
}
