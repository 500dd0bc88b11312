//! Status use case — the operator-facing view of the gateway.
//!
//! Read-only: reports current scopes, mode flags, and per-class rate-limit
//! usage for the calling identity. Never charges quotas and plays no part in
//! the policy decision itself.

use crate::rate_limiter::{RateLimitStatus, RateLimiter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolgate_domain::policy::PolicyConfig;
use toolgate_domain::scope::ScopeAuthority;

/// Snapshot returned by the status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayStatus {
    pub caller: String,
    pub scopes: Vec<String>,
    pub read_only_mode: bool,
    pub config_only_mode: bool,
    pub config_only_allowed_write_kinds: Vec<String>,
    pub audit_enabled: bool,
    pub rate_limits: RateLimitStatus,
}

/// Use case for the read-only status query.
pub struct StatusUseCase {
    policy: PolicyConfig,
    scopes: Arc<ScopeAuthority>,
    rate_limiter: RateLimiter,
}

impl StatusUseCase {
    pub fn new(policy: PolicyConfig, scopes: Arc<ScopeAuthority>, rate_limiter: RateLimiter) -> Self {
        Self {
            policy,
            scopes,
            rate_limiter,
        }
    }

    pub fn query(&self, caller: &str) -> GatewayStatus {
        GatewayStatus {
            caller: caller.to_string(),
            scopes: self.scopes.current_scopes().labels(),
            read_only_mode: self.policy.read_only_mode,
            config_only_mode: self.policy.config_only_mode,
            config_only_allowed_write_kinds: self
                .policy
                .effective_allowed_write_kinds()
                .iter()
                .map(|k| k.to_string())
                .collect(),
            audit_enabled: self.policy.audit_enabled,
            rate_limits: self.rate_limiter.status(caller),
        }
    }
}
