//! Rate limiter service — decides which quota classes apply to a call and
//! drives the shared store.
//!
//! Disabling rate limiting entirely short-circuits to always-allowed and
//! records no usage. Read operations are never charged; the gateway only
//! calls [`check_and_charge()`](RateLimiter::check_and_charge) for mutating
//! tools.

use crate::ports::rate_limit_store::{QuotaExceeded, RateLimitStore, UsageSnapshot};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolgate_domain::policy::RateLimitSettings;
use toolgate_domain::ratelimit::{classes_for, quota_catalog};
use toolgate_domain::tool::ChargeClass;

/// Rate-limit state for the status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub enabled: bool,
    pub usage: Vec<UsageSnapshot>,
}

/// Per-caller rate limiting across the quota-class catalog.
#[derive(Clone)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings, store: Arc<dyn RateLimitStore>) -> Self {
        Self { settings, store }
    }

    /// Check every class applicable to `charge` and commit the charges only
    /// if all pass.
    pub fn check_and_charge(
        &self,
        caller: &str,
        charge: ChargeClass,
    ) -> Result<(), QuotaExceeded> {
        if !self.settings.enabled {
            return Ok(());
        }

        let classes = classes_for(charge);
        let quotas: Vec<_> = quota_catalog(&self.settings)
            .into_iter()
            .filter(|q| classes.contains(&q.class))
            .collect();

        if quotas.is_empty() {
            return Ok(());
        }

        self.store.check_and_charge(caller, &quotas, Utc::now())
    }

    /// Current usage for every configured class, without charging.
    pub fn status(&self, caller: &str) -> RateLimitStatus {
        if !self.settings.enabled {
            return RateLimitStatus {
                enabled: false,
                usage: Vec::new(),
            };
        }

        let quotas = quota_catalog(&self.settings);
        RateLimitStatus {
            enabled: true,
            usage: self.store.usage(caller, &quotas, Utc::now()),
        }
    }

    /// Clear a caller's counters (administrative reset).
    pub fn reset(&self, caller: &str) {
        self.store.reset(caller);
    }
}
