//! In-memory rate-limit store.
//!
//! Usage counters are shared across concurrent requests from the same
//! caller, so the whole read-modify-write happens under one mutex: every
//! applicable quota is checked against its rolled window first, and only
//! when all pass are the increments written back. Two concurrent calls can
//! never both observe `count < limit` and both slip past the limit, and a
//! denial commits nothing.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use toolgate_application::ports::rate_limit_store::{QuotaExceeded, RateLimitStore, UsageSnapshot};
use toolgate_domain::ratelimit::{Quota, QuotaClass, WindowUsage};

type UsageKey = (String, QuotaClass);

/// Fixed-window counter store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    usage: Mutex<HashMap<UsageKey, WindowUsage>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn check_and_charge(
        &self,
        caller: &str,
        quotas: &[Quota],
        now: DateTime<Utc>,
    ) -> Result<(), QuotaExceeded> {
        let Ok(mut usage) = self.usage.lock() else {
            // A poisoned lock means a panic elsewhere; deny nothing.
            return Ok(());
        };

        // Phase 1: roll every window and check all limits.
        let mut rolled: Vec<(UsageKey, WindowUsage)> = Vec::with_capacity(quotas.len());
        for quota in quotas {
            let key = (caller.to_string(), quota.class);
            let current = usage
                .get(&key)
                .copied()
                .unwrap_or_else(|| WindowUsage::new(now))
                .rolled(quota.window_seconds, now);

            if current.at_limit(quota.limit) {
                return Err(QuotaExceeded {
                    quota: *quota,
                    retry_after: current.retry_after(quota.window_seconds, now),
                });
            }
            rolled.push((key, current));
        }

        // Phase 2: all passed — commit every charge.
        for (key, current) in rolled {
            usage.insert(key, current.charged());
        }

        Ok(())
    }

    fn usage(&self, caller: &str, quotas: &[Quota], now: DateTime<Utc>) -> Vec<UsageSnapshot> {
        let usage = match self.usage.lock() {
            Ok(usage) => usage,
            Err(_) => return Vec::new(),
        };

        quotas
            .iter()
            .map(|quota| {
                let key = (caller.to_string(), quota.class);
                let current = usage
                    .get(&key)
                    .copied()
                    .unwrap_or_else(|| WindowUsage::new(now))
                    .rolled(quota.window_seconds, now);
                UsageSnapshot {
                    class: quota.class,
                    limit: quota.limit,
                    count: current.count,
                    window_seconds: quota.window_seconds,
                }
            })
            .collect()
    }

    fn reset(&self, caller: &str) {
        if let Ok(mut usage) = self.usage.lock() {
            usage.retain(|(c, _), _| c != caller);
        }
    }
}
