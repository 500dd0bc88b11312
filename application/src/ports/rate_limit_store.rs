//! Rate-limit store port
//!
//! The usage counters are the one piece of state shared across concurrent
//! requests from the same caller. The store owns the atomicity: the whole
//! check-and-charge of every applicable class happens in one critical
//! section, so two concurrent calls can never both observe `count < limit`
//! and both proceed past it. Charging is all-or-nothing — nothing is
//! committed when any class denies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toolgate_domain::ratelimit::{Quota, QuotaClass};

/// A denial from the store: which quota was exceeded and when to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaExceeded {
    pub quota: Quota,
    pub retry_after: u64,
}

impl QuotaExceeded {
    /// Caller-facing denial message.
    pub fn message(&self) -> String {
        format!(
            "Rate limit exceeded: Maximum {} {} operations per {}. Try again in {} seconds.",
            self.quota.limit,
            self.quota.class.operation_label(),
            self.quota.class.window_label(),
            self.retry_after
        )
    }
}

/// Point-in-time usage of one quota class, for the status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub class: QuotaClass,
    pub limit: i64,
    pub count: i64,
    pub window_seconds: i64,
}

/// Port for the shared usage-counter store.
pub trait RateLimitStore: Send + Sync {
    /// Check every quota and, only if all pass, charge them all. Window
    /// rollover is applied before checking.
    fn check_and_charge(
        &self,
        caller: &str,
        quotas: &[Quota],
        now: DateTime<Utc>,
    ) -> Result<(), QuotaExceeded>;

    /// Current usage per quota, without charging.
    fn usage(&self, caller: &str, quotas: &[Quota], now: DateTime<Utc>) -> Vec<UsageSnapshot>;

    /// Clear a caller's counters (administrative reset).
    fn reset(&self, caller: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeded_message() {
        let exceeded = QuotaExceeded {
            quota: Quota::new(QuotaClass::WritesPerMinute, 30),
            retry_after: 42,
        };
        assert_eq!(
            exceeded.message(),
            "Rate limit exceeded: Maximum 30 write operations per minute. Try again in 42 seconds."
        );
    }
}
