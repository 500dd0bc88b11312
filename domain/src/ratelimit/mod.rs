//! Rate-limit primitives — quota classes, the static quota catalog, and
//! fixed-window counter math.
//!
//! Pure types only. The atomic check-and-charge lives behind the
//! application layer's store port so concurrent requests from the same
//! caller cannot both slip past a limit.

use crate::policy::RateLimitSettings;
use crate::tool::ChargeClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named rate-limit bucket with its own window and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaClass {
    WritesPerMinute,
    WritesPerHour,
    DeletesPerHour,
    StructureChangesPerHour,
}

impl QuotaClass {
    pub const ALL: [QuotaClass; 4] = [
        QuotaClass::WritesPerMinute,
        QuotaClass::WritesPerHour,
        QuotaClass::DeletesPerHour,
        QuotaClass::StructureChangesPerHour,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaClass::WritesPerMinute => "writes_per_minute",
            QuotaClass::WritesPerHour => "writes_per_hour",
            QuotaClass::DeletesPerHour => "deletes_per_hour",
            QuotaClass::StructureChangesPerHour => "structure_changes_per_hour",
        }
    }

    pub fn window_seconds(&self) -> i64 {
        match self {
            QuotaClass::WritesPerMinute => 60,
            _ => 3600,
        }
    }

    /// Operation label used in denial messages ("write", "delete", ...).
    pub fn operation_label(&self) -> &'static str {
        match self {
            QuotaClass::WritesPerMinute | QuotaClass::WritesPerHour => "write",
            QuotaClass::DeletesPerHour => "delete",
            QuotaClass::StructureChangesPerHour => "structure change",
        }
    }

    /// Window label used in denial messages ("minute" or "hour").
    pub fn window_label(&self) -> &'static str {
        match self {
            QuotaClass::WritesPerMinute => "minute",
            _ => "hour",
        }
    }
}

impl std::fmt::Display for QuotaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the quota catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    pub class: QuotaClass,
    pub window_seconds: i64,
    pub limit: i64,
}

impl Quota {
    pub fn new(class: QuotaClass, limit: i64) -> Self {
        Self {
            class,
            window_seconds: class.window_seconds(),
            limit,
        }
    }
}

/// Build the quota catalog from configured limits. Classes with a
/// non-positive limit are unlimited and omitted.
pub fn quota_catalog(settings: &RateLimitSettings) -> Vec<Quota> {
    let limits = [
        (QuotaClass::WritesPerMinute, settings.max_writes_per_minute),
        (QuotaClass::WritesPerHour, settings.max_writes_per_hour),
        (QuotaClass::DeletesPerHour, settings.max_deletes_per_hour),
        (
            QuotaClass::StructureChangesPerHour,
            settings.max_structure_changes_per_hour,
        ),
    ];

    limits
        .into_iter()
        .filter(|(_, limit)| *limit > 0)
        .map(|(class, limit)| Quota::new(class, limit))
        .collect()
}

/// The quota classes a charge consumes. Every chargeable call consumes the
/// generic write buckets; deletes and structure changes additionally consume
/// their own hourly bucket.
pub fn classes_for(charge: ChargeClass) -> &'static [QuotaClass] {
    match charge {
        ChargeClass::Write => &[QuotaClass::WritesPerMinute, QuotaClass::WritesPerHour],
        ChargeClass::Delete => &[
            QuotaClass::WritesPerMinute,
            QuotaClass::WritesPerHour,
            QuotaClass::DeletesPerHour,
        ],
        ChargeClass::Structure => &[
            QuotaClass::WritesPerMinute,
            QuotaClass::WritesPerHour,
            QuotaClass::StructureChangesPerHour,
        ],
    }
}

/// Fixed-window counter state for one (caller, class) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowUsage {
    pub window_start: DateTime<Utc>,
    pub count: i64,
}

impl WindowUsage {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    /// The usage with window rollover applied: a fresh window when
    /// `window_seconds` have elapsed since `window_start`.
    pub fn rolled(&self, window_seconds: i64, now: DateTime<Utc>) -> WindowUsage {
        if (now - self.window_start).num_seconds() >= window_seconds {
            WindowUsage::new(now)
        } else {
            *self
        }
    }

    /// Whether a charge against `limit` would exceed this window.
    pub fn at_limit(&self, limit: i64) -> bool {
        self.count >= limit
    }

    /// Seconds until the current window expires.
    pub fn retry_after(&self, window_seconds: i64, now: DateTime<Utc>) -> u64 {
        let remaining = self.window_start.timestamp() + window_seconds - now.timestamp();
        remaining.max(0) as u64
    }

    pub fn charged(&self) -> WindowUsage {
        WindowUsage {
            window_start: self.window_start,
            count: self.count + 1,
        }
    }
}
