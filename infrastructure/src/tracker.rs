//! Change tracker — records configuration changes attributable to tool
//! calls.
//!
//! An example of an external observer consuming the gateway's
//! [`CallContext`]: a change is recorded only while a privileged tool call
//! is in flight, annotated with the call's correlation id, so incidental
//! background writes never show up in the change list. Bounded to the most
//! recent 500 records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use toolgate_domain::context::CallContext;

/// Maximum tracked changes before the oldest are dropped.
const MAX_TRACKED_CHANGES: usize = 500;

/// One tracked configuration change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// The configuration object that was changed
    pub config_name: String,
    /// The operation type (create, update, delete)
    pub operation: String,
    /// Correlation id of the tool call that made the change
    pub correlation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Tracks configuration changes made through tool calls.
#[derive(Debug)]
pub struct ChangeTracker {
    context: Arc<CallContext>,
    changes: Mutex<Vec<ChangeRecord>>,
}

impl ChangeTracker {
    pub fn new(context: Arc<CallContext>) -> Self {
        Self {
            context,
            changes: Mutex::new(Vec::new()),
        }
    }

    /// Record a change if a tool call is currently in flight.
    ///
    /// Returns whether the change was recorded. Re-tracking the same config
    /// name replaces the earlier record rather than duplicating it.
    pub fn track_change(&self, config_name: &str, operation: &str) -> bool {
        if !self.context.is_active() {
            return false;
        }

        let record = ChangeRecord {
            config_name: config_name.to_string(),
            operation: operation.to_string(),
            correlation_id: self.context.correlation_id(),
            timestamp: Utc::now(),
        };

        let Ok(mut changes) = self.changes.lock() else {
            return false;
        };

        if let Some(existing) = changes.iter_mut().find(|c| c.config_name == config_name) {
            *existing = record;
        } else {
            changes.push(record);
            if changes.len() > MAX_TRACKED_CHANGES {
                let excess = changes.len() - MAX_TRACKED_CHANGES;
                changes.drain(..excess);
            }
        }

        true
    }

    /// Snapshot of the tracked changes, oldest first.
    pub fn changes(&self) -> Vec<ChangeRecord> {
        self.changes.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut changes) = self.changes.lock() {
            changes.clear();
        }
    }
}
