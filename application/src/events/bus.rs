//! Execution event bus — typed publish/subscribe for gateway lifecycle
//! events.
//!
//! Subscribers (logging, metrics, audit alerting) are added and removed
//! without modifying the gateway. Delivery is isolated: one subscriber
//! panicking must not prevent the others from receiving the event or block
//! the caller's response.

use crate::ports::audit_sink::AuditSinkError;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use toolgate_domain::event::ExecutionEvent;
use tracing::warn;

/// Subscriber hooks, one per event variant. All default to no-ops so a
/// subscriber only implements the variants it cares about.
pub trait ExecutionEventSubscriber: Send + Sync {
    fn on_started(&self, _event: &ExecutionEvent) {}

    fn on_succeeded(&self, _event: &ExecutionEvent) {}

    fn on_failed(&self, _event: &ExecutionEvent) {}

    /// Audit persistence failed for a call. Never surfaced to the caller;
    /// this hook is the alerting path.
    fn on_audit_sink_error(&self, _tool_id: &str, _error: &AuditSinkError) {}
}

/// The bus itself. Cheap to clone; subscribers are shared.
#[derive(Clone, Default)]
pub struct ExecutionEventBus {
    subscribers: Vec<Arc<dyn ExecutionEventSubscriber>>,
}

impl ExecutionEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(mut self, subscriber: Arc<dyn ExecutionEventSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish an event to every subscriber, dispatching on the variant.
    pub fn publish(&self, event: &ExecutionEvent) {
        for subscriber in &self.subscribers {
            let dispatch = || match event {
                ExecutionEvent::Started { .. } => subscriber.on_started(event),
                ExecutionEvent::Succeeded { .. } => subscriber.on_succeeded(event),
                ExecutionEvent::Failed { .. } => subscriber.on_failed(event),
            };
            if catch_unwind(AssertUnwindSafe(dispatch)).is_err() {
                warn!(
                    tool_id = event.tool_id(),
                    "Execution event subscriber panicked; continuing with remaining subscribers"
                );
            }
        }
    }

    /// Surface an audit-sink failure to subscribers.
    pub fn publish_audit_sink_error(&self, tool_id: &str, error: &AuditSinkError) {
        for subscriber in &self.subscribers {
            let dispatch = || subscriber.on_audit_sink_error(tool_id, error);
            if catch_unwind(AssertUnwindSafe(dispatch)).is_err() {
                warn!(tool_id, "Audit-alert subscriber panicked; continuing");
            }
        }
    }
}
