//! Event-bus subscriber that logs gateway lifecycle events via `tracing`.

use toolgate_application::events::ExecutionEventSubscriber;
use toolgate_application::ports::audit_sink::AuditSinkError;
use toolgate_domain::event::ExecutionEvent;
use tracing::{error, info, warn};

/// Structured-log subscriber. Successes log at info, failures at warn, and
/// audit-sink problems at error so operators can alert on them.
#[derive(Debug, Clone, Default)]
pub struct TracingEventLogger;

impl ExecutionEventSubscriber for TracingEventLogger {
    fn on_started(&self, event: &ExecutionEvent) {
        info!(
            tool_id = event.tool_id(),
            request_id = event.request_id(),
            "Tool execution started"
        );
    }

    fn on_succeeded(&self, event: &ExecutionEvent) {
        if let ExecutionEvent::Succeeded { duration_ms, .. } = event {
            info!(
                tool_id = event.tool_id(),
                request_id = event.request_id(),
                duration_ms,
                "Tool execution succeeded"
            );
        }
    }

    fn on_failed(&self, event: &ExecutionEvent) {
        if let ExecutionEvent::Failed {
            reason,
            error,
            duration_ms,
            ..
        } = event
        {
            warn!(
                tool_id = event.tool_id(),
                request_id = event.request_id(),
                reason = reason.as_str(),
                error = error.as_deref().unwrap_or(""),
                duration_ms,
                "Tool execution failed"
            );
        }
    }

    fn on_audit_sink_error(&self, tool_id: &str, error: &AuditSinkError) {
        error!(tool_id, %error, "Audit sink failure");
    }
}
