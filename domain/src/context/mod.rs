//! Per-request call context — tracks whether a privileged tool call is in
//! flight.
//!
//! External collaborators use this to distinguish "this mutation happened
//! because a tool call is executing" from unrelated background writes (e.g. a
//! configuration-change tracker that only records edits attributable to a
//! tool invocation).
//!
//! Re-entrant by design: a tool's domain logic may trigger secondary side
//! effects that re-enter the context. A depth counter tracks nesting so
//! [`is_active()`](CallContext::is_active) stays true until the outermost
//! call exits. Pair enter/leave with the RAII [`ContextGuard`] so depth can
//! never leak on an early return, error, or cancellation.

use rand::Rng;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct ContextState {
    depth: usize,
    correlation_id: Option<String>,
}

/// Per-request nesting tracker with a correlation id spanning one outermost
/// call cycle.
///
/// Not shared across requests; each request constructs its own context and
/// drops it when the request completes.
#[derive(Debug, Default)]
pub struct CallContext {
    state: Mutex<ContextState>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a tool call. The first (outermost) enter generates a fresh
    /// correlation id; nested enters keep it.
    pub fn enter(&self) {
        if let Ok(mut state) = self.state.lock() {
            if state.depth == 0 {
                state.correlation_id = Some(new_correlation_id());
            }
            state.depth += 1;
        }
    }

    /// Leave a tool call. The outermost leave clears the correlation id.
    /// Extra leaves never underflow.
    pub fn leave(&self) {
        if let Ok(mut state) = self.state.lock() {
            match state.depth {
                0 => {}
                1 => {
                    state.depth = 0;
                    state.correlation_id = None;
                }
                _ => state.depth -= 1,
            }
        }
    }

    /// Whether a privileged tool call is currently executing.
    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }

    pub fn depth(&self) -> usize {
        self.state.lock().map(|s| s.depth).unwrap_or(0)
    }

    /// The correlation id of the in-flight call cycle, if any.
    pub fn correlation_id(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.correlation_id.clone())
    }

    /// Enter and return a guard that leaves on drop.
    pub fn scoped(self: &Arc<Self>) -> ContextGuard {
        self.enter();
        ContextGuard {
            context: Arc::clone(self),
        }
    }
}

/// RAII guard pairing [`CallContext::enter`] with a guaranteed
/// [`CallContext::leave`] on every exit path.
#[derive(Debug)]
pub struct ContextGuard {
    context: Arc<CallContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.context.leave();
    }
}

/// 8 random bytes as 16 lowercase hex chars.
fn new_correlation_id() -> String {
    format!("{:016x}", rand::thread_rng().r#gen::<u64>())
}
