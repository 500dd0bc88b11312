//! Execute Tool use case — the gateway itself.
//!
//! Control flow for one call:
//!
//! ```text
//! caller ──▶ authorize (category ∧ scope ∧ mode ∧ rate limit)
//!              │ denied: typed failure, domain logic never runs
//!              ▼
//!            CallContext.enter() ──▶ handler (domain logic) ──▶ normalize
//!              ▼
//!            audit.record() ──▶ events.publish(Succeeded|Failed) ──▶ leave()
//! ```
//!
//! Policy evaluation is computed entirely from in-memory state before the
//! domain call is made — a denied call incurs no downstream I/O. Every
//! outcome (allowed-and-succeeded, allowed-and-failed, denied) returns the
//! same [`CanonicalResult`] contract.

use crate::events::ExecutionEventBus;
use crate::ports::audit_sink::{AuditSink, NoAuditSink};
use crate::ports::permissions::{AllowAllPermissions, PermissionChecker, category_permission};
use crate::rate_limiter::RateLimiter;
use crate::registry::ToolRegistry;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use toolgate_domain::audit::{AuditEntry, AuditOutcome};
use toolgate_domain::context::CallContext;
use toolgate_domain::event::{ExecutionEvent, FailureReason};
use toolgate_domain::policy::{Decision, Denial, PolicyConfig, evaluate_modes};
use toolgate_domain::scope::{Scope, ScopeAuthority};
use toolgate_domain::tool::{
    CanonicalResult, DefaultToolValidator, ErrorCode, OperationKind, ToolCall, ToolDescriptor,
    ToolValidator,
};
use toolgate_domain::util::sanitize_map;
use tracing::{debug, warn};

/// Input for the [`ExecuteToolUseCase`].
#[derive(Debug, Clone)]
pub struct ExecuteToolInput {
    /// The invocation request.
    pub call: ToolCall,
    /// Caller identity — rate-limit state and the audit actor key off this.
    pub caller: String,
    /// Transport-assigned request id, carried on events.
    pub request_id: String,
    /// Optional abort signal. The call context is released even when the
    /// caller aborts mid-call; a committed rate-limit charge is not refunded.
    pub cancellation: Option<CancellationToken>,
}

impl ExecuteToolInput {
    pub fn new(
        call: ToolCall,
        caller: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            call,
            caller: caller.into(),
            request_id: request_id.into(),
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// The policy and accounting gateway for tool execution.
pub struct ExecuteToolUseCase {
    registry: Arc<ToolRegistry>,
    policy: PolicyConfig,
    scopes: Arc<ScopeAuthority>,
    rate_limiter: RateLimiter,
    permissions: Arc<dyn PermissionChecker>,
    audit: Arc<dyn AuditSink>,
    events: ExecutionEventBus,
    context: Arc<CallContext>,
    validator: DefaultToolValidator,
}

impl ExecuteToolUseCase {
    pub fn new(
        registry: Arc<ToolRegistry>,
        policy: PolicyConfig,
        scopes: Arc<ScopeAuthority>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            registry,
            policy,
            scopes,
            rate_limiter,
            permissions: Arc::new(AllowAllPermissions),
            audit: Arc::new(NoAuditSink),
            events: ExecutionEventBus::new(),
            context: Arc::new(CallContext::new()),
            validator: DefaultToolValidator,
        }
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_event_bus(mut self, events: ExecutionEventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_call_context(mut self, context: Arc<CallContext>) -> Self {
        self.context = context;
        self
    }

    /// The per-request call context, for external observers.
    pub fn call_context(&self) -> Arc<CallContext> {
        Arc::clone(&self.context)
    }

    /// Execute a tool call. Never returns a raw error — every outcome is a
    /// [`CanonicalResult`].
    pub async fn execute(&self, input: ExecuteToolInput) -> CanonicalResult {
        let started_at = Instant::now();

        let Some(descriptor) = self.registry.descriptor(&input.call.tool_id).cloned() else {
            // No descriptor to attribute events or audit entries to.
            return CanonicalResult::failure(
                ErrorCode::ValidationError.as_str(),
                format!("Unknown tool: {}", input.call.tool_id),
            );
        };

        let arguments = sanitize_map(&input.call.arguments);

        self.events.publish(&ExecutionEvent::Started {
            tool_id: descriptor.id.clone(),
            request_id: input.request_id.clone(),
            arguments: arguments.clone(),
        });

        if let Err(message) = self.validator.validate(&input.call, &descriptor) {
            return self.fail_validation(&input, &descriptor, &arguments, message, started_at);
        }

        if let Some((denial, reason)) = self.authorize(&input.caller, &descriptor) {
            return self.deny(&input, &descriptor, &arguments, denial, reason, started_at);
        }

        debug!(
            tool_id = %descriptor.id,
            caller = %input.caller,
            "Policy checks passed; invoking handler"
        );

        // Scoped acquisition: depth is released on every exit path below,
        // including cancellation.
        let _guard = self.context.scoped();

        let result = match self.registry.handler(&descriptor.id) {
            Some(handler) => {
                let handler_result = match &input.cancellation {
                    Some(token) => {
                        tokio::select! {
                            _ = token.cancelled() => {
                                Err(crate::ports::tool_handler::HandlerError::Execution(
                                    "cancelled by caller".to_string(),
                                ))
                            }
                            output = handler.execute(&input.call) => output,
                        }
                    }
                    None => handler.execute(&input.call).await,
                };

                match handler_result {
                    Ok(output) => CanonicalResult::from_output(output),
                    Err(error) => CanonicalResult::failure(
                        ErrorCode::InternalError.as_str(),
                        format!("Tool execution failed: {error}"),
                    ),
                }
            }
            // Registration pairs descriptor and handler, so this is a wiring
            // bug rather than a caller mistake.
            None => CanonicalResult::failure(
                ErrorCode::InternalError.as_str(),
                format!("Tool execution failed: no handler for '{}'", descriptor.id),
            ),
        };

        let duration_ms = elapsed_ms(started_at);

        let outcome = if result.is_success() {
            AuditOutcome::Success
        } else {
            AuditOutcome::Failure
        };

        let mut metadata = Map::new();
        metadata.insert("arguments".to_string(), Value::Object(arguments.clone()));
        metadata.insert("duration_ms".to_string(), json!(duration_ms));
        if let Some(code) = &result.error_code {
            metadata.insert("code".to_string(), json!(code));
        }
        self.record_audit(&input, &descriptor, outcome, metadata);

        let event = if result.is_success() {
            ExecutionEvent::Succeeded {
                tool_id: descriptor.id.clone(),
                request_id: input.request_id.clone(),
                arguments,
                duration_ms,
            }
        } else {
            ExecutionEvent::Failed {
                tool_id: descriptor.id.clone(),
                request_id: input.request_id.clone(),
                arguments,
                duration_ms,
                reason: FailureReason::Execution,
                error: Some(result.message.clone()),
            }
        };
        self.events.publish(&event);

        result
    }

    /// Category ∧ scope ∧ mode ∧ rate limit. Short-circuits on the first
    /// denial; charging only happens when everything before it allowed.
    fn authorize(
        &self,
        caller: &str,
        descriptor: &ToolDescriptor,
    ) -> Option<(Denial, FailureReason)> {
        let permission = category_permission(&descriptor.category);
        if !self.permissions.has_permission(caller, &permission) {
            return Some((
                Denial::new(
                    ErrorCode::AccessDenied,
                    format!(
                        "Permission '{}' is required for tool category '{}'.",
                        permission, descriptor.category
                    ),
                ),
                FailureReason::PolicyDeniedCategory,
            ));
        }

        let (required, label) = match descriptor.operation_kind {
            OperationKind::Read => (Scope::Read, "Read"),
            OperationKind::Write => (Scope::Write, "Write"),
            OperationKind::Trigger => (Scope::Admin, "Admin"),
        };
        if !self.scopes.has_scope(required) {
            return Some((
                Denial::new(
                    ErrorCode::InsufficientScope,
                    format!(
                        "{} operations not allowed for this connection. Scope: {}",
                        label,
                        self.scopes.current_scopes()
                    ),
                ),
                FailureReason::PolicyDeniedScope,
            ));
        }

        if let Decision::Denied(denial) = evaluate_modes(&self.policy, descriptor) {
            return Some((denial, FailureReason::PolicyDeniedMode));
        }

        if descriptor.is_mutating() {
            if let Err(exceeded) = self
                .rate_limiter
                .check_and_charge(caller, descriptor.charge_class)
            {
                let denial = Denial::new(ErrorCode::RateLimitExceeded, exceeded.message())
                    .with_retry_after(exceeded.retry_after);
                return Some((denial, FailureReason::PolicyDeniedRateLimit));
            }
        }

        None
    }

    fn fail_validation(
        &self,
        input: &ExecuteToolInput,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
        message: String,
        started_at: Instant,
    ) -> CanonicalResult {
        let mut metadata = Map::new();
        metadata.insert("arguments".to_string(), Value::Object(arguments.clone()));
        metadata.insert("code".to_string(), json!(ErrorCode::ValidationError.as_str()));
        self.record_audit(input, descriptor, AuditOutcome::Failure, metadata);

        self.events.publish(&ExecutionEvent::Failed {
            tool_id: descriptor.id.clone(),
            request_id: input.request_id.clone(),
            arguments: arguments.clone(),
            duration_ms: elapsed_ms(started_at),
            reason: FailureReason::Validation,
            error: Some(message.clone()),
        });

        CanonicalResult::failure(ErrorCode::ValidationError.as_str(), message)
    }

    fn deny(
        &self,
        input: &ExecuteToolInput,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
        denial: Denial,
        reason: FailureReason,
        started_at: Instant,
    ) -> CanonicalResult {
        // Denied entries record both the attempted write kind and the
        // category, so operators can see what a blocked call would have
        // touched.
        let mut metadata = Map::new();
        metadata.insert("code".to_string(), json!(denial.code.as_str()));
        metadata.insert("category".to_string(), json!(descriptor.category));
        if let Some(kind) = descriptor.effective_write_kind() {
            metadata.insert("write_kind".to_string(), json!(kind.as_str()));
        }
        if let Some(retry_after) = denial.retry_after {
            metadata.insert("retry_after".to_string(), json!(retry_after));
        }
        self.record_audit(input, descriptor, AuditOutcome::Denied, metadata);

        self.events.publish(&ExecutionEvent::Failed {
            tool_id: descriptor.id.clone(),
            request_id: input.request_id.clone(),
            arguments: arguments.clone(),
            duration_ms: elapsed_ms(started_at),
            reason,
            error: Some(denial.reason.clone()),
        });

        denial.into_result()
    }

    /// Append one audit entry. Persist failures are surfaced through the
    /// event bus, never to the caller.
    fn record_audit(
        &self,
        input: &ExecuteToolInput,
        descriptor: &ToolDescriptor,
        outcome: AuditOutcome,
        metadata: Map<String, Value>,
    ) {
        if !self.policy.audit_enabled {
            return;
        }

        let entry = AuditEntry::new(
            &input.caller,
            &descriptor.id,
            &descriptor.category,
            &descriptor.id,
            outcome,
        )
        .with_metadata_map(metadata);

        if let Err(error) = self.audit.record(&entry) {
            warn!(tool_id = %descriptor.id, %error, "Failed to persist audit entry");
            self.events.publish_audit_sink_error(&descriptor.id, &error);
        }
    }
}

fn elapsed_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ExecutionEventSubscriber;
    use crate::ports::audit_sink::AuditSinkError;
    use crate::ports::rate_limit_store::{QuotaExceeded, RateLimitStore, UsageSnapshot};
    use crate::ports::tool_handler::{HandlerError, ToolHandler};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use toolgate_domain::policy::RateLimitSettings;
    use toolgate_domain::ratelimit::{Quota, WindowUsage};
    use toolgate_domain::scope::ScopeSet;
    use toolgate_domain::tool::{ChargeClass, ToolOutput, ToolParameter, WriteKind};
    use std::collections::BTreeSet;

    // ==================== Test Mocks ====================

    /// Handler that records whether it ran and returns a fixed output.
    struct StubHandler {
        invoked: Arc<AtomicBool>,
        output: Option<ToolOutput>,
    }

    impl StubHandler {
        fn succeeding(invoked: Arc<AtomicBool>) -> Self {
            Self {
                invoked,
                output: Some(ToolOutput::success_with_message("Done.")),
            }
        }

        fn failing_output(invoked: Arc<AtomicBool>) -> Self {
            Self {
                invoked,
                output: Some(ToolOutput::failure("NOT_FOUND", "No such entity.")),
            }
        }

        fn erroring(invoked: Arc<AtomicBool>) -> Self {
            Self {
                invoked,
                output: None,
            }
        }
    }

    #[async_trait]
    impl ToolHandler for StubHandler {
        async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
            self.invoked.store(true, Ordering::SeqCst);
            match &self.output {
                Some(output) => Ok(output.clone()),
                None => Err(HandlerError::Execution("database connection lost".to_string())),
            }
        }
    }

    /// Handler asserting the call context is active while it runs.
    struct ContextProbeHandler {
        context: Arc<CallContext>,
        observed_active: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ToolHandler for ContextProbeHandler {
        async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
            self.observed_active
                .store(self.context.is_active(), Ordering::SeqCst);
            Ok(ToolOutput::success())
        }
    }

    /// Minimal fixed-window store reproducing the all-or-nothing charge.
    #[derive(Default)]
    struct TestStore {
        usage: Mutex<HashMap<(String, &'static str), WindowUsage>>,
    }

    impl RateLimitStore for TestStore {
        fn check_and_charge(
            &self,
            caller: &str,
            quotas: &[Quota],
            now: DateTime<Utc>,
        ) -> Result<(), QuotaExceeded> {
            let mut usage = self.usage.lock().unwrap();
            let mut rolled = Vec::with_capacity(quotas.len());
            for quota in quotas {
                let key = (caller.to_string(), quota.class.as_str());
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
            for (key, current) in rolled {
                usage.insert(key, current.charged());
            }
            Ok(())
        }

        fn usage(&self, caller: &str, quotas: &[Quota], now: DateTime<Utc>) -> Vec<UsageSnapshot> {
            let usage = self.usage.lock().unwrap();
            quotas
                .iter()
                .map(|quota| {
                    let key = (caller.to_string(), quota.class.as_str());
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
            self.usage
                .lock()
                .unwrap()
                .retain(|(c, _), _| c != caller);
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        entries: Mutex<Vec<AuditEntry>>,
    }

    impl AuditSink for CollectingSink {
        fn record(&self, entry: &AuditEntry) -> Result<(), AuditSinkError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _entry: &AuditEntry) -> Result<(), AuditSinkError> {
            Err(AuditSinkError::Io("disk full".to_string()))
        }
    }

    #[derive(Default)]
    struct CollectingSubscriber {
        tags: Mutex<Vec<String>>,
        events: Mutex<Vec<ExecutionEvent>>,
    }

    impl CollectingSubscriber {
        fn tags(&self) -> Vec<String> {
            self.tags.lock().unwrap().clone()
        }
    }

    impl ExecutionEventSubscriber for CollectingSubscriber {
        fn on_started(&self, event: &ExecutionEvent) {
            self.tags.lock().unwrap().push("started".to_string());
            self.events.lock().unwrap().push(event.clone());
        }

        fn on_succeeded(&self, event: &ExecutionEvent) {
            self.tags.lock().unwrap().push("succeeded".to_string());
            self.events.lock().unwrap().push(event.clone());
        }

        fn on_failed(&self, event: &ExecutionEvent) {
            let reason = match event {
                ExecutionEvent::Failed { reason, .. } => reason.as_str(),
                _ => "?",
            };
            self.tags.lock().unwrap().push(format!("failed:{reason}"));
            self.events.lock().unwrap().push(event.clone());
        }

        fn on_audit_sink_error(&self, _tool_id: &str, _error: &AuditSinkError) {
            self.tags.lock().unwrap().push("audit_sink_error".to_string());
        }
    }

    // ==================== Fixture ====================

    struct Fixture {
        use_case: ExecuteToolUseCase,
        sink: Arc<CollectingSink>,
        subscriber: Arc<CollectingSubscriber>,
        invoked: Arc<AtomicBool>,
    }

    struct FixtureConfig {
        policy: PolicyConfig,
        scopes: ScopeSet,
        descriptor: ToolDescriptor,
        handler: fn(Arc<AtomicBool>) -> StubHandler,
    }

    impl Default for FixtureConfig {
        fn default() -> Self {
            Self {
                policy: PolicyConfig::default(),
                scopes: ScopeSet::from_iter([Scope::Read, Scope::Write, Scope::Admin]),
                descriptor: ToolDescriptor::read("site.info", "discovery", "Site info"),
                handler: StubHandler::succeeding,
            }
        }
    }

    fn fixture(config: FixtureConfig) -> Fixture {
        let invoked = Arc::new(AtomicBool::new(false));
        let registry = Arc::new(
            ToolRegistry::new()
                .register(
                    config.descriptor,
                    Arc::new((config.handler)(invoked.clone())),
                )
                .unwrap(),
        );

        let sink = Arc::new(CollectingSink::default());
        let subscriber = Arc::new(CollectingSubscriber::default());
        let rate_limiter = RateLimiter::new(
            config.policy.rate_limits.clone(),
            Arc::new(TestStore::default()),
        );

        let use_case = ExecuteToolUseCase::new(
            registry,
            config.policy,
            Arc::new(ScopeAuthority::new(config.scopes)),
            rate_limiter,
        )
        .with_audit_sink(sink.clone())
        .with_event_bus(ExecutionEventBus::new().subscribe(subscriber.clone()));

        Fixture {
            use_case,
            sink,
            subscriber,
            invoked,
        }
    }

    fn input(tool_id: &str) -> ExecuteToolInput {
        ExecuteToolInput::new(ToolCall::new(tool_id), "agent", "req-1")
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_read_tool_succeeds_with_read_scope() {
        let f = fixture(FixtureConfig {
            scopes: ScopeSet::from_iter([Scope::Read]),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("site.info")).await;

        assert!(result.is_success());
        assert!(f.invoked.load(Ordering::SeqCst));
        assert_eq!(f.subscriber.tags(), vec!["started", "succeeded"]);

        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, AuditOutcome::Success);
    }

    #[tokio::test]
    async fn test_write_tool_without_write_scope_denied() {
        let f = fixture(FixtureConfig {
            scopes: ScopeSet::from_iter([Scope::Read]),
            descriptor: ToolDescriptor::write("content.create", "content", "Create content"),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("content.create")).await;

        assert!(!result.is_success());
        assert_eq!(result.error_code.as_deref(), Some("INSUFFICIENT_SCOPE"));
        assert!(!f.invoked.load(Ordering::SeqCst));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:policy_denied_scope"]);

        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, AuditOutcome::Denied);
    }

    #[tokio::test]
    async fn test_trigger_requires_admin_scope() {
        let f = fixture(FixtureConfig {
            scopes: ScopeSet::from_iter([Scope::Read, Scope::Write]),
            descriptor: ToolDescriptor::trigger("cron.run", "cron", "Run cron"),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("cron.run")).await;
        assert_eq!(result.error_code.as_deref(), Some("INSUFFICIENT_SCOPE"));
        assert!(!f.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_read_only_mode_denies_mutations_regardless_of_allow_list() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                read_only_mode: true,
                config_only_mode: true,
                config_only_allowed_write_kinds: BTreeSet::from(WriteKind::ALL),
                ..PolicyConfig::default()
            },
            descriptor: ToolDescriptor::write("config.set", "configuration", "Set config"),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("config.set")).await;

        assert_eq!(result.error_code.as_deref(), Some("READ_ONLY_MODE"));
        assert!(!f.invoked.load(Ordering::SeqCst));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:policy_denied_mode"]);
    }

    #[tokio::test]
    async fn test_config_only_mode_denies_content_write() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                config_only_mode: true,
                config_only_allowed_write_kinds: BTreeSet::from([WriteKind::Config]),
                ..PolicyConfig::default()
            },
            descriptor: ToolDescriptor::write("content.create", "content", "Create content"),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("content.create")).await;

        assert_eq!(result.error_code.as_deref(), Some("CONFIG_ONLY_MODE"));
        assert!(!f.invoked.load(Ordering::SeqCst));

        // Exactly one denied audit entry, carrying the attempted write kind.
        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, AuditOutcome::Denied);
        assert_eq!(entries[0].metadata["write_kind"], json!("content"));
        assert_eq!(entries[0].metadata["category"], json!("content"));
    }

    #[tokio::test]
    async fn test_config_only_mode_allows_config_write() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                config_only_mode: true,
                config_only_allowed_write_kinds: BTreeSet::from([WriteKind::Config]),
                ..PolicyConfig::default()
            },
            descriptor: ToolDescriptor::write("config.set", "configuration", "Set config"),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("config.set")).await;
        assert!(result.is_success());
        assert!(f.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_rate_limit_denies_fourth_write_in_window() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                rate_limits: RateLimitSettings {
                    max_writes_per_minute: 3,
                    ..RateLimitSettings::default()
                },
                ..PolicyConfig::default()
            },
            descriptor: ToolDescriptor::write("content.create", "content", "Create content"),
            ..FixtureConfig::default()
        });

        for _ in 0..3 {
            let result = f.use_case.execute(input("content.create")).await;
            assert!(result.is_success());
        }

        let result = f.use_case.execute(input("content.create")).await;
        assert_eq!(result.error_code.as_deref(), Some("RATE_LIMIT_EXCEEDED"));
        assert!(result.retry_after.is_some());
        assert!(result.retry_after.unwrap() <= 60);
        assert!(f.subscriber.tags().contains(&"failed:policy_denied_rate_limit".to_string()));
    }

    #[tokio::test]
    async fn test_disabled_rate_limiting_never_denies() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                rate_limits: RateLimitSettings {
                    enabled: false,
                    max_writes_per_minute: 1,
                    ..RateLimitSettings::default()
                },
                ..PolicyConfig::default()
            },
            descriptor: ToolDescriptor::write("content.create", "content", "Create content"),
            ..FixtureConfig::default()
        });

        for _ in 0..5 {
            let result = f.use_case.execute(input("content.create")).await;
            assert!(result.is_success());
        }
    }

    #[tokio::test]
    async fn test_validation_failure_skips_handler() {
        let f = fixture(FixtureConfig {
            descriptor: ToolDescriptor::write("content.create", "content", "Create content")
                .with_parameter(ToolParameter::new("title", "Content title", true)),
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("content.create")).await;

        assert_eq!(result.error_code.as_deref(), Some("VALIDATION_ERROR"));
        assert!(!f.invoked.load(Ordering::SeqCst));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:validation"]);

        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].outcome, AuditOutcome::Failure);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_validation_failure_without_events() {
        let f = fixture(FixtureConfig::default());

        let result = f.use_case.execute(input("no.such.tool")).await;

        assert_eq!(result.error_code.as_deref(), Some("VALIDATION_ERROR"));
        assert!(result.message.contains("Unknown tool"));
        assert!(f.subscriber.tags().is_empty());
        assert!(f.sink.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handler_error_is_wrapped() {
        let f = fixture(FixtureConfig {
            handler: StubHandler::erroring,
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("site.info")).await;

        assert!(!result.is_success());
        assert_eq!(result.error_code.as_deref(), Some("INTERNAL_ERROR"));
        assert!(result.message.starts_with("Tool execution failed:"));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:execution"]);

        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries[0].outcome, AuditOutcome::Failure);
    }

    #[tokio::test]
    async fn test_handler_reported_failure_keeps_tool_code() {
        let f = fixture(FixtureConfig {
            handler: StubHandler::failing_output,
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("site.info")).await;

        assert!(!result.is_success());
        assert_eq!(result.error_code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:execution"]);
    }

    #[tokio::test]
    async fn test_audit_sink_failure_does_not_fail_call() {
        let f = fixture(FixtureConfig::default());
        let use_case = ExecuteToolUseCase {
            audit: Arc::new(FailingSink),
            ..f.use_case
        };

        let result = use_case.execute(input("site.info")).await;

        assert!(result.is_success());
        assert!(f.subscriber.tags().contains(&"audit_sink_error".to_string()));
    }

    #[tokio::test]
    async fn test_audit_disabled_records_nothing() {
        let f = fixture(FixtureConfig {
            policy: PolicyConfig {
                audit_enabled: false,
                ..PolicyConfig::default()
            },
            ..FixtureConfig::default()
        });

        let result = f.use_case.execute(input("site.info")).await;
        assert!(result.is_success());
        assert!(f.sink.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sensitive_arguments_redacted_in_audit_and_events() {
        let f = fixture(FixtureConfig {
            descriptor: ToolDescriptor::write("users.create", "users", "Create a user")
                .with_parameter(ToolParameter::new("name", "User name", true))
                .with_parameter(ToolParameter::new("password", "Initial password", true)),
            ..FixtureConfig::default()
        });

        let call = ToolCall::new("users.create")
            .with_arg("name", "alice")
            .with_arg("password", "hunter2");
        let result = f
            .use_case
            .execute(ExecuteToolInput::new(call, "agent", "req-9"))
            .await;
        assert!(result.is_success());

        let entries = f.sink.entries.lock().unwrap();
        assert_eq!(entries[0].metadata["arguments"]["password"], json!("[REDACTED]"));
        assert_eq!(entries[0].metadata["arguments"]["name"], json!("alice"));

        let events = f.subscriber.events.lock().unwrap();
        for event in events.iter() {
            if let ExecutionEvent::Started { arguments, .. }
            | ExecutionEvent::Succeeded { arguments, .. } = event
            {
                assert_eq!(arguments["password"], json!("[REDACTED]"));
            }
        }
    }

    #[tokio::test]
    async fn test_context_active_during_handler_inactive_after() {
        let context = Arc::new(CallContext::new());
        let observed = Arc::new(AtomicBool::new(false));

        let registry = Arc::new(
            ToolRegistry::new()
                .register(
                    ToolDescriptor::read("site.info", "discovery", "Site info"),
                    Arc::new(ContextProbeHandler {
                        context: Arc::clone(&context),
                        observed_active: observed.clone(),
                    }),
                )
                .unwrap(),
        );

        let use_case = ExecuteToolUseCase::new(
            registry,
            PolicyConfig::default(),
            Arc::new(ScopeAuthority::new(ScopeSet::read_only())),
            RateLimiter::new(RateLimitSettings::default(), Arc::new(TestStore::default())),
        )
        .with_call_context(Arc::clone(&context));

        let result = use_case.execute(input("site.info")).await;

        assert!(result.is_success());
        assert!(observed.load(Ordering::SeqCst));
        assert!(!context.is_active());
    }

    #[tokio::test]
    async fn test_category_permission_denied() {
        struct DenyAll;
        impl PermissionChecker for DenyAll {
            fn has_permission(&self, _actor: &str, _permission: &str) -> bool {
                false
            }
        }

        let f = fixture(FixtureConfig::default());
        let use_case = ExecuteToolUseCase {
            permissions: Arc::new(DenyAll),
            ..f.use_case
        };

        let result = use_case.execute(input("site.info")).await;

        assert_eq!(result.error_code.as_deref(), Some("ACCESS_DENIED"));
        assert!(!f.invoked.load(Ordering::SeqCst));
        assert_eq!(f.subscriber.tags(), vec!["started", "failed:policy_denied_category"]);
    }

    #[tokio::test]
    async fn test_cancelled_call_releases_context() {
        let context = Arc::new(CallContext::new());

        struct HangingHandler;
        #[async_trait]
        impl ToolHandler for HangingHandler {
            async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                Ok(ToolOutput::success())
            }
        }

        let registry = Arc::new(
            ToolRegistry::new()
                .register(
                    ToolDescriptor::read("site.info", "discovery", "Site info"),
                    Arc::new(HangingHandler),
                )
                .unwrap(),
        );

        let use_case = ExecuteToolUseCase::new(
            registry,
            PolicyConfig::default(),
            Arc::new(ScopeAuthority::new(ScopeSet::read_only())),
            RateLimiter::new(RateLimitSettings::default(), Arc::new(TestStore::default())),
        )
        .with_call_context(Arc::clone(&context));

        let token = CancellationToken::new();
        token.cancel();

        let result = use_case
            .execute(input("site.info").with_cancellation(token))
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error_code.as_deref(), Some("INTERNAL_ERROR"));
        assert!(!context.is_active());
    }
}
