//! CLI entrypoint for toolgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use toolgate_application::{
    AuditSink, ExecuteToolInput, ExecuteToolUseCase, ExecutionEventBus, NoAuditSink, RateLimiter,
    StatusUseCase,
};
use toolgate_domain::context::CallContext;
use toolgate_domain::scope::{ScopeAuthority, ScopeSet, resolve_scopes};
use toolgate_domain::tool::ToolCall;
use toolgate_infrastructure::{
    ChangeTracker, ConfigLoader, ConfigPermissionChecker, InMemoryRateLimitStore, JsonlAuditSink,
    TracingEventLogger, default_registry, derive_caller_id, short_display,
};
use toolgate_presentation::{Cli, Commands, ConsoleFormatter, OutputFormat};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when `access.trust_scopes_via_env` is set.
const SCOPES_ENV_VAR: &str = "TOOLGATE_SCOPES";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?
    };
    let audit_log_path = file_config.audit_log_path();
    let policy = file_config.into_policy();

    // Resolve connection scopes: explicit --scope flags win, then the
    // environment variable when trusted, then the configured defaults.
    // Everything is capped by allowed_scopes.
    let requested = if !cli.scope.is_empty() {
        Some(ScopeSet::parse_list(&cli.scope.join(",")))
    } else if policy.trust_scopes_via_env {
        std::env::var(SCOPES_ENV_VAR)
            .ok()
            .map(|s| ScopeSet::parse_list(&s))
    } else {
        None
    };
    let scopes = resolve_scopes(
        requested.as_ref(),
        &policy.default_scopes,
        &policy.allowed_scopes,
    );
    let authority = Arc::new(ScopeAuthority::new(scopes));

    let caller = derive_caller_id(cli.caller.as_deref());
    info!(
        caller = %short_display(&caller),
        scopes = %authority.current_scopes(),
        "Starting toolgate"
    );

    // === Dependency Injection ===
    let context = Arc::new(CallContext::new());
    let tracker = Arc::new(ChangeTracker::new(Arc::clone(&context)));
    let registry = Arc::new(default_registry(tracker).context("Failed to build tool registry")?);
    let rate_limiter = RateLimiter::new(
        policy.rate_limits.clone(),
        Arc::new(InMemoryRateLimitStore::new()),
    );

    match cli.command {
        Commands::Call { tool, args, json } => {
            let call = build_call(&tool, &args, json.as_deref())?;

            let audit: Arc<dyn AuditSink> = if policy.audit_enabled {
                match JsonlAuditSink::open(&audit_log_path) {
                    Ok(sink) => Arc::new(sink),
                    Err(error) => {
                        warn!(%error, path = %audit_log_path, "Audit log unavailable; continuing without persistence");
                        Arc::new(NoAuditSink)
                    }
                }
            } else {
                Arc::new(NoAuditSink)
            };

            let events = ExecutionEventBus::new().subscribe(Arc::new(TracingEventLogger));
            let permissions = Arc::new(ConfigPermissionChecker::from_policy(&policy));
            let use_case = ExecuteToolUseCase::new(registry, policy, authority, rate_limiter)
                .with_permissions(permissions)
                .with_audit_sink(audit)
                .with_event_bus(events)
                .with_call_context(context);

            // Release the call context even when the caller aborts mid-call.
            let token = CancellationToken::new();
            let signal_token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    signal_token.cancel();
                }
            });

            let input = ExecuteToolInput::new(call, caller, request_id())
                .with_cancellation(token);
            let result = use_case.execute(input).await;

            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_result(&result),
                OutputFormat::Json => ConsoleFormatter::format_result_json(&result),
            };
            print!("{}", ensure_newline(output));

            if !result.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let use_case = StatusUseCase::new(policy, authority, rate_limiter);
            // Usage is keyed by the full caller id; only the display is
            // truncated.
            let mut status = use_case.query(&caller);
            status.caller = short_display(&caller);

            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_status(&status),
                OutputFormat::Json => ConsoleFormatter::format_status_json(&status),
            };
            print!("{}", ensure_newline(output));
        }

        Commands::Tools { query } => {
            let tools = registry.catalog().search(query.as_deref().unwrap_or(""));
            print!("{}", ensure_newline(ConsoleFormatter::format_tools(&tools)));
        }

        Commands::Describe { tool } => {
            let Some(descriptor) = registry.descriptor(&tool) else {
                bail!("Unknown tool: {tool}");
            };
            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_descriptor(descriptor),
                OutputFormat::Json => ConsoleFormatter::format_descriptor_json(descriptor),
            };
            print!("{}", ensure_newline(output));
        }

        Commands::ResetLimits => {
            rate_limiter.reset(&caller);
            println!("Rate limits reset for {}.", short_display(&caller));
        }
    }

    Ok(())
}

/// Build a tool call from `-a key=value` pairs and an optional `--json`
/// object. Values that parse as JSON keep their type; everything else is a
/// string. JSON keys win over `--arg` keys.
fn build_call(tool: &str, args: &[String], json: Option<&str>) -> Result<ToolCall> {
    let mut arguments = Map::new();

    for pair in args {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Invalid --arg '{pair}': expected key=value"))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        arguments.insert(key.to_string(), value);
    }

    if let Some(json) = json {
        let parsed: Map<String, Value> =
            serde_json::from_str(json).context("--json must be a JSON object")?;
        arguments.extend(parsed);
    }

    Ok(ToolCall::new(tool).with_arguments(arguments))
}

fn request_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("cli-{nanos:x}")
}

fn ensure_newline(mut output: String) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
