//! Console output formatter for gateway results

use colored::Colorize;
use toolgate_application::use_cases::status::GatewayStatus;
use toolgate_domain::tool::{CanonicalResult, ToolDescriptor};

/// Formats gateway output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a canonical result
    pub fn format_result(result: &CanonicalResult) -> String {
        let mut output = String::new();

        if result.is_success() {
            output.push_str(&format!("{} {}\n", "OK".green().bold(), result.message));
            if let Some(data) = &result.data {
                if !data.is_empty() {
                    let pretty = serde_json::to_string_pretty(data)
                        .unwrap_or_else(|_| "{}".to_string());
                    output.push_str(&pretty);
                    output.push('\n');
                }
            }
        } else {
            output.push_str(&format!("{} {}\n", "DENIED/FAILED".red().bold(), result.message));
            if let Some(code) = &result.error_code {
                output.push_str(&format!("{} {}\n", "Code:".cyan().bold(), code));
            }
            if let Some(retry_after) = result.retry_after {
                output.push_str(&format!(
                    "{} retry in {} seconds\n",
                    "Rate limit:".cyan().bold(),
                    retry_after
                ));
            }
        }

        output
    }

    /// Format a canonical result as JSON
    pub fn format_result_json(result: &CanonicalResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the gateway status report
    pub fn format_status(status: &GatewayStatus) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Gateway Status".cyan().bold()));
        output.push_str(&format!("  Caller:  {}\n", status.caller));
        output.push_str(&format!("  Scopes:  {}\n", status.scopes.join(", ")));
        output.push_str(&format!(
            "  Read-only mode:   {}\n",
            Self::flag(status.read_only_mode)
        ));
        output.push_str(&format!(
            "  Config-only mode: {}\n",
            Self::flag(status.config_only_mode)
        ));
        if status.config_only_mode {
            output.push_str(&format!(
                "  Allowed write kinds: {}\n",
                status.config_only_allowed_write_kinds.join(", ")
            ));
        }
        output.push_str(&format!(
            "  Audit logging:    {}\n",
            Self::flag(status.audit_enabled)
        ));

        output.push_str(&format!("\n{}\n", "Rate Limits".cyan().bold()));
        if status.rate_limits.enabled {
            for usage in &status.rate_limits.usage {
                output.push_str(&format!(
                    "  {:<28} {:>4} / {}\n",
                    usage.class.as_str(),
                    usage.count,
                    usage.limit
                ));
            }
        } else {
            output.push_str("  disabled\n");
        }

        output
    }

    /// Format the status report as JSON
    pub fn format_status_json(status: &GatewayStatus) -> String {
        serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the tool listing
    pub fn format_tools(tools: &[&ToolDescriptor]) -> String {
        let mut output = String::new();
        output.push_str(&format!("Found {} tools.\n", tools.len()));

        for tool in tools {
            output.push_str(&format!(
                "  {:<18} {:<14} {:<9} {}\n",
                tool.id.yellow(),
                tool.category,
                tool.operation_kind.as_str(),
                tool.description
            ));
        }

        output
    }

    /// Format one tool descriptor in detail
    pub fn format_descriptor(tool: &ToolDescriptor) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Tool:".cyan().bold(), tool.id));
        output.push_str(&format!("  Category:  {}\n", tool.category));
        output.push_str(&format!("  Operation: {}\n", tool.operation_kind.as_str()));
        if let Some(kind) = tool.effective_write_kind() {
            output.push_str(&format!("  Write kind: {}\n", kind));
        }
        output.push_str(&format!("  {}\n", tool.description));

        if !tool.parameters.is_empty() {
            output.push_str(&format!("\n{}\n", "Parameters:".cyan().bold()));
            for param in &tool.parameters {
                let required = if param.required { "required" } else { "optional" };
                output.push_str(&format!(
                    "  {:<12} {:<8} ({}) {}\n",
                    param.name.yellow(),
                    param.param_type,
                    required,
                    param.description
                ));
            }
        }

        output
    }

    /// Format a tool descriptor as JSON
    pub fn format_descriptor_json(tool: &ToolDescriptor) -> String {
        serde_json::to_string_pretty(tool).unwrap_or_else(|_| "{}".to_string())
    }

    fn flag(on: bool) -> String {
        if on {
            "on".red().bold().to_string()
        } else {
            "off".green().to_string()
        }
    }
}
