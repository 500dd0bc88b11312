//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for toolgate
#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(author, version, about = "Policy and accounting gateway for privileged tool execution")]
#[command(long_about = r#"
Toolgate fronts a catalog of privileged operations ("tools") exposed to an
external caller against a managed system. Every call is authorized (category
permission, connection scopes, global safety modes, rate limits), audited,
and normalized into one canonical result shape.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./toolgate.toml     Project-level config
3. ~/.config/toolgate/config.toml   Global config

Example:
  toolgate tools
  toolgate call site.info
  toolgate --scope read --scope write call content.create -a title="Hello"
  toolgate status
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connection scopes to request (can be specified multiple times)
    #[arg(long, value_name = "SCOPE", global = true)]
    pub scope: Vec<String>,

    /// Caller identity; defaults to a local process fingerprint
    #[arg(long, value_name = "ID", global = true)]
    pub caller: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a tool through the gateway
    Call {
        /// Tool id (see `toolgate tools`)
        tool: String,

        /// Tool argument as key=value (can be specified multiple times)
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Tool arguments as a JSON object (merged over --arg values)
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
    },

    /// Show current scopes, mode flags, and rate-limit usage
    Status,

    /// List available tools, optionally filtered
    Tools {
        /// Search term matched against id, category, and description
        query: Option<String>,
    },

    /// Show descriptor details for one tool
    Describe {
        /// Tool id
        tool: String,
    },

    /// Clear the calling identity's rate-limit counters
    ResetLimits,
}
