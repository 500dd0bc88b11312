//! Configuration file loading for toolgate
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./toolgate.toml` or `./.toolgate.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/toolgate/config.toml`
//! 4. Fallback: `~/.config/toolgate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAccessConfig, FileAuditConfig, FileConfig, FilePermissionsConfig, FileRateLimitConfig,
};
pub use loader::ConfigLoader;
