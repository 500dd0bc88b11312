//! Global mode evaluation — read-only and config-only.

use super::decision::Decision;
use super::PolicyConfig;
use crate::tool::{ErrorCode, OperationKind, ToolDescriptor, WriteKind};

/// Check whether a write kind is allowed under the config-only policy.
///
/// When config-only mode is disabled, every write kind is allowed (subject
/// to scopes, read-only mode, and category permissions).
pub fn is_write_kind_allowed(config: &PolicyConfig, kind: WriteKind) -> bool {
    if !config.config_only_mode {
        return true;
    }
    config.effective_allowed_write_kinds().contains(&kind)
}

/// Evaluate the global modes for a tool.
///
/// 1. Read tools are always allowed — modes only restrict mutation.
/// 2. Read-only mode denies unconditionally and takes precedence.
/// 3. Config-only mode denies mutations whose write kind is off the
///    allow-list.
pub fn evaluate_modes(config: &PolicyConfig, tool: &ToolDescriptor) -> Decision {
    if tool.operation_kind == OperationKind::Read {
        return Decision::Allowed;
    }

    if config.read_only_mode {
        return Decision::denied(
            ErrorCode::ReadOnlyMode,
            "Mutating operations are disabled. The gateway is in read-only mode.",
        );
    }

    if config.config_only_mode {
        // Mutating tools always have an effective write kind.
        let kind = tool.effective_write_kind().unwrap_or(WriteKind::Config);
        if !is_write_kind_allowed(config, kind) {
            return Decision::denied(
                ErrorCode::ConfigOnlyMode,
                format!(
                    "Write kind '{}' is not allowed. The gateway is in config-only mode.",
                    kind
                ),
            );
        }
    }

    Decision::Allowed
}
