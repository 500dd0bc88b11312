//! Global policy configuration and mode evaluation.
//!
//! [`PolicyConfig`] is an explicit value loaded once per connection and
//! passed into the gateway — policy components never read ambient global
//! state, so tests can inject arbitrary configurations without process-wide
//! side effects.
//!
//! Two independent toggles restrict mutation:
//!
//! - **read-only mode** — a hard kill switch blocking every mutating tool
//! - **config-only mode** — a finer valve permitting only mutations whose
//!   write kind is on an allow-list
//!
//! Read-only always wins; config-only allow-lists never reopen what
//! read-only closed.

pub mod decision;
pub mod modes;

pub use decision::{Decision, Denial};
pub use modes::{evaluate_modes, is_write_kind_allowed};

use crate::scope::ScopeSet;
use crate::tool::WriteKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-class rate limit settings. Non-positive limits mean unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_writes_per_minute: i64,
    pub max_writes_per_hour: i64,
    pub max_deletes_per_hour: i64,
    pub max_structure_changes_per_hour: i64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_writes_per_minute: 30,
            max_writes_per_hour: 500,
            max_deletes_per_hour: 50,
            max_structure_changes_per_hour: 100,
        }
    }
}

/// The gateway's policy configuration.
///
/// Loaded from the config store at connection start and only changed through
/// the administrative update path — never by tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hard kill switch: deny every mutating tool.
    pub read_only_mode: bool,
    /// Deny mutations whose write kind is not on the allow-list.
    pub config_only_mode: bool,
    /// Write kinds permitted under config-only mode. Empty behaves as
    /// `{config}`.
    pub config_only_allowed_write_kinds: BTreeSet<WriteKind>,
    /// Scopes granted when the connection requests none.
    pub default_scopes: ScopeSet,
    /// Hard cap on grantable scopes.
    pub allowed_scopes: ScopeSet,
    /// Honor scope requests from the `TOOLGATE_SCOPES` environment variable.
    pub trust_scopes_via_env: bool,
    /// Persist audit entries for policy decisions and outcomes.
    pub audit_enabled: bool,
    /// Grant every category permission to every actor.
    pub grant_all_categories: bool,
    /// Per-actor permission grants (e.g. "agent" -> ["use content"]).
    pub category_grants: BTreeMap<String, BTreeSet<String>>,
    /// Rate limiter settings.
    pub rate_limits: RateLimitSettings,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            read_only_mode: false,
            config_only_mode: false,
            config_only_allowed_write_kinds: BTreeSet::from([WriteKind::Config]),
            default_scopes: ScopeSet::read_only(),
            allowed_scopes: ScopeSet::all(),
            trust_scopes_via_env: false,
            audit_enabled: true,
            grant_all_categories: false,
            category_grants: BTreeMap::new(),
            rate_limits: RateLimitSettings::default(),
        }
    }
}

impl PolicyConfig {
    /// The config-only allow-list with the empty-set fallback applied.
    pub fn effective_allowed_write_kinds(&self) -> BTreeSet<WriteKind> {
        if self.config_only_allowed_write_kinds.is_empty() {
            BTreeSet::from([WriteKind::Config])
        } else {
            self.config_only_allowed_write_kinds.clone()
        }
    }
}
