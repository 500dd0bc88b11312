//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::into_policy`] converts them
//! into the validated domain [`PolicyConfig`], silently dropping unknown
//! scope and write-kind names the way the administrative UI writes them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use toolgate_domain::policy::{PolicyConfig, RateLimitSettings};
use toolgate_domain::scope::{Scope, ScopeSet};
use toolgate_domain::tool::WriteKind;

/// Raw access-policy configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccessConfig {
    /// Block every mutating tool
    pub read_only_mode: bool,
    /// Block mutations whose write kind is off the allow-list
    pub config_only_mode: bool,
    /// Write kinds permitted under config-only mode
    pub config_only_allowed_write_kinds: Vec<String>,
    /// Scopes granted when the connection requests none
    pub default_scopes: Vec<String>,
    /// Hard cap on grantable scopes
    pub allowed_scopes: Vec<String>,
    /// Honor scope requests from the TOOLGATE_SCOPES environment variable
    pub trust_scopes_via_env: bool,
    /// Persist audit entries
    pub audit_logging: bool,
}

impl Default for FileAccessConfig {
    fn default() -> Self {
        Self {
            read_only_mode: false,
            config_only_mode: false,
            config_only_allowed_write_kinds: vec!["config".to_string()],
            default_scopes: vec!["read".to_string()],
            allowed_scopes: vec![
                "read".to_string(),
                "write".to_string(),
                "admin".to_string(),
            ],
            trust_scopes_via_env: false,
            audit_logging: true,
        }
    }
}

/// Raw rate-limiting configuration from TOML. Non-positive limits disable
/// the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    pub enabled: bool,
    pub max_writes_per_minute: i64,
    pub max_writes_per_hour: i64,
    pub max_deletes_per_hour: i64,
    pub max_structure_changes_per_hour: i64,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        let defaults = RateLimitSettings::default();
        Self {
            enabled: defaults.enabled,
            max_writes_per_minute: defaults.max_writes_per_minute,
            max_writes_per_hour: defaults.max_writes_per_hour,
            max_deletes_per_hour: defaults.max_deletes_per_hour,
            max_structure_changes_per_hour: defaults.max_structure_changes_per_hour,
        }
    }
}

/// Raw category-permission configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePermissionsConfig {
    /// Grant every category permission to every actor. The out-of-box
    /// default; set to false and fill `grants` to lock categories down.
    pub grant_all_categories: bool,
    /// Per-actor permission grants (actor -> ["use content", ...])
    pub grants: HashMap<String, Vec<String>>,
}

impl Default for FilePermissionsConfig {
    fn default() -> Self {
        Self {
            grant_all_categories: true,
            grants: HashMap::new(),
        }
    }
}

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Path of the JSONL audit log. Defaults to ./toolgate-audit.jsonl
    pub log_path: Option<String>,
}

/// Complete raw configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub access: FileAccessConfig,
    pub rate_limiting: FileRateLimitConfig,
    pub permissions: FilePermissionsConfig,
    pub audit: FileAuditConfig,
}

impl FileConfig {
    /// Convert into the validated domain policy value.
    pub fn into_policy(self) -> PolicyConfig {
        let config_only_allowed_write_kinds: BTreeSet<WriteKind> = self
            .access
            .config_only_allowed_write_kinds
            .iter()
            .filter_map(|k| k.parse().ok())
            .collect();

        let category_grants: BTreeMap<String, BTreeSet<String>> = self
            .permissions
            .grants
            .into_iter()
            .map(|(actor, perms)| (actor, perms.into_iter().collect()))
            .collect();

        PolicyConfig {
            read_only_mode: self.access.read_only_mode,
            config_only_mode: self.access.config_only_mode,
            config_only_allowed_write_kinds,
            default_scopes: parse_scope_list(&self.access.default_scopes),
            allowed_scopes: parse_scope_list(&self.access.allowed_scopes),
            trust_scopes_via_env: self.access.trust_scopes_via_env,
            audit_enabled: self.access.audit_logging,
            grant_all_categories: self.permissions.grant_all_categories,
            category_grants,
            rate_limits: RateLimitSettings {
                enabled: self.rate_limiting.enabled,
                max_writes_per_minute: self.rate_limiting.max_writes_per_minute,
                max_writes_per_hour: self.rate_limiting.max_writes_per_hour,
                max_deletes_per_hour: self.rate_limiting.max_deletes_per_hour,
                max_structure_changes_per_hour: self.rate_limiting.max_structure_changes_per_hour,
            },
        }
    }

    /// The audit log path, with the default applied.
    pub fn audit_log_path(&self) -> String {
        self.audit
            .log_path
            .clone()
            .unwrap_or_else(|| "toolgate-audit.jsonl".to_string())
    }
}

fn parse_scope_list(names: &[String]) -> ScopeSet {
    names
        .iter()
        .filter_map(|s| s.parse::<Scope>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_defaults() {
        let policy = FileConfig::default().into_policy();
        let expected = PolicyConfig {
            grant_all_categories: true,
            ..PolicyConfig::default()
        };

        assert_eq!(policy.read_only_mode, expected.read_only_mode);
        assert_eq!(policy.default_scopes, expected.default_scopes);
        assert_eq!(policy.allowed_scopes, expected.allowed_scopes);
        assert_eq!(policy.rate_limits, expected.rate_limits);
        assert_eq!(
            policy.config_only_allowed_write_kinds,
            expected.config_only_allowed_write_kinds
        );
        assert!(policy.grant_all_categories);
    }

    #[test]
    fn test_unknown_names_are_dropped() {
        let config = FileConfig {
            access: FileAccessConfig {
                config_only_allowed_write_kinds: vec!["config".to_string(), "files".to_string()],
                default_scopes: vec!["read".to_string(), "root".to_string()],
                ..FileAccessConfig::default()
            },
            ..FileConfig::default()
        };

        let policy = config.into_policy();
        assert_eq!(
            policy.config_only_allowed_write_kinds,
            BTreeSet::from([WriteKind::Config])
        );
        assert_eq!(policy.default_scopes, ScopeSet::read_only());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            [access]
            read_only_mode = true
            config_only_mode = true
            config_only_allowed_write_kinds = ["config", "ops"]

            [rate_limiting]
            enabled = true
            max_writes_per_minute = 5

            [permissions]
            grant_all_categories = false
            [permissions.grants]
            agent = ["use content", "use cache"]

            [audit]
            log_path = "/tmp/audit.jsonl"
        "#;

        let config: FileConfig = toml::from_str(toml_src).unwrap();
        assert!(config.access.read_only_mode);
        assert_eq!(config.rate_limiting.max_writes_per_minute, 5);
        // Unspecified limits keep their defaults
        assert_eq!(config.rate_limiting.max_writes_per_hour, 500);
        assert_eq!(config.audit_log_path(), "/tmp/audit.jsonl");

        let policy = config.into_policy();
        assert!(policy.read_only_mode);
        assert_eq!(
            policy.config_only_allowed_write_kinds,
            BTreeSet::from([WriteKind::Config, WriteKind::Ops])
        );
        assert!(!policy.grant_all_categories);
        assert!(policy.category_grants["agent"].contains("use content"));
    }

    #[test]
    fn test_default_audit_path() {
        assert_eq!(FileConfig::default().audit_log_path(), "toolgate-audit.jsonl");
    }
}
