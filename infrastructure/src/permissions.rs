//! Config-driven category permission checker.
//!
//! Grants come straight from the policy configuration: either
//! `grant_all_categories` (the open default) or a per-actor grant list.
//! Permission names are derived from categories by the application layer
//! ("use content", "use cache", ...), so this adapter is pure data — a new
//! tool category needs a config line, not code.

use std::collections::{BTreeMap, BTreeSet};
use toolgate_application::ports::permissions::PermissionChecker;
use toolgate_domain::policy::PolicyConfig;

/// Permission checker backed by configured grants.
#[derive(Debug, Clone)]
pub struct ConfigPermissionChecker {
    grant_all: bool,
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl ConfigPermissionChecker {
    pub fn new(grant_all: bool, grants: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self { grant_all, grants }
    }

    pub fn from_policy(policy: &PolicyConfig) -> Self {
        Self::new(policy.grant_all_categories, policy.category_grants.clone())
    }
}

impl PermissionChecker for ConfigPermissionChecker {
    fn has_permission(&self, actor: &str, permission: &str) -> bool {
        if self.grant_all {
            return true;
        }
        self.grants
            .get(actor)
            .is_some_and(|granted| granted.contains(permission))
    }
}
