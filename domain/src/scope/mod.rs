//! Connection scopes — coarse capability grants attached to a caller's
//! execution context.
//!
//! A connection carries a *set* of scopes (read, write, admin). Write implies
//! intent to mutate; admin is a separate capability and is **not** implied by
//! write. Scope resolution intersects every requested/default set with the
//! configured `allowed_scopes` cap so a connection can never escalate past
//! what the operator permitted.

pub mod authority;

pub use authority::ScopeAuthority;

use crate::core::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A coarse capability grant for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Read-only access to the managed system.
    Read,
    /// Permission to mutate content and configuration.
    Write,
    /// Permission to trigger administrative operations.
    Admin,
}

impl Scope {
    /// All scopes the gateway understands.
    pub const ALL: [Scope; 3] = [Scope::Read, Scope::Write, Scope::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Read => "read",
            Scope::Write => "write",
            Scope::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "read" => Ok(Scope::Read),
            "write" => Ok(Scope::Write),
            "admin" => Ok(Scope::Admin),
            other => Err(DomainError::InvalidScope(other.to_string())),
        }
    }
}

/// An unordered set of [`Scope`]s carried by a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// The read-only fallback set, used to prevent accidental lockout.
    pub fn read_only() -> Self {
        Self::from_iter([Scope::Read])
    }

    /// All scopes — the default `allowed_scopes` cap.
    pub fn all() -> Self {
        Self::from_iter(Scope::ALL)
    }

    /// Parse a comma-separated scope list, silently dropping unknown names.
    pub fn parse_list(input: &str) -> Self {
        input
            .split(',')
            .filter_map(|s| s.parse::<Scope>().ok())
            .collect()
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.0.contains(&scope)
    }

    pub fn insert(&mut self, scope: Scope) {
        self.0.insert(scope);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        self.0.iter().copied()
    }

    /// Set intersection — the basis of every scope-cap operation.
    pub fn intersect(&self, other: &ScopeSet) -> ScopeSet {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Scope names as strings, for status output and denial messages.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.labels().join(","))
    }
}

/// Resolve the effective scopes for a connection.
///
/// Priority: an explicit `requested` set (from a trusted transport source)
/// wins if it intersects the allowed cap; otherwise the configured defaults
/// apply. Every source is intersected with `allowed`, and an empty result
/// falls back so a connection always holds at least `read`:
///
/// 1. `allowed` empty → treated as `{read}` (lockout prevention)
/// 2. `default ∩ allowed` empty → the full allowed cap
/// 3. `requested ∩ allowed` empty → fall through to the defaults
pub fn resolve_scopes(
    requested: Option<&ScopeSet>,
    default: &ScopeSet,
    allowed: &ScopeSet,
) -> ScopeSet {
    let allowed = if allowed.is_empty() {
        ScopeSet::read_only()
    } else {
        allowed.clone()
    };

    let default = {
        let capped = default.intersect(&allowed);
        if capped.is_empty() { allowed.clone() } else { capped }
    };

    if let Some(requested) = requested {
        let capped = requested.intersect(&allowed);
        if !capped.is_empty() {
            return capped;
        }
    }

    default
}
