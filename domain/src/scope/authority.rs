//! Scope authority — answers capability questions for the current connection.

use super::{Scope, ScopeSet};
use std::sync::RwLock;

/// Holds the scope set granted to the current execution context.
///
/// One authority exists per connection; it never consults the managed system.
/// [`set_scopes()`](Self::set_scopes) exists for administrative and test use
/// only — normal connections resolve their scopes once at startup via
/// [`resolve_scopes`](super::resolve_scopes).
#[derive(Debug)]
pub struct ScopeAuthority {
    scopes: RwLock<ScopeSet>,
}

impl ScopeAuthority {
    pub fn new(scopes: ScopeSet) -> Self {
        Self {
            scopes: RwLock::new(scopes),
        }
    }

    /// Check whether the connection holds a specific scope.
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes
            .read()
            .map(|s| s.contains(scope))
            .unwrap_or(false)
    }

    /// The current scope set.
    pub fn current_scopes(&self) -> ScopeSet {
        self.scopes.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Replace the scope set (administrative/test use).
    pub fn set_scopes(&self, scopes: ScopeSet) {
        if let Ok(mut current) = self.scopes.write() {
            *current = scopes;
        }
    }
}

impl Default for ScopeAuthority {
    fn default() -> Self {
        Self::new(ScopeSet::read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_scope() {
        let authority = ScopeAuthority::new(ScopeSet::from_iter([Scope::Read, Scope::Write]));
        assert!(authority.has_scope(Scope::Read));
        assert!(authority.has_scope(Scope::Write));
        assert!(!authority.has_scope(Scope::Admin));
    }

    #[test]
    fn test_set_scopes_replaces() {
        let authority = ScopeAuthority::default();
        assert!(!authority.has_scope(Scope::Admin));

        authority.set_scopes(ScopeSet::from_iter([Scope::Admin]));
        assert!(authority.has_scope(Scope::Admin));
        assert!(!authority.has_scope(Scope::Read));
    }

    #[test]
    fn test_default_is_read_only() {
        let authority = ScopeAuthority::default();
        assert_eq!(authority.current_scopes(), ScopeSet::read_only());
    }
}
