//! Tool catalog — the registry of tool descriptors.

use super::descriptor::ToolDescriptor;
use crate::core::DomainError;
use std::collections::BTreeMap;

/// Catalog of registered tool descriptors, keyed by tool id.
///
/// Populated once at startup; the gateway reads it on every call to resolve
/// the descriptor for policy evaluation. Listing is id-ordered.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a descriptor. Duplicate ids are rejected — the catalog is
    /// immutable after startup, so a collision is a wiring bug.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), DomainError> {
        if self.tools.contains_key(&descriptor.id) {
            return Err(DomainError::DuplicateTool(descriptor.id.clone()));
        }
        self.tools.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Case-insensitive substring search over id, category, and description.
    pub fn search(&self, query: &str) -> Vec<&ToolDescriptor> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.all().collect();
        }
        self.tools
            .values()
            .filter(|tool| {
                let haystack = format!(
                    "{} {} {}",
                    tool.id, tool.category, tool.description
                )
                .to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ToolCatalog {
        let mut catalog = ToolCatalog::new();
        catalog
            .register(ToolDescriptor::read("site.info", "discovery", "Basic site information"))
            .unwrap();
        catalog
            .register(ToolDescriptor::trigger("cache.rebuild", "cache", "Rebuild all caches"))
            .unwrap();
        catalog
    }

    #[test]
    fn test_register_and_get() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("site.info").is_some());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = sample_catalog();
        let result = catalog.register(ToolDescriptor::read("site.info", "discovery", "dup"));
        assert!(matches!(result, Err(DomainError::DuplicateTool(_))));
    }

    #[test]
    fn test_search_matches_id_and_description() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search("cache").len(), 1);
        assert_eq!(catalog.search("information").len(), 1);
        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search("nothing-here").len(), 0);
    }

    #[test]
    fn test_listing_is_id_ordered() {
        let catalog = sample_catalog();
        let ids: Vec<&str> = catalog.all().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["cache.rebuild", "site.info"]);
    }
}
