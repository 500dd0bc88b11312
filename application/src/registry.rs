//! Tool registry — pairs each registered descriptor with its handler.
//!
//! The registry is populated once at startup and read on every call. The
//! descriptor side (the [`ToolCatalog`]) is everything policy evaluation
//! needs; the handler side is the external domain logic invoked only after
//! authorization passes.

use crate::ports::tool_handler::ToolHandler;
use std::collections::HashMap;
use std::sync::Arc;
use toolgate_domain::core::DomainError;
use toolgate_domain::tool::{ToolCatalog, ToolDescriptor};

/// Registry of tools available through the gateway.
#[derive(Default)]
pub struct ToolRegistry {
    catalog: ToolCatalog,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Builder-style; duplicate ids are rejected.
    pub fn register(
        mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self, DomainError> {
        let id = descriptor.id.clone();
        self.catalog.register(descriptor)?;
        self.handlers.insert(id, handler);
        Ok(self)
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn descriptor(&self, id: &str) -> Option<&ToolDescriptor> {
        self.catalog.get(id)
    }

    pub fn handler(&self, id: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_handler::HandlerError;
    use async_trait::async_trait;
    use toolgate_domain::tool::{ToolCall, ToolOutput};

    struct OkHandler;

    #[async_trait]
    impl ToolHandler for OkHandler {
        async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
            Ok(ToolOutput::success())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new()
            .register(
                ToolDescriptor::read("site.info", "discovery", "Site info"),
                Arc::new(OkHandler),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.descriptor("site.info").is_some());
        assert!(registry.handler("site.info").is_some());
        assert!(registry.handler("missing").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = ToolRegistry::new()
            .register(
                ToolDescriptor::read("site.info", "discovery", "Site info"),
                Arc::new(OkHandler),
            )
            .unwrap()
            .register(
                ToolDescriptor::read("site.info", "discovery", "Again"),
                Arc::new(OkHandler),
            );

        assert!(matches!(result, Err(DomainError::DuplicateTool(_))));
    }
}
