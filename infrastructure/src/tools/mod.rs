//! Built-in tool handlers.
//!
//! Small stand-ins for the managed system's domain logic so the gateway can
//! be driven end-to-end from the CLI and integration tests. Their business
//! logic is intentionally trivial; the interesting part is the descriptor
//! metadata each registers (category, operation kind, write kind, charge
//! class, parameters).

pub mod cache;
pub mod config_tools;
pub mod content;
pub mod site;

pub use cache::CacheRebuildHandler;
pub use config_tools::ConfigSetHandler;
pub use content::{ContentCreateHandler, ContentDeleteHandler, ContentStore};
pub use site::SiteInfoHandler;

use crate::tracker::ChangeTracker;
use std::sync::Arc;
use toolgate_application::registry::ToolRegistry;
use toolgate_domain::core::DomainError;
use toolgate_domain::tool::{ChargeClass, ToolDescriptor, ToolParameter};

/// Build the default registry of built-in tools.
pub fn default_registry(tracker: Arc<ChangeTracker>) -> Result<ToolRegistry, DomainError> {
    let content_store = Arc::new(ContentStore::new());

    ToolRegistry::new()
        .register(
            ToolDescriptor::read(site::SITE_INFO, "discovery", "Basic site information"),
            Arc::new(SiteInfoHandler::default()),
        )?
        .register(
            ToolDescriptor::trigger(cache::CACHE_REBUILD, "cache", "Rebuild all caches"),
            Arc::new(CacheRebuildHandler::new()),
        )?
        .register(
            ToolDescriptor::write(content::CONTENT_CREATE, "content", "Create a content entity")
                .with_parameter(ToolParameter::new("title", "Content title", true))
                .with_parameter(ToolParameter::new("body", "Content body", false)),
            Arc::new(ContentCreateHandler::new(content_store.clone())),
        )?
        .register(
            ToolDescriptor::write(content::CONTENT_DELETE, "content", "Delete a content entity")
                .with_charge_class(ChargeClass::Delete)
                .with_parameter(
                    ToolParameter::new("id", "Content id", true).with_type("integer"),
                ),
            Arc::new(ContentDeleteHandler::new(content_store)),
        )?
        .register(
            ToolDescriptor::write(config_tools::CONFIG_SET, "configuration", "Set a configuration value")
                .with_parameter(ToolParameter::new("name", "Configuration name", true))
                .with_parameter(ToolParameter::new("value", "Configuration value", true)),
            Arc::new(ConfigSetHandler::new(tracker)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_domain::context::CallContext;
    use toolgate_domain::tool::{OperationKind, WriteKind};

    #[test]
    fn test_default_registry_contents() {
        let context = Arc::new(CallContext::new());
        let registry = default_registry(Arc::new(ChangeTracker::new(context))).unwrap();

        assert_eq!(registry.len(), 5);

        let info = registry.descriptor("site.info").unwrap();
        assert_eq!(info.operation_kind, OperationKind::Read);

        let rebuild = registry.descriptor("cache.rebuild").unwrap();
        assert_eq!(rebuild.operation_kind, OperationKind::Trigger);
        assert_eq!(rebuild.effective_write_kind(), Some(WriteKind::Ops));

        let delete = registry.descriptor("content.delete").unwrap();
        assert_eq!(delete.charge_class, ChargeClass::Delete);

        let config = registry.descriptor("config.set").unwrap();
        assert_eq!(config.effective_write_kind(), Some(WriteKind::Config));
    }
}
