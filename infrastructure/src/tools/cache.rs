//! Cache rebuild tool — the administrative trigger demo handler.

use async_trait::async_trait;
use serde_json::{Map, json};
use std::sync::atomic::{AtomicU64, Ordering};
use toolgate_application::ports::tool_handler::{HandlerError, ToolHandler};
use toolgate_domain::tool::{ToolCall, ToolOutput};

pub const CACHE_REBUILD: &str = "cache.rebuild";

/// Pretends to rebuild the managed system's caches, counting invocations.
#[derive(Debug, Default)]
pub struct CacheRebuildHandler {
    rebuilds: AtomicU64,
}

impl CacheRebuildHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolHandler for CacheRebuildHandler {
    async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
        let count = self.rebuilds.fetch_add(1, Ordering::SeqCst) + 1;
        let mut data = Map::new();
        data.insert("rebuild_count".to_string(), json!(count));
        Ok(ToolOutput::success_with_message("All caches rebuilt.").with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rebuild_counts_invocations() {
        let handler = CacheRebuildHandler::new();
        handler.execute(&ToolCall::new(CACHE_REBUILD)).await.unwrap();
        handler.execute(&ToolCall::new(CACHE_REBUILD)).await.unwrap();
        assert_eq!(handler.rebuild_count(), 2);
    }
}
