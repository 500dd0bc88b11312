//! Content tools — create/delete demo handlers over an in-memory store.

use async_trait::async_trait;
use serde_json::{Map, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use toolgate_application::ports::tool_handler::{HandlerError, ToolHandler};
use toolgate_domain::tool::{ToolCall, ToolOutput};

pub const CONTENT_CREATE: &str = "content.create";
pub const CONTENT_DELETE: &str = "content.delete";

/// Shared in-memory content store standing in for the managed system.
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: Mutex<BTreeMap<u64, String>>,
    next_id: Mutex<u64>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
        }
    }

    fn create(&self, title: &str) -> u64 {
        let mut next_id = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        let id = *next_id;
        *next_id += 1;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, title.to_string());
        id
    }

    fn delete(&self, id: u64) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates a content entity with the given title.
pub struct ContentCreateHandler {
    store: Arc<ContentStore>,
}

impl ContentCreateHandler {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolHandler for ContentCreateHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput, HandlerError> {
        let title = call
            .require_string("title")
            .map_err(HandlerError::Execution)?;

        let id = self.store.create(title);
        let mut data = Map::new();
        data.insert("id".to_string(), json!(id));
        data.insert("title".to_string(), json!(title));
        Ok(ToolOutput::success_with_message(format!("Content {id} created.")).with_data(data))
    }
}

/// Deletes a content entity by id.
pub struct ContentDeleteHandler {
    store: Arc<ContentStore>,
}

impl ContentDeleteHandler {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolHandler for ContentDeleteHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput, HandlerError> {
        let id = call
            .get_i64("id")
            .and_then(|id| u64::try_from(id).ok())
            .ok_or_else(|| HandlerError::Execution("Missing required argument: id".to_string()))?;

        if self.store.delete(id) {
            Ok(ToolOutput::success_with_message(format!("Content {id} deleted.")))
        } else {
            Ok(ToolOutput::failure(
                "NOT_FOUND",
                format!("The content '{id}' was not found."),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_delete() {
        let store = Arc::new(ContentStore::new());
        let create = ContentCreateHandler::new(store.clone());
        let delete = ContentDeleteHandler::new(store.clone());

        let output = create
            .execute(&ToolCall::new(CONTENT_CREATE).with_arg("title", "Hello"))
            .await
            .unwrap();
        assert!(output.is_success());
        assert_eq!(store.len(), 1);

        let output = delete
            .execute(&ToolCall::new(CONTENT_DELETE).with_arg("id", 1))
            .await
            .unwrap();
        assert!(output.is_success());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let store = Arc::new(ContentStore::new());
        let delete = ContentDeleteHandler::new(store);

        let output = delete
            .execute(&ToolCall::new(CONTENT_DELETE).with_arg("id", 99))
            .await
            .unwrap();

        let ToolOutput::Failure { code, .. } = output else {
            panic!("expected failure");
        };
        assert_eq!(code.as_deref(), Some("NOT_FOUND"));
    }
}
