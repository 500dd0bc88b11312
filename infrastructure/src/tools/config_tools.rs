//! Configuration tool — a config-kind write handler that reports into the
//! change tracker.

use crate::tracker::ChangeTracker;
use async_trait::async_trait;
use serde_json::{Map, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use toolgate_application::ports::tool_handler::{HandlerError, ToolHandler};
use toolgate_domain::tool::{ToolCall, ToolOutput};

pub const CONFIG_SET: &str = "config.set";

/// Sets a configuration value in an in-memory store and tracks the change.
pub struct ConfigSetHandler {
    values: Mutex<BTreeMap<String, String>>,
    tracker: Arc<ChangeTracker>,
}

impl ConfigSetHandler {
    pub fn new(tracker: Arc<ChangeTracker>) -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            tracker,
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }
}

#[async_trait]
impl ToolHandler for ConfigSetHandler {
    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput, HandlerError> {
        let name = call
            .require_string("name")
            .map_err(HandlerError::Execution)?;
        let value = call
            .require_string("value")
            .map_err(HandlerError::Execution)?;

        let operation = {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            let operation = if values.contains_key(name) {
                "update"
            } else {
                "create"
            };
            values.insert(name.to_string(), value.to_string());
            operation
        };

        self.tracker.track_change(name, operation);

        let mut data = Map::new();
        data.insert("name".to_string(), json!(name));
        data.insert("operation".to_string(), json!(operation));
        Ok(ToolOutput::success_with_message(format!("Configuration '{name}' saved.")).with_data(data))
    }
}
