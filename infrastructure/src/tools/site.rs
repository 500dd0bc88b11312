//! Site information tool — the read-only demo handler.

use async_trait::async_trait;
use serde_json::{Map, json};
use toolgate_application::ports::tool_handler::{HandlerError, ToolHandler};
use toolgate_domain::tool::{ToolCall, ToolOutput};

pub const SITE_INFO: &str = "site.info";

/// Returns basic information about the managed site.
#[derive(Debug, Clone)]
pub struct SiteInfoHandler {
    name: String,
    version: String,
}

impl SiteInfoHandler {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for SiteInfoHandler {
    fn default() -> Self {
        Self::new("Managed Site", "1.0.0")
    }
}

#[async_trait]
impl ToolHandler for SiteInfoHandler {
    async fn execute(&self, _call: &ToolCall) -> Result<ToolOutput, HandlerError> {
        let mut data = Map::new();
        data.insert("name".to_string(), json!(self.name));
        data.insert("version".to_string(), json!(self.version));
        Ok(ToolOutput::success_with_message("Site information retrieved.").with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_site_info_returns_data() {
        let handler = SiteInfoHandler::new("Example", "2.1.0");
        let output = handler.execute(&ToolCall::new(SITE_INFO)).await.unwrap();

        assert!(output.is_success());
        let ToolOutput::Success { data, .. } = output else {
            panic!("expected success");
        };
        let data = data.unwrap();
        assert_eq!(data["name"], json!("Example"));
        assert_eq!(data["version"], json!("2.1.0"));
    }
}
