//! Tool registry - browser tools offered to the act model
//!
//! Holds the tool definitions and routes tool calls to a `BrowserDriver`.

use crate::browser::BrowserDriver;
use crate::core::{Result, ToolCall, ToolDefinition, ToolResult};

/// Registry of browser tools
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Create a registry with the browser tools registered
    pub fn new() -> Self {
        let mut registry = Self {
            definitions: Vec::new(),
        };
        registry.register_browser_tools();
        registry
    }

    fn register_browser_tools(&mut self) {
        self.register(ToolDefinition::function(
            "browser_url",
            "Navigate to a URL",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The URL to navigate to"
                    }
                },
                "required": ["url"]
            }),
        ));

        self.register(ToolDefinition::function(
            "browser_click",
            "Click an element on the page by its ref from the page elements list",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "ref": {
                        "type": "string",
                        "description": "Element ref (e.g., @e1, @e2)"
                    }
                },
                "required": ["ref"]
            }),
        ));

        self.register(ToolDefinition::function(
            "browser_fill",
            "Fill text into an input field by its ref",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "ref": {
                        "type": "string",
                        "description": "Element ref"
                    },
                    "text": {
                        "type": "string",
                        "description": "Text to enter"
                    }
                },
                "required": ["ref", "text"]
            }),
        ));

        self.register(ToolDefinition::function(
            "browser_press",
            "Press a keyboard key, such as Enter or Tab",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "key": {
                        "type": "string",
                        "description": "Key name"
                    }
                },
                "required": ["key"]
            }),
        ));

        self.register(ToolDefinition::function(
            "browser_get_text",
            "Get text content from an element by ref or CSS selector",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "ref": {
                        "type": "string",
                        "description": "Element ref or selector"
                    }
                },
                "required": ["ref"]
            }),
        ));
    }

    /// Register a tool definition
    pub fn register(&mut self, definition: ToolDefinition) {
        self.definitions.push(definition);
    }

    /// All tool definitions, in registration order
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.function.name == name)
    }

    /// Execute a tool call against a browser.
    ///
    /// Unknown tools and missing arguments come back as failed results.
    /// Browser errors are propagated.
    pub async fn execute(
        &self,
        tool_call: &ToolCall,
        browser: &dyn BrowserDriver,
    ) -> Result<ToolResult> {
        let name = tool_call.name.as_str();
        if !self.contains(name) {
            return Ok(ToolResult::failure(name, format!("Unknown tool: {}", name)));
        }

        let arg = |key: &str| tool_call.get_string(key).filter(|v| !v.is_empty());
        let missing = |key: &str| ToolResult::failure(name, format!("Missing argument '{}'", key));

        match name {
            "browser_url" => {
                let Some(url) = arg("url") else {
                    return Ok(missing("url"));
                };
                browser.open(&url).await?;
                Ok(ToolResult::success(name, format!("Navigated to {}", url)))
            }
            "browser_click" => {
                let Some(ref_id) = arg("ref") else {
                    return Ok(missing("ref"));
                };
                let target = normalize_ref(&ref_id);
                browser.click(&target).await?;
                Ok(ToolResult::success(name, format!("Clicked {}", target)))
            }
            "browser_fill" => {
                let (Some(ref_id), Some(text)) = (arg("ref"), tool_call.get_string("text")) else {
                    return Ok(missing("ref/text"));
                };
                let target = normalize_ref(&ref_id);
                browser.fill(&target, &text).await?;
                Ok(ToolResult::success(
                    name,
                    format!("Filled {} with '{}'", target, text),
                ))
            }
            "browser_press" => {
                let Some(key) = arg("key") else {
                    return Ok(missing("key"));
                };
                browser.press(&key).await?;
                Ok(ToolResult::success(name, format!("Pressed {}", key)))
            }
            "browser_get_text" => {
                let Some(ref_id) = arg("ref") else {
                    return Ok(missing("ref"));
                };
                let text = browser.get_text(&normalize_ref(&ref_id)).await?;
                Ok(ToolResult::success(name, text))
            }
            _ => Ok(ToolResult::failure(
                name,
                format!("Unknown browser tool: {}", name),
            )),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a bare snapshot ref (`e5`) into agent-browser's `@e5` form.
/// Selectors and already-prefixed refs pass through.
pub fn normalize_ref(ref_id: &str) -> String {
    let trimmed = ref_id.trim();
    let is_bare_ref = trimmed.len() > 1
        && trimmed.starts_with('e')
        && trimmed[1..].chars().all(|c| c.is_ascii_digit());

    if is_bare_ref {
        format!("@{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::RecordingDriver;

    #[test]
    fn test_normalize_ref() {
        assert_eq!(normalize_ref("e5"), "@e5");
        assert_eq!(normalize_ref("@e5"), "@e5");
        assert_eq!(normalize_ref(" e12 "), "@e12");
        assert_eq!(normalize_ref("h1"), "h1");
        assert_eq!(normalize_ref("email"), "email");
    }

    #[test]
    fn test_registered_tools() {
        let registry = ToolRegistry::new();
        let names: Vec<_> = registry
            .definitions()
            .iter()
            .map(|d| d.function.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "browser_url",
                "browser_click",
                "browser_fill",
                "browser_press",
                "browser_get_text"
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_click_and_fill() {
        let registry = ToolRegistry::new();
        let driver = RecordingDriver::new();

        let click = ToolCall::new("browser_click", serde_json::json!({"ref": "e3"}));
        let fill = ToolCall::new(
            "browser_fill",
            serde_json::json!({"ref": "@e4", "text": "rust"}),
        );

        assert!(registry.execute(&click, &driver).await.unwrap().success);
        assert!(registry.execute(&fill, &driver).await.unwrap().success);
        assert_eq!(driver.calls(), vec!["click @e3", "fill @e4 rust"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failed_result() {
        let registry = ToolRegistry::new();
        let driver = RecordingDriver::new();

        let call = ToolCall::new("write_code", serde_json::json!({}));
        let result = registry.execute(&call, &driver).await.unwrap();
        assert!(!result.success);
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_argument_is_failed_result() {
        let registry = ToolRegistry::new();
        let driver = RecordingDriver::new();

        let call = ToolCall::new("browser_url", serde_json::json!({}));
        let result = registry.execute(&call, &driver).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("url"));
    }

    #[tokio::test]
    async fn test_browser_error_propagates() {
        let registry = ToolRegistry::new();
        let driver = RecordingDriver::new().failing_on("press");

        let call = ToolCall::new("browser_press", serde_json::json!({"key": "Enter"}));
        assert!(registry.execute(&call, &driver).await.is_err());
    }
}
