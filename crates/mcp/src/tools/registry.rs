// Tool trait, registry and schema helpers

use super::validate::validate_arguments;
use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with arguments that already passed schema validation
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any previous tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        tracing::debug!(tool = %schema.name, "Registered tool");
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate `arguments` against the tool's input schema, then execute it.
    ///
    /// Returns `None` when no tool is registered under `name`. Validation
    /// failures and handler errors come back as error tool results.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Option<CallToolResult> {
        let tool = self.get(name)?;
        let schema = tool.schema();

        if let Err(message) = validate_arguments(&schema.input_schema, &arguments) {
            tracing::debug!(tool = name, %message, "Rejected tool arguments");
            return Some(CallToolResult::error(format!(
                "Invalid arguments for {}: {}",
                name, message
            )));
        }

        let result = match tool.execute(arguments).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool execution failed");
                CallToolResult::error(format!("{:#}", e))
            }
        };
        Some(result)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_enum(values: &[&str], description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_integer(description: &str, minimum: Option<i64>, maximum: Option<i64>) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "integer",
        "description": description
    });
    if let Some(min) = minimum {
        schema["minimum"] = min.into();
    }
    if let Some(max) = maximum {
        schema["maximum"] = max.into();
    }
    schema
}

pub fn json_schema_boolean(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echo the message".to_string(),
                input_schema: json_schema_object(
                    serde_json::json!({ "message": json_schema_string("Text to echo") }),
                    vec!["message"],
                ),
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
            let message = arguments["message"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("message missing"))?;
            Ok(CallToolResult::text(message))
        }
    }

    #[tokio::test]
    async fn test_register_and_call() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let result = registry
            .call("echo", serde_json::json!({ "message": "hi" }))
            .await
            .unwrap();
        assert!(!result.is_error());
        assert_eq!(result.text_content(), "hi");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        assert!(registry.call("missing", serde_json::json!({})).await.is_none());
    }

    #[tokio::test]
    async fn test_validation_runs_before_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let result = registry.call("echo", serde_json::json!({})).await.unwrap();
        assert!(result.is_error());
        assert!(result.text_content().contains("message"));
    }

    #[test]
    fn test_integer_schema_bounds() {
        let schema = json_schema_integer("depth", Some(1), Some(10));
        assert_eq!(schema["minimum"], 1);
        assert_eq!(schema["maximum"], 10);
        assert!(json_schema_integer("n", None, None).get("minimum").is_none());
    }
}
