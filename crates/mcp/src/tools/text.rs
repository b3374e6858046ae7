// String manipulation tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Tool that reverses a string by characters
pub struct ReverseStringTool;

#[derive(Debug, Deserialize)]
struct ReverseStringArgs {
    text: String,
}

#[async_trait::async_trait]
impl Tool for ReverseStringTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "reverse_string".to_string(),
            description: "Reverse the characters of a string".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "text": json_schema_string("The text to reverse")
                }),
                vec!["text"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ReverseStringArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for reverse_string")?;

        Ok(CallToolResult::text(args.text.chars().rev().collect::<String>()))
    }
}
