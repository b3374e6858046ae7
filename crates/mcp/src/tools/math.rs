// Arithmetic tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_enum, json_schema_number, json_schema_object, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operation {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Power => "^",
            Self::Modulo => "mod",
        }
    }

    /// Apply the operation, failing on division or modulo by zero
    pub fn apply(self, a: f64, b: f64) -> Result<f64, String> {
        let value = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide if b == 0.0 => return Err("Division by zero".to_string()),
            Self::Divide => a / b,
            Self::Modulo if b == 0.0 => return Err("Modulo by zero".to_string()),
            Self::Modulo => a % b,
            Self::Power => a.powf(b),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err("Result is not a finite number".to_string())
        }
    }
}

/// Tool that performs basic arithmetic on two numbers
pub struct CalculateTool;

#[derive(Debug, Deserialize)]
struct CalculateArgs {
    operation: Operation,
    a: f64,
    b: f64,
}

#[async_trait::async_trait]
impl Tool for CalculateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculate".to_string(),
            description: "Perform an arithmetic operation on two numbers".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "operation": json_schema_enum(
                        &["add", "subtract", "multiply", "divide", "power", "modulo"],
                        "Operation to perform"
                    ),
                    "a": json_schema_number("First operand"),
                    "b": json_schema_number("Second operand")
                }),
                vec!["operation", "a", "b"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CalculateArgs =
            serde_json::from_value(arguments).context("Invalid arguments for calculate")?;

        Ok(match args.operation.apply(args.a, args.b) {
            Ok(value) => CallToolResult::text(format!(
                "{} {} {} = {}",
                args.a,
                args.operation.symbol(),
                args.b,
                value
            )),
            Err(message) => CallToolResult::error(message),
        })
    }
}
