// Current time formatting tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_enum, json_schema_object, Tool};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    Iso,
    Unix,
    Human,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    Utc,
    Local,
}

/// Render `instant` in the requested format
pub fn format_time<Tz>(instant: &DateTime<Tz>, format: TimeFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimeFormat::Iso => instant.to_rfc3339(),
        TimeFormat::Unix => instant.timestamp().to_string(),
        TimeFormat::Human => instant.format("%A, %B %-d, %Y at %H:%M:%S %Z").to_string(),
        TimeFormat::Date => instant.format("%Y-%m-%d").to_string(),
        TimeFormat::Time => instant.format("%H:%M:%S").to_string(),
    }
}

/// Tool that reports the current time
pub struct CurrentTimeTool;

#[derive(Debug, Deserialize)]
struct CurrentTimeArgs {
    #[serde(default)]
    format: TimeFormat,
    #[serde(default)]
    timezone: Zone,
}

#[async_trait::async_trait]
impl Tool for CurrentTimeTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_current_time".to_string(),
            description: "Get the current date and time in a chosen format".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "format": json_schema_enum(
                        &["iso", "unix", "human", "date", "time"],
                        "Output format (default: iso)"
                    ),
                    "timezone": json_schema_enum(&["utc", "local"], "Time zone (default: utc)")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CurrentTimeArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_current_time")?;

        let text = match args.timezone {
            Zone::Utc => format_time(&Utc::now(), args.format),
            Zone::Local => format_time(&Local::now(), args.format),
        };
        Ok(CallToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_formats() {
        let t = fixed();
        assert_eq!(format_time(&t, TimeFormat::Iso), "2024-03-09T14:05:07+00:00");
        assert_eq!(format_time(&t, TimeFormat::Unix), "1709993107");
        assert_eq!(format_time(&t, TimeFormat::Date), "2024-03-09");
        assert_eq!(format_time(&t, TimeFormat::Time), "14:05:07");
        assert_eq!(
            format_time(&t, TimeFormat::Human),
            "Saturday, March 9, 2024 at 14:05:07 UTC"
        );
    }

    #[tokio::test]
    async fn test_execute_defaults_to_iso() {
        let result = CurrentTimeTool.execute(serde_json::json!({})).await.unwrap();
        let text = result.text_content();
        assert!(DateTime::parse_from_rfc3339(&text).is_ok(), "{text}");
    }

    #[tokio::test]
    async fn test_execute_unix() {
        let result = CurrentTimeTool
            .execute(serde_json::json!({ "format": "unix", "timezone": "local" }))
            .await
            .unwrap();
        assert!(result.text_content().parse::<i64>().is_ok());
    }
}
