// Random number generation tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;

const MAX_COUNT: i64 = 100;

/// Random bits carried by a v4 UUID once the version and variant bytes are skipped
const SAMPLE_BITS: u32 = 104;

fn random_sample() -> u128 {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    // bytes 6..9 hold the version nibble and variant bits
    bytes[..6]
        .iter()
        .chain(&bytes[9..])
        .fold(0u128, |acc, b| (acc << 8) | u128::from(*b))
}

/// Uniform integer in `[min, max]` using v4 UUID bits as the entropy source.
/// Rejection sampling keeps the distribution unbiased.
pub fn random_in_range(min: i64, max: i64) -> i64 {
    debug_assert!(min <= max);
    let span = (max as i128 - min as i128 + 1) as u128;
    let range = 1u128 << SAMPLE_BITS;
    let zone = range - (range % span);

    loop {
        let sample = random_sample();
        if sample < zone {
            return (min as i128 + (sample % span) as i128) as i64;
        }
    }
}

/// Tool that draws random integers from an inclusive range
pub struct RandomNumberTool;

#[derive(Debug, Deserialize)]
struct RandomNumberArgs {
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
    #[serde(default)]
    count: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for RandomNumberTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "random_number".to_string(),
            description: "Generate random integers within an inclusive range".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "min": json_schema_integer("Lower bound, inclusive (default: 0)", None, None),
                    "max": json_schema_integer("Upper bound, inclusive (default: 100)", None, None),
                    "count": json_schema_integer(
                        "How many numbers to generate (default: 1)",
                        Some(1),
                        Some(MAX_COUNT)
                    )
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: RandomNumberArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for random_number")?;

        let min = args.min.unwrap_or(0);
        let max = args.max.unwrap_or(100);
        let count = args.count.unwrap_or(1).clamp(1, MAX_COUNT);

        if min > max {
            return Ok(CallToolResult::error(format!(
                "min ({}) must not be greater than max ({})",
                min, max
            )));
        }

        let numbers: Vec<String> = (0..count)
            .map(|_| random_in_range(min, max).to_string())
            .collect();

        Ok(CallToolResult::text(if count == 1 {
            format!("Random number between {} and {}: {}", min, max, numbers[0])
        } else {
            format!(
                "{} random numbers between {} and {}: {}",
                count,
                min,
                max,
                numbers.join(", ")
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_range_bounds() {
        for _ in 0..500 {
            let n = random_in_range(-3, 3);
            assert!((-3..=3).contains(&n));
        }
        assert_eq!(random_in_range(7, 7), 7);
    }

    #[test]
    fn test_full_i64_range() {
        let _ = random_in_range(i64::MIN, i64::MAX);
    }

    #[tokio::test]
    async fn test_execute_count() {
        let result = RandomNumberTool
            .execute(serde_json::json!({ "min": 1, "max": 6, "count": 5 }))
            .await
            .unwrap();
        let text = result.text_content();
        let values: Vec<i64> = text
            .rsplit(": ")
            .next()
            .unwrap()
            .split(", ")
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| (1..=6).contains(v)));
    }

    #[tokio::test]
    async fn test_inverted_range() {
        let result = RandomNumberTool
            .execute(serde_json::json!({ "min": 10, "max": 1 }))
            .await
            .unwrap();
        assert!(result.is_error());
    }
}
