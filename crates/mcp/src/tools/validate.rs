// Minimal JSON-schema checks applied before a tool runs

use serde_json::Value;

/// Check `arguments` against an object schema built with the registry helpers.
///
/// Supports `required`, primitive `type`s, string `enum`s, integer
/// `minimum`/`maximum` and array `items`. Unknown properties are ignored.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> Result<(), String> {
    let Some(args) = arguments.as_object() else {
        return Err("arguments must be an object".to_string());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if args.get(name).map_or(true, Value::is_null) {
                return Err(format!("missing required field '{}'", name));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (name, value) in args {
        if value.is_null() {
            continue;
        }
        if let Some(property) = properties.get(name) {
            validate_value(name, property, value)?;
        }
    }

    Ok(())
}

fn validate_value(name: &str, schema: &Value, value: &Value) -> Result<(), String> {
    let expected = schema.get("type").and_then(Value::as_str).unwrap_or("any");

    let type_ok = match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    };
    if !type_ok {
        return Err(format!("field '{}' must be of type {}", name, expected));
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            let choices: Vec<_> = allowed.iter().filter_map(Value::as_str).collect();
            return Err(format!(
                "field '{}' must be one of: {}",
                name,
                choices.join(", ")
            ));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
            if n < min {
                return Err(format!("field '{}' must be >= {}", name, min));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
            if n > max {
                return Err(format!("field '{}' must be <= {}", name, max));
            }
        }
    }

    if let (Some(items), Some(elements)) = (schema.get("items"), value.as_array()) {
        for (i, element) in elements.iter().enumerate() {
            validate_value(&format!("{}[{}]", name, i), items, element)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string" },
                "depth": { "type": "integer", "minimum": 1, "maximum": 10 },
                "mode": { "type": "string", "enum": ["fast", "slow"] },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["path"]
        })
    }

    #[test]
    fn test_valid_arguments() {
        let args = json!({ "path": ".", "depth": 3, "mode": "fast", "tags": ["a"] });
        assert!(validate_arguments(&schema(), &args).is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = validate_arguments(&schema(), &json!({ "depth": 2 })).unwrap_err();
        assert!(err.contains("path"));
        assert!(validate_arguments(&schema(), &json!({ "path": null })).is_err());
    }

    #[test]
    fn test_type_mismatch() {
        assert!(validate_arguments(&schema(), &json!({ "path": 5 })).is_err());
        assert!(validate_arguments(&schema(), &json!({ "path": ".", "depth": 2.5 })).is_err());
        assert!(validate_arguments(&schema(), &json!({ "path": ".", "tags": [1] })).is_err());
    }

    #[test]
    fn test_bounds_and_enum() {
        assert!(validate_arguments(&schema(), &json!({ "path": ".", "depth": 0 })).is_err());
        assert!(validate_arguments(&schema(), &json!({ "path": ".", "depth": 11 })).is_err());
        let err = validate_arguments(&schema(), &json!({ "path": ".", "mode": "warp" })).unwrap_err();
        assert!(err.contains("fast, slow"));
    }

    #[test]
    fn test_non_object_arguments() {
        assert!(validate_arguments(&schema(), &json!([1, 2])).is_err());
    }
}
