//! Schema-driven argument validation.
//!
//! Supports the subset of JSON Schema the tool schemas use: `type`,
//! `required`, `enum`, `minimum`/`maximum`, `minLength`/`maxLength`,
//! `format: "date"`, `additionalProperties: false` and nested object
//! `properties`. Errors name the offending field with a dotted path.

use chrono::NaiveDate;
use rmcp::model::JsonObject;
use serde_json::Value;

use super::error::ToolError;
use crate::core::schema::ToolSchema;

/// Date layout accepted for `format: "date"`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check `arguments` against the tool's input schema.
pub fn validate_arguments(schema: &ToolSchema, arguments: &JsonObject) -> Result<(), ToolError> {
    validate_object("", &schema.document(), arguments)
}

fn validate_object(path: &str, schema: &JsonObject, value: &JsonObject) -> Result<(), ToolError> {
    let empty = JsonObject::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if value.get(name).is_none_or(Value::is_null) {
                return Err(ToolError::invalid_argument(
                    field_path(path, name),
                    "is required",
                ));
            }
        }
    }

    let closed = matches!(schema.get("additionalProperties"), Some(Value::Bool(false)));

    for (name, arg) in value {
        let field = field_path(path, name);
        match properties.get(name).and_then(Value::as_object) {
            Some(prop) => {
                // Optional arguments may be sent as explicit nulls.
                if arg.is_null() && prop.get("type").and_then(Value::as_str) != Some("null") {
                    continue;
                }
                validate_value(&field, prop, arg)?;
            }
            None if closed => {
                return Err(ToolError::invalid_argument(field, "is not a recognized argument"));
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_value(field: &str, prop: &JsonObject, value: &Value) -> Result<(), ToolError> {
    if let Some(expected) = prop.get("type").and_then(Value::as_str) {
        if !matches_type(expected, value) {
            return Err(ToolError::invalid_argument(
                field,
                format!("expected {expected}, got {}", type_name(value)),
            ));
        }
    }

    if let Some(allowed) = prop.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            let choices: Vec<String> = allowed
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect();
            return Err(ToolError::invalid_argument(
                field,
                format!("must be one of: {}", choices.join(", ")),
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = prop.get("minimum").and_then(Value::as_f64) {
            if number < min {
                return Err(ToolError::invalid_argument(
                    field,
                    format!("must be >= {}", display_bound(min)),
                ));
            }
        }
        if let Some(max) = prop.get("maximum").and_then(Value::as_f64) {
            if number > max {
                return Err(ToolError::invalid_argument(
                    field,
                    format!("must be <= {}", display_bound(max)),
                ));
            }
        }
    }

    if let Some(text) = value.as_str() {
        let len = text.chars().count() as u64;
        if let Some(min) = prop.get("minLength").and_then(Value::as_u64) {
            if len < min {
                return Err(ToolError::invalid_argument(
                    field,
                    format!("must be at least {min} characters"),
                ));
            }
        }
        if let Some(max) = prop.get("maxLength").and_then(Value::as_u64) {
            if len > max {
                return Err(ToolError::invalid_argument(
                    field,
                    format!("must be at most {max} characters"),
                ));
            }
        }
        if prop.get("format").and_then(Value::as_str) == Some("date")
            && NaiveDate::parse_from_str(text, DATE_FORMAT).is_err()
        {
            return Err(ToolError::invalid_argument(
                field,
                format!("'{text}' is not a valid date (expected YYYY-MM-DD)"),
            ));
        }
    }

    if let (Some(nested), true) = (value.as_object(), prop.contains_key("properties")) {
        validate_object(field, prop, nested)?;
    }

    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
        }
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn display_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
