//! Helpers shared by the financial tools.
//!
//! Argument extraction, provider record access and the number formats used
//! in tool output.

use rmcp::model::JsonObject;
use serde_json::Value;

use crate::core::upstream::UpstreamError;
use crate::domains::tools::error::ToolError;

/// Text shown for a value the provider did not return.
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Arguments
// ============================================================================

/// The `symbol` argument, trimmed and upper-cased.
pub fn symbol_arg(arguments: &JsonObject) -> Result<String, ToolError> {
    arguments
        .get("symbol")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::invalid_argument("symbol", "is required"))
}

/// An optional string argument.
pub fn str_arg<'a>(arguments: &'a JsonObject, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

/// An optional numeric argument.
pub fn f64_arg(arguments: &JsonObject, key: &str) -> Option<f64> {
    arguments.get(key).and_then(Value::as_f64)
}

/// An optional integer argument; integral floats are accepted.
pub fn u64_arg(arguments: &JsonObject, key: &str) -> Option<u64> {
    let value = arguments.get(key)?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 0.0 && n.fract() == 0.0).map(|n| n as u64))
}

// ============================================================================
// Provider records
// ============================================================================

/// The first record of a provider response.
///
/// An empty array or object means the provider has nothing for `symbol`.
pub fn first_record(body: Value, symbol: &str) -> Result<JsonObject, ToolError> {
    match body {
        Value::Array(items) => match items.into_iter().next() {
            None => Err(ToolError::SymbolNotFound(symbol.to_string())),
            Some(Value::Object(record)) => Ok(record),
            Some(other) => Err(unexpected_shape("object", &other)),
        },
        Value::Object(record) if record.is_empty() => {
            Err(ToolError::SymbolNotFound(symbol.to_string()))
        }
        Value::Object(record) => Ok(record),
        other => Err(unexpected_shape("array", &other)),
    }
}

/// Like [`first_record`], but an empty response yields an empty record.
///
/// Used for supplementary statements whose absence only degrades a result.
pub fn first_record_or_empty(body: Value, symbol: &str) -> Result<JsonObject, ToolError> {
    match first_record(body, symbol) {
        Err(ToolError::SymbolNotFound(_)) => Ok(JsonObject::new()),
        other => other,
    }
}

/// All object records of an array response, skipping anything else.
pub fn records(body: Value) -> Result<Vec<JsonObject>, ToolError> {
    match body {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect()),
        other => Err(unexpected_shape("array", &other)),
    }
}

fn unexpected_shape(expected: &str, got: &Value) -> ToolError {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ToolError::Upstream(UpstreamError::malformed(format!(
        "expected {expected}, got {got}"
    )))
}

/// A numeric field, if present.
pub fn num(record: &JsonObject, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

/// A string field, if present.
pub fn str_field<'a>(record: &'a JsonObject, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// A field rendered as plain text, `N/A` when absent.
pub fn text(record: &JsonObject, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numeric fields that were absent and counted as zero.
#[derive(Debug, Default)]
pub struct MissingFields {
    fields: Vec<String>,
}

impl MissingFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key` from `record`, recording `source.key` and returning 0 if absent.
    pub fn take(&mut self, record: &JsonObject, source: &str, key: &str) -> f64 {
        num(record, key).unwrap_or_else(|| {
            self.fields.push(format!("{source}.{key}"));
            0.0
        })
    }

    /// Footer appended to partial results.
    pub fn note(&self) -> Option<String> {
        if self.fields.is_empty() {
            None
        } else {
            Some(format!(
                "Note: missing provider fields treated as 0: {}",
                self.fields.join(", ")
            ))
        }
    }
}

/// Ratio with a floor on the denominator, so empty statements never divide by zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator.max(1.0)
}

// ============================================================================
// Formatting
// ============================================================================

/// `$1,234.57`.
pub fn money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc();
    format!("{sign}${}.{:02}", group_thousands(whole), (cents - whole * 100.0) as u64)
}

/// `$1,234` (no decimals).
pub fn money_whole(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(value.abs().round()))
}

/// `1,234,567`.
pub fn count(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(value.abs().round()))
}

/// `$12.3B`.
pub fn billions(value: f64) -> String {
    format!("${:.1}B", value / 1e9)
}

/// A fraction as a percentage: `0.1234` becomes `12.34%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Two-decimal plain number.
pub fn fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// Apply `f` to a present value, `N/A` otherwise.
pub fn or_na(value: Option<f64>, f: impl FnOnce(f64) -> String) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), f)
}

/// Digits of a non-negative whole number with `,` every three places.
fn group_thousands(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// Valuation
// ============================================================================

/// Recommendation derived from upside against the current price.
///
/// Bands: above 20% Strong Buy, above 10% Buy, from -10% to 10% Hold,
/// below -10% Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Recommendation {
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl Recommendation {
    pub fn from_upside(upside_pct: f64) -> Self {
        if upside_pct > 20.0 {
            Self::StrongBuy
        } else if upside_pct > 10.0 {
            Self::Buy
        } else if upside_pct >= -10.0 {
            Self::Hold
        } else {
            Self::Sell
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        }
    }

    /// Valuation band shown next to an upside figure.
    pub fn valuation(self) -> &'static str {
        match self {
            Self::StrongBuy | Self::Buy => "Undervalued",
            Self::Hold => "Fair Value",
            Self::Sell => "Overvalued",
        }
    }
}

/// Percentage difference of `value` over `price`, or `None` without a price.
pub fn upside_pct(value: f64, price: f64) -> Option<f64> {
    (price > 0.0).then(|| (value - price) * 100.0 / price)
}
