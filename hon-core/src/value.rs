//! Parameter values
//!
//! The appliance API mixes numbers and strings freely: the same range value
//! may arrive as `"40"`, `40`, `40.0` or `"40,0"`. Everything that crosses
//! the model boundary goes through [`ParamValue`] and the helpers here, so
//! comparisons (trigger tokens, rule conditions) and wire formatting behave
//! the same everywhere.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Tolerance used for float comparisons on ranges and tokens
pub const FLOAT_TOLERANCE: f64 = 1e-6;

/// A parameter value, either numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Convert a JSON value, `null` has no parameter value
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(ParamValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(ParamValue::Number),
            Value::Bool(b) => Some(ParamValue::Text(if *b { "1" } else { "0" }.to_string())),
            other => Some(ParamValue::Text(other.to_string())),
        }
    }

    /// Numeric interpretation, accepting `,` as decimal separator
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) if n.is_finite() => Some(*n),
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => parse_number(s),
        }
    }

    /// Lowercased, normalized form used to match trigger values
    pub fn token(&self) -> String {
        clean_token(&self.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", format_number(*n)),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Text(s.clone())
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Number(n as f64)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n as f64)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Number(n as f64)
    }
}

/// Parse a number the way the vendor writes them: `"40"`, `"0.5"`, `"0,5"`
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .or_else(|| s.replace(',', ".").parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Format a number for the wire: whole numbers have no decimal point
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Normalize an enum token: strip surrounding brackets, `|` becomes `_`, lowercase
///
/// `"[COTTONS|ECO]"` -> `"cottons_eco"`
pub fn clean_token(s: &str) -> String {
    s.trim_matches(|c| c == '[' || c == ']')
        .replace('|', "_")
        .to_lowercase()
}

/// Compare two value tokens the way triggers and rule conditions do:
/// numerically when both sides are numbers, otherwise as normalized tokens.
pub fn tokens_match(a: &str, b: &str) -> bool {
    if let (Some(x), Some(y)) = (parse_number(a), parse_number(b)) {
        return (x - y).abs() < FLOAT_TOLERANCE;
    }
    clean_token(a) == clean_token(b)
}

/// Read a schema field that may be encoded as a string or a number
pub fn number_field(schema: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    match schema.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Read a scalar schema field as text; objects and arrays keep their JSON form
pub fn text_field(schema: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    schema.get(key).and_then(scalar_text)
}

/// Text form of a JSON scalar, `null` has none
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) => format_number(f),
            None => n.to_string(),
        }),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        other => Some(other.to_string()),
    }
}
