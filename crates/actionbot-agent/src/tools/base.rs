//! Tool trait — the interface every agent tool implements.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use actionbot_core::types::{ToolDefinition, ToolResult};
use actionbot_core::ToolError;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
///
/// The runner discovers tools via `name()`, sends their schemas to the LLM
/// via `to_definition()`, and dispatches calls via `execute()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used by the LLM to call this tool (e.g. `"create_subagent"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    ///
    /// Expected failures (bad input, API errors) come back as an error
    /// `ToolResult`. An `Err` is reserved for malformed arguments; the
    /// registry converts it into an error `ToolResult` too.
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolResult>;

    /// Build the `ToolDefinition` sent to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Read the `action` param. Absent or `null` is `None`; any other
/// non-string value keeps its JSON text, so it never names a real action.
pub fn action_param(params: &HashMap<String, Value>) -> Option<String> {
    match params.get("action")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract an optional `String` param. `null` counts as absent.
pub fn optional_string(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Extract an optional integer param.
pub fn optional_i64(params: &HashMap<String, Value>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

/// Extract optional free text that is forwarded verbatim.
///
/// Numbers and booleans are stringified and an array of strings is joined
/// with commas. Objects and mixed arrays are rejected rather than dropped.
pub fn optional_text(params: &HashMap<String, Value>, key: &str) -> Result<Option<String>, ToolError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str())
            .collect::<Option<Vec<_>>>()
            .map(|parts| Some(parts.join(",")))
            .ok_or_else(|| ToolError::Validation(format!("Parameter '{key}' must be a string"))),
        Some(Value::Object(_)) => Err(ToolError::Validation(format!(
            "Parameter '{key}' must be a string"
        ))),
    }
}

/// Extract an optional integer, also taking integral floats (`4096.0`)
/// and numeric strings (`"4096"`).
pub fn optional_integer(params: &HashMap<String, Value>, key: &str) -> Result<Option<i64>, ToolError> {
    let invalid = |v: &Value| ToolError::Validation(format!("Parameter '{key}' must be an integer (got {v})"));
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(i)),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
            _ => Err(invalid(v)),
        },
        Some(v @ Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

/// Extract an optional boolean param, falling back to `default`.
pub fn bool_or(params: &HashMap<String, Value>, key: &str, default: bool) -> bool {
    params.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Extract an identifier that may arrive as a string or a number
/// (LLMs send run ids both ways).
pub fn optional_id(params: &HashMap<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract an optional `{name: string | null}` object.
///
/// Values that are neither strings nor `null` are rejected.
pub fn optional_string_map(
    params: &HashMap<String, Value>,
    key: &str,
) -> anyhow::Result<Option<BTreeMap<String, Option<String>>>> {
    let obj = match params.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(obj)) => obj,
        Some(_) => anyhow::bail!("Parameter '{key}' must be an object"),
    };

    let mut out = BTreeMap::new();
    for (name, value) in obj {
        let entry = match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            _ => anyhow::bail!("Parameter '{key}.{name}' must be a string or null"),
        };
        out.insert(name.clone(), entry);
    }
    Ok(Some(out))
}
