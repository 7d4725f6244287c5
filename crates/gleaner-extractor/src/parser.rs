//! Parse LLM output into an extraction result
//!
//! Accepted shapes:
//! - `{"tags": [...], "action_items": [...]}` where either key may be
//!   missing or `null`
//! - a bare array of strings, read as action items
//!
//! Anything else, including non-string array elements, is a parse error.
//! Nothing from the model reaches the caller without passing this module.

use crate::error::ExtractorError;
use crate::heuristic::strip_markers;
use gleaner_domain::ExtractionResult;
use serde_json::{Map, Value};

/// Parse an LLM JSON response into a cleaned, deduplicated result
pub fn parse_llm_response(response: &str) -> Result<ExtractionResult, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::Parse(format!("JSON parse error: {}", e)))?;

    let (tags, action_items) = match &json {
        Value::Object(obj) => (
            string_array(obj, "tags")?,
            string_array(obj, "action_items")?,
        ),
        Value::Array(items) => (Vec::new(), strings(items, "response")?),
        other => {
            return Err(ExtractorError::Parse(format!(
                "Expected JSON object or array, got {}",
                kind(other)
            )))
        }
    };

    let action_items = action_items.iter().map(|item| strip_markers(item));
    Ok(ExtractionResult::from_candidates(tags, action_items))
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(ExtractorError::Parse("Empty response".to_string()));
    }

    let Some(fenced) = trimmed.strip_prefix("```") else {
        return Ok(trimmed);
    };

    // Drop the info string (`json`, `JSON`, ...) on the opening fence line
    let body = match fenced.find('\n') {
        Some(newline) => &fenced[newline + 1..],
        None => return Err(ExtractorError::Parse("Empty code block".to_string())),
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body).trim();

    if body.is_empty() {
        return Err(ExtractorError::Parse("Empty code block".to_string()));
    }
    Ok(body)
}

fn string_array(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, ExtractorError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => strings(items, key),
        Some(other) => Err(ExtractorError::Parse(format!(
            "'{}' must be an array of strings, got {}",
            key,
            kind(other)
        ))),
    }
}

fn strings(items: &[Value], field: &str) -> Result<Vec<String>, ExtractorError> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(ExtractorError::Parse(format!(
                "'{}[{}]' must be a string, got {}",
                field,
                idx,
                kind(other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
