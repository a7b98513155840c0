//! Fenced ` ```json ` block format.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::ParseError;

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```json([\s\S]+?)```").expect("static regex"));

pub(super) fn applies_to(body: &str) -> bool {
	JSON_BLOCK.is_match(body)
}

/// Decode the first JSON block. Keys pass through as written; no vocabulary is imposed.
pub(super) fn extract(body: &str) -> Result<Map<String, Value>, ParseError> {
	let block = JSON_BLOCK.captures(body).and_then(|caps| caps.get(1)).ok_or(ParseError::NoBlock)?;

	let text = block.as_str().trim();
	if text.is_empty() {
		return Err(ParseError::EmptyBlock);
	}

	match serde_json::from_str::<Value>(text)? {
		Value::Object(fields) => Ok(fields),
		other => Err(ParseError::NotAnObject { found: json_kind(&other) }),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
