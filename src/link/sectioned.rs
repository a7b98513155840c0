//! `###` headed issue-form format.
//!
//! The issue form renders each answer as `### <heading>`, a blank line, then the answer.
//! Headings are the localized labels of the form, mapped back to field names here.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::fields;

pub const HEADING_MARKER: &str = "###";

/// What the tracker writes for an optional form field left blank.
pub const NO_RESPONSE: &str = "_No response_";

/// Record field → form heading.
pub const FIELD_HEADINGS: [(&str, &str); 6] = [
	(fields::TITLE, "博客名称"),
	(fields::URL, "博客地址"),
	(fields::AVATAR, "博客图标"),
	(fields::DESCRIPTION, "博客描述"),
	(fields::URL_FRIENDS, "友链地址"),
	(fields::URL_FEED, "订阅地址"),
];

pub(super) fn applies_to(body: &str) -> bool {
	body.contains(HEADING_MARKER)
}

/// Always yields all six fields; missing or unanswered ones are empty strings.
pub(super) fn extract(body: &str) -> Map<String, Value> {
	let sections = sections(body);

	FIELD_HEADINGS
		.iter()
		.map(|(field, heading)| {
			let value = sections.get(*heading).map(String::as_str).unwrap_or_default();
			let value = if value == NO_RESPONSE { "" } else { value };
			(field.to_string(), Value::String(value.to_string()))
		})
		.collect()
}

/// Heading → answer. A later section with the same heading replaces an earlier one.
fn sections(body: &str) -> HashMap<String, String> {
	let mut out = HashMap::new();

	for section in body.trim().split(HEADING_MARKER) {
		if section.trim().is_empty() {
			continue;
		}
		let section = section.replace("\r\n", "\n");
		// no blank line means no answer
		let Some((heading, value)) = section.split_once("\n\n") else {
			continue;
		};
		out.insert(heading.trim().to_string(), value.trim().to_string());
	}

	out
}
