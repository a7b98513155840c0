use serde_json::{Map, Value};

use super::{LinkRecord, ParseError, sectioned, structured};
use crate::github::GitHubIssue;

/// A body format, with a cheap test for whether it claims a body and the parse proper.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
	/// First fenced ` ```json ` block
	StructuredBlock,
	/// `###` headed issue-form sections
	SectionedText,
}

impl Strategy {
	/// Order in which strategies are offered a body.
	pub const PRIORITY: [Strategy; 2] = [Strategy::StructuredBlock, Strategy::SectionedText];

	pub fn applies_to(self, body: &str) -> bool {
		match self {
			Strategy::StructuredBlock => structured::applies_to(body),
			Strategy::SectionedText => sectioned::applies_to(body),
		}
	}

	/// Fields found in `body`. Sectioned text reads any body, so only the JSON block can fail.
	pub fn extract(self, body: &str) -> Result<Map<String, Value>, ParseError> {
		match self {
			Strategy::StructuredBlock => structured::extract(body),
			Strategy::SectionedText => Ok(sectioned::extract(body)),
		}
	}

	/// Parse `issue` into a record, logging and swallowing any failure.
	pub fn parse(self, issue: &GitHubIssue) -> Option<LinkRecord> {
		match self.extract(issue.body()) {
			Ok(fields) => {
				tracing::debug!(issue = issue.number, strategy = ?self, "parsed issue");
				Some(LinkRecord::parsed(fields, issue.clone()))
			}
			Err(e) => {
				tracing::error!(issue = issue.number, strategy = ?self, "Failed to parse issue #{}: {e}", issue.number);
				None
			}
		}
	}
}

/// Turn one issue into a record.
///
/// The first strategy whose [`Strategy::applies_to`] accepts the body decides the outcome.
/// If its parse then fails, later strategies are not consulted for that issue: a body with a
/// broken JSON block and valid form sections still comes out unparsed.
pub fn parse_issue(issue: &GitHubIssue) -> LinkRecord {
	let body = issue.body();

	if let Some(strategy) = Strategy::PRIORITY.into_iter().find(|s| s.applies_to(body))
		&& let Some(record) = strategy.parse(issue)
	{
		return record;
	}

	tracing::warn!(issue = issue.number, "Could not parse issue #{}", issue.number);
	LinkRecord::unparsed(issue.clone())
}
