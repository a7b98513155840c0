//! The record written out for every issue.

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

use crate::{
	enrich::{FeedEntry, LinkStatus},
	github::{GitHubIssue, IssueState},
};

/// Field names of the fixed record vocabulary.
pub mod fields {
	pub const TITLE: &str = "title";
	pub const URL: &str = "url";
	pub const AVATAR: &str = "avatar";
	pub const DESCRIPTION: &str = "description";
	pub const URL_FRIENDS: &str = "url-friends";
	pub const URL_FEED: &str = "url-feed";
	pub const STATUS: &str = "status";
	pub const RSS: &str = "rss";
	pub const RAW: &str = "raw";
}

/// One friendly link.
///
/// `fields` holds whatever the parser produced, in discovery order. Enrichment adds `status`
/// and `rss` on top; `raw` points back at the issue until [`LinkRecord::strip_raw`] drops it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkRecord {
	fields: Map<String, Value>,
	status: Option<LinkStatus>,
	rss: Option<Vec<FeedEntry>>,
	raw: Option<GitHubIssue>,
}

impl LinkRecord {
	/// A parsed record. A `raw` key among the parsed fields is dropped; the issue wins.
	pub fn parsed(mut fields: Map<String, Value>, issue: GitHubIssue) -> Self {
		fields.remove(fields::RAW);
		Self {
			fields,
			raw: Some(issue),
			..Default::default()
		}
	}

	/// Record for an issue no parser could read.
	pub fn unparsed(issue: GitHubIssue) -> Self {
		Self {
			raw: Some(issue),
			..Default::default()
		}
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}

	/// String value of `key`, if present, a string, and not empty.
	///
	/// Hooks key off this, so a non-string `url` (e.g. `"url": 123`) gets no `status` at all
	/// rather than being probed and tagged `404`.
	pub fn field_str(&self, key: &str) -> Option<&str> {
		self.fields.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
	}

	pub fn fields(&self) -> &Map<String, Value> {
		&self.fields
	}

	pub fn status(&self) -> Option<LinkStatus> {
		self.status
	}

	pub fn set_status(&mut self, status: LinkStatus) {
		self.status = Some(status);
	}

	pub fn rss(&self) -> Option<&[FeedEntry]> {
		self.rss.as_deref()
	}

	pub fn set_rss(&mut self, entries: Vec<FeedEntry>) {
		self.rss = Some(entries);
	}

	pub fn raw(&self) -> Option<&GitHubIssue> {
		self.raw.as_ref()
	}

	/// Drop the back-reference to the issue. No-op when already gone.
	pub fn strip_raw(&mut self) {
		self.raw = None;
	}

	pub fn issue_state(&self) -> Option<IssueState> {
		self.raw.as_ref().map(|issue| issue.state)
	}

	/// Whether the originating issue carries every label in `required`.
	/// Without an issue only an empty requirement is met.
	pub fn has_labels<S: AsRef<str>>(&self, required: &[S]) -> bool {
		match &self.raw {
			Some(issue) => required.iter().all(|want| issue.label_names().any(|have| have == want.as_ref())),
			None => required.is_empty(),
		}
	}
}

impl Serialize for LinkRecord {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		for (key, value) in &self.fields {
			let shadowed = (key == fields::STATUS && self.status.is_some()) || (key == fields::RSS && self.rss.is_some());
			if !shadowed {
				map.serialize_entry(key, value)?;
			}
		}
		if let Some(status) = &self.status {
			map.serialize_entry(fields::STATUS, status)?;
		}
		if let Some(rss) = &self.rss {
			map.serialize_entry(fields::RSS, rss)?;
		}
		if let Some(raw) = &self.raw {
			map.serialize_entry(fields::RAW, raw)?;
		}
		map.end()
	}
}
