//! Shared test infrastructure for integration tests.
//!
//! Provides `TestContext`, which wires a `MockGitHubClient` and recording stand-ins for the
//! link and feed hooks into a `Generator`, plus a temp directory for output files.

use std::{
	path::PathBuf,
	sync::{Arc, Mutex},
};

use async_trait::async_trait;
use friendly_links::{
	FeedEntry, Generator, GroupedLinks, LinkStatus, Settings,
	enrich::{FeedSource, LinkProbe},
	mock_github::MockGitHubClient,
};
use rstest::fixture;
use tempfile::TempDir;

pub const OWNER: &str = "someone";
pub const REPO: &str = "friends";

/// Answers `404` for any URL containing "dead", `active` otherwise.
#[derive(Default)]
pub struct RecordingProbe {
	pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl LinkProbe for RecordingProbe {
	async fn probe(&self, url: &str) -> LinkStatus {
		self.calls.lock().unwrap().push(url.to_string());
		if url.contains("dead") { LinkStatus::NotFound } else { LinkStatus::Active }
	}
}

/// One entry per feed, titled after the feed URL. URLs containing "broken" yield nothing.
#[derive(Default)]
pub struct RecordingFeeds {
	pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl FeedSource for RecordingFeeds {
	async fn entries(&self, url: &str) -> Vec<FeedEntry> {
		self.calls.lock().unwrap().push(url.to_string());
		if url.contains("broken") {
			return Vec::new();
		}
		vec![FeedEntry {
			title: format!("latest from {url}"),
			link: format!("{url}/latest"),
			published: None,
			author: None,
			summary: None,
		}]
	}
}

pub struct TestContext {
	pub gh: Arc<MockGitHubClient>,
	pub probe: Arc<RecordingProbe>,
	pub feeds: Arc<RecordingFeeds>,
	pub out: TempDir,
}

impl TestContext {
	pub fn new() -> Self {
		Self {
			gh: Arc::new(MockGitHubClient::new()),
			probe: Arc::new(RecordingProbe::default()),
			feeds: Arc::new(RecordingFeeds::default()),
			out: tempfile::tempdir().unwrap(),
		}
	}

	/// Settings for the mock repository. `groups_yaml` is the body of the `groups:` key,
	/// e.g. `" []"` or a block list indented by four spaces.
	pub fn settings(&self, keep_raw: bool, groups_yaml: &str) -> Settings {
		let yaml = format!("issues:\n  repo: {OWNER}/{REPO}\n  keep_raw: {keep_raw}\n  groups:{groups_yaml}\n");
		Settings::from_yaml(&yaml).unwrap()
	}

	pub fn generator(&self, settings: Settings) -> Generator {
		Generator::new(settings, self.gh.clone(), self.probe.clone(), self.feeds.clone())
	}

	pub async fn run(&self, settings: Settings) -> GroupedLinks {
		self.generator(settings).process().await.unwrap()
	}

	pub fn output_dir(&self) -> PathBuf {
		self.out.path().join("json")
	}

	pub fn read_output(&self, group: &str) -> serde_json::Value {
		let text = std::fs::read_to_string(self.output_dir().join(format!("{group}.json"))).unwrap();
		serde_json::from_str(&text).unwrap()
	}
}

#[fixture]
pub fn ctx() -> TestContext {
	TestContext::new()
}

pub fn json_body(json: &str) -> String {
	format!("Please add my blog!\n\n```json\n{json}\n```\n")
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
	fields.iter().map(|(heading, value)| format!("### {heading}\n\n{value}\n\n")).collect()
}
