//! Mock GitHub client for testing purposes.
//!
//! Stores issues and labels in memory, in insertion order, and serves them through the
//! [`GitHubClient`] trait so the whole pipeline can run without hitting the real API.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
	config::SortOrder,
	github::{GitHubClient, GitHubIssue, GitHubLabel, IssueState},
};

/// Key for looking up issues/labels by owner/repo
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct RepoKey {
	owner: String,
	repo: String,
}

impl RepoKey {
	fn new(owner: &str, repo: &str) -> Self {
		Self {
			owner: owner.to_string(),
			repo: repo.to_string(),
		}
	}
}

#[derive(Default)]
struct MockRepo {
	issues: Vec<GitHubIssue>,
	labels: Vec<GitHubLabel>,
	fail_labels: bool,
}

/// Mock GitHub client that stores all state in memory.
/// Unknown repositories answer like a 404 from the API.
#[derive(Default)]
pub struct MockGitHubClient {
	repos: Mutex<HashMap<RepoKey, MockRepo>>,

	/// Call log for debugging
	call_log: Mutex<Vec<String>>,
}

impl MockGitHubClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an issue; issues are served in the order they were added.
	pub fn add_issue(&self, owner: &str, repo: &str, number: u64, body: &str, state: IssueState, labels: Vec<&str>) {
		let mut extra = Map::new();
		extra.insert("title".to_string(), Value::String(format!("Issue #{number}")));
		extra.insert("html_url".to_string(), Value::String(format!("https://github.com/{owner}/{repo}/issues/{number}")));

		let issue = GitHubIssue {
			number,
			body: if body.is_empty() { None } else { Some(body.to_string()) },
			state,
			labels: labels.into_iter().map(GitHubLabel::new).collect(),
			extra,
		};

		let mut repos = self.repos.lock().unwrap();
		let entry = repos.entry(RepoKey::new(owner, repo)).or_default();
		for label in &issue.labels {
			if !entry.labels.iter().any(|l| l.name == label.name) {
				entry.labels.push(label.clone());
			}
		}
		entry.issues.push(issue);
	}

	/// Register a repository label without attaching it to any issue.
	pub fn add_label(&self, owner: &str, repo: &str, name: &str) {
		let mut repos = self.repos.lock().unwrap();
		repos.entry(RepoKey::new(owner, repo)).or_default().labels.push(GitHubLabel::new(name));
	}

	/// Make `fetch_labels` fail for this repository while issues still load.
	pub fn fail_labels(&self, owner: &str, repo: &str) {
		let mut repos = self.repos.lock().unwrap();
		repos.entry(RepoKey::new(owner, repo)).or_default().fail_labels = true;
	}

	/// Get the call log
	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	fn log_call(&self, call: &str) {
		self.call_log.lock().unwrap().push(call.to_string());
	}
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::fetch_issues")]
	async fn fetch_issues(&self, owner: &str, repo: &str, sort: SortOrder) -> Result<Vec<GitHubIssue>> {
		tracing::info!(target: "mock_github", owner, repo, "fetch_issues");
		self.log_call(&format!("fetch_issues({owner}, {repo}, {sort:?})"));

		let repos = self.repos.lock().unwrap();
		let mock_repo = repos.get(&RepoKey::new(owner, repo)).ok_or_else(|| eyre!("Repository not found: {}/{}", owner, repo))?;
		Ok(mock_repo.issues.clone())
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_labels")]
	async fn fetch_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
		tracing::info!(target: "mock_github", owner, repo, "fetch_labels");
		self.log_call(&format!("fetch_labels({owner}, {repo})"));

		let repos = self.repos.lock().unwrap();
		let mock_repo = repos.get(&RepoKey::new(owner, repo)).ok_or_else(|| eyre!("Repository not found: {}/{}", owner, repo))?;
		if mock_repo.fail_labels {
			return Err(eyre!("Failed to get labels from {owner}/{repo}: 500 Internal Server Error"));
		}
		Ok(mock_repo.labels.clone())
	}
}
