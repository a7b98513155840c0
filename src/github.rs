use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, bail};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::SortOrder;

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("friendly-links/", env!("CARGO_PKG_VERSION"), " (reqwest)");
const PER_PAGE: usize = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
	Open,
	Closed,
}

/// An issue as delivered by the API.
///
/// Only the fields the pipeline reads are typed; everything else is kept in `extra` so the
/// issue can be written back out verbatim under `raw`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GitHubIssue {
	pub number: u64,
	pub body: Option<String>,
	pub state: IssueState,
	#[serde(default)]
	pub labels: Vec<GitHubLabel>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GitHubIssue {
	/// Free-text body; a null body reads as empty.
	pub fn body(&self) -> &str {
		self.body.as_deref().unwrap_or_default()
	}

	pub fn label_names(&self) -> impl Iterator<Item = &str> {
		self.labels.iter().map(|label| label.name.as_str())
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GitHubLabel {
	pub name: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GitHubLabel {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), extra: Map::new() }
	}
}

//==============================================================================
// GitHub Client Trait
//==============================================================================

/// Issue source. Every run reads the whole repository; there is no incremental mode.
#[async_trait]
pub trait GitHubClient: Send + Sync {
	/// Fetch every issue (open and closed) in the order the API delivers them for `sort`.
	async fn fetch_issues(&self, owner: &str, repo: &str, sort: SortOrder) -> Result<Vec<GitHubIssue>>;

	/// Fetch the labels defined on the repository
	async fn fetch_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>>;
}

//==============================================================================
// Real GitHub Client Implementation
//==============================================================================

/// Real GitHub API client that makes HTTP requests
pub struct RealGitHubClient {
	http_client: Client,
	github_token: Option<String>,
}

fn issues_page_url(owner: &str, repo: &str, sort: SortOrder, page: usize) -> Result<Url> {
	let (sort, direction) = sort.api_params();
	let per_page = PER_PAGE.to_string();
	let page = page.to_string();
	let mut params = vec![("state", "all"), ("sort", sort)];
	if let Some(direction) = direction {
		params.push(("direction", direction));
	}
	params.extend([("per_page", per_page.as_str()), ("page", page.as_str())]);
	Ok(Url::parse_with_params(&format!("{API_BASE}/repos/{owner}/{repo}/issues"), &params)?)
}

impl RealGitHubClient {
	/// Anonymous unless `GITHUB_TOKEN` is set.
	pub fn new() -> Result<Self> {
		let http_client = Client::builder().timeout(Duration::from_secs(10)).build().wrap_err("Failed to build HTTP client")?;
		let github_token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());
		if github_token.is_none() {
			tracing::debug!("GITHUB_TOKEN not set, using unauthenticated requests");
		}
		Ok(Self { http_client, github_token })
	}

	fn get(&self, url: Url) -> reqwest::RequestBuilder {
		let req = self
			.http_client
			.get(url)
			.header("User-Agent", USER_AGENT)
			.header("Accept", "application/vnd.github+json");
		match &self.github_token {
			Some(token) => req.header("Authorization", format!("Bearer {token}")),
			None => req,
		}
	}

	async fn fetch_issues_page(&self, owner: &str, repo: &str, sort: SortOrder, page: usize) -> Result<Vec<GitHubIssue>> {
		let api_url = issues_page_url(owner, repo, sort, page)?;

		let res = self.get(api_url).send().await.wrap_err_with(|| format!("Failed to get issues page {page} from {owner}/{repo}"))?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to get issues page {page} from {owner}/{repo}: {status} - {body}");
		}

		let issues = res.json::<Vec<GitHubIssue>>().await?;
		tracing::debug!(page, count = issues.len(), "retrieved issues page");
		Ok(issues)
	}
}

#[async_trait]
impl GitHubClient for RealGitHubClient {
	async fn fetch_issues(&self, owner: &str, repo: &str, sort: SortOrder) -> Result<Vec<GitHubIssue>> {
		let mut all_issues = Vec::new();
		let mut page = 1;

		loop {
			let issues = self.fetch_issues_page(owner, repo, sort, page).await?;
			let last_page = issues.len() < PER_PAGE;
			all_issues.extend(issues);
			if last_page {
				break;
			}
			page += 1;
		}

		tracing::info!("Retrieved {} issues from {owner}/{repo}", all_issues.len());
		Ok(all_issues)
	}

	async fn fetch_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
		let api_url = Url::parse_with_params(&format!("{API_BASE}/repos/{owner}/{repo}/labels"), &[("per_page", PER_PAGE.to_string())])?;

		let res = self.get(api_url).send().await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("Failed to get labels from {owner}/{repo}: {status} - {body}");
		}

		let labels = res.json::<Vec<GitHubLabel>>().await?;
		tracing::debug!("Retrieved {} labels from {owner}/{repo}", labels.len());
		Ok(labels)
	}
}

//==============================================================================
// Convenience type alias for boxed client
//==============================================================================

pub type BoxedGitHubClient = Arc<dyn GitHubClient>;

pub fn create_client() -> Result<BoxedGitHubClient> {
	Ok(Arc::new(RealGitHubClient::new()?))
}
