//! Per-record enrichment: a liveness tag for the site and the latest entries of its feed.
//!
//! Both hooks are best-effort. They never fail a run; a failure degrades to `404` or to an
//! empty entry list.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use jiff::Timestamp;
use reqwest::{Client, redirect};
use serde::Serialize;
use smart_default::SmartDefault;

use crate::link::{LinkRecord, fields};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum LinkStatus {
	#[serde(rename = "active")]
	Active,
	/// Unreachable for any reason, not only an HTTP 404.
	#[serde(rename = "404")]
	NotFound,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedEntry {
	pub title: String,
	pub link: String,
	pub published: Option<Timestamp>,
	pub author: Option<String>,
	pub summary: Option<String>,
}

#[derive(Clone, Debug, SmartDefault)]
pub struct EnrichOptions {
	#[default(Duration::from_secs(5))]
	pub link_timeout: Duration,
	#[default(Duration::from_secs(10))]
	pub feed_timeout: Duration,
	#[default(10)]
	pub max_feed_entries: usize,
}

#[async_trait]
pub trait LinkProbe: Send + Sync {
	async fn probe(&self, url: &str) -> LinkStatus;
}

#[async_trait]
pub trait FeedSource: Send + Sync {
	/// Newest entries first. Empty on any failure.
	async fn entries(&self, url: &str) -> Vec<FeedEntry>;
}

/// Attach `status` to records with a `url` and `rss` to records with a `url-feed`.
/// Records are visited one at a time, in order.
pub async fn enrich(records: &mut [LinkRecord], probe: &dyn LinkProbe, feeds: &dyn FeedSource) {
	for record in records.iter_mut() {
		if let Some(url) = record.field_str(fields::URL).map(str::to_owned) {
			let status = probe.probe(&url).await;
			record.set_status(status);
		}

		if let Some(feed_url) = record.field_str(fields::URL_FEED).map(str::to_owned) {
			let entries = feeds.entries(&feed_url).await;
			record.set_rss(entries);
		}
	}
}

//==============================================================================
// HTTP implementations
//==============================================================================

/// `HEAD` request; any response at all counts as alive, the status code is not inspected.
/// Redirects are not followed: a `3xx` is itself a response.
pub struct HttpLinkProbe {
	http_client: Client,
}

impl HttpLinkProbe {
	pub fn new(options: &EnrichOptions) -> Result<Self> {
		let http_client = Client::builder()
			.timeout(options.link_timeout)
			.redirect(redirect::Policy::none())
			.build()
			.wrap_err("Failed to build HTTP client for link checks")?;
		Ok(Self { http_client })
	}
}

#[async_trait]
impl LinkProbe for HttpLinkProbe {
	async fn probe(&self, url: &str) -> LinkStatus {
		match self.http_client.head(url.trim()).send().await {
			Ok(res) => {
				tracing::debug!(url, status = %res.status(), "link reachable");
				LinkStatus::Active
			}
			Err(e) => {
				tracing::debug!(url, "link check failed: {e}");
				LinkStatus::NotFound
			}
		}
	}
}

pub struct HttpFeedSource {
	http_client: Client,
	max_entries: usize,
}

impl HttpFeedSource {
	pub fn new(options: &EnrichOptions) -> Result<Self> {
		let http_client = Client::builder()
			.timeout(options.feed_timeout)
			.user_agent(BROWSER_USER_AGENT)
			.build()
			.wrap_err("Failed to build HTTP client for feeds")?;
		Ok(Self {
			http_client,
			max_entries: options.max_feed_entries,
		})
	}

	async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
		let res = self.http_client.get(url.trim()).send().await?.error_for_status()?;
		let bytes = res.bytes().await?;
		let entries = parse_feed(&bytes, self.max_entries)?;
		Ok(entries)
	}
}

#[async_trait]
impl FeedSource for HttpFeedSource {
	async fn entries(&self, url: &str) -> Vec<FeedEntry> {
		match self.fetch(url).await {
			Ok(entries) => {
				tracing::debug!(url, count = entries.len(), "parsed feed");
				entries
			}
			Err(e) => {
				tracing::warn!(url, "Failed to parse RSS feed {url}: {e}");
				Vec::new()
			}
		}
	}
}

/// Parse an RSS, Atom or JSON Feed document into at most `max_entries` entries, newest first.
/// Entries without a date sort last, keeping their document order.
pub fn parse_feed(bytes: &[u8], max_entries: usize) -> Result<Vec<FeedEntry>, feed_rs::parser::ParseFeedError> {
	let feed = feed_rs::parser::parse(bytes)?;

	let mut entries: Vec<FeedEntry> = feed
		.entries
		.into_iter()
		.map(|entry| FeedEntry {
			title: entry.title.map(|t| t.content).unwrap_or_default(),
			link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
			published: entry
				.published
				.or(entry.updated)
				.and_then(|dt| Timestamp::new(dt.timestamp(), dt.timestamp_subsec_nanos() as i32).ok()),
			author: entry.authors.first().map(|p| p.name.clone()),
			summary: entry.summary.map(|t| t.content),
		})
		.collect();

	entries.sort_by(|a, b| b.published.cmp(&a.published));
	entries.truncate(max_entries);
	Ok(entries)
}
