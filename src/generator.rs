//! The run: fetch → parse → enrich → group → strip `raw`.

use std::{
	collections::HashSet,
	path::{Path, PathBuf},
	sync::Arc,
};

use color_eyre::eyre::{Result, WrapErr};

use crate::{
	config::Settings,
	enrich::{self, FeedSource, LinkProbe},
	github::BoxedGitHubClient,
	group::GroupedLinks,
	link::parse_issue,
	output,
};

pub struct Generator {
	settings: Settings,
	gh: BoxedGitHubClient,
	probe: Arc<dyn LinkProbe>,
	feeds: Arc<dyn FeedSource>,
}

impl Generator {
	pub fn new(settings: Settings, gh: BoxedGitHubClient, probe: Arc<dyn LinkProbe>, feeds: Arc<dyn FeedSource>) -> Self {
		Self { settings, gh, probe, feeds }
	}

	/// Build every group from the current state of the repository.
	///
	/// Fails only if the issues cannot be fetched; per-issue trouble is logged and absorbed.
	pub async fn process(&self) -> Result<GroupedLinks> {
		let issues_config = &self.settings.issues;
		let repo = &issues_config.repo;
		tracing::info!("Starting to process issues...");

		let issues = self
			.gh
			.fetch_issues(&repo.owner, &repo.name, issues_config.sort)
			.await
			.wrap_err_with(|| format!("Failed to fetch issues from {repo}"))?;

		self.warn_unknown_labels().await;

		let mut records: Vec<_> = issues.iter().map(parse_issue).collect();
		enrich::enrich(&mut records, self.probe.as_ref(), self.feeds.as_ref()).await;
		tracing::info!("Processed {} issues", records.len());

		let mut grouped = GroupedLinks::build(records, &issues_config.groups);
		if !issues_config.keep_raw {
			grouped.strip_raw();
		}

		Ok(grouped)
	}

	pub fn save(&self, grouped: &GroupedLinks, output_dir: &Path) -> Result<Vec<PathBuf>> {
		let written = output::write_groups(output_dir, grouped, &self.settings)?;
		tracing::info!("All files generated successfully");
		Ok(written)
	}

	/// Groups requiring a label the repository doesn't define can never match anything.
	async fn warn_unknown_labels(&self) {
		let groups = &self.settings.issues.groups;
		if groups.iter().all(|g| g.labels.is_empty()) {
			return;
		}

		let repo = &self.settings.issues.repo;
		let labels = match self.gh.fetch_labels(&repo.owner, &repo.name).await {
			Ok(labels) => labels,
			Err(e) => {
				tracing::warn!("Could not fetch labels of {repo}, skipping label check: {e}");
				return;
			}
		};
		let known: HashSet<&str> = labels.iter().map(|l| l.name.as_str()).collect();

		for group in groups {
			for label in group.labels.iter().filter(|l| !known.contains(l.as_str())) {
				tracing::warn!(group = %group.name, label = %label, "Group '{}' requires label '{label}', which {repo} does not define", group.name);
			}
		}
	}
}
