//! Run configuration.
//!
//! Loaded once at startup from a YAML file layered with `FRIENDLY_LINKS__*` environment
//! overrides, then validated into an immutable [`Settings`]. Nothing downstream sees an
//! unvalidated map.

use std::{
	collections::HashSet,
	fmt,
	path::{Path, PathBuf},
};

use ::config::{Config, Environment, File, FileFormat};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};

use crate::github::IssueState;

/// Group name that always holds every record. Configured groups may not use it.
pub const ALL_GROUP: &str = "all";

#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ConfigError {
	#[error("configuration file not found: {}", .0.display())]
	#[diagnostic(code(friendly_links::config::not_found), help("pass `--config <path>` or create `config.yml` in the working directory"))]
	NotFound(PathBuf),

	#[error("invalid configuration: {0}")]
	#[diagnostic(code(friendly_links::config::invalid))]
	Load(#[from] ::config::ConfigError),

	#[error("invalid repository `{0}`")]
	#[diagnostic(code(friendly_links::config::repo), help("repository must be in format 'owner/repo'"))]
	InvalidRepo(String),

	#[error("group name `all` is reserved")]
	#[diagnostic(code(friendly_links::config::reserved_group), help("the `all` group is always generated; rename the configured group"))]
	ReservedGroup,

	#[error("group `{0}` is defined more than once")]
	#[diagnostic(code(friendly_links::config::duplicate_group))]
	DuplicateGroup(String),
}

/// `owner/repo` pair. Serialized back as the single string it was read from.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
	pub owner: String,
	pub name: String,
}

impl TryFrom<String> for RepoSlug {
	type Error = ConfigError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		let parts: Vec<&str> = s.split('/').collect();
		match parts.as_slice() {
			[owner, name] if !owner.trim().is_empty() && !name.trim().is_empty() => Ok(Self {
				owner: owner.trim().to_string(),
				name: name.trim().to_string(),
			}),
			_ => Err(ConfigError::InvalidRepo(s)),
		}
	}
}

impl From<RepoSlug> for String {
	fn from(slug: RepoSlug) -> String {
		slug.to_string()
	}
}

impl fmt::Display for RepoSlug {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// Which issue states a group admits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
	#[default]
	All,
	Open,
	Closed,
}

impl StateFilter {
	/// A record with no known state only passes the `all` filter.
	pub fn admits(self, state: Option<IssueState>) -> bool {
		match self {
			StateFilter::All => true,
			StateFilter::Open => state == Some(IssueState::Open),
			StateFilter::Closed => state == Some(IssueState::Closed),
		}
	}
}

/// Order in which the issue source is asked to deliver issues.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
	#[default]
	Created,
	Updated,
	Comments,
	CreatedDesc,
	UpdatedDesc,
	CommentsDesc,
}

impl SortOrder {
	/// `(sort, direction)` query parameters of the issues API. Plain values leave `direction`
	/// to the API default.
	pub fn api_params(self) -> (&'static str, Option<&'static str>) {
		match self {
			SortOrder::Created => ("created", None),
			SortOrder::Updated => ("updated", None),
			SortOrder::Comments => ("comments", None),
			SortOrder::CreatedDesc => ("created", Some("desc")),
			SortOrder::UpdatedDesc => ("updated", Some("desc")),
			SortOrder::CommentsDesc => ("comments", Some("desc")),
		}
	}
}

/// A named output subset: state filter first, then required labels (superset match).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct GroupConfig {
	pub name: String,
	#[serde(default)]
	pub state: StateFilter,
	#[serde(default)]
	pub labels: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct IssuesConfig {
	pub repo: RepoSlug,
	#[serde(default)]
	pub groups: Vec<GroupConfig>,
	#[serde(default)]
	pub sort: SortOrder,
	/// Keep the originating issue payload under `raw` in the output.
	#[serde(default)]
	pub keep_raw: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Settings {
	pub issues: IssuesConfig,
}

impl Settings {
	/// Read `path` (YAML), apply `FRIENDLY_LINKS__SECTION__KEY` environment overrides, validate.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::NotFound(path.to_path_buf()));
		}

		let config = Config::builder()
			.add_source(File::from(path).format(FileFormat::Yaml))
			.add_source(Environment::with_prefix("FRIENDLY_LINKS").prefix_separator("__").separator("__").try_parsing(true))
			.build()?;

		let settings: Settings = config.try_deserialize()?;
		settings.validate()?;
		tracing::info!(path = %path.display(), repo = %settings.issues.repo, groups = settings.issues.groups.len(), "loaded configuration");
		Ok(settings)
	}

	/// Parse settings from YAML text alone, without environment overrides.
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		let config = Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)).build()?;
		let settings: Settings = config.try_deserialize()?;
		settings.validate()?;
		Ok(settings)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let mut seen = HashSet::new();
		for group in &self.issues.groups {
			if group.name == ALL_GROUP {
				return Err(ConfigError::ReservedGroup);
			}
			if !seen.insert(group.name.as_str()) {
				return Err(ConfigError::DuplicateGroup(group.name.clone()));
			}
		}
		Ok(())
	}
}
