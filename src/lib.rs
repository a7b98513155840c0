//! Turns friendly-link submissions filed as GitHub issues into grouped JSON files.

pub mod config;
pub mod enrich;
pub mod generator;
pub mod github;
pub mod group;
pub mod link;
pub mod mock_github;
pub mod output;

pub use config::{GroupConfig, Settings, SortOrder, StateFilter};
pub use enrich::{FeedEntry, LinkStatus};
pub use generator::Generator;
pub use github::{GitHubIssue, IssueState};
pub use group::GroupedLinks;
pub use link::{LinkRecord, Strategy, parse_issue};
