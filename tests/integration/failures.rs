//! Which failures end the run and which are absorbed.

use std::fs;

use friendly_links::{IssueState, Settings, config::ConfigError};
use rstest::rstest;

use crate::common::{OWNER, REPO, TestContext, ctx, json_body};

#[rstest]
#[tokio::test]
async fn test_unreachable_source_is_fatal(ctx: TestContext) {
	// nothing registered for the repository: the mock answers like a 404
	let generator = ctx.generator(ctx.settings(false, " []"));

	let err = generator.process().await.unwrap_err();
	assert!(format!("{err:#}").contains("Failed to fetch issues from someone/friends"), "{err:#}");
	assert!(!ctx.output_dir().exists());
}

#[rstest]
#[tokio::test]
async fn test_label_lookup_failure_is_absorbed(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 1, &json_body(r#"{"title":"A"}"#), IssueState::Open, vec!["accepted"]);
	ctx.gh.fail_labels(OWNER, REPO);

	let grouped = ctx.run(ctx.settings(false, "\n    - name: accepted\n      labels: [accepted]")).await;
	assert_eq!(grouped.group("accepted").unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_bad_records_do_not_abort(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 1, "```json\n{ broken\n```", IssueState::Open, vec![]);
	ctx.gh.add_issue(OWNER, REPO, 2, "```json\n   \n```", IssueState::Open, vec![]);
	ctx.gh.add_issue(OWNER, REPO, 3, "```json\n\"just a string\"\n```", IssueState::Open, vec![]);
	ctx.gh.add_issue(OWNER, REPO, 4, &json_body(r#"{"title":"Fine"}"#), IssueState::Open, vec![]);

	let grouped = ctx.run(ctx.settings(false, " []")).await;

	let records = grouped.records();
	assert_eq!(records.len(), 4);
	assert!(records[..3].iter().all(|r| r.fields().is_empty()));
	assert_eq!(records[3].field_str("title"), Some("Fine"));
}

#[rstest]
#[tokio::test]
async fn test_unwritable_output_is_fatal(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 1, "", IssueState::Open, vec![]);
	let blocker = ctx.out.path().join("json");
	fs::write(&blocker, "a file where the directory should be").unwrap();

	let generator = ctx.generator(ctx.settings(false, " []"));
	let grouped = generator.process().await.unwrap();
	assert!(generator.save(&grouped, &blocker).is_err());
}

#[test]
fn test_config_errors_surface_before_processing() {
	let dir = tempfile::tempdir().unwrap();

	let missing = dir.path().join("config.yml");
	assert!(matches!(Settings::load(&missing), Err(ConfigError::NotFound(_))));

	let bad = dir.path().join("bad.yml");
	fs::write(&bad, "issues:\n  repo: just-a-name\n").unwrap();
	assert!(matches!(Settings::load(&bad), Err(ConfigError::Load(_))));

	let reserved = dir.path().join("reserved.yml");
	fs::write(&reserved, "issues:\n  repo: a/b\n  groups:\n    - name: all\n").unwrap();
	assert!(matches!(Settings::load(&reserved), Err(ConfigError::ReservedGroup)));

	let good = dir.path().join("good.yml");
	fs::write(&good, "issues:\n  repo: a/b\n  sort: comments-desc\n").unwrap();
	let settings = Settings::load(&good).unwrap();
	assert_eq!(settings.issues.repo.to_string(), "a/b");
}
