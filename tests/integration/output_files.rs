//! Files written by a run.

use friendly_links::IssueState;
use rstest::rstest;

use crate::common::{OWNER, REPO, TestContext, ctx, form_body, json_body};

#[rstest]
#[tokio::test]
async fn test_one_file_per_group(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 1, &json_body(r#"{"title":"Blog A","url":"http://a.example"}"#), IssueState::Open, vec!["accepted"]);
	ctx.gh.add_issue(OWNER, REPO, 2, &form_body(&[("博客名称", "博客乙"), ("博客图标", "_No response_")]), IssueState::Closed, vec![]);

	let generator = ctx.generator(ctx.settings(false, "\n    - name: accepted\n      state: open\n      labels: [accepted]\n    - name: empty\n      labels: [nobody]"));
	let grouped = generator.process().await.unwrap();
	let written = generator.save(&grouped, &ctx.output_dir()).unwrap();

	let names: Vec<_> = written.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
	assert_eq!(names, vec!["all.json", "accepted.json", "empty.json"]);

	let all = ctx.read_output("all");
	assert_eq!(all["version"], env!("CARGO_PKG_VERSION"));
	assert_eq!(all["label"], "all");
	assert_eq!(all["config"]["issues"]["repo"], "someone/friends");
	assert_eq!(all["config"]["issues"]["groups"][0]["name"], "accepted");
	assert_eq!(all["content"].as_array().unwrap().len(), 2);
	assert_eq!(all["content"][1]["title"], "博客乙");
	assert_eq!(all["content"][1]["avatar"], "");
	assert_eq!(all["content"][0]["status"], "active");
	assert!(all["content"][0].get("raw").is_none());

	let accepted = ctx.read_output("accepted");
	assert_eq!(accepted["label"], "accepted");
	assert_eq!(accepted["content"].as_array().unwrap().len(), 1);
	assert_eq!(accepted["content"][0]["title"], "Blog A");

	let empty = ctx.read_output("empty");
	assert_eq!(empty["content"], serde_json::json!([]));
}

#[rstest]
#[tokio::test]
async fn test_text_layout(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 3, &json_body(r#"{"title":"友链"}"#), IssueState::Open, vec![]);

	let generator = ctx.generator(ctx.settings(false, " []"));
	let grouped = generator.process().await.unwrap();
	generator.save(&grouped, &ctx.output_dir()).unwrap();

	let text = std::fs::read_to_string(ctx.output_dir().join("all.json")).unwrap();
	assert!(text.contains("\n    \"label\": \"all\","), "{text}");
	assert!(text.contains("\"title\": \"友链\""), "non-ASCII must not be escaped:\n{text}");
}

#[rstest]
#[tokio::test]
async fn test_kept_raw_is_full_issue(ctx: TestContext) {
	ctx.gh.add_issue(OWNER, REPO, 5, "no format at all", IssueState::Closed, vec!["spam"]);

	let generator = ctx.generator(ctx.settings(true, " []"));
	let grouped = generator.process().await.unwrap();
	generator.save(&grouped, &ctx.output_dir()).unwrap();

	let raw = &ctx.read_output("all")["content"][0]["raw"];
	assert_eq!(raw["number"], 5);
	assert_eq!(raw["state"], "closed");
	assert_eq!(raw["body"], "no format at all");
	assert_eq!(raw["labels"][0]["name"], "spam");
	assert_eq!(raw["html_url"], "https://github.com/someone/friends/issues/5");
}
