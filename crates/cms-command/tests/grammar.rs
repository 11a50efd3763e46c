use cms_command::{parse, CommandAction, ParseError};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn parse_never_panics(input in "\\PC{0,80}") {
        let _ = parse(&input);
    }

    #[test]
    fn page_targets_are_preserved(target in "/[A-Za-z0-9_-]{0,20}") {
        let descriptor = parse(&format!("publish page {target}")).unwrap();
        prop_assert_eq!(descriptor.get("target"), Some(&json!(target)));
    }

    #[test]
    fn unknown_verbs_are_unsupported(verb in "[a-z]{3,10}") {
        prop_assume!(!["create", "publish", "delete"].contains(&verb.as_str()));
        prop_assert_eq!(parse(&format!("{verb} page /x")), Err(ParseError::Unsupported));
    }
}

#[test]
fn multiline_components_argument() {
    let cmd = "create page /landing title=\"Landing\" components=[\n  {\"type\": \"Hero\", \"props\": {\"headline\": \"Hi\"}}\n]";
    let descriptor = parse(cmd).unwrap();

    assert_eq!(descriptor.action(), CommandAction::CreatePage);
    assert_eq!(
        descriptor.get("layout"),
        Some(&json!([{"type": "Hero", "props": {"headline": "Hi"}}]))
    );
}

#[test]
fn frobnicate_is_unsupported() {
    let err = parse("frobnicate page /x").unwrap_err();
    assert_eq!(err.to_string(), "Unsupported CLI command");
    assert_eq!(err.status(), 400);
}

#[test]
fn quoted_title_may_mention_components() {
    let cmd = r#"create page /guide title="How components=[] works" components=[{"type":"Hero"}]"#;
    let descriptor = parse(cmd).unwrap();

    assert_eq!(descriptor.get("title"), Some(&json!("How components=[] works")));
    assert_eq!(descriptor.get("layout"), Some(&json!([{"type": "Hero"}])));
}
