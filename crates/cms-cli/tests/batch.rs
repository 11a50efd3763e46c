//! Batch execution over fixture-seeded stores

use cms_cli::{run_commands, Fixtures};
use cms_core::CmsConfig;
use pretty_assertions::assert_eq;

const FIXTURES: &str = r#"{
    "components": [
        {
            "type": "Hero",
            "displayName": "Hero Banner",
            "propsSchema": {"headline": "string", "images": {"type": "array", "items": "string"}}
        }
    ],
    "contacts": [
        {"name": "Ada", "email": "ada@example.com", "message": "Hello"}
    ]
}"#;

#[tokio::test]
async fn batch_continues_past_failures() {
    let session = Fixtures::from_json_str(FIXTURES)
        .unwrap()
        .into_executor(CmsConfig::default())
        .unwrap();

    let outcomes = run_commands(
        &session.executor,
        [
            r#"create page /home components=[{"type":"Hero","props":{"headline":"Hi","backgroundImage":"/a.jpg"}}]"#,
            "frobnicate page /x",
            "publish page /home",
        ],
        Some("admin"),
    )
    .await;

    let ok: Vec<bool> = outcomes.iter().map(|o| o.ok).collect();
    assert_eq!(ok, vec![true, false, true]);

    assert_eq!(outcomes[0].result["kind"], "page");
    assert_eq!(
        outcomes[0].result["data"]["layout"][0]["props"]["images"][0],
        "/a.jpg"
    );
    assert_eq!(outcomes[1].result["status"], 400);
    assert_eq!(outcomes[1].result["message"], "Unsupported CLI command");
    assert_eq!(outcomes[2].result["data"]["status"], "published");

    assert_eq!(session.audit.len(), 3);
}

#[tokio::test]
async fn empty_fixtures_have_no_components() {
    let session = Fixtures::default()
        .into_executor(CmsConfig::default())
        .unwrap();

    let outcomes = run_commands(
        &session.executor,
        [r#"create page /x components=[{"type":"Hero"}]"#],
        None,
    )
    .await;

    assert!(!outcomes[0].ok);
    assert_eq!(
        outcomes[0].result["message"],
        r#"Unknown component type "Hero" at block 0"#
    );
}
