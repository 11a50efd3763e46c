//! Audit trail tests
//!
//! Every command attempt leaves exactly one entry, and a failing audit sink
//! never changes what the caller sees.

use async_trait::async_trait;
use cms_core::{AuditEntry, AuditSink, StoreError, UNPARSED_ACTION};
use cms_test_utils::{FailingAuditSink, Harness};
use mockall::mock;
use serde_json::json;
use std::sync::Arc;

mock! {
    Sink {}

    #[async_trait]
    impl AuditSink for Sink {
        async fn record(&self, entry: AuditEntry) -> Result<(), StoreError>;
    }
}

#[tokio::test]
async fn success_entry_carries_resource() {
    let h = Harness::new();
    h.executor
        .execute("create page /about", Some("admin-1"))
        .await
        .unwrap();

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert!(entry.success);
    assert_eq!(entry.action, "create_page");
    assert_eq!(entry.actor.as_deref(), Some("admin-1"));
    assert_eq!(entry.resource_type.as_deref(), Some("page"));
    assert!(entry.resource_id.is_some());
    assert_eq!(entry.command, "create page /about");
    assert_eq!(entry.details, json!({"path": "/about", "status": "draft"}));
}

#[tokio::test]
async fn failure_entry_carries_error_body() {
    let h = Harness::new();
    let err = h
        .executor
        .execute("delete page /missing", None)
        .await
        .unwrap_err();

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].action, "delete_page");
    assert_eq!(entries[0].resource_id, None);
    assert_eq!(entries[0].details, err.to_json());
    assert_eq!(entries[0].details["status"], 404);
}

#[tokio::test]
async fn parse_failure_is_audited() {
    let h = Harness::new();
    let err = h
        .executor
        .execute("frobnicate page /x", Some("admin-1"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Unsupported CLI command");

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, UNPARSED_ACTION);
    assert_eq!(entries[0].command, "frobnicate page /x");
    assert_eq!(entries[0].resource_type, None);
}

#[tokio::test]
async fn one_entry_per_command() {
    let h = Harness::new();
    let commands = [
        "create page /a",
        "publish page /a",
        "publish page /nope",
        "delete page /a",
        "create component Hero",
    ];
    for command in commands {
        let _ = h.executor.execute(command, None).await;
    }

    let entries = h.audit.entries();
    assert_eq!(entries.len(), commands.len());
    let outcomes: Vec<bool> = entries.iter().map(|e| e.success).collect();
    assert_eq!(outcomes, vec![true, true, false, true, false]);
}

#[tokio::test]
async fn failing_sink_does_not_mask_success() {
    let executor = Harness::new().with_audit_sink(Arc::new(FailingAuditSink));
    let out = executor.execute("create page /about", None).await;
    assert!(out.is_ok());
}

#[tokio::test]
async fn failing_sink_does_not_replace_error() {
    let mut sink = MockSink::new();
    sink.expect_record()
        .times(1)
        .returning(|_| Err(StoreError::Backend("audit store unavailable".into())));

    let executor = Harness::new().with_audit_sink(Arc::new(sink));
    let err = executor.execute("publish page /nope", None).await.unwrap_err();

    assert_eq!(err.status(), 404);
    assert_eq!(err.to_string(), "Page not found");
}
