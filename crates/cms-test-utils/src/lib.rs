//! Testing utilities for the CMS admin workspace
//!
//! Shared fixtures: a seeded in-memory harness, the Hero component, and
//! collaborators that always fail.

#![allow(missing_docs)]

use async_trait::async_trait;
use cms_core::memory::{
    MemoryAuditSink, MemoryComponentRegistry, MemoryContactStore, MemoryPageStore,
};
use cms_core::{
    AuditEntry, AuditSink, CmsConfig, Collaborators, CommandExecutor, ContactRecord, NewComponent,
    StoreError,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn hero_schema() -> Value {
    json!({
        "headline": "string",
        "subheadline": "string?",
        "images": {"type": "array", "items": "string"}
    })
}

pub fn hero_component() -> NewComponent {
    NewComponent::new("Hero")
        .with_display_name("Hero Banner")
        .with_schema(hero_schema())
}

/// Component whose whole props value is a string
pub fn text_component() -> NewComponent {
    NewComponent::new("Text").with_schema(json!("string"))
}

pub fn contact(name: &str) -> ContactRecord {
    ContactRecord::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        format!("Message from {name}"),
    )
}

/// Executor wired to in-memory collaborators that stay inspectable
pub struct Harness {
    pub executor: CommandExecutor,
    pub components: Arc<MemoryComponentRegistry>,
    pub pages: Arc<MemoryPageStore>,
    pub contacts: Arc<MemoryContactStore>,
    pub audit: Arc<MemoryAuditSink>,
}

impl Harness {
    /// Harness seeded with the Hero and Text components
    pub fn new() -> Self {
        Self::with_config(CmsConfig::default())
    }

    pub fn with_config(config: CmsConfig) -> Self {
        let components = Arc::new(MemoryComponentRegistry::new());
        components.insert(hero_component()).unwrap();
        components.insert(text_component()).unwrap();

        let pages = Arc::new(MemoryPageStore::new());
        let contacts = Arc::new(MemoryContactStore::new());
        let audit = Arc::new(MemoryAuditSink::new());

        let collaborators = Collaborators {
            components: components.clone(),
            pages: pages.clone(),
            contacts: contacts.clone(),
            audit: audit.clone(),
        };

        Self {
            executor: CommandExecutor::new(config, collaborators),
            components,
            pages,
            contacts,
            audit,
        }
    }

    /// Same stores, but audit entries go to `sink`
    pub fn with_audit_sink(self, sink: Arc<dyn AuditSink>) -> CommandExecutor {
        let collaborators = Collaborators {
            components: self.components,
            pages: self.pages,
            contacts: self.contacts,
            audit: sink,
        };
        CommandExecutor::new(self.executor.config().clone(), collaborators)
    }

    pub fn seed_contact(&self, name: &str) -> String {
        self.contacts.insert(contact(name))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit sink whose every write fails
#[derive(Debug, Default)]
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _entry: AuditEntry) -> Result<(), StoreError> {
        Err(StoreError::Backend("audit store unavailable".into()))
    }
}
