//! Collaborator contracts
//!
//! The executor persists nothing itself. Page, component and contact storage
//! and the audit trail are reached through these traits; consistency is the
//! implementor's concern.

use crate::audit::AuditEntry;
use crate::error::StoreError;
use crate::types::{ComponentRecord, ContactRecord, NewComponent, NewPage, PageRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Registry of block types and their props schemas
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// Look up a component by type
    async fn get_by_type(&self, component_type: &str) -> Result<Option<ComponentRecord>, StoreError>;

    /// Register a component; duplicate types are a [`StoreError::Conflict`]
    async fn create(&self, component: NewComponent) -> Result<ComponentRecord, StoreError>;
}

/// Page persistence
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Create a page; duplicate paths are a [`StoreError::Conflict`]
    async fn create(&self, page: NewPage, actor: Option<String>) -> Result<PageRecord, StoreError>;

    /// Publish a page by id
    async fn publish(&self, id: &str, actor: Option<String>) -> Result<PageRecord, StoreError>;

    /// Find a page by id
    async fn find_by_id(&self, id: &str) -> Result<Option<PageRecord>, StoreError>;

    /// Find a page by path
    async fn find_by_path(&self, path: &str) -> Result<Option<PageRecord>, StoreError>;

    /// Delete a page by id
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Contact submission storage
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Most recent submissions first
    async fn list(&self, limit: usize) -> Result<Vec<ContactRecord>, StoreError>;

    /// Mark a submission read; `None` when it does not exist
    async fn mark_read(&self, id: &str) -> Result<Option<ContactRecord>, StoreError>;
}

/// Destination for audit entries
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one entry
    async fn record(&self, entry: AuditEntry) -> Result<(), StoreError>;
}

/// The collaborator set an executor runs against
#[derive(Clone)]
pub struct Collaborators {
    /// Component registry
    pub components: Arc<dyn ComponentRegistry>,
    /// Page store
    pub pages: Arc<dyn PageStore>,
    /// Contact store
    pub contacts: Arc<dyn ContactStore>,
    /// Audit sink
    pub audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
