//! In-memory collaborators
//!
//! DashMap-backed implementations of the collaborator traits, used by the
//! admin binary and by tests. Uniqueness of component types and page paths
//! is enforced atomically through map entries.

use crate::audit::AuditEntry;
use crate::collaborators::{AuditSink, ComponentRegistry, ContactStore, PageStore};
use crate::error::StoreError;
use crate::types::{
    new_object_id, ComponentRecord, ContactRecord, NewComponent, NewPage, PageRecord, PageStatus,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Component registry keyed by type
#[derive(Debug, Default)]
pub struct MemoryComponentRegistry {
    by_type: DashMap<String, ComponentRecord>,
}

impl MemoryComponentRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component synchronously
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] if the type is already registered.
    pub fn insert(&self, component: NewComponent) -> Result<ComponentRecord, StoreError> {
        match self.by_type.entry(component.component_type.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "Component type already exists: {}",
                component.component_type
            ))),
            Entry::Vacant(slot) => {
                let display_name = component.effective_display_name().to_string();
                let record = ComponentRecord {
                    id: new_object_id(),
                    component_type: component.component_type,
                    display_name,
                    props_schema: component.props_schema,
                    created_at: Utc::now(),
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Number of registered components
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[async_trait]
impl ComponentRegistry for MemoryComponentRegistry {
    async fn get_by_type(&self, component_type: &str) -> Result<Option<ComponentRecord>, StoreError> {
        Ok(self.by_type.get(component_type).map(|r| r.value().clone()))
    }

    async fn create(&self, component: NewComponent) -> Result<ComponentRecord, StoreError> {
        self.insert(component)
    }
}

/// Page store with a path index
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: DashMap<String, PageRecord>,
    /// path -> id
    paths: DashMap<String, String>,
}

impl MemoryPageStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn create(&self, page: NewPage, actor: Option<String>) -> Result<PageRecord, StoreError> {
        let slot = match self.paths.entry(page.path.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict(format!(
                    "Page path already exists: {}",
                    page.path
                )))
            }
            Entry::Vacant(slot) => slot,
        };

        let record = PageRecord {
            id: new_object_id(),
            path: page.path,
            slug: page.slug,
            title: page.title,
            status: page.status,
            layout: page.layout,
            created_by: actor.clone(),
            updated_by: actor,
            created_at: Utc::now(),
            published_at: None,
        };
        self.pages.insert(record.id.clone(), record.clone());
        slot.insert(record.id.clone());
        Ok(record)
    }

    async fn publish(&self, id: &str, actor: Option<String>) -> Result<PageRecord, StoreError> {
        let mut page = self
            .pages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("Page not found".into()))?;

        page.status = PageStatus::Published;
        page.published_at = Some(Utc::now());
        page.updated_by = actor;
        Ok(page.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PageRecord>, StoreError> {
        Ok(self.pages.get(id).map(|p| p.value().clone()))
    }

    async fn find_by_path(&self, path: &str) -> Result<Option<PageRecord>, StoreError> {
        let Some(id) = self.paths.get(path).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.pages.get(&id).map(|p| p.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let (_, page) = self
            .pages
            .remove(id)
            .ok_or_else(|| StoreError::NotFound("Page not found".into()))?;
        self.paths.remove(&page.path);
        Ok(())
    }
}

/// Contact submission store
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: DashMap<String, ContactRecord>,
}

impl MemoryContactStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a submission, returning its id
    pub fn insert(&self, contact: ContactRecord) -> String {
        let id = contact.id.clone();
        self.contacts.insert(id.clone(), contact);
        id
    }

    /// Get a submission by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ContactRecord> {
        self.contacts.get(id).map(|c| c.value().clone())
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(&self, limit: usize) -> Result<Vec<ContactRecord>, StoreError> {
        let mut all: Vec<ContactRecord> = self.contacts.iter().map(|c| c.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        all.truncate(limit);
        Ok(all)
    }

    async fn mark_read(&self, id: &str) -> Result<Option<ContactRecord>, StoreError> {
        Ok(self.contacts.get_mut(id).map(|mut contact| {
            contact.read = true;
            contact.clone()
        }))
    }
}

/// Audit sink that keeps entries in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded entries, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    /// Number of recorded entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), StoreError> {
        self.entries.lock().push(entry);
        Ok(())
    }
}
