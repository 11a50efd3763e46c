//! Fixture files for seeding in-memory collaborators
//!
//! ```json
//! {
//!   "components": [
//!     {"type": "Hero", "displayName": "Hero Banner", "propsSchema": {"headline": "string"}}
//!   ],
//!   "contacts": [
//!     {"name": "Ada", "email": "ada@example.com", "message": "Hello"}
//!   ]
//! }
//! ```

use cms_core::memory::{
    MemoryAuditSink, MemoryComponentRegistry, MemoryContactStore, MemoryPageStore,
};
use cms_core::{CmsConfig, Collaborators, CommandExecutor, ContactRecord, NewComponent, StoreError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fixture loading errors
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid fixture document
    #[error("invalid fixture file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Seeding a store failed
    #[error(transparent)]
    Seed(#[from] StoreError),
}

/// Contact submission entry in a fixture file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactFixture {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
    /// Already read
    #[serde(default)]
    pub read: bool,
}

/// Seed data for a run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    /// Components to register
    pub components: Vec<NewComponent>,
    /// Contact submissions to store
    pub contacts: Vec<ContactFixture>,
}

impl Fixtures {
    /// Parse fixtures from JSON text
    ///
    /// # Errors
    /// Returns [`FixtureError::Parse`] for malformed documents.
    pub fn from_json_str(text: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load fixtures from a JSON file
    ///
    /// # Errors
    /// Returns [`FixtureError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Build an executor over fresh in-memory stores seeded with these fixtures
    ///
    /// # Errors
    /// Returns [`FixtureError::Seed`] when the fixtures repeat a component type.
    pub fn into_executor(self, config: CmsConfig) -> Result<Session, FixtureError> {
        let components = Arc::new(MemoryComponentRegistry::new());
        for component in self.components {
            components.insert(component)?;
        }

        let contacts = Arc::new(MemoryContactStore::new());
        for fixture in self.contacts {
            let mut record = ContactRecord::new(fixture.name, fixture.email, fixture.message);
            record.read = fixture.read;
            contacts.insert(record);
        }

        let audit = Arc::new(MemoryAuditSink::new());
        let collaborators = Collaborators {
            components: components.clone(),
            pages: Arc::new(MemoryPageStore::new()),
            contacts,
            audit: audit.clone(),
        };

        Ok(Session {
            executor: CommandExecutor::new(config, collaborators),
            components,
            audit,
        })
    }
}

/// Seeded executor plus its inspectable audit trail
#[derive(Debug)]
pub struct Session {
    /// Executor over the seeded stores
    pub executor: CommandExecutor,
    /// Seeded component registry
    pub components: Arc<MemoryComponentRegistry>,
    /// Audit entries written during the session
    pub audit: Arc<MemoryAuditSink>,
}
