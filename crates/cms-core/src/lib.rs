//! CMS Core
//!
//! Executes administrator commands against pluggable collaborators:
//!
//! - [`CommandExecutor`]: parse, dispatch, validate, persist, audit
//! - [`alias`]: legacy field promotion ahead of validation
//! - [`effect`]: non-fatal wrappers for best-effort steps
//! - [`collaborators`]: registry, store and audit contracts
//! - [`memory`]: in-memory implementations of those contracts
//!
//! # Example
//!
//! ```rust
//! use cms_core::{CmsConfig, Collaborators, CommandExecutor};
//! use cms_core::memory::{MemoryAuditSink, MemoryComponentRegistry, MemoryContactStore, MemoryPageStore};
//! use std::sync::Arc;
//!
//! let collaborators = Collaborators {
//!     components: Arc::new(MemoryComponentRegistry::new()),
//!     pages: Arc::new(MemoryPageStore::new()),
//!     contacts: Arc::new(MemoryContactStore::new()),
//!     audit: Arc::new(MemoryAuditSink::new()),
//! };
//! let executor = CommandExecutor::new(CmsConfig::default(), collaborators);
//! assert!(!executor.config().reject_unknown_tags);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod alias;
pub mod audit;
pub mod collaborators;
pub mod config;
pub mod effect;
pub mod error;
pub mod executor;
pub mod memory;
pub mod types;

pub use alias::{AliasError, AliasOutcome};
pub use audit::{AuditEntry, UNPARSED_ACTION};
pub use collaborators::{AuditSink, Collaborators, ComponentRegistry, ContactStore, PageStore};
pub use config::{CmsConfig, ConfigError};
pub use error::{CommandError, CommandResult, StoreError};
pub use executor::{CommandExecutor, CommandOutput};
pub use types::{
    derive_slug, new_object_id, Block, ComponentRecord, ContactRecord, NewComponent, NewPage,
    PageRecord, PageStatus, PageTarget,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
