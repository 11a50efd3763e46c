//! CMS Schema Engine
//!
//! Compiles the props schema an administrator attaches to a block type into
//! an executable validator, and runs that validator against block props.
//!
//! # Pipeline
//!
//! ```text
//! Schema Definition (JSON) → compile → CompiledSchema → run(props) → Validated | ValidationFailure
//!                               ↑___________↓
//!                          SchemaCache (hash-keyed)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cms_schema::{compile, run, BlockContext};
//! use serde_json::json;
//!
//! let schema = compile(&json!({"headline": "string", "images": {"items": "string"}}))
//!     .expect("mapping definitions compile");
//!
//! let props = json!({"headline": "Welcome", "images": ["/a.jpg"]});
//! let validated = run(&schema, &props, BlockContext::new("Hero", 0)).unwrap();
//! assert_eq!(validated.data, props);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod compiler;
pub mod error;
pub mod hash;
pub mod runner;
pub mod validator;

pub use cache::{CacheStats, SchemaCache};
pub use compiler::{compile, try_compile, CompiledSchema, SchemaKind, UnknownTag, MAX_DEPTH, WRAPPED_FIELD};
pub use error::{CompileError, ValidationFailure};
pub use hash::SchemaHash;
pub use runner::{run, Attempt, BlockContext, Validated, ValidationResult};
pub use validator::{runtime_type, Issue, PrimitiveKind, Validator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
