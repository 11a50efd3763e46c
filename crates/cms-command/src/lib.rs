//! CMS Admin Command Language
//!
//! Turns one line of administrator command text into a typed
//! [`CommandDescriptor`]. Parsing is pure: no lookups, no I/O.
//!
//! # Example
//!
//! ```rust
//! use cms_command::{parse, CommandAction};
//!
//! let descriptor = parse("publish page /about").unwrap();
//! assert_eq!(descriptor.action(), CommandAction::PublishPage);
//! assert_eq!(descriptor.get("target").and_then(|v| v.as_str()), Some("/about"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod descriptor;
pub mod error;
pub mod parser;

pub use descriptor::{CommandAction, CommandDescriptor, CommandRequest};
pub use error::{ParseError, UnsupportedAction};
pub use parser::parse;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
