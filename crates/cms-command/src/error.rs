//! Error types for command parsing and action lookup
//!
//! Grammar failures ([`ParseError`]) and action-table failures
//! ([`UnsupportedAction`]) are raised at different stages and stay distinct.

/// Errors raised while parsing command text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Text matches none of the known verb phrases
    #[error("Unsupported CLI command")]
    Unsupported,

    /// Verb phrase present but its target token is missing
    #[error("{0}")]
    MissingTarget(&'static str),

    /// JSON argument failed to parse
    #[error("Invalid {argument} JSON: {message}")]
    InvalidJson {
        /// Argument name (`components`, `propsSchema`)
        argument: &'static str,
        /// Underlying parser message
        message: String,
    },

    /// JSON argument parsed but has the wrong shape
    #[error("{argument} must be a JSON {expected}")]
    WrongShape {
        /// Argument name
        argument: &'static str,
        /// Expected JSON shape
        expected: &'static str,
    },
}

impl ParseError {
    /// HTTP-style status for every parse failure
    pub const STATUS: u16 = 400;

    /// Status code reported at the admin boundary
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        Self::STATUS
    }
}

/// Action name outside the executor's action table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported action")]
pub struct UnsupportedAction {
    /// Action string as received
    pub action: String,
}
