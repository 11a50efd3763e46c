//! Error types for schema compilation and validation
//!
//! Compilation failures are recoverable: callers treat them as "skip strict
//! validation". Validation failures are not, and carry the HTTP-style status
//! the admin boundary reports.

use crate::validator::{runtime_type, Issue};
use serde_json::{json, Value};

/// Errors raised while compiling a Schema Definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Top-level definition is not a mapping or primitive tag
    #[error("schema definition must be an object, got {found}")]
    NotAnObject {
        /// Runtime type of the rejected definition
        found: &'static str,
    },

    /// Definition nests deeper than the compiler allows
    #[error("schema definition exceeds maximum depth of {max}")]
    DepthExceeded {
        /// Configured depth limit
        max: usize,
    },
}

/// Block props rejected by a compiled validator
///
/// Raised only after both the direct and (for wrapped schemas) the wrapped
/// attempt have failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid props for block {index} ({block_type}): {summary}")]
pub struct ValidationFailure {
    /// Component type of the rejected block
    pub block_type: String,
    /// 0-based position of the block in its layout
    pub index: usize,
    /// Structured issues from the failing attempt
    pub issues: Vec<Issue>,
    summary: String,
}

impl ValidationFailure {
    /// HTTP-style status for every validation failure
    pub const STATUS: u16 = 400;

    pub(crate) fn new(block_type: &str, index: usize, candidate: &Value, issues: Vec<Issue>) -> Self {
        let summary = if issues.is_empty() {
            format!(
                "no validator error available for value of type {}",
                runtime_type(candidate)
            )
        } else {
            issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        };

        Self {
            block_type: block_type.to_string(),
            index,
            issues,
            summary,
        }
    }

    /// Status code reported at the admin boundary
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        Self::STATUS
    }

    /// Human-readable issue strings (`path: message` or bare message)
    #[must_use]
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Raw validator output for diagnostics
    #[must_use]
    pub fn details(&self) -> Value {
        json!({
            "blockType": self.block_type,
            "index": self.index,
            "issues": self.issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_display() {
        let err = CompileError::NotAnObject { found: "array" };
        assert_eq!(err.to_string(), "schema definition must be an object, got array");
    }

    #[test]
    fn failure_message_names_block() {
        let issues = vec![Issue::new(vec!["headline".into()], "Required")];
        let err = ValidationFailure::new("Hero", 2, &json!({}), issues);

        assert_eq!(
            err.to_string(),
            "Invalid props for block 2 (Hero): headline: Required"
        );
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn failure_without_issues_mentions_runtime_type() {
        let err = ValidationFailure::new("Hero", 0, &json!("x"), Vec::new());
        assert!(err
            .to_string()
            .contains("no validator error available for value of type string"));
    }

    #[test]
    fn details_carry_structured_issues() {
        let issues = vec![Issue::new(vec!["images".into(), "0".into()], "Expected string, received number")];
        let err = ValidationFailure::new("Gallery", 1, &json!({}), issues);
        let details = err.details();

        assert_eq!(details["blockType"], "Gallery");
        assert_eq!(details["issues"][0]["path"], json!(["images", "0"]));
    }
}
