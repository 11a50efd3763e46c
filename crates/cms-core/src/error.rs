//! Error types for CMS Core
//!
//! Every failure a command can produce is a [`CommandError`], carrying the
//! HTTP-style status the admin boundary reports:
//! - Syntax errors from the command grammar (400)
//! - Unsupported actions from programmatic callers (400)
//! - Malformed payloads (400)
//! - Unknown references (400) and missing resources (404)
//! - Props validation failures (400)
//! - Conflicts such as duplicate paths or types (400)
//! - Backend failures (500)

use cms_command::{ParseError, UnsupportedAction};
use cms_schema::ValidationFailure;
use serde_json::{json, Value};

/// Main command error type
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Command text did not parse
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// Action name outside the action table
    #[error(transparent)]
    UnsupportedAction(#[from] UnsupportedAction),

    /// Payload is missing a field or has the wrong shape
    #[error("{message}")]
    InvalidPayload {
        /// Human-readable message
        message: String,
        /// Structured diagnostics, if any
        details: Option<Value>,
    },

    /// Payload names something that is not registered
    #[error("{0}")]
    Reference(String),

    /// Target resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Block props rejected by the component's schema
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Resource already exists
    #[error("{0}")]
    Conflict(String),

    /// Unexpected collaborator failure
    #[error("{0}")]
    Internal(String),
}

impl CommandError {
    /// Create invalid payload error without details
    #[inline]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
            details: None,
        }
    }

    /// HTTP-style status for the boundary
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Syntax(err) => err.status(),
            Self::Validation(err) => err.status(),
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
            Self::UnsupportedAction(_)
            | Self::InvalidPayload { .. }
            | Self::Reference(_)
            | Self::Conflict(_) => 400,
        }
    }

    /// Structured diagnostics for the caller
    #[must_use]
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Validation(err) => Some(err.details()),
            Self::InvalidPayload { details, .. } => details.clone(),
            Self::UnsupportedAction(err) => Some(json!({ "action": err.action })),
            _ => None,
        }
    }

    /// Check if error is worth retrying by the caller
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Body reported at the admin boundary and in audit details
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "status": self.status(),
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        body
    }
}

/// Errors reported by collaborator stores
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Record conflicts with an existing one
    #[error("{0}")]
    Conflict(String),

    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => Self::NotFound(message),
            StoreError::Conflict(message) => Self::Conflict(message),
            backend @ StoreError::Backend(_) => Self::Internal(backend.to_string()),
        }
    }
}

/// Result type alias for command execution
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_by_kind() {
        assert_eq!(CommandError::from(ParseError::Unsupported).status(), 400);
        assert_eq!(CommandError::NotFound("Page not found".into()).status(), 404);
        assert_eq!(CommandError::Conflict("dup".into()).status(), 400);
        assert_eq!(CommandError::Internal("boom".into()).status(), 500);
        assert_eq!(
            CommandError::from(UnsupportedAction {
                action: "x".into()
            })
            .status(),
            400
        );
    }

    #[test]
    fn messages_pass_through() {
        let err = CommandError::from(ParseError::Unsupported);
        assert_eq!(err.to_string(), "Unsupported CLI command");

        let err = CommandError::from(UnsupportedAction {
            action: "archive".into(),
        });
        assert_eq!(err.to_string(), "Unsupported action");
        assert_eq!(err.details(), Some(json!({"action": "archive"})));
    }

    #[test]
    fn store_errors_map_to_taxonomy() {
        assert!(matches!(
            CommandError::from(StoreError::NotFound("gone".into())),
            CommandError::NotFound(_)
        ));
        assert!(matches!(
            CommandError::from(StoreError::Conflict("dup".into())),
            CommandError::Conflict(_)
        ));

        let internal = CommandError::from(StoreError::Backend("disk full".into()));
        assert_eq!(internal.status(), 500);
        assert!(internal.is_retryable());
        assert_eq!(internal.to_string(), "storage backend error: disk full");
    }

    #[test]
    fn json_body_includes_details_when_present() {
        let err = CommandError::InvalidPayload {
            message: "layout must be an array".into(),
            details: Some(json!({"found": "object"})),
        };
        assert_eq!(
            err.to_json(),
            json!({
                "status": 400,
                "message": "layout must be an array",
                "details": {"found": "object"}
            })
        );
        assert_eq!(
            CommandError::invalid_payload("x").to_json(),
            json!({"status": 400, "message": "x"})
        );
    }
}
