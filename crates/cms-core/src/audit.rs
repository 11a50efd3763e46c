//! Audit entries
//!
//! One entry is written per executed command, success or failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action recorded when command text never parsed into a descriptor
pub const UNPARSED_ACTION: &str = "unparsed_command";

/// Record of one command attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Acting administrator, if known
    pub actor: Option<String>,
    /// Action name
    pub action: String,
    /// Kind of resource the action targets
    pub resource_type: Option<String>,
    /// Id of the affected resource, when one resulted
    pub resource_id: Option<String>,
    /// Original command text
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Outcome summary or error body
    pub details: Value,
    /// When the entry was made
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create entry stamped now
    #[must_use]
    pub fn new(
        actor: Option<&str>,
        action: impl Into<String>,
        command: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            actor: actor.map(str::to_string),
            action: action.into(),
            resource_type: None,
            resource_id: None,
            command: command.into(),
            success,
            details: Value::Null,
            created_at: Utc::now(),
        }
    }

    /// With resource type and id
    #[must_use]
    pub fn with_resource(mut self, resource_type: Option<&str>, resource_id: Option<String>) -> Self {
        self.resource_type = resource_type.map(str::to_string);
        self.resource_id = resource_id;
        self
    }

    /// With details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case() {
        let entry = AuditEntry::new(Some("admin"), "publish_page", "publish page /about", true)
            .with_resource(Some("page"), Some("abc".into()))
            .with_details(json!({"path": "/about"}));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["resourceType"], "page");
        assert_eq!(value["resourceId"], "abc");
        assert_eq!(value["actor"], "admin");
        assert!(value.get("createdAt").is_some());
    }
}
