//! Command descriptors
//!
//! A [`CommandDescriptor`] is produced once per command and never mutated.
//! Programmatic callers that skip the text grammar submit a
//! [`CommandRequest`] instead, whose free-form action string is checked
//! against the action table when converted.

use crate::error::UnsupportedAction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Actions the executor knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    /// Validate a layout and create a draft page
    CreatePage,
    /// Publish a page by id or path
    PublishPage,
    /// Delete a page by id or path
    DeletePage,
    /// Register a block type
    CreateComponent,
    /// List contact submissions
    ListContacts,
    /// Mark a contact submission as read
    MarkContactRead,
}

impl CommandAction {
    /// All actions in table order
    pub const ALL: [Self; 6] = [
        Self::CreatePage,
        Self::PublishPage,
        Self::DeletePage,
        Self::CreateComponent,
        Self::ListContacts,
        Self::MarkContactRead,
    ];

    /// Wire name of the action
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatePage => "create_page",
            Self::PublishPage => "publish_page",
            Self::DeletePage => "delete_page",
            Self::CreateComponent => "create_component",
            Self::ListContacts => "list_contacts",
            Self::MarkContactRead => "mark_contact_read",
        }
    }

    /// Resource type the action touches, for audit entries
    #[must_use]
    pub const fn resource_type(self) -> &'static str {
        match self {
            Self::CreatePage | Self::PublishPage | Self::DeletePage => "page",
            Self::CreateComponent => "component",
            Self::ListContacts | Self::MarkContactRead => "contact",
        }
    }
}

impl Display for CommandAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandAction {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnsupportedAction {
                action: s.to_string(),
            })
    }
}

/// Parsed, typed representation of an admin command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDescriptor {
    action: CommandAction,
    payload: Map<String, Value>,
    raw: String,
}

impl CommandDescriptor {
    /// Create descriptor
    #[inline]
    #[must_use]
    pub fn new(action: CommandAction, payload: Map<String, Value>, raw: impl Into<String>) -> Self {
        Self {
            action,
            payload,
            raw: raw.into(),
        }
    }

    /// Action to run
    #[inline]
    #[must_use]
    pub fn action(&self) -> CommandAction {
        self.action
    }

    /// Action arguments
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Command text the descriptor came from
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Payload value by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// Already-structured command from a programmatic caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Action name, checked against [`CommandAction`] on conversion
    pub action: String,
    /// Action arguments
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Original command text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl CommandRequest {
    /// Create request with empty payload
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            payload: Map::new(),
            raw: None,
        }
    }

    /// Add payload entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Text recorded for the request in audit entries
    #[must_use]
    pub fn command_text(&self) -> String {
        self.raw.clone().unwrap_or_else(|| self.action.clone())
    }
}

impl TryFrom<CommandRequest> for CommandDescriptor {
    type Error = UnsupportedAction;

    fn try_from(request: CommandRequest) -> Result<Self, Self::Error> {
        let raw = request.command_text();
        let action = request.action.parse()?;
        Ok(Self::new(action, request.payload, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_names_round_trip() {
        for action in CommandAction::ALL {
            assert_eq!(action.as_str().parse::<CommandAction>().unwrap(), action);
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                json!(action.as_str())
            );
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "archive_page".parse::<CommandAction>().unwrap_err();
        assert_eq!(err.action, "archive_page");
    }

    #[test]
    fn request_converts_to_descriptor() {
        let request = CommandRequest::new("mark_contact_read").with("id", json!("abc"));
        let descriptor = CommandDescriptor::try_from(request).unwrap();

        assert_eq!(descriptor.action(), CommandAction::MarkContactRead);
        assert_eq!(descriptor.get("id"), Some(&json!("abc")));
        assert_eq!(descriptor.raw(), "mark_contact_read");
    }

    #[test]
    fn request_deserializes_without_payload() {
        let request: CommandRequest = serde_json::from_value(json!({"action": "list_contacts"})).unwrap();
        assert!(request.payload.is_empty());
        assert!(request.raw.is_none());
    }

    #[test]
    fn resource_types() {
        assert_eq!(CommandAction::PublishPage.resource_type(), "page");
        assert_eq!(CommandAction::CreateComponent.resource_type(), "component");
        assert_eq!(CommandAction::ListContacts.resource_type(), "contact");
    }
}
