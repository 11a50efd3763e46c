//! Core types for CMS commands
//!
//! Records exchanged with the collaborator stores, plus the small pure
//! helpers the executor needs (slug derivation, target resolution, ids).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of a hex object id
pub const OBJECT_ID_LEN: usize = 24;

/// Generate a new 24-hex-character object id
#[must_use]
pub fn new_object_id() -> String {
    hex::encode(rand::random::<[u8; OBJECT_ID_LEN / 2]>())
}

/// One entry of a page layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Registered component type
    #[serde(rename = "type")]
    pub block_type: String,
    /// Component props
    #[serde(default)]
    pub props: Value,
}

/// Page publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Not visible on the site
    Draft,
    /// Live
    Published,
}

/// Page as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Object id
    pub id: String,
    /// Site path (`/about`)
    pub path: String,
    /// Path-derived slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Publication status
    pub status: PageStatus,
    /// Validated blocks, in order
    pub layout: Vec<Block>,
    /// Creating actor
    pub created_by: Option<String>,
    /// Last modifying actor
    pub updated_by: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
}

/// Page creation payload handed to the page store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPage {
    /// Site path
    pub path: String,
    /// Path-derived slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Initial status (always draft from the executor)
    pub status: PageStatus,
    /// Validated blocks
    pub layout: Vec<Block>,
}

/// Registered block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Object id
    pub id: String,
    /// Unique type name
    #[serde(rename = "type")]
    pub component_type: String,
    /// Admin-facing name
    pub display_name: String,
    /// Schema Definition for props, if any
    pub props_schema: Option<Value>,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Component registration payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    /// Unique type name
    #[serde(rename = "type")]
    pub component_type: String,
    /// Admin-facing name; registries fall back to the type when blank
    #[serde(default)]
    pub display_name: String,
    /// Schema Definition for props
    #[serde(default)]
    pub props_schema: Option<Value>,
}

impl NewComponent {
    /// Create registration without a schema
    #[must_use]
    pub fn new(component_type: impl Into<String>) -> Self {
        let component_type = component_type.into();
        Self {
            display_name: component_type.clone(),
            component_type,
            props_schema: None,
        }
    }

    /// With props schema
    #[must_use]
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.props_schema = Some(schema);
        self
    }

    /// Display name, or the type when none was given
    #[must_use]
    pub fn effective_display_name(&self) -> &str {
        match self.display_name.trim() {
            "" => &self.component_type,
            name => name,
        }
    }

    /// With display name
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// Object id
    pub id: String,
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Message body
    pub message: String,
    /// Whether an admin has read it
    #[serde(default)]
    pub read: bool,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Create unread submission stamped now
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: new_object_id(),
            name: name.into(),
            email: email.into(),
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// How a publish/delete target token addresses a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// 24-hex object id
    Id(String),
    /// Site path
    Path(String),
}

impl PageTarget {
    /// Classify a target token
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if token.len() == OBJECT_ID_LEN && token.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::Id(token.to_string())
        } else {
            Self::Path(token.to_string())
        }
    }
}

/// Derive a page slug from its path
///
/// `/` becomes `home`; otherwise surrounding slashes are stripped and inner
/// slashes become hyphens. An empty result becomes `page`.
#[must_use]
pub fn derive_slug(path: &str) -> String {
    let path = path.trim();
    if path == "/" {
        return "home".to_string();
    }

    let slug = path.trim_matches('/').replace('/', "-");
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slugs() {
        assert_eq!(derive_slug("/"), "home");
        assert_eq!(derive_slug("/about"), "about");
        assert_eq!(derive_slug("/about/team"), "about-team");
        assert_eq!(derive_slug("services/"), "services");
        assert_eq!(derive_slug(""), "page");
        assert_eq!(derive_slug("//"), "page");
    }

    #[test]
    fn target_classification() {
        assert_eq!(
            PageTarget::parse("64b7f0c2a1e4d93f5c2b1a0e"),
            PageTarget::Id("64b7f0c2a1e4d93f5c2b1a0e".into())
        );
        assert_eq!(PageTarget::parse("/about"), PageTarget::Path("/about".into()));
        // 24 chars, not all hex
        assert_eq!(
            PageTarget::parse("zzb7f0c2a1e4d93f5c2b1a0e"),
            PageTarget::Path("zzb7f0c2a1e4d93f5c2b1a0e".into())
        );
    }

    #[test]
    fn object_ids_are_hex() {
        let id = new_object_id();
        assert_eq!(id.len(), OBJECT_ID_LEN);
        assert!(matches!(PageTarget::parse(&id), PageTarget::Id(_)));
        assert_ne!(id, new_object_id());
    }

    #[test]
    fn display_name_defaults_to_type() {
        let component: NewComponent = serde_json::from_value(json!({"type": "Divider"})).unwrap();
        assert_eq!(component.display_name, "");
        assert_eq!(component.effective_display_name(), "Divider");
        assert_eq!(
            NewComponent::new("Hero").with_display_name("Hero Banner").effective_display_name(),
            "Hero Banner"
        );
    }

    #[test]
    fn block_serde_uses_type_key() {
        let block: Block = serde_json::from_value(json!({"type": "Hero"})).unwrap();
        assert_eq!(block.block_type, "Hero");
        assert_eq!(block.props, Value::Null);
        assert_eq!(serde_json::to_value(&block).unwrap()["type"], "Hero");
    }
}
