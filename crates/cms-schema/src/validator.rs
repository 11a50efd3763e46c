//! Compiled validators
//!
//! A [`Validator`] is the executable form of a Schema Definition. It is built
//! once by the compiler, never mutated afterwards, and checks candidate JSON
//! values field by field, collecting every issue rather than stopping at the
//! first.
//!
//! Objects pass unknown keys through untouched; only declared fields are
//! checked.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Primitive leaf kinds a schema tag can name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Boolean,
    /// Anything, including a missing value
    Any,
    /// Unrecognized tag; validates like [`PrimitiveKind::Any`]
    Unknown(String),
}

impl PrimitiveKind {
    /// Resolve a tag name (without optionality suffix)
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "any" => Self::Any,
            _ => Self::Unknown(tag.trim().to_string()),
        }
    }

    /// Display name used in issue messages
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether this kind constrains nothing
    #[inline]
    #[must_use]
    pub fn is_permissive(&self) -> bool {
        matches!(self, Self::Any | Self::Unknown(_))
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Any | Self::Unknown(_) => true,
        }
    }
}

/// Executable validator tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Validator {
    /// Leaf value
    Primitive {
        /// Accepted kind
        kind: PrimitiveKind,
        /// Whether the value may be absent
        optional: bool,
    },
    /// Homogeneous array
    Array {
        /// Validator applied to every element
        element: Box<Validator>,
        /// Whether the array may be absent
        optional: bool,
    },
    /// Record with a fixed set of checked fields
    Object {
        /// Field validators, in declaration order
        fields: IndexMap<String, Validator>,
        /// Whether the object may be absent
        optional: bool,
    },
}

impl Validator {
    /// Required validator accepting anything
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self::Primitive {
            kind: PrimitiveKind::Any,
            optional: false,
        }
    }

    /// Whether the validator was declared optional
    #[inline]
    #[must_use]
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Primitive { optional, .. }
            | Self::Array { optional, .. }
            | Self::Object { optional, .. } => *optional,
        }
    }

    /// Whether this is an object validator
    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Field validators when this is an object validator
    #[must_use]
    pub fn fields(&self) -> Option<&IndexMap<String, Validator>> {
        match self {
            Self::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Check a candidate value
    ///
    /// Returns the parsed value (declared fields checked, unknown fields kept)
    /// or every issue found.
    ///
    /// # Errors
    /// Returns the collected issues when the candidate does not conform.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<Issue>> {
        let mut issues = Vec::new();
        let mut path = Vec::new();
        let parsed = self.check(Some(value), &mut path, &mut issues);

        if issues.is_empty() {
            Ok(parsed.unwrap_or(Value::Null))
        } else {
            Err(issues)
        }
    }

    fn accepts_missing(&self) -> bool {
        match self {
            Self::Primitive { kind, optional } => *optional || kind.is_permissive(),
            Self::Array { optional, .. } | Self::Object { optional, .. } => *optional,
        }
    }

    fn check(
        &self,
        value: Option<&Value>,
        path: &mut Vec<String>,
        issues: &mut Vec<Issue>,
    ) -> Option<Value> {
        let Some(value) = value else {
            if !self.accepts_missing() {
                issues.push(Issue::new(path.clone(), "Required"));
            }
            return None;
        };

        match self {
            Self::Primitive { kind, .. } => {
                if kind.accepts(value) {
                    Some(value.clone())
                } else {
                    issues.push(Issue::mismatch(path, kind.name(), value));
                    None
                }
            }
            Self::Array { element, .. } => {
                let Value::Array(items) = value else {
                    issues.push(Issue::mismatch(path, "array", value));
                    return None;
                };

                let mut parsed = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push(index.to_string());
                    if let Some(item) = element.check(Some(item), path, issues) {
                        parsed.push(item);
                    }
                    path.pop();
                }
                Some(Value::Array(parsed))
            }
            Self::Object { fields, .. } => {
                let Value::Object(map) = value else {
                    issues.push(Issue::mismatch(path, "object", value));
                    return None;
                };

                let mut parsed = map.clone();
                for (name, field) in fields {
                    path.push(name.clone());
                    if let Some(field_value) = field.check(map.get(name), path, issues) {
                        parsed.insert(name.clone(), field_value);
                    }
                    path.pop();
                }
                Some(Value::Object(parsed))
            }
        }
    }
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Field path from the validated root (array indices as decimal strings)
    pub path: Vec<String>,
    /// Human-readable message
    pub message: String,
}

impl Issue {
    /// Create issue at path
    #[must_use]
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    fn mismatch(path: &[String], expected: &str, received: &Value) -> Self {
        Self::new(
            path.to_vec(),
            format!("Expected {expected}, received {}", runtime_type(received)),
        )
    }

    /// Dotted form of the path (`images.0`), empty at the root
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// Whether the path starts with the given field
    #[inline]
    #[must_use]
    pub fn starts_with(&self, field: &str) -> bool {
        self.path.first().is_some_and(|head| head == field)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Runtime type name of a JSON value, as used in issue messages
#[must_use]
pub fn runtime_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
