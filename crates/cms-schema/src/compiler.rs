//! Schema Definition compiler
//!
//! Turns the loosely-typed props schema an administrator attaches to a block
//! type into an immutable [`CompiledSchema`].
//!
//! # Node forms
//!
//! | Definition node | Compiles to |
//! |-----------------|-------------|
//! | `"string"`, `"number?"`, `"boolean"`, `"any"` | primitive (`?` marks optional) |
//! | `{ "type": "string", "optional": true }` | primitive |
//! | `{ "type": "array", "items": <node> }` or `{ "items": <node> }` | array |
//! | `{ "title": <node>, ... }` | object |
//!
//! Unknown tags compile to [`PrimitiveKind::Unknown`], which validates like
//! `any`; every occurrence is recorded so callers can warn or reject.
//!
//! A root that is not an object validator is wrapped as an object with a
//! single field named [`WRAPPED_FIELD`]; the resulting [`SchemaKind`] tells
//! the runner to validate candidates through that field.

use crate::error::CompileError;
use crate::validator::{runtime_type, PrimitiveKind, Validator};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Maximum nesting depth accepted by the compiler
pub const MAX_DEPTH: usize = 64;

/// Field name used when wrapping a non-object root
pub const WRAPPED_FIELD: &str = "value";

/// Optionality suffix on primitive tags
const OPTIONAL_SUFFIX: char = '?';

/// Path segment recorded for array elements in unknown-tag paths
const ELEMENT_SEGMENT: &str = "*";

/// How the compiled root relates to the original definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum SchemaKind {
    /// Definition was a mapping; candidates validate as-is
    Object,
    /// Definition was a primitive or array, wrapped under the named field
    Wrapped(String),
}

/// An unrecognized primitive tag found during compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownTag {
    /// Dotted path of the node (`*` marks array elements)
    pub path: String,
    /// Tag as written in the definition
    pub tag: String,
}

/// Compiled, immutable form of a Schema Definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSchema {
    validator: Validator,
    kind: SchemaKind,
    unknown_tags: Vec<UnknownTag>,
}

impl CompiledSchema {
    /// Object-shaped root validator
    #[inline]
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Root shape tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Unrecognized tags, in definition order
    #[inline]
    #[must_use]
    pub fn unknown_tags(&self) -> &[UnknownTag] {
        &self.unknown_tags
    }

    /// Whether any tag was unrecognized
    #[inline]
    #[must_use]
    pub fn has_unknown_tags(&self) -> bool {
        !self.unknown_tags.is_empty()
    }
}

/// Compile a Schema Definition, treating any failure as "no validator"
///
/// `None` means callers should skip strict validation.
#[must_use]
pub fn compile(definition: &Value) -> Option<CompiledSchema> {
    match try_compile(definition) {
        Ok(compiled) => Some(compiled),
        Err(err) => {
            tracing::debug!("schema not compiled: {}", err);
            None
        }
    }
}

/// Compile a Schema Definition
///
/// # Errors
/// - [`CompileError::NotAnObject`] when the root is null, an array, a number
///   or a boolean
/// - [`CompileError::DepthExceeded`] when nesting exceeds [`MAX_DEPTH`]
pub fn try_compile(definition: &Value) -> Result<CompiledSchema, CompileError> {
    if !matches!(definition, Value::Object(_) | Value::String(_)) {
        return Err(CompileError::NotAnObject {
            found: runtime_type(definition),
        });
    }

    let mut compiler = Compiler::default();
    let root = compiler.node(definition, 0)?;

    let (validator, kind) = if root.is_object() {
        (root, SchemaKind::Object)
    } else {
        let mut fields = IndexMap::with_capacity(1);
        fields.insert(WRAPPED_FIELD.to_string(), root);
        (
            Validator::Object {
                fields,
                optional: false,
            },
            SchemaKind::Wrapped(WRAPPED_FIELD.to_string()),
        )
    };

    Ok(CompiledSchema {
        validator,
        kind,
        unknown_tags: compiler.unknown,
    })
}

/// Whether a mapping node describes a leaf rather than a record
///
/// A node bearing a string `type` or an `items` key is a leaf; anything else
/// is a field mapping.
#[must_use]
pub fn is_leaf_node(map: &Map<String, Value>) -> bool {
    matches!(map.get("type"), Some(Value::String(_))) || map.contains_key("items")
}

#[derive(Debug, Default)]
struct Compiler {
    path: Vec<String>,
    unknown: Vec<UnknownTag>,
}

impl Compiler {
    fn node(&mut self, node: &Value, depth: usize) -> Result<Validator, CompileError> {
        if depth > MAX_DEPTH {
            return Err(CompileError::DepthExceeded { max: MAX_DEPTH });
        }

        match node {
            Value::String(tag) => Ok(self.tag(tag, false)),
            Value::Object(map) if is_leaf_node(map) => self.leaf(map, depth),
            Value::Object(map) => self.record(map, depth),
            Value::Null => Ok(Validator::any()),
            other => {
                // Not a tag at all; degrade like any other unrecognized tag
                self.note_unknown(other.to_string());
                Ok(Validator::Primitive {
                    kind: PrimitiveKind::Unknown(other.to_string()),
                    optional: false,
                })
            }
        }
    }

    fn tag(&mut self, raw: &str, force_optional: bool) -> Validator {
        let trimmed = raw.trim();
        let (name, suffixed) = match trimmed.strip_suffix(OPTIONAL_SUFFIX) {
            Some(name) => (name, true),
            None => (trimmed, false),
        };
        let optional = suffixed || force_optional;

        if name.eq_ignore_ascii_case("array") {
            return Validator::Array {
                element: Box::new(Validator::any()),
                optional,
            };
        }

        let kind = PrimitiveKind::from_tag(name);
        if let PrimitiveKind::Unknown(tag) = &kind {
            self.note_unknown(tag.clone());
        }
        Validator::Primitive { kind, optional }
    }

    fn leaf(&mut self, map: &Map<String, Value>, depth: usize) -> Result<Validator, CompileError> {
        let declared = map.get("type").and_then(Value::as_str).unwrap_or("");
        let optional = map.get("optional").and_then(Value::as_bool).unwrap_or(false);

        let is_array = map.contains_key("items")
            || declared
                .trim()
                .trim_end_matches(OPTIONAL_SUFFIX)
                .eq_ignore_ascii_case("array");
        if !is_array {
            return Ok(self.tag(declared, optional));
        }

        let element = match map.get("items") {
            None | Some(Value::Null) => Validator::any(),
            Some(Value::Object(items)) if items.is_empty() => Validator::any(),
            Some(items) => {
                self.path.push(ELEMENT_SEGMENT.to_string());
                let element = self.node(items, depth + 1);
                self.path.pop();
                element?
            }
        };

        Ok(Validator::Array {
            element: Box::new(element),
            optional: optional || declared.trim().ends_with(OPTIONAL_SUFFIX),
        })
    }

    fn record(&mut self, map: &Map<String, Value>, depth: usize) -> Result<Validator, CompileError> {
        let mut fields = IndexMap::with_capacity(map.len());
        for (name, child) in map {
            self.path.push(name.clone());
            let field = self.node(child, depth + 1);
            self.path.pop();
            fields.insert(name.clone(), field?);
        }

        Ok(Validator::Object {
            fields,
            optional: false,
        })
    }

    fn note_unknown(&mut self, tag: String) {
        self.unknown.push(UnknownTag {
            path: self.path.join("."),
            tag,
        });
    }
}
