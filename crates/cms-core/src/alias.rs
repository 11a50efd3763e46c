//! Field alias normalization
//!
//! Legacy commands supply a single `backgroundImage` where current schemas
//! declare an `images` field. When the raw Schema Definition declares
//! `images` as a string or an array-shaped node, and the props carry a
//! `backgroundImage` but no `images`, the value is copied across. A scalar
//! is wrapped in a one-element array; an array passes through unchanged.
//! Tags are matched the way the compiler reads them (trimmed, any case,
//! optional `?` suffix).
//!
//! Normalization runs against the raw definition, before compilation.

use cms_schema::{compiler::is_leaf_node, runtime_type};
use serde_json::{Map, Value};

/// Legacy singular field
pub const SOURCE_FIELD: &str = "backgroundImage";

/// Current field it stands in for
pub const TARGET_FIELD: &str = "images";

/// Alias normalization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasError {
    /// Source value cannot stand in for the target field
    #[error("{SOURCE_FIELD} must be a string or array to alias {TARGET_FIELD}, received {found}")]
    UnsupportedValue {
        /// Runtime type of the source value
        found: &'static str,
    },
}

/// What normalization did to the props
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOutcome {
    /// Props left untouched
    Unchanged,
    /// Source value promoted into the target field
    Promoted,
}

/// Apply alias rules to block props in place
///
/// # Errors
/// Returns [`AliasError`] when the source value has an unusable type.
pub fn normalize(props: &mut Value, definition: &Value) -> Result<AliasOutcome, AliasError> {
    let declared = definition
        .as_object()
        .and_then(|fields| fields.get(TARGET_FIELD))
        .is_some_and(declares_target);
    if !declared {
        return Ok(AliasOutcome::Unchanged);
    }

    let Some(props) = props.as_object_mut() else {
        return Ok(AliasOutcome::Unchanged);
    };

    if !matches!(props.get(TARGET_FIELD), None | Some(Value::Null)) {
        return Ok(AliasOutcome::Unchanged);
    }

    let promoted = match props.get(SOURCE_FIELD) {
        None | Some(Value::Null) => return Ok(AliasOutcome::Unchanged),
        Some(Value::String(s)) if s.is_empty() => return Ok(AliasOutcome::Unchanged),
        Some(list @ Value::Array(_)) => list.clone(),
        Some(scalar @ Value::String(_)) => Value::Array(vec![scalar.clone()]),
        Some(other) => {
            return Err(AliasError::UnsupportedValue {
                found: runtime_type(other),
            })
        }
    };

    props.insert(TARGET_FIELD.to_string(), promoted);
    tracing::debug!(from = SOURCE_FIELD, to = TARGET_FIELD, "promoted aliased field");
    Ok(AliasOutcome::Promoted)
}

/// Whether the raw node declares `images` as a string or array-shaped field
fn declares_target(node: &Value) -> bool {
    match node {
        Value::String(tag) => is_target_tag(tag),
        Value::Array(_) => true,
        Value::Object(map) => declares_target_leaf(map),
        _ => false,
    }
}

fn declares_target_leaf(map: &Map<String, Value>) -> bool {
    if !is_leaf_node(map) {
        return false;
    }
    map.contains_key("items") || map.get("type").and_then(Value::as_str).is_some_and(is_target_tag)
}

fn is_target_tag(tag: &str) -> bool {
    let name = tag.trim();
    let name = name.strip_suffix('?').unwrap_or(name);
    name.eq_ignore_ascii_case("string") || name.eq_ignore_ascii_case("array")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn hero_schema() -> Value {
        json!({"headline": "string", "images": {"type": "array", "items": "string"}})
    }

    #[test]
    fn scalar_wrapped_for_array_field() {
        let mut props = json!({"headline": "x", "backgroundImage": "/a.jpg"});
        let outcome = normalize(&mut props, &hero_schema()).unwrap();

        assert_eq!(outcome, AliasOutcome::Promoted);
        assert_eq!(props["images"], json!(["/a.jpg"]));
        assert_eq!(props["backgroundImage"], "/a.jpg");
    }

    #[test]
    fn array_passes_through() {
        let mut props = json!({"backgroundImage": ["/a.jpg", "/b.jpg"]});
        normalize(&mut props, &hero_schema()).unwrap();
        assert_eq!(props["images"], json!(["/a.jpg", "/b.jpg"]));
    }

    #[test]
    fn string_field_wraps_scalar() {
        let mut props = json!({"backgroundImage": "/a.jpg"});
        normalize(&mut props, &json!({"images": "string"})).unwrap();
        assert_eq!(props["images"], json!(["/a.jpg"]));
    }

    #[test]
    fn tags_match_like_the_compiler() {
        for tag in ["Array", " STRING ", "array?", "String?"] {
            let mut props = json!({"backgroundImage": "/a.jpg"});
            let outcome = normalize(&mut props, &json!({"images": tag})).unwrap();
            assert_eq!(outcome, AliasOutcome::Promoted, "tag {tag:?}");
            assert_eq!(props["images"], json!(["/a.jpg"]));
        }

        let mut props = json!({"backgroundImage": "/a.jpg"});
        normalize(&mut props, &json!({"images": {"type": "ARRAY"}})).unwrap();
        assert_eq!(props["images"], json!(["/a.jpg"]));
    }

    #[test]
    fn items_only_node_is_array_shaped() {
        let mut props = json!({"backgroundImage": "/a.jpg"});
        normalize(&mut props, &json!({"images": {"items": "string"}})).unwrap();
        assert_eq!(props["images"], json!(["/a.jpg"]));
    }

    #[test]
    fn existing_target_wins() {
        let mut props = json!({"backgroundImage": "/a.jpg", "images": ["/z.jpg"]});
        let outcome = normalize(&mut props, &hero_schema()).unwrap();
        assert_eq!(outcome, AliasOutcome::Unchanged);
        assert_eq!(props["images"], json!(["/z.jpg"]));
    }

    #[test]
    fn no_target_in_schema() {
        let mut props = json!({"backgroundImage": "/a.jpg"});
        let outcome = normalize(&mut props, &json!({"headline": "string"})).unwrap();
        assert_eq!(outcome, AliasOutcome::Unchanged);
        assert!(props.get("images").is_none());
    }

    #[test]
    fn number_typed_target_ignored() {
        let mut props = json!({"backgroundImage": "/a.jpg"});
        let outcome = normalize(&mut props, &json!({"images": "number"})).unwrap();
        assert_eq!(outcome, AliasOutcome::Unchanged);
    }

    #[test]
    fn unusable_source_is_an_error() {
        let mut props = json!({"backgroundImage": 42});
        let err = normalize(&mut props, &hero_schema()).unwrap_err();
        assert_eq!(err, AliasError::UnsupportedValue { found: "number" });
    }
}
