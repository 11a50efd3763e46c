//! Admin command grammar
//!
//! Four verb phrases are recognized, matched case-insensitively while
//! arguments keep their case:
//!
//! ```text
//! create page <path> [title="..."] [components=<JSON array>]
//! publish page <path-or-id>
//! delete page <path-or-id>
//! create component <type> [displayName="..."] [propsSchema=<JSON object>]
//! ```
//!
//! `title=` and `displayName=` take a double-quoted, single-quoted or bare
//! value. `components=` and `propsSchema=` consume the rest of the command,
//! minus one trailing semicolon.

use crate::descriptor::{CommandAction, CommandDescriptor};
use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::str::FromStr;

static CREATE_PAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^create\s+page(?:\s+(?P<rest>.*))?$").expect("valid regex"));
static PUBLISH_OR_DELETE_PAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(?P<verb>publish|delete)\s+page(?:\s+(?P<rest>.*))?$").expect("valid regex")
});
static CREATE_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^create\s+component(?:\s+(?P<rest>.*))?$").expect("valid regex")
});

static TITLE: Lazy<Regex> = Lazy::new(|| quoted_argument("title"));
static DISPLAY_NAME: Lazy<Regex> = Lazy::new(|| quoted_argument("displayName"));
static ARGUMENT_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+=").expect("valid regex"));

fn quoted_argument(name: &str) -> Regex {
    Regex::new(&format!(r#"(?i)\b{name}=(?:"([^"]*)"|'([^']*)'|(\S+))"#)).expect("valid regex")
}

/// Parse one admin command
///
/// # Errors
/// - [`ParseError::Unsupported`] when no verb phrase matches
/// - [`ParseError::MissingTarget`] when the path, id or type token is absent
/// - [`ParseError::InvalidJson`] / [`ParseError::WrongShape`] for bad JSON arguments
pub fn parse(command: &str) -> Result<CommandDescriptor, ParseError> {
    let text = command.trim();

    let descriptor = if let Some(caps) = CREATE_PAGE.captures(text) {
        parse_create_page(rest(&caps), command)?
    } else if let Some(caps) = PUBLISH_OR_DELETE_PAGE.captures(text) {
        let action = if caps["verb"].eq_ignore_ascii_case("publish") {
            CommandAction::PublishPage
        } else {
            CommandAction::DeletePage
        };
        parse_page_target(action, rest(&caps), command)?
    } else if let Some(caps) = CREATE_COMPONENT.captures(text) {
        parse_create_component(rest(&caps), command)?
    } else {
        return Err(ParseError::Unsupported);
    };

    tracing::debug!(action = %descriptor.action(), "parsed admin command");
    Ok(descriptor)
}

impl FromStr for CommandDescriptor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn rest<'t>(caps: &Captures<'t>) -> &'t str {
    caps.name("rest").map_or("", |m| m.as_str().trim())
}

fn parse_create_page(rest: &str, raw: &str) -> Result<CommandDescriptor, ParseError> {
    let (head, components) = split_json_argument(rest, "components");
    let (path, options) = target_token(head).ok_or(ParseError::MissingTarget("Page path is required"))?;

    let mut payload = Map::new();
    payload.insert("path".into(), Value::String(path.to_string()));
    if let Some(title) = quoted_value(&TITLE, options) {
        payload.insert("title".into(), Value::String(title));
    }

    let layout = match components {
        Some(json) => match parse_json("components", json)? {
            layout @ Value::Array(_) => layout,
            _ => {
                return Err(ParseError::WrongShape {
                    argument: "components",
                    expected: "array",
                })
            }
        },
        None => Value::Array(Vec::new()),
    };
    payload.insert("layout".into(), layout);

    Ok(CommandDescriptor::new(CommandAction::CreatePage, payload, raw))
}

fn parse_page_target(
    action: CommandAction,
    rest: &str,
    raw: &str,
) -> Result<CommandDescriptor, ParseError> {
    let (target, _) =
        target_token(rest).ok_or(ParseError::MissingTarget("Page path or id is required"))?;

    let mut payload = Map::new();
    payload.insert("target".into(), Value::String(target.to_string()));
    Ok(CommandDescriptor::new(action, payload, raw))
}

fn parse_create_component(rest: &str, raw: &str) -> Result<CommandDescriptor, ParseError> {
    let (head, props_schema) = split_json_argument(rest, "propsSchema");
    let (component_type, options) =
        target_token(head).ok_or(ParseError::MissingTarget("Component type is required"))?;

    let mut payload = Map::new();
    payload.insert("type".into(), Value::String(component_type.to_string()));
    if let Some(display_name) = quoted_value(&DISPLAY_NAME, options) {
        payload.insert("displayName".into(), Value::String(display_name));
    }

    if let Some(json) = props_schema {
        match parse_json("propsSchema", json)? {
            schema @ Value::Object(_) => {
                payload.insert("propsSchema".into(), schema);
            }
            _ => {
                return Err(ParseError::WrongShape {
                    argument: "propsSchema",
                    expected: "object",
                })
            }
        }
    }

    Ok(CommandDescriptor::new(CommandAction::CreateComponent, payload, raw))
}

/// Split off a trailing `name=<JSON>` argument, returning the text before it
///
/// The key matches case-insensitively at a word boundary, and never inside a
/// quoted argument value such as `title="..."`.
fn split_json_argument<'t>(rest: &'t str, name: &str) -> (&'t str, Option<&'t str>) {
    let key = format!("{name}=");
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (i, c) in rest.char_indices() {
        match quote {
            Some(open) => {
                if c == open {
                    quote = None;
                }
            }
            None if matches!(c, '"' | '\'') && prev == Some('=') => quote = Some(c),
            None => {
                let at_boundary = prev.map_or(true, |p| !(p.is_alphanumeric() || p == '_'));
                let is_key = rest[i..]
                    .get(..key.len())
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(&key));
                if at_boundary && is_key {
                    return (&rest[..i], Some(&rest[i + key.len()..]));
                }
            }
        }
        prev = Some(c);
    }

    (rest, None)
}

/// First whitespace-delimited token, unless it is already a `key=` argument
fn target_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let token = &text[..end];

    if token.is_empty() || ARGUMENT_KEY.is_match(token) {
        None
    } else {
        Some((token, &text[end..]))
    }
}

fn quoted_value(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

fn parse_json(argument: &'static str, raw: &str) -> Result<Value, ParseError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();

    serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidJson {
        argument,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(descriptor: &CommandDescriptor) -> Value {
        Value::Object(descriptor.payload().clone())
    }

    #[test]
    fn create_page_with_title_and_components() {
        let cmd = r#"create page /svc title="Our Services" components=[{"type":"Hero","props":{}}]"#;
        let descriptor = parse(cmd).unwrap();

        assert_eq!(descriptor.action(), CommandAction::CreatePage);
        assert_eq!(
            payload(&descriptor),
            json!({
                "path": "/svc",
                "title": "Our Services",
                "layout": [{"type": "Hero", "props": {}}]
            })
        );
        assert_eq!(descriptor.raw(), cmd);
    }

    #[test]
    fn argument_key_inside_quoted_title_is_text() {
        let descriptor =
            parse(r#"create page /x title="Add components=here" components=[]"#).unwrap();
        assert_eq!(
            payload(&descriptor),
            json!({"path": "/x", "title": "Add components=here", "layout": []})
        );
    }

    #[test]
    fn argument_key_inside_quoted_display_name_is_text() {
        let descriptor = parse(
            r#"create component Card displayName='Uses propsSchema=x' propsSchema={"title":"string"}"#,
        )
        .unwrap();
        assert_eq!(descriptor.get("displayName"), Some(&json!("Uses propsSchema=x")));
        assert_eq!(descriptor.get("propsSchema"), Some(&json!({"title": "string"})));
    }

    #[test]
    fn argument_key_needs_word_boundary() {
        let descriptor = parse("create page /x title=mycomponents=1").unwrap();
        assert_eq!(descriptor.get("title"), Some(&json!("mycomponents=1")));
        assert_eq!(descriptor.get("layout"), Some(&json!([])));
    }

    #[test]
    fn create_page_defaults_to_empty_layout() {
        let descriptor = parse("create page /about").unwrap();
        assert_eq!(payload(&descriptor), json!({"path": "/about", "layout": []}));
    }

    #[test]
    fn title_forms() {
        for (cmd, expected) in [
            ("create page /a title='Single Quoted'", "Single Quoted"),
            (r#"create page /a title="Double Quoted""#, "Double Quoted"),
            ("create page /a title=Bare", "Bare"),
        ] {
            let descriptor = parse(cmd).unwrap();
            assert_eq!(descriptor.get("title"), Some(&json!(expected)), "{cmd}");
        }
    }

    #[test]
    fn keywords_are_case_insensitive_arguments_are_not() {
        let descriptor = parse("CREATE Page /About TITLE=Team").unwrap();
        assert_eq!(descriptor.get("path"), Some(&json!("/About")));
        assert_eq!(descriptor.get("title"), Some(&json!("Team")));
    }

    #[test]
    fn trailing_semicolon_is_trimmed() {
        let descriptor = parse(r#"create page /x components=[{"type":"Hero"}];"#).unwrap();
        assert_eq!(descriptor.get("layout"), Some(&json!([{"type": "Hero"}])));
    }

    #[test]
    fn components_must_be_array() {
        let err = parse(r#"create page /x components={"type":"Hero"}"#).unwrap_err();
        assert_eq!(err.to_string(), "components must be a JSON array");
    }

    #[test]
    fn malformed_components_json_includes_parser_message() {
        let err = parse("create page /x components=[{").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson { argument: "components", .. }));
        assert!(err.to_string().starts_with("Invalid components JSON: "));
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn missing_page_path() {
        assert_eq!(
            parse("create page").unwrap_err(),
            ParseError::MissingTarget("Page path is required")
        );
        assert_eq!(
            parse("create page title=Home").unwrap_err(),
            ParseError::MissingTarget("Page path is required")
        );
    }

    #[test]
    fn publish_and_delete_take_target() {
        let publish = parse("publish page /about").unwrap();
        assert_eq!(publish.action(), CommandAction::PublishPage);
        assert_eq!(payload(&publish), json!({"target": "/about"}));

        let delete = parse("Delete page 64b7f0c2a1e4d93f5c2b1a0e").unwrap();
        assert_eq!(delete.action(), CommandAction::DeletePage);
        assert_eq!(delete.get("target"), Some(&json!("64b7f0c2a1e4d93f5c2b1a0e")));
    }

    #[test]
    fn publish_without_target() {
        assert_eq!(
            parse("publish page").unwrap_err().to_string(),
            "Page path or id is required"
        );
    }

    #[test]
    fn create_component_with_schema() {
        let descriptor = parse(
            r#"create component Hero displayName="Hero Banner" propsSchema={"headline":"string","images":{"type":"array","items":"string"}}"#,
        )
        .unwrap();

        assert_eq!(descriptor.action(), CommandAction::CreateComponent);
        assert_eq!(
            payload(&descriptor),
            json!({
                "type": "Hero",
                "displayName": "Hero Banner",
                "propsSchema": {"headline": "string", "images": {"type": "array", "items": "string"}}
            })
        );
    }

    #[test]
    fn props_schema_must_be_object() {
        let err = parse(r#"create component Hero propsSchema=["string"]"#).unwrap_err();
        assert_eq!(err.to_string(), "propsSchema must be a JSON object");
    }

    #[test]
    fn unsupported_commands() {
        for cmd in ["frobnicate page /x", "", "create pages /x", "list contacts"] {
            assert_eq!(parse(cmd).unwrap_err(), ParseError::Unsupported, "{cmd:?}");
        }
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let descriptor: CommandDescriptor = "publish page /".parse().unwrap();
        assert_eq!(descriptor.get("target"), Some(&json!("/")));
    }
}
