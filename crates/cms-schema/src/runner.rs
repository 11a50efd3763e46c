//! Validator runner
//!
//! Applies a [`CompiledSchema`] to block props. Object schemas validate the
//! candidate directly. Wrapped schemas accept either an already-wrapped
//! candidate or a bare one, which is retried as `{ "<field>": candidate }`
//! and unwrapped again on success.

use crate::compiler::{CompiledSchema, SchemaKind};
use crate::error::ValidationFailure;
use crate::validator::Issue;
use serde::Serialize;
use serde_json::{Map, Value};

/// Where the validated block sits in its layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext<'a> {
    /// Component type of the block
    pub block_type: &'a str,
    /// 0-based index within the layout
    pub index: usize,
}

impl<'a> BlockContext<'a> {
    /// Create context for block
    #[inline]
    #[must_use]
    pub fn new(block_type: &'a str, index: usize) -> Self {
        Self { block_type, index }
    }
}

/// Which attempt accepted the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    /// Candidate validated as given
    Direct,
    /// Candidate validated inside the wrapper field
    Wrapped,
}

/// Successfully validated props
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Parsed value, shaped like the candidate
    pub data: Value,
    /// Attempt that succeeded
    pub attempt: Attempt,
}

/// Outcome of a single validation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Candidate conforms
    Success {
        /// Parsed value
        data: Value,
    },
    /// Candidate rejected
    Failure {
        /// Structured issues
        issues: Vec<Issue>,
    },
}

impl ValidationResult {
    /// Whether the pass succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Issue strings (`path: message`), empty on success
    #[must_use]
    pub fn issues(&self) -> Vec<String> {
        match self {
            Self::Success { .. } => Vec::new(),
            Self::Failure { issues } => issues.iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<Result<Value, Vec<Issue>>> for ValidationResult {
    fn from(result: Result<Value, Vec<Issue>>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(issues) => Self::Failure { issues },
        }
    }
}

impl CompiledSchema {
    /// Single validation pass against the root validator, no wrapping
    #[must_use]
    pub fn check(&self, candidate: &Value) -> ValidationResult {
        self.validator().validate(candidate).into()
    }
}

/// Validate block props against a compiled schema
///
/// # Errors
/// Returns [`ValidationFailure`] naming the block type and index when every
/// applicable attempt rejects the candidate.
pub fn run(
    schema: &CompiledSchema,
    candidate: &Value,
    context: BlockContext<'_>,
) -> Result<Validated, ValidationFailure> {
    let direct = match schema.check(candidate) {
        ValidationResult::Success { data } => {
            return Ok(Validated {
                data,
                attempt: Attempt::Direct,
            })
        }
        ValidationResult::Failure { issues } => issues,
    };

    let issues = match schema.kind() {
        SchemaKind::Object => direct,
        SchemaKind::Wrapped(field) => {
            let mut wrapper = Map::with_capacity(1);
            wrapper.insert(field.clone(), candidate.clone());

            match schema.check(&Value::Object(wrapper)) {
                ValidationResult::Success { mut data } => {
                    let inner = data
                        .as_object_mut()
                        .and_then(|map| map.remove(field))
                        .unwrap_or(Value::Null);
                    tracing::trace!(
                        block = context.block_type,
                        index = context.index,
                        "props accepted through wrapper field"
                    );
                    return Ok(Validated {
                        data: inner,
                        attempt: Attempt::Wrapped,
                    });
                }
                ValidationResult::Failure { issues } => issues,
            }
        }
    };

    Err(ValidationFailure::new(
        context.block_type,
        context.index,
        candidate,
        issues,
    ))
}
