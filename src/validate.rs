//! Context Validator
//!
//! Opt-in preflight check of a render context against a template's
//! [`Context`] before any placeholder is extracted.
//!
//! ## Design
//!
//! - The context shape is lowered to JSON Schema ([`Context::to_json_schema`])
//! - The schema is compiled once per template with `jsonschema`, with
//!   `format` asserted (a `date` leaf rejects strings that are not date-times)
//! - Violations carry a JSON pointer and a classification, like the render
//!   errors they pre-empt
//!
//! ## Usage
//!
//! ```rust,ignore
//! let validator = ContextValidator::new(template.context())?;
//! validator.validate(&json!({"user": {"name": "Alice"}}))?;
//! ```

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::context::Context;
use crate::error::{Result, TypelitError};

/// Compiled JSON Schema for one template context
pub struct ContextValidator {
    validator: Validator,
    schema: Value,
}

impl ContextValidator {
    /// Lower `context` to JSON Schema and compile it
    pub fn new(context: &Context) -> Result<Self> {
        let schema = context.to_json_schema();
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| TypelitError::SchemaCompile {
                reason: e.to_string(),
            })?;
        debug!(schema = %schema, "Compiled context validator");
        Ok(Self { validator, schema })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Collect every violation (empty when the value satisfies the context)
    pub fn check(&self, value: &Value) -> Vec<ContextViolation> {
        self.validator
            .iter_errors(value)
            .map(|e| {
                let message = e.to_string();
                ContextViolation {
                    path: e.instance_path.to_string(),
                    kind: classify_error(&e, &message),
                    message,
                }
            })
            .collect()
    }

    /// Fail with [`TypelitError::ContextInvalid`] on the first bad value
    pub fn validate(&self, value: &Value) -> Result<()> {
        let errors = self.check(value);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TypelitError::ContextInvalid { errors })
        }
    }
}

impl fmt::Debug for ContextValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// One mismatch between a context value and the template's requirements
#[derive(Debug, Clone, PartialEq)]
pub struct ContextViolation {
    /// JSON pointer to the offending value (e.g., "/session/user")
    pub path: String,
    pub kind: ViolationKind,
    /// Human-readable message
    pub message: String,
}

impl ContextViolation {
    pub fn other(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ViolationKind::Other,
            message: message.into(),
        }
    }
}

impl fmt::Display for ContextViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}

/// Violation classification
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// A key required by some placeholder is absent
    MissingRequired { field: String },
    /// The value exists but is of the wrong JSON kind
    TypeMismatch { expected: String },
    /// A node no value can satisfy (conflicting placeholders)
    Uninhabitable,
    Other,
}

fn classify_error(error: &jsonschema::ValidationError, message: &str) -> ViolationKind {
    let kind = format!("{:?}", error.kind);

    if kind.contains("Required") {
        let field = extract_quoted(message).unwrap_or_else(|| "unknown".to_string());
        ViolationKind::MissingRequired { field }
    } else if kind.contains("Type") {
        ViolationKind::TypeMismatch {
            expected: extract_type(message).unwrap_or_else(|| "expected".to_string()),
        }
    } else if kind.contains("FalseSchema") {
        ViolationKind::Uninhabitable
    } else {
        ViolationKind::Other
    }
}

/// Extract quoted string from error message
fn extract_quoted(msg: &str) -> Option<String> {
    let start = msg.find('"')?;
    let end = msg[start + 1..].find('"')?;
    Some(msg[start + 1..start + 1 + end].to_string())
}

/// Extract type name from error message (last one wins: "23 is not of type \"string\"")
fn extract_type(msg: &str) -> Option<String> {
    ["string", "integer", "number", "boolean", "array", "object", "null"]
        .into_iter()
        .filter_map(|t| msg.rfind(&format!("\"{t}\"")).map(|pos| (pos, t)))
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, t)| t.to_string())
}
