// The #[error] attribute from thiserror uses struct fields via string interpolation,
// but Rust's unused_assignments lint doesn't recognize this.
#![allow(unused_assignments)]

//! Typelit Error Types with Error Codes
//!
//! Error code ranges:
//! - TYPELIT-001-009: Path errors
//! - TYPELIT-010-019: Shape errors
//! - TYPELIT-020-029: Template construction errors
//! - TYPELIT-030-039: Render errors
//! - TYPELIT-040-049: Context validation errors
//! - TYPELIT-050-059: Configuration errors

use miette::Diagnostic;
use thiserror::Error;

use crate::validate::ContextViolation;

pub type Result<T> = std::result::Result<T, TypelitError>;

/// Format context violations for display
fn format_violations(errors: &[ContextViolation]) -> String {
    if errors.is_empty() {
        return "no errors".to_string();
    }
    if errors.len() == 1 {
        return errors[0].to_string();
    }
    format!(
        "{} errors: {}",
        errors.len(),
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    )
}

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// Implements both `thiserror::Error` for std error compatibility
/// and `miette::Diagnostic` for fancy terminal error display.
#[derive(Error, Debug, Diagnostic)]
#[diagnostic(url(docsrs))]
pub enum TypelitError {
    // ═══════════════════════════════════════════
    // PATH ERRORS (001-009)
    // ═══════════════════════════════════════════
    #[error("[TYPELIT-001] Placeholder path must have at least one segment")]
    #[diagnostic(
        code(typelit::empty_path),
        help("Pass at least one key, e.g. string([\"user\", \"name\"])")
    )]
    EmptyPath,

    #[error("[TYPELIT-002] Invalid path '{path}': {reason}")]
    #[diagnostic(code(typelit::invalid_path))]
    InvalidPath { path: String, reason: String },

    // ═══════════════════════════════════════════
    // SHAPE ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[TYPELIT-010] Conflicting requirements at '{path}': {left} vs {right}")]
    #[diagnostic(
        code(typelit::shape_conflict),
        help("Two placeholders expect incompatible values at the same path")
    )]
    ShapeConflict {
        path: String,
        left: String,
        right: String,
    },

    // ═══════════════════════════════════════════
    // TEMPLATE ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error(
        "[TYPELIT-020] Template needs {} fragments for {placeholders} placeholders, got {fragments}",
        .placeholders + 1
    )]
    #[diagnostic(code(typelit::fragment_count_mismatch))]
    FragmentCountMismatch {
        fragments: usize,
        placeholders: usize,
    },

    // ═══════════════════════════════════════════
    // RENDER ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[TYPELIT-030] Path '{path}' not found in context (while resolving '{full_path}')")]
    #[diagnostic(code(typelit::path_not_found))]
    PathNotFound { path: String, full_path: String },

    #[error("[TYPELIT-031] Cannot traverse '{segment}' on {value_type} (expected object) in '{full_path}'")]
    #[diagnostic(code(typelit::invalid_traversal))]
    InvalidTraversal {
        segment: String,
        value_type: String,
        full_path: String,
    },

    #[error("[TYPELIT-032] Value at '{path}' is not a valid {expected}: {details}")]
    #[diagnostic(code(typelit::leaf_type_mismatch))]
    LeafTypeMismatch {
        path: String,
        expected: String,
        details: String,
    },

    #[error("[TYPELIT-033] Context serialization failed: {0}")]
    #[diagnostic(code(typelit::context_serialize))]
    ContextSerialize(#[from] serde_json::Error),

    // ═══════════════════════════════════════════
    // VALIDATION ERRORS (040-049)
    // ═══════════════════════════════════════════
    #[error("[TYPELIT-040] Context does not match template: {}", format_violations(.errors))]
    #[diagnostic(code(typelit::context_invalid))]
    ContextInvalid { errors: Vec<ContextViolation> },

    #[error("[TYPELIT-041] Failed to compile context schema: {reason}")]
    #[diagnostic(code(typelit::schema_compile))]
    SchemaCompile { reason: String },

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (050-059)
    // ═══════════════════════════════════════════
    #[error("[TYPELIT-050] Configuration error: {reason}")]
    #[diagnostic(code(typelit::config_error))]
    ConfigError { reason: String },
}

impl TypelitError {
    /// Get the error code (e.g., "TYPELIT-001")
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPath => "TYPELIT-001",
            Self::InvalidPath { .. } => "TYPELIT-002",
            Self::ShapeConflict { .. } => "TYPELIT-010",
            Self::FragmentCountMismatch { .. } => "TYPELIT-020",
            Self::PathNotFound { .. } => "TYPELIT-030",
            Self::InvalidTraversal { .. } => "TYPELIT-031",
            Self::LeafTypeMismatch { .. } => "TYPELIT-032",
            Self::ContextSerialize(_) => "TYPELIT-033",
            Self::ContextInvalid { .. } => "TYPELIT-040",
            Self::SchemaCompile { .. } => "TYPELIT-041",
            Self::ConfigError { .. } => "TYPELIT-050",
        }
    }

    /// Check if the error comes from the context passed at render time
    /// (as opposed to an authoring mistake in the template itself)
    pub fn is_context_error(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. }
                | Self::InvalidTraversal { .. }
                | Self::LeafTypeMismatch { .. }
                | Self::ContextSerialize(_)
                | Self::ContextInvalid { .. }
        )
    }
}

impl FixSuggestion for TypelitError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            TypelitError::EmptyPath => Some("Give every placeholder at least one path segment"),
            TypelitError::InvalidPath { .. } => {
                Some("Dotted paths cannot contain empty segments like 'a..b'")
            }
            TypelitError::ShapeConflict { .. } => {
                Some("Rename one of the placeholders or use the same leaf kind for both")
            }
            TypelitError::FragmentCountMismatch { .. } => {
                Some("Provide exactly one more text fragment than placeholders")
            }
            TypelitError::PathNotFound { .. } => Some("Add the missing key to the render context"),
            TypelitError::InvalidTraversal { .. } => {
                Some("Intermediate path segments must point at JSON objects")
            }
            TypelitError::LeafTypeMismatch { .. } => {
                Some("Check the value type at this path matches the placeholder kind")
            }
            TypelitError::ContextSerialize(_) => {
                Some("Context must serialize to JSON (map keys must be strings)")
            }
            TypelitError::ContextInvalid { .. } => {
                Some("Compare the context with Template::context() to see the required shape")
            }
            TypelitError::SchemaCompile { .. } => {
                Some("Check custom LeafType schemas are valid JSON Schema")
            }
            TypelitError::ConfigError { .. } => {
                Some("Check typelit.toml and TYPELIT_* environment variables")
            }
        }
    }
}
