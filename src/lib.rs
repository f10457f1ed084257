//! Typelit - typed string templates with merged context shapes
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       PLACEHOLDERS                           │
//! │  path/      Key paths and context traversal                  │
//! │  leaf/      Leaf descriptors (JsonTypes, LeafType)           │
//! │  var/       Var<T>, Kind<T>, create_type                     │
//! │  kinds/     Built-in kinds: boolean, string, number, ...     │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SHAPE MERGING                         │
//! │  shape/     Shape trees, group intersection, conflicts       │
//! │  context/   Required render context of a placeholder list   │
//! │  validate/  Opt-in JSON Schema preflight (jsonschema)        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          TEMPLATES                           │
//! │  template/  Template, TemplateBuilder, typelit! macro        │
//! │  config/    TemplateOptions (TOML + env)                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use typelit::{kinds, typelit};
//! use serde_json::json;
//!
//! let template = typelit!(
//!     "Hi ", kinds::string(["session", "user", "name"]),
//!     ", you are ", kinds::number(["session", "user", "age"]), "."
//! )?;
//!
//! assert_eq!(
//!     template.context().to_string(),
//!     "{ session: { user: { name: string, age: number } } }"
//! );
//!
//! let ctx = json!({"session": {"user": {"name": "Toto", "age": 23}}});
//! assert_eq!(template.render(&ctx)?, "Hi Toto, you are 23.");
//! # Ok::<(), typelit::TypelitError>(())
//! ```

// ═══════════════════════════════════════════════════════════════
// PLACEHOLDERS
// ═══════════════════════════════════════════════════════════════
pub mod kinds;
pub mod leaf;
pub mod path;
pub mod var;

// ═══════════════════════════════════════════════════════════════
// SHAPE MERGING
// ═══════════════════════════════════════════════════════════════
pub mod context;
pub mod shape;
pub mod validate;

// ═══════════════════════════════════════════════════════════════
// TEMPLATES
// ═══════════════════════════════════════════════════════════════
pub mod config;
pub mod error;
pub mod template;

// ═══════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

// Error types
pub use error::{FixSuggestion, Result, TypelitError};

// Placeholders
pub use leaf::{JsonTypes, LeafType};
pub use path::{IntoPath, Path};
pub use var::{create_type, CreateOptions, Kind, Placeholder, Stringify, Var};

// Shapes
pub use context::Context;
pub use shape::{Conflict, ObjectShape, Shape};
pub use validate::{ContextValidator, ContextViolation, ViolationKind};

// Templates
pub use config::{TemplateOptions, Validation};
pub use template::{IntoPlaceholder, Template, TemplateBuilder, TemplatePart};
