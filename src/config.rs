//! Template Options
//!
//! Render-time behaviour shared by templates. Options can be loaded from a
//! TOML file (e.g. `typelit.toml`):
//!
//! ```toml
//! validation = "on_render"
//! capacity_hint = 128
//! ```
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`TYPELIT_VALIDATION`, `TYPELIT_CAPACITY_HINT`)
//! 2. Options file
//! 3. Defaults

use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypelitError};

/// Extra bytes reserved for interpolated values when rendering
pub const DEFAULT_CAPACITY_HINT: usize = 64;

/// When a context is checked against the template's JSON Schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Only when `Template::validate` is called explicitly
    #[default]
    Off,
    /// Before every render; the schema is compiled when the template is built
    #[serde(alias = "render")]
    OnRender,
}

impl FromStr for Validation {
    type Err = TypelitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "render" | "on_render" => Ok(Self::OnRender),
            other => Err(TypelitError::ConfigError {
                reason: format!("unknown validation mode '{other}' (expected off or render)"),
            }),
        }
    }
}

/// Options applied to every render of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOptions {
    pub validation: Validation,
    pub capacity_hint: usize,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            validation: Validation::Off,
            capacity_hint: DEFAULT_CAPACITY_HINT,
        }
    }
}

impl TemplateOptions {
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    /// Parse options from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TypelitError::ConfigError {
            reason: format!("Failed to parse options: {}", e),
        })
    }

    /// Load options from a file
    ///
    /// Returns defaults if the file doesn't exist.
    /// Returns error if the file exists but is malformed.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| TypelitError::ConfigError {
            reason: format!("Failed to read options file {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content)
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over file values.
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Same as [`with_env`](Self::with_env) with an explicit variable source
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(mode) = lookup("TYPELIT_VALIDATION").filter(|v| !v.is_empty()) {
            self.validation = mode.parse()?;
        }

        if let Some(hint) = lookup("TYPELIT_CAPACITY_HINT").filter(|v| !v.is_empty()) {
            self.capacity_hint = hint.trim().parse().map_err(|_| TypelitError::ConfigError {
                reason: format!("TYPELIT_CAPACITY_HINT must be a non-negative integer, got '{hint}'"),
            })?;
        }

        Ok(self)
    }
}
