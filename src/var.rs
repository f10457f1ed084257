//! Placeholders - typed interpolation sites
//!
//! - [`Var<T>`]: one path plus the Rust leaf type `T` it extracts
//! - [`Kind<T>`]: a placeholder factory (leaf descriptor, stringify, optional decode)
//! - [`create_type`]: builds a `Kind<T>` for any leaf type; this is how
//!   every built-in kind in [`crate::kinds`] is defined too
//! - [`Placeholder`]: object-safe seam so templates can hold mixed `Var<T>`s
//!
//! ```text
//! create_type::<T>(options) → Kind<T> ──.var(path)──▶ Var<T>
//!                                                       │
//!                       extract: walk path, decode T
//!                       stringify: T → String
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TypelitError};
use crate::leaf::{json_type_name, LeafType};
use crate::path::{IntoPath, Path};
use crate::shape::Shape;

/// Shared stringify callback
pub type Stringify<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Shared leaf conversion; the error string becomes `LeafTypeMismatch::details`
pub type Decode<T> = Arc<dyn Fn(&Value) -> std::result::Result<T, String> + Send + Sync>;

/// Options for [`create_type`]
pub struct CreateOptions<T> {
    /// Converts an extracted value to text (default: `ToString`)
    pub stringify: Option<Stringify<T>>,
    /// Descriptor used for shape merging and validation (default: [`LeafType::of`])
    pub leaf: Option<LeafType>,
    /// Converts the JSON leaf to `T` (default: serde `Deserialize`)
    pub decode: Option<Decode<T>>,
}

impl<T> Default for CreateOptions<T> {
    fn default() -> Self {
        Self {
            stringify: None,
            leaf: None,
            decode: None,
        }
    }
}

impl<T> CreateOptions<T> {
    /// Options with a custom stringify function
    pub fn stringify(f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            stringify: Some(Arc::new(f)),
            ..Self::default()
        }
    }

    pub fn with_leaf(mut self, leaf: LeafType) -> Self {
        self.leaf = Some(leaf);
        self
    }

    pub fn with_decode(
        mut self,
        f: impl Fn(&Value) -> std::result::Result<T, String> + Send + Sync + 'static,
    ) -> Self {
        self.decode = Some(Arc::new(f));
        self
    }
}

/// Create a placeholder factory for leaf type `T`
///
/// ```rust
/// use typelit::{create_type, CreateOptions};
///
/// let price = create_type::<f64>(CreateOptions::stringify(|n: &f64| format!("{n:.2}")));
/// let var = price.var(["product", "price"]).unwrap();
/// assert_eq!(var.stringify(&3.0), "3.00");
/// ```
pub fn create_type<T>(options: CreateOptions<T>) -> Kind<T>
where
    T: fmt::Display + DeserializeOwned + Send + Sync + 'static,
{
    let stringify: Stringify<T> = match options.stringify {
        Some(stringify) => stringify,
        None => Arc::new(|value: &T| value.to_string()),
    };
    Kind::from_parts(
        options.leaf.unwrap_or_else(LeafType::of::<T>),
        stringify,
        options.decode,
    )
}

/// Placeholder factory for one leaf kind
pub struct Kind<T> {
    inner: Arc<KindInner<T>>,
}

struct KindInner<T> {
    leaf: LeafType,
    stringify: Stringify<T>,
    decode: Option<Decode<T>>,
}

impl<T> Clone for Kind<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Kind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kind")
            .field("leaf", &self.inner.leaf)
            .finish_non_exhaustive()
    }
}

impl<T> Kind<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Kind with an explicit descriptor and stringify (no `Display` bound on `T`)
    pub fn with_stringify(
        leaf: LeafType,
        stringify: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::from_parts(leaf, Arc::new(stringify), None)
    }

    fn from_parts(leaf: LeafType, stringify: Stringify<T>, decode: Option<Decode<T>>) -> Self {
        Self {
            inner: Arc::new(KindInner {
                leaf,
                stringify,
                decode,
            }),
        }
    }

    /// Create a placeholder bound to `path`
    pub fn var(&self, path: impl IntoPath) -> Result<Var<T>> {
        Ok(Var {
            path: path.into_path()?,
            kind: self.clone(),
        })
    }

    pub fn leaf(&self) -> &LeafType {
        &self.inner.leaf
    }
}

/// A typed interpolation site: path + leaf type + stringify
pub struct Var<T> {
    path: Path,
    kind: Kind<T>,
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("path", &self.path)
            .field("leaf", &self.kind.inner.leaf.name())
            .finish()
    }
}

impl<T> Var<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn leaf(&self) -> &LeafType {
        self.kind.leaf()
    }

    /// Walk `ctx` along the path and convert the leaf value to `T`
    pub fn extract(&self, ctx: &Value) -> Result<T> {
        let value = self.path.lookup(ctx)?;
        let leaf = self.leaf();
        if !leaf.admits(value) {
            return Err(TypelitError::LeafTypeMismatch {
                path: self.path.to_string(),
                expected: leaf.to_string(),
                details: format!("found {}", json_type_name(value)),
            });
        }
        let decoded = match &self.kind.inner.decode {
            Some(decode) => decode(value),
            None => <T as Deserialize>::deserialize(value).map_err(|e| e.to_string()),
        };
        decoded.map_err(|details| TypelitError::LeafTypeMismatch {
            path: self.path.to_string(),
            expected: leaf.to_string(),
            details,
        })
    }

    pub fn stringify(&self, value: &T) -> String {
        (self.kind.inner.stringify)(value)
    }

    /// Erase the leaf type for storage in a template
    pub fn into_placeholder(self) -> Arc<dyn Placeholder> {
        Arc::new(self)
    }
}

/// Type-erased placeholder held by templates
pub trait Placeholder: fmt::Debug + Send + Sync {
    fn path(&self) -> &Path;

    fn leaf(&self) -> &LeafType;

    /// Extract and stringify in one step
    fn render(&self, ctx: &Value) -> Result<String>;

    /// Top-level context key this placeholder lives under
    fn head(&self) -> &str {
        self.path().head()
    }
}

impl<T> Placeholder for Var<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn path(&self) -> &Path {
        Var::path(self)
    }

    fn leaf(&self) -> &LeafType {
        Var::leaf(self)
    }

    fn render(&self, ctx: &Value) -> Result<String> {
        let value = self.extract(ctx)?;
        Ok(self.stringify(&value))
    }
}

/// Shape a placeholder requires under its head key
///
/// `user.name: string` contributes `{ name: string }` under `user`;
/// a single-segment path contributes the bare leaf.
pub fn contribution(placeholder: &dyn Placeholder) -> Shape {
    let leaf = Shape::leaf(placeholder.leaf().clone());
    match placeholder.path().rest() {
        Some(rest) => rest.nest(leaf),
        None => leaf,
    }
}
