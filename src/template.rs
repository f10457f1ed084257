//! Templates - fragments interleaved with typed placeholders
//!
//! A [`Template`] is built once and rendered many times:
//! - construction checks the fragment/placeholder pairing and merges every
//!   placeholder into the required [`Context`]; an uninhabitable context is
//!   rejected here, never at render time
//! - rendering walks the placeholders in order and concatenates
//!   `fragment[0] + p0 + fragment[1] + … + fragment[N]`
//!
//! ```text
//! typelit!("Hello ", string("name"), "!")
//!     fragments:    ["Hello ", "!"]
//!     placeholders: [string(name)]
//!     context:      { name: string }
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{TemplateOptions, Validation};
use crate::context::Context;
use crate::error::{Result, TypelitError};
use crate::validate::ContextValidator;
use crate::var::{Placeholder, Var};

/// Immutable, cheaply clonable template
#[derive(Clone)]
pub struct Template {
    inner: Arc<TemplateInner>,
}

struct TemplateInner {
    fragments: Vec<String>,
    placeholders: Vec<Arc<dyn Placeholder>>,
    context: Context,
    options: TemplateOptions,
    /// Total fragment length (output buffer size before interpolation)
    literal_len: usize,
    /// Compiled on first use, or at build time with `Validation::OnRender`
    validator: OnceLock<std::result::Result<ContextValidator, String>>,
}

impl Template {
    /// Build from raw parts with default options
    pub fn new(
        fragments: Vec<String>,
        placeholders: Vec<Arc<dyn Placeholder>>,
    ) -> Result<Self> {
        Self::with_options(fragments, placeholders, TemplateOptions::default())
    }

    pub fn with_options(
        fragments: Vec<String>,
        placeholders: Vec<Arc<dyn Placeholder>>,
        options: TemplateOptions,
    ) -> Result<Self> {
        if fragments.len() != placeholders.len() + 1 {
            return Err(TypelitError::FragmentCountMismatch {
                fragments: fragments.len(),
                placeholders: placeholders.len(),
            });
        }

        let context = Context::from_placeholders(&placeholders);
        if let Some(conflict) = context.conflicts().first() {
            debug!(
                path = %conflict.path,
                left = %conflict.left,
                right = %conflict.right,
                "Rejected template with uninhabitable context"
            );
            return Err(TypelitError::ShapeConflict {
                path: conflict.path.clone(),
                left: conflict.left.clone(),
                right: conflict.right.clone(),
            });
        }

        let literal_len = fragments.iter().map(String::len).sum();
        debug!(
            fragments = fragments.len(),
            placeholders = placeholders.len(),
            context = %context,
            "Built template"
        );

        let template = Self {
            inner: Arc::new(TemplateInner {
                fragments,
                placeholders,
                context,
                options,
                literal_len,
                validator: OnceLock::new(),
            }),
        };

        if template.inner.options.validation == Validation::OnRender {
            template.validator()?;
        }
        Ok(template)
    }

    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::new()
    }

    /// Render with any serializable context
    pub fn render<C: Serialize + ?Sized>(&self, ctx: &C) -> Result<String> {
        if self.inner.placeholders.is_empty() {
            return Ok(self.inner.fragments[0].clone());
        }
        let value = serde_json::to_value(ctx)?;
        self.render_value(&value)
    }

    /// Render against an already-built JSON value
    ///
    /// Fails on the first placeholder that cannot be resolved; no partial
    /// output is returned.
    pub fn render_value(&self, ctx: &Value) -> Result<String> {
        let inner = &self.inner;
        if inner.options.validation == Validation::OnRender {
            self.validator()?.validate(ctx)?;
        }

        let mut out = String::with_capacity(inner.literal_len + inner.options.capacity_hint);
        out.push_str(&inner.fragments[0]);
        for (placeholder, fragment) in inner.placeholders.iter().zip(&inner.fragments[1..]) {
            out.push_str(&placeholder.render(ctx)?);
            out.push_str(fragment);
        }

        trace!(
            placeholders = inner.placeholders.len(),
            len = out.len(),
            "Rendered template"
        );
        Ok(out)
    }

    /// Check a context against the required shape without rendering
    pub fn validate<C: Serialize + ?Sized>(&self, ctx: &C) -> Result<()> {
        let value = serde_json::to_value(ctx)?;
        self.validate_value(&value)
    }

    pub fn validate_value(&self, ctx: &Value) -> Result<()> {
        self.validator()?.validate(ctx)
    }

    pub fn fragments(&self) -> &[String] {
        &self.inner.fragments
    }

    pub fn placeholders(&self) -> &[Arc<dyn Placeholder>] {
        &self.inner.placeholders
    }

    /// Merged shape every render context must satisfy
    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.inner.options
    }

    fn validator(&self) -> Result<&ContextValidator> {
        self.inner
            .validator
            .get_or_init(|| {
                ContextValidator::new(&self.inner.context).map_err(|e| match e {
                    TypelitError::SchemaCompile { reason } => reason,
                    other => other.to_string(),
                })
            })
            .as_ref()
            .map_err(|reason| TypelitError::SchemaCompile {
                reason: reason.clone(),
            })
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("fragments", &self.inner.fragments)
            .field("placeholders", &self.inner.placeholders)
            .field("context", &self.inner.context.to_string())
            .field("options", &self.inner.options)
            .finish()
    }
}

/// Anything that can sit in a placeholder slot
pub trait IntoPlaceholder {
    fn try_into_placeholder(self) -> Result<Arc<dyn Placeholder>>;
}

impl<T: DeserializeOwned + Send + Sync + 'static> IntoPlaceholder for Var<T> {
    fn try_into_placeholder(self) -> Result<Arc<dyn Placeholder>> {
        Ok(self.into_placeholder())
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> IntoPlaceholder for &Var<T> {
    fn try_into_placeholder(self) -> Result<Arc<dyn Placeholder>> {
        Ok(self.clone().into_placeholder())
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> IntoPlaceholder for Result<Var<T>> {
    fn try_into_placeholder(self) -> Result<Arc<dyn Placeholder>> {
        self.map(Var::into_placeholder)
    }
}

impl IntoPlaceholder for Arc<dyn Placeholder> {
    fn try_into_placeholder(self) -> Result<Arc<dyn Placeholder>> {
        Ok(self)
    }
}

/// One argument of the [`typelit!`](crate::typelit) macro: text or a placeholder
pub trait TemplatePart {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder;
}

impl TemplatePart for &str {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.text(self)
    }
}

impl TemplatePart for String {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.text(self)
    }
}

impl TemplatePart for &String {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.text(self)
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> TemplatePart for Var<T> {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.var(self)
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> TemplatePart for &Var<T> {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.var(self)
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> TemplatePart for Result<Var<T>> {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.var(self)
    }
}

impl TemplatePart for Arc<dyn Placeholder> {
    fn append_to(self, builder: TemplateBuilder) -> TemplateBuilder {
        builder.var(self)
    }
}

/// Incremental template construction
///
/// Adjacent texts concatenate into one fragment; adjacent placeholders get an
/// empty fragment between them. The first placeholder error is kept and
/// returned from [`build`](Self::build).
#[derive(Debug)]
pub struct TemplateBuilder {
    fragments: Vec<String>,
    placeholders: Vec<Arc<dyn Placeholder>>,
    options: TemplateOptions,
    error: Option<TypelitError>,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            fragments: vec![String::new()],
            placeholders: Vec::new(),
            options: TemplateOptions::default(),
            error: None,
        }
    }

    pub fn text(mut self, text: impl AsRef<str>) -> Self {
        if let Some(last) = self.fragments.last_mut() {
            last.push_str(text.as_ref());
        }
        self
    }

    pub fn var(mut self, placeholder: impl IntoPlaceholder) -> Self {
        if self.error.is_some() {
            return self;
        }
        match placeholder.try_into_placeholder() {
            Ok(placeholder) => {
                self.placeholders.push(placeholder);
                self.fragments.push(String::new());
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn part(self, part: impl TemplatePart) -> Self {
        part.append_to(self)
    }

    pub fn options(mut self, options: TemplateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<Template> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Template::with_options(self.fragments, self.placeholders, self.options)
    }
}

/// Tagged-template literal: text and placeholders in reading order
///
/// ```rust
/// use typelit::{kinds, typelit};
/// use serde_json::json;
///
/// let greet = typelit!("Hello ", kinds::string("name"), "!")?;
/// assert_eq!(greet.render(&json!({"name": "Ada"}))?, "Hello Ada!");
/// # Ok::<(), typelit::TypelitError>(())
/// ```
#[macro_export]
macro_rules! typelit {
    ($($part:expr),* $(,)?) => {{
        let builder = $crate::Template::builder();
        $( let builder = builder.part($part); )*
        builder.build()
    }};
}
