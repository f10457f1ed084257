//! Render context shape
//!
//! [`Context`] is the object a template requires as input: the deep merge of
//! every placeholder's nested path shape.
//!
//! ```text
//! string(session.user.name)  ─┐ head "session" → { user: { name: string } }
//! number(session.user.age)   ─┼ head "session" → { user: { age: number } }
//! string(session.token)      ─┘ head "session" → { token: string }
//!                                       │
//!                              intersect per head key
//!                                       ▼
//!   { session: { user: { name: string, age: number }, token: string } }
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::path::{IntoPath, Path};
use crate::shape::{self, Conflict, ObjectShape, Shape};
use crate::var::{contribution, Placeholder};

/// Merged requirements of a placeholder list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    root: ObjectShape,
}

impl Context {
    /// Context with no requirements (any value satisfies it)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group placeholders by their first segment, then intersect each group
    ///
    /// Order only affects field display order, never the shape itself.
    pub fn from_placeholders(placeholders: &[Arc<dyn Placeholder>]) -> Self {
        let mut groups: Vec<(&str, Vec<Shape>)> = Vec::new();
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();

        for placeholder in placeholders {
            let head = placeholder.head();
            let part = contribution(placeholder.as_ref());
            match index.get(head) {
                Some(&slot) => groups[slot].1.push(part),
                None => {
                    index.insert(head, groups.len());
                    groups.push((head, vec![part]));
                }
            }
        }

        let fields = groups
            .into_iter()
            .map(|(head, group)| {
                let mut at = vec![head.to_string()];
                (head.to_string(), shape::intersect_at(group, &mut at))
            })
            .collect();

        Self {
            root: ObjectShape::from_fields(fields),
        }
    }

    pub fn root(&self) -> &ObjectShape {
        &self.root
    }

    /// True when no placeholder contributed anything
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Shape required at `path`, if the context constrains it
    pub fn get(&self, path: impl IntoPath) -> Option<&Shape> {
        let path = path.into_path().ok()?;
        let mut segments = path.segments().iter();
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Every uninhabitable node, in field order
    pub fn conflicts(&self) -> Vec<&Conflict> {
        let mut out = Vec::new();
        self.root.conflicts(&mut out);
        out
    }

    pub fn is_inhabitable(&self) -> bool {
        self.conflicts().is_empty()
    }

    /// Paths of every node carrying a leaf requirement, depth first
    pub fn leaf_paths(&self) -> Vec<Path> {
        let mut out = Vec::new();
        let mut at = Vec::new();
        for (key, shape) in self.root.fields() {
            collect_leaf_paths(key, shape, &mut at, &mut out);
        }
        out
    }

    /// JSON Schema equivalent of this context (used by opt-in validation)
    pub fn to_json_schema(&self) -> Value {
        self.root.to_json_schema()
    }
}

fn collect_leaf_paths<'a>(key: &'a str, shape: &'a Shape, at: &mut Vec<&'a str>, out: &mut Vec<Path>) {
    at.push(key);
    if !shape.leaves().is_empty() {
        if let Ok(path) = Path::new(at.iter().copied()) {
            out.push(path);
        }
    }
    if let Shape::Object(obj) = shape {
        for (child_key, child) in obj.fields() {
            collect_leaf_paths(child_key, child, at, out);
        }
    }
    at.pop();
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
