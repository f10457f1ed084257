//! Placeholder paths
//!
//! A [`Path`] is a non-empty list of plain property names:
//! - `["user", "name"]` → `user.name`
//! - `"0"` is an object key, never an array index
//!
//! The same path describes the nested shape a placeholder requires
//! ([`Path::nest`]) and locates the leaf value at render time
//! ([`Path::lookup`]). Both walk segments front to back, one level each.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, TypelitError};
use crate::leaf::json_type_name;
use crate::shape::Shape;

/// Ordered, non-empty sequence of object keys
///
/// Cloning and [`Path::rest`] share the underlying segment storage.
#[derive(Clone)]
pub struct Path {
    segments: Arc<[String]>,
    start: usize,
}

impl Path {
    /// Build a path from segments, rejecting an empty list
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Arc<[String]> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(TypelitError::EmptyPath);
        }
        Ok(Self { segments, start: 0 })
    }

    /// Split a dotted string (`"session.user.name"`) into segments
    ///
    /// Empty segments (`"a..b"`, `".a"`, `""`) are rejected.
    pub fn dotted(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(TypelitError::EmptyPath);
        }
        if path.split('.').any(str::is_empty) {
            return Err(TypelitError::InvalidPath {
                path: path.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        Self::new(path.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments[self.start..]
    }

    /// First segment (the top-level context key)
    pub fn head(&self) -> &str {
        &self.segments[self.start]
    }

    /// Everything after the first segment, or `None` for a single-segment path
    pub fn rest(&self) -> Option<Path> {
        (self.depth() > 1).then(|| Path {
            segments: Arc::clone(&self.segments),
            start: self.start + 1,
        })
    }

    /// Number of segments (always ≥ 1)
    pub fn depth(&self) -> usize {
        self.segments.len() - self.start
    }

    /// Unroll the path into a single-branch nested shape ending in `leaf`
    ///
    /// `["a", "b", "c"]` with `T` gives `{ a: { b: { c: T } } }`.
    pub fn nest(&self, leaf: Shape) -> Shape {
        self.segments()
            .iter()
            .rev()
            .fold(leaf, |inner, segment| Shape::field(segment.clone(), inner))
    }

    /// Follow the path through nested JSON objects and return the leaf value
    ///
    /// Zero-clone traversal: references until the caller converts the leaf.
    pub fn lookup<'v>(&self, root: &'v Value) -> Result<&'v Value> {
        let mut current = root;
        for (depth, segment) in self.segments().iter().enumerate() {
            match current {
                Value::Object(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => {
                        return Err(TypelitError::PathNotFound {
                            path: self.segments()[..=depth].join("."),
                            full_path: self.to_string(),
                        })
                    }
                },
                other => {
                    return Err(TypelitError::InvalidTraversal {
                        segment: segment.clone(),
                        value_type: json_type_name(other).to_string(),
                        full_path: self.to_string(),
                    })
                }
            }
        }
        Ok(current)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for Path {}

impl std::hash::Hash for Path {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.segments().hash(state);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

/// Anything that names a placeholder path
///
/// A bare string is ONE segment (no dot splitting); use [`Path::dotted`] to split.
pub trait IntoPath {
    fn into_path(self) -> Result<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path> {
        Ok(self.clone())
    }
}

impl IntoPath for Result<Path> {
    fn into_path(self) -> Result<Path> {
        self
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path> {
        Path::new([self])
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path> {
        Path::new([self])
    }
}

impl<S: Into<String>, const N: usize> IntoPath for [S; N] {
    fn into_path(self) -> Result<Path> {
        const { assert!(N > 0, "placeholder path must have at least one segment") };
        Path::new(self)
    }
}

impl<S: Into<String> + Clone> IntoPath for &[S] {
    fn into_path(self) -> Result<Path> {
        Path::new(self.iter().cloned())
    }
}

impl<S: Into<String>> IntoPath for Vec<S> {
    fn into_path(self) -> Result<Path> {
        Path::new(self)
    }
}
