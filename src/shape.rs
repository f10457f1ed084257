//! Shape trees and structural intersection
//!
//! A [`Shape`] describes what a render context must contain at one node:
//! - `Leaf`: one or more leaf requirements that all apply to the node
//! - `Object`: named child requirements (plus any leaf requirements that
//!   also constrain the object itself, e.g. a `json` placeholder on it)
//! - `Never`: incompatible requirements; no value satisfies the node
//!
//! [`intersect`] merges a whole group of contributions in one pass. Every
//! contribution for a key is collected first, and only then is the group
//! combined, recursing per child key. Merging isolated pairs and joining the
//! pre-merged results afterwards is NOT equivalent and must not be used.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::{json, Map, Value};
use smallvec::SmallVec;

use crate::leaf::{JsonTypes, LeafType};

/// Leaf requirements on a single node (usually one)
pub type Leaves = SmallVec<[LeafType; 1]>;

/// Required shape of the value at one context node
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Leaf(Leaves),
    Object(ObjectShape),
    Never(Conflict),
}

/// Object node: ordered fields, each required
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    fields: Vec<(String, Shape)>,
    leaves: Leaves,
}

/// Two requirements that no single value can satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Dotted path of the uninhabitable node
    pub path: String,
    pub left: String,
    pub right: String,
}

impl Shape {
    pub fn leaf(leaf: LeafType) -> Self {
        Shape::Leaf(smallvec::smallvec![leaf])
    }

    /// Object with exactly one required key
    pub fn field(key: impl Into<String>, child: Shape) -> Self {
        Shape::Object(ObjectShape {
            fields: vec![(key.into(), child)],
            leaves: Leaves::new(),
        })
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Shape::Never(_))
    }

    /// Required shape of a direct child key
    pub fn get(&self, key: &str) -> Option<&Shape> {
        match self {
            Shape::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Leaf requirements on this node itself
    pub fn leaves(&self) -> &[LeafType] {
        match self {
            Shape::Leaf(leaves) => leaves,
            Shape::Object(obj) => &obj.leaves,
            Shape::Never(_) => &[],
        }
    }

    /// Collect every conflict in this subtree, depth first
    pub fn conflicts<'a>(&'a self, out: &mut Vec<&'a Conflict>) {
        match self {
            Shape::Never(conflict) => out.push(conflict),
            Shape::Object(obj) => obj.conflicts(out),
            Shape::Leaf(_) => {}
        }
    }

    pub fn to_json_schema(&self) -> Value {
        match self {
            Shape::Leaf(leaves) => leaves_schema(leaves),
            Shape::Object(obj) => obj.to_json_schema(),
            Shape::Never(_) => Value::Bool(false),
        }
    }
}

impl ObjectShape {
    pub(crate) fn from_fields(fields: Vec<(String, Shape)>) -> Self {
        Self {
            fields,
            leaves: Leaves::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.fields.iter().map(|(key, shape)| (key.as_str(), shape))
    }

    pub fn get(&self, key: &str) -> Option<&Shape> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, shape)| shape)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[LeafType] {
        &self.leaves
    }

    pub fn conflicts<'a>(&'a self, out: &mut Vec<&'a Conflict>) {
        for (_, shape) in &self.fields {
            shape.conflicts(out);
        }
    }

    pub fn to_json_schema(&self) -> Value {
        if self.is_empty() {
            return Value::Bool(true);
        }

        let mut properties = Map::new();
        for (key, shape) in &self.fields {
            properties.insert(key.clone(), shape.to_json_schema());
        }
        let required: Vec<&str> = self.fields.iter().map(|(key, _)| key.as_str()).collect();
        let object = json!({
            "type": "object",
            "required": required,
            "properties": properties,
        });

        if self.leaves.is_empty() {
            return object;
        }
        let mut all_of = vec![object];
        all_of.extend(self.leaves.iter().map(|leaf| leaf.schema().clone()));
        json!({ "allOf": all_of })
    }
}

fn leaves_schema(leaves: &[LeafType]) -> Value {
    match leaves {
        [single] => single.schema().clone(),
        many => json!({
            "allOf": many.iter().map(|leaf| leaf.schema().clone()).collect::<Vec<_>>()
        }),
    }
}

/// Intersect a group of contributions for the same node (root-relative paths)
pub fn intersect(parts: impl IntoIterator<Item = Shape>) -> Shape {
    intersect_at(parts, &mut Vec::new())
}

/// Intersect a group of contributions; `at` is the path of the node being merged
pub(crate) fn intersect_at(parts: impl IntoIterator<Item = Shape>, at: &mut Vec<String>) -> Shape {
    let mut leaves = Leaves::new();
    let mut groups: Vec<(String, Vec<Shape>)> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for part in parts {
        match part {
            // Bottom absorbs everything it is intersected with
            Shape::Never(conflict) => return Shape::Never(conflict),
            Shape::Leaf(part_leaves) => push_leaves(&mut leaves, part_leaves),
            Shape::Object(obj) => {
                push_leaves(&mut leaves, obj.leaves);
                for (key, child) in obj.fields {
                    match index.get(&key) {
                        Some(&slot) => groups[slot].1.push(child),
                        None => {
                            index.insert(key.clone(), groups.len());
                            groups.push((key, vec![child]));
                        }
                    }
                }
            }
        }
    }

    let mut admitted = JsonTypes::ANY;
    for (i, leaf) in leaves.iter().enumerate() {
        let narrowed = admitted & leaf.accepts();
        if narrowed.is_empty() {
            return never(at, join_leaves(&leaves[..i]), leaf.to_string());
        }
        admitted = narrowed;
    }

    if groups.is_empty() {
        if leaves.is_empty() {
            return Shape::Object(ObjectShape::default());
        }
        return Shape::Leaf(leaves);
    }

    let fields: Vec<(String, Shape)> = groups
        .into_iter()
        .map(|(key, group)| {
            at.push(key.clone());
            let child = intersect_at(group, at);
            at.pop();
            (key, child)
        })
        .collect();

    let object = ObjectShape {
        fields,
        leaves: Leaves::new(),
    };
    if !leaves.is_empty() && !admitted.contains(JsonTypes::OBJECT) {
        return never(at, join_leaves(&leaves), object.to_string());
    }

    Shape::Object(ObjectShape { leaves, ..object })
}

/// Add leaf requirements, skipping exact duplicates (merge is idempotent)
fn push_leaves(into: &mut Leaves, from: impl IntoIterator<Item = LeafType>) {
    for leaf in from {
        if !into.contains(&leaf) {
            into.push(leaf);
        }
    }
}

fn join_leaves(leaves: &[LeafType]) -> String {
    leaves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" & ")
}

fn never(at: &[String], left: String, right: String) -> Shape {
    Shape::Never(Conflict {
        path: at.join("."),
        left,
        right,
    })
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Leaf(leaves) => f.write_str(&join_leaves(leaves)),
            Shape::Object(obj) => fmt::Display::fmt(obj, f),
            Shape::Never(_) => f.write_str("never"),
        }
    }
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.leaves.is_empty() {
            write!(f, "{} & ", join_leaves(&self.leaves))?;
        }
        if self.fields.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, (key, shape)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {shape}")?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} vs {}", self.path, self.left, self.right)
    }
}
