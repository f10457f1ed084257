//! Leaf descriptors
//!
//! A [`LeafType`] is the runtime stand-in for "the type of value expected at
//! the end of a path". Two descriptors can sit on the same node only if their
//! [`JsonTypes`] overlap; disjoint sets make the node uninhabitable.

use std::borrow::Cow;
use std::fmt;

use bitflags::bitflags;
use serde_json::{json, Value};

bitflags! {
    /// Set of JSON value kinds a leaf admits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JsonTypes: u8 {
        const NULL = 1;
        const BOOLEAN = 1 << 1;
        /// Numbers without a fractional part, `3` and `3.0` alike
        const INTEGER = 1 << 2;
        /// Numbers with a fractional part
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const ARRAY = 1 << 5;
        const OBJECT = 1 << 6;

        const NUMBER = Self::INTEGER.bits() | Self::FLOAT.bits();
        const ANY = Self::NULL.bits()
            | Self::BOOLEAN.bits()
            | Self::NUMBER.bits()
            | Self::STRING.bits()
            | Self::ARRAY.bits()
            | Self::OBJECT.bits();
    }
}

impl JsonTypes {
    /// Kind of a concrete JSON value
    ///
    /// Integer-ness follows JSON Schema: a float literal with a zero
    /// fractional part is an integer.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::NULL,
            Value::Bool(_) => Self::BOOLEAN,
            Value::Number(n) if !n.is_f64() => Self::INTEGER,
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Self::INTEGER,
                _ => Self::FLOAT,
            },
            Value::String(_) => Self::STRING,
            Value::Array(_) => Self::ARRAY,
            Value::Object(_) => Self::OBJECT,
        }
    }

    /// JSON Schema `type` keywords covering this set
    pub fn schema_types(self) -> Vec<&'static str> {
        let mut types = Vec::new();
        if self.contains(Self::NULL) {
            types.push("null");
        }
        if self.contains(Self::BOOLEAN) {
            types.push("boolean");
        }
        if self.contains(Self::NUMBER) {
            types.push("number");
        } else if self.contains(Self::INTEGER) {
            types.push("integer");
        }
        if self.contains(Self::STRING) {
            types.push("string");
        }
        if self.contains(Self::ARRAY) {
            types.push("array");
        }
        if self.contains(Self::OBJECT) {
            types.push("object");
        }
        types
    }

    /// Minimal JSON Schema admitting exactly this set
    pub fn to_schema(self) -> Value {
        if self == Self::ANY {
            return Value::Bool(true);
        }
        match self.schema_types().as_slice() {
            [] => Value::Bool(false),
            [single] => json!({ "type": single }),
            many => json!({ "type": many }),
        }
    }
}

/// Display name for the kind of a JSON value (used in error messages)
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Requirement placed on the value at the end of a placeholder path
#[derive(Debug, Clone, PartialEq)]
pub struct LeafType {
    name: Cow<'static, str>,
    accepts: JsonTypes,
    schema: Value,
}

impl LeafType {
    /// Leaf admitting `accepts`, with the matching minimal schema
    pub fn new(name: impl Into<Cow<'static, str>>, accepts: JsonTypes) -> Self {
        Self {
            name: name.into(),
            accepts,
            schema: accepts.to_schema(),
        }
    }

    /// Leaf admitting any JSON value
    pub fn any(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, JsonTypes::ANY)
    }

    /// Default descriptor for a custom Rust leaf type: named after `T`, admits anything
    pub fn of<T: ?Sized>() -> Self {
        Self::any(short_type_name::<T>())
    }

    /// Replace the schema fragment used by context validation
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts(&self) -> JsonTypes {
        self.accepts
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Whether a concrete JSON value is of an admitted kind
    pub fn admits(&self, value: &Value) -> bool {
        self.accepts.contains(JsonTypes::of(value))
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// `alloc::string::String` → `String`, `my_app::Money<u8>` → `Money`
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
