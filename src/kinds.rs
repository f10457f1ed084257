//! Built-in leaf kinds
//!
//! Every kind here is an ordinary [`create_type`] result; nothing is special
//! cased by the template engine. Each one is available both as a shared
//! [`Kind`] static and as a path → [`Var`] shortcut.
//!
//! | Kind    | Rust type       | JSON accepted     |
//! |---------|-----------------|-------------------|
//! | boolean | `bool`          | boolean           |
//! | string  | `String`        | string            |
//! | number  | `f64`           | integer, number   |
//! | bigint  | `i128`          | integer (i128)    |
//! | date    | `DateTime<Utc>` | string (RFC 3339) |
//! | json    | `Value`         | any               |

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::error::Result;
use crate::leaf::{JsonTypes, LeafType};
use crate::path::IntoPath;
use crate::var::{create_type, CreateOptions, Kind, Var};

/// `Date.prototype.toString` layout for UTC instants
pub const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z (Coordinated Universal Time)";

/// 2^127, the magnitude bound of `i128` (exact as `f64`)
const BIGINT_BOUND: f64 = 1.7014118346046923e38;

pub static BOOLEAN: LazyLock<Kind<bool>> = LazyLock::new(|| {
    create_type(CreateOptions::default().with_leaf(LeafType::new("boolean", JsonTypes::BOOLEAN)))
});

pub static STRING: LazyLock<Kind<String>> = LazyLock::new(|| {
    create_type(
        CreateOptions::stringify(|s: &String| s.clone())
            .with_leaf(LeafType::new("string", JsonTypes::STRING)),
    )
});

pub static NUMBER: LazyLock<Kind<f64>> = LazyLock::new(|| {
    create_type(
        CreateOptions::stringify(|n: &f64| format_number(*n))
            .with_leaf(LeafType::new("number", JsonTypes::NUMBER)),
    )
});

pub static BIGINT: LazyLock<Kind<i128>> = LazyLock::new(|| {
    let leaf = LeafType::new("bigint", JsonTypes::INTEGER).with_schema(json!({
        "type": "integer",
        "minimum": -BIGINT_BOUND,
        "maximum": BIGINT_BOUND,
    }));
    create_type(CreateOptions::default().with_leaf(leaf).with_decode(decode_bigint))
});

pub static DATE: LazyLock<Kind<DateTime<Utc>>> = LazyLock::new(|| {
    let leaf = LeafType::new("date", JsonTypes::STRING)
        .with_schema(json!({ "type": "string", "format": "date-time" }));
    create_type(
        CreateOptions::stringify(format_date)
            .with_leaf(leaf)
            .with_decode(decode_date),
    )
});

pub static JSON: LazyLock<Kind<Value>> = LazyLock::new(|| {
    create_type(CreateOptions::stringify(format_json).with_leaf(LeafType::any("json")))
});

pub fn boolean(path: impl IntoPath) -> Result<Var<bool>> {
    BOOLEAN.var(path)
}

pub fn string(path: impl IntoPath) -> Result<Var<String>> {
    STRING.var(path)
}

pub fn number(path: impl IntoPath) -> Result<Var<f64>> {
    NUMBER.var(path)
}

pub fn bigint(path: impl IntoPath) -> Result<Var<i128>> {
    BIGINT.var(path)
}

pub fn date(path: impl IntoPath) -> Result<Var<DateTime<Utc>>> {
    DATE.var(path)
}

pub fn json(path: impl IntoPath) -> Result<Var<Value>> {
    JSON.var(path)
}

/// Integer literal of any width that fits `i128`, or an integral float
/// strictly inside the `i128` range
pub fn decode_bigint(value: &Value) -> std::result::Result<i128, String> {
    let Value::Number(n) = value else {
        return Err(format!("expected an integer, found {value}"));
    };
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    if !n.is_f64() {
        return n
            .to_string()
            .parse::<i128>()
            .map_err(|_| format!("{n} is out of range for i128"));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && (-BIGINT_BOUND..BIGINT_BOUND).contains(&f) => Ok(f as i128),
        Some(f) if f.fract() == 0.0 => Err(format!("{n} is out of range for i128")),
        _ => Err(format!("{n} is not an integer")),
    }
}

/// RFC 3339 timestamp, normalized to UTC
pub fn decode_date(value: &Value) -> std::result::Result<DateTime<Utc>, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("expected an RFC 3339 string, found {value}"))?;
    DateTime::parse_from_rfc3339(text)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| format!("'{text}' is not an RFC 3339 date-time: {e}"))
}

/// Number formatting as JavaScript's `String(n)`
///
/// Shortest round-trip digits; exponent form outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == f64::INFINITY {
        return "Infinity".to_string();
    }
    if n == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Two-space pretty JSON
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
