//! Shape dispatch for dynamically-typed directive values.
use serde_json::{Map, Value};

/// The shape of a directive value.
///
/// Every position in the metadata tree that accepts "a string or an object"
/// (file `content`, a command, a command `test`) is interpreted through this
/// enum, so unsupported shapes surface in exactly one place.
///
/// # Examples
///
/// ```
/// use meta_init::metadata::Shape;
/// use serde_json::json;
///
/// assert!(matches!(Shape::of(&json!("echo hi")), Shape::Scalar("echo hi")));
/// assert!(matches!(Shape::of(&json!({"command": "true"})), Shape::Object(_)));
/// assert!(matches!(Shape::of(&json!(42)), Shape::Unsupported("number")));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// A plain string.
    Scalar(&'a str),
    /// A structured object with sub-fields.
    Object(&'a Map<String, Value>),
    /// Anything else; carries the JSON kind for diagnostics.
    Unsupported(&'static str),
}

impl<'a> Shape<'a> {
    /// Classify `value`.
    #[must_use]
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Object(map) => Self::Object(map),
            other => Self::Unsupported(kind_name(other)),
        }
    }
}

/// Human-readable JSON kind of `value`, used in error messages.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
