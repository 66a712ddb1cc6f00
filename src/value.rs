//! The dynamic value model for attributes of managed resources.
//!
//! An attribute fetched from a resource can be a scalar, a fixed-size
//! sequence, a structured record keyed by field name, or an opaque object
//! that exposes named readable fields through the [`FieldReadable`]
//! capability. The resolution engine walks path segments through these
//! shapes without knowing the concrete types behind them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Error raised by a [`FieldReadable`] accessor.
#[derive(Error, Debug, Clone)]
#[error("Failed to read field '{field}': {message}")]
pub struct FieldReadError {
    pub field: String,
    pub message: String,
}

/// The contract for a value whose named fields can be read at runtime.
///
/// Types whose fields should be addressable by path segments implement this
/// explicitly; the engine never downcasts. Field lookup is case-insensitive
/// over `field_names()`, so the implementor controls the enumeration order.
pub trait FieldReadable: fmt::Debug + Send + Sync {
    /// The names of the readable fields, in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Invokes the accessor for `name` and returns the field's value.
    ///
    /// `name` is one of the entries of `field_names()`, spelled exactly as
    /// enumerated there.
    fn read_field(&self, name: &str) -> Result<AttributeValue, FieldReadError>;

    /// A short description of the value, used in error messages.
    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// The runtime shape of an attribute value, and of every intermediate value
/// produced while walking a path.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// An absent or undefined value.
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A fixed-size sequence. Only its length is addressable by a segment.
    Array(Vec<AttributeValue>),
    /// A structured record whose fields are enumerable by name.
    Record(BTreeMap<String, AttributeValue>),
    /// A generic object exposing named readable fields.
    Object(Arc<dyn FieldReadable>),
}

impl AttributeValue {
    /// Builds a structured record from name/value pairs.
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        AttributeValue::Record(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Wraps a field-readable object.
    pub fn object(object: impl FieldReadable + 'static) -> Self {
        AttributeValue::Object(Arc::new(object))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(n) => write!(f, "{}", n),
            AttributeValue::Long(n) => write!(f, "{}", n),
            AttributeValue::Float(n) => write!(f, "{}", n),
            AttributeValue::Double(n) => write!(f, "{}", n),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            AttributeValue::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                write!(f, "}}")
            }
            AttributeValue::Object(object) => write!(f, "{}", object.describe()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Long(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<Value> for AttributeValue {
    /// Maps a JSON value onto the attribute value model. JSON integers
    /// become `Long` and all other JSON numbers become `Double`; objects
    /// become structured records.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttributeValue::Long(i)
                } else {
                    AttributeValue::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => AttributeValue::String(s),
            Value::Array(items) => {
                AttributeValue::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(fields) => AttributeValue::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, value.into()))
                    .collect(),
            ),
        }
    }
}
