//! The resolution engine: fetches an attribute from the current resource
//! and walks the path segments through its value, producing a literal
//! usable inside a query predicate.

use std::fmt;

use crate::ast::{AttributePath, Expression};
use crate::error::PathError;
use crate::source::{AttributeSource, ResourceId};
use crate::value::{AttributeValue, FieldReadable};

/// A container for the state needed during one expression evaluation.
///
/// The query engine constructs one of these per resource it examines, so
/// the same expression can be applied across many resources.
pub struct EvaluationContext<'a> {
    /// The collaborator that owns attribute retrieval.
    pub source: &'a dyn AttributeSource,
    /// The resource the query is currently evaluating against.
    pub resource: &'a ResourceId,
}

/// A concrete resolved value, ready for comparison inside a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Literal {
    /// Coerces the literal to a boolean. Zero, NaN, and the empty string
    /// are false; everything else is true.
    pub fn to_bool(&self) -> bool {
        match self {
            Literal::Bool(b) => *b,
            Literal::Int(n) => *n != 0,
            Literal::Long(n) => *n != 0,
            Literal::Float(n) => *n != 0.0 && !n.is_nan(),
            Literal::Double(n) => *n != 0.0 && !n.is_nan(),
            Literal::String(s) => !s.is_empty(),
        }
    }

    /// Coerces the literal to a number. Strings are parsed after trimming;
    /// anything unparseable becomes NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Literal::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Literal::Int(n) => f64::from(*n),
            Literal::Long(n) => *n as f64,
            Literal::Float(n) => f64::from(*n),
            Literal::Double(n) => *n,
            Literal::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Long(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Double(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{}", s),
        }
    }
}

/// Evaluates a value expression against the current resource.
pub fn evaluate(expr: &Expression, e_ctx: &EvaluationContext<'_>) -> Result<Literal, PathError> {
    match expr {
        Expression::Literal(literal) => Ok(literal.clone()),
        Expression::Path(path) => path.apply(e_ctx),
    }
}

impl AttributePath {
    /// Fetches the attribute from the current resource and resolves the
    /// path against its value.
    ///
    /// Any retrieval fault surfaces as [`PathError::AttributeRetrieval`];
    /// any failure while walking a segment surfaces as
    /// [`PathError::UnsupportedSegment`]. Neither is recoverable here, and
    /// there is no retry or partial result.
    pub fn apply(&self, e_ctx: &EvaluationContext<'_>) -> Result<Literal, PathError> {
        let value = e_ctx
            .source
            .attribute(e_ctx.resource, self.attribute())
            .map_err(|source| PathError::AttributeRetrieval {
                resource: e_ctx.resource.to_string(),
                attribute: self.attribute().to_string(),
                source,
            })?;
        resolve(&value, self.path())
    }
}

/// Walks the remaining segments through `value`, one level per segment.
fn resolve(value: &AttributeValue, segments: &[String]) -> Result<Literal, PathError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(to_literal(value));
    };
    match value {
        AttributeValue::Record(fields) => {
            // A missing key resolves to null rather than erroring.
            let next = fields.get(segment).cloned().unwrap_or(AttributeValue::Null);
            resolve(&next, rest)
        }
        // Any segment applied to an array shape reads the length; the
        // segment text itself is not inspected.
        AttributeValue::Array(items) => resolve(&AttributeValue::Int(items.len() as i32), rest),
        AttributeValue::Object(object) => {
            let next = read_object_field(object.as_ref(), segment)?;
            resolve(&next, rest)
        }
        other => Err(unsupported(other.to_string(), segment)),
    }
}

/// Case-insensitive field lookup. When several names match, the last one
/// enumerated wins; a missing field or a failing accessor both surface as
/// an unsupported-segment error carrying the object's description.
fn read_object_field(
    object: &dyn FieldReadable,
    segment: &str,
) -> Result<AttributeValue, PathError> {
    let mut matched = None;
    for name in object.field_names() {
        if name.eq_ignore_ascii_case(segment) {
            matched = Some(name);
        }
    }
    let Some(name) = matched else {
        return Err(unsupported(object.describe(), segment));
    };
    object
        .read_field(name)
        .map_err(|_| unsupported(object.describe(), segment))
}

fn unsupported(value: String, segment: &str) -> PathError {
    PathError::UnsupportedSegment {
        value,
        segment: segment.to_string(),
    }
}

/// Converts a terminal value into a literal. The scalar arms form a fixed
/// dispatch order (boolean, double, float, int, long, string); every other
/// shape falls back to its string rendering.
fn to_literal(value: &AttributeValue) -> Literal {
    match value {
        AttributeValue::Bool(b) => Literal::Bool(*b),
        AttributeValue::Double(n) => Literal::Double(*n),
        AttributeValue::Float(n) => Literal::Float(*n),
        AttributeValue::Int(n) => Literal::Int(*n),
        AttributeValue::Long(n) => Literal::Long(*n),
        AttributeValue::String(s) => Literal::String(s.clone()),
        other => Literal::String(other.to_string()),
    }
}
