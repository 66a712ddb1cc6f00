//! Attribute-path value expressions for monitoring queries.
//!
//! A monitoring query examines managed resources one at a time, comparing
//! their attribute values against thresholds. This crate provides the value
//! side of such predicates: it resolves a dotted attribute path (e.g.
//! `HeapMemoryUsage.used`) against a named attribute of the current
//! resource and produces a [`Literal`] ready for comparison.
//!
//! Attribute retrieval itself belongs to an [`AttributeSource`]
//! collaborator; this crate walks whatever value comes back, one segment
//! per level. Structured records are looked up by key, array shapes expose
//! their length, and opaque objects are read through the [`FieldReadable`]
//! capability.

pub mod ast;
pub mod engine;
pub mod error;
pub mod parser;
pub mod source;
pub mod value;

// --- Public API ---
pub use ast::{AttributePath, Expression};
pub use engine::{EvaluationContext, Literal, evaluate};
pub use error::PathError;
pub use parser::parse_attribute_path;
pub use source::{AttributeError, AttributeSource, InMemoryAttributeSource, ResourceId};
pub use value::{AttributeValue, FieldReadError, FieldReadable};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_apply_record_path() {
        let source = InMemoryAttributeSource::new();
        source
            .insert(
                "app:type=Memory",
                "HeapMemoryUsage",
                json!({ "init": 64, "used": 1024, "max": 4096 }),
            )
            .unwrap();
        let resource = ResourceId::from("app:type=Memory");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let expr = parse_attribute_path("HeapMemoryUsage.used").unwrap();
        assert_eq!(expr.apply(&e_ctx).unwrap(), Literal::Long(1024));
    }

    #[test]
    fn test_plain_attribute_resolves_without_path() {
        let source = InMemoryAttributeSource::new();
        source
            .insert("app:type=Runtime", "Uptime", 86_400_000i64)
            .unwrap();
        let resource = ResourceId::from("app:type=Runtime");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let expr = parse_attribute_path("Uptime").unwrap();
        assert_eq!(expr.apply(&e_ctx).unwrap(), Literal::Long(86_400_000));
    }

    #[test]
    fn test_array_attribute_exposes_length() {
        let source = InMemoryAttributeSource::new();
        source
            .insert(
                "app:type=Runtime",
                "InputArguments",
                json!(["-Xmx4g", "-Xms1g"]),
            )
            .unwrap();
        let resource = ResourceId::from("app:type=Runtime");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let expr = parse_attribute_path("InputArguments.length").unwrap();
        assert_eq!(expr.apply(&e_ctx).unwrap(), Literal::Int(2));
    }

    #[test]
    fn test_threshold_comparison_over_resolved_literal() {
        let source = InMemoryAttributeSource::new();
        source
            .insert(
                "app:type=Memory",
                "HeapMemoryUsage",
                json!({ "used": 3500, "max": 4096 }),
            )
            .unwrap();
        let resource = ResourceId::from("app:type=Memory");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let used = parse_attribute_path("HeapMemoryUsage.used")
            .unwrap()
            .apply(&e_ctx)
            .unwrap();
        assert!(used.to_number() > 3000.0);
    }

    #[test]
    fn test_same_expression_applied_across_resources() {
        let source = InMemoryAttributeSource::new();
        source
            .insert("app:name=a", "QueueDepth", 3i32)
            .unwrap();
        source
            .insert("app:name=b", "QueueDepth", 11i32)
            .unwrap();

        let expr = parse_attribute_path("QueueDepth").unwrap();
        let mut saturated = Vec::new();
        for name in ["app:name=a", "app:name=b"] {
            let resource = ResourceId::from(name);
            let e_ctx = EvaluationContext {
                source: &source,
                resource: &resource,
            };
            if expr.apply(&e_ctx).unwrap().to_number() > 10.0 {
                saturated.push(name);
            }
        }
        assert_eq!(saturated, ["app:name=b"]);
    }

    #[test]
    fn test_retrieval_fault_is_not_a_segment_fault() {
        let source = InMemoryAttributeSource::new();
        let resource = ResourceId::from("app:type=Gone");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let err = parse_attribute_path("HeapMemoryUsage.used")
            .unwrap()
            .apply(&e_ctx)
            .unwrap_err();
        assert!(matches!(err, PathError::AttributeRetrieval { .. }));
        let message = err.to_string();
        assert!(message.contains("HeapMemoryUsage"));
        assert!(message.contains("app:type=Gone"));
    }

    #[test]
    fn test_evaluate_expression_enum() {
        let source = InMemoryAttributeSource::new();
        source
            .insert("app:type=Threading", "ThreadCount", 42i32)
            .unwrap();
        let resource = ResourceId::from("app:type=Threading");
        let e_ctx = EvaluationContext {
            source: &source,
            resource: &resource,
        };

        let path = Expression::Path(parse_attribute_path("ThreadCount").unwrap());
        let threshold = Expression::Literal(Literal::Int(50));
        let count = evaluate(&path, &e_ctx).unwrap();
        let limit = evaluate(&threshold, &e_ctx).unwrap();
        assert!(count.to_number() < limit.to_number());
    }
}
