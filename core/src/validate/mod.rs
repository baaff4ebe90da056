//! Product payload validation.
//!
//! Three interchangeable strategies check the same catalog rules against raw
//! JSON: [`manual`] walks the `serde_json::Value` by hand and reports the
//! first violated rule, [`model`] decodes into the typed [`Product`] with serde
//! and then checks the business rules serde cannot express, and [`schema`]
//! runs a JSON Schema document through the `jsonschema` crate.
//!
//! [`Product`]: crate::types::Product

pub mod manual;
pub mod model;
pub mod schema;

use thiserror::Error;

/// Why a product payload was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("expected {expected}, got {found}")]
    NotA {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("price must be greater than 0, got {0}")]
    NonPositivePrice(f64),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("invalid timestamp in 'creado_en': {0}")]
    InvalidTimestamp(String),

    /// Rejected by the JSON Schema; carries the first violation.
    #[error("schema violation: {0}")]
    Schema(String),

    /// Rejected by the serde model; carries serde's message.
    #[error("{0}")]
    Model(String),

    #[error("product at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub(crate) fn at(index: usize, source: ValidationError) -> Self {
        ValidationError::AtIndex {
            index,
            source: Box::new(source),
        }
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
