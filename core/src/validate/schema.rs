//! Declarative validation: the catalog rules as a JSON Schema document,
//! checked by the `jsonschema` crate.
//!
//! The schema covers shape, types, the price bound and the category list.
//! `creado_en` is matched by pattern first and then parsed, so calendar
//! errors such as month 13 are caught too.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{json, Value};

use super::{json_type, ValidationError};
use crate::types::{Category, Timestamp};

const TIMESTAMP_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?$";

/// JSON Schema for one catalog product.
pub fn product_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    json!({
        "type": "object",
        "required": ["id", "nombre", "precio", "categoria"],
        "properties": {
            "id": {"type": "integer"},
            "nombre": {"type": "string"},
            "precio": {"type": "number", "exclusiveMinimum": 0},
            "categoria": {"type": "string", "enum": categories},
            "disponible": {"type": "boolean"},
            "productor": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "nombre": {"type": "string"}
                }
            },
            "creado_en": {"type": "string", "pattern": TIMESTAMP_PATTERN}
        }
    })
}

/// Compiled product schema. Build one and reuse it when validating many
/// payloads; the free functions share a process-wide instance.
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    pub fn new() -> Result<Self, ValidationError> {
        let validator = jsonschema::validator_for(&product_schema())
            .map_err(|e| ValidationError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Check a single product payload; returns it untouched when valid.
    /// Only the first schema violation is reported.
    pub fn validate_product<'a>(&self, data: &'a Value) -> Result<&'a Value, ValidationError> {
        if !data.is_object() {
            return Err(ValidationError::NotA {
                expected: "object",
                found: json_type(data),
            });
        }
        if let Some(err) = self.validator.iter_errors(data).next() {
            return Err(ValidationError::Schema(err.to_string()));
        }
        if let Some(text) = data.get("creado_en").and_then(Value::as_str) {
            Timestamp::parse(text).map_err(|_| ValidationError::InvalidTimestamp(text.to_string()))?;
        }
        Ok(data)
    }

    pub fn validate_product_list<'a>(&self, data: &'a Value) -> Result<&'a Vec<Value>, ValidationError> {
        let items = data.as_array().ok_or(ValidationError::NotA {
            expected: "array",
            found: json_type(data),
        })?;
        for (index, item) in items.iter().enumerate() {
            self.validate_product(item)
                .map_err(|e| ValidationError::at(index, e))?;
        }
        Ok(items)
    }
}

fn shared() -> Result<&'static SchemaValidator, ValidationError> {
    static SHARED: OnceLock<Result<SchemaValidator, ValidationError>> = OnceLock::new();
    SHARED
        .get_or_init(SchemaValidator::new)
        .as_ref()
        .map_err(Clone::clone)
}

pub fn validate_product(data: &Value) -> Result<&Value, ValidationError> {
    shared()?.validate_product(data)
}

pub fn validate_product_list(data: &Value) -> Result<&Vec<Value>, ValidationError> {
    shared()?.validate_product_list(data)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({
            "id": 1,
            "nombre": "Manzanas Gala",
            "precio": 35.5,
            "categoria": "frutas",
            "disponible": true,
            "productor": {"id": 7, "nombre": "Granja Sol"},
            "creado_en": "2024-01-15T10:30:00Z"
        })
    }

    fn schema_error(data: &Value) -> String {
        match validate_product(data) {
            Err(ValidationError::Schema(msg)) => msg,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_complete_product() {
        let data = valid();
        assert_eq!(validate_product(&data).unwrap(), &data);
    }

    #[test]
    fn missing_field_is_named() {
        let mut data = valid();
        data.as_object_mut().unwrap().remove("precio");
        assert!(schema_error(&data).contains("precio"));
    }

    #[test]
    fn price_must_be_strictly_positive() {
        let mut data = valid();
        data["precio"] = json!(0);
        schema_error(&data);
        data["precio"] = json!(-10.0);
        schema_error(&data);
        data["precio"] = json!(0.01);
        assert!(validate_product(&data).is_ok());
    }

    #[test]
    fn category_outside_enum_is_rejected() {
        let mut data = valid();
        data["categoria"] = json!("carnes");
        assert!(schema_error(&data).contains("carnes"));
    }

    #[test]
    fn nested_producer_id_must_be_integer() {
        let mut data = valid();
        data["productor"] = json!({"id": "siete"});
        schema_error(&data);
    }

    #[test]
    fn timestamp_forms() {
        for text in ["2024-01-15T10:30:00", "2024-01-15", "2024-01-15 10:30:00.5", "2024-01-15T10:30:00+02:00"] {
            let mut data = valid();
            data["creado_en"] = json!(text);
            assert!(validate_product(&data).is_ok(), "{text}");
        }

        let mut data = valid();
        data["creado_en"] = json!("15/01/2024");
        schema_error(&data);

        // Matches the pattern but is not a calendar date.
        data["creado_en"] = json!("2024-13-01");
        assert_eq!(
            validate_product(&data).unwrap_err(),
            ValidationError::InvalidTimestamp("2024-13-01".into())
        );
    }

    #[test]
    fn non_object_is_reported_by_type() {
        assert_eq!(
            validate_product(&json!(3)).unwrap_err(),
            ValidationError::NotA {
                expected: "object",
                found: "integer"
            }
        );
    }

    #[test]
    fn list_reports_failing_index() {
        let mut bad = valid();
        bad["categoria"] = json!("pan");
        let validator = SchemaValidator::new().unwrap();
        let err = validator
            .validate_product_list(&json!([valid(), bad]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::AtIndex { index: 1, .. }));
        assert!(validator.validate_product_list(&json!([])).unwrap().is_empty());
    }
}
