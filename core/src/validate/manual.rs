//! Hand-written validation over raw JSON.

use serde_json::{Map, Value};

use super::{json_type, ValidationError};
use crate::types::{Category, Timestamp};

const REQUIRED_FIELDS: [&str; 4] = ["id", "nombre", "precio", "categoria"];

/// Check a single product payload; returns it untouched when valid.
pub fn validate_product(data: &Value) -> Result<&Value, ValidationError> {
    let product = data.as_object().ok_or(ValidationError::NotA {
        expected: "object",
        found: json_type(data),
    })?;

    for field in REQUIRED_FIELDS {
        if !product.contains_key(field) {
            return Err(ValidationError::MissingField(field));
        }
    }

    if !product["id"].is_i64() {
        return Err(wrong_type("id", "integer", &product["id"]));
    }
    if !product["nombre"].is_string() {
        return Err(wrong_type("nombre", "string", &product["nombre"]));
    }
    let price = product["precio"]
        .as_f64()
        .ok_or_else(|| wrong_type("precio", "number", &product["precio"]))?;

    if price <= 0.0 {
        return Err(ValidationError::NonPositivePrice(price));
    }

    match &product["categoria"] {
        Value::String(name) if Category::from_wire(name).is_some() => {}
        Value::String(name) => return Err(ValidationError::UnknownCategory(name.clone())),
        other => return Err(wrong_type("categoria", "string", other)),
    }

    validate_optional_fields(product)?;
    Ok(data)
}

fn validate_optional_fields(product: &Map<String, Value>) -> Result<(), ValidationError> {
    if let Some(available) = product.get("disponible") {
        if !available.is_boolean() {
            return Err(wrong_type("disponible", "boolean", available));
        }
    }

    if let Some(producer) = product.get("productor") {
        let producer = producer
            .as_object()
            .ok_or_else(|| wrong_type("productor", "object", producer))?;
        if let Some(id) = producer.get("id") {
            if !id.is_i64() {
                return Err(wrong_type("productor.id", "integer", id));
            }
        }
        if let Some(name) = producer.get("nombre") {
            if !name.is_string() {
                return Err(wrong_type("productor.nombre", "string", name));
            }
        }
    }

    if let Some(created) = product.get("creado_en") {
        let text = created
            .as_str()
            .ok_or_else(|| wrong_type("creado_en", "string", created))?;
        Timestamp::parse(text).map_err(|_| ValidationError::InvalidTimestamp(text.to_string()))?;
    }
    Ok(())
}

/// Check every product in a JSON array. The first failure is reported with
/// the index of the offending element.
pub fn validate_product_list(data: &Value) -> Result<&Vec<Value>, ValidationError> {
    let items = data.as_array().ok_or(ValidationError::NotA {
        expected: "array",
        found: json_type(data),
    })?;
    for (index, item) in items.iter().enumerate() {
        validate_product(item).map_err(|e| ValidationError::at(index, e))?;
    }
    Ok(items)
}

fn wrong_type(field: &'static str, expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::WrongType {
        field,
        expected,
        found: json_type(value),
    }
}
