//! Model-based validation: decode into [`Product`] with serde, then check
//! the rules the type system cannot carry.

use serde::Deserialize;
use serde_json::Value;

use super::{json_type, ValidationError};
use crate::types::Product;

pub fn validate_product(data: &Value) -> Result<Product, ValidationError> {
    let product = decode(data)?;
    if product.price <= 0.0 {
        return Err(ValidationError::NonPositivePrice(product.price));
    }
    Ok(product)
}

pub fn validate_product_list(data: &Value) -> Result<Vec<Product>, ValidationError> {
    let items = data.as_array().ok_or(ValidationError::NotA {
        expected: "array",
        found: json_type(data),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_product(item).map_err(|e| ValidationError::at(index, e)))
        .collect()
}

fn decode(data: &Value) -> Result<Product, ValidationError> {
    if !data.is_object() {
        return Err(ValidationError::NotA {
            expected: "object",
            found: json_type(data),
        });
    }
    Product::deserialize(data).map_err(|e| ValidationError::Model(e.to_string()))
}
