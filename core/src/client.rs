//! Stateless HTTP request builder and response parser for the EcoMarket API.
//!
//! # Design
//! `EcoMarketClient` holds only a `base_url` and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewProduct, Product, ProductPatch};

/// Synchronous, stateless client for the product catalog.
#[derive(Debug, Clone)]
pub struct EcoMarketClient {
    base_url: String,
}

impl EcoMarketClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_products(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_product(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, self.product_url(id))
    }

    pub fn build_create_product(&self, input: &NewProduct) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, self.collection_url(), input)
    }

    /// PUT: replaces every field of an existing product.
    pub fn build_replace_product(&self, id: i64, input: &NewProduct) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, self.product_url(id), input)
    }

    /// PATCH: sends only the fields set in `patch`.
    pub fn build_update_product(&self, id: i64, patch: &ProductPatch) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, self.product_url(id), patch)
    }

    pub fn build_delete_product(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.product_url(id))
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_replace_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/productos", self.base_url)
    }

    fn product_url(&self, id: i64) -> String {
        format!("{}/productos/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::Conflict(response.body.clone())),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
