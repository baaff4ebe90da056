//! Synchronous API client core for the EcoMarket product catalog.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), validates product payloads,
//! and provides the retrying executor the host wraps each round-trip in.
//!
//! # Design
//! - `EcoMarketClient` is stateless; it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `retry` never performs I/O itself: it calls a closure, classifies its
//!   error, and sleeps through an injected `Sleeper`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod retry;
pub mod types;
pub mod validate;

pub use client::EcoMarketClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use retry::{ClassifiedFailure, Classify, FailureKind, RetryExecutor, RetryPolicy};
pub use types::{Category, NewProduct, Producer, Product, ProductPatch, Timestamp, TimestampError};
pub use validate::ValidationError;
