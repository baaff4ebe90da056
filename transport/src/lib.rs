//! Blocking host for `ecomarket-core`.
//!
//! # Overview
//! The core crate only builds and parses HTTP messages. This crate owns the
//! network: `UreqTransport` executes requests, and `EcoMarket` ties the core
//! client, a transport, and the retrying executor together into one call per
//! catalog operation.
//!
//! # Design
//! - `Transport` is a trait so tests can replay canned responses.
//! - Configuration comes from the environment, with defaults that point at
//!   the public mock backend.

pub mod api;
pub mod config;
pub mod transport;

pub use api::EcoMarket;
pub use config::{ConfigError, EcoMarketConfig};
pub use transport::{Transport, UreqTransport};
