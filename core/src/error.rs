//! Error types for the EcoMarket API client.
//!
//! # Design
//! `NotFound` and `Conflict` get dedicated variants because callers
//! distinguish "the product does not exist" and "the product already exists"
//! from "the server returned an unexpected status." All other non-2xx
//! responses land in `Http` with the raw status code and body. `Transport`
//! covers failures where no response arrived at all. `InvalidRequest` is a
//! request the HTTP stack refused to send (malformed URL, bad header); it is
//! never retried.

use thiserror::Error;

use crate::retry::{Classify, FailureKind};

/// Errors returned by `EcoMarketClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned 409; the body usually names the duplicate.
    #[error("resource already exists: {0}")]
    Conflict(String),

    /// The server returned a non-2xx status other than 404 or 409.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// No response was received (connect failure, timeout, broken read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request could not be sent as built (malformed URL or header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl Classify for ApiError {
    fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(_)
            | ApiError::InvalidRequest(_)
            | ApiError::Deserialization(_)
            | ApiError::Serialization(_) => None,
        }
    }

    fn failure_kind(&self) -> FailureKind {
        match self {
            // A second attempt would send, encode or decode the same bytes.
            ApiError::InvalidRequest(_) | ApiError::Deserialization(_) | ApiError::Serialization(_) => {
                FailureKind::ClientError
            }
            _ => FailureKind::from_status(self.status_code()),
        }
    }
}
