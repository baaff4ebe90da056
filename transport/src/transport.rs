//! Executes core `HttpRequest` values over the network.

use std::time::Duration;

use ecomarket_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

/// Performs one HTTP round-trip.
///
/// Any response, whatever its status, is `Ok`. Failures where no response
/// arrived map to `ApiError::Transport`; a request that cannot be sent as
/// built maps to `ApiError::InvalidRequest`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are data here; the core client interprets them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let url = request.url.as_str();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(b)) => with_headers(self.agent.post(url), request).send(b.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(b)) => with_headers(self.agent.put(url), request).send(b.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), request).send_empty(),
            (HttpMethod::Patch, Some(b)) => with_headers(self.agent.patch(url), request).send(b.as_bytes()),
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), request).send_empty(),
        };
        let mut response = result.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copies every request header onto the builder. JSON bodies default to
/// `application/json` when the request names no content type.
fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let has_content_type = request
        .headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
    if request.body.is_some() && !has_content_type {
        builder = builder.header("content-type", "application/json");
    }
    builder
}

/// A request ureq refuses to build is the caller's defect; anything else
/// happened on the wire.
fn map_send_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => ApiError::InvalidRequest(err.to_string()),
        other => ApiError::Transport(other.to_string()),
    }
}
