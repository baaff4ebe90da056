//! Classify failures into retryable and terminal kinds.

use std::fmt;

/// High-level classification of a failed call for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller-side defect (HTTP 400-499), or a response the caller did not
    /// expect (a status below 400). Never retried.
    ClientError,
    /// Transport failure or server-side error. Retried while budget remains.
    Transient,
}

impl FailureKind {
    /// Classify by HTTP status.
    ///
    /// Only a missing status or a 5xx is transient. 408 and 429 are
    /// deliberately not special-cased: every 4xx is terminal. A status below
    /// 400 means the server already handled the request, so repeating it
    /// could apply a write twice.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None | Some(500..) => FailureKind::Transient,
            Some(_) => FailureKind::ClientError,
        }
    }

    pub fn is_retryable(self) -> bool {
        self == FailureKind::Transient
    }
}

/// Errors the executor knows how to classify.
pub trait Classify {
    /// HTTP status of the failed call, or `None` when no response arrived.
    fn status_code(&self) -> Option<u16>;

    fn failure_kind(&self) -> FailureKind {
        FailureKind::from_status(self.status_code())
    }
}

/// A failed network operation: optional status plus a human-readable cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub status: Option<u16>,
    pub cause: String,
}

impl ClassifiedFailure {
    pub fn http(status: u16, cause: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            cause: cause.into(),
        }
    }

    /// A failure with no response (timeout, refused connection, reset).
    pub fn transport(cause: impl Into<String>) -> Self {
        Self {
            status: None,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for ClassifiedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}

impl std::error::Error for ClassifiedFailure {}

impl Classify for ClassifiedFailure {
    fn status_code(&self) -> Option<u16> {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_range_is_terminal() {
        for status in [400, 401, 404, 408, 409, 429, 499] {
            assert_eq!(
                FailureKind::from_status(Some(status)),
                FailureKind::ClientError,
                "status {status}"
            );
        }
    }

    #[test]
    fn server_errors_and_missing_status_are_transient() {
        assert_eq!(FailureKind::from_status(None), FailureKind::Transient);
        for status in [500, 502, 503, 504, 599] {
            assert!(FailureKind::from_status(Some(status)).is_retryable());
        }
    }

    #[test]
    fn unexpected_success_statuses_are_terminal() {
        for status in [200, 201, 204, 302, 399] {
            assert_eq!(
                FailureKind::from_status(Some(status)),
                FailureKind::ClientError,
                "status {status}"
            );
        }
    }

    #[test]
    fn failure_display_carries_status() {
        assert_eq!(
            ClassifiedFailure::http(503, "Service Unavailable").to_string(),
            "HTTP 503: Service Unavailable"
        );
        assert_eq!(
            ClassifiedFailure::transport("connection refused").to_string(),
            "connection refused"
        );
    }
}
