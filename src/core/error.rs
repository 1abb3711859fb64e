//! Custom error types for the application.
//!
//! One enum per domain:
//!
//! - [`TransportFailure`] - what the HTTP layer reports before normalization
//! - [`ApiError`] - the single normalized error handed to API callers
//! - [`SessionError`] - token store persistence and selection errors
//! - [`RouteTableError`] - route table construction errors

use thiserror::Error;

/// Raw failure from the transport layer.
///
/// `response` is present when the server answered with a non-2xx status;
/// it is absent for network errors, timeouts and request construction
/// failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    /// Transport-level message ("Network Error", "timeout of 15000ms exceeded", ...).
    pub message: String,
    /// Response received from the server, if any.
    pub response: Option<FailedResponse>,
}

/// A non-2xx response as received.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedResponse {
    pub status: u16,
    pub body: String,
}

impl TransportFailure {
    /// Failure with no response (network error, timeout, ...).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// Failure carrying a non-2xx response.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            message: format!("Request failed with status code {}", status),
            response: Some(FailedResponse {
                status,
                body: body.into(),
            }),
        }
    }
}

/// Normalized API error: exactly one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message to show to the user.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Token store errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// localStorage not available.
    #[error("localStorage not available")]
    StorageUnavailable,
    /// Stored token list could not be encoded or decoded.
    #[error("token data is corrupted: {0}")]
    Corrupted(String),
    /// Failed to write to localStorage.
    #[error("failed to save tokens to localStorage")]
    SaveFailed,
    /// Token value is blank.
    #[error("token is empty")]
    EmptyToken,
    /// Selection refers to a token that is not registered.
    #[error("unknown token: {0}")]
    UnknownToken(String),
}

/// Route table construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("duplicate route path: {0}")]
    DuplicatePath(String),
    #[error("duplicate route name: {0}")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_failure_message() {
        let failure = TransportFailure::status(502, "<html>bad gateway</html>");
        assert_eq!(failure.message, "Request failed with status code 502");
        assert_eq!(failure.response.map(|r| r.status), Some(502));
    }

    #[test]
    fn test_api_error_display_is_message() {
        let err = ApiError::new("insufficient balance");
        assert_eq!(err.to_string(), "insufficient balance");
        assert_eq!(err.message(), "insufficient balance");
    }
}
