//! Response and error normalization.
//!
//! Callers never see transport details: a 2xx response becomes the decoded
//! payload, anything else becomes an [`ApiError`] whose message is picked by
//! [`MESSAGE_EXTRACTORS`], tried left to right.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{ApiError, TransportFailure};

/// Message used when no extractor yields anything.
pub const FALLBACK_MESSAGE: &str = "request failed";

/// A failed call as seen by the extractors.
#[derive(Debug)]
pub struct Failure<'a> {
    /// Response body parsed as JSON, when there was a body and it parsed.
    pub body: Option<Value>,
    /// Transport-level message.
    pub transport_message: Option<&'a str>,
}

impl<'a> Failure<'a> {
    pub fn from_transport(failure: &'a TransportFailure) -> Self {
        let body = failure
            .response
            .as_ref()
            .and_then(|resp| serde_json::from_str(&resp.body).ok());
        Self {
            body,
            transport_message: Some(failure.message.as_str()),
        }
    }

    fn body_field(&self, field: &str) -> Option<String> {
        match self.body.as_ref()?.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Message extractors in precedence order.
pub type Extractor = fn(&Failure<'_>) -> Option<String>;

pub const MESSAGE_EXTRACTORS: &[Extractor] = &[body_detail, body_message, transport_message];

fn body_detail(failure: &Failure<'_>) -> Option<String> {
    failure.body_field("detail")
}

fn body_message(failure: &Failure<'_>) -> Option<String> {
    failure.body_field("message")
}

fn transport_message(failure: &Failure<'_>) -> Option<String> {
    failure.transport_message.map(str::to_string)
}

/// Pick the message for a failure.
pub fn failure_message(failure: &Failure<'_>) -> String {
    MESSAGE_EXTRACTORS
        .iter()
        .filter_map(|extract| extract(failure))
        .find(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

/// Normalize a transport failure into an [`ApiError`].
pub fn normalize_failure(failure: &TransportFailure) -> ApiError {
    ApiError::new(failure_message(&Failure::from_transport(failure)))
}

/// Decode a 2xx body into the operation's payload type.
///
/// An empty body decodes as JSON `null`.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        ApiError::new(failure_message(&Failure {
            body: None,
            transport_message: Some(&e.to_string()),
        }))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message_for(body: Option<Value>, transport: Option<&str>) -> String {
        failure_message(&Failure {
            body,
            transport_message: transport,
        })
    }

    #[test]
    fn test_detail_wins() {
        assert_eq!(
            message_for(
                Some(json!({ "detail": "insufficient balance", "message": "other" })),
                Some("Request failed with status code 400"),
            ),
            "insufficient balance"
        );
    }

    #[test]
    fn test_message_when_no_detail() {
        assert_eq!(message_for(Some(json!({ "message": "x" })), None), "x");
    }

    #[test]
    fn test_transport_message_when_no_body_fields() {
        assert_eq!(message_for(None, Some("Network Error")), "Network Error");
        assert_eq!(
            message_for(Some(json!({ "error": "nope" })), Some("Network Error")),
            "Network Error"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(message_for(None, None), "request failed");
        assert_eq!(message_for(Some(json!({})), Some("")), "request failed");
    }

    #[test]
    fn test_empty_and_null_fields_are_skipped() {
        assert_eq!(
            message_for(Some(json!({ "detail": "", "message": "x" })), None),
            "x"
        );
        assert_eq!(
            message_for(Some(json!({ "detail": null })), Some("Network Error")),
            "Network Error"
        );
    }

    #[test]
    fn test_structured_detail_is_rendered() {
        let msg = message_for(Some(json!({ "detail": [{ "loc": ["query", "limit"] }] })), None);
        assert_eq!(msg, r#"[{"loc":["query","limit"]}]"#);
    }

    #[test]
    fn test_normalize_status_failure() {
        let failure = TransportFailure::status(409, r#"{"detail":"trade already sold"}"#);
        assert_eq!(normalize_failure(&failure).message(), "trade already sold");

        let failure = TransportFailure::status(500, "Internal Server Error");
        assert_eq!(
            normalize_failure(&failure).message(),
            "Request failed with status code 500"
        );
    }

    #[test]
    fn test_decode_payload() {
        let value: Value = decode_payload(r#"{"count": 2}"#).unwrap();
        assert_eq!(value["count"], 2);

        let empty: Option<u32> = decode_payload("").unwrap();
        assert_eq!(empty, None);

        let err = decode_payload::<u32>("not json").unwrap_err();
        assert!(!err.message().is_empty());
    }
}
