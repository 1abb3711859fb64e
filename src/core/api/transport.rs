//! HTTP transport for API requests.
//!
//! [`Transport`] is the seam between request descriptors and the network.
//! [`FetchTransport`] sends through the browser Fetch API with a hard
//! timeout; tests substitute a recording transport.

use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use web_sys::AbortController;

use super::request::{ApiRequest, Method};
use crate::config::REQUEST_TIMEOUT_MS;
use crate::core::error::TransportFailure;

/// Message reported when no response was received.
pub const NETWORK_ERROR: &str = "Network Error";

/// Sends one request and yields the raw 2xx body.
///
/// Non-2xx responses are failures carrying the response. Implementations
/// must not retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, url: &str, request: &ApiRequest) -> Result<String, TransportFailure>;
}

/// Fetch API transport with a fixed timeout and JSON content type.
#[derive(Debug, Clone, Copy)]
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }

    fn timeout_message(&self) -> String {
        format!("timeout of {}ms exceeded", self.timeout_ms)
    }
}

impl Default for FetchTransport {
    fn default() -> Self {
        Self::new(REQUEST_TIMEOUT_MS)
    }
}

impl Transport for FetchTransport {
    async fn send(&self, url: &str, request: &ApiRequest) -> Result<String, TransportFailure> {
        let controller = AbortController::new()
            .map_err(|_| TransportFailure::network("Failed to create request"))?;

        // Aborts the fetch once the deadline passes; dropping it cancels the timer.
        let timed_out = Rc::new(Cell::new(false));
        let _deadline = {
            let timed_out = Rc::clone(&timed_out);
            let controller = controller.clone();
            Timeout::new(self.timeout_ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let builder = match request.method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
        }
        .header("Content-Type", "application/json")
        .abort_signal(Some(&controller.signal()));

        let built = match &request.body {
            Some(body) => builder.body(body.to_string()),
            None => builder.build(),
        }
        .map_err(|e| TransportFailure::network(e.to_string()))?;

        let response = match built.send().await {
            Ok(response) => response,
            Err(_) if timed_out.get() => {
                return Err(TransportFailure::network(self.timeout_message()));
            }
            Err(e) => {
                tracing::debug!(error = %e, url, "fetch failed");
                return Err(TransportFailure::network(NETWORK_ERROR));
            }
        };

        let body = response.text().await.map_err(|e| {
            if timed_out.get() {
                TransportFailure::network(self.timeout_message())
            } else {
                TransportFailure::network(e.to_string())
            }
        })?;

        if response.ok() {
            Ok(body)
        } else {
            Err(TransportFailure::status(response.status(), body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let transport = FetchTransport::default();
        assert_eq!(transport.timeout_message(), "timeout of 15000ms exceeded");
    }
}
