/*!
 * HTTP transport layer for delivering requests to the push backend.
 *
 * The core only sees the `Transport` trait: hand it a request, get back the
 * response bytes or a failure. The shipped implementation, `UreqTransport`,
 * uses `ureq`, a pure-Rust blocking HTTP client with no async runtime.
 *
 * Design decisions:
 * - **Blocking HTTP**: `send` runs on the background worker thread, never
 *   on the caller's thread.
 * - **Single attempt**: no retries. A failed request resolves `false`.
 * - **Status codes**: a non-2xx reply is a transport failure carrying the
 *   status and body in its message; only 2xx bodies are inspected for the
 *   success flag.
 */

use std::time::Duration;

use ureq::Agent;

use crate::error::TransportError;
use crate::protocol::constants::{API_KEY_HEADER, SDK_VERSION};

/// A fully built POST request: target URL, API key, JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub api_key: String,
    pub body: serde_json::Value,
}

/**
 * Executes one request and returns the raw response body.
 *
 * Called from the worker thread, so implementations may block. Exactly one
 * outcome per call: `Ok(bytes)` or `Err(TransportError)`.
 */
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<Vec<u8>, TransportError>;
}

// ---------------------------------------------------------------------------
// UreqTransport
// ---------------------------------------------------------------------------

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/**
 * Thin wrapper around `ureq::Agent`.
 *
 * Connection pooling and keep-alive are handled by the agent internally.
 */
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .timeout_global(Some(request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    /**
     * POSTs the JSON body with `Content-Type: application/json` and the API
     * key in the `ApiKey` header.
     */
    fn send(&self, request: &HttpRequest) -> Result<Vec<u8>, TransportError> {
        let response = self
            .agent
            .post(request.url.as_str())
            .header(API_KEY_HEADER, request.api_key.as_str())
            .header("User-Agent", SDK_VERSION)
            .send_json(&request.body)
            .map_err(|err| TransportError::new(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|err| TransportError::new(format!("Failed to read response body: {err}")))?;

        if !(200..300).contains(&status) {
            let body = String::from_utf8_lossy(&body);
            return Err(TransportError::new(format!("HTTP {status}: {body}")));
        }

        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{HttpRequest, Transport};
    use crate::error::TransportError;

    /// Answers every request with the same outcome and records what it saw.
    pub struct MockTransport {
        outcome: Result<Vec<u8>, Option<String>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn replying(body: &str) -> Self {
            Self {
                outcome: Ok(body.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: Option<&str>) -> Self {
            Self {
                outcome: Err(message.map(str::to_string)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn send(&self, request: &HttpRequest) -> Result<Vec<u8>, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.outcome {
                Ok(bytes) => Ok(bytes.clone()),
                Err(Some(message)) => Err(TransportError::new(message.clone())),
                Err(None) => Err(TransportError::without_message()),
            }
        }
    }
}
