//! Raw HTTP response returned by the transport.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// HTTP response with status, status text, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    status_text: String,
    headers: HeaderMap,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response, using the canonical reason phrase as status text.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: B) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            headers,
            body,
        }
    }

    /// Replace the status text (for transports that expose the server's reason phrase).
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Status text, e.g. `Not Found`.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into (status, status text, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, String, HeaderMap, B) {
        (self.status, self.status_text, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
