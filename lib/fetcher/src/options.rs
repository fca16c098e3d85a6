//! Per-call request options.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result, merge};

/// Headers, body and query parameters for one call.
///
/// Headers set here take precedence over instance defaults *and* over anything
/// a before-hook writes. Invalid names or values are reported when the call is
/// made, as [`Error::InvalidRequest`].
///
/// # Example
///
/// ```ignore
/// let options = RequestOptions::new()
///     .header("x-request-id", "abc")
///     .json(&NewUser { name: "Alice".into() });
/// let response = fetcher.post("/users", options).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    body: Option<Bytes>,
    query: Vec<(String, String)>,
    error: Option<String>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing earlier values for the same name.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match parse_header(name.as_ref(), value.as_ref()) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(message) => self.fail(message),
        }
        self
    }

    /// Merge a prepared header map, replacing earlier values key by key.
    #[must_use]
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        merge::apply_overrides(&mut self.headers, headers);
        self
    }

    /// Set a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// The `Content-Type` header is left to the usual layering, whose default
    /// is already `application/json`.
    #[must_use]
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        match fetcher_core::to_json(value) {
            Ok(body) => self.body = Some(body),
            Err(err) => self.fail(err.to_string()),
        }
        self
    }

    /// Append a query parameter to the target URL.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Per-call headers set so far.
    #[must_use]
    pub const fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    pub(crate) fn into_parts(self) -> Result<(HeaderMap, Option<Bytes>, Vec<(String, String)>)> {
        match self.error {
            Some(message) => Err(Error::invalid_request(message)),
            None => Ok((self.headers, self.body, self.query)),
        }
    }
}

/// Validate a header name/value pair given as strings.
pub(crate) fn parse_header(
    name: &str,
    value: &str,
) -> std::result::Result<(HeaderName, HeaderValue), String> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|err| format!("invalid header name {name:?}: {err}"))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|err| format!("invalid value for header {name:?}: {err}"))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn header_replaces_case_insensitively() {
        let options = RequestOptions::new()
            .header("X-Base", "one")
            .header("x-base", "two");

        check!(options.header_map().len() == 1);
        check!(options.header_map().get("X-BASE") == Some(&HeaderValue::from_static("two")));
    }

    #[test]
    fn json_sets_body() {
        let options = RequestOptions::new().json(&serde_json::json!({"name": "Alice"}));

        let_assert!(Ok((headers, Some(body), query)) = options.into_parts());
        check!(headers.is_empty());
        check!(query.is_empty());
        check!(body.as_ref() == br#"{"name":"Alice"}"#);
    }

    #[test]
    fn invalid_header_is_reported_at_call_time() {
        let options = RequestOptions::new()
            .header("bad header", "value")
            .header("x-ok", "fine");

        let_assert!(Err(Error::InvalidRequest(message)) = options.into_parts());
        check!(message.contains("bad header"));
    }

    #[test]
    fn first_error_wins() {
        let options = RequestOptions::new()
            .header("x-ok", "line\nbreak")
            .header("bad name", "v");

        let_assert!(Err(Error::InvalidRequest(message)) = options.into_parts());
        check!(message.contains("x-ok"));
    }
}
