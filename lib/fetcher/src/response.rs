//! Success value of a [`crate::Fetcher`] call.

use http::HeaderMap;
use serde_json::Value;

use crate::Result;

/// Parsed body, status and headers of a 2xx response.
///
/// `data` is `Value::Null` when the body was empty or not JSON: a response the
/// server reported as successful stays a success even if its body is unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    data: Value,
    status: u16,
    headers: HeaderMap,
}

impl FetchResponse {
    /// Creates a new envelope.
    #[must_use]
    pub const fn new(data: Value, status: u16, headers: HeaderMap) -> Self {
        Self {
            data,
            status,
            headers,
        }
    }

    /// Parsed body.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
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

    /// Consume into the parsed body.
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Consume into (data, status, headers).
    #[must_use]
    pub fn into_parts(self) -> (Value, u16, HeaderMap) {
        (self.data, self.status, self.headers)
    }

    /// Decode the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonDeserialization` with the failing path when the
    /// body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        fetcher_core::from_value(self.data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn json_decodes_data() {
        let response = FetchResponse::new(json!({"id": 1, "name": "Alice"}), 200, HeaderMap::new());

        let user: User = response.json().expect("decode");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn json_on_null_data_fails_with_path() {
        let response = FetchResponse::new(Value::Null, 204, HeaderMap::new());

        let err = response.json::<User>().expect_err("null is not a user");
        assert!(matches!(err, crate::Error::JsonDeserialization { .. }), "got: {err}");
    }
}
