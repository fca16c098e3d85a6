//! Error types for fetcher.
//!
//! Two families of failure leave a call:
//!
//! - [`Error::Fetcher`] wraps a [`FetcherError`]: the server answered, but with
//!   a non-success status. It carries the status, the parsed body and the
//!   response headers.
//! - Every other variant comes from the transport or from building the request
//!   and is returned exactly as produced, never converted into a [`FetcherError`].
//!
//! Use [`parse_error`] to narrow an arbitrary error into a [`ParsedError`].

use derive_more::{Display, Error, From};
use http::HeaderMap;
use serde_json::Value;

// ============================================================================
// Protocol Error
// ============================================================================

/// A protocol-level failure: the response status was not 2xx.
#[derive(Debug, Clone, Display, Error)]
#[display("request failed with status {status}: {message}")]
pub struct FetcherError {
    message: String,
    status: u16,
    data: Value,
    headers: HeaderMap,
}

impl FetcherError {
    /// Create a new protocol error.
    #[must_use]
    pub fn new(message: impl Into<String>, status: u16, data: Value, headers: HeaderMap) -> Self {
        Self {
            message: message.into(),
            status,
            data,
            headers,
        }
    }

    /// Status text of the failed response.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Parsed response body, `Value::Null` when the body was empty or not JSON.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decode the error body into a typed value.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     code: String,
    /// }
    ///
    /// if let Err(Error::Fetcher(err)) = fetcher.get("/users/42", RequestOptions::new()).await {
    ///     let api: ApiError = err.decode_data()?;
    /// }
    /// ```
    pub fn decode_data<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        crate::from_value(self.data.clone())
    }

    /// Copy the fields into a plain [`ParsedError`] record.
    #[must_use]
    pub fn to_parsed(&self) -> ParsedError {
        ParsedError {
            message: self.message.clone(),
            status: self.status,
            data: self.data.clone(),
            headers: self.headers.clone(),
        }
    }
}

/// Plain record of a [`FetcherError`], as returned by [`parse_error`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedError {
    /// Status text of the failed response.
    pub message: String,
    /// Numeric status code.
    pub status: u16,
    /// Parsed response body.
    pub data: Value,
    /// Response headers.
    pub headers: HeaderMap,
}

/// Narrow an arbitrary error into a [`ParsedError`].
///
/// Returns `None` when the error is not a protocol failure produced by this
/// crate; transport errors and foreign errors must be inspected by the caller.
///
/// # Example
///
/// ```ignore
/// match fetcher.get("/missing", RequestOptions::new()).await {
///     Ok(response) => println!("{:?}", response.data()),
///     Err(err) => match parse_error(&err) {
///         Some(parsed) => println!("HTTP {}: {}", parsed.status, parsed.message),
///         None => println!("transport failure: {err}"),
///     },
/// }
/// ```
#[must_use]
pub fn parse_error(error: &(dyn std::error::Error + 'static)) -> Option<ParsedError> {
    if let Some(err) = error.downcast_ref::<FetcherError>() {
        return Some(err.to_parsed());
    }
    error
        .downcast_ref::<Error>()
        .and_then(Error::as_fetcher_error)
        .map(FetcherError::to_parsed)
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for fetcher operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Non-2xx response.
    #[display("{_0}")]
    #[from]
    Fetcher(FetcherError),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Transport timeout, only raised when the transport is configured with one.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration (bad header, unbuildable request).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The protocol error, if this is one.
    #[must_use]
    pub const fn as_fetcher_error(&self) -> Option<&FetcherError> {
        match self {
            Self::Fetcher(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if this is a protocol error (non-2xx response).
    #[must_use]
    pub const fn is_fetcher(&self) -> bool {
        matches!(self, Self::Fetcher(_))
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is a protocol error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Fetcher(err) => Some(err.status),
            _ => None,
        }
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
