//! Transport trait.
//!
//! [`HttpClient`] is the single capability the request pipeline consumes: send
//! one request, get one response back. Implement it to plug in another HTTP
//! stack or an in-memory fake for tests.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations perform exactly one exchange per call. Non-2xx statuses are
/// not errors at this level; they come back as a [`Response`] and are
/// classified by the caller.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange itself fails:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts, when the transport enforces one
    /// - Invalid request
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        C::execute(self, request)
    }
}
