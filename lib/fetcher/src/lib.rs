//! Thin async HTTP client with a base URL, layered headers and hooks.
//!
//! A [`Fetcher`] owns a base URL, default headers and an ordered list of
//! before- and after-hooks. Each call merges headers, runs the hooks, performs
//! exactly one request through an [`HttpClient`] transport, parses the body as
//! JSON and either returns a [`FetchResponse`] or fails with an [`Error`].
//!
//! # Example
//!
//! ```ignore
//! use fetcher::prelude::*;
//!
//! let mut api = Fetcher::builder()
//!     .base_url("https://api.example.com")
//!     .default_header("x-client", "example")
//!     .build()?;
//! api.add_before_hook(BeforeHook::bearer_auth(token))
//!     .add_after_hook(AfterHook::tracing());
//!
//! match api.get("/users/42", RequestOptions::new()).await {
//!     Ok(response) => println!("{}", response.data()),
//!     Err(err) => match parse_error(&err) {
//!         Some(failure) => println!("HTTP {}: {}", failure.status, failure.message),
//!         None => return Err(err),
//!     },
//! }
//! ```
//!
//! # Header precedence
//!
//! From lowest to highest: instance defaults, `Content-Type: application/json`
//! (only when the defaults have none), before-hook edits, per-call
//! [`RequestOptions`] headers.
//!
//! # Failure kinds
//!
//! - non-2xx status: [`Error::Fetcher`], carrying status text, status, parsed
//!   body and headers; narrow it with [`parse_error`]
//! - transport failure: the transport's error, returned as is
//! - unparseable body: not an error; `data` is `null`

mod config;
mod fetcher;
mod hooks;
mod merge;
pub mod middleware;
mod options;
pub mod prelude;
mod response;
mod transport;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use fetcher::{Fetcher, FetcherBuilder};
pub use hooks::{AfterHook, BeforeHook, HookFuture, HookRegistry, RequestDraft, ResponseView};
pub use options::RequestOptions;
pub use response::FetchResponse;
pub use transport::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use fetcher_core::{
    Error, FetcherError, HeaderMap, HttpClient, Method, ParsedError, Request, RequestBuilder,
    Response, Result, StatusCode, from_json, header, parse_error, to_json,
};

pub use url;
