//! Core types and traits for the fetcher HTTP client.
//!
//! This crate provides the transport-independent types used by fetcher:
//! - [`Request`] and [`RequestBuilder`] - the request handed to a transport
//! - [`Response`] - the raw response a transport returns
//! - [`HttpClient`] - the transport trait
//! - [`Error`], [`FetcherError`] and [`Result`] - error handling
//! - [`parse_error`] and [`ParsedError`] - narrowing errors into a plain record
//! - [`Method`], [`StatusCode`], [`HeaderMap`] and [`header`] - re-exported from `http`

mod body;
mod client;
mod error;
pub mod prelude;
mod request;
mod response;

pub use body::{APPLICATION_JSON, from_json, from_value, json_or_null, to_json};
pub use client::HttpClient;
pub use error::{Error, FetcherError, ParsedError, Result, parse_error};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for methods, status codes and headers
pub use http::{HeaderMap, Method, StatusCode, header};
