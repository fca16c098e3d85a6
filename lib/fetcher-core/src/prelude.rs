//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetcher_core::prelude::*;
//! ```

pub use crate::{
    Error, FetcherError, HeaderMap, HttpClient, Method, ParsedError, Request, RequestBuilder,
    Response, Result, from_json, parse_error, to_json,
};
