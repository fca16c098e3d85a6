//! Prelude module for convenient imports.
//!
//! ```ignore
//! use fetcher::prelude::*;
//! ```

pub use crate::{
    AfterHook, BeforeHook, Error, FetchResponse, Fetcher, FetcherError, HeaderMap, HttpClient,
    HyperClient, Method, ParsedError, RequestDraft, RequestOptions, ResponseView, Result,
    StatusCode, header, parse_error,
};
pub use serde::{Deserialize, Serialize};
