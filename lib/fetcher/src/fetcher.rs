//! The request pipeline.
//!
//! Every call runs the same fixed sequence:
//!
//! 1. **build** - target URL is `base_url` followed by the path, verbatim, and
//!    must parse before any hook runs; headers are layered: defaults, JSON content type, per-call headers
//! 2. **before hooks** - in registration order, each awaited before the next;
//!    explicit per-call headers are re-applied afterwards
//! 3. **dispatch** - exactly one transport call; transport errors are returned
//!    untouched
//! 4. **parse** - body parsed as JSON, `null` when that fails
//! 5. **after hooks** - in registration order, observing status and data
//! 6. **classify** - 2xx yields a [`FetchResponse`], anything else an
//!    [`Error::Fetcher`]

use std::sync::Arc;

use fetcher_core::{FetcherError, HttpClient, json_or_null};
use http::{HeaderMap, Method};
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::hooks::{AfterHook, BeforeHook, HookRegistry, RequestDraft, ResponseView};
use crate::options::parse_header;
use crate::{Error, FetchResponse, HyperClient, Request, RequestOptions, Result, merge};

/// HTTP client bound to a base URL, default headers and a hook registry.
///
/// # Example
///
/// ```ignore
/// use fetcher::prelude::*;
///
/// let mut api = Fetcher::builder()
///     .base_url("https://api.example.com")
///     .default_header("x-client", "docs")
///     .build()?;
/// api.add_after_hook(AfterHook::tracing());
///
/// let user = api.get("/users/42", RequestOptions::new()).await?;
/// println!("{}", user.data()["name"]);
/// ```
#[derive(Debug, Clone)]
pub struct Fetcher<C = HyperClient> {
    client: C,
    base_url: String,
    default_headers: HeaderMap,
    hooks: HookRegistry,
}

impl Fetcher<HyperClient> {
    /// Create a new builder using the default transport.
    #[must_use]
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }
}

impl<C: HttpClient> Fetcher<C> {
    /// Fetcher with no base URL, no default headers and no hooks.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: String::new(),
            default_headers: HeaderMap::new(),
            hooks: HookRegistry::new(),
        }
    }

    /// Prefix prepended to every path.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Instance default headers.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Registered hooks.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Underlying transport.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // Hook registration
    // ========================================================================

    /// Append a before-hook.
    pub fn add_before_hook(&mut self, hook: BeforeHook) -> &mut Self {
        self.hooks.add_before(hook);
        self
    }

    /// Append an after-hook.
    pub fn add_after_hook(&mut self, hook: AfterHook) -> &mut Self {
        self.hooks.add_after(hook);
        self
    }

    /// Remove every registration of `hook`; no-op if it was never added.
    pub fn remove_before_hook(&mut self, hook: &BeforeHook) -> &mut Self {
        self.hooks.remove_before(hook);
        self
    }

    /// Remove every registration of `hook`; no-op if it was never added.
    pub fn remove_after_hook(&mut self, hook: &AfterHook) -> &mut Self {
        self.hooks.remove_after(hook);
        self
    }

    /// Remove all before- and after-hooks.
    pub fn clear_hooks(&mut self) -> &mut Self {
        self.hooks.clear();
        self
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    /// `GET base_url + path`.
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::GET, path, options).await
    }

    /// `POST base_url + path`.
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::POST, path, options).await
    }

    /// `PUT base_url + path`.
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::PUT, path, options).await
    }

    /// `DELETE base_url + path`.
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::DELETE, path, options).await
    }

    /// `PATCH base_url + path`.
    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::PATCH, path, options).await
    }

    /// `HEAD base_url + path`. The body is empty, so `data` is always null.
    pub async fn head(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        self.request(Method::HEAD, path, options).await
    }

    /// Run the pipeline for an arbitrary method.
    ///
    /// # Errors
    ///
    /// - [`Error::Fetcher`] when the response status is not 2xx
    /// - [`Error::InvalidRequest`] for invalid per-call headers or bodies
    /// - [`Error::InvalidUrl`] when `base_url + path` is not a valid URL
    /// - any transport error, unchanged
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<FetchResponse> {
        let url = format!("{}{path}", self.base_url);
        let span = debug_span!("fetch", %method, %url);
        self.run(method, url, options).instrument(span).await
    }

    async fn run(
        &self,
        method: Method,
        url: String,
        options: RequestOptions,
    ) -> Result<FetchResponse> {
        let (call_headers, call_body, query) = options.into_parts()?;
        let target = parse_target(&url, &query)?;
        let url = if query.is_empty() { url } else { target.to_string() };

        let mut headers = merge::base_headers(&self.default_headers);
        merge::apply_overrides(&mut headers, &call_headers);
        let draft = RequestDraft::new(method, url, headers, call_body.clone());

        debug!(count = self.hooks.before().len(), "running before hooks");
        let mut draft = self.hooks.run_before(draft).await;
        merge::apply_overrides(draft.headers_mut(), &call_headers);
        if let Some(body) = call_body {
            draft.set_body(body);
        }

        let (method, url, headers, body) = draft.into_parts();
        let request = Request::builder(method.clone(), target)
            .headers(headers)
            .maybe_body(body)
            .build();
        debug!("dispatching request");
        let response = self.client.execute(request).await?;

        let (status, status_text, headers, body) = response.into_parts();
        let data = json_or_null(&body);
        if data.is_null() && !body.is_empty() {
            debug!(
                status,
                bytes = body.len(),
                "response body is not JSON, data set to null"
            );
        }

        let view = Arc::new(ResponseView::new(method, url, status, status_text, headers, data));
        debug!(count = self.hooks.after().len(), "running after hooks");
        self.hooks.run_after(&view).await;
        let view = Arc::try_unwrap(view).unwrap_or_else(|shared| ResponseView::clone(&shared));

        let success = view.is_success();
        let (status, status_text, headers, data) = view.into_parts();
        if !success {
            warn!(status, status_text = %status_text, "request failed");
            return Err(FetcherError::new(status_text, status, data, headers).into());
        }

        Ok(FetchResponse::new(data, status, headers))
    }
}

/// Validate the target URL and append query parameters, if any.
fn parse_target(url: &str, query: &[(String, String)]) -> Result<Url> {
    let mut parsed = Url::parse(url)?;
    if !query.is_empty() {
        parsed
            .query_pairs_mut()
            .extend_pairs(query.iter().map(|(name, value)| (name.as_str(), value.as_str())));
    }
    Ok(parsed)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Fetcher`].
///
/// # Example
///
/// ```ignore
/// let api = Fetcher::builder()
///     .base_url("https://test.com")
///     .default_header("x-base", "base-value")
///     .on_before(BeforeHook::bearer_auth(token))
///     .on_after(AfterHook::tracing())
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct FetcherBuilder {
    base_url: String,
    default_headers: HeaderMap,
    hooks: HookRegistry,
    error: Option<String>,
}

impl FetcherBuilder {
    /// Prefix prepended to every path. No slash normalization is applied.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Add one default header, replacing earlier values for the same name.
    #[must_use]
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        match parse_header(name.as_ref(), value.as_ref()) {
            Ok((name, value)) => {
                self.default_headers.insert(name, value);
            }
            Err(message) => {
                if self.error.is_none() {
                    self.error = Some(message);
                }
            }
        }
        self
    }

    /// Merge a prepared header map into the defaults.
    #[must_use]
    pub fn default_headers(mut self, headers: &HeaderMap) -> Self {
        merge::apply_overrides(&mut self.default_headers, headers);
        self
    }

    /// Register a before-hook.
    #[must_use]
    pub fn on_before(mut self, hook: BeforeHook) -> Self {
        self.hooks.add_before(hook);
        self
    }

    /// Register several before-hooks, in order.
    #[must_use]
    pub fn on_before_all(mut self, hooks: impl IntoIterator<Item = BeforeHook>) -> Self {
        for hook in hooks {
            self.hooks.add_before(hook);
        }
        self
    }

    /// Register an after-hook.
    #[must_use]
    pub fn on_after(mut self, hook: AfterHook) -> Self {
        self.hooks.add_after(hook);
        self
    }

    /// Register several after-hooks, in order.
    #[must_use]
    pub fn on_after_all(mut self, hooks: impl IntoIterator<Item = AfterHook>) -> Self {
        for hook in hooks {
            self.hooks.add_after(hook);
        }
        self
    }

    /// Build with the default [`HyperClient`] transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a default header was invalid.
    pub fn build(self) -> Result<Fetcher<HyperClient>> {
        self.build_with(HyperClient::new())
    }

    /// Build with a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if a default header was invalid.
    pub fn build_with<C: HttpClient>(self, client: C) -> Result<Fetcher<C>> {
        if let Some(message) = self.error {
            return Err(Error::invalid_request(message));
        }
        Ok(Fetcher {
            client,
            base_url: self.base_url,
            default_headers: self.default_headers,
            hooks: self.hooks,
        })
    }
}
