//! Before-request and after-response hooks.
//!
//! A [`BeforeHook`] receives the pending request as an owned [`RequestDraft`]
//! and hands it back when done, so each hook has exclusive access while it
//! runs and the pipeline reclaims the draft before calling the next one.
//!
//! An [`AfterHook`] observes the response through a shared [`ResponseView`];
//! it cannot change what the caller receives.
//!
//! Hooks are cheap handles. Cloning one yields the *same* hook: removal works
//! by identity, so keep a clone of whatever you register if you plan to remove
//! it later.
//!
//! ```ignore
//! let auth = BeforeHook::bearer_auth("secret");
//! fetcher.add_before_hook(auth.clone());
//! // ...
//! fetcher.remove_before_hook(&auth);
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde_json::Value;
use tracing::{info, warn};

/// Boxed future returned by hook callbacks.
pub type HookFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type BeforeFn = dyn Fn(RequestDraft) -> HookFuture<RequestDraft> + Send + Sync;
type AfterFn = dyn Fn(Arc<ResponseView>) -> HookFuture<()> + Send + Sync;

// ============================================================================
// Request Draft
// ============================================================================

/// The pending request as seen by before-hooks.
///
/// Method and URL are fixed; headers and body may be changed.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestDraft {
    pub(crate) fn new(method: Method, url: String, headers: HeaderMap, body: Option<Bytes>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL (base URL followed by the call path).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Single header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Current body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Remove and return the body.
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    pub(crate) fn into_parts(self) -> (Method, String, HeaderMap, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

// ============================================================================
// Response View
// ============================================================================

/// A received response as seen by after-hooks.
#[derive(Debug, Clone)]
pub struct ResponseView {
    method: Method,
    url: String,
    status: u16,
    status_text: String,
    headers: HeaderMap,
    data: Value,
}

impl ResponseView {
    pub(crate) fn new(
        method: Method,
        url: String,
        status: u16,
        status_text: String,
        headers: HeaderMap,
        data: Value,
    ) -> Self {
        Self {
            method,
            url,
            status,
            status_text,
            headers,
            data,
        }
    }

    /// Method of the request that produced this response.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// URL of the request that produced this response.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parsed body, `Value::Null` when the body was empty or not JSON.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub(crate) fn into_parts(self) -> (u16, String, HeaderMap, Value) {
        (self.status, self.status_text, self.headers, self.data)
    }
}

// ============================================================================
// Before Hook
// ============================================================================

/// Callback run before dispatch; may rewrite headers and body.
#[derive(Clone)]
pub struct BeforeHook {
    inner: Arc<BeforeFn>,
}

impl BeforeHook {
    /// Create an async hook that takes the draft and returns it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let hook = BeforeHook::new(|mut draft: RequestDraft| async move {
    ///     let token = fetch_token().await;
    ///     draft.set_header(AUTHORIZATION, token);
    ///     draft
    /// });
    /// ```
    pub fn new<F, Fut>(hook: F) -> Self
    where
        F: Fn(RequestDraft) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RequestDraft> + Send + 'static,
    {
        let inner: Arc<BeforeFn> =
            Arc::new(move |draft| -> HookFuture<RequestDraft> { Box::pin(hook(draft)) });
        Self { inner }
    }

    /// Create a hook from a synchronous mutation.
    pub fn sync<F>(hook: F) -> Self
    where
        F: Fn(&mut RequestDraft) + Send + Sync + 'static,
    {
        Self::new(move |mut draft| {
            hook(&mut draft);
            std::future::ready(draft)
        })
    }

    /// Hook that sets one header on every request.
    #[must_use]
    pub fn header(name: HeaderName, value: HeaderValue) -> Self {
        Self::sync(move |draft| {
            draft.set_header(name.clone(), value.clone());
        })
    }

    /// Hook that adds `Authorization: Bearer <token>`.
    ///
    /// A token that is not a valid header value is logged and skipped.
    pub fn bearer_auth(token: impl Into<String>) -> Self {
        let value = HeaderValue::try_from(format!("Bearer {}", token.into())).map(|mut value| {
            value.set_sensitive(true);
            value
        });
        Self::sync(move |draft| match &value {
            Ok(value) => {
                draft.set_header(AUTHORIZATION, value.clone());
            }
            Err(err) => warn!(error = %err, "bearer token is not a valid header value"),
        })
    }

    /// Returns `true` if both handles refer to the same registered callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call(&self, draft: RequestDraft) -> HookFuture<RequestDraft> {
        (self.inner)(draft)
    }
}

impl fmt::Debug for BeforeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeforeHook")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

// ============================================================================
// After Hook
// ============================================================================

/// Callback run after the response body has been parsed.
#[derive(Clone)]
pub struct AfterHook {
    inner: Arc<AfterFn>,
}

impl AfterHook {
    /// Create an async hook.
    pub fn new<F, Fut>(hook: F) -> Self
    where
        F: Fn(Arc<ResponseView>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let inner: Arc<AfterFn> =
            Arc::new(move |view| -> HookFuture<()> { Box::pin(hook(view)) });
        Self { inner }
    }

    /// Create a hook from a synchronous observer.
    pub fn sync<F>(hook: F) -> Self
    where
        F: Fn(&ResponseView) + Send + Sync + 'static,
    {
        Self::new(move |view| {
            hook(&*view);
            std::future::ready(())
        })
    }

    /// Hook that logs each response with `tracing`.
    #[must_use]
    pub fn tracing() -> Self {
        Self::sync(|view| {
            if view.is_success() {
                info!(
                    method = %view.method(),
                    url = view.url(),
                    status = view.status(),
                    "response received"
                );
            } else {
                warn!(
                    method = %view.method(),
                    url = view.url(),
                    status = view.status(),
                    status_text = view.status_text(),
                    "response indicates failure"
                );
            }
        })
    }

    /// Returns `true` if both handles refer to the same registered callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call(&self, view: Arc<ResponseView>) -> HookFuture<()> {
        (self.inner)(view)
    }
}

impl fmt::Debug for AfterHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AfterHook")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered before- and after-hook lists of one [`crate::Fetcher`].
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
}

impl HookRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a before-hook. Registering the same hook twice runs it twice.
    pub fn add_before(&mut self, hook: BeforeHook) {
        self.before.push(hook);
    }

    /// Append an after-hook.
    pub fn add_after(&mut self, hook: AfterHook) {
        self.after.push(hook);
    }

    /// Remove every registration of `hook`. No-op if absent.
    pub fn remove_before(&mut self, hook: &BeforeHook) {
        self.before.retain(|registered| !registered.ptr_eq(hook));
    }

    /// Remove every registration of `hook`. No-op if absent.
    pub fn remove_after(&mut self, hook: &AfterHook) {
        self.after.retain(|registered| !registered.ptr_eq(hook));
    }

    /// Drop all hooks.
    pub fn clear(&mut self) {
        self.before.clear();
        self.after.clear();
    }

    /// Registered before-hooks, in run order.
    #[must_use]
    pub fn before(&self) -> &[BeforeHook] {
        &self.before
    }

    /// Registered after-hooks, in run order.
    #[must_use]
    pub fn after(&self) -> &[AfterHook] {
        &self.after
    }

    /// Run every before-hook in order, each one awaited before the next.
    pub(crate) async fn run_before(&self, mut draft: RequestDraft) -> RequestDraft {
        for hook in &self.before {
            draft = hook.call(draft).await;
        }
        draft
    }

    /// Run every after-hook in order, each one awaited before the next.
    pub(crate) async fn run_after(&self, view: &Arc<ResponseView>) {
        for hook in &self.after {
            hook.call(Arc::clone(view)).await;
        }
    }
}
