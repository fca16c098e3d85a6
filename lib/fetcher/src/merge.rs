//! Header layering.
//!
//! Effective headers for a call are built from four layers, later layers
//! replacing earlier ones key by key:
//!
//! 1. instance default headers
//! 2. `Content-Type: application/json`, only when layer 1 has no content type
//! 3. whatever before-hooks write into the draft
//! 4. headers passed explicitly to the call
//!
//! Layer 4 is applied once before the hooks run (so hooks can see it) and once
//! after, so a hook can never clobber an explicit per-call header.

use fetcher_core::APPLICATION_JSON;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::HeaderMap;

/// Layers 1 and 2.
pub(crate) fn base_headers(defaults: &HeaderMap) -> HeaderMap {
    let mut headers = defaults.clone();
    headers
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(APPLICATION_JSON));
    headers
}

/// Replace every key of `overrides` in `target`.
///
/// All values previously stored under an overridden name are dropped, then
/// every value of `overrides` is appended, so multi-valued overrides survive.
pub(crate) fn apply_overrides(target: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        target.remove(name);
    }
    for (name, value) in overrides {
        target.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(*value));
        }
        headers
    }

    fn value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn base_headers_adds_json_content_type() {
        let headers = base_headers(&map(&[("x-base", "base-value")]));

        assert_eq!(value(&headers, "content-type"), Some("application/json"));
        assert_eq!(value(&headers, "x-base"), Some("base-value"));
    }

    #[test]
    fn base_headers_keeps_default_content_type() {
        let headers = base_headers(&map(&[("content-type", "text/csv")]));

        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(value(&headers, "content-type"), Some("text/csv"));
    }

    #[test]
    fn overrides_replace_matching_keys_only() {
        let mut target = map(&[("x-base", "base-value"), ("x-keep", "kept")]);
        apply_overrides(&mut target, &map(&[("x-base", "override")]));

        assert_eq!(value(&target, "x-base"), Some("override"));
        assert_eq!(value(&target, "x-keep"), Some("kept"));
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn overrides_are_case_insensitive() {
        let mut target = map(&[("content-type", "application/json")]);

        let mut overrides = HeaderMap::new();
        overrides.insert(
            http::HeaderName::from_bytes(b"Content-Type").expect("valid name"),
            HeaderValue::from_static("text/plain"),
        );
        apply_overrides(&mut target, &overrides);

        assert_eq!(target.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(value(&target, "Content-Type"), Some("text/plain"));
    }

    #[test]
    fn overrides_keep_every_value_of_a_multi_valued_header() {
        let mut target = map(&[("accept", "text/html")]);
        apply_overrides(
            &mut target,
            &map(&[("accept", "application/json"), ("accept", "text/plain")]),
        );

        let values: Vec<_> = target
            .get_all("accept")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert_eq!(values, ["application/json", "text/plain"]);
    }
}
