//! End-to-end tests for `Fetcher` against a wiremock server.

use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use fetcher::prelude::*;
use fetcher::header::{CONTENT_TYPE, HeaderValue};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path, query_param},
};

#[derive(Debug, PartialEq, Deserialize)]
struct User {
    id: u32,
    name: String,
}

fn fetcher_for(server: &MockServer) -> Fetcher {
    Fetcher::builder()
        .base_url(server.uri())
        .build()
        .expect("fetcher")
}

#[tokio::test]
async fn get_returns_parsed_body_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "r-1")
                .set_body_json(json!({"id": 42})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetcher_for(&mock_server);
    let response = api.get("/users/42", RequestOptions::new()).await.expect("response");

    check!(response.status() == 200);
    check!(response.data() == &json!({"id": 42}));
    check!(response.header("X-Request-Id") == Some("r-1"));
}

#[tokio::test]
async fn per_call_header_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("x-base", "override"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Fetcher::builder()
        .base_url(mock_server.uri())
        .default_header("x-base", "value")
        .build()
        .expect("fetcher");

    let response = api
        .get("/items", RequestOptions::new().header("X-Base", "override"))
        .await
        .expect("response");

    check!(response.data() == &json!([]));
    let requests = mock_server.received_requests().await.expect("recording");
    let values: Vec<_> = requests[0].headers.get_all("x-base").iter().collect();
    check!(values.len() == 1);
}

#[tokio::test]
async fn hook_content_type_yields_to_per_call_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(header("content-type", "text/plain"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut api = fetcher_for(&mock_server);
    api.add_before_hook(BeforeHook::header(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    ));

    let response = api
        .post(
            "/notes",
            RequestOptions::new().header("content-type", "text/plain").body("hello"),
        )
        .await
        .expect("response");

    check!(response.status() == 201);
}

#[tokio::test]
async fn hook_content_type_applies_without_per_call_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut api = fetcher_for(&mock_server);
    api.add_before_hook(BeforeHook::header(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    ));

    let response = api
        .post("/form", RequestOptions::new().body("a=1"))
        .await
        .expect("response");

    check!(response.status() == 204);
    check!(response.data().is_null());
}

#[tokio::test]
async fn json_body_and_query_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/users/7"))
        .and(query_param("notify", "false"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Ada"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetcher_for(&mock_server);
    let response = api
        .put(
            "/users/7",
            RequestOptions::new()
                .json(&json!({"name": "Ada"}))
                .query("notify", "false"),
        )
        .await
        .expect("response");

    let user: User = response.json().expect("user");
    check!(user == User { id: 7, name: "Ada".to_string() });
}

#[tokio::test]
async fn not_found_is_a_fetcher_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-trace", "t-9")
                .set_body_json(json!({"error": "no such item"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetcher_for(&mock_server);
    let err = api.get("/missing", RequestOptions::new()).await.expect_err("404");

    check!(err.is_not_found());
    let_assert!(Some(parsed) = parse_error(&err));
    check!(parsed.status == 404);
    check!(parsed.message == "Not Found");
    check!(parsed.data == json!({"error": "no such item"}));
    check!(parsed.headers.get("x-trace").map(HeaderValue::as_bytes) == Some(&b"t-9"[..]));
}

#[tokio::test]
async fn server_error_with_text_body_has_null_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetcher_for(&mock_server);
    let err = api.delete("/items/3", RequestOptions::new()).await.expect_err("500");

    let_assert!(Some(failure) = err.as_fetcher_error());
    check!(failure.status() == 500);
    check!(failure.data().is_null());
}

#[tokio::test]
async fn empty_success_body_is_null_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = fetcher_for(&mock_server);
    let response = api
        .patch("/items/3", RequestOptions::new().json(&json!({"done": true})))
        .await
        .expect("response");

    check!(response.status() == 200);
    check!(response.data().is_null());
}

#[tokio::test]
async fn connection_failure_is_not_a_fetcher_error() {
    let api = Fetcher::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .expect("fetcher");

    let err = api.get("/anything", RequestOptions::new()).await.expect_err("refused");

    check!(err.is_connection());
    check!(parse_error(&err).is_none());
}

#[tokio::test]
async fn after_hooks_run_on_failure_before_the_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"retry": true})))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let seen = Arc::clone(&seen);
        AfterHook::sync(move |view| {
            seen.lock()
                .expect("lock")
                .push((view.status(), view.data().clone()));
        })
    };

    let api = Fetcher::builder()
        .base_url(mock_server.uri())
        .on_after(recorder)
        .on_after(AfterHook::tracing())
        .build()
        .expect("fetcher");

    let err = api.get("/boom", RequestOptions::new()).await.expect_err("503");

    check!(err.status() == Some(503));
    let seen = seen.lock().expect("lock");
    check!(seen.as_slice() == [(503, json!({"retry": true}))]);
}

#[tokio::test]
async fn bearer_auth_hook_and_removal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"me": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let auth = BeforeHook::bearer_auth("s3cret");
    let mut api = fetcher_for(&mock_server);
    api.add_before_hook(auth.clone());

    let response = api.get("/me", RequestOptions::new()).await.expect("authorized");
    check!(response.data() == &json!({"me": true}));

    api.remove_before_hook(&auth);
    let err = api.get("/me", RequestOptions::new()).await.expect_err("unauthorized");
    check!(err.status() == Some(401));
}

#[tokio::test]
async fn async_hooks_run_in_registration_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ordered"))
        .and(header("x-order", "first,second"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let append = |step: &'static str| {
        BeforeHook::new(move |mut draft: RequestDraft| async move {
            tokio::task::yield_now().await;
            let next = match draft.header("x-order") {
                Some(existing) => format!("{existing},{step}"),
                None => step.to_string(),
            };
            draft.set_header(
                fetcher::header::HeaderName::from_static("x-order"),
                HeaderValue::try_from(next).expect("valid header"),
            );
            draft
        })
    };

    let api = Fetcher::builder()
        .base_url(mock_server.uri())
        .on_before_all([append("first"), append("second")])
        .build()
        .expect("fetcher");

    let response = api.get("/ordered", RequestOptions::new()).await.expect("response");
    check!(response.status() == 200);
}
