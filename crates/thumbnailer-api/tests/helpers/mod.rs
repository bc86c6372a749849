//! Test helpers: build the router for integration tests.
//!
//! Run from workspace root: `cargo test -p thumbnailer-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use axum_test::TestServer;
use thumbnailer_core::Config;
use tower::Service;

/// Test server over the full router with default configuration
pub fn setup_test_app() -> TestServer {
    setup_test_app_with(Config::default())
}

pub fn setup_test_app_with(config: Config) -> TestServer {
    let (_state, app) =
        thumbnailer_api::setup::build_app(config).expect("Failed to build test app");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Router without a test transport, for requests with streamed bodies
pub fn setup_router_with(config: Config) -> Router {
    let (_state, app) =
        thumbnailer_api::setup::build_app(config).expect("Failed to build test app");
    app
}

/// Drive one request through the router and decode the JSON body
pub async fn call_json(
    router: &mut Router,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = router.call(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&body).expect("response body is not JSON");
    (status, headers, json)
}
