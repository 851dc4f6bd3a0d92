//! Common test utilities for integration tests.
//!
//! The router is driven in-process against the in-memory document store, so
//! these tests need no external services.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use fake::{faker::lorem::en::Word, Fake};
use persistence::store::MemoryDocumentStore;
use product_config_api::{app::create_app, config::Config};
use std::sync::Arc;

/// Test configuration: memory backend, default limits.
pub fn test_config() -> Config {
    Config::load_for_test(&[("logging.format", "pretty")]).expect("Failed to load test config")
}

/// Application router together with the store it writes to.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryDocumentStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryDocumentStore::new();
        let router = create_app(config, Arc::new(store.clone()));
        Self { router, store }
    }

    /// Send a request through a fresh clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

/// Build a request with a raw body.
pub fn raw_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    raw_request(method, uri, &body.to_string())
}

/// Build a request without a body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Parse a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Response body is not JSON: {:?}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// Random single-word record name.
pub fn random_name() -> String {
    Word().fake()
}
