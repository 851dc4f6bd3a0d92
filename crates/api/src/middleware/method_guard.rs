//! Method guard for the config routes.
//!
//! Only GET, POST and PUT reach the config handlers. CORS preflight requests
//! pass through so the CORS layer can answer them; any other method is
//! rejected before routing and never opens a store session.

use axum::{
    body::Body,
    http::{header, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Methods served by the config routes.
pub const SUPPORTED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::PUT];

/// True for an OPTIONS request carrying both preflight headers.
fn is_cors_preflight(req: &Request<Body>) -> bool {
    req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ORIGIN)
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Rejects unsupported methods with [`ApiError::MethodNotSupported`].
pub async fn method_guard(req: Request<Body>, next: Next) -> Response {
    if SUPPORTED_METHODS.contains(req.method()) || is_cors_preflight(&req) {
        return next.run(req).await;
    }

    tracing::debug!(method = %req.method(), path = %req.uri().path(), "Method rejected");
    ApiError::MethodNotSupported.into_response()
}
