use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::Method,
    middleware,
    routing::{get, MethodRouter},
    BoxError, Router,
};
use persistence::repositories::ConfigRecordRepository;
use persistence::store::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{method_guard, metrics_handler, metrics_middleware, trace_id};
use crate::routes::{configs, health};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub configs: ConfigRecordRepository,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, store: Arc<dyn DocumentStore>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        store,
        configs: ConfigRecordRepository::new(config.namespace()),
        config: config.clone(),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    };

    // Collection root, with and without the trailing slash
    let collection_root = || -> MethodRouter<AppState> {
        get(configs::list_recent_configs)
            .post(configs::insert_config)
            .fallback(configs::method_not_supported)
    };

    let config_routes = Router::new()
        .route("/configs", collection_root())
        .route("/configs/", collection_root())
        .route(
            "/configs/products/:product_id",
            get(configs::get_config_by_product_id).fallback(configs::method_not_supported),
        )
        .route(
            "/configs/:number",
            get(configs::get_configs_by_number)
                .put(configs::update_config)
                .fallback(configs::method_not_supported),
        )
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        // Unsupported methods are rejected before CORS can answer them
        .layer(cors.clone())
        .layer(middleware::from_fn(method_guard));

    // Public routes
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .layer(cors);

    Router::new()
        .merge(public_routes)
        .merge(config_routes)
        .fallback(route_not_found)
        // Global middleware (order matters: bottom layers run first)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(config.server.request_timeout_secs)),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::RequestTimeout
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("No route for this path".to_string())
}
