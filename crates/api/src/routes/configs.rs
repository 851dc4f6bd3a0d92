//! Config record endpoint handlers.
//!
//! Each handler acquires its own store session, performs one store call and
//! drops the session on return.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use domain::models::ConfigRecord;
use tracing::{debug, info};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, RecordNumber};

/// Location clients are sent to after an insert.
pub const COLLECTION_ROOT: &str = "/configs/";

/// Insert a config record.
///
/// POST /configs/
pub async fn insert_config(
    State(state): State<AppState>,
    JsonBody(record): JsonBody<ConfigRecord>,
) -> Result<Redirect, ApiError> {
    let mut session = state.store.session().await?;
    let stored = state.configs.insert(session.as_mut(), &record).await?;

    info!(
        number = stored.number,
        name = %stored.name,
        product_id = stored.product_id(),
        "Config record created"
    );

    Ok(Redirect::temporary(COLLECTION_ROOT))
}

/// List the most recently inserted config records.
///
/// GET /configs/
pub async fn list_recent_configs(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConfigRecord>>, ApiError> {
    let mut session = state.store.session().await?;
    let records = state
        .configs
        .list_recent(session.as_mut(), state.config.limits.recent_records)
        .await?;

    Ok(Json(records))
}

/// Get every config record with the given number.
///
/// GET /configs/:number
pub async fn get_configs_by_number(
    State(state): State<AppState>,
    RecordNumber(number): RecordNumber,
) -> Result<Json<Vec<ConfigRecord>>, ApiError> {
    let mut session = state.store.session().await?;
    let records = state.configs.find_by_number(session.as_mut(), number).await?;

    debug!(number, matches = records.len(), "Config records looked up");

    Ok(Json(records))
}

/// Get the config record for a product.
///
/// GET /configs/products/:product_id
pub async fn get_config_by_product_id(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ConfigRecord>, ApiError> {
    let mut session = state.store.session().await?;
    let record = state
        .configs
        .find_by_product_id(session.as_mut(), &product_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No config record for product '{}'", product_id))
        })?;

    Ok(Json(record))
}

/// Replace the config record with the given number.
///
/// PUT /configs/:number
pub async fn update_config(
    State(state): State<AppState>,
    RecordNumber(number): RecordNumber,
    JsonBody(record): JsonBody<ConfigRecord>,
) -> Result<Json<ConfigRecord>, ApiError> {
    let mut session = state.store.session().await?;
    let updated = state
        .configs
        .replace_by_number(session.as_mut(), number, &record)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No config record with number {}", number)))?;

    info!(number, name = %updated.name, "Config record replaced");

    Ok(Json(updated))
}

/// Fallback for methods a config route does not serve.
pub async fn method_not_supported() -> ApiError {
    ApiError::MethodNotSupported
}
