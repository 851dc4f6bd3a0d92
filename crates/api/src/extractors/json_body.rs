//! JSON request body extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body decoded as JSON regardless of `Content-Type`.
///
/// Unreadable bodies and decode failures reject with [`ApiError::BadRequest`].
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use domain::models::ConfigRecord;

    async fn extract(body: &'static str) -> Result<JsonBody<ConfigRecord>, ApiError> {
        let req = Request::builder()
            .method("POST")
            .uri("/configs/")
            .body(Body::from(body))
            .unwrap();
        JsonBody::<ConfigRecord>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_decodes_without_content_type() {
        let JsonBody(record) = extract(r#"{"number":1,"name":"a"}"#).await.unwrap();
        assert_eq!(record, ConfigRecord::new(1, "a"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let result = extract(r#"{"number":"#).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_empty_body_is_bad_request() {
        let result = extract("").await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
