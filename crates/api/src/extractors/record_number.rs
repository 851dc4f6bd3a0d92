//! Record number path extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::ApiError;

/// Record number taken from the trailing path segment.
///
/// A segment that is not a base-10 `i64` rejects with [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordNumber(pub i64);

impl RecordNumber {
    pub fn parse(segment: &str) -> Result<Self, ApiError> {
        segment.parse::<i64>().map(RecordNumber).map_err(|_| {
            ApiError::BadRequest(format!(
                "Record number must be an integer, got '{}'",
                segment
            ))
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecordNumber
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        RecordNumber::parse(&segment)
    }
}
