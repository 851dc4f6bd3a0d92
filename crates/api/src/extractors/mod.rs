//! Custom Axum extractors.
//!
//! Extractors for parsing request data into domain values, rejecting with `ApiError`.

pub mod json_body;
pub mod record_number;

pub use json_body::JsonBody;
pub use record_number::RecordNumber;
