//! Domain models for the product config service.

pub mod config_record;

pub use config_record::{ConfigBody, ConfigRecord, ErrorDetail};
