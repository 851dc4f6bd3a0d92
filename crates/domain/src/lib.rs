//! Domain layer for the product config service.
//!
//! This crate contains:
//! - The `ConfigRecord` model
//! - The document codec used to store and query records

pub mod models;
