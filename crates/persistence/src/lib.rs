//! Persistence layer for the product config service.
//!
//! This crate contains:
//! - Database connection management
//! - The document store abstraction and its backends
//! - Entity definitions (stored document mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;
