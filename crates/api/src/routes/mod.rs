//! HTTP route handlers.

pub mod configs;
pub mod health;
