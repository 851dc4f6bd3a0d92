//! Stored document entity definitions.
//!
//! Entities are direct mappings to stored rows.

pub mod document;

pub use document::DocumentEntity;
