//! Repository implementations for store operations.

pub mod config_record;

pub use config_record::ConfigRecordRepository;
