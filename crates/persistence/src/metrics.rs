//! Store metrics collection.

use metrics::{counter, histogram};
use std::time::Instant;

/// Record store query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Count a write against the config record collection.
pub fn record_write(operation: &'static str) {
    counter!("config_records_written_total", "operation" => operation).increment(1);
}

/// A helper to time store operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_config_records_by_number");
/// let result = session.find(&namespace, &filter, options).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    /// Create a new timer for the given query name.
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(self.query_name, duration);
    }
}
