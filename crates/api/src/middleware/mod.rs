//! HTTP middleware components.

pub mod logging;
pub mod method_guard;
pub mod metrics;
pub mod trace_id;

pub use method_guard::method_guard;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use trace_id::{trace_id, REQUEST_ID_HEADER};
