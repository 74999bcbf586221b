//! Gatekeep Observability
//!
//! - Structured logging via `tracing` (console, plus rolling JSON files when `LOG_DIR` is set)
//! - HTTP request logging with a per-request id
//! - Prometheus metrics for HTTP traffic and for the authorization domain
//!
//! Metrics can be switched off at runtime with `OBSERVABILITY_ENABLED=false`.
//!
//! # Examples
//!
//! ```no_run
//! use gatekeep_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_tracing();
//!     let _handle = init_metrics();
//!     // ... application code ...
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware,
    track_application_bootstrapped, track_authorization_decision, track_login,
    track_user_registered,
};
