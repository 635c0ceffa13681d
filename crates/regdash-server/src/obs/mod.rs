//! Lightweight in-process metrics (dependency-free apart from `dashmap`).
//!
//! Loader counters are stored as atomics and rendered by the `/metrics`
//! handler in Prometheus text format.

pub mod metrics;

pub use metrics::LoaderMetrics;
