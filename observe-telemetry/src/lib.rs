//! Telemetry for the AlarmFW Observe gateway.
//!
//! Structured logging through `tracing` (JSON files in production, pretty
//! console output in development) and a Prometheus recorder handle for the
//! metrics endpoint.

pub mod metrics;
pub mod tracing;
