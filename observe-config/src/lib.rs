//! Configuration resolution for the AlarmFW Observe gateway.
//!
//! Provides environment detection, the filesystem context the resolvers read
//! from, YAML loading, secret-file reading, the cluster registry built from
//! generated check definitions and the override document, and the global
//! Prometheus settings with environment-variable precedence.
//!
//! Everything here is recomputed from disk and the process environment on
//! every call, so external edits to the configuration tree are picked up
//! without a restart.

mod clusters;
mod context;
mod environment;
mod load;
mod prometheus;
mod secrets;
mod yaml;

pub use clusters::*;
pub use context::*;
pub use environment::*;
pub use load::*;
pub use prometheus::*;
pub use secrets::*;
pub use yaml::*;
