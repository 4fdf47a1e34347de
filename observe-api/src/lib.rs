//! HTTP gateway for the AlarmFW Observe UI.
//!
//! Aggregates the cluster and Prometheus configuration resolved by
//! `observe-config` and proxies read-only queries (namespaces, pods, events,
//! PromQL) to the configured upstreams, reshaping each response into the
//! simplified JSON contract the UI expects. Includes CORS, OpenAPI
//! documentation, and a Prometheus metrics endpoint.

pub mod config;
pub mod metrics;
pub mod ocp;
pub mod prom;
pub mod routes;
pub mod startup;
