//! Cluster API integration for the observe gateway.
//!
//! Routes depend on the [`OcpClient`] trait rather than a concrete
//! transport, so tests can substitute canned responses for a live API
//! server. The production implementation, [`HttpOcpClient`], issues plain
//! HTTPS requests with a bearer token and the per-cluster TLS policy
//! resolved from the registry.

mod base;
mod http;

pub use base::*;
pub use http::*;
