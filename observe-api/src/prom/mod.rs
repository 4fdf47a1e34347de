//! Global Prometheus integration for the observe gateway.
//!
//! The PromQL routes depend on the [`PromClient`] trait and resolve the
//! connection facts (URL, token, TLS policy, timeout) fresh on every
//! request, so configuration edits take effect immediately. The production
//! implementation, [`HttpPromClient`], issues plain HTTPS requests against
//! the Prometheus HTTP API.

mod base;
mod http;

pub use base::*;
pub use http::*;
