use std::sync::Once;

use metrics::{Unit, describe_counter};

static REGISTER_METRICS: Once = Once::new();

/// Counter of HTTP calls issued to upstreams, labeled by `upstream`.
pub const OBSERVE_UPSTREAM_REQUESTS_TOTAL: &str = "observe_upstream_requests_total";

/// Registers the metrics emitted by the gateway. Safe to call multiple
/// times; registration happens only once.
pub fn register_metrics() {
    REGISTER_METRICS.call_once(|| {
        describe_counter!(
            OBSERVE_UPSTREAM_REQUESTS_TOTAL,
            Unit::Count,
            "Total number of HTTP calls issued to cluster APIs and Prometheus"
        );
    });
}
