use std::{sync::Mutex, time::Duration};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::trace;

/// Interval between upkeep passes over the collected metrics.
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

// install_recorder installs a process-global recorder and fails on a second
// call. Normal operation initializes once, but tests spawn many application
// instances in one process, so the installed handle is kept behind a mutex
// and handed out as clones.
static PROMETHEUS_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Installs the global metrics recorder and returns a render handle.
///
/// The first call installs the recorder and spawns a background task running
/// periodic upkeep so collected metrics do not grow without bound. Every
/// later call returns a clone of the same handle.
pub fn init_metrics_handle() -> Result<PrometheusHandle, BuildError> {
    let mut prometheus_handle = PROMETHEUS_HANDLE.lock().unwrap();

    if let Some(handle) = &*prometheus_handle {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    *prometheus_handle = Some(handle.clone());

    let handle_clone = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(UPKEEP_INTERVAL).await;
            trace!("running metrics upkeep");
            handle_clone.run_upkeep();
        }
    });

    Ok(handle)
}
