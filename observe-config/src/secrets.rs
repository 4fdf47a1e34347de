use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::warn;

use crate::ObserveContext;

/// File name of the global Prometheus token.
const GLOBAL_PROMETHEUS_TOKEN_FILE: &str = "prometheus.token";

/// Reads a secret file, returning an empty value when it is missing or
/// unreadable.
///
/// Absence is silent. A failed read of an existing file (permissions, a
/// transient I/O error while the deployment rewrites the tree) logs a
/// warning and still returns empty so the caller degrades instead of
/// failing. The content is trimmed before wrapping.
pub fn read_secret(path: &Path) -> SecretString {
    match std::fs::read_to_string(path) {
        Ok(raw) => raw.trim().to_string().into(),
        Err(e) if e.kind() == ErrorKind::NotFound => String::new().into(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read secret file");
            String::new().into()
        }
    }
}

/// Path of a cluster's API token file.
pub fn cluster_token_path(ctx: &ObserveContext, cluster: &str) -> PathBuf {
    ctx.secrets_dir().join(format!("{cluster}.token"))
}

/// Reads a cluster's API token (`<secrets>/<cluster>.token`).
pub fn get_cluster_token(ctx: &ObserveContext, cluster: &str) -> SecretString {
    read_secret(&cluster_token_path(ctx, cluster))
}

/// Reads a cluster's Prometheus token (`<secrets>/<cluster>-prometheus.token`).
pub fn get_cluster_prometheus_token(ctx: &ObserveContext, cluster: &str) -> SecretString {
    read_secret(&ctx.secrets_dir().join(format!("{cluster}-prometheus.token")))
}

/// Reads a cluster's Loki token (`<secrets>/<cluster>-loki.token`).
pub fn get_cluster_loki_token(ctx: &ObserveContext, cluster: &str) -> SecretString {
    read_secret(&ctx.secrets_dir().join(format!("{cluster}-loki.token")))
}

/// Path of the global Prometheus token file.
pub(crate) fn global_prometheus_token_path(ctx: &ObserveContext) -> PathBuf {
    ctx.secrets_dir().join(GLOBAL_PROMETHEUS_TOKEN_FILE)
}
