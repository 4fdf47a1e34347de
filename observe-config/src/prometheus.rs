use std::env;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::secrets::global_prometheus_token_path;
use crate::yaml::{is_truthy, value_to_string, value_truthy};
use crate::{ObserveContext, load_yaml_mapping, read_secret};

/// Environment variable overriding the global Prometheus URL.
const PROMETHEUS_URL_ENV_NAME: &str = "PROMETHEUS_URL";

/// Environment variable overriding the TLS-verification-skip flag.
const PROMETHEUS_INSECURE_ENV_NAME: &str = "PROMETHEUS_INSECURE";

/// Environment variable overriding the query timeout in seconds.
const PROMETHEUS_TIMEOUT_ENV_NAME: &str = "PROMETHEUS_TIMEOUT_SEC";

/// Query timeout applied when neither the environment nor the override
/// document sets a valid one.
const DEFAULT_PROMETHEUS_TIMEOUT_SEC: u64 = 20;

/// The `global` section of the override document, empty when absent.
fn global_section(ctx: &ObserveContext) -> Mapping {
    load_yaml_mapping(&ctx.override_doc_path())
        .get("global")
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default()
}

/// Resolves the global Prometheus base URL.
///
/// `PROMETHEUS_URL` wins over the override document's
/// `global.prometheus_url`. Both sources are trimmed and any non-empty
/// string is accepted as-is; an unset or empty value resolves to empty.
pub fn get_global_prometheus_url(ctx: &ObserveContext) -> String {
    if let Ok(url) = env::var(PROMETHEUS_URL_ENV_NAME) {
        let url = url.trim();
        if !url.is_empty() {
            return url.to_string();
        }
    }

    global_section(ctx)
        .get("prometheus_url")
        .map(value_to_string)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Resolves the global Prometheus bearer token.
///
/// Sourced only from `<secrets>/prometheus.token`; the environment does not
/// participate, so rotating the token is a pure file operation.
pub fn get_global_prometheus_token(ctx: &ObserveContext) -> SecretString {
    read_secret(&global_prometheus_token_path(ctx))
}

/// Resolves whether TLS verification against Prometheus is skipped.
///
/// `PROMETHEUS_INSECURE` wins when set, else the override document's
/// `global.prometheus_insecure`, else false. Both sources accept the truthy
/// tokens `1`/`true`/`yes`/`on` case-insensitively.
pub fn get_global_prometheus_insecure(ctx: &ObserveContext) -> bool {
    if let Ok(raw) = env::var(PROMETHEUS_INSECURE_ENV_NAME) {
        return is_truthy(&raw);
    }

    global_section(ctx)
        .get("prometheus_insecure")
        .map(value_truthy)
        .unwrap_or(false)
}

/// Logical negation of [`get_global_prometheus_insecure`], in the shape TLS
/// stacks expect.
pub fn get_global_prometheus_verify_tls(ctx: &ObserveContext) -> bool {
    !get_global_prometheus_insecure(ctx)
}

/// Resolves the Prometheus query timeout in seconds.
///
/// `PROMETHEUS_TIMEOUT_SEC` wins when it parses as an integer of at least
/// one second; anything else is logged and the override document's
/// `global.prometheus_timeout_sec` is consulted under the same rule. Falls
/// back to 20.
pub fn get_global_prometheus_timeout_sec(ctx: &ObserveContext) -> u64 {
    if let Ok(raw) = env::var(PROMETHEUS_TIMEOUT_ENV_NAME) {
        match parse_timeout(&raw) {
            Some(secs) => return secs,
            None => warn!(value = %raw, "ignoring invalid PROMETHEUS_TIMEOUT_SEC"),
        }
    }

    if let Some(value) = global_section(ctx).get("prometheus_timeout_sec") {
        let raw = value_to_string(value);
        match parse_timeout(&raw) {
            Some(secs) => return secs,
            None => {
                warn!(value = %raw, "ignoring invalid prometheus_timeout_sec in override document")
            }
        }
    }

    DEFAULT_PROMETHEUS_TIMEOUT_SEC
}

/// Parses a timeout value, rejecting anything below one second.
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs >= 1)
}

/// UI polling summary of the global Prometheus connection state.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    /// Mirrors `has_token`; older UI builds read this field.
    pub logged_in: bool,
    /// A token is present in the global secret file.
    pub has_token: bool,
    /// A Prometheus URL is configured.
    pub has_prom_url: bool,
}

/// Reports whether a Prometheus token and URL are configured.
///
/// Derived purely from the resolvers above; no network call is made.
pub fn get_auth_status(ctx: &ObserveContext) -> AuthStatus {
    let has_token = !get_global_prometheus_token(ctx).expose_secret().is_empty();
    let has_prom_url = !get_global_prometheus_url(ctx).is_empty();

    AuthStatus {
        logged_in: has_token,
        has_token,
        has_prom_url,
    }
}
