use observe_config::Config;
use serde::Deserialize;

/// Complete configuration for the observe gateway service.
///
/// Covers the gateway process itself; the cluster registry and global
/// Prometheus settings are resolved per request from the `ALARMFW_CONFIG`
/// and `ALARMFW_SECRETS` directories instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Application server settings.
    pub application: ApplicationSettings,
    /// Origins allowed by the CORS layer; a single `*` entry allows any
    /// origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config for ApiConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["cors_allowed_origins"];
}

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    /// Host address the gateway listens on.
    pub host: String,
    /// Port number the gateway listens on.
    pub port: u16,
}
