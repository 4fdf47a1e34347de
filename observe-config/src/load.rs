use serde::de::DeserializeOwned;

use crate::environment::Environment;

/// Directory containing service-settings files, relative to the working
/// directory.
const CONFIGURATION_DIR: &str = "configuration";

/// Settings file shared by all environments.
const BASE_CONFIG_FILE: &str = "base.yaml";

/// Prefix of environment-variable overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between the prefix and the first key segment.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator between nested key segments, e.g. `APP_APPLICATION__PORT`
/// sets `application.port`.
const ENV_SEPARATOR: &str = "__";

/// Separator between list elements in a single environment variable.
const LIST_SEPARATOR: &str = ",";

/// Marks the keys of a settings type that must be parsed as lists when they
/// arrive through a single environment variable.
pub trait Config {
    /// Keys parsed as [`LIST_SEPARATOR`]-separated lists.
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Loads the service's own settings.
///
/// Sources are layered in order: `configuration/base.yaml`, then the
/// `configuration/{environment}.yaml` selected by `APP_ENVIRONMENT`, then
/// `APP`-prefixed environment variables. Later sources win per key.
///
/// These settings describe the gateway process itself (listen address, CORS
/// origins); the cluster and Prometheus configuration lives under the
/// [`ObserveContext`](crate::ObserveContext) directories instead and follows
/// its own precedence rules.
///
/// # Panics
/// Panics if the current directory cannot be determined or if
/// `APP_ENVIRONMENT` cannot be parsed.
pub fn load_config<T>() -> Result<T, config::ConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join(CONFIGURATION_DIR);

    let environment = Environment::load().expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{environment}.yaml");

    let mut environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    if !<T as Config>::LIST_PARSE_KEYS.is_empty() {
        environment_source = environment_source
            .try_parsing(true)
            .list_separator(LIST_SEPARATOR);

        for key in <T as Config>::LIST_PARSE_KEYS {
            environment_source = environment_source.with_list_parse_key(key);
        }
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join(BASE_CONFIG_FILE),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(environment_source)
        .build()?;

    settings.try_deserialize::<T>()
}
