use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the base configuration directory.
const CONFIG_DIR_ENV_NAME: &str = "ALARMFW_CONFIG";

/// Environment variable naming the base secrets directory.
const SECRETS_DIR_ENV_NAME: &str = "ALARMFW_SECRETS";

/// Default configuration directory, relative to the working directory.
const DEFAULT_CONFIG_DIR: &str = "config";

/// Default secrets directory, relative to the working directory.
const DEFAULT_SECRETS_DIR: &str = "secrets";

/// Subdirectory of the configuration directory holding the generated check
/// definitions.
const GENERATED_SUBDIR: &str = "generated";

/// File name of the override document.
const OVERRIDE_DOC_FILE: &str = "observe.yaml";

/// Filesystem roots from which cluster and Prometheus configuration is
/// resolved.
///
/// Built once at process start and passed by reference to the resolver
/// functions. Only the two base paths are captured here; the files beneath
/// them are re-read on every resolution.
#[derive(Debug, Clone)]
pub struct ObserveContext {
    config_dir: PathBuf,
    secrets_dir: PathBuf,
}

impl ObserveContext {
    /// Builds a context from `ALARMFW_CONFIG` and `ALARMFW_SECRETS`, falling
    /// back to the default relative directories when a variable is unset.
    pub fn from_env() -> Self {
        let config_dir =
            env::var(CONFIG_DIR_ENV_NAME).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
        let secrets_dir =
            env::var(SECRETS_DIR_ENV_NAME).unwrap_or_else(|_| DEFAULT_SECRETS_DIR.into());

        Self::new(config_dir, secrets_dir)
    }

    /// Builds a context rooted at explicit directories.
    pub fn new(config_dir: impl Into<PathBuf>, secrets_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets_dir: secrets_dir.into(),
        }
    }

    /// Directory of the generated check-definition files.
    pub fn generated_dir(&self) -> PathBuf {
        self.config_dir.join(GENERATED_SUBDIR)
    }

    /// Path of the manually curated override document.
    pub fn override_doc_path(&self) -> PathBuf {
        self.config_dir.join(OVERRIDE_DOC_FILE)
    }

    /// Base directory of the plain-text secret files.
    pub fn secrets_dir(&self) -> &Path {
        &self.secrets_dir
    }
}
