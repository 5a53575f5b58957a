// Layered settings: defaults, user file, local file, environment

use std::path::PathBuf;

use bulkfs_history::{ReplayFailurePolicy, DEFAULT_HISTORY_FILE};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::CliResult;

/// Name of the per-directory settings file
pub const LOCAL_CONFIG_FILE: &str = "bulkfs.toml";

/// Prefix of the environment overrides (`BULKFS_HISTORY_FILE`, ...)
pub const ENV_PREFIX: &str = "BULKFS";

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// History file; relative paths resolve against the working directory
    pub history_file: PathBuf,
    /// What to do with a rename record whose replay fails
    pub on_failure: ReplayFailurePolicy,
    /// Log level used when neither `-v` nor `-q` is given
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            on_failure: ReplayFailurePolicy::default(),
            log_level: "warn".to_string(),
        }
    }
}

/// Loads [`Settings`] from its sources
pub struct SettingsLoader {
    /// User-wide settings file
    user_path: Option<PathBuf>,
    /// Settings file in the working directory
    local_path: PathBuf,
    /// Environment prefix; `None` disables environment overrides
    env_prefix: Option<String>,
}

impl SettingsLoader {
    /// Loader for the standard locations
    pub fn new() -> Self {
        Self {
            user_path: Self::default_user_path(),
            local_path: PathBuf::from(LOCAL_CONFIG_FILE),
            env_prefix: Some(ENV_PREFIX.to_string()),
        }
    }

    /// Loader reading only the given files
    pub fn with_paths(user_path: Option<PathBuf>, local_path: PathBuf) -> Self {
        Self {
            user_path,
            local_path,
            env_prefix: None,
        }
    }

    /// `<config dir>/bulkfs/config.toml`
    fn default_user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bulkfs").join("config.toml"))
    }

    /// Merge every source, lowest precedence first
    pub fn load(&self) -> CliResult<Settings> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "history_file",
                defaults.history_file.to_string_lossy().into_owned(),
            )?
            .set_default("on_failure", defaults.on_failure.to_string())?
            .set_default("log_level", defaults.log_level)?;

        if let Some(user_path) = &self.user_path {
            builder = builder.add_source(File::from(user_path.clone()).required(false));
        }
        builder = builder.add_source(File::from(self.local_path.clone()).required(false));
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix));
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
