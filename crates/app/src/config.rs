//! Layered configuration: defaults, then a TOML file, then `VCD_*`
//! environment variables. Command line flags are applied on top by the
//! commands themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use vcd_domain::{DEFAULT_POLL_INTERVAL, DEFAULT_TASK_TIMEOUT, InvokerSettings};
use vcd_domain::request::DEFAULT_API_TIMEOUT;

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vcd.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_timeout_secs: u64,
    pub task_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub skip_cert_check: bool,
    #[serde(default)]
    pub accept: Option<String>,
    /// Host to session token.
    #[serde(default)]
    pub sessions: HashMap<String, String>,
    /// JSON sessions file merged into `sessions`.
    #[serde(default)]
    pub sessions_file: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `path` (required) or `vcd.toml` (optional), then
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::new(&path.to_string_lossy(), FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        Config::builder()
            .set_default("api_timeout_secs", DEFAULT_API_TIMEOUT.as_secs())?
            .set_default("task_timeout_secs", DEFAULT_TASK_TIMEOUT.as_secs())?
            .set_default("poll_interval_secs", DEFAULT_POLL_INTERVAL.as_secs())?
            .set_default("skip_cert_check", false)?
            .add_source(file)
            .add_source(Environment::with_prefix("VCD").try_parsing(true).source(env))
            .build()?
            .try_deserialize()
    }

    pub const fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub const fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    pub fn invoker_settings(&self) -> InvokerSettings {
        InvokerSettings::with_poll_interval(Duration::from_secs(self.poll_interval_secs))
    }
}
