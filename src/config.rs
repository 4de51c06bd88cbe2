//! Settings of the panel itself (not the daemon configuration it edits)
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix, e.g. `EASYTIER_PANEL_POLL_INTERVAL_SECS`
pub const ENV_PREFIX: &str = "EASYTIER_PANEL";

/// Panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// JSON snapshot backing the config store
    pub store_path: PathBuf,

    /// Service name queried for the running status
    pub service_name: String,

    /// Instance of the service whose state is shown
    pub instance_name: String,

    /// Seconds between status polls
    pub poll_interval_secs: u64,

    /// Seconds to wait for one status query
    pub status_timeout_secs: u64,

    /// ubus client used to query procd
    pub ubus_path: String,

    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        PanelSettings {
            store_path: PathBuf::from("/etc/easytier-panel.json"),
            service_name: "easytier".to_string(),
            instance_name: "instance1".to_string(),
            poll_interval_secs: 5,
            status_timeout_secs: 5,
            ubus_path: "ubus".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PanelSettings {
    /// Layer defaults, the optional settings file and `EASYTIER_PANEL_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&PanelSettings::default())?);
        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs.max(1))
    }

    /// `log_level` as a tracing level, `info` when unrecognised
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
