//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily-rolling log file.
    #[serde(default)]
    pub file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
            dir: default_log_dir(),
        }
    }
}

impl LoggingConfig {
    /// Log directory with `~` expanded.
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).into_owned())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "~/.taskflow/logs".to_string()
}

/// Pipeline runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Upper bound on a single step's `execute`. Unset means no bound.
    #[serde(default)]
    pub step_timeout_seconds: Option<u64>,

    /// Capacity of the per-run event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            step_timeout_seconds: None,
            event_buffer: default_event_buffer(),
        }
    }
}

impl RunnerConfig {
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_seconds.map(Duration::from_secs)
    }
}

fn default_event_buffer() -> usize {
    256
}

/// Which integrations the process should construct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub http: HttpIntegrationConfig,

    #[serde(default)]
    pub kv: KvIntegrationConfig,

    #[serde(default)]
    pub crm: CrmIntegrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpIntegrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpIntegrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: default_user_agent(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("taskflow/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_http_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvIntegrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Storage backend. Only `memory` ships with the CLI.
    #[serde(default = "default_kv_backend")]
    pub backend: String,
}

impl Default for KvIntegrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: default_kv_backend(),
        }
    }
}

fn default_kv_backend() -> String {
    "memory".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmIntegrationConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_crm_provider")]
    pub provider: String,
}

impl Default for CrmIntegrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_crm_provider(),
        }
    }
}

fn default_crm_provider() -> String {
    "hubspot".to_string()
}

fn default_true() -> bool {
    true
}
