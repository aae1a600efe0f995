//! ServiceConfig - Config Loader output
//!
//! Describes upload limits, where assignments are stored, where the worker
//! snapshot comes from, and logging/metrics settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::Worker;

/// Default upload size limit: 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ServiceConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Upload handling
    #[serde(default)]
    #[validate(nested)]
    pub ingestion: IngestionConfig,

    /// Assignment persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Inline worker list (used when no registry file is configured)
    #[serde(default)]
    #[validate(nested)]
    pub workers: Vec<WorkerConfig>,

    /// External registry file, takes precedence over `workers`
    #[serde(default)]
    pub registry: Option<RegistryConfig>,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// Upload handling
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngestionConfig {
    /// Largest accepted payload in bytes
    #[serde(default = "default_max_upload_bytes")]
    #[validate(range(min = 1))]
    pub max_upload_bytes: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

/// Assignment store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// One JSON document per assignment under `path`
    #[default]
    JsonFile,
}

/// Assignment persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the `json_file` backend
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/assignments")
}

/// Inline worker definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkerConfig {
    /// Unique identifier
    #[validate(length(min = 1))]
    pub id: String,

    /// Display name
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(default)]
    pub mobile: Option<String>,
}

impl From<&WorkerConfig> for Worker {
    fn from(config: &WorkerConfig) -> Self {
        Worker {
            id: config.id.as_str().into(),
            name: config.name.clone(),
            email: config.email.clone().unwrap_or_default(),
            mobile: config.mobile.clone().unwrap_or_default(),
        }
    }
}

/// Registry file location (JSON array of workers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub path: PathBuf,
}

/// Logging and metrics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus exporter port (None = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
