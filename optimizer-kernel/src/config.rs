use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

pub const CONFIG_PATH_VAR: &str = "MTA_OPTIMIZER_CONFIG";
pub const THRESHOLD_VAR: &str = "THRESHOLD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub bind: String,
    /// Raw threshold, parsed on every evaluation
    pub threshold: String,
    pub storage: StorageConf,
    /// When set, every route except /health* requires `x-api-key`
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConf {
    pub backend: StorageBackend,
    pub data_dir: String,
    pub bucket: String,
    pub key: String,
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    Memory,
    S3,
}

impl std::str::FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fs" => Ok(StorageBackend::Fs),
            "memory" => Ok(StorageBackend::Memory),
            "s3" => Ok(StorageBackend::S3),
            _ => Err(()),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".into(),
            threshold: String::new(),
            storage: StorageConf::default(),
            api_key: None,
        }
    }
}

impl Default for StorageConf {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Fs,
            data_dir: "./data".into(),
            bucket: "mta-hosting-optimizer".into(),
            key: "ip-config.json".into(),
            region: None,
        }
    }
}

impl OptimizerConfig {
    /// Environment variables win over file values. Empty values are ignored,
    /// except for THRESHOLD which is kept verbatim.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(threshold) = lookup(THRESHOLD_VAR) {
            self.threshold = threshold;
        }
        if let Some(bind) = non_empty("MTA_OPTIMIZER_BIND") {
            self.bind = bind;
        }
        if let Some(backend) = non_empty("MTA_OPTIMIZER_BACKEND") {
            self.storage.backend = backend
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var: "MTA_OPTIMIZER_BACKEND", value: backend.clone() })?;
        }
        if let Some(dir) = non_empty("MTA_OPTIMIZER_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(bucket) = non_empty("MTA_OPTIMIZER_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(key) = non_empty("MTA_OPTIMIZER_KEY") {
            self.storage.key = key;
        }
        if let Some(region) = non_empty("MTA_OPTIMIZER_REGION") {
            self.storage.region = Some(region);
        }
        if let Some(api_key) = non_empty("MTA_OPTIMIZER_API_KEY") {
            self.api_key = Some(api_key);
        }
        Ok(())
    }
}

/// Reads the YAML file (missing file = defaults) then applies env overrides.
pub async fn load_config() -> Result<OptimizerConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "optimizer.yaml".into());
    let mut cfg = load_config_file(&path).await?;
    cfg.apply_overrides(|var| std::env::var(var).ok())?;
    Ok(cfg)
}

pub async fn load_config_file<P: AsRef<Path>>(path: P) -> Result<OptimizerConfig, ConfigError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    if !path.exists() {
        warn!(path = %shown, "no config file, using defaults");
        return Ok(OptimizerConfig::default());
    }
    let txt = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read { path: shown.clone(), source })?;
    if txt.trim().is_empty() {
        return Ok(OptimizerConfig::default());
    }
    let cfg = serde_yaml::from_str(&txt).map_err(|source| ConfigError::Parse { path: shown.clone(), source })?;
    info!(path = %shown, "config loaded");
    Ok(cfg)
}
