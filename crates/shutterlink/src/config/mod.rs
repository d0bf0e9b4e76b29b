use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used when composing image links, e.g.
    /// `https://pics.example.com`. The one field without a default.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_path")]
    pub upload_path: PathBuf,
    /// How long uploads stay resolvable, as a humantime string
    #[serde(default = "default_retention")]
    pub retention: String,
    /// Interval for the periodic expiry sweep. Absent means sweeps only
    /// happen opportunistically when images are resolved.
    #[serde(default)]
    pub sweep_interval: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted upload size in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

// Web defaults
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// Storage defaults
fn default_upload_path() -> PathBuf {
    PathBuf::from("./data/uploads")
}

fn default_retention() -> String {
    "24h".to_string()
}

// Upload defaults
fn default_max_file_size_mb() -> u64 {
    10
}

impl UploadConfig {
    /// The configured maximum upload size in bytes.
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: default_host(),
                port: default_port(),
                base_url: "http://localhost:8080".to_string(),
            },
            storage: StorageConfig {
                upload_path: default_upload_path(),
                retention: default_retention(),
                sweep_interval: None,
            },
            uploads: UploadConfig {
                max_file_size_mb: default_max_file_size_mb(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
