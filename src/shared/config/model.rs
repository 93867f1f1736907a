use serde::Deserialize;
use std::env;

use crate::engine::complex::DEFAULT_NULL_MEMBER;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub load: LoadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// Text standing for a null member inside complex values.
    #[serde(default = "default_null_member")]
    pub null_member: String,
    /// Level separators, outermost first. Deeper levels reuse the last one.
    #[serde(default = "default_complex_delimiters")]
    pub complex_delimiters: Vec<String>,
    /// Number of partitions loaded in parallel
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    /// Rows per batch handed between steps
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_null_member() -> String {
    DEFAULT_NULL_MEMBER.to_string()
}

fn default_complex_delimiters() -> Vec<String> {
    vec!["$".to_string(), ":".to_string()]
}

fn default_partitions() -> usize {
    4
}

fn default_batch_size() -> usize {
    1000
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            null_member: default_null_member(),
            complex_delimiters: default_complex_delimiters(),
            partitions: default_partitions(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("INGEST_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
