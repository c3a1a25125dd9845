use crate::chunker::DEFAULT_CHUNK_SIZE;
use crate::error::ConfigError;
use crate::parser::ParseOptions;
use crate::retrieval::DEFAULT_TOP_K;
use crate::severity::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_CHUNK_SIZE: &str = "LOGMENTOR_CHUNK_SIZE";
pub const ENV_TOP_K: &str = "LOGMENTOR_TOP_K";
pub const ENV_LEVEL: &str = "LOGMENTOR_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParseOptions,
    pub chunk_size: usize,
    pub top_k: usize,
    /// `All` or a level token such as `ERROR`.
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParseOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
            level: "All".to_string(),
        }
    }
}

impl Config {
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from(self.level.as_str())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        Ok(())
    }
}

/// Reads a JSON config file, then applies `LOGMENTOR_*` environment overrides.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let mut cfg: Config =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    apply_overrides(&mut cfg, |key| env::var(key).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Defaults plus environment overrides, for runs without a config file.
pub fn from_env() -> Result<Config, ConfigError> {
    let mut cfg = Config::default();
    apply_overrides(&mut cfg, |key| env::var(key).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

fn apply_overrides<F>(cfg: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_CHUNK_SIZE) {
        cfg.chunk_size = parse_usize(ENV_CHUNK_SIZE, value)?;
    }
    if let Some(value) = lookup(ENV_TOP_K) {
        cfg.top_k = parse_usize(ENV_TOP_K, value)?;
    }
    if let Some(value) = lookup(ENV_LEVEL) {
        cfg.level = value;
    }
    Ok(())
}

fn parse_usize(var: &'static str, value: String) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv { var, value })
}
