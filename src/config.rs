use crate::territory::WORLD_CODE;
use crate::text::MAX_TEXT_LEN;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "factbook.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_world_code")]
    pub world_code: String,
    #[serde(default)]
    pub inspect: InspectConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            world_code: default_world_code(),
            inspect: InspectConfig::default(),
            log: LogConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn parser_code<'a>(&self, code: &'a str) -> &'a str {
        if code.eq_ignore_ascii_case(self.world_code.trim()) {
            WORLD_CODE
        } else {
            code
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            bail!("data_dir must not be empty");
        }
        if self.world_code.trim().is_empty() {
            bail!("world_code must not be empty");
        }
        if self.inspect.sample_limit == 0 {
            bail!("inspect.sample_limit must be at least 1");
        }
        if self.inspect.country_glob.trim().is_empty() {
            bail!("inspect.country_glob must not be empty");
        }
        glob::Pattern::new(&self.inspect.country_glob)
            .with_context(|| format!("invalid inspect.country_glob {}", self.inspect.country_glob))?;
        if self.limits.max_text_len == 0 || self.limits.max_text_len > MAX_TEXT_LEN {
            bail!("limits.max_text_len must be between 1 and {MAX_TEXT_LEN}");
        }
        if self.log.filter.trim().is_empty() {
            bail!("log.filter must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
    #[serde(default = "default_country_glob")]
    pub country_glob: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            sample_limit: default_sample_limit(),
            country_glob: default_country_glob(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(AppConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: AppConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse toml in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/countries")
}

fn default_world_code() -> String {
    WORLD_CODE.to_string()
}

fn default_sample_limit() -> usize {
    5
}

fn default_country_glob() -> String {
    "*".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_text_len() -> usize {
    MAX_TEXT_LEN
}
