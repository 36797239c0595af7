//! Layered settings: environment over config file over defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::env::{
    config_file, env_history_file, env_llm_api_key, env_llm_base_url, env_llm_model,
    env_llm_timeout, env_recommend_limit, env_stale_days, state_dir, DEFAULT_LLM_BASE_URL,
    DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_MS, DEFAULT_RECOMMEND_LIMIT, DEFAULT_STALE_DAYS,
};

/// Contents of `~/.learnpath/config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub recommend_limit: Option<usize>,
    #[serde(default)]
    pub stale_days: Option<u32>,
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    #[serde(default)]
    pub llm: FileLlmConfig,
}

/// `[llm]` table.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid learnpath config")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load the config file if present. Missing files yield defaults; broken
    /// files are logged and ignored.
    pub fn load() -> Self {
        let Some(path) = config_file() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Self::default();
        }
        match Self::read(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring config file");
                Self::default()
            }
        }
    }
}

/// Connection settings for the OpenAI-compatible task generator.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_LLM_TIMEOUT_MS),
        }
    }
}

impl LlmConfig {
    /// Environment-only view, used when no config file is involved.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn overlay_file(mut self, file: &FileLlmConfig) -> Self {
        if let Some(key) = file.api_key.clone().filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url.clone() {
            self.base_url = url;
        }
        if let Some(model) = file.model.clone() {
            self.model = model;
        }
        if let Some(ms) = file.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        self
    }

    fn overlay_env(mut self) -> Self {
        if let Some(key) = env_llm_api_key() {
            self.api_key = Some(key);
        }
        if let Some(url) = env_llm_base_url() {
            self.base_url = url;
        }
        if let Some(model) = env_llm_model() {
            self.model = model;
        }
        if let Some(timeout) = env_llm_timeout() {
            self.timeout = timeout;
        }
        self
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub recommend_limit: usize,
    pub stale_days: u32,
    /// `None` when no home directory could be found and nothing was configured.
    pub history_file: Option<PathBuf>,
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
            stale_days: DEFAULT_STALE_DAYS,
            history_file: default_history_file(),
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then environment variables.
    pub fn load() -> Self {
        Self::from_file(&FileConfig::load()).overlay_env()
    }

    /// Defaults overlaid with a parsed config file; environment is not read.
    pub fn from_file(file: &FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            recommend_limit: file
                .recommend_limit
                .filter(|&n| n > 0)
                .unwrap_or(defaults.recommend_limit),
            stale_days: file.stale_days.unwrap_or(defaults.stale_days),
            history_file: file.history_file.clone().or(defaults.history_file),
            llm: defaults.llm.overlay_file(&file.llm),
        }
    }

    fn overlay_env(mut self) -> Self {
        if let Some(limit) = env_recommend_limit() {
            self.recommend_limit = limit;
        }
        if let Some(days) = env_stale_days() {
            self.stale_days = days;
        }
        if let Some(path) = env_history_file() {
            self.history_file = Some(path);
        }
        self.llm = self.llm.overlay_env();
        self
    }
}

fn default_history_file() -> Option<PathBuf> {
    state_dir().ok().map(|d| d.join("progress-history.json"))
}
