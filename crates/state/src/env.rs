use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RECOMMEND_LIMIT: usize = 10;
pub const DEFAULT_STALE_DAYS: u32 = 3;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_LLM_MODEL: &str = "grok-2-1212";
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 60_000;

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Returns `~/.learnpath`.
pub fn state_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".learnpath"))
}

/// Returns the path to the TOML config file (`LEARNPATH_CONFIG` overrides).
pub fn config_file() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("LEARNPATH_CONFIG") {
        return Some(PathBuf::from(custom));
    }
    state_dir().ok().map(|d| d.join("config.toml"))
}

/// Returns the progress history file set via `LEARNPATH_HISTORY_FILE`.
pub fn env_history_file() -> Option<PathBuf> {
    non_empty_var("LEARNPATH_HISTORY_FILE").map(PathBuf::from)
}

/// Returns the default result count from `LEARNPATH_RECOMMEND_LIMIT`.
pub fn env_recommend_limit() -> Option<usize> {
    parsed_var("LEARNPATH_RECOMMEND_LIMIT").filter(|&n| n > 0)
}

/// Returns the stale-task threshold in days from `LEARNPATH_STALE_DAYS`.
pub fn env_stale_days() -> Option<u32> {
    parsed_var("LEARNPATH_STALE_DAYS")
}

pub fn env_llm_api_key() -> Option<String> {
    non_empty_var("LEARNPATH_LLM_API_KEY")
}

pub fn env_llm_base_url() -> Option<String> {
    non_empty_var("LEARNPATH_LLM_BASE_URL")
}

pub fn env_llm_model() -> Option<String> {
    non_empty_var("LEARNPATH_LLM_MODEL")
}

/// Returns the LLM request timeout from `LEARNPATH_LLM_TIMEOUT_MS`.
///
/// Non-numeric values are ignored.
pub fn env_llm_timeout() -> Option<Duration> {
    parsed_var::<u64>("LEARNPATH_LLM_TIMEOUT_MS").map(Duration::from_millis)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_var(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_unset() {
        std::env::set_var("LEARNPATH_STATE_UNIT_BLANK", "   ");
        assert!(non_empty_var("LEARNPATH_STATE_UNIT_BLANK").is_none());
        std::env::remove_var("LEARNPATH_STATE_UNIT_BLANK");
    }

    #[test]
    fn unparsable_numbers_are_ignored() {
        std::env::set_var("LEARNPATH_STATE_UNIT_NUM", "ten");
        assert_eq!(parsed_var::<usize>("LEARNPATH_STATE_UNIT_NUM"), None);
        std::env::set_var("LEARNPATH_STATE_UNIT_NUM", "12");
        assert_eq!(parsed_var::<usize>("LEARNPATH_STATE_UNIT_NUM"), Some(12));
        std::env::remove_var("LEARNPATH_STATE_UNIT_NUM");
    }
}
