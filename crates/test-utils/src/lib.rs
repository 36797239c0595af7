//! Shared test utilities for learnpath crates.
//!
//! This crate provides common fixtures (resources, OKRs, tasks) and
//! environment helpers used across the workspace's test suites.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

use chrono::NaiveDate;
use learnpath_core::{
    ContentFeatures, DailyTask, DifficultyLevel, KeyResult, Language, Okr, Platform, Resource,
    ResourceType,
};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = learnpath_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value" until _guard drops
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Temporary home directory with a `.learnpath` config dir.
///
/// The tempdir is removed when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to ~/.learnpath in the temp environment
    pub config_dir: PathBuf,
}

impl TestFixture {
    /// Does NOT set HOME - use `home_guard()` for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_dir = tempdir.path().join(".learnpath");
        std::fs::create_dir_all(&config_dir)?;
        Ok(Self {
            tempdir,
            config_dir,
        })
    }

    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(&self.home_path().to_string_lossy()))
    }

    /// Write `~/.learnpath/config.toml`.
    pub fn write_config(&self, toml: &str) -> std::io::Result<PathBuf> {
        let path = self.config_dir.join("config.toml");
        std::fs::write(&path, toml)?;
        Ok(path)
    }

    /// Serialize `value` as JSON into a file under the temp dir.
    pub fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        let body = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

/// Resource with the given quality and nothing that would trigger a bonus
/// rule other than novelty.
pub fn resource(id: i64, quality: u8) -> Resource {
    Resource {
        id,
        title: format!("Resource {id}"),
        platform: Platform::Other,
        resource_type: ResourceType::Article,
        difficulty_level: DifficultyLevel::Beginner,
        language: Language::En,
        quality_score: Some(quality),
        ..Default::default()
    }
}

/// Resource that helps with the given obstacle tags.
pub fn resource_for_obstacles(id: i64, quality: u8, obstacles: &[&str]) -> Resource {
    Resource {
        content_features: ContentFeatures {
            suitable_for_obstacles: obstacles.iter().map(|o| o.to_string()).collect(),
            ..Default::default()
        },
        ..resource(id, quality)
    }
}

/// OKR whose key results carry the given progress values.
pub fn okr_with_progress(id: &str, progress: &[i64]) -> Okr {
    progress
        .iter()
        .enumerate()
        .fold(Okr::new(id, "Become fluent in Rust"), |okr, (i, p)| {
            okr.with_key_result(KeyResult::new(format!("Key result number {}", i + 1)).with_progress(*p))
        })
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Pending task feeding the key result at `index`.
pub fn task_for(okr_id: &str, index: usize, contribution: u8) -> DailyTask {
    DailyTask::new(okr_id, format!("Work on key result {}", index + 1), day(2026, 3, 2))
        .for_key_result(index, contribution)
}
