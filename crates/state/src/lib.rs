//! Manages learnpath configuration and persisted state.
//!
//! This crate provides utilities for:
//! - Reading environment variables for configuration.
//! - Layering `~/.learnpath/config.toml` under the environment.
//! - Storing the key-result progress history as a JSON file.

pub mod env;
pub mod history_store;
pub mod settings;

pub use env::{config_file, home_dir, state_dir};
pub use history_store::{JsonHistoryStore, HISTORY_QUERY_LIMIT};
pub use settings::{FileConfig, FileLlmConfig, LlmConfig, Settings};
