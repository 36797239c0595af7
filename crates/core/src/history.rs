//! Destination for progress audit entries.

use std::sync::Mutex;

use anyhow::Result;

use crate::model::ProgressHistory;

/// Somewhere progress history entries can be written.
///
/// Writes are best-effort: callers log failures and keep the key-result
/// update regardless.
pub trait HistorySink {
    fn append(&self, entry: &ProgressHistory) -> Result<()>;
}

/// In-memory sink for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemHistorySink {
    entries: Mutex<Vec<ProgressHistory>>,
}

impl MemHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ProgressHistory> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl HistorySink for MemHistorySink {
    fn append(&self, entry: &ProgressHistory) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());
        Ok(())
    }
}
