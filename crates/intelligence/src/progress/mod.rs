//! Key-result progress updates driven by task completion or manual input.
//!
//! Every update yields the new key result plus a [`ProgressHistory`] entry
//! capturing the previous value. History is written separately through a
//! [`HistorySink`] on a best-effort basis.

mod batch;
mod propagator;

pub use batch::{BatchEntry, BatchOutcome, SkippedEntry};
pub use propagator::{commit_history, ProgressPropagator};

use learnpath_core::{KeyResult, Okr, Progress, ProgressHistory};
use serde::{Deserialize, Serialize};

/// Key results below this progress get the largest fallback contribution.
pub const EARLY_STAGE_LIMIT: u8 = 25;
/// Key results below this progress get the medium fallback contribution.
pub const MID_STAGE_LIMIT: u8 = 75;

const EARLY_STAGE_CONTRIBUTION: u8 = 15;
const MID_STAGE_CONTRIBUTION: u8 = 10;
const LATE_STAGE_CONTRIBUTION: u8 = 5;

/// Contribution assumed when task generation did not supply one.
///
/// Early tasks move the needle more than late-stage polish.
pub fn fallback_contribution(progress: Progress) -> u8 {
    match progress.value() {
        p if p < EARLY_STAGE_LIMIT => EARLY_STAGE_CONTRIBUTION,
        p if p < MID_STAGE_LIMIT => MID_STAGE_CONTRIBUTION,
        _ => LATE_STAGE_CONTRIBUTION,
    }
}

/// New state for one key result plus the audit entry describing the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub key_result_index: usize,
    pub key_result: KeyResult,
    pub history: ProgressHistory,
}

impl ProgressUpdate {
    /// Write the updated key result back into its OKR.
    ///
    /// Returns `false` if the OKR no longer has the index.
    pub fn apply_to(&self, okr: &mut Okr) -> bool {
        match okr.key_results.get_mut(self.key_result_index) {
            Some(slot) => {
                *slot = self.key_result.clone();
                true
            }
            None => false,
        }
    }
}
