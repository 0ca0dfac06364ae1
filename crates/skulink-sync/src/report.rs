//! Run reports: per-product outcomes plus aggregate counters.

use chrono::{DateTime, Utc};
use skulink_core::Platform;

use crate::error::SyncError;

/// Terminal state of one product within a run.
#[derive(Debug)]
pub enum OutcomeStatus {
    Created { remote_id: String },
    Updated { changed: usize, appended: usize },
    Unchanged,
    Failed(SyncError),
}

/// One product's result line.
#[derive(Debug)]
pub struct ProductOutcome {
    pub title: String,
    /// First variant SKU, for log correlation.
    pub sku_hint: String,
    pub status: OutcomeStatus,
}

/// Everything that happened in one push run against a target.
#[derive(Debug)]
pub struct SyncReport {
    pub platform: Platform,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<ProductOutcome>,
}

impl SyncReport {
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Created { .. }))
    }

    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Updated { .. }))
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Unchanged))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, OutcomeStatus::Failed(_)))
    }

    /// True when the run processed products and every one of them failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.failed() == self.outcomes.len()
    }

    fn count(&self, predicate: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}
