//! Prediction history entries and id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::features::HealthFeatures;
use super::result::PredictionResult;

/// A durably recorded prediction.
///
/// Owned by the ledger once saved; `id` is the sole lookup key. Entries are
/// immutable; only the ledger's clear operation removes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionHistoryEntry {
    /// Time-derived opaque id, monotonically increasing in-process
    pub id: String,

    /// Feature snapshot the prediction was computed from
    pub features: HealthFeatures,

    /// The interpreted result
    pub result: PredictionResult,

    /// Creation time, epoch milliseconds
    pub created_at: i64,

    /// Reserved for a future server-side sync; always false locally
    #[serde(default)]
    pub synced_to_cloud: bool,
}

impl PredictionHistoryEntry {
    /// Create a new unsynced entry.
    #[must_use]
    pub fn new(id: String, features: HealthFeatures, result: PredictionResult, created_at: i64) -> Self {
        Self {
            id,
            features,
            result,
            created_at,
            synced_to_cloud: false,
        }
    }
}

/// Generates time-derived, strictly increasing entry ids.
///
/// Ids are the current epoch milliseconds, bumped past the previous id when
/// the clock has not advanced (or has gone backwards), so two entries
/// created in the same millisecond still get distinct, ordered ids.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    last: AtomicU64,
}

impl EntryIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(observed) => prev = observed,
            }
        }
    }
}

/// Parse an entry id back to its numeric form for ordering.
///
/// Ids are opaque to callers; this is ledger-internal.
pub(crate) fn id_ordinal(id: &str) -> u64 {
    id.parse::<u64>().unwrap_or(0)
}
