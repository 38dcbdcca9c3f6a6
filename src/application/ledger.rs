//! Prediction ledger: Durable local record of every prediction.
//!
//! Built entirely on the record-store port. Entries are serialized as
//! opaque JSON payloads keyed by their id; the ledger owns ordering,
//! id allocation, and aggregate stats.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::domain::{
    id_ordinal, EntryIdGenerator, HealthFeatures, PredictionHistoryEntry, PredictionResult,
};
use crate::ports::RecordStore;

/// Aggregate ledger statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub count: usize,
    pub has_any_entries: bool,
}

/// Append-preferred store of prediction history.
pub struct PredictionLedger<S: RecordStore> {
    store: Arc<S>,
    ids: EntryIdGenerator,
}

impl<S> PredictionLedger<S>
where
    S: RecordStore,
    S::Error: Into<StorageError>,
{
    /// Create a ledger over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            ids: EntryIdGenerator::new(),
        }
    }

    /// Save an entry.
    ///
    /// An id collision resolves by overwrite. Never blocks on network;
    /// write ordering follows call order through the store's serialization.
    ///
    /// # Errors
    /// Returns error if serialization or the store write fails.
    pub fn save(&self, entry: &PredictionHistoryEntry) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(entry)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(&entry.id, &payload).map_err(Into::into)?;

        tracing::debug!("Recorded prediction {}", entry.id);
        Ok(())
    }

    /// Allocate an id, stamp the creation time, and save a new entry.
    ///
    /// # Errors
    /// Returns error if the save fails.
    pub fn record(
        &self,
        features: HealthFeatures,
        result: PredictionResult,
    ) -> Result<PredictionHistoryEntry, StorageError> {
        let entry = PredictionHistoryEntry::new(
            self.ids.next_id(),
            features,
            result,
            chrono::Utc::now().timestamp_millis(),
        );
        self.save(&entry)?;
        Ok(entry)
    }

    /// Read the full history, most recent first.
    ///
    /// Each call re-reads the current state; it is not a live cursor.
    ///
    /// # Errors
    /// Returns error if the read or deserialization fails.
    pub fn list_all(&self) -> Result<Vec<PredictionHistoryEntry>, StorageError> {
        let mut entries = self
            .store
            .get_all()
            .map_err(Into::into)?
            .into_iter()
            .map(|record| {
                serde_json::from_slice::<PredictionHistoryEntry>(&record.value)
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Ids are monotonic, so the id ordinal breaks created_at ties in
        // call order.
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| id_ordinal(&b.id).cmp(&id_ordinal(&a.id)))
        });

        Ok(entries)
    }

    /// Delete the entire history. Destructive and irreversible.
    ///
    /// # Errors
    /// Returns error if the delete fails.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.store.delete_all().map_err(Into::into)?;
        tracing::info!("Prediction history cleared");
        Ok(())
    }

    /// Aggregate stats over the current history.
    ///
    /// # Errors
    /// Returns error if the read fails.
    pub fn stats(&self) -> Result<LedgerStats, StorageError> {
        let count = self.store.get_all().map_err(Into::into)?.len();
        Ok(LedgerStats {
            count,
            has_any_entries: count > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteStore;
    use crate::domain::{PredictionSource, Recommendations, RiskTier};

    fn test_ledger() -> PredictionLedger<SqliteStore> {
        PredictionLedger::new(Arc::new(SqliteStore::in_memory().expect("Should create db")))
    }

    fn sample_result(score: f64) -> PredictionResult {
        PredictionResult {
            risk_tier: RiskTier::from_score(score),
            risk_score: score,
            confidence: 0.8,
            inference_time_ms: 4,
            source: PredictionSource::OnDevice,
            recommendations: Recommendations::Advisories(vec![]),
        }
    }

    #[test]
    fn test_save_then_list_roundtrip() {
        let ledger = test_ledger();

        let features = HealthFeatures {
            bmi: 31.0,
            age: 8.0,
            ..Default::default()
        };
        let saved = ledger
            .record(features.clone(), sample_result(55.0))
            .expect("Should record");

        let listed = ledger.list_all().expect("Should list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
        assert_eq!(listed[0].features, features);
        assert_eq!(listed[0].result, saved.result);
        assert!(!listed[0].synced_to_cloud);
    }

    #[test]
    fn test_two_saves_list_most_recent_first() {
        let ledger = test_ledger();

        let first = ledger
            .record(HealthFeatures::default(), sample_result(10.0))
            .expect("Should record");
        let second = ledger
            .record(HealthFeatures::default(), sample_result(80.0))
            .expect("Should record");

        let listed = ledger.list_all().expect("Should list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_clear_all() {
        let ledger = test_ledger();

        ledger
            .record(HealthFeatures::default(), sample_result(10.0))
            .expect("Should record");
        ledger.clear_all().expect("Should clear");

        assert!(ledger.list_all().expect("Should list").is_empty());
        let stats = ledger.stats().expect("Should read stats");
        assert_eq!(stats.count, 0);
        assert!(!stats.has_any_entries);
    }

    #[test]
    fn test_stats_counts_entries() {
        let ledger = test_ledger();

        assert_eq!(ledger.stats().expect("Should read stats").count, 0);

        ledger
            .record(HealthFeatures::default(), sample_result(10.0))
            .expect("Should record");
        ledger
            .record(HealthFeatures::default(), sample_result(20.0))
            .expect("Should record");

        let stats = ledger.stats().expect("Should read stats");
        assert_eq!(stats.count, 2);
        assert!(stats.has_any_entries);
    }

    #[test]
    fn test_id_collision_overwrites() {
        let ledger = test_ledger();

        let entry = ledger
            .record(HealthFeatures::default(), sample_result(10.0))
            .expect("Should record");

        let mut replacement = entry.clone();
        replacement.result = sample_result(90.0);
        ledger.save(&replacement).expect("Should overwrite");

        let listed = ledger.list_all().expect("Should list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].result, replacement.result);
    }
}
