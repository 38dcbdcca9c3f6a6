//! Assessment service: Orchestrates a full on-device prediction.
//!
//! This service coordinates:
//! - Feature encoding
//! - Model inference
//! - Result interpretation
//! - Ledger persistence
//!
//! A storage failure never withholds the result: the user always sees the
//! prediction, the ledger miss is downgraded to a warning.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::application::interpret::interpret;
use crate::application::ledger::PredictionLedger;
use crate::application::runner::ModelRunner;
use crate::domain::{encode, AnswerSheet, PredictionResult, PredictionSource};
use crate::ports::{InferenceEngine, RecordStore};
use crate::GlucoraError;

/// Service for running on-device risk assessments.
pub struct AssessmentService<E, S>
where
    E: InferenceEngine,
    S: RecordStore,
{
    runner: Arc<ModelRunner<E>>,
    ledger: PredictionLedger<S>,
}

impl<E, S> AssessmentService<E, S>
where
    E: InferenceEngine,
    S: RecordStore,
    S::Error: Into<StorageError>,
{
    /// Create a new assessment service.
    pub fn new(runner: Arc<ModelRunner<E>>, store: Arc<S>) -> Self {
        Self {
            runner,
            ledger: PredictionLedger::new(store),
        }
    }

    /// Run one assessment: encode, predict, interpret, record.
    ///
    /// # Errors
    /// Returns `EncodingError` for invalid answers and `InferenceError`
    /// when the model cannot produce a prediction. A ledger write failure
    /// is logged and swallowed.
    pub fn assess(&self, answers: &AnswerSheet) -> Result<PredictionResult, GlucoraError> {
        let features = encode(answers)?;

        let raw = self.runner.predict(&features)?;
        let result = interpret(&raw, PredictionSource::OnDevice);

        if let Err(e) = self.ledger.record(features, result.clone()) {
            tracing::warn!("Failed to record prediction: {e}");
        }

        tracing::info!(
            "Assessment complete: tier={}, score={:.1}, confidence={:.1}%, {}ms",
            result.risk_tier,
            result.risk_score,
            result.confidence * 100.0,
            result.inference_time_ms
        );

        Ok(result)
    }

    /// Access the prediction history.
    #[must_use]
    pub fn ledger(&self) -> &PredictionLedger<S> {
        &self.ledger
    }
}
