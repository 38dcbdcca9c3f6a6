//! Inference engine port: Trait for the on-device classifier.
//!
//! This trait abstracts the model artifact format and execution mechanics
//! from the application logic. The runner depends only on a load/invoke
//! capability.

use crate::domain::HealthFeatures;

/// Error type for model loading.
///
/// A load failure is fatal for the process's model-using lifetime: the
/// runner records it and reports it to every later caller without retrying.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("Model artifact unavailable: {0}")]
    Artifact(String),

    #[error("Model artifact malformed: {0}")]
    Malformed(String),
}

/// Error type for a single inference call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InferenceError {
    /// Invoked while the model is not ready. A coordinator bug: correct
    /// gating makes this unreachable.
    #[error("Model not ready")]
    ModelNotReady,

    /// The underlying computation could not execute on the given input.
    /// Fatal for this call; the user may retry by resubmitting.
    #[error("Inference failure: {0}")]
    InferenceFailure(String),
}

/// Trait for on-device classifier engines.
///
/// Implementations load a pre-trained binary classifier and evaluate it on
/// a feature vector, returning the ordered class pair
/// [P(no diabetes), P(diabetes or prediabetes)].
pub trait InferenceEngine: Send + Sync {
    /// The loaded model artifact.
    type Model: Send + Sync + 'static;

    /// Load the model.
    ///
    /// Called at most once per runner; the runner provides the single-flight
    /// and idempotence guarantees on top.
    ///
    /// # Errors
    /// Returns `LoadError` if the artifact cannot be read or fails
    /// validation.
    fn load(&self) -> Result<Self::Model, LoadError>;

    /// Run one forward pass.
    ///
    /// # Errors
    /// Returns `InferenceError::InferenceFailure` if the computation cannot
    /// execute on the given input shape.
    fn invoke(&self, model: &Self::Model, features: &HealthFeatures)
        -> Result<[f64; 2], InferenceError>;
}
