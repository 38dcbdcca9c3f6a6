//! # Glucora
//!
//! Offline-first diabetes risk inference with a local prediction ledger.
//!
//! This crate provides:
//! - Encoding of self-reported health answers into the canonical feature
//!   vector the classifier was trained on
//! - Fully on-device inference with a one-load-per-process model lifecycle
//! - Interpretation of raw class probabilities into risk tiers, confidence,
//!   and recommendations
//! - A durable local ledger of every prediction, reconcilable with a future
//!   server-side sync
//! - Readiness gating for both the on-device and the remote-service
//!   deployment targets
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (features, answers, results, history)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (tree model, SQLite, log
//!   sanitization)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{AnswerSheet, HealthFeatures, PredictionResult, RiskTier};

/// Result type for Glucora operations.
pub type Result<T> = std::result::Result<T, GlucoraError>;

/// Main error type for Glucora.
#[derive(Debug, thiserror::Error)]
pub enum GlucoraError {
    #[error("Invalid answers: {0}")]
    Encoding(#[from] domain::EncodingError),

    #[error("Model load failed: {0}")]
    Load(#[from] ports::LoadError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::InferenceError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Remote service error: {0}")]
    Remote(#[from] ports::RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
