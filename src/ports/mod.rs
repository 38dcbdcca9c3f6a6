//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (classifier engine, durable
//! store, remote prediction service).

mod engine;
mod remote;
mod store;

pub use engine::{InferenceEngine, InferenceError, LoadError};
pub use remote::{
    RemoteApi, RemoteError, RemoteModelInfo, RemotePrediction, RemoteProbabilities,
    RemoteRecommendations, RemoteRiskFactor,
};
pub use store::{RecordStore, StoredRecord};
