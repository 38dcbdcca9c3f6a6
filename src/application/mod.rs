//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assess;
mod interpret;
mod ledger;
mod readiness;
mod runner;

pub use assess::AssessmentService;
pub use interpret::{interpret, interpret_with_advice};
pub use ledger::{LedgerStats, PredictionLedger};
pub use readiness::{DeviceGate, GateState, ReadinessGate, RemoteGate, RemotePhase};
pub use runner::{ModelPhase, ModelRunner};
