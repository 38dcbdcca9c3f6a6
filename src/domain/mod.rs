//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies.
//! All types are serializable and implement strict validation.

mod answers;
mod features;
mod history;
mod result;

pub use answers::{
    encode, AnswerSheet, EncodingError, Sex, AGE_RANGE, BMI_RANGE, DAY_COUNT_RANGE, GEN_HLTH_RANGE,
};
pub use features::{HealthFeatures, FEATURE_COUNT, FEATURE_NAMES};
pub(crate) use history::id_ordinal;
pub use history::{EntryIdGenerator, PredictionHistoryEntry};
pub use result::{
    AdviceCategory, Advisory, PredictionResult, PredictionSource, RawOutput, Recommendations,
    RiskTier,
};
