//! Prediction result types.
//!
//! Represents the interpreted output of the diabetes risk classifier.

use serde::{Deserialize, Serialize};

/// Risk tier classification for diabetes risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Low risk of diabetes
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, medical follow-up recommended
    High,
}

impl RiskTier {
    /// Classify a risk score (0-100).
    ///
    /// The three-tier scheme is canonical: below 30 is low, 30 up to 70 is
    /// moderate, 70 and above is high. Any binary presentation of the same
    /// score derives from this table; there is no second threshold scheme.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Self::Low
        } else if score < 70.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Monitoring recommended",
            Self::High => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Where a prediction was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionSource {
    /// Computed by the local inference engine
    OnDevice,
    /// Computed by the remote prediction service
    Remote,
}

/// Raw classifier output before interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawOutput {
    /// Ordered class pair: [P(no diabetes), P(diabetes or prediabetes)]
    pub class_probabilities: [f64; 2],

    /// Wall time of the inference call only, in milliseconds
    pub elapsed_ms: u64,
}

/// Advisory category for recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Lifestyle,
    Nutrition,
    Exercise,
    Medical,
}

/// A single categorized advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub category: AdviceCategory,
    pub text: String,
}

/// Recommendation payload attached to a result.
///
/// Either the tier-specific categorized advisories, or a single free-text
/// block when an external advice generator produced it. Consumers forward
/// whichever shape they receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendations {
    Advisories(Vec<Advisory>),
    Generated(String),
}

impl Recommendations {
    /// Flatten to plain advisory strings for display.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Advisories(items) => items.iter().map(|a| a.text.as_str()).collect(),
            Self::Generated(block) => vec![block.as_str()],
        }
    }
}

/// Interpreted prediction result.
///
/// Created once from raw model output and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Risk classification
    pub risk_tier: RiskTier,

    /// Positive-class probability as a percentage, one decimal (0-100)
    pub risk_score: f64,

    /// Probability mass assigned to the predicted class (0-1).
    /// Not a calibrated uncertainty estimate.
    pub confidence: f64,

    /// Wall time of the inference call, in milliseconds
    pub inference_time_ms: u64,

    /// Where the prediction was computed
    pub source: PredictionSource,

    /// Advisory payload for the user
    pub recommendations: Recommendations,
}
