//! Remote prediction API port: Trait and wire types for the server contract.
//!
//! The HTTP transport is an external collaborator; this module owns only the
//! JSON contract and the mapping from the wire shape onto the canonical
//! result types.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AdviceCategory, Advisory, HealthFeatures, PredictionResult, PredictionSource, Recommendations,
    RiskTier,
};

/// Error type for remote API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Response violated the contract: {0}")]
    Contract(String),
}

/// Class probabilities as the server reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteProbabilities {
    pub no_diabetes: f64,
    pub diabetes: f64,
}

/// A contributing risk factor identified by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRiskFactor {
    pub factor: String,
    pub severity: String,
    pub description: String,
}

/// Server-side recommendation payload.
///
/// Either the categorized lists, or a single generated `advice` block when
/// `ai_generated` is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteRecommendations {
    pub lifestyle: Vec<String>,
    pub nutrition: Vec<String>,
    pub exercise: Vec<String>,
    pub medical: Vec<String>,
    pub emergency_note: Option<String>,
    pub ai_generated: bool,
    pub advice: Option<String>,
}

/// Response body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePrediction {
    /// Binary class index as predicted by the server
    pub prediction: u8,

    /// Binary presentation label ("diabetes" / "no_diabetes"). Derived from
    /// the same score as the tiers; never a second model output.
    pub prediction_label: String,

    /// Positive-class probability as a percentage (0-100)
    pub risk_percentage: f64,

    pub probabilities: RemoteProbabilities,

    #[serde(default)]
    pub risk_factors: Vec<RemoteRiskFactor>,

    #[serde(default)]
    pub recommendations: RemoteRecommendations,

    pub model_name: String,

    pub confidence: f64,
}

impl RemotePrediction {
    /// Map the wire shape onto the canonical result.
    ///
    /// The tier is recomputed from `risk_percentage` through the single
    /// threshold table; the server's binary label is presentation only.
    /// `elapsed_ms` is the round-trip time measured by the caller.
    #[must_use]
    pub fn into_result(self, elapsed_ms: u64) -> PredictionResult {
        let risk_score = (self.risk_percentage.clamp(0.0, 100.0) * 10.0).round() / 10.0;

        let recommendations = if self.recommendations.ai_generated {
            match self.recommendations.advice {
                Some(advice) => Recommendations::Generated(advice),
                None => Recommendations::Advisories(vec![]),
            }
        } else {
            let categorized = [
                (AdviceCategory::Lifestyle, self.recommendations.lifestyle),
                (AdviceCategory::Nutrition, self.recommendations.nutrition),
                (AdviceCategory::Exercise, self.recommendations.exercise),
                (AdviceCategory::Medical, self.recommendations.medical),
            ];
            Recommendations::Advisories(
                categorized
                    .into_iter()
                    .flat_map(|(category, texts)| {
                        texts.into_iter().map(move |text| Advisory { category, text })
                    })
                    .collect(),
            )
        };

        PredictionResult {
            risk_tier: RiskTier::from_score(risk_score),
            risk_score,
            confidence: self.confidence,
            inference_time_ms: elapsed_ms,
            source: PredictionSource::Remote,
            recommendations,
        }
    }
}

/// Response body of `GET /model-info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteModelInfo {
    pub model_name: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Trait for the remote prediction service.
///
/// Implementations own transport, serialization of the request body
/// (`{features: <name-keyed feature map>}`), and timeouts.
pub trait RemoteApi: Send + Sync {
    /// Probe `GET /health`.
    ///
    /// # Errors
    /// Returns error if the service is unreachable or unhealthy.
    fn health(&self) -> Result<(), RemoteError>;

    /// Fetch `GET /model-info`.
    ///
    /// # Errors
    /// Returns error if the probe fails.
    fn model_info(&self) -> Result<RemoteModelInfo, RemoteError>;

    /// Request a prediction via `POST /predict`.
    ///
    /// # Errors
    /// Returns error if the request fails or the response violates the
    /// contract.
    fn predict(&self, features: &HealthFeatures) -> Result<RemotePrediction, RemoteError>;
}
