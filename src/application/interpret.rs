//! Result interpretation: raw class probabilities to risk semantics.

use crate::domain::{
    AdviceCategory, Advisory, PredictionResult, PredictionSource, RawOutput, Recommendations,
    RiskTier,
};

/// Interpret raw classifier output.
///
/// The risk score is the positive-class probability as a percentage, kept
/// to one decimal. Confidence is the probability mass on the predicted
/// class; it is not a calibrated error estimate.
#[must_use]
pub fn interpret(raw: &RawOutput, source: PredictionSource) -> PredictionResult {
    let positive = raw.class_probabilities[1].clamp(0.0, 1.0);
    let risk_score = (positive * 1000.0).round() / 10.0;
    let risk_tier = RiskTier::from_score(risk_score);

    let confidence = raw.class_probabilities[0]
        .max(raw.class_probabilities[1])
        .clamp(0.0, 1.0);

    PredictionResult {
        risk_tier,
        risk_score,
        confidence,
        inference_time_ms: raw.elapsed_ms,
        source,
        recommendations: Recommendations::Advisories(advisories_for(risk_tier)),
    }
}

/// Interpret raw output, attaching a generated free-text advice block
/// produced by an external advice collaborator in place of the static
/// advisory tables.
#[must_use]
pub fn interpret_with_advice(
    raw: &RawOutput,
    source: PredictionSource,
    advice: String,
) -> PredictionResult {
    PredictionResult {
        recommendations: Recommendations::Generated(advice),
        ..interpret(raw, source)
    }
}

fn advisory(category: AdviceCategory, text: &str) -> Advisory {
    Advisory {
        category,
        text: text.to_string(),
    }
}

/// Tier-specific static advisory tables.
fn advisories_for(tier: RiskTier) -> Vec<Advisory> {
    use AdviceCategory::{Exercise, Lifestyle, Medical, Nutrition};

    match tier {
        RiskTier::Low => vec![
            advisory(Lifestyle, "Keep up your current healthy habits"),
            advisory(Nutrition, "Maintain a balanced diet with fruits and vegetables"),
            advisory(Exercise, "Stay active with at least 150 minutes of movement per week"),
            advisory(Medical, "Repeat this screening once a year"),
        ],
        RiskTier::Moderate => vec![
            advisory(Lifestyle, "Aim for gradual weight management if your BMI is elevated"),
            advisory(Lifestyle, "Reduce alcohol intake and avoid smoking"),
            advisory(Nutrition, "Cut back on added sugar and refined carbohydrates"),
            advisory(Exercise, "Add 30 minutes of moderate exercise on most days"),
            advisory(Medical, "Discuss a blood glucose test at your next check-up"),
        ],
        RiskTier::High => vec![
            advisory(Medical, "Schedule an HbA1c or fasting glucose test soon"),
            advisory(Medical, "Review blood pressure and cholesterol with your doctor"),
            advisory(Lifestyle, "Prioritize weight management with professional support"),
            advisory(Nutrition, "Work toward a low-glycemic diet; limit sugary drinks"),
            advisory(Exercise, "Start a supervised activity program suited to your condition"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(positive: f64) -> RawOutput {
        RawOutput {
            class_probabilities: [1.0 - positive, positive],
            elapsed_ms: 7,
        }
    }

    #[test]
    fn test_score_is_percentage_one_decimal() {
        let result = interpret(&raw(0.8264), PredictionSource::OnDevice);
        assert!((result.risk_score - 82.6).abs() < 1e-9);
        assert_eq!(result.inference_time_ms, 7);
    }

    #[test]
    fn test_tiers_follow_thresholds() {
        assert_eq!(
            interpret(&raw(0.15), PredictionSource::OnDevice).risk_tier,
            RiskTier::Low
        );
        assert_eq!(
            interpret(&raw(0.45), PredictionSource::OnDevice).risk_tier,
            RiskTier::Moderate
        );
        assert_eq!(
            interpret(&raw(0.70), PredictionSource::OnDevice).risk_tier,
            RiskTier::High
        );
    }

    #[test]
    fn test_confidence_is_max_probability() {
        assert!((interpret(&raw(0.15), PredictionSource::OnDevice).confidence - 0.85).abs() < 1e-9);
        assert!((interpret(&raw(0.95), PredictionSource::OnDevice).confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_each_tier_has_advisories() {
        for positive in [0.1, 0.5, 0.9] {
            let result = interpret(&raw(positive), PredictionSource::OnDevice);
            match &result.recommendations {
                Recommendations::Advisories(items) => assert!(!items.is_empty()),
                Recommendations::Generated(_) => panic!("Static path expected"),
            }
        }
    }

    #[test]
    fn test_generated_advice_replaces_tables() {
        let result = interpret_with_advice(
            &raw(0.9),
            PredictionSource::Remote,
            "Tailored plan".to_string(),
        );
        assert_eq!(
            result.recommendations,
            Recommendations::Generated("Tailored plan".to_string())
        );
        assert_eq!(result.risk_tier, RiskTier::High);
    }
}
