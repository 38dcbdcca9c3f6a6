//! Health indicator features for diabetes risk prediction.
//!
//! Based on the BRFSS (CDC Behavioral Risk Factor Surveillance System)
//! health-indicator survey.

use serde::{Deserialize, Serialize};

/// The canonical, ordered feature record the classifier consumes.
///
/// 21 features matching the trained model: 18 collected from the user plus
/// 3 population-default fields (`NoDocbcCost`, `Education`, `Income`).
///
/// Field order is fixed and must match the order the model was trained on;
/// any reordering silently corrupts predictions. `to_vec` is the single
/// place that order is spelled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HealthFeatures {
    /// High blood pressure: 0 = no, 1 = yes
    #[serde(rename = "HighBP")]
    pub high_bp: f64,

    /// High cholesterol: 0 = no, 1 = yes
    #[serde(rename = "HighChol")]
    pub high_chol: f64,

    /// Cholesterol check within 5 years: 0 = no, 1 = yes
    #[serde(rename = "CholCheck")]
    pub chol_check: f64,

    /// Body mass index (10-60 accepted range)
    #[serde(rename = "BMI")]
    pub bmi: f64,

    /// Smoked at least 100 cigarettes: 0 = no, 1 = yes
    #[serde(rename = "Smoker")]
    pub smoker: f64,

    /// Ever had a stroke: 0 = no, 1 = yes
    #[serde(rename = "Stroke")]
    pub stroke: f64,

    /// Coronary heart disease or myocardial infarction: 0 = no, 1 = yes
    #[serde(rename = "HeartDiseaseorAttack")]
    pub heart_disease_or_attack: f64,

    /// Physical activity in the past 30 days: 0 = no, 1 = yes
    #[serde(rename = "PhysActivity")]
    pub phys_activity: f64,

    /// Consumes fruit daily: 0 = no, 1 = yes
    #[serde(rename = "Fruits")]
    pub fruits: f64,

    /// Consumes vegetables daily: 0 = no, 1 = yes
    #[serde(rename = "Veggies")]
    pub veggies: f64,

    /// Heavy alcohol consumption: 0 = no, 1 = yes
    #[serde(rename = "HvyAlcoholConsump")]
    pub hvy_alcohol_consump: f64,

    /// Any healthcare coverage: 0 = no, 1 = yes
    #[serde(rename = "AnyHealthcare")]
    pub any_healthcare: f64,

    /// Needed a doctor but could not afford one: 0 = no, 1 = yes
    /// (population default, never collected from the user)
    #[serde(rename = "NoDocbcCost")]
    pub no_doc_bc_cost: f64,

    /// Self-reported general health: 1 = excellent .. 5 = poor
    #[serde(rename = "GenHlth")]
    pub gen_hlth: f64,

    /// Days of poor mental health in the past 30 days (0-30)
    #[serde(rename = "MentHlth")]
    pub ment_hlth: f64,

    /// Days of poor physical health in the past 30 days (0-30)
    #[serde(rename = "PhysHlth")]
    pub phys_hlth: f64,

    /// Serious difficulty walking or climbing stairs: 0 = no, 1 = yes
    #[serde(rename = "DiffWalk")]
    pub diff_walk: f64,

    /// Sex: 0 = female, 1 = male
    #[serde(rename = "Sex")]
    pub sex: f64,

    /// Age category: 1 = 18-24 .. 13 = 80+
    #[serde(rename = "Age")]
    pub age: f64,

    /// Education level 1-6 (population default)
    #[serde(rename = "Education")]
    pub education: f64,

    /// Income bracket 1-8 (population default)
    #[serde(rename = "Income")]
    pub income: f64,
}

impl HealthFeatures {
    /// Convert features to a vector for model inference.
    ///
    /// Order matches `FEATURE_NAMES` and the trained model.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.high_bp,
            self.high_chol,
            self.chol_check,
            self.bmi,
            self.smoker,
            self.stroke,
            self.heart_disease_or_attack,
            self.phys_activity,
            self.fruits,
            self.veggies,
            self.hvy_alcohol_consump,
            self.any_healthcare,
            self.no_doc_bc_cost,
            self.gen_hlth,
            self.ment_hlth,
            self.phys_hlth,
            self.diff_walk,
            self.sex,
            self.age,
            self.education,
            self.income,
        ]
    }

    /// Create features from a vector in canonical order.
    ///
    /// # Errors
    /// Returns error if the vector length is not 21.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!("Expected {} features, got {}", FEATURE_COUNT, v.len()));
        }

        Ok(Self {
            high_bp: v[0],
            high_chol: v[1],
            chol_check: v[2],
            bmi: v[3],
            smoker: v[4],
            stroke: v[5],
            heart_disease_or_attack: v[6],
            phys_activity: v[7],
            fruits: v[8],
            veggies: v[9],
            hvy_alcohol_consump: v[10],
            any_healthcare: v[11],
            no_doc_bc_cost: v[12],
            gen_hlth: v[13],
            ment_hlth: v[14],
            phys_hlth: v[15],
            diff_walk: v[16],
            sex: v[17],
            age: v[18],
            education: v[19],
            income: v[20],
        })
    }
}

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 21;

/// Feature names in model order (BRFSS column names).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "HighBP",
    "HighChol",
    "CholCheck",
    "BMI",
    "Smoker",
    "Stroke",
    "HeartDiseaseorAttack",
    "PhysActivity",
    "Fruits",
    "Veggies",
    "HvyAlcoholConsump",
    "AnyHealthcare",
    "NoDocbcCost",
    "GenHlth",
    "MentHlth",
    "PhysHlth",
    "DiffWalk",
    "Sex",
    "Age",
    "Education",
    "Income",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_vec_order() {
        let features = HealthFeatures {
            high_bp: 1.0,
            bmi: 27.5,
            gen_hlth: 4.0,
            age: 9.0,
            income: 5.0,
            ..Default::default()
        };

        let vec = features.to_vec();
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert!((vec[0] - 1.0).abs() < f64::EPSILON);
        assert!((vec[3] - 27.5).abs() < f64::EPSILON);
        assert!((vec[13] - 4.0).abs() < f64::EPSILON);
        assert!((vec[18] - 9.0).abs() < f64::EPSILON);
        assert!((vec[20] - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_vec_roundtrip() {
        let mut v = vec![0.0; FEATURE_COUNT];
        v[3] = 31.0;
        v[18] = 11.0;

        let features = HealthFeatures::from_vec(&v).expect("Should parse");
        assert!((features.bmi - 31.0).abs() < f64::EPSILON);
        assert!((features.age - 11.0).abs() < f64::EPSILON);
        assert_eq!(features.to_vec(), v);
    }

    #[test]
    fn test_from_vec_wrong_length() {
        assert!(HealthFeatures::from_vec(&[1.0; 9]).is_err());
    }

    #[test]
    fn test_serde_uses_model_names() {
        let features = HealthFeatures {
            high_bp: 1.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&features).expect("Should serialize");
        assert_eq!(json["HighBP"], 1.0);
        assert_eq!(json["NoDocbcCost"], 0.0);
    }
}
