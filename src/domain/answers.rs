//! Feature encoding: raw form answers to the canonical feature vector.
//!
//! The form layer hands over booleans for the binary indicators, free-form
//! numeric text for BMI, age category, and the day counts, and discrete
//! selections for the scales. Encoding is a pure function of the answers.

use serde::{Deserialize, Serialize};

use super::features::HealthFeatures;

/// Accepted BMI range.
pub const BMI_RANGE: (f64, f64) = (10.0, 60.0);

/// Accepted age category range (1 = 18-24 .. 13 = 80+).
pub const AGE_RANGE: (f64, f64) = (1.0, 13.0);

/// Accepted general-health scale range (1 = excellent .. 5 = poor).
pub const GEN_HLTH_RANGE: (f64, f64) = (1.0, 5.0);

/// Accepted day-count range for the 30-day health questions.
pub const DAY_COUNT_RANGE: (f64, f64) = (0.0, 30.0);

/// Population defaults for the fields the form never collects.
pub const DEFAULT_NO_DOC_BC_COST: f64 = 0.0;
pub const DEFAULT_EDUCATION: f64 = 4.0;
pub const DEFAULT_INCOME: f64 = 5.0;

/// Error type for feature encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("{field} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Reported sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// Raw per-field answers from the form layer.
///
/// Every field is optional; only BMI and age category are mandatory at
/// encoding time. Omitted fields take the documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSheet {
    pub high_bp: Option<bool>,
    pub high_chol: Option<bool>,
    pub chol_check: Option<bool>,
    pub smoker: Option<bool>,
    pub stroke: Option<bool>,
    pub heart_disease_or_attack: Option<bool>,
    pub phys_activity: Option<bool>,
    pub fruits: Option<bool>,
    pub veggies: Option<bool>,
    pub hvy_alcohol_consump: Option<bool>,
    pub any_healthcare: Option<bool>,
    pub diff_walk: Option<bool>,

    /// Body mass index, numeric text as typed.
    pub bmi: Option<String>,

    /// Age category (1-13), numeric text as typed.
    pub age: Option<String>,

    /// Poor-mental-health days (0-30), numeric text as typed.
    pub ment_hlth: Option<String>,

    /// Poor-physical-health days (0-30), numeric text as typed.
    pub phys_hlth: Option<String>,

    /// General health selection (1-5).
    pub gen_hlth: Option<u8>,

    pub sex: Option<Sex>,
}

/// Encode raw answers into the canonical feature vector.
///
/// Deterministic and side-effect free: identical answers always produce
/// identical features.
///
/// # Errors
/// `MissingRequiredField` if BMI or age is absent or does not parse as a
/// number; `OutOfRange` if any parsed value falls outside its bound.
pub fn encode(answers: &AnswerSheet) -> Result<HealthFeatures, EncodingError> {
    let bmi = parse_required(answers.bmi.as_deref(), "BMI")?;
    let age = parse_required(answers.age.as_deref(), "Age")?;

    let bmi = check_range("BMI", bmi, BMI_RANGE)?;
    let age = check_range("Age", age, AGE_RANGE)?;

    // Day counts default to zero when left blank; a present value that does
    // not parse becomes NaN and fails the range check.
    let ment_hlth = parse_optional(answers.ment_hlth.as_deref(), 0.0);
    let phys_hlth = parse_optional(answers.phys_hlth.as_deref(), 0.0);
    let ment_hlth = check_range("MentHlth", ment_hlth, DAY_COUNT_RANGE)?;
    let phys_hlth = check_range("PhysHlth", phys_hlth, DAY_COUNT_RANGE)?;

    let gen_hlth = f64::from(answers.gen_hlth.unwrap_or(3));
    let gen_hlth = check_range("GenHlth", gen_hlth, GEN_HLTH_RANGE)?;

    Ok(HealthFeatures {
        high_bp: flag(answers.high_bp, false),
        high_chol: flag(answers.high_chol, false),
        chol_check: flag(answers.chol_check, true),
        bmi,
        smoker: flag(answers.smoker, false),
        stroke: flag(answers.stroke, false),
        heart_disease_or_attack: flag(answers.heart_disease_or_attack, false),
        phys_activity: flag(answers.phys_activity, true),
        fruits: flag(answers.fruits, true),
        veggies: flag(answers.veggies, true),
        hvy_alcohol_consump: flag(answers.hvy_alcohol_consump, false),
        any_healthcare: flag(answers.any_healthcare, true),
        no_doc_bc_cost: DEFAULT_NO_DOC_BC_COST,
        gen_hlth,
        ment_hlth,
        phys_hlth,
        diff_walk: flag(answers.diff_walk, false),
        sex: match answers.sex.unwrap_or(Sex::Male) {
            Sex::Male => 1.0,
            Sex::Female => 0.0,
        },
        age,
        education: DEFAULT_EDUCATION,
        income: DEFAULT_INCOME,
    })
}

fn flag(value: Option<bool>, default: bool) -> f64 {
    if value.unwrap_or(default) {
        1.0
    } else {
        0.0
    }
}

fn parse_required(text: Option<&str>, field: &'static str) -> Result<f64, EncodingError> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(EncodingError::MissingRequiredField(field))
}

fn parse_optional(text: Option<&str>, default: f64) -> f64 {
    match text.map(str::trim) {
        None => default,
        Some("") => default,
        Some(t) => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, EncodingError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(EncodingError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
