//! Domain layer: Core screening types and logic.
//!
//! Pure Rust types and pure functions: validation, feature derivation,
//! rule-based scoring and advice selection. No I/O.

mod assessment;
mod features;
mod questionnaire;
mod recommendation;

pub use assessment::{
    score_record, Assessment, Probabilities, RiskFactor, RiskLabel, RiskResult, RiskScore,
    ScoringSource,
};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use questionnaire::{
    Answers, BloodPressure, BloodPressureError, BmiCategory, Field, Gender, InputRecord,
    ValidationError,
};
pub use recommendation::{AdviceTier, Language, Recommendation};
