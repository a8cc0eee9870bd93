//! Feature vector consumed by trained classifiers.
//!
//! Column order is fixed: a classifier trained on these columns expects them
//! exactly in `FEATURE_NAMES` order.

use serde::{Deserialize, Serialize};

use super::questionnaire::{Answers, InputRecord, ValidationError};

/// Number of columns in the feature vector.
pub const FEATURE_COUNT: usize = 16;

/// Column names, in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "Sleep Duration",
    "Quality of Sleep",
    "Physical Activity Level",
    "Stress Level",
    "BMI Category",
    "Heart Rate",
    "Daily Steps",
    "Systolic",
    "Diastolic",
    "Sleep_Efficiency",
    "Stress_Sleep_Interaction",
    "Activity_Efficiency",
    "Stress_Sleep_Ratio",
    "Sleep_Age_Ratio",
];

/// Derived, immutable numeric encoding of an input record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Encode a validated record.
    #[must_use]
    pub fn from_record(record: &InputRecord) -> Self {
        let sleep = record.sleep_duration();
        let quality = f64::from(record.quality_of_sleep());
        let activity = f64::from(record.physical_activity_level());
        let stress = f64::from(record.stress_level());
        let age = f64::from(record.age());
        let steps = f64::from(record.daily_steps());
        let bp = record.blood_pressure();

        Self([
            record.gender().code(),
            age,
            sleep,
            quality,
            activity,
            stress,
            record.bmi_category().code(),
            f64::from(record.heart_rate()),
            steps,
            bp.systolic,
            bp.diastolic,
            sleep / 24.0,
            stress * quality,
            steps / (activity + 1.0),
            stress / (quality + 1.0),
            sleep / (age + 1.0),
        ])
    }

    /// Validate raw answers and encode them.
    ///
    /// # Errors
    /// Returns `ValidationError` if any field is out of domain, including a
    /// blood pressure that does not split into two numbers on a single '/'.
    pub fn derive(answers: &Answers) -> Result<Self, ValidationError> {
        answers.validate().map(|record| Self::from_record(&record))
    }

    /// Rebuild a vector from raw columns.
    ///
    /// # Errors
    /// Returns error if the slice does not hold exactly `FEATURE_COUNT` values.
    pub fn from_slice(values: &[f64]) -> Result<Self, String> {
        let columns: [f64; FEATURE_COUNT] = values
            .try_into()
            .map_err(|_| format!("Expected {FEATURE_COUNT} features, got {}", values.len()))?;
        Ok(Self(columns))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }

    /// `(name, value)` pairs in column order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    #[must_use]
    pub fn sleep_efficiency(&self) -> f64 {
        self.0[11]
    }

    #[must_use]
    pub fn stress_sleep_interaction(&self) -> f64 {
        self.0[12]
    }

    #[must_use]
    pub fn activity_efficiency(&self) -> f64 {
        self.0[13]
    }

    #[must_use]
    pub fn stress_sleep_ratio(&self) -> f64 {
        self.0[14]
    }

    #[must_use]
    pub fn sleep_age_ratio(&self) -> f64 {
        self.0[15]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::questionnaire::tests::valid_answers;
    use crate::domain::questionnaire::{BmiCategory, Gender};

    #[test]
    fn test_scenario_b_derived_ratios() {
        let v = FeatureVector::derive(&valid_answers()).expect("Should derive");

        assert!((v.sleep_efficiency() - 7.0 / 24.0).abs() < 1e-9);
        assert!((v.sleep_efficiency() - 0.2917).abs() < 1e-4);
        assert!((v.stress_sleep_interaction() - 35.0).abs() < 1e-9);
        assert!((v.activity_efficiency() - 8000.0 / 6.0).abs() < 1e-9);
        assert!((v.activity_efficiency() - 1333.33).abs() < 1e-2);
        assert!((v.stress_sleep_ratio() - 0.625).abs() < 1e-9);
        assert!((v.sleep_age_ratio() - 7.0 / 31.0).abs() < 1e-9);
        assert!((v.sleep_age_ratio() - 0.2258).abs() < 1e-4);
    }

    #[test]
    fn test_column_order() {
        let answers = Answers {
            gender: Gender::Male,
            bmi_category: BmiCategory::Obese,
            blood_pressure: "130/85".to_string(),
            ..valid_answers()
        };
        let v = FeatureVector::derive(&answers).expect("Should derive");
        let expected_head = [1.0, 30.0, 7.0, 7.0, 5.0, 5.0, 2.0, 70.0, 8000.0, 130.0, 85.0];

        assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        for (i, expected) in expected_head.iter().enumerate() {
            assert!(
                (v.as_slice()[i] - expected).abs() < f64::EPSILON,
                "column {} ({})",
                i,
                FEATURE_NAMES[i]
            );
        }
        assert_eq!(v.get("Systolic"), Some(130.0));
        assert_eq!(v.get("Unknown"), None);
        assert_eq!(v.named().count(), FEATURE_COUNT);
    }

    #[test]
    fn test_bmi_and_gender_codes() {
        for (bmi, code) in [
            (BmiCategory::Normal, 0.0),
            (BmiCategory::NormalWeight, 0.0),
            (BmiCategory::Underweight, 0.0),
            (BmiCategory::Overweight, 1.0),
            (BmiCategory::Obese, 2.0),
        ] {
            let answers = Answers {
                bmi_category: bmi,
                ..valid_answers()
            };
            let v = FeatureVector::derive(&answers).expect("Should derive");
            assert_eq!(v.get("BMI Category"), Some(code));
        }

        let female = Answers {
            gender: Gender::Female,
            ..valid_answers()
        };
        let v = FeatureVector::derive(&female).expect("Should derive");
        assert_eq!(v.get("Gender"), Some(0.0));
    }

    #[test]
    fn test_derive_rejects_malformed_blood_pressure() {
        for raw in ["abc/80", "120", ""] {
            let answers = Answers {
                blood_pressure: raw.to_string(),
                ..valid_answers()
            };
            assert!(FeatureVector::derive(&answers).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn test_from_slice_length_check() {
        assert!(FeatureVector::from_slice(&[0.0; 15]).is_err());
        let v = FeatureVector::from_slice(&[1.0; FEATURE_COUNT]).expect("Should build");
        assert_eq!(v.to_vec(), vec![1.0; FEATURE_COUNT]);
    }
}
