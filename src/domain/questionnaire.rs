//! Questionnaire answers and the validated input record.
//!
//! `Answers` is what the form collects. `InputRecord` can only be obtained by
//! validating `Answers`, so nothing downstream ever sees an out-of-domain value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Questionnaire fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Gender,
    Age,
    Occupation,
    SleepDuration,
    QualityOfSleep,
    PhysicalActivityLevel,
    StressLevel,
    BmiCategory,
    BloodPressure,
    HeartRate,
    DailySteps,
}

impl Field {
    /// All fields in the order the form presents (and validates) them.
    pub const ALL: [Field; 11] = [
        Field::Gender,
        Field::Age,
        Field::Occupation,
        Field::SleepDuration,
        Field::QualityOfSleep,
        Field::PhysicalActivityLevel,
        Field::StressLevel,
        Field::BmiCategory,
        Field::BloodPressure,
        Field::HeartRate,
        Field::DailySteps,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Age => "Age",
            Self::Occupation => "Occupation",
            Self::SleepDuration => "Sleep duration",
            Self::QualityOfSleep => "Quality of sleep",
            Self::PhysicalActivityLevel => "Physical activity level",
            Self::StressLevel => "Stress level",
            Self::BmiCategory => "BMI category",
            Self::BloodPressure => "Blood pressure",
            Self::HeartRate => "Heart rate",
            Self::DailySteps => "Daily steps",
        }
    }

    /// Inclusive numeric domain, for numeric fields only.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Age => Some((18.0, 100.0)),
            Self::SleepDuration => Some((3.0, 12.0)),
            Self::QualityOfSleep | Self::PhysicalActivityLevel | Self::StressLevel => {
                Some((1.0, 10.0))
            }
            Self::HeartRate => Some((40.0, 200.0)),
            Self::DailySteps => Some((1000.0, 20000.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Malformed blood pressure reading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BloodPressureError {
    #[error("expected systolic/diastolic separated by '/', e.g. 120/80")]
    MissingSeparator,

    #[error("expected exactly one '/', found {0}")]
    TooManySeparators(usize),

    #[error("{part} value '{value}' is not a number")]
    NonNumeric { part: &'static str, value: String },
}

/// A field violates its domain. Any of these blocks scoring entirely.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(Field),

    #[error("{field}: '{value}' is not a valid number")]
    NotANumber { field: Field, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Sleep duration must be in steps of 0.5 hours, got {0}")]
    InvalidStep(f64),

    #[error("{field}: unknown option '{value}'")]
    UnknownChoice { field: Field, value: String },

    #[error("Occupation may only contain letters, spaces, hyphens and periods")]
    InvalidOccupation,

    #[error("Blood pressure: {0}")]
    BloodPressure(#[from] BloodPressureError),
}

impl ValidationError {
    /// The field the error refers to.
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Missing(field)
            | Self::NotANumber { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownChoice { field, .. } => *field,
            Self::InvalidStep(_) => Field::SleepDuration,
            Self::InvalidOccupation => Field::Occupation,
            Self::BloodPressure(_) => Field::BloodPressure,
        }
    }

    /// True for malformed blood pressure input.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::BloodPressure(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Numeric encoding used by the feature vector.
    #[must_use]
    pub fn code(&self) -> f64 {
        match self {
            Self::Female => 0.0,
            Self::Male => 1.0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "perempuan" => Ok(Self::Female),
            "male" | "laki-laki" => Ok(Self::Male),
            _ => Err(ValidationError::UnknownChoice {
                field: Field::Gender,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BmiCategory {
    #[default]
    Normal,
    NormalWeight,
    Overweight,
    Obese,
    Underweight,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 5] = [
        BmiCategory::Normal,
        BmiCategory::NormalWeight,
        BmiCategory::Overweight,
        BmiCategory::Obese,
        BmiCategory::Underweight,
    ];

    /// Numeric encoding used by the feature vector.
    ///
    /// Normal, Normal Weight and Underweight share code 0.
    #[must_use]
    pub fn code(&self) -> f64 {
        match self {
            Self::Normal | Self::NormalWeight | Self::Underweight => 0.0,
            Self::Overweight => 1.0,
            Self::Obese => 2.0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::NormalWeight => "Normal Weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
            Self::Underweight => "Underweight",
        }
    }
}

impl FromStr for BmiCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "normal" => Ok(Self::Normal),
            "normalweight" => Ok(Self::NormalWeight),
            "overweight" => Ok(Self::Overweight),
            "obese" => Ok(Self::Obese),
            "underweight" => Ok(Self::Underweight),
            _ => Err(ValidationError::UnknownChoice {
                field: Field::BmiCategory,
                value: s.to_string(),
            }),
        }
    }
}

/// A parsed "systolic/diastolic" reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separators = s.matches('/').count();
        if separators == 0 {
            return Err(BloodPressureError::MissingSeparator);
        }
        if separators > 1 {
            return Err(BloodPressureError::TooManySeparators(separators));
        }

        let (sys, dia) = s
            .split_once('/')
            .ok_or(BloodPressureError::MissingSeparator)?;

        Ok(Self {
            systolic: parse_component("systolic", sys)?,
            diastolic: parse_component("diastolic", dia)?,
        })
    }
}

fn parse_component(part: &'static str, raw: &str) -> Result<f64, BloodPressureError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BloodPressureError::NonNumeric {
            part,
            value: raw.to_string(),
        })
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Raw answers as captured by the form, before domain validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    pub gender: Gender,
    pub age: u32,
    pub occupation: String,
    /// Hours per night, in 0.5 steps
    pub sleep_duration: f64,
    pub quality_of_sleep: u32,
    pub physical_activity_level: u32,
    pub stress_level: u32,
    pub bmi_category: BmiCategory,
    /// "systolic/diastolic", e.g. "120/80"
    pub blood_pressure: String,
    pub heart_rate: u32,
    pub daily_steps: u32,
}

impl Default for Answers {
    /// Form defaults. Occupation and blood pressure start empty.
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            age: 30,
            occupation: String::new(),
            sleep_duration: 7.0,
            quality_of_sleep: 7,
            physical_activity_level: 5,
            stress_level: 5,
            bmi_category: BmiCategory::Normal,
            blood_pressure: String::new(),
            heart_rate: 80,
            daily_steps: 8000,
        }
    }
}

impl Answers {
    /// Validate and return the first violation in form order.
    ///
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<InputRecord, ValidationError> {
        self.validate_all().map_err(|mut errors| errors.remove(0))
    }

    /// Validate every field and collect all violations.
    ///
    /// # Errors
    /// Returns a non-empty list of violations, in form order.
    pub fn validate_all(&self) -> Result<InputRecord, Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_range(Field::Age, f64::from(self.age), &mut errors);

        let occupation = match parse_occupation(&self.occupation) {
            Ok(occupation) => Some(occupation),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if check_range(Field::SleepDuration, self.sleep_duration, &mut errors)
            && (self.sleep_duration * 2.0).fract() != 0.0
        {
            errors.push(ValidationError::InvalidStep(self.sleep_duration));
        }

        check_range(Field::QualityOfSleep, f64::from(self.quality_of_sleep), &mut errors);
        check_range(
            Field::PhysicalActivityLevel,
            f64::from(self.physical_activity_level),
            &mut errors,
        );
        check_range(Field::StressLevel, f64::from(self.stress_level), &mut errors);

        let blood_pressure = match self.blood_pressure.trim() {
            "" => {
                errors.push(ValidationError::Missing(Field::BloodPressure));
                None
            }
            raw => match raw.parse::<BloodPressure>() {
                Ok(bp) => Some(bp),
                Err(e) => {
                    errors.push(e.into());
                    None
                }
            },
        };

        check_range(Field::HeartRate, f64::from(self.heart_rate), &mut errors);
        check_range(Field::DailySteps, f64::from(self.daily_steps), &mut errors);

        match (occupation, blood_pressure) {
            (Some(occupation), Some(blood_pressure)) if errors.is_empty() => Ok(InputRecord {
                gender: self.gender,
                age: self.age,
                occupation,
                sleep_duration: self.sleep_duration,
                quality_of_sleep: self.quality_of_sleep,
                physical_activity_level: self.physical_activity_level,
                stress_level: self.stress_level,
                bmi_category: self.bmi_category,
                blood_pressure,
                heart_rate: self.heart_rate,
                daily_steps: self.daily_steps,
            }),
            _ => Err(errors),
        }
    }
}

/// Push an `OutOfRange` error if `value` falls outside the field's domain.
/// Returns true when the value is in range.
fn check_range(field: Field, value: f64, errors: &mut Vec<ValidationError>) -> bool {
    let Some((min, max)) = field.bounds() else {
        return true;
    };
    if value.is_finite() && (min..=max).contains(&value) {
        return true;
    }
    errors.push(ValidationError::OutOfRange {
        field,
        value,
        min,
        max,
    });
    false
}

fn parse_occupation(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(Field::Occupation));
    }

    let mut letters = trimmed.chars().filter(|c| !matches!(c, ' ' | '-' | '.')).peekable();
    if letters.peek().is_none() || !letters.all(char::is_alphabetic) {
        return Err(ValidationError::InvalidOccupation);
    }

    Ok(trimmed.to_string())
}

/// A questionnaire submission whose every field satisfies its domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputRecord {
    gender: Gender,
    age: u32,
    occupation: String,
    sleep_duration: f64,
    quality_of_sleep: u32,
    physical_activity_level: u32,
    stress_level: u32,
    bmi_category: BmiCategory,
    blood_pressure: BloodPressure,
    heart_rate: u32,
    daily_steps: u32,
}

impl InputRecord {
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn occupation(&self) -> &str {
        &self.occupation
    }

    #[must_use]
    pub fn sleep_duration(&self) -> f64 {
        self.sleep_duration
    }

    #[must_use]
    pub fn quality_of_sleep(&self) -> u32 {
        self.quality_of_sleep
    }

    #[must_use]
    pub fn physical_activity_level(&self) -> u32 {
        self.physical_activity_level
    }

    #[must_use]
    pub fn stress_level(&self) -> u32 {
        self.stress_level
    }

    #[must_use]
    pub fn bmi_category(&self) -> BmiCategory {
        self.bmi_category
    }

    #[must_use]
    pub fn blood_pressure(&self) -> BloodPressure {
        self.blood_pressure
    }

    #[must_use]
    pub fn heart_rate(&self) -> u32 {
        self.heart_rate
    }

    #[must_use]
    pub fn daily_steps(&self) -> u32 {
        self.daily_steps
    }

    /// The numeric answers paired with their field, in form order.
    #[must_use]
    pub fn scalar_inputs(&self) -> Vec<(Field, f64)> {
        vec![
            (Field::Age, f64::from(self.age)),
            (Field::SleepDuration, self.sleep_duration),
            (Field::QualityOfSleep, f64::from(self.quality_of_sleep)),
            (Field::PhysicalActivityLevel, f64::from(self.physical_activity_level)),
            (Field::StressLevel, f64::from(self.stress_level)),
            (Field::HeartRate, f64::from(self.heart_rate)),
            (Field::DailySteps, f64::from(self.daily_steps)),
        ]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Scenario B answers: valid, no risk factors triggered.
    pub(crate) fn valid_answers() -> Answers {
        Answers {
            gender: Gender::Male,
            age: 30,
            occupation: "Software Engineer".to_string(),
            sleep_duration: 7.0,
            quality_of_sleep: 7,
            physical_activity_level: 5,
            stress_level: 5,
            bmi_category: BmiCategory::Normal,
            blood_pressure: "120/80".to_string(),
            heart_rate: 70,
            daily_steps: 8000,
        }
    }

    #[test]
    fn test_valid_answers_produce_record() {
        let record = valid_answers().validate().expect("Should validate");
        assert_eq!(record.age(), 30);
        assert_eq!(record.occupation(), "Software Engineer");
        assert!((record.blood_pressure().systolic - 120.0).abs() < f64::EPSILON);
        assert!((record.blood_pressure().diastolic - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blood_pressure_parsing() {
        let bp: BloodPressure = " 135.5 / 85 ".parse().expect("Should parse");
        assert!((bp.systolic - 135.5).abs() < f64::EPSILON);
        assert!((bp.diastolic - 85.0).abs() < f64::EPSILON);

        assert_eq!(
            "120".parse::<BloodPressure>(),
            Err(BloodPressureError::MissingSeparator)
        );
        assert_eq!(
            "120/80/60".parse::<BloodPressure>(),
            Err(BloodPressureError::TooManySeparators(2))
        );
        assert!(matches!(
            "abc/80".parse::<BloodPressure>(),
            Err(BloodPressureError::NonNumeric { part: "systolic", .. })
        ));
        assert!(matches!(
            "120/".parse::<BloodPressure>(),
            Err(BloodPressureError::NonNumeric { part: "diastolic", .. })
        ));
        assert!("nan/80".parse::<BloodPressure>().is_err());
        assert!("120/inf".parse::<BloodPressure>().is_err());
    }

    #[test]
    fn test_malformed_blood_pressure_is_parse_error() {
        for raw in ["abc/80", "120", "120/80/70", "/"] {
            let answers = Answers {
                blood_pressure: raw.to_string(),
                ..valid_answers()
            };
            let err = answers.validate().expect_err("Should reject");
            assert!(err.is_parse_error(), "{raw} gave {err:?}");
            assert_eq!(err.field(), Field::BloodPressure);
        }

        let missing = Answers {
            blood_pressure: "  ".to_string(),
            ..valid_answers()
        };
        assert_eq!(
            missing.validate(),
            Err(ValidationError::Missing(Field::BloodPressure))
        );
    }

    #[test]
    fn test_occupation_rules() {
        for ok in ["Accountant", "Sales Representative", "Co-Founder", "Dr. Nurse", "Guru"] {
            let answers = Answers {
                occupation: ok.to_string(),
                ..valid_answers()
            };
            assert!(answers.validate().is_ok(), "{ok} should be accepted");
        }

        for bad in ["Engineer2", "R&D", "--", "..."] {
            let answers = Answers {
                occupation: bad.to_string(),
                ..valid_answers()
            };
            assert_eq!(
                answers.validate(),
                Err(ValidationError::InvalidOccupation),
                "{bad} should be rejected"
            );
        }

        let empty = Answers {
            occupation: "   ".to_string(),
            ..valid_answers()
        };
        assert_eq!(empty.validate(), Err(ValidationError::Missing(Field::Occupation)));
    }

    #[test]
    fn test_range_violations() {
        let too_young = Answers {
            age: 17,
            ..valid_answers()
        };
        assert!(matches!(
            too_young.validate(),
            Err(ValidationError::OutOfRange { field: Field::Age, .. })
        ));

        let too_many_steps = Answers {
            daily_steps: 20001,
            ..valid_answers()
        };
        assert_eq!(
            too_many_steps.validate().map_err(|e| e.field()),
            Err(Field::DailySteps)
        );

        let bad_step = Answers {
            sleep_duration: 6.3,
            ..valid_answers()
        };
        assert_eq!(bad_step.validate(), Err(ValidationError::InvalidStep(6.3)));

        let nan_sleep = Answers {
            sleep_duration: f64::NAN,
            ..valid_answers()
        };
        assert!(nan_sleep.validate().is_err());
    }

    #[test]
    fn test_validate_all_collects_in_form_order() {
        let answers = Answers {
            age: 5,
            occupation: String::new(),
            stress_level: 11,
            blood_pressure: "high".to_string(),
            ..valid_answers()
        };

        let errors = answers.validate_all().expect_err("Should reject");
        let fields: Vec<Field> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(
            fields,
            vec![
                Field::Age,
                Field::Occupation,
                Field::StressLevel,
                Field::BloodPressure
            ]
        );
        assert_eq!(answers.validate().map_err(|e| e.field()), Err(Field::Age));
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("Perempuan".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert!("other".parse::<Gender>().is_err());

        assert_eq!("Normal Weight".parse::<BmiCategory>(), Ok(BmiCategory::NormalWeight));
        assert_eq!("NormalWeight".parse::<BmiCategory>(), Ok(BmiCategory::NormalWeight));
        assert_eq!("obese".parse::<BmiCategory>(), Ok(BmiCategory::Obese));
        assert!("athletic".parse::<BmiCategory>().is_err());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = Answers {
            heart_rate: 250,
            ..valid_answers()
        }
        .validate()
        .expect_err("Should reject");
        assert_eq!(err.to_string(), "Heart rate must be between 40 and 200, got 250");
    }
}
