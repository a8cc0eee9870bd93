//! Rule-based insomnia risk scoring and result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::questionnaire::{BmiCategory, InputRecord};

/// Binary risk conditions accumulated into the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    /// Sleep duration under 6 hours
    ShortSleep,
    /// Sleep quality under 5
    PoorSleepQuality,
    /// Stress level above 7
    HighStress,
    /// Physical activity level under 4
    LowActivity,
    /// BMI category Obese
    Obesity,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::ShortSleep,
        RiskFactor::PoorSleepQuality,
        RiskFactor::HighStress,
        RiskFactor::LowActivity,
        RiskFactor::Obesity,
    ];

    /// Points added when the condition holds.
    #[must_use]
    pub fn weight(&self) -> u8 {
        match self {
            Self::ShortSleep | Self::PoorSleepQuality | Self::HighStress => 2,
            Self::LowActivity | Self::Obesity => 1,
        }
    }

    #[must_use]
    pub fn applies(&self, record: &InputRecord) -> bool {
        match self {
            Self::ShortSleep => record.sleep_duration() < 6.0,
            Self::PoorSleepQuality => record.quality_of_sleep() < 5,
            Self::HighStress => record.stress_level() > 7,
            Self::LowActivity => record.physical_activity_level() < 4,
            Self::Obesity => record.bmi_category() == BmiCategory::Obese,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::ShortSleep => "Sleeping less than 6 hours",
            Self::PoorSleepQuality => "Sleep quality below 5",
            Self::HighStress => "Stress level above 7",
            Self::LowActivity => "Physical activity below 4",
            Self::Obesity => "BMI category obese",
        }
    }
}

/// Integer risk score with the conditions that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    total: u8,
    factors: Vec<RiskFactor>,
}

impl RiskScore {
    /// Accumulate the weights of every condition that holds for `record`.
    #[must_use]
    pub fn evaluate(record: &InputRecord) -> Self {
        let factors: Vec<RiskFactor> = RiskFactor::ALL
            .into_iter()
            .filter(|factor| factor.applies(record))
            .collect();
        Self::from_factors(factors)
    }

    /// Build a score from an explicit set of triggered factors.
    #[must_use]
    pub fn from_factors(factors: Vec<RiskFactor>) -> Self {
        let total = factors.iter().map(RiskFactor::weight).sum();
        Self { total, factors }
    }

    #[must_use]
    pub fn total(&self) -> u8 {
        self.total
    }

    #[must_use]
    pub fn factors(&self) -> &[RiskFactor] {
        &self.factors
    }
}

/// Predicted class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Normal,
    Insomnia,
}

impl RiskLabel {
    /// Label for a rule-based score: 0..=2 is Normal, 3 and above Insomnia.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score <= 2 {
            Self::Normal
        } else {
            Self::Insomnia
        }
    }

    /// Class index as used by binary classifiers (0 = Normal, 1 = Insomnia).
    #[must_use]
    pub fn class_index(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Insomnia => 1,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Insomnia => write!(f, "INSOMNIA"),
        }
    }
}

/// Class probability pair. The two values sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub normal: f64,
    pub insomnia: f64,
}

impl Probabilities {
    /// Build the pair from the insomnia-class probability.
    #[must_use]
    pub fn from_insomnia(insomnia: f64) -> Self {
        Self {
            normal: 1.0 - insomnia,
            insomnia,
        }
    }

    /// Probability of the given class.
    #[must_use]
    pub fn of(&self, label: RiskLabel) -> f64 {
        match label {
            RiskLabel::Normal => self.normal,
            RiskLabel::Insomnia => self.insomnia,
        }
    }
}

/// Score bucket → (label, pNormal, pInsomnia). Scores above 6 share the last row.
const SCORE_TABLE: [(RiskLabel, f64, f64); 7] = [
    (RiskLabel::Normal, 0.90, 0.10),
    (RiskLabel::Normal, 0.80, 0.20),
    (RiskLabel::Normal, 0.70, 0.30),
    (RiskLabel::Insomnia, 0.55, 0.45),
    (RiskLabel::Insomnia, 0.40, 0.60),
    (RiskLabel::Insomnia, 0.25, 0.75),
    (RiskLabel::Insomnia, 0.10, 0.90),
];

/// Classification with its probability pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub label: RiskLabel,
    pub probabilities: Probabilities,
}

impl RiskResult {
    /// Map a rule-based score to its fixed result.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        let (label, normal, insomnia) = SCORE_TABLE[usize::from(score.min(6))];
        Self {
            label,
            probabilities: Probabilities { normal, insomnia },
        }
    }

    /// Probability of the predicted class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.probabilities.of(self.label)
    }
}

/// Run the rule-based scorer on a validated record.
#[must_use]
pub fn score_record(record: &InputRecord) -> (RiskScore, RiskResult) {
    let score = RiskScore::evaluate(record);
    let result = RiskResult::from_score(score.total());
    (score, result)
}

/// Which path produced the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringSource {
    Rules,
    Model,
}

impl fmt::Display for ScoringSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => write!(f, "rule-based"),
            Self::Model => write!(f, "trained model"),
        }
    }
}

/// A completed screening. Lives only as long as the result is on screen.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub result: RiskResult,

    /// Rule-based score, kept for explanation even when the model decided
    pub score: RiskScore,

    pub source: ScoringSource,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(result: RiskResult, score: RiskScore, source: ScoringSource) -> Self {
        Self {
            result,
            score,
            source,
            created_at: chrono::Utc::now(),
        }
    }
}
