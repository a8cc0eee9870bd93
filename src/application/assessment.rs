//! Assessment service: validate, score, optionally consult the model, advise.
//!
//! The rule-based scorer always runs. With `ScoringEngine::Model` the trained
//! classifier's result replaces it; any classifier failure downgrades the
//! service to rules for the rest of the process and is reported as a notice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ScoringEngine;
use crate::domain::{
    score_record, Answers, Assessment, FeatureVector, Field, InputRecord, Language,
    Recommendation, RiskResult, ScoringSource,
};
use crate::ports::{ArtifactError, InsomniaClassifier};

/// Everything the result page needs.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub assessment: Assessment,
    pub recommendation: Recommendation,
    /// Submitted numeric answers, for the result chart
    pub inputs: Vec<(Field, f64)>,
    /// Non-fatal message, e.g. the model path fell back to rules
    pub notice: Option<String>,
}

/// Service for running one screening per submission.
pub struct AssessmentService<C>
where
    C: InsomniaClassifier,
{
    classifier: Option<Arc<C>>,
    engine: ScoringEngine,
    language: Language,
    model_enabled: AtomicBool,
}

impl<C> AssessmentService<C>
where
    C: InsomniaClassifier,
{
    /// Create a service without a classifier.
    #[must_use]
    pub fn new(engine: ScoringEngine, language: Language) -> Self {
        Self {
            classifier: None,
            engine,
            language,
            model_enabled: AtomicBool::new(engine == ScoringEngine::Model),
        }
    }

    /// Attach a loaded classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<C>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn engine(&self) -> ScoringEngine {
        self.engine
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// True while the trained model is still consulted.
    #[must_use]
    pub fn model_active(&self) -> bool {
        self.classifier.is_some() && self.model_enabled.load(Ordering::Acquire)
    }

    /// Validate raw answers and assess them.
    ///
    /// # Errors
    /// Returns `SomnusError::Validation` for the first invalid field. Nothing
    /// is scored in that case.
    pub fn assess(&self, answers: &Answers) -> crate::Result<Outcome> {
        let record = answers.validate().map_err(|e| {
            tracing::debug!("Submission rejected at field {}", e.field());
            e
        })?;
        Ok(self.assess_record(&record))
    }

    /// Assess an already validated record. Never fails.
    #[must_use]
    pub fn assess_record(&self, record: &InputRecord) -> Outcome {
        let (score, rule_result) = score_record(record);

        let (result, source, notice) = if self.engine == ScoringEngine::Model {
            match self.classify(record) {
                Ok(result) => (result, ScoringSource::Model, None),
                Err(e) => {
                    if self.model_enabled.swap(false, Ordering::AcqRel) {
                        tracing::warn!("Model path disabled, using rule-based scorer: {}", e);
                    }
                    (
                        rule_result,
                        ScoringSource::Rules,
                        Some(format!("Trained model unavailable ({e}); showing rule-based result.")),
                    )
                }
            }
        } else {
            (rule_result, ScoringSource::Rules, None)
        };

        let recommendation = Recommendation::for_result(&result, self.language);

        tracing::info!(
            "Assessment complete: source={}, label={}, score={}, tier={:?}",
            source,
            result.label,
            score.total(),
            recommendation.tier
        );

        Outcome {
            assessment: Assessment::new(result, score, source),
            recommendation,
            inputs: record.scalar_inputs(),
            notice,
        }
    }

    fn classify(&self, record: &InputRecord) -> Result<RiskResult, ArtifactError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| ArtifactError::NotFound("no model loaded".to_string()))?;
        if !self.model_enabled.load(Ordering::Acquire) {
            return Err(ArtifactError::Prediction(
                "model path disabled after an earlier failure".to_string(),
            ));
        }

        let features = FeatureVector::from_record(record);
        tracing::debug!("Scoring with {}", classifier.name());
        classifier.classify(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AdviceTier, BmiCategory, Gender, Probabilities, RiskLabel, ValidationError,
    };
    use crate::SomnusError;
    use std::sync::atomic::AtomicUsize;

    fn answers() -> Answers {
        Answers {
            gender: Gender::Female,
            age: 30,
            occupation: "Accountant".to_string(),
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

    fn at_risk() -> Answers {
        Answers {
            sleep_duration: 5.0,
            quality_of_sleep: 4,
            stress_level: 8,
            physical_activity_level: 3,
            bmi_category: BmiCategory::Obese,
            ..answers()
        }
    }

    /// Always answers Insomnia with a fixed probability.
    struct FixedClassifier(f64);

    impl InsomniaClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _: &FeatureVector) -> Result<RiskLabel, ArtifactError> {
            Ok(RiskLabel::Insomnia)
        }

        fn predict_probability(&self, _: &FeatureVector) -> Result<Probabilities, ArtifactError> {
            Ok(Probabilities::from_insomnia(self.0))
        }
    }

    #[derive(Default)]
    struct BrokenClassifier {
        calls: AtomicUsize,
    }

    impl InsomniaClassifier for BrokenClassifier {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict(&self, _: &FeatureVector) -> Result<RiskLabel, ArtifactError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ArtifactError::Prediction("boom".to_string()))
        }

        fn predict_probability(&self, _: &FeatureVector) -> Result<Probabilities, ArtifactError> {
            Err(ArtifactError::Prediction("boom".to_string()))
        }
    }

    #[test]
    fn test_rules_engine_scenarios() {
        let service: AssessmentService<FixedClassifier> =
            AssessmentService::new(ScoringEngine::Rules, Language::English);

        let healthy = service.assess(&answers()).expect("Should assess");
        assert_eq!(healthy.assessment.result.label, RiskLabel::Normal);
        assert_eq!(healthy.assessment.score.total(), 0);
        assert_eq!(healthy.assessment.source, ScoringSource::Rules);
        assert_eq!(healthy.recommendation.tier, AdviceTier::Excellent);
        assert!(healthy.notice.is_none());
        assert_eq!(healthy.inputs.len(), 7);
        assert_eq!(healthy.inputs[1], (Field::SleepDuration, 7.0));

        let risky = service.assess(&at_risk()).expect("Should assess");
        assert_eq!(risky.assessment.score.total(), 8);
        assert_eq!(risky.assessment.result.label, RiskLabel::Insomnia);
        assert!((risky.assessment.result.probabilities.insomnia - 0.90).abs() < 1e-12);
        assert_eq!(risky.recommendation.tier, AdviceTier::HighRisk);
    }

    #[test]
    fn test_rules_engine_ignores_classifier() {
        let service = AssessmentService::new(ScoringEngine::Rules, Language::English)
            .with_classifier(Arc::new(FixedClassifier(0.99)));

        let outcome = service.assess(&answers()).expect("Should assess");
        assert_eq!(outcome.assessment.source, ScoringSource::Rules);
        assert_eq!(outcome.assessment.result.label, RiskLabel::Normal);
        assert!(!service.model_active());
    }

    #[test]
    fn test_validation_error_is_terminal() {
        let service: AssessmentService<FixedClassifier> =
            AssessmentService::new(ScoringEngine::Rules, Language::English);
        let invalid = Answers {
            heart_rate: 250,
            ..answers()
        };

        match service.assess(&invalid) {
            Err(SomnusError::Validation(ValidationError::OutOfRange { field, .. })) => {
                assert_eq!(field, Field::HeartRate);
            }
            other => panic!("expected out-of-range error, got {other:?}"),
        }
    }

    #[test]
    fn test_model_engine_uses_classifier() {
        let service = AssessmentService::new(ScoringEngine::Model, Language::Indonesian)
            .with_classifier(Arc::new(FixedClassifier(0.65)));
        assert!(service.model_active());

        let outcome = service.assess(&answers()).expect("Should assess");
        assert_eq!(outcome.assessment.source, ScoringSource::Model);
        assert_eq!(outcome.assessment.result.label, RiskLabel::Insomnia);
        assert_eq!(outcome.recommendation.tier, AdviceTier::ModerateRisk);
        assert_eq!(outcome.recommendation.language, Language::Indonesian);
        // Rule score is still reported for explanation.
        assert_eq!(outcome.assessment.score.total(), 0);
    }

    #[test]
    fn test_model_failure_falls_back_once() {
        let broken = Arc::new(BrokenClassifier::default());
        let service = AssessmentService::new(ScoringEngine::Model, Language::English)
            .with_classifier(Arc::clone(&broken));

        let first = service.assess(&at_risk()).expect("Should fall back");
        assert_eq!(first.assessment.source, ScoringSource::Rules);
        assert_eq!(first.assessment.result.label, RiskLabel::Insomnia);
        assert!(first.notice.is_some());
        assert!(!service.model_active());

        let second = service.assess(&answers()).expect("Should fall back");
        assert_eq!(second.assessment.source, ScoringSource::Rules);
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_model_engine_without_classifier() {
        let service: AssessmentService<FixedClassifier> =
            AssessmentService::new(ScoringEngine::Model, Language::English);

        let outcome = service.assess(&answers()).expect("Should assess");
        assert_eq!(outcome.assessment.source, ScoringSource::Rules);
        assert!(outcome.notice.is_some());
    }
}
