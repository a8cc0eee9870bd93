//! Classifier port: Trait for trained insomnia classifiers.
//!
//! This trait abstracts the persisted model artifact from the application
//! logic. Only its two-method capability surface is part of the contract.

use crate::domain::{FeatureVector, Probabilities, RiskLabel, RiskResult};

/// Errors from loading or running a classifier artifact.
///
/// None of these are fatal: the rule-based scorer does not depend on the artifact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArtifactError {
    #[error("Model artifact not found at {0}")]
    NotFound(String),

    #[error("Failed to read model artifact: {0}")]
    Io(String),

    #[error("Malformed model artifact: {0}")]
    Malformed(String),

    #[error("Incompatible model artifact: {0}")]
    Incompatible(String),

    #[error("Model integrity check failed: {0}")]
    Integrity(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

/// Trait for trained classifiers over the 16-column feature vector.
///
/// Implementations are read-only after load and may be shared process-wide.
pub trait InsomniaClassifier: Send + Sync {
    /// Short identifier for logs and the result screen.
    fn name(&self) -> &str;

    /// Predict the class of a feature vector.
    ///
    /// # Errors
    /// Returns `ArtifactError::Prediction` if the model cannot score the vector.
    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ArtifactError>;

    /// Predict the class probabilities of a feature vector.
    ///
    /// # Errors
    /// Returns `ArtifactError::Prediction` if the model cannot score the vector.
    fn predict_probability(&self, features: &FeatureVector)
        -> Result<Probabilities, ArtifactError>;

    /// Predict label and probabilities together.
    ///
    /// # Errors
    /// Propagates errors from `predict` and `predict_probability`.
    fn classify(&self, features: &FeatureVector) -> Result<RiskResult, ArtifactError> {
        Ok(RiskResult {
            label: self.predict(features)?,
            probabilities: self.predict_probability(features)?,
        })
    }
}
