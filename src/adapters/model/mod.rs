//! Model adapter: Implementation of InsomniaClassifier over a JSON artifact.
//!
//! The artifact is a logistic regression over standardized features, exported
//! by the training pipeline as `insomnia_model.json`.
//!
//! # Integrity
//!
//! An optional `manifest.json` next to the artifact lists SHA-256 digests of
//! the model files. When present, every listed file must match before the
//! model is accepted. `SOMNUS_REQUIRE_MANIFEST=true` makes it mandatory.
//!
//! # Caching
//!
//! `load_shared()` keeps the first successfully loaded model for the lifetime
//! of the process. Failed loads are not cached.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, Probabilities, RiskLabel, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{ArtifactError, InsomniaClassifier};

/// File name of the model artifact inside the model directory.
pub const MODEL_FILE: &str = "insomnia_model.json";

/// File name of the digest manifest inside the model directory.
pub const MANIFEST_FILE: &str = "manifest.json";

const FORMAT_VERSION: u32 = 1;
const MANIFEST_VERSION: u32 = 1;
const MODEL_TYPE: &str = "logistic_regression";

static SHARED: OnceLock<Arc<LogisticClassifier>> = OnceLock::new();

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub model_type: Option<String>,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Digest manifest: file name → lowercase hex SHA-256.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Logistic-regression classifier loaded from an artifact.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    artifact: LogisticArtifact,
    name: String,
}

impl LogisticClassifier {
    /// Check an artifact against the feature layout and wrap it.
    ///
    /// # Errors
    /// Returns `Incompatible` if the columns differ from the feature vector,
    /// `Malformed` for unusable parameters.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Incompatible(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if let Some(kind) = &artifact.model_type {
            if kind != MODEL_TYPE {
                return Err(ArtifactError::Incompatible(format!(
                    "unsupported model_type '{kind}'"
                )));
            }
        }

        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ArtifactError::Incompatible(format!(
                "feature columns do not match the {FEATURE_COUNT}-column layout"
            )));
        }

        if artifact.coefficients.len() != FEATURE_COUNT
            || artifact.scaler_mean.len() != FEATURE_COUNT
            || artifact.scaler_scale.len() != FEATURE_COUNT
        {
            return Err(ArtifactError::Malformed(
                "parameter lengths do not match feature_names length".into(),
            ));
        }

        let all_finite = artifact
            .coefficients
            .iter()
            .chain(&artifact.scaler_mean)
            .chain(&artifact.scaler_scale)
            .chain(std::iter::once(&artifact.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ArtifactError::Malformed("non-finite parameter".into()));
        }
        if artifact.scaler_scale.iter().any(|s| *s == 0.0) {
            return Err(ArtifactError::Malformed("zero scaler_scale entry".into()));
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ArtifactError::Malformed(format!(
                "threshold {} outside (0, 1)",
                artifact.threshold
            )));
        }

        Ok(Self {
            artifact,
            name: format!("{MODEL_TYPE} v{FORMAT_VERSION}"),
        })
    }

    /// Parse an artifact from JSON text.
    ///
    /// # Errors
    /// Returns `Malformed` on invalid JSON, or any `from_artifact` error.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: LogisticArtifact =
            serde_json::from_str(json).map_err(|e| ArtifactError::Malformed(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Load the artifact from a model directory (or a direct path to the JSON file).
    ///
    /// # Errors
    /// Returns error if the artifact is missing, unreadable, fails its
    /// manifest check, or does not match the feature layout.
    pub fn load(model_path: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        if !model_path.exists() {
            return Err(ArtifactError::NotFound(model_path.display().to_string()));
        }

        let (base_dir, model_file) = if model_path.is_dir() {
            (model_path.to_path_buf(), model_path.join(MODEL_FILE))
        } else {
            let base = model_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (base, model_path.to_path_buf())
        };

        if !model_file.exists() {
            return Err(ArtifactError::NotFound(model_file.display().to_string()));
        }

        let manifest = verify_manifest(&base_dir, require_manifest)?;
        if let Some(manifest) = &manifest {
            let file_name = model_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if !manifest.files.contains_key(file_name) {
                return Err(ArtifactError::Integrity(format!(
                    "{MANIFEST_FILE} does not cover {file_name}"
                )));
            }
        }

        let content =
            fs::read_to_string(&model_file).map_err(|e| ArtifactError::Io(e.to_string()))?;
        let classifier = Self::from_json(&content)?;

        tracing::info!(
            "Loaded model from {:?} (type={}, n_features={}, verified={})",
            model_file,
            MODEL_TYPE,
            FEATURE_COUNT,
            manifest.is_some()
        );

        Ok(classifier)
    }

    /// The parsed artifact.
    #[must_use]
    pub fn artifact(&self) -> &LogisticArtifact {
        &self.artifact
    }

    fn insomnia_probability(&self, features: &FeatureVector) -> Result<f64, ArtifactError> {
        let a = &self.artifact;
        let z = features
            .as_slice()
            .iter()
            .zip(&a.scaler_mean)
            .zip(&a.scaler_scale)
            .zip(&a.coefficients)
            .fold(a.intercept, |acc, (((x, mean), scale), coef)| {
                acc + coef * (x - mean) / scale
            });

        if !z.is_finite() {
            return Err(ArtifactError::Prediction(
                "decision function is not finite".into(),
            ));
        }

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl InsomniaClassifier for LogisticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ArtifactError> {
        let p = self.insomnia_probability(features)?;
        Ok(if p >= self.artifact.threshold {
            RiskLabel::Insomnia
        } else {
            RiskLabel::Normal
        })
    }

    fn predict_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<Probabilities, ArtifactError> {
        self.insomnia_probability(features)
            .map(Probabilities::from_insomnia)
    }
}

/// Check `manifest.json` in `base_dir` against the files it lists.
///
/// Returns `Ok(None)` when no manifest exists and none is required.
///
/// # Errors
/// Returns `Integrity` on a missing required manifest, a digest mismatch or
/// a manifest entry that escapes the model directory.
pub fn verify_manifest(
    base_dir: &Path,
    require_manifest: bool,
) -> Result<Option<ModelManifest>, ArtifactError> {
    let manifest_path = base_dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        if require_manifest {
            return Err(ArtifactError::Integrity(format!(
                "{MANIFEST_FILE} required but not found in {:?}",
                base_dir
            )));
        }
        tracing::warn!(
            "No {} in {:?}; loading model without integrity check",
            MANIFEST_FILE,
            base_dir
        );
        return Ok(None);
    }

    let bytes = fs::read(&manifest_path).map_err(|e| ArtifactError::Io(e.to_string()))?;
    let manifest: ModelManifest = serde_json::from_slice(&bytes)
        .map_err(|e| ArtifactError::Malformed(format!("invalid {MANIFEST_FILE}: {e}")))?;

    if manifest.version != MANIFEST_VERSION {
        return Err(ArtifactError::Incompatible(format!(
            "unsupported manifest version {}",
            manifest.version
        )));
    }
    if manifest.files.is_empty() {
        return Err(ArtifactError::Integrity(format!(
            "{MANIFEST_FILE} lists no files"
        )));
    }

    for (rel, expected) in &manifest.files {
        if rel.contains('/') || rel.contains('\\') || rel == ".." || rel.is_empty() {
            return Err(ArtifactError::Integrity(format!(
                "manifest entry '{rel}' must be a plain file name"
            )));
        }

        let path = base_dir.join(rel);
        let bytes = fs::read(&path).map_err(|e| {
            ArtifactError::Integrity(format!("manifest references unreadable file {rel}: {e}"))
        })?;

        if !sha256_hex(&bytes).eq_ignore_ascii_case(expected.trim()) {
            return Err(ArtifactError::Integrity(format!(
                "digest mismatch for {rel}"
            )));
        }
    }

    Ok(Some(manifest))
}

/// Load once, reuse for the lifetime of the process.
///
/// # Errors
/// Returns the load error; nothing is cached in that case.
pub fn load_shared(
    model_path: &Path,
    require_manifest: bool,
) -> Result<Arc<LogisticClassifier>, ArtifactError> {
    if let Some(model) = SHARED.get() {
        tracing::debug!("Reusing cached model");
        return Ok(Arc::clone(model));
    }

    let loaded = Arc::new(LogisticClassifier::load(model_path, require_manifest)?);
    Ok(Arc::clone(SHARED.get_or_init(|| loaded)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answers, BmiCategory, Gender};

    fn shipped_models() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
    }

    fn answers() -> Answers {
        Answers {
            gender: Gender::Male,
            age: 30,
            occupation: "Nurse".to_string(),
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

    fn zero_artifact() -> LogisticArtifact {
        LogisticArtifact {
            format_version: 1,
            model_type: Some(MODEL_TYPE.to_string()),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
            scaler_mean: vec![0.0; FEATURE_COUNT],
            scaler_scale: vec![1.0; FEATURE_COUNT],
            threshold: 0.5,
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("somnus-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("Should create scratch dir");
        dir
    }

    #[test]
    fn test_load_shipped_model() {
        let model = LogisticClassifier::load(&shipped_models(), true).expect("Model should load");

        let healthy = FeatureVector::derive(&answers()).expect("Should derive");
        let at_risk = FeatureVector::derive(&Answers {
            sleep_duration: 5.0,
            quality_of_sleep: 4,
            stress_level: 8,
            physical_activity_level: 3,
            bmi_category: BmiCategory::Obese,
            ..answers()
        })
        .expect("Should derive");

        assert_eq!(model.predict(&healthy), Ok(RiskLabel::Normal));
        assert_eq!(model.predict(&at_risk), Ok(RiskLabel::Insomnia));

        let p = model.predict_probability(&at_risk).expect("Should score");
        assert!((p.normal + p.insomnia - 1.0).abs() < 1e-9);
        assert!(p.insomnia > 0.9);
    }

    #[test]
    fn test_zero_model_is_indifferent() {
        let model = LogisticClassifier::from_artifact(zero_artifact()).expect("Should accept");
        let v = FeatureVector::derive(&answers()).expect("Should derive");

        let result = model.classify(&v).expect("Should classify");
        assert!((result.probabilities.insomnia - 0.5).abs() < 1e-12);
        assert_eq!(result.label, RiskLabel::Insomnia);
    }

    #[test]
    fn test_rejects_incompatible_columns() {
        let mut artifact = zero_artifact();
        artifact.feature_names.swap(0, 1);
        assert!(matches!(
            LogisticClassifier::from_artifact(artifact),
            Err(ArtifactError::Incompatible(_))
        ));

        let mut short = zero_artifact();
        short.feature_names.pop();
        assert!(matches!(
            LogisticClassifier::from_artifact(short),
            Err(ArtifactError::Incompatible(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_parameters() {
        let mut zero_scale = zero_artifact();
        zero_scale.scaler_scale[3] = 0.0;
        assert!(matches!(
            LogisticClassifier::from_artifact(zero_scale),
            Err(ArtifactError::Malformed(_))
        ));

        let mut bad_threshold = zero_artifact();
        bad_threshold.threshold = 1.5;
        assert!(LogisticClassifier::from_artifact(bad_threshold).is_err());

        assert!(matches!(
            LogisticClassifier::from_json("{ not json"),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = scratch_dir("missing");
        assert!(matches!(
            LogisticClassifier::load(&dir, false),
            Err(ArtifactError::NotFound(_))
        ));
        assert!(matches!(
            LogisticClassifier::load(&dir.join("nope"), false),
            Err(ArtifactError::NotFound(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_manifest_detects_tampering() {
        let dir = scratch_dir("tamper");
        let json = serde_json::to_string(&zero_artifact()).expect("Should serialize");
        fs::write(dir.join(MODEL_FILE), &json).expect("Should write model");

        assert!(LogisticClassifier::load(&dir, false).is_ok());
        assert!(matches!(
            LogisticClassifier::load(&dir, true),
            Err(ArtifactError::Integrity(_))
        ));

        let manifest = ModelManifest {
            version: 1,
            files: BTreeMap::from([(MODEL_FILE.to_string(), sha256_hex(json.as_bytes()))]),
        };
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).expect("Should serialize"),
        )
        .expect("Should write manifest");
        assert!(LogisticClassifier::load(&dir, true).is_ok());

        fs::write(dir.join(MODEL_FILE), json.replace("0.5", "0.6")).expect("Should write");
        assert!(matches!(
            LogisticClassifier::load(&dir, true),
            Err(ArtifactError::Integrity(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_manifest_rejects_path_escape() {
        let dir = scratch_dir("escape");
        fs::write(dir.join(MANIFEST_FILE), r#"{"version":1,"files":{"../x":"00"}}"#)
            .expect("Should write manifest");
        assert!(matches!(
            verify_manifest(&dir, true),
            Err(ArtifactError::Integrity(_))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_shared_model_is_reused() {
        let first = load_shared(&shipped_models(), false).expect("Should load");
        let second = load_shared(Path::new("does-not-matter"), false).expect("Should reuse");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
