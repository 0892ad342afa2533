//! Model artifact loading and startup self-check.
//!
//! The classifier and both encoders are serialized JSON artifacts produced
//! by the offline training pipeline. They are loaded once at startup and
//! held process-wide (the server keeps the bundle in shared state); reload
//! happens only on explicit redeploy.
//!
//! Two deploy-time failure modes are caught here instead of surfacing as
//! silently wrong predictions in production:
//!
//! - an artifact declaring a different feature column order than this
//!   build expects, and
//! - a self-check fixture predicting a different class than the artifact
//!   recorded at training time.

use std::path::Path;

use crime_intel_prediction_models::FEATURE_NAMES;
use serde::Deserialize;

use crate::PredictionError;
use crate::encoder::CategoryEncoder;
use crate::model::{DecisionTree, ForestClassifier};

/// Default directory holding the model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "ml";

/// Classifier artifact filename.
pub const SEVERITY_MODEL_FILE: &str = "severity_model.json";

/// Crime type encoder artifact filename.
pub const CRIME_ENCODER_FILE: &str = "crime_type_encoder.json";

/// Location encoder artifact filename.
pub const LOCATION_ENCODER_FILE: &str = "location_encoder.json";

/// Serialized classifier artifact.
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    version: String,
    feature_names: Vec<String>,
    n_classes: usize,
    trees: Vec<DecisionTree>,
    self_check: SelfCheck,
}

/// Known fixture input recorded at training time, with the class the
/// trained model produced for it.
#[derive(Debug, Deserialize)]
struct SelfCheck {
    features: [f64; 4],
    expected_class: usize,
}

/// A fully loaded and verified set of prediction artifacts.
#[derive(Debug)]
pub struct ArtifactBundle {
    /// The trained severity classifier.
    pub classifier: ForestClassifier,
    /// Crime type label encoder.
    pub crime_encoder: CategoryEncoder,
    /// Location label encoder.
    pub location_encoder: CategoryEncoder,
    /// Artifact version string, surfaced via the health endpoint.
    pub version: String,
}

impl ArtifactBundle {
    /// Loads all three artifacts from a directory and runs the startup
    /// self-check.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if any artifact is missing, unparsable,
    /// structurally corrupt, or fails the version/self-check validation.
    pub fn load(dir: &Path) -> Result<Self, PredictionError> {
        let model_contents = std::fs::read_to_string(dir.join(SEVERITY_MODEL_FILE))?;
        let (classifier, version) = parse_model(&model_contents)?;

        let crime_encoder =
            CategoryEncoder::from_file("crime_type", &dir.join(CRIME_ENCODER_FILE))?;
        let location_encoder =
            CategoryEncoder::from_file("location", &dir.join(LOCATION_ENCODER_FILE))?;

        log::info!(
            "Loaded prediction artifacts version {version} from {}",
            dir.display()
        );

        Ok(Self {
            classifier,
            crime_encoder,
            location_encoder,
            version,
        })
    }
}

/// Parses and verifies a classifier artifact.
///
/// # Errors
///
/// Returns [`PredictionError::VersionMismatch`] when the declared feature
/// order differs from this build's contract or the self-check fixture
/// predicts the wrong class, and [`PredictionError::CorruptArtifact`] for
/// structural problems.
pub fn parse_model(contents: &str) -> Result<(ForestClassifier, String), PredictionError> {
    let artifact: ModelArtifact = serde_json::from_str(contents)?;

    if artifact.feature_names != FEATURE_NAMES {
        return Err(PredictionError::VersionMismatch {
            message: format!(
                "artifact feature order {:?} does not match expected {FEATURE_NAMES:?}",
                artifact.feature_names
            ),
        });
    }

    let classifier = ForestClassifier::new(artifact.trees, artifact.n_classes)?;

    let predicted = classifier.predict_raw(&artifact.self_check.features);
    if predicted != artifact.self_check.expected_class {
        return Err(PredictionError::VersionMismatch {
            message: format!(
                "self-check fixture predicted class {predicted}, artifact expects {}",
                artifact.self_check.expected_class
            ),
        });
    }

    Ok((classifier, artifact.version))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_json(feature_names: &str, expected_class: usize) -> String {
        format!(
            r#"{{
                "version": "test-1",
                "feature_names": {feature_names},
                "n_classes": 2,
                "trees": [
                    {{
                        "nodes": [
                            {{ "feature": 0, "threshold": 2.5, "left": 1, "right": 2 }},
                            {{ "value": [1.0, 9.0] }},
                            {{ "value": [9.0, 1.0] }}
                        ]
                    }}
                ],
                "self_check": {{
                    "features": [1.0, -1.95, 30.05, 0.0],
                    "expected_class": {expected_class}
                }}
            }}"#
        )
    }

    const CONTRACT_ORDER: &str =
        r#"["crime_type_encoded", "latitude", "longitude", "location_encoded"]"#;

    #[test]
    fn valid_artifact_parses_and_passes_self_check() {
        let (classifier, version) = parse_model(&model_json(CONTRACT_ORDER, 1)).unwrap();
        assert_eq!(version, "test-1");
        assert_eq!(classifier.predict_raw(&[1.0, -1.95, 30.05, 0.0]), 1);
    }

    #[test]
    fn reordered_feature_names_rejected() {
        let reordered =
            r#"["latitude", "crime_type_encoded", "longitude", "location_encoded"]"#;
        let err = parse_model(&model_json(reordered, 1)).unwrap_err();
        assert!(matches!(err, PredictionError::VersionMismatch { .. }));
    }

    #[test]
    fn failing_self_check_rejected() {
        let err = parse_model(&model_json(CONTRACT_ORDER, 0)).unwrap_err();
        assert!(matches!(err, PredictionError::VersionMismatch { .. }));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            parse_model("{ not json").unwrap_err(),
            PredictionError::Json(_)
        ));
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let err = ArtifactBundle::load(Path::new("/nonexistent/model/dir")).unwrap_err();
        assert!(matches!(err, PredictionError::Io(_)));
    }

    #[test]
    fn shipped_artifacts_load_and_pass_self_check() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_MODEL_DIR);
        let bundle = ArtifactBundle::load(&dir).unwrap();
        assert_eq!(bundle.version, "2025-06-rf3");
        assert!(bundle.crime_encoder.contains("Homicide"));
        assert!(bundle.location_encoder.contains("Kacyiru"));
    }
}
