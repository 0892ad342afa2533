//! Predictor facade.
//!
//! Combines the encoders, the fallback resolver, the feature builder, and
//! the classifier backend into the two operations the rest of the system
//! calls: incident severity prediction and suspect risk scoring.

use std::path::Path;

use crime_intel_prediction_models::{
    FeatureVector, ResolvedLocation, RiskTier, SeverityPrediction, SuspectRiskPrediction,
};

use crate::PredictionError;
use crate::artifacts::ArtifactBundle;
use crate::features;
use crate::model::SeverityClassifier as _;
use crate::resolver::{self, LocationResolver};

/// Fixed confidence stored alongside suspect risk predictions, carried
/// over from the source system.
pub const SUSPECT_PREDICTION_CONFIDENCE: f64 = 0.85;

/// Everything produced for one incident prediction.
#[derive(Debug, Clone)]
pub struct IncidentPrediction {
    /// The classifier output.
    pub severity: SeverityPrediction,
    /// How the location label was resolved, including any degraded
    /// fallback step.
    pub location: ResolvedLocation,
    /// The exact feature vector that was classified.
    pub features: FeatureVector,
}

/// Severity predictor over a loaded artifact bundle.
pub struct SeverityPredictor {
    artifacts: ArtifactBundle,
}

impl SeverityPredictor {
    /// Wraps a loaded artifact bundle.
    #[must_use]
    pub const fn new(artifacts: ArtifactBundle) -> Self {
        Self { artifacts }
    }

    /// Loads artifacts from a directory and builds a predictor.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if any artifact fails to load or the
    /// startup self-check fails.
    pub fn from_dir(dir: &Path) -> Result<Self, PredictionError> {
        Ok(Self::new(ArtifactBundle::load(dir)?))
    }

    /// Artifact version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.artifacts.version
    }

    /// Predicts severity for an incident.
    ///
    /// Coordinates are optional: when absent, the resolver's gazetteer or
    /// default coordinate completes the feature vector. The location label
    /// goes through the full fallback chain; the crime type does not —
    /// an unseen crime type is always an error, never defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] for empty labels, unknown crime types,
    /// or out-of-range coordinates. Callers at the persistence boundary
    /// downgrade these to warnings so record creation proceeds.
    pub fn predict_incident(
        &self,
        crime_type: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
        location_label: &str,
    ) -> Result<IncidentPrediction, PredictionError> {
        let crime_code = self.artifacts.crime_encoder.encode(crime_type)?;

        let resolver = LocationResolver::new(&self.artifacts.location_encoder);
        let location = resolver.resolve(location_label)?;
        if location.method.is_degraded() {
            log::warn!(
                "Degraded location resolution for {location_label:?}: {}",
                location.method
            );
        }

        let fallback = resolver::coordinate_or_default(&location);
        let latitude = latitude.unwrap_or(fallback.latitude);
        let longitude = longitude.unwrap_or(fallback.longitude);

        let vector = features::build(crime_code, latitude, longitude, location.code)?;
        let severity = self.predict_severity(&vector);

        Ok(IncidentPrediction {
            severity,
            location,
            features: vector,
        })
    }

    /// Predicts severity from a crime type and explicit coordinates,
    /// using the default location code. Serves standalone predictions
    /// where no location label accompanies the coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] for empty or unknown crime types and
    /// out-of-range coordinates.
    pub fn predict_point(
        &self,
        crime_type: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<(SeverityPrediction, FeatureVector), PredictionError> {
        let crime_code = self.artifacts.crime_encoder.encode(crime_type)?;
        let location = resolver::default_resolution();
        let vector = features::build(crime_code, latitude, longitude, location.code)?;
        Ok((self.predict_severity(&vector), vector))
    }

    /// Runs the classifier on an already-built feature vector.
    #[must_use]
    pub fn predict_severity(&self, vector: &FeatureVector) -> SeverityPrediction {
        let class = self.artifacts.classifier.predict(vector);
        let confidence = self
            .artifacts
            .classifier
            .predict_probability(vector)
            .and_then(|probs| probs.into_iter().reduce(f64::max));
        SeverityPrediction {
            severe: class == 1,
            confidence,
        }
    }
}

/// Derives a suspect risk tier from a criminal record summary.
///
/// This is a deterministic keyword heuristic, not a trained model, and its
/// behavior is a compatibility contract: the token "Repeat" (case
/// sensitive, substring) means high risk, else "Gang" means medium, else
/// low. Scores are the fixed per-tier lookup.
#[must_use]
pub fn predict_suspect_risk(criminal_record_summary: &str) -> SuspectRiskPrediction {
    let tier = if criminal_record_summary.contains("Repeat") {
        RiskTier::High
    } else if criminal_record_summary.contains("Gang") {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };
    SuspectRiskPrediction {
        tier,
        score: tier.score(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::parse_model;
    use crate::encoder::CategoryEncoder;
    use crime_intel_prediction_models::ResolutionMethod;

    const MODEL_JSON: &str = r#"{
        "version": "test-1",
        "feature_names": ["crime_type_encoded", "latitude", "longitude", "location_encoded"],
        "n_classes": 2,
        "trees": [
            {
                "nodes": [
                    { "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
                    { "value": [1.0, 9.0] },
                    { "value": [9.0, 1.0] }
                ]
            }
        ],
        "self_check": {
            "features": [0.0, -1.95, 30.05, 0.0],
            "expected_class": 1
        }
    }"#;

    fn predictor() -> SeverityPredictor {
        let (classifier, version) = parse_model(MODEL_JSON).unwrap();
        SeverityPredictor::new(ArtifactBundle {
            classifier,
            crime_encoder: CategoryEncoder::new(
                "crime_type",
                vec!["Assault".to_string(), "Theft".to_string()],
            ),
            location_encoder: CategoryEncoder::new(
                "location",
                vec!["Kacyiru".to_string(), "Remera".to_string()],
            ),
            version,
        })
    }

    #[test]
    fn severe_prediction_with_confidence() {
        let p = predictor();
        let result = p
            .predict_incident("Assault", Some(-1.95), Some(30.05), "Kacyiru")
            .unwrap();
        assert!(result.severity.severe);
        assert!((result.severity.confidence.unwrap() - 0.9).abs() < 1e-12);
        assert_eq!(result.location.method, ResolutionMethod::Exact);
        assert_eq!(result.features.to_array(), [0.0, -1.95, 30.05, 0.0]);
    }

    #[test]
    fn not_severe_prediction() {
        let p = predictor();
        let result = p
            .predict_incident("Theft", Some(-1.95), Some(30.05), "Remera")
            .unwrap();
        assert!(!result.severity.severe);
    }

    #[test]
    fn unknown_crime_type_is_never_defaulted() {
        let p = predictor();
        let err = p
            .predict_incident("Jaywalking", Some(-1.95), Some(30.05), "Kacyiru")
            .unwrap_err();
        assert!(matches!(
            err,
            PredictionError::UnknownLabel { encoder: "crime_type", .. }
        ));
    }

    #[test]
    fn invalid_coordinates_fail_before_classification() {
        let p = predictor();
        assert!(matches!(
            p.predict_incident("Assault", Some(95.0), Some(30.05), "Kacyiru")
                .unwrap_err(),
            PredictionError::InvalidCoordinate { .. }
        ));
        assert!(matches!(
            p.predict_incident("Assault", Some(-1.95), Some(-200.0), "Kacyiru")
                .unwrap_err(),
            PredictionError::InvalidCoordinate { .. }
        ));
    }

    #[test]
    fn missing_coordinates_fall_back_to_gazetteer() {
        let p = predictor();
        let result = p.predict_incident("Assault", None, None, "Kacyiru").unwrap();
        // Kacyiru's gazetteer coordinate fills the vector.
        assert!((result.features.latitude - -1.9403).abs() < 1e-9);
        assert!((result.features.longitude - 30.0782).abs() < 1e-9);
    }

    #[test]
    fn suspect_risk_heuristic_exact_values() {
        let high = predict_suspect_risk("5x Repeat offender");
        assert_eq!(high.tier, RiskTier::High);
        assert_eq!(high.score, 0.9);

        let medium = predict_suspect_risk("Gang affiliated");
        assert_eq!(medium.tier, RiskTier::Medium);
        assert_eq!(medium.score, 0.6);

        let low = predict_suspect_risk("no prior record");
        assert_eq!(low.tier, RiskTier::Low);
        assert_eq!(low.score, 0.2);
    }

    #[test]
    fn suspect_risk_repeat_outranks_gang_and_is_case_sensitive() {
        assert_eq!(
            predict_suspect_risk("Repeat offender with Gang ties").tier,
            RiskTier::High
        );
        // Lowercase tokens do not match; the contract is case-sensitive.
        assert_eq!(predict_suspect_risk("repeat gang").tier, RiskTier::Low);
    }
}
