#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Data types for the severity/risk prediction core.
//!
//! These are plain value types shared between the prediction engine, the
//! persistence layer, and the API server. All logic (encoding, fallback
//! resolution, classification) lives in `crime_intel_prediction`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column order expected by the trained severity classifier.
///
/// This ordering is a fixed contract with the model artifact. Reordering it
/// silently invalidates every prediction, so the artifact loader rejects
/// any artifact whose declared `feature_names` differ from this list.
pub const FEATURE_NAMES: [&str; 4] = [
    "crime_type_encoded",
    "latitude",
    "longitude",
    "location_encoded",
];

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Squared Euclidean distance to another coordinate, in degrees.
    ///
    /// No geodesic correction; only used for ordering nearby gazetteer
    /// entries, where raw degree distance preserves the ordering.
    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        dlat.mul_add(dlat, dlon * dlon)
    }
}

/// The ordered numeric input consumed by the severity classifier.
///
/// Construct via `FeatureVector::build` in `crime_intel_prediction`, which
/// validates coordinate ranges. Field order mirrors [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Encoded crime type code.
    pub crime_code: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Encoded location code.
    pub location_code: i64,
}

impl FeatureVector {
    /// Returns the features as an array in classifier column order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn to_array(self) -> [f64; 4] {
        [
            self.crime_code as f64,
            self.latitude,
            self.longitude,
            self.location_code as f64,
        ]
    }
}

/// Suspect risk tier derived from criminal record heuristics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTier {
    /// No known aggravating markers.
    Low,
    /// Gang affiliation marker present.
    Medium,
    /// Repeat offender marker present.
    High,
}

impl RiskTier {
    /// Fixed risk score for this tier.
    ///
    /// The values are part of the compatibility contract with the source
    /// system and must not change.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Low => 0.2,
            Self::Medium => 0.6,
            Self::High => 0.9,
        }
    }

    /// Color code for risk level visualization.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#28a745",
            Self::Medium => "#ffc107",
            Self::High => "#dc3545",
        }
    }

    /// Color used for suspects with no stored risk tier.
    #[must_use]
    pub const fn unassessed_color() -> &'static str {
        "#6c757d"
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Output of the binary severity classifier for an incident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityPrediction {
    /// Whether the incident is predicted severe.
    pub severe: bool,
    /// Maximum class probability, when the backend exposes probabilities.
    pub confidence: Option<f64>,
}

impl SeverityPrediction {
    /// Human-readable severity label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        if self.severe { "Severe" } else { "Not Severe" }
    }

    /// Coarse severity score stored on the incident row.
    ///
    /// Matches the source system's simplified scoring (0.8 severe,
    /// 0.3 otherwise).
    #[must_use]
    pub const fn severity_score(self) -> f64 {
        if self.severe { 0.8 } else { 0.3 }
    }
}

/// Output of the suspect risk heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspectRiskPrediction {
    /// Coarse risk tier.
    pub tier: RiskTier,
    /// Fixed score for the tier, in `[0, 1]`.
    pub score: f64,
}

/// Which step of the fallback chain resolved a location label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionMethod {
    /// Label is a known encoder class.
    Exact,
    /// Case-insensitive substring match against a known class.
    Substring,
    /// Nearest known class by gazetteer coordinate distance.
    NearestCoordinate,
    /// Nothing matched; fixed default code and coordinate.
    Default,
}

impl ResolutionMethod {
    /// Whether this resolution degrades prediction accuracy.
    ///
    /// Anything other than an exact encoder hit means the classifier sees
    /// a substituted location code.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

/// A resolved location label, ready for feature encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    /// Encoder code for the resolved class.
    pub code: i64,
    /// Which fallback step produced the code.
    pub method: ResolutionMethod,
    /// Coordinate associated with the resolution, when one is known
    /// (gazetteer hit or the fixed default). Callers without their own
    /// coordinates use this to complete the feature vector.
    pub coordinate: Option<Coordinate>,
}
