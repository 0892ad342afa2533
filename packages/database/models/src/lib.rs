#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types and query parameter definitions.
//!
//! These types represent the shapes of data as stored in and retrieved
//! from the `SQLite` database. They are distinct from the API response
//! types in `crime_intel_server_models` so the API contract can evolve
//! independently of the schema.

use crime_intel_prediction_models::RiskTier;
use serde::{Deserialize, Serialize};

/// A crime incident row.
///
/// Prediction fields are nullable: a failed prediction leaves them unset
/// and never blocks the insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    /// Primary key.
    pub id: i64,
    /// External incident identifier.
    pub incident_id: String,
    /// Reported crime type label.
    pub crime_type: String,
    /// Free-text location label.
    pub location: String,
    /// Latitude used for the prediction (reported or resolved).
    pub latitude: f64,
    /// Longitude used for the prediction (reported or resolved).
    pub longitude: f64,
    /// Region code grouping incidents for risk summaries.
    pub region_code: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Predicted severity, when a prediction succeeded.
    pub is_severe: Option<bool>,
    /// Coarse severity score in `[0, 1]`.
    pub severity_score: Option<f64>,
    /// Classifier confidence in `[0, 1]`.
    pub prediction_confidence: Option<f64>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

/// Fields for creating a new incident. Coordinates are optional; the
/// fallback resolver supplies them when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
    /// External incident identifier.
    pub incident_id: String,
    /// Reported crime type label.
    pub crime_type: String,
    /// Free-text location label.
    pub location: String,
    /// Reported latitude, if any.
    pub latitude: Option<f64>,
    /// Reported longitude, if any.
    pub longitude: Option<f64>,
    /// Region code.
    pub region_code: String,
    /// Free-text description.
    pub description: Option<String>,
}

/// Filters for listing incidents.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    /// Filter by predicted severity.
    pub is_severe: Option<bool>,
    /// Filter by exact crime type.
    pub crime_type: Option<String>,
    /// Filter by region code.
    pub region_code: Option<String>,
}

/// A suspect row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspectRow {
    /// Primary key.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Known alias, if any.
    pub alias: Option<String>,
    /// National identifier (digits only).
    pub national_id: String,
    /// Free-text criminal record summary; drives the risk heuristic.
    pub criminal_record_summary: String,
    /// Predicted risk tier, when a prediction succeeded.
    pub predicted_risk_level: Option<RiskTier>,
    /// Risk score in `[0, 1]`.
    pub risk_score: Option<f64>,
    /// Prediction confidence in `[0, 1]`.
    pub prediction_confidence: Option<f64>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl SuspectRow {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Color code for risk level visualization; gray when unassessed.
    #[must_use]
    pub fn risk_color(&self) -> &'static str {
        self.predicted_risk_level
            .map_or(RiskTier::unassessed_color(), RiskTier::color)
    }
}

/// Fields for creating a new suspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSuspect {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Known alias, if any.
    pub alias: Option<String>,
    /// National identifier (digits only).
    pub national_id: String,
    /// Free-text criminal record summary.
    pub criminal_record_summary: String,
}

/// Filters for listing suspects.
#[derive(Debug, Clone, Default)]
pub struct SuspectFilter {
    /// Filter by predicted risk tier.
    pub risk_level: Option<RiskTier>,
    /// Case-insensitive substring search over names, alias, and national
    /// id.
    pub search: Option<String>,
}

/// A stored standalone severity prediction (the `/api/predict` endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimePredictionRow {
    /// Primary key.
    pub id: i64,
    /// Input crime type label.
    pub crime_type: String,
    /// Input latitude.
    pub latitude: f64,
    /// Input longitude.
    pub longitude: f64,
    /// Encoded crime type code used for the prediction.
    pub encoded_crime_type: i64,
    /// Human-readable severity label ("Severe" / "Not Severe").
    pub predicted_severity: String,
    /// Raw classifier output (0 or 1).
    pub prediction_value: i64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Filters for listing stored predictions.
#[derive(Debug, Clone, Default)]
pub struct PredictionFilter {
    /// Case-insensitive substring match on crime type.
    pub crime_type: Option<String>,
    /// Exact severity label match.
    pub severity: Option<String>,
    /// Only predictions created at or after this timestamp (RFC 3339).
    pub start_date: Option<String>,
    /// Only predictions created at or before this timestamp (RFC 3339).
    pub end_date: Option<String>,
}

/// A region risk summary row, recomputed from scratch whenever a new
/// incident lands in the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRiskSummaryRow {
    /// Region code.
    pub region_code: String,
    /// Total incidents in the region.
    pub total_cases: i64,
    /// Incidents predicted severe.
    pub severe_cases: i64,
    /// Percentage of severe incidents, in `[0, 100]`.
    pub risk_score: f64,
    /// Most frequent crime type in the region.
    pub most_common_crime: String,
    /// When the summary was last recomputed (RFC 3339).
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_color_for_unassessed_suspect() {
        let suspect = SuspectRow {
            id: 1,
            first_name: "Jean".to_string(),
            last_name: "Uwimana".to_string(),
            alias: None,
            national_id: "1199012345678901".to_string(),
            criminal_record_summary: "no prior record".to_string(),
            predicted_risk_level: None,
            risk_score: None,
            prediction_confidence: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(suspect.risk_color(), "#6c757d");
        assert_eq!(suspect.full_name(), "Jean Uwimana");

        let assessed = SuspectRow {
            predicted_risk_level: Some(RiskTier::High),
            ..suspect
        };
        assert_eq!(assessed.risk_color(), "#dc3545");
    }
}
