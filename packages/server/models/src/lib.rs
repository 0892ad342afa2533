#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime intel server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use crime_intel_database_models::{
    CrimePredictionRow, IncidentRow, RegionRiskSummaryRow, SuspectRow,
};
use crime_intel_prediction_models::RiskTier;
use serde::{Deserialize, Serialize};

/// A crime incident as returned by the API.
///
/// Prediction fields are `null` when the severity prediction failed or
/// has not run; `prediction_warning` carries the reason in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncident {
    /// Unique incident ID.
    pub id: i64,
    /// External incident identifier.
    pub incident_id: String,
    /// Reported crime type label.
    pub crime_type: String,
    /// Free-text location label.
    pub location: String,
    /// Latitude used for the prediction.
    pub latitude: f64,
    /// Longitude used for the prediction.
    pub longitude: f64,
    /// Region code.
    pub region_code: String,
    /// Short description.
    pub description: Option<String>,
    /// Whether the incident was predicted severe.
    pub is_severe: Option<bool>,
    /// Coarse severity score in `[0, 1]`.
    pub severity_score: Option<f64>,
    /// Classifier confidence in `[0, 1]`.
    pub prediction_confidence: Option<f64>,
    /// Human-readable severity label, when predicted.
    pub severity_label: Option<String>,
    /// Reason the prediction is missing, when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_warning: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<IncidentRow> for ApiIncident {
    fn from(row: IncidentRow) -> Self {
        let severity_label = row.is_severe.map(|severe| {
            if severe {
                "Severe".to_string()
            } else {
                "Not Severe".to_string()
            }
        });
        Self {
            id: row.id,
            incident_id: row.incident_id,
            crime_type: row.crime_type,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            region_code: row.region_code,
            description: row.description,
            is_severe: row.is_severe,
            severity_score: row.severity_score,
            prediction_confidence: row.prediction_confidence,
            severity_label,
            prediction_warning: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ApiIncident {
    /// Attaches a prediction failure warning to the response.
    #[must_use]
    pub fn with_warning(mut self, warning: String) -> Self {
        self.prediction_warning = Some(warning);
        self
    }
}

/// Request body for creating an incident. Coordinates are optional; the
/// location fallback chain supplies them when missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncidentRequest {
    /// External incident identifier; generated when omitted.
    pub incident_id: Option<String>,
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
    /// Short description.
    pub description: Option<String>,
}

/// Query parameters for the incidents endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQueryParams {
    /// Filter by predicted severity.
    pub is_severe: Option<bool>,
    /// Filter by exact crime type.
    pub crime_type: Option<String>,
    /// Filter by region code.
    pub region_code: Option<String>,
}

/// A suspect as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSuspect {
    /// Unique suspect ID.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Full display name.
    pub full_name: String,
    /// Known alias, if any.
    pub alias: Option<String>,
    /// National identifier.
    pub national_id: String,
    /// Free-text criminal record summary.
    pub criminal_record_summary: String,
    /// Predicted risk tier.
    pub predicted_risk_level: Option<RiskTier>,
    /// Risk score in `[0, 1]`.
    pub risk_score: Option<f64>,
    /// Prediction confidence in `[0, 1]`.
    pub prediction_confidence: Option<f64>,
    /// Color code for risk visualization.
    pub risk_color: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<SuspectRow> for ApiSuspect {
    fn from(row: SuspectRow) -> Self {
        let full_name = row.full_name();
        let risk_color = row.risk_color().to_string();
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name,
            alias: row.alias,
            national_id: row.national_id,
            criminal_record_summary: row.criminal_record_summary,
            predicted_risk_level: row.predicted_risk_level,
            risk_score: row.risk_score,
            prediction_confidence: row.prediction_confidence,
            risk_color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating a suspect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuspectRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Known alias, if any.
    pub alias: Option<String>,
    /// National identifier (digits only).
    pub national_id: String,
    /// Free-text criminal record summary (at least 10 characters).
    pub criminal_record_summary: String,
}

/// Query parameters for the suspects endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspectQueryParams {
    /// Filter by predicted risk tier.
    pub risk_level: Option<RiskTier>,
    /// Case-insensitive substring search over names, alias, and national
    /// id.
    pub search: Option<String>,
}

/// Request body for a standalone severity prediction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Crime type label.
    pub crime_type: String,
    /// Latitude, if known.
    pub latitude: Option<f64>,
    /// Longitude, if known.
    pub longitude: Option<f64>,
    /// Free-text location label, used when coordinates are missing.
    pub location: Option<String>,
}

/// A stored prediction as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPrediction {
    /// Unique prediction ID.
    pub id: i64,
    /// Input crime type label.
    pub crime_type: String,
    /// Input latitude.
    pub latitude: f64,
    /// Input longitude.
    pub longitude: f64,
    /// Encoded crime type code used for the prediction.
    pub encoded_crime_type: i64,
    /// Human-readable severity label.
    pub predicted_severity: String,
    /// Raw classifier output (0 or 1).
    pub prediction_value: i64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<CrimePredictionRow> for ApiPrediction {
    fn from(row: CrimePredictionRow) -> Self {
        Self {
            id: row.id,
            crime_type: row.crime_type,
            latitude: row.latitude,
            longitude: row.longitude,
            encoded_crime_type: row.encoded_crime_type,
            predicted_severity: row.predicted_severity,
            prediction_value: row.prediction_value,
            created_at: row.created_at,
        }
    }
}

/// Query parameters for the stored predictions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionQueryParams {
    /// Case-insensitive substring match on crime type.
    pub crime_type: Option<String>,
    /// Exact severity label match ("Severe" / "Not Severe").
    pub severity: Option<String>,
    /// Only predictions created at or after this timestamp (RFC 3339).
    pub start_date: Option<String>,
    /// Only predictions created at or before this timestamp (RFC 3339).
    pub end_date: Option<String>,
}

/// Aggregate statistics over all stored predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPredictionStatistics {
    /// Total stored predictions.
    pub total_predictions: i64,
    /// Predictions labeled "Severe".
    pub severe_predictions: i64,
    /// Predictions labeled "Not Severe".
    pub not_severe_predictions: i64,
    /// Share of predictions labeled "Severe", as a percentage rounded to
    /// two decimals; 0 when there are no predictions.
    pub severe_percentage: f64,
    /// Share of predictions labeled "Not Severe", same rounding.
    pub not_severe_percentage: f64,
    /// Most frequent crime types with counts, descending.
    pub top_crime_types: Vec<ApiCrimeTypeCount>,
}

/// One crime type with its prediction count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrimeTypeCount {
    /// Crime type label.
    pub crime_type: String,
    /// Number of stored predictions for it.
    pub count: i64,
}

/// Response for the stored predictions list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPredictionList {
    /// Matching predictions, newest first.
    pub predictions: Vec<ApiPrediction>,
    /// Summary statistics over all stored predictions.
    pub statistics: ApiPredictionStatistics,
}

/// Suspect risk statistics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRiskStatistics {
    /// Total number of suspects.
    pub total_suspects: i64,
    /// Count of suspects per risk tier.
    pub by_tier: Vec<ApiRiskTierCount>,
    /// Mean risk score over assessed suspects; 0 when none.
    pub average_risk_score: f64,
}

/// One risk tier with its suspect count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRiskTierCount {
    /// Risk tier.
    pub risk_level: RiskTier,
    /// Number of suspects in the tier.
    pub count: i64,
    /// Color code for the tier.
    pub color: String,
}

/// A region risk summary as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegionSummary {
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

impl From<RegionRiskSummaryRow> for ApiRegionSummary {
    fn from(row: RegionRiskSummaryRow) -> Self {
        Self {
            region_code: row.region_code,
            total_cases: row.total_cases,
            severe_cases: row.severe_cases,
            risk_score: row.risk_score,
            most_common_crime: row.most_common_crime,
            last_updated: row.last_updated,
        }
    }
}

/// Query parameters for the regions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionQueryParams {
    /// Only return regions with at least this risk score.
    pub threshold: Option<f64>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always "ok" when the server is responding.
    pub status: String,
    /// Whether the severity model artifacts loaded successfully.
    pub predictor_ready: bool,
    /// Loaded model artifact version, when the predictor is ready.
    pub model_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident_row(is_severe: Option<bool>) -> IncidentRow {
        IncidentRow {
            id: 7,
            incident_id: "INC-2025-0007".to_string(),
            crime_type: "Robbery".to_string(),
            location: "Kacyiru".to_string(),
            latitude: -1.9403,
            longitude: 30.0782,
            region_code: "KGL-01".to_string(),
            description: None,
            is_severe,
            severity_score: is_severe.map(|s| if s { 0.8 } else { 0.3 }),
            prediction_confidence: Some(0.9),
            created_at: "2025-06-01T00:00:00+00:00".to_string(),
            updated_at: "2025-06-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn severity_label_tracks_prediction() {
        let severe = ApiIncident::from(incident_row(Some(true)));
        assert_eq!(severe.severity_label.as_deref(), Some("Severe"));

        let mild = ApiIncident::from(incident_row(Some(false)));
        assert_eq!(mild.severity_label.as_deref(), Some("Not Severe"));

        let unpredicted = ApiIncident::from(incident_row(None));
        assert_eq!(unpredicted.severity_label, None);
    }

    #[test]
    fn warning_is_omitted_when_absent() {
        let incident = ApiIncident::from(incident_row(Some(true)));
        let json = serde_json::to_value(&incident).unwrap();
        assert!(json.get("predictionWarning").is_none());

        let warned = ApiIncident::from(incident_row(None))
            .with_warning("Unknown crime type label: Jaywalking".to_string());
        let json = serde_json::to_value(&warned).unwrap();
        assert_eq!(
            json["predictionWarning"],
            "Unknown crime type label: Jaywalking"
        );
    }

    #[test]
    fn suspect_response_includes_display_fields() {
        let row = SuspectRow {
            id: 3,
            first_name: "Eric".to_string(),
            last_name: "Niyonzima".to_string(),
            alias: Some("CN".to_string()),
            national_id: "1198812345678902".to_string(),
            criminal_record_summary: "Repeat offender, three burglaries".to_string(),
            predicted_risk_level: Some(RiskTier::High),
            risk_score: Some(0.9),
            prediction_confidence: Some(0.85),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let api = ApiSuspect::from(row);
        assert_eq!(api.full_name, "Eric Niyonzima");
        assert_eq!(api.risk_color, "#dc3545");
    }
}
