//! Request validation.
//!
//! Validation failures are client errors (HTTP 400) and are distinct from
//! prediction failures, which never block record creation.

use crime_intel_server_models::{NewIncidentRequest, NewSuspectRequest, PredictRequest};

/// Minimum length of a criminal record summary.
pub const MIN_RECORD_SUMMARY_LEN: usize = 10;

/// Validates an incident creation request.
///
/// # Errors
///
/// Returns a human-readable message describing the first failed check.
pub fn validate_new_incident(req: &NewIncidentRequest) -> Result<(), String> {
    if req.crime_type.trim().is_empty() {
        return Err("crimeType must not be empty".to_string());
    }
    if req.location.trim().is_empty() {
        return Err("location must not be empty".to_string());
    }
    if req.region_code.trim().is_empty() {
        return Err("regionCode must not be empty".to_string());
    }
    validate_coordinates(req.latitude, req.longitude)
}

/// Validates a suspect creation request.
///
/// # Errors
///
/// Returns a human-readable message describing the first failed check.
pub fn validate_new_suspect(req: &NewSuspectRequest) -> Result<(), String> {
    if req.first_name.trim().is_empty() {
        return Err("firstName must not be empty".to_string());
    }
    if req.last_name.trim().is_empty() {
        return Err("lastName must not be empty".to_string());
    }
    if req.national_id.is_empty() || !req.national_id.chars().all(|c| c.is_ascii_digit()) {
        return Err("nationalId must contain only digits".to_string());
    }
    if req.criminal_record_summary.trim().len() < MIN_RECORD_SUMMARY_LEN {
        return Err(format!(
            "criminalRecordSummary must be at least {MIN_RECORD_SUMMARY_LEN} characters"
        ));
    }
    Ok(())
}

/// Validates a standalone prediction request.
///
/// # Errors
///
/// Returns a human-readable message describing the first failed check.
pub fn validate_predict(req: &PredictRequest) -> Result<(), String> {
    if req.crime_type.trim().is_empty() {
        return Err("crimeType must not be empty".to_string());
    }
    let has_location = req
        .location
        .as_deref()
        .is_some_and(|l| !l.trim().is_empty());
    if !has_location && (req.latitude.is_none() || req.longitude.is_none()) {
        return Err("either both coordinates or a location label are required".to_string());
    }
    validate_coordinates(req.latitude, req.longitude)
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), String> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {lat} out of range [-90, 90]"));
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("longitude {lon} out of range [-180, 180]"));
        }
    }
    Ok(())
}
