//! Region risk aggregation.
//!
//! The aggregate is rebuilt from the full incident set for a region on
//! every recompute. Computing it in one pure pass over fetched rows keeps
//! the math testable and makes idempotency trivial: the same incidents in,
//! the same summary out, byte for byte.

use std::collections::BTreeMap;

use crime_intel_database_models::IncidentRow;

/// The computed summary fields for one region, before the timestamped
/// upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    /// Total incidents in the region.
    pub total_cases: i64,
    /// Incidents predicted severe.
    pub severe_cases: i64,
    /// Percentage of severe incidents, in `[0, 100]`.
    pub risk_score: f64,
    /// Most frequent crime type; alphabetical order breaks count ties.
    pub most_common_crime: String,
}

/// Aggregates all incidents of a region into a summary.
///
/// Returns `None` for an empty region (no summary row is written).
/// Incidents with no stored prediction count toward the total but not
/// toward the severe count.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn summarize_region(incidents: &[IncidentRow]) -> Option<RegionSummary> {
    if incidents.is_empty() {
        return None;
    }

    let total_cases = incidents.len() as i64;
    let severe_cases = incidents
        .iter()
        .filter(|i| i.is_severe == Some(true))
        .count() as i64;

    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.crime_type.as_str()).or_insert(0) += 1;
    }
    // BTreeMap iterates alphabetically, so with strict `>` the first
    // (alphabetically smallest) crime type wins count ties.
    let mut most_common_crime = "";
    let mut best_count = 0;
    for (crime_type, count) in &counts {
        if *count > best_count {
            best_count = *count;
            most_common_crime = crime_type;
        }
    }

    let risk_score = (severe_cases as f64 / total_cases as f64) * 100.0;

    Some(RegionSummary {
        total_cases,
        severe_cases,
        risk_score,
        most_common_crime: most_common_crime.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(crime_type: &str, is_severe: Option<bool>) -> IncidentRow {
        IncidentRow {
            id: 0,
            incident_id: String::new(),
            crime_type: crime_type.to_string(),
            location: "Kacyiru".to_string(),
            latitude: -1.95,
            longitude: 30.05,
            region_code: "KGL-01".to_string(),
            description: None,
            is_severe,
            severity_score: None,
            prediction_confidence: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn empty_region_has_no_summary() {
        assert_eq!(summarize_region(&[]), None);
    }

    #[test]
    fn counts_and_percentage() {
        let incidents = vec![
            incident("Theft", Some(false)),
            incident("Assault", Some(true)),
            incident("Theft", Some(true)),
            incident("Theft", None),
        ];
        let summary = summarize_region(&incidents).unwrap();
        assert_eq!(summary.total_cases, 4);
        assert_eq!(summary.severe_cases, 2);
        assert!((summary.risk_score - 50.0).abs() < 1e-12);
        assert_eq!(summary.most_common_crime, "Theft");
    }

    #[test]
    fn recompute_is_idempotent() {
        let incidents = vec![
            incident("Burglary", Some(true)),
            incident("Theft", Some(false)),
            incident("Burglary", Some(false)),
        ];
        let first = summarize_region(&incidents).unwrap();
        let second = summarize_region(&incidents).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn most_common_crime_tie_is_deterministic() {
        let incidents = vec![
            incident("Theft", Some(false)),
            incident("Assault", Some(false)),
        ];
        let summary = summarize_region(&incidents).unwrap();
        assert_eq!(summary.most_common_crime, "Assault");
    }

    #[test]
    fn unpredicted_incidents_are_not_severe() {
        let incidents = vec![incident("Theft", None), incident("Theft", None)];
        let summary = summarize_region(&incidents).unwrap();
        assert_eq!(summary.severe_cases, 0);
        assert!((summary.risk_score - 0.0).abs() < 1e-12);
    }
}
