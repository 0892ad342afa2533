//! Database query functions for incidents, suspects, stored predictions,
//! and region risk summaries.
//!
//! All queries use `query_raw_params()` / `exec_raw_params()` with `$n`
//! placeholders. Prediction writes are separate from record inserts: a
//! record is always created first, and prediction fields are attached
//! afterwards so a failed prediction can never block creation.

use std::fmt::Write as _;

use crime_intel_database_models::{
    CrimePredictionRow, IncidentFilter, IncidentRow, NewIncident, NewSuspect, PredictionFilter,
    RegionRiskSummaryRow, SuspectFilter, SuspectRow,
};
use crime_intel_prediction_models::RiskTier;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;
use crate::summary::{self, RegionSummary};

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

/// Inserts a new incident with no prediction fields set.
///
/// The caller passes the coordinates actually used (reported or resolved
/// by the fallback chain), so the stored row reflects what the classifier
/// would see.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_incident(
    db: &dyn Database,
    incident: &NewIncident,
    latitude: f64,
    longitude: f64,
) -> Result<i64, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO incidents (
                incident_id, crime_type, location, latitude, longitude,
                region_code, description, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id",
            &[
                DatabaseValue::String(incident.incident_id.clone()),
                DatabaseValue::String(incident.crime_type.clone()),
                DatabaseValue::String(incident.location.clone()),
                DatabaseValue::Real64(latitude),
                DatabaseValue::Real64(longitude),
                DatabaseValue::String(incident.region_code.clone()),
                incident
                    .description
                    .as_ref()
                    .map_or(DatabaseValue::Null, |d| DatabaseValue::String(d.clone())),
                DatabaseValue::String(now.clone()),
                DatabaseValue::String(now),
            ],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    let row = rows
        .first()
        .ok_or_else(|| DbError::Database("insert returned no id".to_string()))?;
    row.to_value("id")
        .map_err(|e| DbError::Database(format!("Failed to parse incident id: {e}")))
}

/// Attaches prediction results to an incident.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn set_incident_prediction(
    db: &dyn Database,
    id: i64,
    is_severe: bool,
    severity_score: f64,
    confidence: Option<f64>,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE incidents SET
            is_severe = $1,
            severity_score = $2,
            prediction_confidence = $3,
            updated_at = $4
         WHERE id = $5",
        &[
            DatabaseValue::Bool(is_severe),
            DatabaseValue::Real64(severity_score),
            confidence.map_or(DatabaseValue::Null, DatabaseValue::Real64),
            DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
            DatabaseValue::Int64(id),
        ],
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(())
}

/// Fetches a single incident by primary key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no incident has the given id.
pub async fn get_incident(db: &dyn Database, id: i64) -> Result<IncidentRow, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM incidents WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    rows.first()
        .map(parse_incident)
        .ok_or_else(|| DbError::NotFound(format!("incident {id}")))
}

/// Lists incidents matching the filter, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn list_incidents(
    db: &dyn Database,
    filter: &IncidentFilter,
) -> Result<Vec<IncidentRow>, DbError> {
    let mut sql = String::from("SELECT * FROM incidents WHERE 1=1");
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(is_severe) = filter.is_severe {
        write!(sql, " AND is_severe = ${param_idx}").unwrap();
        params.push(DatabaseValue::Bool(is_severe));
        param_idx += 1;
    }

    if let Some(crime_type) = &filter.crime_type {
        write!(sql, " AND crime_type = ${param_idx}").unwrap();
        params.push(DatabaseValue::String(crime_type.clone()));
        param_idx += 1;
    }

    if let Some(region_code) = &filter.region_code {
        write!(sql, " AND region_code = ${param_idx}").unwrap();
        params.push(DatabaseValue::String(region_code.clone()));
    }

    sql.push_str(" ORDER BY created_at DESC");

    let rows = db
        .query_raw_params(&sql, &params)
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.iter().map(parse_incident).collect())
}

/// All incidents in a region, for summary recomputation.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn incidents_in_region(
    db: &dyn Database,
    region_code: &str,
) -> Result<Vec<IncidentRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM incidents WHERE region_code = $1",
            &[DatabaseValue::String(region_code.to_string())],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.iter().map(parse_incident).collect())
}

fn parse_incident(row: &switchy_database::Row) -> IncidentRow {
    IncidentRow {
        id: row.to_value("id").unwrap_or(0),
        incident_id: row.to_value("incident_id").unwrap_or_default(),
        crime_type: row.to_value("crime_type").unwrap_or_default(),
        location: row.to_value("location").unwrap_or_default(),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        region_code: row.to_value("region_code").unwrap_or_default(),
        description: row.to_value("description").unwrap_or(None),
        is_severe: row.to_value("is_severe").unwrap_or(None),
        severity_score: row.to_value("severity_score").unwrap_or(None),
        prediction_confidence: row.to_value("prediction_confidence").unwrap_or(None),
        created_at: row.to_value("created_at").unwrap_or_default(),
        updated_at: row.to_value("updated_at").unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Suspects
// ---------------------------------------------------------------------------

/// Inserts a new suspect with no risk prediction set.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_suspect(db: &dyn Database, suspect: &NewSuspect) -> Result<i64, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO suspects (
                first_name, last_name, alias, national_id,
                criminal_record_summary, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id",
            &[
                DatabaseValue::String(suspect.first_name.clone()),
                DatabaseValue::String(suspect.last_name.clone()),
                suspect
                    .alias
                    .as_ref()
                    .map_or(DatabaseValue::Null, |a| DatabaseValue::String(a.clone())),
                DatabaseValue::String(suspect.national_id.clone()),
                DatabaseValue::String(suspect.criminal_record_summary.clone()),
                DatabaseValue::String(now.clone()),
                DatabaseValue::String(now),
            ],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    let row = rows
        .first()
        .ok_or_else(|| DbError::Database("insert returned no id".to_string()))?;
    row.to_value("id")
        .map_err(|e| DbError::Database(format!("Failed to parse suspect id: {e}")))
}

/// Attaches a risk prediction to a suspect.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn set_suspect_risk(
    db: &dyn Database,
    id: i64,
    tier: RiskTier,
    score: f64,
    confidence: f64,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE suspects SET
            predicted_risk_level = $1,
            risk_score = $2,
            prediction_confidence = $3,
            updated_at = $4
         WHERE id = $5",
        &[
            DatabaseValue::String(tier.to_string()),
            DatabaseValue::Real64(score),
            DatabaseValue::Real64(confidence),
            DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
            DatabaseValue::Int64(id),
        ],
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(())
}

/// Fetches a single suspect by primary key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no suspect has the given id.
pub async fn get_suspect(db: &dyn Database, id: i64) -> Result<SuspectRow, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM suspects WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    rows.first()
        .map(parse_suspect)
        .ok_or_else(|| DbError::NotFound(format!("suspect {id}")))
}

/// Lists suspects matching the filter, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn list_suspects(
    db: &dyn Database,
    filter: &SuspectFilter,
) -> Result<Vec<SuspectRow>, DbError> {
    let mut sql = String::from("SELECT * FROM suspects WHERE 1=1");
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(risk_level) = filter.risk_level {
        write!(sql, " AND predicted_risk_level = ${param_idx}").unwrap();
        params.push(DatabaseValue::String(risk_level.to_string()));
        param_idx += 1;
    }

    if let Some(search) = &filter.search {
        write!(
            sql,
            " AND (lower(first_name) LIKE '%' || lower(${}) || '%'
               OR lower(last_name) LIKE '%' || lower(${}) || '%'
               OR lower(COALESCE(alias, '')) LIKE '%' || lower(${}) || '%'
               OR national_id LIKE '%' || ${} || '%')",
            param_idx,
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
        )
        .unwrap();
        for _ in 0..4 {
            params.push(DatabaseValue::String(search.clone()));
        }
    }

    sql.push_str(" ORDER BY created_at DESC");

    let rows = db
        .query_raw_params(&sql, &params)
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.iter().map(parse_suspect).collect())
}

/// Per-tier suspect counts plus the average risk score.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskStatistics {
    /// Total number of suspects.
    pub total_suspects: i64,
    /// Count per risk tier, in tier order (low, medium, high).
    pub by_tier: Vec<(RiskTier, i64)>,
    /// Mean risk score over assessed suspects; 0 when none.
    pub average_risk_score: f64,
}

/// Computes suspect risk statistics.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn suspect_risk_statistics(db: &dyn Database) -> Result<RiskStatistics, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as total, AVG(risk_score) as avg_risk FROM suspects",
            &[],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    let (total_suspects, average_risk_score) = rows.first().map_or((0, 0.0), |row| {
        let total: i64 = row.to_value("total").unwrap_or(0);
        let avg: Option<f64> = row.to_value("avg_risk").unwrap_or(None);
        (total, avg.unwrap_or(0.0))
    });

    let mut by_tier = Vec::with_capacity(RiskTier::all().len());
    for tier in RiskTier::all() {
        let rows = db
            .query_raw_params(
                "SELECT COUNT(*) as cnt FROM suspects WHERE predicted_risk_level = $1",
                &[DatabaseValue::String(tier.to_string())],
            )
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;
        let count: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));
        by_tier.push((*tier, count));
    }

    Ok(RiskStatistics {
        total_suspects,
        by_tier,
        average_risk_score,
    })
}

fn parse_suspect(row: &switchy_database::Row) -> SuspectRow {
    let risk_level: Option<String> = row.to_value("predicted_risk_level").unwrap_or(None);
    SuspectRow {
        id: row.to_value("id").unwrap_or(0),
        first_name: row.to_value("first_name").unwrap_or_default(),
        last_name: row.to_value("last_name").unwrap_or_default(),
        alias: row.to_value("alias").unwrap_or(None),
        national_id: row.to_value("national_id").unwrap_or_default(),
        criminal_record_summary: row.to_value("criminal_record_summary").unwrap_or_default(),
        predicted_risk_level: risk_level.and_then(|s| s.parse().ok()),
        risk_score: row.to_value("risk_score").unwrap_or(None),
        prediction_confidence: row.to_value("prediction_confidence").unwrap_or(None),
        created_at: row.to_value("created_at").unwrap_or_default(),
        updated_at: row.to_value("updated_at").unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Stored predictions
// ---------------------------------------------------------------------------

/// Stores a standalone prediction and returns the saved row.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_prediction(
    db: &dyn Database,
    crime_type: &str,
    latitude: f64,
    longitude: f64,
    encoded_crime_type: i64,
    predicted_severity: &str,
    prediction_value: i64,
) -> Result<CrimePredictionRow, DbError> {
    let now = chrono::Utc::now().to_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO crime_predictions (
                crime_type, latitude, longitude, encoded_crime_type,
                predicted_severity, prediction_value, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *",
            &[
                DatabaseValue::String(crime_type.to_string()),
                DatabaseValue::Real64(latitude),
                DatabaseValue::Real64(longitude),
                DatabaseValue::Int64(encoded_crime_type),
                DatabaseValue::String(predicted_severity.to_string()),
                DatabaseValue::Int64(prediction_value),
                DatabaseValue::String(now),
            ],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    rows.first()
        .map(parse_prediction)
        .ok_or_else(|| DbError::Database("insert returned no row".to_string()))
}

/// Lists stored predictions matching the filter, newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn list_predictions(
    db: &dyn Database,
    filter: &PredictionFilter,
) -> Result<Vec<CrimePredictionRow>, DbError> {
    let mut sql = String::from("SELECT * FROM crime_predictions WHERE 1=1");
    let mut params: Vec<DatabaseValue> = Vec::new();
    let mut param_idx = 1u32;

    if let Some(crime_type) = &filter.crime_type {
        write!(
            sql,
            " AND lower(crime_type) LIKE '%' || lower(${param_idx}) || '%'"
        )
        .unwrap();
        params.push(DatabaseValue::String(crime_type.clone()));
        param_idx += 1;
    }

    if let Some(severity) = &filter.severity {
        write!(sql, " AND predicted_severity = ${param_idx}").unwrap();
        params.push(DatabaseValue::String(severity.clone()));
        param_idx += 1;
    }

    if let Some(start_date) = &filter.start_date {
        write!(sql, " AND created_at >= ${param_idx}").unwrap();
        params.push(DatabaseValue::String(start_date.clone()));
        param_idx += 1;
    }

    if let Some(end_date) = &filter.end_date {
        write!(sql, " AND created_at <= ${param_idx}").unwrap();
        params.push(DatabaseValue::String(end_date.clone()));
    }

    sql.push_str(" ORDER BY created_at DESC");

    let rows = db
        .query_raw_params(&sql, &params)
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.iter().map(parse_prediction).collect())
}

/// Fetches a single stored prediction by primary key.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no prediction has the given id.
pub async fn get_prediction(db: &dyn Database, id: i64) -> Result<CrimePredictionRow, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM crime_predictions WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    rows.first()
        .map(parse_prediction)
        .ok_or_else(|| DbError::NotFound(format!("prediction {id}")))
}

/// Aggregate statistics over all stored predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionStatistics {
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
    /// Ten most frequent crime types with counts, descending.
    pub top_crime_types: Vec<(String, i64)>,
}

/// Percentage of `count` over `total`, rounded to two decimals; 0 for an
/// empty total.
#[allow(clippy::cast_precision_loss)]
fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

/// Computes statistics over the stored predictions table.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn prediction_statistics(db: &dyn Database) -> Result<PredictionStatistics, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT
                COUNT(*) as total,
                SUM(CASE WHEN predicted_severity = 'Severe' THEN 1 ELSE 0 END) as severe,
                SUM(CASE WHEN predicted_severity = 'Not Severe' THEN 1 ELSE 0 END) as not_severe
             FROM crime_predictions",
            &[],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    let (total_predictions, severe_predictions, not_severe_predictions) =
        rows.first().map_or((0, 0, 0), |row| {
            let total: i64 = row.to_value("total").unwrap_or(0);
            let severe: Option<i64> = row.to_value("severe").unwrap_or(None);
            let not_severe: Option<i64> = row.to_value("not_severe").unwrap_or(None);
            (total, severe.unwrap_or(0), not_severe.unwrap_or(0))
        });

    let rows = db
        .query_raw_params(
            "SELECT crime_type, COUNT(*) as cnt FROM crime_predictions
             GROUP BY crime_type
             ORDER BY cnt DESC, crime_type
             LIMIT 10",
            &[],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    let top_crime_types = rows
        .iter()
        .map(|row| {
            let crime_type: String = row.to_value("crime_type").unwrap_or_default();
            let count: i64 = row.to_value("cnt").unwrap_or(0);
            (crime_type, count)
        })
        .collect();

    Ok(PredictionStatistics {
        total_predictions,
        severe_predictions,
        not_severe_predictions,
        severe_percentage: percentage(severe_predictions, total_predictions),
        not_severe_percentage: percentage(not_severe_predictions, total_predictions),
        top_crime_types,
    })
}

fn parse_prediction(row: &switchy_database::Row) -> CrimePredictionRow {
    CrimePredictionRow {
        id: row.to_value("id").unwrap_or(0),
        crime_type: row.to_value("crime_type").unwrap_or_default(),
        latitude: row.to_value("latitude").unwrap_or(0.0),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        encoded_crime_type: row.to_value("encoded_crime_type").unwrap_or(0),
        predicted_severity: row.to_value("predicted_severity").unwrap_or_default(),
        prediction_value: row.to_value("prediction_value").unwrap_or(0),
        created_at: row.to_value("created_at").unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Region risk summaries
// ---------------------------------------------------------------------------

/// Recomputes the risk summary for a region from scratch and upserts it.
///
/// Runs after an incident's prediction fields are committed so the
/// aggregate reflects the just-created record. Recomputing with no new
/// incidents produces identical summary fields (idempotent). Concurrent
/// recomputes of the same region are last-writer-wins, which is
/// acceptable for a display aggregate.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn recompute_region_summary(
    db: &dyn Database,
    region_code: &str,
) -> Result<Option<RegionRiskSummaryRow>, DbError> {
    let incidents = incidents_in_region(db, region_code).await?;
    let Some(summary) = summary::summarize_region(&incidents) else {
        log::debug!("Region {region_code} has no incidents; skipping summary");
        return Ok(None);
    };

    let now = chrono::Utc::now().to_rfc3339();
    upsert_region_summary(db, region_code, &summary, &now).await?;

    log::info!(
        "Recomputed region {region_code}: {} cases, {} severe ({:.1}%)",
        summary.total_cases,
        summary.severe_cases,
        summary.risk_score
    );

    Ok(Some(RegionRiskSummaryRow {
        region_code: region_code.to_string(),
        total_cases: summary.total_cases,
        severe_cases: summary.severe_cases,
        risk_score: summary.risk_score,
        most_common_crime: summary.most_common_crime,
        last_updated: now,
    }))
}

async fn upsert_region_summary(
    db: &dyn Database,
    region_code: &str,
    summary: &RegionSummary,
    now: &str,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO region_risk_summaries (
            region_code, total_cases, severe_cases, risk_score,
            most_common_crime, last_updated
        ) VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (region_code) DO UPDATE SET
            total_cases = excluded.total_cases,
            severe_cases = excluded.severe_cases,
            risk_score = excluded.risk_score,
            most_common_crime = excluded.most_common_crime,
            last_updated = excluded.last_updated",
        &[
            DatabaseValue::String(region_code.to_string()),
            DatabaseValue::Int64(summary.total_cases),
            DatabaseValue::Int64(summary.severe_cases),
            DatabaseValue::Real64(summary.risk_score),
            DatabaseValue::String(summary.most_common_crime.clone()),
            DatabaseValue::String(now.to_string()),
        ],
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(())
}

/// Fetches the stored summary for one region.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_region_summary(
    db: &dyn Database,
    region_code: &str,
) -> Result<Option<RegionRiskSummaryRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT * FROM region_risk_summaries WHERE region_code = $1",
            &[DatabaseValue::String(region_code.to_string())],
        )
        .await
        .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.first().map(parse_region_summary))
}

/// Lists region summaries, highest risk first, optionally filtered to a
/// minimum risk score.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn list_region_summaries(
    db: &dyn Database,
    min_risk_score: Option<f64>,
) -> Result<Vec<RegionRiskSummaryRow>, DbError> {
    let rows = if let Some(threshold) = min_risk_score {
        db.query_raw_params(
            "SELECT * FROM region_risk_summaries
             WHERE risk_score >= $1
             ORDER BY risk_score DESC",
            &[DatabaseValue::Real64(threshold)],
        )
        .await
    } else {
        db.query_raw_params(
            "SELECT * FROM region_risk_summaries ORDER BY risk_score DESC",
            &[],
        )
        .await
    }
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(rows.iter().map(parse_region_summary).collect())
}

fn parse_region_summary(row: &switchy_database::Row) -> RegionRiskSummaryRow {
    RegionRiskSummaryRow {
        region_code: row.to_value("region_code").unwrap_or_default(),
        total_cases: row.to_value("total_cases").unwrap_or(0),
        severe_cases: row.to_value("severe_cases").unwrap_or(0),
        risk_score: row.to_value("risk_score").unwrap_or(0.0),
        most_common_crime: row.to_value("most_common_crime").unwrap_or_default(),
        last_updated: row.to_value("last_updated").unwrap_or_default(),
    }
}
