#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `SQLite` persistence for incidents, suspects, stored predictions, and
//! region risk summaries.
//!
//! Uses `switchy_database` for all database operations with raw
//! parameterized SQL, following the same patterns as the rest of the
//! workspace. The region summary recomputation implements the prediction
//! persistence contract: aggregates are rebuilt from scratch over the
//! whole region (idempotent), never incrementally patched.

pub mod queries;
pub mod summary;

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

/// Default path for the crime-intel database.
pub const DEFAULT_DB_PATH: &str = "data/crime_intel.db";

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row was expected but not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Opens (or creates) the `SQLite` database and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Database(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates all tables if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS incidents (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            incident_id             TEXT NOT NULL UNIQUE,
            crime_type              TEXT NOT NULL,
            location                TEXT NOT NULL,
            latitude                REAL NOT NULL,
            longitude               REAL NOT NULL,
            region_code             TEXT NOT NULL,
            description             TEXT,
            is_severe               INTEGER,
            severity_score          REAL,
            prediction_confidence   REAL,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_incidents_region
         ON incidents (region_code)",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_incidents_severe
         ON incidents (is_severe)",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS suspects (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name              TEXT NOT NULL,
            last_name               TEXT NOT NULL,
            alias                   TEXT,
            national_id             TEXT NOT NULL UNIQUE,
            criminal_record_summary TEXT NOT NULL,
            predicted_risk_level    TEXT,
            risk_score              REAL,
            prediction_confidence   REAL,
            created_at              TEXT NOT NULL,
            updated_at              TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_suspects_risk
         ON suspects (predicted_risk_level)",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS crime_predictions (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            crime_type          TEXT NOT NULL,
            latitude            REAL NOT NULL,
            longitude           REAL NOT NULL,
            encoded_crime_type  INTEGER NOT NULL,
            predicted_severity  TEXT NOT NULL,
            prediction_value    INTEGER NOT NULL,
            created_at          TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS region_risk_summaries (
            region_code         TEXT PRIMARY KEY,
            total_cases         INTEGER NOT NULL DEFAULT 0,
            severe_cases        INTEGER NOT NULL DEFAULT 0,
            risk_score          REAL NOT NULL DEFAULT 0.0,
            most_common_crime   TEXT NOT NULL DEFAULT '',
            last_updated        TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crime_intel_database_models::{
        IncidentFilter, NewIncident, NewSuspect, PredictionFilter, SuspectFilter,
    };
    use crime_intel_prediction_models::RiskTier;

    use super::*;
    use crate::queries;

    async fn test_db(name: &str) -> Box<dyn Database> {
        let path = std::env::temp_dir()
            .join("crime_intel_tests")
            .join(format!("{name}.db"));
        let _ = std::fs::remove_file(&path);
        open_db(&path).await.unwrap()
    }

    fn incident(incident_id: &str, crime_type: &str, region_code: &str) -> NewIncident {
        NewIncident {
            incident_id: incident_id.to_string(),
            crime_type: crime_type.to_string(),
            location: "Kacyiru".to_string(),
            latitude: Some(-1.9403),
            longitude: Some(30.0782),
            region_code: region_code.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn incident_round_trip_with_prediction() {
        let db = test_db("incident_round_trip").await;

        let id = queries::insert_incident(
            db.as_ref(),
            &incident("INC-001", "Robbery", "KGL-01"),
            -1.9403,
            30.0782,
        )
        .await
        .unwrap();

        let stored = queries::get_incident(db.as_ref(), id).await.unwrap();
        assert_eq!(stored.incident_id, "INC-001");
        assert_eq!(stored.is_severe, None);

        queries::set_incident_prediction(db.as_ref(), id, true, 0.8, Some(0.9))
            .await
            .unwrap();

        let stored = queries::get_incident(db.as_ref(), id).await.unwrap();
        assert_eq!(stored.is_severe, Some(true));
        assert_eq!(stored.severity_score, Some(0.8));
        assert_eq!(stored.prediction_confidence, Some(0.9));
    }

    #[tokio::test]
    async fn incident_filters() {
        let db = test_db("incident_filters").await;

        let severe = queries::insert_incident(
            db.as_ref(),
            &incident("INC-001", "Homicide", "KGL-01"),
            -1.9403,
            30.0782,
        )
        .await
        .unwrap();
        queries::set_incident_prediction(db.as_ref(), severe, true, 0.8, Some(0.95))
            .await
            .unwrap();

        let mild = queries::insert_incident(
            db.as_ref(),
            &incident("INC-002", "Theft", "HYE-02"),
            -2.5967,
            29.7394,
        )
        .await
        .unwrap();
        queries::set_incident_prediction(db.as_ref(), mild, false, 0.3, Some(0.7))
            .await
            .unwrap();

        let all = queries::list_incidents(db.as_ref(), &IncidentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let severe_only = queries::list_incidents(
            db.as_ref(),
            &IncidentFilter {
                is_severe: Some(true),
                ..IncidentFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(severe_only.len(), 1);
        assert_eq!(severe_only[0].crime_type, "Homicide");

        let in_region = queries::list_incidents(
            db.as_ref(),
            &IncidentFilter {
                region_code: Some("HYE-02".to_string()),
                ..IncidentFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(in_region.len(), 1);
        assert_eq!(in_region[0].incident_id, "INC-002");
    }

    #[tokio::test]
    async fn suspect_round_trip_and_search() {
        let db = test_db("suspect_round_trip").await;

        let id = queries::insert_suspect(
            db.as_ref(),
            &NewSuspect {
                first_name: "Jean".to_string(),
                last_name: "Uwimana".to_string(),
                alias: Some("JU".to_string()),
                national_id: "1199012345678901".to_string(),
                criminal_record_summary: "Repeat offender, two burglaries".to_string(),
            },
        )
        .await
        .unwrap();

        queries::set_suspect_risk(db.as_ref(), id, RiskTier::High, 0.9, 0.85)
            .await
            .unwrap();

        let stored = queries::get_suspect(db.as_ref(), id).await.unwrap();
        assert_eq!(stored.predicted_risk_level, Some(RiskTier::High));
        assert_eq!(stored.risk_score, Some(0.9));

        let found = queries::list_suspects(
            db.as_ref(),
            &SuspectFilter {
                search: Some("uwim".to_string()),
                ..SuspectFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);

        let high = queries::list_suspects(
            db.as_ref(),
            &SuspectFilter {
                risk_level: Some(RiskTier::High),
                ..SuspectFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(high.len(), 1);

        let none = queries::list_suspects(
            db.as_ref(),
            &SuspectFilter {
                risk_level: Some(RiskTier::Low),
                ..SuspectFilter::default()
            },
        )
        .await
        .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn risk_statistics_counts_tiers() {
        let db = test_db("risk_statistics").await;

        for (i, (tier, score)) in [(RiskTier::High, 0.9), (RiskTier::Low, 0.2)]
            .into_iter()
            .enumerate()
        {
            let id = queries::insert_suspect(
                db.as_ref(),
                &NewSuspect {
                    first_name: "Test".to_string(),
                    last_name: format!("Suspect{i}"),
                    alias: None,
                    national_id: format!("119901234567890{i}"),
                    criminal_record_summary: "record summary long enough".to_string(),
                },
            )
            .await
            .unwrap();
            queries::set_suspect_risk(db.as_ref(), id, tier, score, 0.85)
                .await
                .unwrap();
        }

        let stats = queries::suspect_risk_statistics(db.as_ref()).await.unwrap();
        assert_eq!(stats.total_suspects, 2);
        assert_eq!(
            stats.by_tier,
            vec![
                (RiskTier::Low, 1),
                (RiskTier::Medium, 0),
                (RiskTier::High, 1),
            ]
        );
        assert!((stats.average_risk_score - 0.55).abs() < 1e-9);
    }

    #[tokio::test]
    async fn prediction_storage_and_statistics() {
        let db = test_db("prediction_statistics").await;

        let empty = queries::prediction_statistics(db.as_ref()).await.unwrap();
        assert_eq!(empty.total_predictions, 0);
        assert!((empty.severe_percentage - 0.0).abs() < 1e-12);
        assert!((empty.not_severe_percentage - 0.0).abs() < 1e-12);

        queries::insert_prediction(db.as_ref(), "Robbery", -1.95, 30.05, 5, "Severe", 1)
            .await
            .unwrap();
        queries::insert_prediction(db.as_ref(), "Theft", -1.95, 30.05, 6, "Not Severe", 0)
            .await
            .unwrap();
        queries::insert_prediction(db.as_ref(), "Theft", -1.96, 30.06, 6, "Not Severe", 0)
            .await
            .unwrap();

        let severe = queries::list_predictions(
            db.as_ref(),
            &PredictionFilter {
                severity: Some("Severe".to_string()),
                ..PredictionFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(severe.len(), 1);
        assert_eq!(severe[0].crime_type, "Robbery");

        let theft = queries::list_predictions(
            db.as_ref(),
            &PredictionFilter {
                crime_type: Some("the".to_string()),
                ..PredictionFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(theft.len(), 2);

        let stats = queries::prediction_statistics(db.as_ref()).await.unwrap();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.severe_predictions, 1);
        assert_eq!(stats.not_severe_predictions, 2);
        // Percentages are rounded to two decimals.
        assert!((stats.severe_percentage - 33.33).abs() < 1e-9);
        assert!((stats.not_severe_percentage - 66.67).abs() < 1e-9);
        assert_eq!(stats.top_crime_types[0], ("Theft".to_string(), 2));
    }

    #[tokio::test]
    async fn prediction_lookup_and_date_filters() {
        let db = test_db("prediction_lookup").await;

        let stored =
            queries::insert_prediction(db.as_ref(), "Robbery", -1.95, 30.05, 5, "Severe", 1)
                .await
                .unwrap();

        let fetched = queries::get_prediction(db.as_ref(), stored.id).await.unwrap();
        assert_eq!(fetched, stored);

        assert!(matches!(
            queries::get_prediction(db.as_ref(), stored.id + 1)
                .await
                .unwrap_err(),
            DbError::NotFound(_)
        ));

        let past = queries::list_predictions(
            db.as_ref(),
            &PredictionFilter {
                start_date: Some("2000-01-01T00:00:00+00:00".to_string()),
                ..PredictionFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(past.len(), 1);

        let future = queries::list_predictions(
            db.as_ref(),
            &PredictionFilter {
                start_date: Some("2999-01-01T00:00:00+00:00".to_string()),
                ..PredictionFilter::default()
            },
        )
        .await
        .unwrap();
        assert!(future.is_empty());

        let until_now = queries::list_predictions(
            db.as_ref(),
            &PredictionFilter {
                end_date: Some("2999-01-01T00:00:00+00:00".to_string()),
                ..PredictionFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(until_now.len(), 1);
    }

    #[tokio::test]
    async fn region_summary_recompute_and_upsert() {
        let db = test_db("region_summary").await;

        assert_eq!(
            queries::recompute_region_summary(db.as_ref(), "KGL-01")
                .await
                .unwrap(),
            None
        );

        let id = queries::insert_incident(
            db.as_ref(),
            &incident("INC-001", "Robbery", "KGL-01"),
            -1.9403,
            30.0782,
        )
        .await
        .unwrap();
        queries::set_incident_prediction(db.as_ref(), id, true, 0.8, Some(0.9))
            .await
            .unwrap();

        let summary = queries::recompute_region_summary(db.as_ref(), "KGL-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_cases, 1);
        assert_eq!(summary.severe_cases, 1);
        assert!((summary.risk_score - 100.0).abs() < 1e-9);

        queries::insert_incident(
            db.as_ref(),
            &incident("INC-002", "Theft", "KGL-01"),
            -1.9403,
            30.0782,
        )
        .await
        .unwrap();

        let summary = queries::recompute_region_summary(db.as_ref(), "KGL-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_cases, 2);
        assert_eq!(summary.severe_cases, 1);
        assert!((summary.risk_score - 50.0).abs() < 1e-9);

        let stored = queries::get_region_summary(db.as_ref(), "KGL-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_cases, 2);

        let listed = queries::list_region_summaries(db.as_ref(), Some(60.0))
            .await
            .unwrap();
        assert!(listed.is_empty());
        let listed = queries::list_region_summaries(db.as_ref(), None).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
