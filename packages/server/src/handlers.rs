//! HTTP handler functions for the crime intel API.
//!
//! Prediction failures inside creation handlers are downgraded to
//! warnings: the record is stored without prediction fields and the
//! response carries the reason. Validation failures are 400s and store
//! nothing.

use actix_web::{HttpResponse, web};
use crime_intel_database::queries;
use crime_intel_database_models::{IncidentFilter, NewIncident, NewSuspect, PredictionFilter, SuspectFilter};
use crime_intel_prediction::gazetteer;
use crime_intel_prediction::predictor::{self, SUSPECT_PREDICTION_CONFIDENCE};
use crime_intel_prediction_models::RiskTier;
use crime_intel_server_models::{
    ApiCrimeTypeCount, ApiHealth, ApiIncident, ApiPrediction, ApiPredictionList,
    ApiPredictionStatistics, ApiRegionSummary, ApiRiskStatistics, ApiRiskTierCount, ApiSuspect,
    IncidentQueryParams, NewIncidentRequest, NewSuspectRequest, PredictRequest,
    PredictionQueryParams, RegionQueryParams, SuspectQueryParams,
};

use crate::AppState;
use crate::validation;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        status: "ok".to_string(),
        predictor_ready: state.predictor.is_some(),
        model_version: state
            .predictor
            .as_ref()
            .map(|p| p.version().to_string()),
    })
}

/// `POST /api/predict`
///
/// Standalone severity prediction. Unlike incident creation, a failed
/// prediction here is the whole point of the request, so it surfaces as
/// an error instead of a warning.
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<PredictRequest>,
) -> HttpResponse {
    if let Err(message) = validation::validate_predict(&body) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
    }

    let Some(predictor) = state.predictor.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "Prediction service unavailable"
        }));
    };

    let location = body
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let result = if let Some(location) = location {
        predictor
            .predict_incident(&body.crime_type, body.latitude, body.longitude, location)
            .map(|p| (p.severity, p.features))
    } else if let (Some(latitude), Some(longitude)) = (body.latitude, body.longitude) {
        predictor.predict_point(&body.crime_type, latitude, longitude)
    } else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "either both coordinates or a location label are required"
        }));
    };

    let (severity, features) = match result {
        Ok(result) => result,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
        }
    };

    match queries::insert_prediction(
        state.db.as_ref(),
        &body.crime_type,
        features.latitude,
        features.longitude,
        features.crime_code,
        severity.label(),
        i64::from(severity.severe),
    )
    .await
    {
        Ok(row) => HttpResponse::Created().json(ApiPrediction::from(row)),
        Err(e) => {
            log::error!("Failed to store prediction: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to store prediction"
            }))
        }
    }
}

/// `GET /api/predictions`
///
/// Lists stored predictions with summary statistics.
pub async fn predictions(
    state: web::Data<AppState>,
    params: web::Query<PredictionQueryParams>,
) -> HttpResponse {
    let filter = PredictionFilter {
        crime_type: params.crime_type.clone(),
        severity: params.severity.clone(),
        start_date: params.start_date.clone(),
        end_date: params.end_date.clone(),
    };

    let rows = match queries::list_predictions(state.db.as_ref(), &filter).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Failed to query predictions: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query predictions"
            }));
        }
    };

    let stats = match queries::prediction_statistics(state.db.as_ref()).await {
        Ok(stats) => stats,
        Err(e) => {
            log::error!("Failed to compute prediction statistics: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to compute prediction statistics"
            }));
        }
    };

    HttpResponse::Ok().json(ApiPredictionList {
        predictions: rows.into_iter().map(ApiPrediction::from).collect(),
        statistics: ApiPredictionStatistics {
            total_predictions: stats.total_predictions,
            severe_predictions: stats.severe_predictions,
            not_severe_predictions: stats.not_severe_predictions,
            severe_percentage: stats.severe_percentage,
            not_severe_percentage: stats.not_severe_percentage,
            top_crime_types: stats
                .top_crime_types
                .into_iter()
                .map(|(crime_type, count)| ApiCrimeTypeCount { crime_type, count })
                .collect(),
        },
    })
}

/// `GET /api/predictions/{id}`
pub async fn prediction_detail(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    match queries::get_prediction(state.db.as_ref(), id).await {
        Ok(row) => HttpResponse::Ok().json(ApiPrediction::from(row)),
        Err(crime_intel_database::DbError::NotFound(_)) => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("No prediction with id {id}")
            }))
        }
        Err(e) => {
            log::error!("Failed to query prediction {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query prediction"
            }))
        }
    }
}

/// `POST /api/incidents`
///
/// Creates an incident and attaches a severity prediction. A failed
/// prediction never blocks creation: the incident is stored with unset
/// prediction fields and the response carries a warning.
pub async fn create_incident(
    state: web::Data<AppState>,
    body: web::Json<NewIncidentRequest>,
) -> HttpResponse {
    if let Err(message) = validation::validate_new_incident(&body) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
    }

    let incident_id = body
        .incident_id
        .clone()
        .unwrap_or_else(|| format!("INC-{}", uuid::Uuid::new_v4()));

    let prediction = match state.predictor.as_ref() {
        Some(predictor) => predictor
            .predict_incident(&body.crime_type, body.latitude, body.longitude, &body.location)
            .map_err(|e| e.to_string()),
        None => Err("Prediction service unavailable".to_string()),
    };

    // Store the coordinates the classifier saw, or the best fallback when
    // the prediction itself failed.
    let (latitude, longitude) = match &prediction {
        Ok(p) => (p.features.latitude, p.features.longitude),
        Err(_) => match (body.latitude, body.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                let coord = gazetteer::lookup(&body.location)
                    .map_or(gazetteer::DEFAULT_COORDINATE, |entry| entry.coordinate);
                (
                    body.latitude.unwrap_or(coord.latitude),
                    body.longitude.unwrap_or(coord.longitude),
                )
            }
        },
    };

    let new_incident = NewIncident {
        incident_id,
        crime_type: body.crime_type.clone(),
        location: body.location.clone(),
        latitude: body.latitude,
        longitude: body.longitude,
        region_code: body.region_code.clone(),
        description: body.description.clone(),
    };

    let id = match queries::insert_incident(state.db.as_ref(), &new_incident, latitude, longitude)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to insert incident: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create incident"
            }));
        }
    };

    let warning = match &prediction {
        Ok(p) => {
            if let Err(e) = queries::set_incident_prediction(
                state.db.as_ref(),
                id,
                p.severity.severe,
                p.severity.severity_score(),
                p.severity.confidence,
            )
            .await
            {
                log::error!("Failed to store incident prediction: {e}");
            }
            None
        }
        Err(message) => {
            log::warn!("Incident {id} stored without prediction: {message}");
            Some(message.clone())
        }
    };

    if let Err(e) = queries::recompute_region_summary(state.db.as_ref(), &body.region_code).await {
        log::error!("Failed to recompute region summary: {e}");
    }

    match queries::get_incident(state.db.as_ref(), id).await {
        Ok(row) => {
            let mut api = ApiIncident::from(row);
            if let Some(warning) = warning {
                api = api.with_warning(warning);
            }
            HttpResponse::Created().json(api)
        }
        Err(e) => {
            log::error!("Failed to read back incident {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create incident"
            }))
        }
    }
}

/// `GET /api/incidents`
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentQueryParams>,
) -> HttpResponse {
    let filter = IncidentFilter {
        is_severe: params.is_severe,
        crime_type: params.crime_type.clone(),
        region_code: params.region_code.clone(),
    };
    list_incidents_response(&state, &filter).await
}

/// `GET /api/incidents/severe`
pub async fn severe_incidents(state: web::Data<AppState>) -> HttpResponse {
    let filter = IncidentFilter {
        is_severe: Some(true),
        ..IncidentFilter::default()
    };
    list_incidents_response(&state, &filter).await
}

async fn list_incidents_response(state: &AppState, filter: &IncidentFilter) -> HttpResponse {
    match queries::list_incidents(state.db.as_ref(), filter).await {
        Ok(rows) => {
            let api: Vec<ApiIncident> = rows.into_iter().map(ApiIncident::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => {
            log::error!("Failed to query incidents: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query incidents"
            }))
        }
    }
}

/// `POST /api/suspects`
///
/// Creates a suspect and attaches a risk assessment. The risk heuristic
/// is deterministic and always succeeds, but its persistence failure is
/// still only a warning.
pub async fn create_suspect(
    state: web::Data<AppState>,
    body: web::Json<NewSuspectRequest>,
) -> HttpResponse {
    if let Err(message) = validation::validate_new_suspect(&body) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
    }

    let new_suspect = NewSuspect {
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
        alias: body.alias.clone(),
        national_id: body.national_id.clone(),
        criminal_record_summary: body.criminal_record_summary.clone(),
    };

    let id = match queries::insert_suspect(state.db.as_ref(), &new_suspect).await {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to insert suspect: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create suspect"
            }));
        }
    };

    let risk = predictor::predict_suspect_risk(&body.criminal_record_summary);
    if let Err(e) = queries::set_suspect_risk(
        state.db.as_ref(),
        id,
        risk.tier,
        risk.score,
        SUSPECT_PREDICTION_CONFIDENCE,
    )
    .await
    {
        log::error!("Failed to store suspect risk: {e}");
    }

    match queries::get_suspect(state.db.as_ref(), id).await {
        Ok(row) => HttpResponse::Created().json(ApiSuspect::from(row)),
        Err(e) => {
            log::error!("Failed to read back suspect {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create suspect"
            }))
        }
    }
}

/// `GET /api/suspects`
pub async fn suspects(
    state: web::Data<AppState>,
    params: web::Query<SuspectQueryParams>,
) -> HttpResponse {
    let filter = SuspectFilter {
        risk_level: params.risk_level,
        search: params.search.clone(),
    };
    list_suspects_response(&state, &filter).await
}

/// `GET /api/suspects/high-risk`
pub async fn high_risk_suspects(state: web::Data<AppState>) -> HttpResponse {
    let filter = SuspectFilter {
        risk_level: Some(RiskTier::High),
        ..SuspectFilter::default()
    };
    list_suspects_response(&state, &filter).await
}

async fn list_suspects_response(state: &AppState, filter: &SuspectFilter) -> HttpResponse {
    match queries::list_suspects(state.db.as_ref(), filter).await {
        Ok(rows) => {
            let api: Vec<ApiSuspect> = rows.into_iter().map(ApiSuspect::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => {
            log::error!("Failed to query suspects: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query suspects"
            }))
        }
    }
}

/// `GET /api/suspects/risk-statistics`
pub async fn risk_statistics(state: web::Data<AppState>) -> HttpResponse {
    match queries::suspect_risk_statistics(state.db.as_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(ApiRiskStatistics {
            total_suspects: stats.total_suspects,
            by_tier: stats
                .by_tier
                .into_iter()
                .map(|(tier, count)| ApiRiskTierCount {
                    risk_level: tier,
                    count,
                    color: tier.color().to_string(),
                })
                .collect(),
            average_risk_score: stats.average_risk_score,
        }),
        Err(e) => {
            log::error!("Failed to compute risk statistics: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to compute risk statistics"
            }))
        }
    }
}

/// `GET /api/regions`
pub async fn regions(
    state: web::Data<AppState>,
    params: web::Query<RegionQueryParams>,
) -> HttpResponse {
    match queries::list_region_summaries(state.db.as_ref(), params.threshold).await {
        Ok(rows) => {
            let api: Vec<ApiRegionSummary> =
                rows.into_iter().map(ApiRegionSummary::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => {
            log::error!("Failed to query region summaries: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query region summaries"
            }))
        }
    }
}

/// `GET /api/regions/{code}`
pub async fn region_summary(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner();
    match queries::get_region_summary(state.db.as_ref(), &code).await {
        Ok(Some(row)) => HttpResponse::Ok().json(ApiRegionSummary::from(row)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No summary for region {code}")
        })),
        Err(e) => {
            log::error!("Failed to query region summary: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query region summary"
            }))
        }
    }
}
