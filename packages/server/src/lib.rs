#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime intel application.
//!
//! Serves the REST API for incident and suspect management with attached
//! severity and risk predictions, standalone predictions, and region risk
//! summaries. The severity model artifacts are loaded once at startup; if
//! loading fails the server still comes up in degraded mode, where record
//! creation succeeds but prediction fields stay unset and responses carry
//! a warning.

mod handlers;
pub mod validation;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_intel_database::{DEFAULT_DB_PATH, open_db};
use crime_intel_prediction::artifacts::DEFAULT_MODEL_DIR;
use crime_intel_prediction::predictor::SeverityPredictor;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
    /// Severity predictor; `None` when artifact loading failed at startup.
    pub predictor: Option<Arc<SeverityPredictor>>,
}

/// Starts the crime intel API server.
///
/// Opens the `SQLite` database (path from `CRIME_INTEL_DB`, default
/// `data/crime_intel.db`), loads the model artifacts (directory from
/// `MODEL_DIR`, default `ml`), and starts the Actix-Web HTTP server. A
/// failed artifact load is logged and the server runs degraded. This is a
/// regular async function; the caller provides the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened or its schema cannot be
/// created.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = std::env::var("CRIME_INTEL_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    log::info!("Opening database at {db_path}...");
    let db = open_db(Path::new(&db_path))
        .await
        .expect("Failed to open database");

    let model_dir = std::env::var("MODEL_DIR").unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
    log::info!("Loading model artifacts from {model_dir}...");
    let predictor = match SeverityPredictor::from_dir(Path::new(&model_dir)) {
        Ok(predictor) => {
            log::info!("Loaded severity model version {}", predictor.version());
            Some(Arc::new(predictor))
        }
        Err(e) => {
            log::error!("Failed to load model artifacts, running degraded: {e}");
            None
        }
    };

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        predictor,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/predict", web::post().to(handlers::predict))
                    .route("/predictions", web::get().to(handlers::predictions))
                    .route(
                        "/predictions/{id}",
                        web::get().to(handlers::prediction_detail),
                    )
                    .route("/incidents", web::post().to(handlers::create_incident))
                    .route("/incidents", web::get().to(handlers::incidents))
                    .route(
                        "/incidents/severe",
                        web::get().to(handlers::severe_incidents),
                    )
                    .route("/suspects", web::post().to(handlers::create_suspect))
                    .route("/suspects", web::get().to(handlers::suspects))
                    .route(
                        "/suspects/high-risk",
                        web::get().to(handlers::high_risk_suspects),
                    )
                    .route(
                        "/suspects/risk-statistics",
                        web::get().to(handlers::risk_statistics),
                    )
                    .route("/regions", web::get().to(handlers::regions))
                    .route("/regions/{code}", web::get().to(handlers::region_summary)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
