#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime severity and suspect risk prediction engine.
//!
//! Loads a pre-trained severity classifier and its category encoders from
//! JSON artifacts, resolves free-text location labels through a
//! deterministic fallback chain, and produces severity predictions for
//! incidents and risk tiers for suspects.
//!
//! The engine never owns persistence of the records it scores: callers
//! pass in the relevant fields and store the returned prediction
//! themselves. Prediction failures are ordinary [`Result`] errors and are
//! expected to be downgraded to warnings at the persistence boundary so a
//! failed prediction never blocks record creation.

pub mod artifacts;
pub mod encoder;
pub mod features;
pub mod gazetteer;
pub mod model;
pub mod predictor;
pub mod resolver;

use thiserror::Error;

/// Errors from encoding, resolution, or classification.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// A category label was empty or whitespace-only. This is an input
    /// validation failure, not a domain "unknown label" case.
    #[error("Empty {encoder} label")]
    EmptyLabel {
        /// Which encoder rejected the label.
        encoder: &'static str,
    },

    /// A label was never seen at training time. Crime types have no
    /// fallback: this is always surfaced rather than silently defaulting
    /// to code 0.
    #[error("Unknown {encoder} label: {label}")]
    UnknownLabel {
        /// Which encoder rejected the label.
        encoder: &'static str,
        /// The rejected label.
        label: String,
    },

    /// Latitude or longitude outside the valid WGS84 range.
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// The offending latitude.
        latitude: f64,
        /// The offending longitude.
        longitude: f64,
    },

    /// A model or encoder artifact could not be read.
    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A model or encoder artifact could not be parsed.
    #[error("Artifact parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An artifact parsed but its contents are unusable (bad node
    /// references, empty forest, wrong class count).
    #[error("Corrupt artifact: {message}")]
    CorruptArtifact {
        /// Description of what is wrong with the artifact.
        message: String,
    },

    /// The artifact's declared feature contract or self-check output no
    /// longer matches this build. Caught at load time so a mismatched
    /// deploy fails loudly instead of producing silently wrong
    /// predictions.
    #[error("Model version mismatch: {message}")]
    VersionMismatch {
        /// Description of the mismatch.
        message: String,
    },
}
