//! Category label encoder registry.
//!
//! A [`CategoryEncoder`] is the immutable label-to-code mapping produced at
//! training time. Codes are the positions of labels in the training-time
//! class list, so they are stable for the lifetime of a loaded encoder.
//! Decoding (code back to label) is never needed during prediction and is
//! not provided.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::PredictionError;

/// Serialized encoder artifact: the ordered class list from training.
#[derive(Debug, Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

/// Immutable mapping from category labels to dense integer codes.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    /// Which category this encoder covers ("crime_type" or "location").
    /// Used in error reporting only.
    name: &'static str,
    classes: Vec<String>,
    index: BTreeMap<String, i64>,
}

impl CategoryEncoder {
    /// Builds an encoder from an ordered class list. Codes are assigned by
    /// position.
    #[must_use]
    pub fn new(name: &'static str, classes: Vec<String>) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i as i64))
            .collect();
        Self {
            name,
            classes,
            index,
        }
    }

    /// Loads an encoder from a JSON artifact file (`{ "classes": [...] }`).
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if the file cannot be read or parsed.
    pub fn from_file(name: &'static str, path: &Path) -> Result<Self, PredictionError> {
        let contents = std::fs::read_to_string(path)?;
        let artifact: EncoderArtifact = serde_json::from_str(&contents)?;
        log::info!(
            "Loaded {name} encoder with {} classes from {}",
            artifact.classes.len(),
            path.display()
        );
        Ok(Self::new(name, artifact.classes))
    }

    /// Encodes a label to its training-time code.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::EmptyLabel`] for empty or
    /// whitespace-only input, and [`PredictionError::UnknownLabel`] for a
    /// label absent from the training class list.
    pub fn encode(&self, label: &str) -> Result<i64, PredictionError> {
        if label.trim().is_empty() {
            return Err(PredictionError::EmptyLabel {
                encoder: self.name,
            });
        }
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| PredictionError::UnknownLabel {
                encoder: self.name,
                label: label.to_string(),
            })
    }

    /// Whether the label is a known class (exact, case-sensitive).
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// The ordered class list from training. Enumeration order here
    /// defines the deterministic tie-break order for substring fallback.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of known classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the encoder has no classes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The encoder's name, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            "crime_type",
            vec![
                "Assault".to_string(),
                "Burglary".to_string(),
                "Theft".to_string(),
            ],
        )
    }

    #[test]
    fn codes_are_training_positions() {
        let enc = encoder();
        assert_eq!(enc.encode("Assault").unwrap(), 0);
        assert_eq!(enc.encode("Burglary").unwrap(), 1);
        assert_eq!(enc.encode("Theft").unwrap(), 2);
    }

    #[test]
    fn unknown_label_fails_rather_than_inventing_a_code() {
        let enc = encoder();
        let err = enc.encode("Arson").unwrap_err();
        assert!(matches!(
            err,
            PredictionError::UnknownLabel { encoder: "crime_type", .. }
        ));
    }

    #[test]
    fn empty_label_is_input_validation() {
        let enc = encoder();
        assert!(matches!(
            enc.encode("").unwrap_err(),
            PredictionError::EmptyLabel { .. }
        ));
        assert!(matches!(
            enc.encode("   ").unwrap_err(),
            PredictionError::EmptyLabel { .. }
        ));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let enc = encoder();
        assert!(enc.contains("Theft"));
        assert!(!enc.contains("theft"));
    }
}
