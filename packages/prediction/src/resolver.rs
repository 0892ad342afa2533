//! Fallback location resolver.
//!
//! Resolves a free-text location label to a code the location encoder
//! recognizes, through a deterministic, ordered fallback chain:
//!
//! 1. **Exact match** — label is a known encoder class.
//! 2. **Substring match** — case-insensitive containment either direction;
//!    first match in encoder enumeration order wins.
//! 3. **Coordinate-nearest** — the input names a gazetteer entry; pick the
//!    gazetteer entry with a known encoder label closest by Euclidean
//!    degree distance. First-encountered wins on ties.
//! 4. **Default** — code 0 and the fixed fallback coordinate.
//!
//! A fallback hit is a reported, degraded outcome, never an error: every
//! step below exact match is logged so operators can see degraded-accuracy
//! predictions happening.

use crime_intel_prediction_models::{Coordinate, ResolutionMethod, ResolvedLocation};

use crate::PredictionError;
use crate::encoder::CategoryEncoder;
use crate::gazetteer;

/// Resolves free-text location labels against a location encoder.
pub struct LocationResolver<'a> {
    encoder: &'a CategoryEncoder,
}

impl<'a> LocationResolver<'a> {
    /// Creates a resolver over the given location encoder.
    #[must_use]
    pub const fn new(encoder: &'a CategoryEncoder) -> Self {
        Self { encoder }
    }

    /// Resolves a location label to an encoder code.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::EmptyLabel`] for empty or
    /// whitespace-only input. Unresolvable labels are not errors; they
    /// fall through to the default code.
    pub fn resolve(&self, label: &str) -> Result<ResolvedLocation, PredictionError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(PredictionError::EmptyLabel {
                encoder: self.encoder.name(),
            });
        }

        if self.encoder.is_empty() {
            log::warn!(
                "Location encoder has no classes; resolution of {label:?} is impossible, \
                 using default code"
            );
            return Ok(default_resolution());
        }

        if let Ok(code) = self.encoder.encode(label) {
            return Ok(ResolvedLocation {
                code,
                method: ResolutionMethod::Exact,
                coordinate: gazetteer::lookup(label).map(|e| e.coordinate),
            });
        }

        if let Some(resolved) = self.resolve_substring(label) {
            return Ok(resolved);
        }

        if let Some(resolved) = self.resolve_by_coordinate(label) {
            return Ok(resolved);
        }

        log::warn!("Location {label:?} unresolvable; using default code and coordinate");
        Ok(default_resolution())
    }

    /// Case-insensitive containment either direction between the input
    /// and each known class. Enumeration order of the encoder's class
    /// list breaks ties, which is implementation-defined but stable for a
    /// fixed encoder.
    fn resolve_substring(&self, label: &str) -> Option<ResolvedLocation> {
        let needle = label.to_lowercase();
        for (i, class) in self.encoder.classes().iter().enumerate() {
            let class_lower = class.to_lowercase();
            if class_lower.contains(&needle) || needle.contains(&class_lower) {
                log::info!("Location {label:?} resolved to {class:?} via substring fallback");
                #[allow(clippy::cast_possible_wrap)]
                return Some(ResolvedLocation {
                    code: i as i64,
                    method: ResolutionMethod::Substring,
                    coordinate: gazetteer::lookup(class).map(|e| e.coordinate),
                });
            }
        }
        None
    }

    /// Nearest known encoder label by gazetteer coordinate distance.
    /// Requires the input itself to be a gazetteer entry; strict `<`
    /// comparison keeps the first-encountered entry on ties.
    fn resolve_by_coordinate(&self, label: &str) -> Option<ResolvedLocation> {
        let origin = gazetteer::lookup(label)?;

        let mut best: Option<(&'static str, f64)> = None;
        for entry in gazetteer::entries() {
            if !self.encoder.contains(entry.label) {
                continue;
            }
            let dist = origin.coordinate.distance_sq(&entry.coordinate);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((entry.label, dist)),
            }
        }

        let (nearest, _) = best?;
        let code = self.encoder.encode(nearest).ok()?;
        log::info!(
            "Location {label:?} resolved to {nearest:?} via nearest-coordinate fallback"
        );
        Some(ResolvedLocation {
            code,
            method: ResolutionMethod::NearestCoordinate,
            coordinate: Some(origin.coordinate),
        })
    }
}

/// The terminal fallback: first encoder class and the designated default
/// coordinate.
#[must_use]
pub const fn default_resolution() -> ResolvedLocation {
    ResolvedLocation {
        code: 0,
        method: ResolutionMethod::Default,
        coordinate: Some(gazetteer::DEFAULT_COORDINATE),
    }
}

/// Convenience: the coordinate a resolution implies, falling back to the
/// default city center when none is attached.
#[must_use]
pub fn coordinate_or_default(resolution: &ResolvedLocation) -> Coordinate {
    resolution
        .coordinate
        .unwrap_or(gazetteer::DEFAULT_COORDINATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            "location",
            vec![
                "Gikondo".to_string(),
                "Kacyiru".to_string(),
                "Kimironko".to_string(),
                "Nyabugogo".to_string(),
                "Nyamirambo".to_string(),
                "Remera".to_string(),
            ],
        )
    }

    #[test]
    fn exact_match_wins() {
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);
        let resolved = resolver.resolve("Kimironko").unwrap();
        assert_eq!(resolved.code, 2);
        assert_eq!(resolved.method, ResolutionMethod::Exact);
    }

    #[test]
    fn substring_match_beats_default() {
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);

        // Input contains a known class
        let resolved = resolver.resolve("Remera Market").unwrap();
        assert_eq!(resolved.code, 5);
        assert_eq!(resolved.method, ResolutionMethod::Substring);

        // Known class contains the input
        let resolved = resolver.resolve("kacy").unwrap();
        assert_eq!(resolved.code, 1);
        assert_eq!(resolved.method, ResolutionMethod::Substring);
    }

    #[test]
    fn substring_first_match_is_deterministic() {
        // "o" is a substring of several classes; enumeration order picks
        // Gikondo (index 0) every time.
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);
        for _ in 0..3 {
            let resolved = resolver.resolve("o").unwrap();
            assert_eq!(resolved.code, 0);
            assert_eq!(resolved.method, ResolutionMethod::Substring);
        }
    }

    #[test]
    fn gazetteer_city_resolves_to_nearest_known_label() {
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);
        // Rwamagana is east of Kigali; the nearest encoder-known gazetteer
        // entry is Kimironko (easternmost Kigali sector in the table).
        let resolved = resolver.resolve("Rwamagana").unwrap();
        assert_eq!(resolved.method, ResolutionMethod::NearestCoordinate);
        assert_eq!(resolved.code, enc.encode("Kimironko").unwrap());
        // Carries the *input's* coordinate for callers without one.
        let coord = resolved.coordinate.unwrap();
        assert!((coord.latitude - -1.9487).abs() < 1e-9);
    }

    #[test]
    fn unseen_label_absent_from_gazetteer_defaults() {
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);
        let resolved = resolver.resolve("Atlantis").unwrap();
        assert_eq!(resolved.code, 0);
        assert_eq!(resolved.method, ResolutionMethod::Default);
        assert!(resolved.method.is_degraded());
        assert_eq!(
            resolved.coordinate.unwrap(),
            gazetteer::DEFAULT_COORDINATE
        );
    }

    #[test]
    fn empty_encoder_always_defaults() {
        let enc = CategoryEncoder::new("location", Vec::new());
        let resolver = LocationResolver::new(&enc);
        let resolved = resolver.resolve("Kacyiru").unwrap();
        assert_eq!(resolved.code, 0);
        assert_eq!(resolved.method, ResolutionMethod::Default);
    }

    #[test]
    fn empty_label_is_rejected() {
        let enc = location_encoder();
        let resolver = LocationResolver::new(&enc);
        assert!(matches!(
            resolver.resolve("  ").unwrap_err(),
            PredictionError::EmptyLabel { .. }
        ));
    }
}
