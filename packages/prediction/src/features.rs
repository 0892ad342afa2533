//! Feature vector construction.
//!
//! Pure and deterministic; the only validation is the WGS84 coordinate
//! range check, which must fail before anything reaches the classifier.

use crime_intel_prediction_models::FeatureVector;

use crate::PredictionError;

/// Builds the ordered feature vector consumed by the severity classifier.
///
/// # Errors
///
/// Returns [`PredictionError::InvalidCoordinate`] when latitude is outside
/// `[-90, 90]` or longitude is outside `[-180, 180]`.
pub fn build(
    crime_code: i64,
    latitude: f64,
    longitude: f64,
    location_code: i64,
) -> Result<FeatureVector, PredictionError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(PredictionError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }
    Ok(FeatureVector {
        crime_code,
        latitude,
        longitude,
        location_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_is_fixed() {
        let v = build(3, -1.95, 30.05, 1).unwrap();
        // [crime_code, latitude, longitude, location_code] — the contract
        // with the trained artifact. If this test fails, every stored
        // prediction is invalidated.
        assert_eq!(v.to_array(), [3.0, -1.95, 30.05, 1.0]);
    }

    #[test]
    fn out_of_range_latitude_rejected() {
        let err = build(0, 95.0, 30.05, 0).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidCoordinate { .. }));
    }

    #[test]
    fn out_of_range_longitude_rejected() {
        let err = build(0, -1.95, -200.0, 0).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidCoordinate { .. }));
    }

    #[test]
    fn boundary_values_accepted() {
        assert!(build(0, 90.0, 180.0, 0).is_ok());
        assert!(build(0, -90.0, -180.0, 0).is_ok());
    }
}
