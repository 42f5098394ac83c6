use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::Coordinate;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, field: &str, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { field: field.to_string(), reason });
    }

    /// All reasons joined into one message
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validate an inbound WGS84 coordinate
pub fn validate_coordinate(coordinate: &Coordinate) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if !coordinate.lat.is_finite() {
        result.add_error("lat", "must be finite".to_string());
    } else if !(-90.0..=90.0).contains(&coordinate.lat) {
        result.add_error("lat", format!("{} is outside [-90, 90]", coordinate.lat));
    }

    if !coordinate.lon.is_finite() {
        result.add_error("lon", "must be finite".to_string());
    } else if !(-180.0..=180.0).contains(&coordinate.lon) {
        result.add_error("lon", format!("{} is outside [-180, 180]", coordinate.lon));
    }

    result
}

/// Reject invalid coordinates with `WalkshedError::InvalidCoordinate`
pub fn ensure_valid(coordinate: &Coordinate) -> Result<()> {
    let result = validate_coordinate(coordinate);
    if result.is_valid {
        Ok(())
    } else {
        Err(WalkshedError::InvalidCoordinate {
            lat: coordinate.lat,
            lon: coordinate.lon,
            reason: result.summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        assert!(validate_coordinate(&Coordinate::new(40.0, -75.0)).is_valid);
        assert!(validate_coordinate(&Coordinate::new(-90.0, 180.0)).is_valid);
    }

    #[test]
    fn test_out_of_range() {
        let result = validate_coordinate(&Coordinate::new(91.0, -181.0));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].field, "lat");
        assert_eq!(result.errors[1].field, "lon");
    }

    #[test]
    fn test_non_finite() {
        let err = ensure_valid(&Coordinate::new(f64::NAN, 0.0)).unwrap_err();
        match err {
            WalkshedError::InvalidCoordinate { reason, .. } => {
                assert!(reason.contains("lat: must be finite"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
