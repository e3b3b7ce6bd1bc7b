//! Error types for the `plantplan-core` crate.
//!
//! Zone and session operations return [`PlanError`]. Validation always runs
//! before any mutation, so an `Err` leaves the registry exactly as it was.
//! A catalog miss is not an error: it is the
//! [`CatalogLookup::NotFound`](crate::catalog::CatalogLookup::NotFound) value.

use plantplan_types::ZoneId;

/// Errors that can occur during zone and session operations.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A boundary has fewer than three vertices.
    #[error("boundary has {vertices} vertices, at least 3 are required")]
    InvalidGeometry {
        /// Number of vertices supplied.
        vertices: usize,
    },

    /// A planting density is not a positive finite number.
    #[error("invalid planting density: {input}")]
    InvalidInput {
        /// The rejected input as text.
        input: String,
    },

    /// The zone is not part of the current drawing.
    #[error("zone not found: {0}")]
    ZoneNotFound(ZoneId),

    /// The drawing import collaborator could not produce boundaries.
    #[error("drawing import failed: {message}")]
    ImportFailure {
        /// Description of the import failure.
        message: String,
    },
}

/// Validate a planting density.
///
/// # Errors
///
/// Returns [`PlanError::InvalidInput`] for zero, negative, NaN or infinite
/// values.
pub fn validate_density(density: f64) -> Result<f64, PlanError> {
    if density.is_finite() && density > 0.0 {
        Ok(density)
    } else {
        Err(PlanError::InvalidInput {
            input: density.to_string(),
        })
    }
}

/// Parse a density typed by the user.
///
/// # Errors
///
/// Returns [`PlanError::InvalidInput`] if the text is not a number or the
/// number is not a positive finite value.
pub fn parse_density(text: &str) -> Result<f64, PlanError> {
    let trimmed = text.trim();
    let value: f64 = trimmed.parse().map_err(|_parse| PlanError::InvalidInput {
        input: trimmed.to_owned(),
    })?;
    validate_density(value).map_err(|_rejected| PlanError::InvalidInput {
        input: trimmed.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_density_accepted() {
        assert!(validate_density(7.0).is_ok());
        assert!(validate_density(0.25).is_ok());
    }

    #[test]
    fn non_positive_density_rejected() {
        assert!(matches!(
            validate_density(0.0),
            Err(PlanError::InvalidInput { .. })
        ));
        assert!(validate_density(-3.0).is_err());
        assert!(validate_density(f64::NAN).is_err());
        assert!(validate_density(f64::INFINITY).is_err());
    }

    #[test]
    fn parse_density_text() {
        assert!(parse_density(" 5 ").is_ok_and(|d| (d - 5.0).abs() < f64::EPSILON));
        let err = parse_density("seven");
        assert!(matches!(err, Err(PlanError::InvalidInput { ref input }) if input == "seven"));
        assert!(parse_density("-1").is_err());
    }
}
