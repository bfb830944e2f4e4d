//! # Gravity Conversion Module
//!
//! Conversions between Brix/Plato, specific gravity and the linear
//! "points-density" scale used for dilution arithmetic.

use crate::brewing_types::GravityUnit;
use crate::errors::CalculationError;

/// Upper bound for Brix/Plato readings before they are considered a typo
pub const MAX_SUGAR_SCALE_READING: f64 = 50.0;

/// Upper bound for specific gravity readings ("52" typed instead of "1.052")
pub const MAX_SPECIFIC_GRAVITY: f64 = 2.0;

/// Convert a reading to points-density.
///
/// Specific gravity maps to `(sg - 1) * 1000`; Brix and Plato use the linear
/// `* 4` approximation.
///
/// # Examples
///
/// ```rust
/// use brewmate::brewing_types::GravityUnit;
/// use brewmate::gravity::to_points_density;
///
/// assert_eq!(to_points_density(13.0, GravityUnit::Brix), 52.0);
/// assert_eq!(to_points_density(13.0, GravityUnit::Plato), 52.0);
/// ```
pub fn to_points_density(gravity: f64, unit: GravityUnit) -> f64 {
    match unit {
        GravityUnit::SpecificGravity => (gravity - 1.0) * 1000.0,
        GravityUnit::Brix | GravityUnit::Plato => gravity * 4.0,
    }
}

/// Specific gravity to Brix, cubic approximation. Readings below 1 give 0.
pub fn sg_to_brix(sg: f64) -> f64 {
    if sg < 1.0 {
        return 0.0;
    }
    -668.962 + (1262.45 * sg) - (776.43 * sg.powf(2.0)) + (182.94 * sg.powf(3.0))
}

/// Brix to specific gravity. Non-positive readings give 1.000.
pub fn brix_to_sg(brix: f64) -> f64 {
    if brix <= 0.0 {
        return 1.0;
    }
    1.0 + (brix / (258.6 - ((brix / 258.2) * 227.1)))
}

/// Validate a volume and a pair of gravity readings for the density calculators.
pub fn validate_readings(
    volume_l: f64,
    unit: GravityUnit,
    measured: f64,
    target: f64,
) -> Result<(), CalculationError> {
    let is_sg = unit == GravityUnit::SpecificGravity;
    let non_positive = |v: f64| !v.is_finite() || v <= 0.0;

    if non_positive(volume_l)
        || non_positive(measured)
        || non_positive(target)
        || (is_sg && (measured < 1.0 || target < 1.0))
    {
        return Err(CalculationError::InvalidDensityInputs);
    }
    if is_sg && (measured > MAX_SPECIFIC_GRAVITY || target > MAX_SPECIFIC_GRAVITY) {
        return Err(CalculationError::SpecificGravityFormat);
    }
    if unit.is_sugar_scale()
        && (measured > MAX_SUGAR_SCALE_READING || target > MAX_SUGAR_SCALE_READING)
    {
        return Err(CalculationError::UnrealisticReading(unit));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_density() {
        assert_eq!(to_points_density(12.5, GravityUnit::Brix), 50.0);
        assert!((to_points_density(1.050, GravityUnit::SpecificGravity) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_sg_to_brix_clamps_below_water() {
        assert_eq!(sg_to_brix(0.998), 0.0);
        let brix = sg_to_brix(1.050);
        assert!(brix > 12.0 && brix < 13.0, "got {brix}");
    }

    #[test]
    fn test_brix_to_sg() {
        assert_eq!(brix_to_sg(0.0), 1.0);
        assert_eq!(brix_to_sg(-3.0), 1.0);
        let sg = brix_to_sg(16.0);
        assert!((sg - 1.0654).abs() < 1e-3, "got {sg}");
    }

    #[test]
    fn test_validate_readings() {
        assert!(validate_readings(20.0, GravityUnit::Brix, 12.0, 12.5).is_ok());
        assert_eq!(
            validate_readings(0.0, GravityUnit::Brix, 12.0, 12.5),
            Err(CalculationError::InvalidDensityInputs)
        );
        assert_eq!(
            validate_readings(20.0, GravityUnit::SpecificGravity, 0.99, 1.05),
            Err(CalculationError::InvalidDensityInputs)
        );
        assert_eq!(
            validate_readings(20.0, GravityUnit::SpecificGravity, 52.0, 1.05),
            Err(CalculationError::SpecificGravityFormat)
        );
        assert_eq!(
            validate_readings(20.0, GravityUnit::Plato, 60.0, 12.0),
            Err(CalculationError::UnrealisticReading(GravityUnit::Plato))
        );
    }
}
