//! # Refractometer Correction Module
//!
//! Alcohol bends light, so a refractometer reading taken after fermentation
//! over-states the remaining sugar. This module corrects the final reading
//! with a cubic model fitted on Brix values and derives the alcohol content.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::brewing_types::GravityUnit;
use crate::errors::CalculationError;
use crate::gravity::{brix_to_sg, sg_to_brix, MAX_SPECIFIC_GRAVITY};
use crate::localization::{t_args_lang, unit_label, Language};
use crate::numeric::{round_to, to_fixed};

/// ABV per unit of specific gravity drop
pub const ABV_FACTOR: f64 = 131.25;

/// Original and final readings, in the same unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefractometerInputs {
    pub unit: GravityUnit,
    /// Reading before fermentation
    pub initial_gravity: f64,
    /// Refractometer reading after fermentation, uncorrected
    pub final_measured_gravity: f64,
}

impl RefractometerInputs {
    pub fn new(unit: GravityUnit, initial_gravity: f64, final_measured_gravity: f64) -> Self {
        Self {
            unit,
            initial_gravity,
            final_measured_gravity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefractometerResult {
    /// Corrected final gravity, in the unit of the inputs
    pub corrected_final_gravity: f64,
    /// Alcohol by volume, in percent
    pub abv: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Correct a final refractometer reading and estimate the ABV
pub fn calculate_refractometer(inputs: &RefractometerInputs, lang: Language) -> RefractometerResult {
    match correct(inputs, lang) {
        Ok(result) => result,
        Err(e) => {
            warn!("Refractometer correction failed: {}", e);
            RefractometerResult {
                error: Some(e.localized(lang)),
                ..Default::default()
            }
        }
    }
}

fn validate(inputs: &RefractometerInputs) -> Result<(), CalculationError> {
    let (initial, last) = (inputs.initial_gravity, inputs.final_measured_gravity);
    let is_sg = inputs.unit == GravityUnit::SpecificGravity;

    if !(initial > 0.0 && last > 0.0) {
        return Err(CalculationError::NonPositiveReadings);
    }
    if is_sg && (initial < 1.0 || last < 1.0) {
        return Err(CalculationError::SpecificGravityBelowOne);
    }
    if is_sg && (initial > MAX_SPECIFIC_GRAVITY || last > MAX_SPECIFIC_GRAVITY) {
        return Err(CalculationError::SpecificGravityFormat);
    }
    if last >= initial {
        return Err(CalculationError::FinalNotBelowInitial(inputs.unit));
    }
    Ok(())
}

fn correct(inputs: &RefractometerInputs, lang: Language) -> Result<RefractometerResult, CalculationError> {
    validate(inputs)?;

    let (og_brix, fg_brix, og_sg) = match inputs.unit {
        GravityUnit::SpecificGravity => (
            sg_to_brix(inputs.initial_gravity),
            sg_to_brix(inputs.final_measured_gravity),
            inputs.initial_gravity,
        ),
        GravityUnit::Brix | GravityUnit::Plato => (
            inputs.initial_gravity,
            inputs.final_measured_gravity,
            brix_to_sg(inputs.initial_gravity),
        ),
    };

    let corrected_sg = corrected_final_sg(og_brix, fg_brix);
    let abv = (og_sg - corrected_sg) * ABV_FACTOR;
    debug!(
        "Refractometer: OG {:.2} Bx / {:.4}, FG {:.2} Bx, corrected FG {:.4}",
        og_brix, og_sg, fg_brix, corrected_sg
    );

    let display = match inputs.unit {
        GravityUnit::SpecificGravity => to_fixed(corrected_sg, 3),
        GravityUnit::Brix | GravityUnit::Plato => to_fixed(sg_to_brix(corrected_sg).max(0.0), 1),
    };
    let abv_display = to_fixed(abv, 2);

    let label = unit_label(inputs.unit, lang);
    let message = [
        t_args_lang(
            "refractometer-corrected-gravity",
            lang,
            &[("value", &display), ("unit", &label)],
        ),
        t_args_lang("refractometer-abv", lang, &[("abv", &abv_display)]),
    ]
    .join("\n");

    info!("Corrected final gravity {} {:?}, ABV {} %", display, inputs.unit, abv_display);

    Ok(RefractometerResult {
        corrected_final_gravity: display.parse().unwrap_or(0.0),
        abv: round_to(abv, 2),
        message,
        error: None,
    })
}

/// Cubic alcohol correction, Brix readings in, specific gravity out
fn corrected_final_sg(og_brix: f64, fg_brix: f64) -> f64 {
    1.0000 - (0.0044993 * og_brix) + (0.011774 * fg_brix) + (0.00027581 * og_brix.powf(2.0))
        - (0.00012717 * fg_brix.powf(2.0))
        - (0.0000072800 * og_brix.powf(3.0))
        + (0.0000063293 * fg_brix.powf(3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brix_correction() {
        let result = calculate_refractometer(
            &RefractometerInputs::new(GravityUnit::Brix, 16.0, 8.0),
            Language::English,
        );

        assert_eq!(result.error, None);
        assert_eq!(result.corrected_final_gravity, 14.3);
        assert_eq!(result.abv, 0.96);
        assert!(result.message.contains('\n'));
        assert!(result.message.contains("°Brix"));
    }

    #[test]
    fn test_specific_gravity_uses_three_decimals() {
        let result = calculate_refractometer(
            &RefractometerInputs::new(GravityUnit::SpecificGravity, 1.060, 1.030),
            Language::French,
        );

        assert_eq!(result.error, None);
        let formatted = to_fixed(result.corrected_final_gravity, 3);
        assert!(result.message.contains(&formatted), "{}", result.message);
        assert_eq!(result.corrected_final_gravity, 1.055);
        assert_eq!(result.abv, 0.7);
    }

    #[test]
    fn test_final_must_be_below_initial() {
        let result = calculate_refractometer(
            &RefractometerInputs::new(GravityUnit::Plato, 10.0, 10.0),
            Language::French,
        );

        assert_eq!(
            result.error,
            Some(CalculationError::FinalNotBelowInitial(GravityUnit::Plato).localized(Language::French))
        );
        assert_eq!(result.abv, 0.0);
        assert_eq!(result.corrected_final_gravity, 0.0);
    }

    #[test]
    fn test_reading_validation() {
        let check = |inputs: RefractometerInputs| validate(&inputs).unwrap_err();

        assert_eq!(
            check(RefractometerInputs::new(GravityUnit::Brix, 0.0, 5.0)),
            CalculationError::NonPositiveReadings
        );
        assert_eq!(
            check(RefractometerInputs::new(GravityUnit::SpecificGravity, 1.05, 0.99)),
            CalculationError::SpecificGravityBelowOne
        );
        assert_eq!(
            check(RefractometerInputs::new(GravityUnit::SpecificGravity, 60.0, 1.01)),
            CalculationError::SpecificGravityFormat
        );
    }
}
