//! # Gravity Correction Module
//!
//! Pre-boil and post-boil gravity correction: how much water to add or boil
//! off, or how much sugar to add, to move a wort to its target gravity.
//!
//! Gravities are compared on the linear points-density scale (see
//! [`crate::gravity::to_points_density`]), so the dilution rule
//! `V_target = V * measured / target` holds in every unit.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::brewing_types::GravityUnit;
use crate::errors::CalculationError;
use crate::gravity::{to_points_density, validate_readings};
use crate::localization::{t_args_lang, t_lang, Language};
use crate::numeric::to_fixed;

/// Points-density gained per gram of sucrose per litre
pub const SUCROSE_POINTS_PER_GRAM_PER_L: f64 = 0.4;

/// Wort volume and gravity readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityInputs {
    /// Wort volume, in litres
    pub volume_l: f64,
    pub unit: GravityUnit,
    pub measured_gravity: f64,
    pub target_gravity: f64,
}

impl DensityInputs {
    pub fn new(volume_l: f64, unit: GravityUnit, measured_gravity: f64, target_gravity: f64) -> Self {
        Self {
            volume_l,
            unit,
            measured_gravity,
            target_gravity,
        }
    }
}

/// Result of the pre-boil correction. At most one amount is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreBoilDensityResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_to_add: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_to_evaporate: Option<f64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Kind of post-boil correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionKind {
    Dilute,
    Evaporate,
    AddSugarCandy,
    AddSugarPowder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountUnit {
    Litres,
    Grams,
}

/// One way of correcting a post-boil gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCorrectionOption {
    pub kind: OptionKind,
    pub amount: f64,
    pub unit: AmountUnit,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of the post-boil correction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostBoilDensityResult {
    pub options: Vec<DensityCorrectionOption>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate the readings and convert them to points-density
fn to_points(inputs: &DensityInputs) -> Result<(f64, f64), CalculationError> {
    validate_readings(
        inputs.volume_l,
        inputs.unit,
        inputs.measured_gravity,
        inputs.target_gravity,
    )?;

    let current = to_points_density(inputs.measured_gravity, inputs.unit);
    let target = to_points_density(inputs.target_gravity, inputs.unit);
    if target == 0.0 {
        return Err(CalculationError::ZeroTargetGravity);
    }

    debug!("Points-density: current={}, target={}", current, target);
    Ok((current, target))
}

/// Volume at which the current sugar content reaches the target gravity
fn volume_at_target(volume_l: f64, current: f64, target: f64) -> f64 {
    (volume_l * current) / target
}

/// Water to add or to boil off before the boil
pub fn calculate_pre_boil_density(inputs: &DensityInputs, lang: Language) -> PreBoilDensityResult {
    match pre_boil(inputs, lang) {
        Ok(result) => result,
        Err(e) => {
            warn!("Pre-boil gravity correction failed: {}", e);
            PreBoilDensityResult {
                error: Some(e.localized(lang)),
                ..Default::default()
            }
        }
    }
}

fn pre_boil(inputs: &DensityInputs, lang: Language) -> Result<PreBoilDensityResult, CalculationError> {
    let (current, target) = to_points(inputs)?;

    if current == target {
        return Ok(PreBoilDensityResult {
            message: t_lang("density-pre-boil-at-target", lang),
            ..Default::default()
        });
    }

    let volume_target = volume_at_target(inputs.volume_l, current, target);

    if current > target {
        let water_to_add = volume_target - inputs.volume_l;
        if water_to_add < 0.0 {
            return Err(CalculationError::NegativeDilution);
        }
        info!("Pre-boil: add {:.2} L of water", water_to_add);
        Ok(PreBoilDensityResult {
            water_to_add: Some(water_to_add),
            message: t_args_lang(
                "density-pre-boil-dilute",
                lang,
                &[("amount", &to_fixed(water_to_add, 2))],
            ),
            ..Default::default()
        })
    } else {
        let water_to_evaporate = inputs.volume_l - volume_target;
        if water_to_evaporate < 0.0 {
            return Err(CalculationError::NegativeEvaporation);
        }
        info!("Pre-boil: evaporate {:.2} L of water", water_to_evaporate);
        Ok(PreBoilDensityResult {
            water_to_evaporate: Some(water_to_evaporate),
            message: t_args_lang(
                "density-pre-boil-evaporate",
                lang,
                &[("amount", &to_fixed(water_to_evaporate, 2))],
            ),
            ..Default::default()
        })
    }
}

/// Correction options once the boil is over
pub fn calculate_post_boil_density(inputs: &DensityInputs, lang: Language) -> PostBoilDensityResult {
    match post_boil(inputs, lang) {
        Ok(result) => result,
        Err(e) => {
            warn!("Post-boil gravity correction failed: {}", e);
            PostBoilDensityResult {
                error: Some(e.localized(lang)),
                ..Default::default()
            }
        }
    }
}

fn post_boil(inputs: &DensityInputs, lang: Language) -> Result<PostBoilDensityResult, CalculationError> {
    let (current, target) = to_points(inputs)?;
    let volume = inputs.volume_l;

    if current == target {
        return Ok(PostBoilDensityResult {
            options: Vec::new(),
            message: t_lang("density-post-boil-at-target", lang),
            error: None,
        });
    }

    let mut options = Vec::new();

    if current > target {
        let water_to_add = volume_at_target(volume, current, target) - volume;
        if water_to_add < 0.0 {
            return Err(CalculationError::NegativeDilution);
        }
        options.push(correction_option(
            OptionKind::Dilute,
            water_to_add,
            lang,
        ));
        return Ok(PostBoilDensityResult {
            options,
            message: t_lang("density-post-boil-too-high", lang),
            error: None,
        });
    }

    let water_to_evaporate = volume - volume_at_target(volume, current, target);
    if water_to_evaporate > 0.0 {
        options.push(correction_option(OptionKind::Evaporate, water_to_evaporate, lang));
    }

    let points_deficit = (target - current) * volume;
    let sugar_grams = points_deficit / SUCROSE_POINTS_PER_GRAM_PER_L;
    if sugar_grams > 0.0 {
        options.push(correction_option(OptionKind::AddSugarCandy, sugar_grams, lang));
        options.push(correction_option(OptionKind::AddSugarPowder, sugar_grams, lang));
    }

    info!("Post-boil: {} correction options", options.len());
    Ok(PostBoilDensityResult {
        options,
        message: t_lang("density-post-boil-too-low", lang),
        error: None,
    })
}

fn correction_option(kind: OptionKind, amount: f64, lang: Language) -> DensityCorrectionOption {
    let (description_key, warning_key, unit) = match kind {
        OptionKind::Dilute => ("option-dilute", "option-dilute-warning", AmountUnit::Litres),
        OptionKind::Evaporate => ("option-evaporate", "option-evaporate-warning", AmountUnit::Litres),
        OptionKind::AddSugarCandy => ("option-sugar-candy", "option-sugar-warning", AmountUnit::Grams),
        OptionKind::AddSugarPowder => ("option-sugar-powder", "option-sugar-warning", AmountUnit::Grams),
    };

    DensityCorrectionOption {
        kind,
        amount,
        unit,
        description: t_args_lang(description_key, lang, &[("amount", &to_fixed(amount, 2))]),
        warning: Some(t_lang(warning_key, lang)),
    }
}
