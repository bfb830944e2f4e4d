//! # pH Correction Module
//!
//! This module computes the acid or sodium bicarbonate addition needed to move
//! the wort pH to a target value, at two stages of the brew day:
//!
//! - **Mash**: water residual alkalinity plus malt buffering capacity, with the
//!   acidity already brought by acidulated malt taken into account.
//! - **Pre-boil**: a simplified linear model that needs no malt data.
//!
//! Every public function returns a [`PhCalculationResult`]. Failures are
//! reported in its `error` field as a localized message.
//!
//! ## Usage
//!
//! ```rust
//! use brewmate::brewing_types::{CorrectionType, MaltRecord, WaterProfile};
//! use brewmate::config::ChemistryFactors;
//! use brewmate::localization::Language;
//! use brewmate::ph_calculator::{calculate_mash_correction, PhMeasurements};
//!
//! let result = calculate_mash_correction(
//!     &PhMeasurements::new(5.7, 5.3, 20.0),
//!     Some(WaterProfile::loos()),
//!     &[MaltRecord::grain("Pilsner", 5.0)],
//!     &ChemistryFactors::default(),
//!     Language::English,
//! );
//!
//! assert_eq!(result.correction_type, CorrectionType::Acidify);
//! assert!(result.lactic_acid_ml > 0.0);
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::beerxml::{parse_recipe, RecipeExtract};
use crate::brewing_types::{CorrectionStage, CorrectionType, MaltComposition, MaltRecord, WaterProfile};
use crate::config::ChemistryFactors;
use crate::errors::CalculationError;
use crate::localization::{t_lang, Language};
use crate::malt_classifier::compose;
use crate::numeric::round_to;

/// Below this pH difference the wort is considered on target
pub const PH_TOLERANCE: f64 = 0.001;

/// Molar mass ratio converting HCO3- to CaCO3 alkalinity
const BICARBONATE_TO_CACO3: f64 = 50.0 / 61.0168;

/// pH readings and the volume they apply to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhMeasurements {
    pub current_ph: f64,
    pub target_ph: f64,
    /// Mash water or pre-boil wort volume, in litres
    pub volume_l: f64,
}

impl PhMeasurements {
    pub fn new(current_ph: f64, target_ph: f64, volume_l: f64) -> Self {
        Self {
            current_ph,
            target_ph,
            volume_l,
        }
    }

    fn ph_delta(&self) -> f64 {
        self.current_ph - self.target_ph
    }
}

/// Intermediate values of a pH calculation, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhCalculationDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_alkalinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mash_buffering: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_meq_needed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meq_from_acid_malt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_meq_needed_for_acidification: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meq_to_alkalinize: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub malt_composition: Option<MaltComposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detected_mash_volume_l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detected_pre_boil_volume_l: Option<f64>,
}

impl PhCalculationDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a pH correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhCalculationResult {
    pub correction_type: CorrectionType,
    /// 80% lactic acid, mL
    pub lactic_acid_ml: f64,
    /// 75% phosphoric acid, mL (alternative to the lactic acid dose)
    pub phosphoric_acid_ml: f64,
    /// Sodium bicarbonate, g
    pub bicarbonate_grams: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<PhCalculationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inputs of the stage dispatcher [`calculate_ph_correction`]
#[derive(Debug, Clone, PartialEq)]
pub struct PhCalculationInputs {
    pub stage: CorrectionStage,
    pub measurements: PhMeasurements,
    /// BeerXML recipe document, required for the mash stage
    pub beer_xml: Option<String>,
    /// Brewing water, required for the mash stage
    pub water_profile: Option<WaterProfile>,
}

/// A computed correction, before localization
#[derive(Debug, Clone, Copy, PartialEq)]
struct Correction {
    correction_type: CorrectionType,
    lactic_acid_ml: f64,
    phosphoric_acid_ml: f64,
    bicarbonate_grams: f64,
    message_key: &'static str,
}

impl Correction {
    fn none(message_key: &'static str) -> Self {
        Self {
            correction_type: CorrectionType::None,
            lactic_acid_ml: 0.0,
            phosphoric_acid_ml: 0.0,
            bicarbonate_grams: 0.0,
            message_key,
        }
    }

    fn acidify(lactic_acid_ml: f64, phosphoric_acid_ml: f64, message_key: &'static str) -> Self {
        Self {
            correction_type: CorrectionType::Acidify,
            lactic_acid_ml: round_to(lactic_acid_ml, 2),
            phosphoric_acid_ml: round_to(phosphoric_acid_ml, 2),
            bicarbonate_grams: 0.0,
            message_key,
        }
    }

    fn alcalinize(bicarbonate_grams: f64, message_key: &'static str) -> Self {
        Self {
            correction_type: CorrectionType::Alcalinize,
            lactic_acid_ml: 0.0,
            phosphoric_acid_ml: 0.0,
            bicarbonate_grams: round_to(bicarbonate_grams, 2),
            message_key,
        }
    }
}

/// Mash stage correction from a list of fermentable records
pub fn calculate_mash_correction(
    measurements: &PhMeasurements,
    water_profile: Option<WaterProfile>,
    records: &[MaltRecord],
    factors: &ChemistryFactors,
    lang: Language,
) -> PhCalculationResult {
    let mut details = PhCalculationDetails::default();
    let outcome = mash_correction(measurements, water_profile, records, factors, &mut details);
    build_result(outcome, details, lang)
}

/// Pre-boil stage correction, simplified linear model
pub fn calculate_pre_boil_correction(
    measurements: &PhMeasurements,
    factors: &ChemistryFactors,
    lang: Language,
) -> PhCalculationResult {
    let mut details = PhCalculationDetails::default();
    let outcome = pre_boil_correction(measurements, factors, &mut details);
    build_result(outcome, details, lang)
}

/// Route a correction request to the engine of its stage.
///
/// The BeerXML document, when supplied, is parsed here: its fermentables feed
/// the mash model, and the volume it declares for the stage is reported in
/// the details.
pub fn calculate_ph_correction(
    inputs: &PhCalculationInputs,
    factors: &ChemistryFactors,
    lang: Language,
) -> PhCalculationResult {
    let mut details = PhCalculationDetails::default();
    let outcome = dispatch(inputs, factors, &mut details);
    build_result(outcome, details, lang)
}

fn dispatch(
    inputs: &PhCalculationInputs,
    factors: &ChemistryFactors,
    details: &mut PhCalculationDetails,
) -> Result<Correction, CalculationError> {
    validate_measurements(&inputs.measurements)?;

    let recipe: Option<Result<RecipeExtract, _>> = inputs.beer_xml.as_deref().map(parse_recipe);
    if let Some(Err(e)) = &recipe {
        warn!("BeerXML document rejected: {}", e);
    }
    let extract = recipe.as_ref().and_then(|r| r.as_ref().ok());
    let parse_failed = matches!(recipe, Some(Err(_)));

    match inputs.stage {
        CorrectionStage::Mash => {
            details.auto_detected_mash_volume_l =
                extract.and_then(|r| r.mash_infuse_volume_l).map(|v| round_to(v, 2));
            let extract = extract.ok_or(CalculationError::RecipeRequired { parse_failed })?;
            mash_correction(
                &inputs.measurements,
                inputs.water_profile,
                &extract.fermentables,
                factors,
                details,
            )
        }
        CorrectionStage::PreBoil => {
            details.auto_detected_pre_boil_volume_l =
                extract.and_then(|r| r.boil_size_l).map(|v| round_to(v, 2));
            if parse_failed {
                return Err(CalculationError::RecipeUnreadable);
            }
            pre_boil_correction(&inputs.measurements, factors, details)
        }
    }
}

fn validate_measurements(measurements: &PhMeasurements) -> Result<(), CalculationError> {
    if !measurements.volume_l.is_finite() || measurements.volume_l <= 0.0 {
        return Err(CalculationError::InvalidVolume);
    }
    let in_range = |ph: f64| ph.is_finite() && ph > 0.0 && ph <= 14.0;
    if !in_range(measurements.current_ph) || !in_range(measurements.target_ph) {
        return Err(CalculationError::PhOutOfRange);
    }
    Ok(())
}

fn mash_correction(
    measurements: &PhMeasurements,
    water_profile: Option<WaterProfile>,
    records: &[MaltRecord],
    factors: &ChemistryFactors,
    details: &mut PhCalculationDetails,
) -> Result<Correction, CalculationError> {
    validate_measurements(measurements)?;
    let water = water_profile.ok_or(CalculationError::MissingWaterProfile)?;
    if !water.is_valid() {
        return Err(CalculationError::InvalidWaterProfile);
    }
    if records.is_empty() {
        return Err(CalculationError::NoFermentables);
    }

    let bill = compose(records);
    if bill.total_grain_kg <= 0.0 {
        details.malt_composition = Some(rounded_composition(&bill.composition));
        return Err(CalculationError::NoValidGrain);
    }

    let ph_delta = measurements.ph_delta();
    if ph_delta.abs() < PH_TOLERANCE {
        return Ok(Correction::none("ph-already-at-target"));
    }

    let meq_from_acid_malt = (bill.acid_malt_kg * 1000.0 / 100.0) * factors.acid_malt_meq_per_100g;

    let alkalinity_caco3 = water.bicarbonate_mg_per_l * BICARBONATE_TO_CACO3;
    let residual_alkalinity =
        alkalinity_caco3 - (water.calcium_mg_per_l / 1.4 + water.magnesium_mg_per_l / 1.7);

    let buffering = &factors.malt_buffering;
    let composition = &bill.composition;
    let malt_buffering = composition.base * buffering.base
        + composition.crystal * buffering.crystal
        + composition.roasted * buffering.roasted;
    let total_mash_buffering =
        malt_buffering + residual_alkalinity * factors.residual_alkalinity_buffering_factor;

    // Positive when the pH must go down
    let initial_meq_needed = total_mash_buffering * ph_delta;

    details.residual_alkalinity = Some(round_to(residual_alkalinity, 2));
    details.total_mash_buffering = Some(round_to(total_mash_buffering, 2));
    details.malt_composition = Some(rounded_composition(composition));
    details.meq_from_acid_malt = Some(round_to(meq_from_acid_malt, 2));
    details.initial_meq_needed = Some(round_to(initial_meq_needed, 2));

    debug!(
        "Mash: RA={:.2}, malt buffering={:.2}, total buffering={:.2}, acid malt mEq={:.2}",
        residual_alkalinity, malt_buffering, total_mash_buffering, meq_from_acid_malt
    );

    if total_mash_buffering <= 0.0 {
        return Err(CalculationError::NonPositiveBuffering);
    }

    if ph_delta > 0.0 {
        let net_meq = initial_meq_needed - meq_from_acid_malt;
        details.net_meq_needed_for_acidification = Some(round_to(net_meq, 2));

        if net_meq <= 0.0 {
            info!("Acid malt covers the {:.2} mEq acidification need", initial_meq_needed);
            return Ok(Correction::none("ph-acid-malt-sufficient"));
        }
        Ok(Correction::acidify(
            net_meq / factors.lactic_acid_meq_per_ml,
            net_meq / factors.phosphoric_acid_meq_per_ml,
            "ph-acid-needed",
        ))
    } else {
        let meq_to_alkalinize = initial_meq_needed.abs() + meq_from_acid_malt;
        details.meq_to_alkalinize = Some(round_to(meq_to_alkalinize, 2));

        if meq_to_alkalinize <= 0.0 {
            return Ok(Correction::none("ph-no-alkalinization"));
        }
        Ok(Correction::alcalinize(
            meq_to_alkalinize / factors.bicarbonate_meq_per_gram,
            "ph-bicarbonate-needed",
        ))
    }
}

fn pre_boil_correction(
    measurements: &PhMeasurements,
    factors: &ChemistryFactors,
    details: &mut PhCalculationDetails,
) -> Result<Correction, CalculationError> {
    validate_measurements(measurements)?;

    let ph_delta = measurements.ph_delta();
    let volume = measurements.volume_l;
    if ph_delta.abs() < PH_TOLERANCE {
        return Ok(Correction::none("ph-already-at-target"));
    }

    if ph_delta > 0.0 {
        Ok(Correction::acidify(
            factors.pre_boil_lactic_ml_per_l_ph * volume * ph_delta,
            factors.pre_boil_phosphoric_ml_per_l_ph * volume * ph_delta,
            "ph-pre-boil-acid",
        ))
    } else {
        let meq = factors.pre_boil_buffering_meq_per_l_ph * volume * ph_delta.abs();
        details.meq_to_alkalinize = Some(round_to(meq, 2));
        Ok(Correction::alcalinize(
            meq / factors.bicarbonate_meq_per_gram,
            "ph-pre-boil-bicarbonate",
        ))
    }
}

fn rounded_composition(composition: &MaltComposition) -> MaltComposition {
    MaltComposition {
        base: round_to(composition.base, 2),
        crystal: round_to(composition.crystal, 2),
        roasted: round_to(composition.roasted, 2),
        specialty_acidic: round_to(composition.specialty_acidic, 2),
        specialty_other: round_to(composition.specialty_other, 2),
        unknown: round_to(composition.unknown, 2),
    }
}

fn build_result(
    outcome: Result<Correction, CalculationError>,
    details: PhCalculationDetails,
    lang: Language,
) -> PhCalculationResult {
    let details = (!details.is_empty()).then_some(details);

    match outcome {
        Ok(correction) => {
            info!(
                "pH correction {:?}: lactic {} mL, phosphoric {} mL, bicarbonate {} g",
                correction.correction_type,
                correction.lactic_acid_ml,
                correction.phosphoric_acid_ml,
                correction.bicarbonate_grams
            );
            PhCalculationResult {
                correction_type: correction.correction_type,
                lactic_acid_ml: correction.lactic_acid_ml,
                phosphoric_acid_ml: correction.phosphoric_acid_ml,
                bicarbonate_grams: correction.bicarbonate_grams,
                message: t_lang(correction.message_key, lang),
                details,
                error: None,
            }
        }
        Err(e) => {
            warn!("pH correction failed: {}", e);
            PhCalculationResult {
                correction_type: CorrectionType::None,
                lactic_acid_ml: 0.0,
                phosphoric_acid_ml: 0.0,
                bicarbonate_grams: 0.0,
                message: String::new(),
                details,
                error: Some(e.localized(lang)),
            }
        }
    }
}
