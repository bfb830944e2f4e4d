//! # Error Types Module
//!
//! This module defines the error types used by the calculators and by the
//! BeerXML extractor. Calculators never let these escape: they are folded into
//! the `error` field of each result as a localized message.

use thiserror::Error;

use crate::brewing_types::GravityUnit;
use crate::localization::{t_args_lang, t_lang, unit_label, Language};

/// Validation and computation failures of the calculators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Volume is zero, negative or not a number
    #[error("volume must be a positive number")]
    InvalidVolume,
    /// Current or target pH outside (0, 14]
    #[error("current and target pH must be within (0, 14]")]
    PhOutOfRange,
    /// Mash calculation without water profile
    #[error("a water profile is required for the mash stage")]
    MissingWaterProfile,
    /// Water profile with a negative or non-numeric mineral value
    #[error("water profile values must be non-negative")]
    InvalidWaterProfile,
    /// Mash calculation without a usable recipe document
    #[error("a valid BeerXML recipe is required for the mash stage (parse failed: {parse_failed})")]
    RecipeRequired { parse_failed: bool },
    /// Recipe document supplied for the pre-boil stage could not be parsed
    #[error("the BeerXML recipe could not be parsed for the pre-boil volume")]
    RecipeUnreadable,
    /// Recipe lists no fermentable at all
    #[error("no fermentable ingredient in the recipe")]
    NoFermentables,
    /// Recipe lists fermentables but no grain or adjunct with a valid weight
    #[error("no grain or adjunct with a valid weight")]
    NoValidGrain,
    /// Computed mash buffering capacity is zero or negative
    #[error("computed mash buffering capacity is zero or negative")]
    NonPositiveBuffering,
    /// Density calculator inputs out of range
    #[error("volume must be positive and specific gravity at least 1")]
    InvalidDensityInputs,
    /// Specific gravity entered in points ("52" instead of "1.052")
    #[error("specific gravity must be entered in full, e.g. 1.052")]
    SpecificGravityFormat,
    /// Brix/Plato reading above the realistic range
    #[error("unrealistic {0:?} reading")]
    UnrealisticReading(GravityUnit),
    /// Target gravity converts to zero points
    #[error("target gravity cannot be zero")]
    ZeroTargetGravity,
    /// Dilution computed a negative amount of water
    #[error("negative amount of water to add")]
    NegativeDilution,
    /// Evaporation computed a negative amount of water
    #[error("negative amount of water to evaporate")]
    NegativeEvaporation,
    /// Refractometer readings zero or negative
    #[error("gravity readings must be positive")]
    NonPositiveReadings,
    /// Refractometer specific gravity reading below water
    #[error("specific gravity readings must be at least 1.000")]
    SpecificGravityBelowOne,
    /// Final refractometer reading not below the original reading
    #[error("final {0:?} reading must be lower than the original reading")]
    FinalNotBelowInitial(GravityUnit),
    /// Kombucha volume zero, negative or not a number
    #[error("desired kombucha volume must be positive")]
    InvalidKombuchaVolume,
    /// Unknown aromatic profile key
    #[error("unknown aromatic profile: {0}")]
    InvalidAromaticProfile(String),
    /// Unknown tea type key
    #[error("unknown tea type: {0}")]
    InvalidTeaType(String),
}

impl CalculationError {
    /// Fluent key of the user-facing message
    pub fn message_key(&self) -> &'static str {
        match self {
            CalculationError::InvalidVolume => "error-volume-not-positive",
            CalculationError::PhOutOfRange => "error-ph-out-of-range",
            CalculationError::MissingWaterProfile => "error-water-profile-required",
            CalculationError::InvalidWaterProfile => "error-water-profile-negative",
            CalculationError::RecipeRequired { .. } => "error-beerxml-required",
            CalculationError::RecipeUnreadable => "error-beerxml-pre-boil",
            CalculationError::NoFermentables => "error-no-fermentables",
            CalculationError::NoValidGrain => "error-no-valid-grain",
            CalculationError::NonPositiveBuffering => "error-buffering-non-positive",
            CalculationError::InvalidDensityInputs => "error-density-invalid-inputs",
            CalculationError::SpecificGravityFormat => "error-sg-format",
            CalculationError::UnrealisticReading(_) => "error-unrealistic-reading",
            CalculationError::ZeroTargetGravity => "error-target-gravity-zero",
            CalculationError::NegativeDilution => "error-dilution-computation",
            CalculationError::NegativeEvaporation => "error-evaporation-computation",
            CalculationError::NonPositiveReadings => "error-readings-not-positive",
            CalculationError::SpecificGravityBelowOne => "error-sg-below-one",
            CalculationError::FinalNotBelowInitial(_) => "error-final-not-below-initial",
            CalculationError::InvalidKombuchaVolume => "error-kombucha-volume",
            CalculationError::InvalidAromaticProfile(_) => "error-kombucha-profile",
            CalculationError::InvalidTeaType(_) => "error-kombucha-tea",
        }
    }

    /// Message shown to the user, in the requested language
    pub fn localized(&self, lang: Language) -> String {
        let key = self.message_key();
        match self {
            CalculationError::RecipeRequired { parse_failed } => {
                let message = t_lang(key, lang);
                if *parse_failed {
                    format!("{} {}", message, t_lang("error-beerxml-parse", lang))
                } else {
                    message
                }
            }
            CalculationError::RecipeUnreadable => {
                let detail = t_lang("error-beerxml-parse", lang);
                t_args_lang(key, lang, &[("detail", &detail)])
            }
            CalculationError::UnrealisticReading(unit)
            | CalculationError::FinalNotBelowInitial(unit) => {
                let label = unit_label(*unit, lang);
                t_args_lang(key, lang, &[("unit", &label)])
            }
            _ => t_lang(key, lang),
        }
    }
}

/// Failures while reading a BeerXML recipe document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeerXmlError {
    /// The document is not well-formed XML
    #[error("malformed BeerXML document: {0}")]
    Malformed(String),
    /// The document could not be read from disk
    #[error("cannot read BeerXML file {path}: {message}")]
    Io { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_has_a_translation() {
        let errors = vec![
            CalculationError::InvalidVolume,
            CalculationError::PhOutOfRange,
            CalculationError::MissingWaterProfile,
            CalculationError::InvalidWaterProfile,
            CalculationError::RecipeRequired { parse_failed: true },
            CalculationError::RecipeUnreadable,
            CalculationError::NoFermentables,
            CalculationError::NoValidGrain,
            CalculationError::NonPositiveBuffering,
            CalculationError::InvalidDensityInputs,
            CalculationError::SpecificGravityFormat,
            CalculationError::UnrealisticReading(GravityUnit::Brix),
            CalculationError::ZeroTargetGravity,
            CalculationError::NegativeDilution,
            CalculationError::NegativeEvaporation,
            CalculationError::NonPositiveReadings,
            CalculationError::SpecificGravityBelowOne,
            CalculationError::FinalNotBelowInitial(GravityUnit::SpecificGravity),
            CalculationError::InvalidKombuchaVolume,
            CalculationError::InvalidAromaticProfile("X".to_string()),
            CalculationError::InvalidTeaType("Y".to_string()),
        ];

        for error in errors {
            for lang in [Language::French, Language::English] {
                let message = error.localized(lang);
                assert!(!message.is_empty());
                assert!(
                    !message.starts_with("Missing translation"),
                    "{:?} in {:?}: {}",
                    error,
                    lang,
                    message
                );
            }
        }
    }

    #[test]
    fn test_unit_placeholder_is_filled() {
        let message =
            CalculationError::FinalNotBelowInitial(GravityUnit::SpecificGravity).localized(Language::French);
        assert!(message.contains("Densité spécifique"));

        let message = CalculationError::UnrealisticReading(GravityUnit::Plato).localized(Language::French);
        assert!(message.contains("°Plato"));
    }

    #[test]
    fn test_recipe_required_appends_parse_detail() {
        let plain = CalculationError::RecipeRequired { parse_failed: false }.localized(Language::French);
        let detailed = CalculationError::RecipeRequired { parse_failed: true }.localized(Language::French);
        assert!(detailed.starts_with(&plain));
        assert!(detailed.len() > plain.len());
    }
}
