//! # Configuration Module
//!
//! This module defines the chemistry constants used by the pH calculators and
//! the application settings read from the environment.

use log::{info, warn};
use std::env;
use std::str::FromStr;

use crate::brewing_types::WaterProfile;
use crate::localization::Language;

// Titration strengths of the usual additions
pub const LACTIC_ACID_80_MEQ_PER_ML: f64 = 8.1;
pub const PHOSPHORIC_ACID_75_MEQ_PER_ML: f64 = 23.0;
pub const SODIUM_BICARBONATE_MEQ_PER_GRAM: f64 = 11.9;
pub const ACID_MALT_MEQ_PER_100G: f64 = 13.0;
pub const PRE_BOIL_WORT_BUFFERING_MEQ_PER_L_PH: f64 = 3.0;

// Environment variables
pub const ENV_LANGUAGE: &str = "BREWMATE_LANG";
pub const ENV_WATER_CALCIUM: &str = "BREWMATE_WATER_CA";
pub const ENV_WATER_MAGNESIUM: &str = "BREWMATE_WATER_MG";
pub const ENV_WATER_BICARBONATE: &str = "BREWMATE_WATER_HCO3";

/// Buffering capacity per kilogram of malt, in mEq per pH unit
#[derive(Debug, Clone, PartialEq)]
pub struct MaltBufferingFactors {
    pub base: f64,
    pub crystal: f64,
    pub roasted: f64,
}

impl Default for MaltBufferingFactors {
    fn default() -> Self {
        Self {
            base: 33.0,
            crystal: 50.0,
            roasted: 70.0,
        }
    }
}

/// Constants of the mash and pre-boil pH models
#[derive(Debug, Clone, PartialEq)]
pub struct ChemistryFactors {
    /// mEq per mL of 80% lactic acid
    pub lactic_acid_meq_per_ml: f64,
    /// mEq per mL of 75% phosphoric acid
    pub phosphoric_acid_meq_per_ml: f64,
    /// mEq of alkalinity per gram of sodium bicarbonate
    pub bicarbonate_meq_per_gram: f64,
    /// mEq of acidity per 100 g of acidulated malt
    pub acid_malt_meq_per_100g: f64,
    /// Share of residual alkalinity added to the mash buffering
    pub residual_alkalinity_buffering_factor: f64,
    /// Buffering per malt category
    pub malt_buffering: MaltBufferingFactors,
    /// Estimated pre-boil wort buffering, mEq per litre per pH unit
    pub pre_boil_buffering_meq_per_l_ph: f64,
    /// Pre-boil lactic acid dose, mL per litre per pH unit
    pub pre_boil_lactic_ml_per_l_ph: f64,
    /// Pre-boil phosphoric acid dose, mL per litre per pH unit
    pub pre_boil_phosphoric_ml_per_l_ph: f64,
}

impl Default for ChemistryFactors {
    fn default() -> Self {
        Self {
            lactic_acid_meq_per_ml: LACTIC_ACID_80_MEQ_PER_ML,
            phosphoric_acid_meq_per_ml: PHOSPHORIC_ACID_75_MEQ_PER_ML,
            bicarbonate_meq_per_gram: SODIUM_BICARBONATE_MEQ_PER_GRAM,
            acid_malt_meq_per_100g: ACID_MALT_MEQ_PER_100G,
            residual_alkalinity_buffering_factor: 0.08,
            malt_buffering: MaltBufferingFactors::default(),
            pre_boil_buffering_meq_per_l_ph: PRE_BOIL_WORT_BUFFERING_MEQ_PER_L_PH,
            pre_boil_lactic_ml_per_l_ph: 0.5,
            pre_boil_phosphoric_ml_per_l_ph: 0.15,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Language of the calculator messages
    pub language: Language,
    /// Water profile used when none is given on the command line
    pub default_water_profile: WaterProfile,
    /// Chemistry constants
    pub chemistry: ChemistryFactors,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            default_water_profile: WaterProfile::default(),
            chemistry: ChemistryFactors::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from the process environment, after reading a `.env`
    /// file if one is present. Invalid values keep their default.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(code) = lookup(ENV_LANGUAGE) {
            match code.parse::<Language>() {
                Ok(language) => config.language = language,
                Err(e) => warn!("{e}, keeping {}", config.language.code()),
            }
        }

        let water = &mut config.default_water_profile;
        override_number(&lookup, ENV_WATER_CALCIUM, &mut water.calcium_mg_per_l);
        override_number(&lookup, ENV_WATER_MAGNESIUM, &mut water.magnesium_mg_per_l);
        override_number(&lookup, ENV_WATER_BICARBONATE, &mut water.bicarbonate_mg_per_l);

        info!(
            "Configuration: language={}, water Ca={} Mg={} HCO3={}",
            config.language.code(),
            water.calcium_mg_per_l,
            water.magnesium_mg_per_l,
            water.bicarbonate_mg_per_l
        );
        config
    }
}

fn override_number<F>(lookup: &F, key: &str, slot: &mut f64)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match f64::from_str(raw.trim()) {
        Ok(value) if value.is_finite() && value >= 0.0 => *slot = value,
        _ => warn!("Ignoring {}='{}': expected a non-negative number", key, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_chemistry_defaults() {
        let factors = ChemistryFactors::default();

        assert_eq!(factors.lactic_acid_meq_per_ml, 8.1);
        assert_eq!(factors.phosphoric_acid_meq_per_ml, 23.0);
        assert_eq!(factors.bicarbonate_meq_per_gram, 11.9);
        assert_eq!(factors.acid_malt_meq_per_100g, 13.0);
        assert_eq!(factors.malt_buffering.base, 33.0);
        assert_eq!(factors.malt_buffering.crystal, 50.0);
        assert_eq!(factors.malt_buffering.roasted, 70.0);
        assert_eq!(factors.pre_boil_buffering_meq_per_l_ph, 3.0);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_LANGUAGE, "en"),
            (ENV_WATER_CALCIUM, "50"),
            (ENV_WATER_BICARBONATE, "not a number"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.language, Language::English);
        assert_eq!(config.default_water_profile.calcium_mg_per_l, 50.0);
        assert_eq!(config.default_water_profile.magnesium_mg_per_l, 20.7);
        assert_eq!(config.default_water_profile.bicarbonate_mg_per_l, 306.5);
    }

    #[test]
    fn test_config_rejects_negative_minerals() {
        let config = AppConfig::from_lookup(|key| (key == ENV_WATER_MAGNESIUM).then(|| "-3".to_string()));
        assert_eq!(config.default_water_profile.magnesium_mg_per_l, 20.7);
    }
}
