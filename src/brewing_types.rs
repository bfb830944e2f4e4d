//! # Brewing Types Module
//!
//! This module defines the core value types shared by the calculators:
//! gravity units, correction stages and outcomes, water profiles and the
//! malt records extracted from a recipe document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale a gravity reading is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GravityUnit {
    /// Degrees Brix (refractometer scale)
    Brix,
    /// Degrees Plato, handled exactly like Brix
    Plato,
    /// Specific gravity, e.g. 1.052
    SpecificGravity,
}

impl GravityUnit {
    /// Whether readings in this unit are sugar-percentage scales
    pub fn is_sugar_scale(self) -> bool {
        matches!(self, GravityUnit::Brix | GravityUnit::Plato)
    }
}

impl FromStr for GravityUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brix" | "°brix" | "bx" => Ok(GravityUnit::Brix),
            "plato" | "°plato" | "p" => Ok(GravityUnit::Plato),
            "sg" | "specific-gravity" | "specific_gravity" | "di" => {
                Ok(GravityUnit::SpecificGravity)
            }
            other => Err(format!("unknown gravity unit: {other}")),
        }
    }
}

/// Brewing stage a pH correction applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionStage {
    /// Mash: full water chemistry and malt buffering model
    Mash,
    /// Pre-boil: simplified linear model, no malt data
    PreBoil,
}

/// Outcome of a pH correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionType {
    /// pH must go down: add acid
    Acidify,
    /// pH must go up: add sodium bicarbonate
    Alcalinize,
    /// No addition required
    None,
}

/// Mineral content of the brewing water, all in mg/L
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterProfile {
    /// Calcium (Ca2+)
    pub calcium_mg_per_l: f64,
    /// Magnesium (Mg2+)
    pub magnesium_mg_per_l: f64,
    /// Bicarbonate (HCO3-)
    pub bicarbonate_mg_per_l: f64,
}

impl WaterProfile {
    pub fn new(calcium_mg_per_l: f64, magnesium_mg_per_l: f64, bicarbonate_mg_per_l: f64) -> Self {
        Self {
            calcium_mg_per_l,
            magnesium_mg_per_l,
            bicarbonate_mg_per_l,
        }
    }

    /// Hard, bicarbonate-rich tap water of the Lille area, used as default
    pub fn loos() -> Self {
        Self::new(125.0, 20.7, 306.5)
    }

    /// Whether every mineral value is a finite, non-negative number
    pub fn is_valid(&self) -> bool {
        [
            self.calcium_mg_per_l,
            self.magnesium_mg_per_l,
            self.bicarbonate_mg_per_l,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for WaterProfile {
    fn default() -> Self {
        Self::loos()
    }
}

/// Class tag of a fermentable ingredient as found in a recipe document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FermentableKind {
    Grain,
    Adjunct,
    Sugar,
    Extract,
    DryExtract,
    Other(String),
}

impl FermentableKind {
    /// Parse a recipe `TYPE` tag, case-insensitively
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "grain" => FermentableKind::Grain,
            "adjunct" => FermentableKind::Adjunct,
            "sugar" => FermentableKind::Sugar,
            "extract" => FermentableKind::Extract,
            "dry extract" => FermentableKind::DryExtract,
            other => FermentableKind::Other(other.to_string()),
        }
    }

    /// Grains and adjuncts are mashed, everything else is ignored by the mash model
    pub fn is_mashable(&self) -> bool {
        matches!(self, FermentableKind::Grain | FermentableKind::Adjunct)
    }
}

/// A fermentable ingredient with its weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaltRecord {
    /// Ingredient name as written in the recipe (e.g. "Carafa III")
    pub name: String,
    /// Class tag of the ingredient
    pub kind: FermentableKind,
    /// Weight in kilograms
    pub weight_kg: f64,
}

impl MaltRecord {
    pub fn new(name: &str, kind: FermentableKind, weight_kg: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            weight_kg,
        }
    }

    /// Shorthand for a grain record
    pub fn grain(name: &str, weight_kg: f64) -> Self {
        Self::new(name, FermentableKind::Grain, weight_kg)
    }
}

/// Malt category driving the buffering model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaltCategory {
    Base,
    Crystal,
    Roasted,
    SpecialtyAcidic,
    SpecialtyOther,
    Unknown,
}

impl MaltCategory {
    pub const ALL: [MaltCategory; 6] = [
        MaltCategory::Base,
        MaltCategory::Crystal,
        MaltCategory::Roasted,
        MaltCategory::SpecialtyAcidic,
        MaltCategory::SpecialtyOther,
        MaltCategory::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaltCategory::Base => "BASE",
            MaltCategory::Crystal => "CRYSTAL",
            MaltCategory::Roasted => "ROASTED",
            MaltCategory::SpecialtyAcidic => "SPECIALTY_ACIDIC",
            MaltCategory::SpecialtyOther => "SPECIALTY_OTHER",
            MaltCategory::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MaltCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated grain weight per malt category, in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MaltComposition {
    pub base: f64,
    pub crystal: f64,
    pub roasted: f64,
    pub specialty_acidic: f64,
    pub specialty_other: f64,
    pub unknown: f64,
}

impl MaltComposition {
    pub fn add(&mut self, category: MaltCategory, weight_kg: f64) {
        *self.slot_mut(category) += weight_kg;
    }

    pub fn get(&self, category: MaltCategory) -> f64 {
        match category {
            MaltCategory::Base => self.base,
            MaltCategory::Crystal => self.crystal,
            MaltCategory::Roasted => self.roasted,
            MaltCategory::SpecialtyAcidic => self.specialty_acidic,
            MaltCategory::SpecialtyOther => self.specialty_other,
            MaltCategory::Unknown => self.unknown,
        }
    }

    /// Total weight over every category
    pub fn total_kg(&self) -> f64 {
        MaltCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    fn slot_mut(&mut self, category: MaltCategory) -> &mut f64 {
        match category {
            MaltCategory::Base => &mut self.base,
            MaltCategory::Crystal => &mut self.crystal,
            MaltCategory::Roasted => &mut self.roasted,
            MaltCategory::SpecialtyAcidic => &mut self.specialty_acidic,
            MaltCategory::SpecialtyOther => &mut self.specialty_other,
            MaltCategory::Unknown => &mut self.unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_unit_parsing() {
        assert_eq!("brix".parse::<GravityUnit>(), Ok(GravityUnit::Brix));
        assert_eq!("Plato".parse::<GravityUnit>(), Ok(GravityUnit::Plato));
        assert_eq!("SG".parse::<GravityUnit>(), Ok(GravityUnit::SpecificGravity));
        assert!("oechsle".parse::<GravityUnit>().is_err());
    }

    #[test]
    fn test_fermentable_kind_from_tag() {
        assert_eq!(FermentableKind::from_tag("Grain"), FermentableKind::Grain);
        assert_eq!(FermentableKind::from_tag(" ADJUNCT "), FermentableKind::Adjunct);
        assert_eq!(FermentableKind::from_tag("Dry Extract"), FermentableKind::DryExtract);
        assert!(!FermentableKind::from_tag("Sugar").is_mashable());
        assert_eq!(
            FermentableKind::from_tag("fruit"),
            FermentableKind::Other("fruit".to_string())
        );
    }

    #[test]
    fn test_water_profile_validation() {
        assert!(WaterProfile::loos().is_valid());
        assert!(WaterProfile::new(0.0, 0.0, 0.0).is_valid());
        assert!(!WaterProfile::new(-1.0, 0.0, 0.0).is_valid());
        assert!(!WaterProfile::new(10.0, f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_malt_composition_accumulates() {
        let mut composition = MaltComposition::default();
        composition.add(MaltCategory::Base, 4.5);
        composition.add(MaltCategory::Base, 0.5);
        composition.add(MaltCategory::Roasted, 0.25);

        assert_eq!(composition.get(MaltCategory::Base), 5.0);
        assert_eq!(composition.get(MaltCategory::Crystal), 0.0);
        assert_eq!(composition.total_kg(), 5.25);
    }
}
