//! # Kombucha Recipe Module
//!
//! Scales a first-fermentation (F1) kombucha recipe to the desired volume and
//! writes out the ingredient list and the brewing steps.
//!
//! ## Usage
//!
//! ```rust
//! use brewmate::kombucha::{generate_kombucha_recipe, KombuchaRecipeInputs};
//! use brewmate::kombucha_data::{AromaticProfile, TeaType};
//! use brewmate::localization::Language;
//!
//! let inputs = KombuchaRecipeInputs::new(4.0, AromaticProfile::ClassicBalanced, TeaType::BlackTea);
//! let recipe = generate_kombucha_recipe(&inputs, Language::English);
//!
//! assert!(recipe.error.is_none());
//! assert_eq!(recipe.quantities.unwrap().tea_grams, 28.0);
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::CalculationError;
use crate::kombucha_data::{
    taste_key, AromaticProfile, TeaType, HOT_WATER_RATIO, INOCULATION_TEMPERATURE, STARTER_RATIO,
};
use crate::localization::{t_args_lang, t_lang, Language};
use crate::numeric::{round_to, to_fixed};

/// Recipe request. Profile and tea are given by key, as typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KombuchaRecipeInputs {
    /// Final batch volume, in litres
    pub desired_volume_l: f64,
    /// e.g. `CLASSIC_BALANCED`
    pub aromatic_profile_key: String,
    /// e.g. `BLACK_TEA` or `BLACK`
    pub tea_type_key: String,
}

impl KombuchaRecipeInputs {
    pub fn new(desired_volume_l: f64, profile: AromaticProfile, tea: TeaType) -> Self {
        Self {
            desired_volume_l,
            aromatic_profile_key: profile.key().to_string(),
            tea_type_key: tea.key().to_string(),
        }
    }
}

/// Scaled quantities, rounded the way they are displayed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KombuchaQuantities {
    pub tea_grams: f64,
    pub sugar_grams: f64,
    pub starter_liquid_l: f64,
    pub total_water_l: f64,
    pub hot_water_l: f64,
    pub cold_water_l: f64,
    pub infusion_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KombuchaIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KombuchaInstructionStep {
    pub step: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KombuchaRecipeResult {
    pub title: String,
    pub expected_taste_profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantities: Option<KombuchaQuantities>,
    pub ingredients: Vec<KombuchaIngredient>,
    pub instructions: Vec<KombuchaInstructionStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build a kombucha recipe. Invalid inputs give an empty recipe with `error` set.
pub fn generate_kombucha_recipe(inputs: &KombuchaRecipeInputs, lang: Language) -> KombuchaRecipeResult {
    match generate(inputs, lang) {
        Ok(recipe) => recipe,
        Err(e) => {
            warn!("Kombucha recipe rejected: {}", e);
            KombuchaRecipeResult {
                error: Some(e.localized(lang)),
                ..Default::default()
            }
        }
    }
}

fn generate(inputs: &KombuchaRecipeInputs, lang: Language) -> Result<KombuchaRecipeResult, CalculationError> {
    let volume = inputs.desired_volume_l;
    if !volume.is_finite() || volume <= 0.0 {
        return Err(CalculationError::InvalidKombuchaVolume);
    }
    let profile = AromaticProfile::from_key(&inputs.aromatic_profile_key)
        .ok_or_else(|| CalculationError::InvalidAromaticProfile(inputs.aromatic_profile_key.clone()))?;
    let tea = TeaType::from_key(&inputs.tea_type_key)
        .ok_or_else(|| CalculationError::InvalidTeaType(inputs.tea_type_key.clone()))?;

    let rates = profile.rates();
    let starter_liquid_l = volume * STARTER_RATIO;
    let tea_grams = volume * rates.tea_grams_per_liter;
    let sugar_grams = volume * rates.sugar_grams_per_liter;
    let total_water_l = volume - starter_liquid_l;
    let hot_water_l = total_water_l * HOT_WATER_RATIO;
    let cold_water_l = total_water_l - hot_water_l;
    let minutes = tea.infusion_minutes();

    debug!(
        "Kombucha {} L {}/{}: tea {} g, sugar {} g, starter {} L",
        volume, profile, tea, tea_grams, sugar_grams, starter_liquid_l
    );

    let tea_label = tea.key().replace('_', " ").to_lowercase();
    let piece = t_lang("ingredient-unit-piece", lang);
    let ingredients = vec![
        ingredient(t_lang("ingredient-total-water", lang), round_to(total_water_l, 2), "L"),
        ingredient(
            t_args_lang("ingredient-tea", lang, &[("tea", &tea_label)]),
            round_to(tea_grams, 1),
            "g",
        ),
        ingredient(t_lang("ingredient-sugar", lang), round_to(sugar_grams, 1), "g"),
        ingredient(t_lang("ingredient-starter", lang), round_to(starter_liquid_l, 2), "L"),
        ingredient(t_lang("ingredient-scoby", lang), 1.0, &piece),
    ];

    let minutes_text = minutes.to_string();
    let steps = [
        t_args_lang("kombucha-step-heat", lang, &[("hot_water", &to_fixed(hot_water_l, 2))]),
        t_args_lang(
            "kombucha-step-infuse",
            lang,
            &[("tea", &to_fixed(tea_grams, 1)), ("minutes", &minutes_text)],
        ),
        t_args_lang("kombucha-step-sugar", lang, &[("sugar", &to_fixed(sugar_grams, 1))]),
        t_args_lang("kombucha-step-combine", lang, &[("cold_water", &to_fixed(cold_water_l, 2))]),
        t_args_lang(
            "kombucha-step-inoculate",
            lang,
            &[
                ("temperature", INOCULATION_TEMPERATURE),
                ("starter", &to_fixed(starter_liquid_l, 2)),
            ],
        ),
        t_lang("kombucha-step-ferment", lang),
    ];
    let instructions = steps
        .into_iter()
        .zip(1..)
        .map(|(text, step)| KombuchaInstructionStep { step, text })
        .collect();

    let profile_name = t_lang(profile.name_key(), lang);
    let tea_name = t_lang(tea.name_key(), lang);
    let title = t_args_lang(
        "kombucha-title",
        lang,
        &[
            ("volume", &volume.to_string()),
            ("profile", &profile_name),
            ("tea", &tea_name),
        ],
    );

    info!("Generated kombucha recipe: {}", title);

    Ok(KombuchaRecipeResult {
        title,
        expected_taste_profile: t_lang(&taste_key(profile, tea), lang),
        quantities: Some(KombuchaQuantities {
            tea_grams: round_to(tea_grams, 1),
            sugar_grams: round_to(sugar_grams, 1),
            starter_liquid_l: round_to(starter_liquid_l, 2),
            total_water_l: round_to(total_water_l, 2),
            hot_water_l: round_to(hot_water_l, 2),
            cold_water_l: round_to(cold_water_l, 2),
            infusion_minutes: minutes,
        }),
        ingredients,
        instructions,
        error: None,
    })
}

fn ingredient(name: String, amount: f64, unit: &str) -> KombuchaIngredient {
    KombuchaIngredient {
        name,
        amount,
        unit: unit.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_black_four_litres() {
        let inputs = KombuchaRecipeInputs::new(4.0, AromaticProfile::ClassicBalanced, TeaType::BlackTea);
        let recipe = generate_kombucha_recipe(&inputs, Language::French);

        assert_eq!(recipe.error, None);
        let quantities = recipe.quantities.unwrap();
        assert_eq!(quantities.tea_grams, 28.0);
        assert_eq!(quantities.sugar_grams, 280.0);
        assert_eq!(quantities.starter_liquid_l, 0.6);
        assert_eq!(quantities.total_water_l, 3.4);
        assert_eq!(quantities.hot_water_l, 1.36);
        assert_eq!(quantities.cold_water_l, 2.04);

        assert_eq!(
            recipe.title,
            "Recette pour 4 L de Kombucha - Profil 'Classique et Équilibré' au Thé Noir"
        );
        assert_eq!(recipe.ingredients[1].name, "Thé (black tea)");
        assert_eq!(recipe.ingredients[4].unit, "unité");
        assert_eq!(recipe.instructions.len(), 6);
        assert_eq!(
            recipe.instructions[1].text,
            "Ajoutez les 28.0 g de thé. Laissez infuser pendant 10 minutes. Retirez ensuite les feuilles de thé."
        );
        assert!(recipe.instructions[4].text.contains("20-30°C"));
        assert!(recipe.instructions[4].text.contains("0.60 L"));
    }

    #[test]
    fn test_short_tea_key() {
        let inputs = KombuchaRecipeInputs {
            desired_volume_l: 1.5,
            aromatic_profile_key: "light_gentle".to_string(),
            tea_type_key: "GREEN".to_string(),
        };
        let recipe = generate_kombucha_recipe(&inputs, Language::English);

        assert_eq!(recipe.error, None);
        assert!(recipe.title.starts_with("Recipe for 1.5 L"));
        assert_eq!(recipe.quantities.unwrap().infusion_minutes, 7);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut inputs = KombuchaRecipeInputs::new(0.0, AromaticProfile::LightGentle, TeaType::GreenTea);
        let recipe = generate_kombucha_recipe(&inputs, Language::English);
        assert_eq!(recipe.error, Some(CalculationError::InvalidKombuchaVolume.localized(Language::English)));
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.title.is_empty());

        inputs.desired_volume_l = 2.0;
        inputs.aromatic_profile_key = "SWEET".to_string();
        let recipe = generate_kombucha_recipe(&inputs, Language::English);
        assert_eq!(
            recipe.error,
            Some(CalculationError::InvalidAromaticProfile("SWEET".to_string()).localized(Language::English))
        );

        inputs.aromatic_profile_key = "LIGHT_GENTLE".to_string();
        inputs.tea_type_key = "OOLONG".to_string();
        let recipe = generate_kombucha_recipe(&inputs, Language::English);
        assert!(recipe.error.is_some());
        assert!(recipe.instructions.is_empty());
    }
}
