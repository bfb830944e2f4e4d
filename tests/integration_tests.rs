//! # Integration Tests
//!
//! This module contains end-to-end tests for the brewing calculators: settings
//! from the environment, recipe files read from disk, the JSON output and the
//! text reports printed by the command line tool.

use brewmate::beerxml::load_recipe_file;
use brewmate::brewing_types::{CorrectionStage, GravityUnit, MaltRecord, WaterProfile};
use brewmate::config::{AppConfig, ChemistryFactors, ENV_LANGUAGE, ENV_WATER_BICARBONATE};
use brewmate::density_calculator::{calculate_post_boil_density, calculate_pre_boil_density, DensityInputs};
use brewmate::kombucha::{generate_kombucha_recipe, KombuchaRecipeInputs};
use brewmate::kombucha_data::{AromaticProfile, TeaType};
use brewmate::localization::Language;
use brewmate::ph_calculator::{
    calculate_mash_correction, calculate_ph_correction, PhCalculationInputs, PhMeasurements,
};
use brewmate::refractometer::{calculate_refractometer, RefractometerInputs};
use brewmate::report::{
    format_kombucha_result, format_ph_result, format_post_boil_result, format_refractometer_result,
};
use std::io::Write;

const PALE_ALE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RECIPES>
  <RECIPE>
    <NAME>Pale Ale</NAME>
    <BOIL_SIZE>27.0</BOIL_SIZE>
    <FERMENTABLES>
      <FERMENTABLE><NAME>Pale Ale Malt</NAME><TYPE>Grain</TYPE><AMOUNT>4.5</AMOUNT></FERMENTABLE>
      <FERMENTABLE><NAME>Crystal 40</NAME><TYPE>Grain</TYPE><AMOUNT>0.5</AMOUNT></FERMENTABLE>
    </FERMENTABLES>
    <MASH>
      <MASH_STEPS>
        <MASH_STEP><NAME>Infusion</NAME><INFUSE_AMOUNT>18.0</INFUSE_AMOUNT></MASH_STEP>
      </MASH_STEPS>
    </MASH>
  </RECIPE>
</RECIPES>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    /// Test a mash correction driven from a recipe file and environment settings
    #[test]
    fn test_mash_correction_from_file_and_settings() {
        let vars: HashMap<&str, &str> = [(ENV_LANGUAGE, "en-GB"), (ENV_WATER_BICARBONATE, "150")]
            .into_iter()
            .collect();
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(PALE_ALE.as_bytes()).unwrap();
        let recipe = load_recipe_file(temp_file.path()).unwrap();
        assert_eq!(recipe.mash_infuse_volume_l, Some(18.0));

        let inputs = PhCalculationInputs {
            stage: CorrectionStage::Mash,
            measurements: PhMeasurements::new(5.6, 5.3, recipe.mash_infuse_volume_l.unwrap()),
            beer_xml: Some(PALE_ALE.to_string()),
            water_profile: Some(config.default_water_profile),
        };
        let result = calculate_ph_correction(&inputs, &config.chemistry, config.language);

        assert_eq!(result.error, None);
        assert!(result.lactic_acid_ml > 0.0);

        let report = format_ph_result(&result, config.language);
        assert!(report.contains("Lactic acid 80 %"));
        assert!(report.contains("Volume detected in the recipe: 18.00 L"));
    }

    /// Test that every calculator is deterministic, down to its JSON output
    #[test]
    fn test_calculators_are_deterministic() {
        let measurements = PhMeasurements::new(5.7, 5.3, 20.0);
        let malts = [MaltRecord::grain("Pilsner Malt", 5.0)];
        let mash = || {
            calculate_mash_correction(
                &measurements,
                Some(WaterProfile::loos()),
                &malts,
                &ChemistryFactors::default(),
                Language::French,
            )
        };
        assert_eq!(mash(), mash());
        assert_eq!(
            serde_json::to_string(&mash()).unwrap(),
            serde_json::to_string(&mash()).unwrap()
        );

        let density = DensityInputs::new(20.0, GravityUnit::Brix, 12.0, 12.5);
        assert_eq!(
            calculate_post_boil_density(&density, Language::English),
            calculate_post_boil_density(&density, Language::English)
        );
        assert_eq!(
            calculate_pre_boil_density(&density, Language::English),
            calculate_pre_boil_density(&density, Language::English)
        );

        let refractometer = RefractometerInputs::new(GravityUnit::Brix, 16.0, 8.0);
        assert_eq!(
            calculate_refractometer(&refractometer, Language::French),
            calculate_refractometer(&refractometer, Language::French)
        );

        let kombucha = KombuchaRecipeInputs::new(4.0, AromaticProfile::ClassicBalanced, TeaType::BlackTea);
        assert_eq!(
            generate_kombucha_recipe(&kombucha, Language::French),
            generate_kombucha_recipe(&kombucha, Language::French)
        );
    }

    /// Test the JSON shape of the pH result
    #[test]
    fn test_ph_result_json() {
        let result = calculate_mash_correction(
            &PhMeasurements::new(5.7, 5.3, 20.0),
            Some(WaterProfile::loos()),
            &[MaltRecord::grain("Pilsner Malt", 5.0)],
            &ChemistryFactors::default(),
            Language::French,
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["correction_type"], "ACIDIFY");
        assert_eq!(json["lactic_acid_ml"], 8.74);
        assert_eq!(json["phosphoric_acid_ml"], 3.08);
        assert_eq!(json["bicarbonate_grams"], 0.0);
        assert!(json.get("error").is_none());
        assert!(json["details"].is_object());
    }

    /// Test the JSON shape of the post-boil options
    #[test]
    fn test_post_boil_result_json() {
        let result = calculate_post_boil_density(
            &DensityInputs::new(20.0, GravityUnit::Brix, 12.0, 12.5),
            Language::English,
        );
        let json = serde_json::to_value(&result).unwrap();

        let kinds: Vec<&str> = json["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["evaporate", "addSugarCandy", "addSugarPowder"]);
        assert_eq!(json["options"][0]["unit"], "litres");
        assert_eq!(json["options"][1]["unit"], "grams");
    }

    /// Test that errors are carried in the result and reported
    #[test]
    fn test_error_results_are_reported() {
        let result = calculate_refractometer(
            &RefractometerInputs::new(GravityUnit::Brix, 10.0, 12.0),
            Language::English,
        );
        assert!(result.error.is_some());

        let report = format_refractometer_result(&result, Language::English);
        assert!(report.starts_with("Error: "));

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["error"].is_string());
    }

    /// Test the text reports of successful results
    #[test]
    fn test_text_reports() {
        let post_boil = calculate_post_boil_density(
            &DensityInputs::new(20.0, GravityUnit::Brix, 12.0, 12.5),
            Language::English,
        );
        let report = format_post_boil_result(&post_boil, Language::English);
        assert!(report.contains("Evaporate 0.80 litres of water."));

        let kombucha = generate_kombucha_recipe(
            &KombuchaRecipeInputs::new(4.0, AromaticProfile::LightGentle, TeaType::GreenTea),
            Language::English,
        );
        let report = format_kombucha_result(&kombucha, Language::English);
        assert!(report.starts_with(&kombucha.title));
        assert!(report.contains("Ingredients"));
        assert!(report.contains("Instructions"));
        assert!(report.contains(&kombucha.expected_taste_profile));
    }
}
