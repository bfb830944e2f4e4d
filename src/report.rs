//! Report module for rendering calculator results as terminal text

use crate::density_calculator::{PostBoilDensityResult, PreBoilDensityResult};
use crate::kombucha::KombuchaRecipeResult;
use crate::localization::{t_args_lang, t_lang, Language};
use crate::numeric::to_fixed;
use crate::ph_calculator::PhCalculationResult;
use crate::refractometer::RefractometerResult;

fn error_line(error: &str, lang: Language) -> String {
    format!("{}\n", t_args_lang("report-error", lang, &[("message", error)]))
}

/// Format a pH correction: message, dosages, then calculation details
pub fn format_ph_result(result: &PhCalculationResult, lang: Language) -> String {
    let mut output = String::new();

    if let Some(error) = &result.error {
        output.push_str(&error_line(error, lang));
    } else {
        output.push_str(&format!("{}\n", result.message));
    }

    if result.lactic_acid_ml > 0.0 {
        output.push_str(&format!(
            "  - {}\n",
            t_args_lang("report-lactic-acid", lang, &[("amount", &to_fixed(result.lactic_acid_ml, 2))])
        ));
    }
    if result.phosphoric_acid_ml > 0.0 {
        output.push_str(&format!(
            "  - {}\n",
            t_args_lang(
                "report-phosphoric-acid",
                lang,
                &[("amount", &to_fixed(result.phosphoric_acid_ml, 2))]
            )
        ));
    }
    if result.bicarbonate_grams > 0.0 {
        output.push_str(&format!(
            "  - {}\n",
            t_args_lang("report-bicarbonate", lang, &[("amount", &to_fixed(result.bicarbonate_grams, 2))])
        ));
    }

    let Some(details) = &result.details else {
        return output;
    };

    let mut lines = Vec::new();
    let mut detail = |key: &str, value: Option<f64>| {
        if let Some(value) = value {
            lines.push(t_args_lang(key, lang, &[("value", &to_fixed(value, 2))]));
        }
    };
    detail("report-residual-alkalinity", details.residual_alkalinity);
    detail("report-total-buffering", details.total_mash_buffering);
    detail("report-acid-malt", details.meq_from_acid_malt);
    detail(
        "report-auto-volume",
        details
            .auto_detected_mash_volume_l
            .or(details.auto_detected_pre_boil_volume_l),
    );

    if !lines.is_empty() {
        output.push_str(&format!("{}:\n", t_lang("report-details", lang)));
        for line in lines {
            output.push_str(&format!("  {}\n", line));
        }
    }
    output
}

/// Format a pre-boil gravity correction
pub fn format_pre_boil_result(result: &PreBoilDensityResult, lang: Language) -> String {
    if let Some(error) = &result.error {
        return error_line(error, lang);
    }

    let mut output = format!("{}\n", result.message);
    if let Some(amount) = result.water_to_add {
        output.push_str(&format!(
            "  - {}\n",
            t_args_lang("report-water-to-add", lang, &[("amount", &to_fixed(amount, 2))])
        ));
    }
    if let Some(amount) = result.water_to_evaporate {
        output.push_str(&format!(
            "  - {}\n",
            t_args_lang("report-water-to-evaporate", lang, &[("amount", &to_fixed(amount, 2))])
        ));
    }
    output
}

/// Format the post-boil options as a numbered list
pub fn format_post_boil_result(result: &PostBoilDensityResult, lang: Language) -> String {
    if let Some(error) = &result.error {
        return error_line(error, lang);
    }

    let mut output = format!("{}\n", result.message);
    for (i, option) in result.options.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, option.description));
        if let Some(warning) = &option.warning {
            output.push_str(&format!(
                "   {}\n",
                t_args_lang("report-warning", lang, &[("warning", warning)])
            ));
        }
    }
    output
}

pub fn format_refractometer_result(result: &RefractometerResult, lang: Language) -> String {
    match &result.error {
        Some(error) => error_line(error, lang),
        None => format!("{}\n", result.message),
    }
}

/// Format a kombucha recipe: title, taste, ingredients, numbered steps
pub fn format_kombucha_result(result: &KombuchaRecipeResult, lang: Language) -> String {
    if let Some(error) = &result.error {
        return error_line(error, lang);
    }

    let mut output = format!("{}\n\n{}\n\n", result.title, result.expected_taste_profile);

    output.push_str(&format!("{}:\n", t_lang("report-ingredients", lang)));
    for ingredient in &result.ingredients {
        output.push_str(&format!(
            "  - {}: {} {}\n",
            ingredient.name, ingredient.amount, ingredient.unit
        ));
    }

    output.push_str(&format!("\n{}:\n", t_lang("report-instructions", lang)));
    for step in &result.instructions {
        output.push_str(&format!("{}. {}\n", step.step, step.text));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brewing_types::GravityUnit;
    use crate::config::ChemistryFactors;
    use crate::density_calculator::{calculate_post_boil_density, DensityInputs};
    use crate::kombucha::{generate_kombucha_recipe, KombuchaRecipeInputs};
    use crate::kombucha_data::{AromaticProfile, TeaType};
    use crate::ph_calculator::{calculate_pre_boil_correction, PhMeasurements};

    #[test]
    fn test_ph_report_lists_dosages() {
        let result = calculate_pre_boil_correction(
            &PhMeasurements::new(5.6, 5.2, 25.0),
            &ChemistryFactors::default(),
            Language::English,
        );
        let report = format_ph_result(&result, Language::English);

        assert!(report.contains("Lactic acid 80 %: 5.00 mL"));
        assert!(report.contains("Phosphoric acid 75 %: 1.50 mL"));
        assert!(!report.contains("Sodium bicarbonate"));
    }

    #[test]
    fn test_post_boil_report_numbers_options() {
        let result = calculate_post_boil_density(
            &DensityInputs::new(20.0, GravityUnit::Brix, 12.0, 12.5),
            Language::English,
        );
        let report = format_post_boil_result(&result, Language::English);

        assert!(report.contains("1. Evaporate"));
        assert!(report.contains("3. Add 100.00 grams of white caster sugar."));
    }

    #[test]
    fn test_error_report() {
        let result = calculate_post_boil_density(
            &DensityInputs::new(0.0, GravityUnit::Brix, 12.0, 12.5),
            Language::English,
        );
        let report = format_post_boil_result(&result, Language::English);
        assert!(report.starts_with("Error: "));
    }

    #[test]
    fn test_kombucha_report_sections() {
        let recipe = generate_kombucha_recipe(
            &KombuchaRecipeInputs::new(4.0, AromaticProfile::ClassicBalanced, TeaType::BlackTea),
            Language::English,
        );
        let report = format_kombucha_result(&recipe, Language::English);

        assert!(report.contains("Ingredients:"));
        assert!(report.contains("Tea (black tea): 28 g"));
        assert!(report.contains("6. Cover the jar"));
    }
}
