use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

use brewmate::beerxml::{parse_recipe, read_recipe_document};
use brewmate::brewing_types::{CorrectionStage, GravityUnit, WaterProfile};
use brewmate::config::AppConfig;
use brewmate::density_calculator::{calculate_post_boil_density, calculate_pre_boil_density, DensityInputs};
use brewmate::kombucha::{generate_kombucha_recipe, KombuchaRecipeInputs};
use brewmate::localization::Language;
use brewmate::ph_calculator::{calculate_ph_correction, PhCalculationInputs, PhCalculationResult, PhMeasurements};
use brewmate::refractometer::{calculate_refractometer, RefractometerInputs};
use brewmate::report;

/// Brewing calculators for the brew day
#[derive(Parser)]
#[command(name = "brewmate", version)]
struct Cli {
    /// Message language (fr, en). Defaults to BREWMATE_LANG, then French.
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acid or bicarbonate addition to reach a target pH
    Ph(PhArgs),
    /// Water to add or evaporate before the boil
    PreBoil(DensityArgs),
    /// Dilution, evaporation or sugar options after the boil
    PostBoil(DensityArgs),
    /// Correct a final refractometer reading and estimate ABV
    Refractometer(RefractometerArgs),
    /// Scale a kombucha first-fermentation recipe
    Kombucha(KombuchaArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum StageArg {
    Mash,
    PreBoil,
}

impl From<StageArg> for CorrectionStage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Mash => CorrectionStage::Mash,
            StageArg::PreBoil => CorrectionStage::PreBoil,
        }
    }
}

#[derive(Args)]
struct PhArgs {
    #[arg(long, value_enum, default_value = "mash")]
    stage: StageArg,
    /// Measured pH
    #[arg(long)]
    current: f64,
    /// Target pH
    #[arg(long)]
    target: f64,
    /// Volume in litres. Read from the recipe when omitted.
    #[arg(long)]
    volume: Option<f64>,
    /// BeerXML recipe file (required for the mash stage)
    #[arg(long)]
    beerxml: Option<PathBuf>,
    /// Calcium, mg/L
    #[arg(long)]
    calcium: Option<f64>,
    /// Magnesium, mg/L
    #[arg(long)]
    magnesium: Option<f64>,
    /// Bicarbonate, mg/L
    #[arg(long)]
    bicarbonate: Option<f64>,
}

#[derive(Args)]
struct DensityArgs {
    /// Wort volume in litres
    #[arg(long)]
    volume: f64,
    /// brix, plato or sg
    #[arg(long, default_value = "brix")]
    unit: GravityUnit,
    #[arg(long)]
    measured: f64,
    #[arg(long)]
    target: f64,
}

#[derive(Args)]
struct RefractometerArgs {
    /// brix, plato or sg
    #[arg(long, default_value = "brix")]
    unit: GravityUnit,
    /// Reading before fermentation
    #[arg(long)]
    initial: f64,
    /// Uncorrected reading after fermentation
    #[arg(long = "final")]
    final_reading: f64,
}

#[derive(Args)]
struct KombuchaArgs {
    /// Final batch volume in litres
    #[arg(long)]
    volume: f64,
    /// LIGHT_GENTLE, CLASSIC_BALANCED or INTENSE_VINEGARY
    #[arg(long, default_value = "CLASSIC_BALANCED")]
    profile: String,
    /// BLACK_TEA, GREEN_TEA or MIXED_TEA
    #[arg(long, default_value = "BLACK_TEA")]
    tea: String,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let lang = cli
        .lang
        .as_deref()
        .map(Language::from_code)
        .unwrap_or(config.language);

    info!("Starting BrewMate ({})", lang.code());

    let (output, failed) = match &cli.command {
        Command::Ph(args) => {
            let result = run_ph(args, &config, lang)?;
            let failed = result.error.is_some();
            (render(&result, cli.json, |r| report::format_ph_result(r, lang))?, failed)
        }
        Command::PreBoil(args) => {
            let result = calculate_pre_boil_density(&density_inputs(args), lang);
            let failed = result.error.is_some();
            (render(&result, cli.json, |r| report::format_pre_boil_result(r, lang))?, failed)
        }
        Command::PostBoil(args) => {
            let result = calculate_post_boil_density(&density_inputs(args), lang);
            let failed = result.error.is_some();
            (render(&result, cli.json, |r| report::format_post_boil_result(r, lang))?, failed)
        }
        Command::Refractometer(args) => {
            let inputs = RefractometerInputs::new(args.unit, args.initial, args.final_reading);
            let result = calculate_refractometer(&inputs, lang);
            let failed = result.error.is_some();
            (render(&result, cli.json, |r| report::format_refractometer_result(r, lang))?, failed)
        }
        Command::Kombucha(args) => {
            let inputs = KombuchaRecipeInputs {
                desired_volume_l: args.volume,
                aromatic_profile_key: args.profile.clone(),
                tea_type_key: args.tea.clone(),
            };
            let result = generate_kombucha_recipe(&inputs, lang);
            let failed = result.error.is_some();
            (render(&result, cli.json, |r| report::format_kombucha_result(r, lang))?, failed)
        }
    };

    print!("{output}");
    if failed {
        process::exit(1);
    }
    Ok(())
}

fn render<T, F>(result: &T, json: bool, text: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        let mut output = serde_json::to_string_pretty(result)?;
        output.push('\n');
        Ok(output)
    } else {
        Ok(text(result))
    }
}

fn density_inputs(args: &DensityArgs) -> DensityInputs {
    DensityInputs::new(args.volume, args.unit, args.measured, args.target)
}

fn run_ph(args: &PhArgs, config: &AppConfig, lang: Language) -> Result<PhCalculationResult> {
    let beer_xml = match &args.beerxml {
        Some(path) => Some(
            read_recipe_document(path).with_context(|| format!("cannot read {}", path.display()))?,
        ),
        None => None,
    };
    let stage = CorrectionStage::from(args.stage);

    let volume = match args.volume {
        Some(volume) => volume,
        None => detected_volume(stage, beer_xml.as_deref())
            .context("no --volume given and no volume found in the BeerXML recipe")?,
    };

    let defaults = &config.default_water_profile;
    let water = WaterProfile::new(
        args.calcium.unwrap_or(defaults.calcium_mg_per_l),
        args.magnesium.unwrap_or(defaults.magnesium_mg_per_l),
        args.bicarbonate.unwrap_or(defaults.bicarbonate_mg_per_l),
    );

    let inputs = PhCalculationInputs {
        stage,
        measurements: PhMeasurements::new(args.current, args.target, volume),
        beer_xml,
        water_profile: Some(water),
    };
    Ok(calculate_ph_correction(&inputs, &config.chemistry, lang))
}

/// Volume the recipe declares for a stage
fn detected_volume(stage: CorrectionStage, beer_xml: Option<&str>) -> Option<f64> {
    let recipe = parse_recipe(beer_xml?).ok()?;
    match stage {
        CorrectionStage::Mash => recipe.mash_infuse_volume_l,
        CorrectionStage::PreBoil => recipe.boil_size_l,
    }
}
