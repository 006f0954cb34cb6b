//! # Ventcalc CLI
//!
//! Command-line front end for `vent_core`: size natural ventilation from
//! flags or a JSON input file, save calculations to a project file, and
//! re-run saved projects to confirm they reproduce.

mod config;
mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vent_core::emissions::{ComponentType, LeakSource};
use vent_core::file_io::project_path;
use vent_core::site_factors::{Obstruction, TerrainExposure, VentType, WindOrientation};
use vent_core::{
    calculate, load_project, save_project, CalcError, CalculationGoal, FugitiveEmissionInput, GasType, Project,
    VentilationInput, VentilationMethod,
};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about = "Natural ventilation sizing for Class I, Division 2 enclosures")]
struct Cli {
    /// Defaults file (falls back to ./ventcalc.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size the vent openings for one enclosure.
    Calc(CalcArgs),
    /// Re-run every calculation in a saved project and check the results match.
    Rerun {
        /// Project file written by `calc --save`.
        file: PathBuf,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List the fugitive leak-rate table.
    Components {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// List the site factor presets.
    Factors {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// AGA XL1001 Area Method
    Area,
    /// API RP 500 Fugitive Emission Method
    Fugitive,
}

#[derive(Args, Debug)]
struct CalcArgs {
    /// Read the full input from a JSON file instead of flags.
    #[arg(
        long,
        conflicts_with_all = [
            "label", "length", "width", "height", "inside_temp", "outside_temp", "wind",
            "terrain", "orientation", "vent_type", "inlet_obstruction", "outlet_obstruction", "gas",
            "method", "leaks", "leak_rate", "lfl", "safety_factor",
        ]
    )]
    input: Option<PathBuf>,

    /// Enclosure label.
    #[arg(long, default_value = "")]
    label: String,

    /// Length (ft).
    #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
    length: Option<f64>,
    /// Width (ft).
    #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
    width: Option<f64>,
    /// Height (ft).
    #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
    height: Option<f64>,

    /// Inside design temperature (°F).
    #[arg(long, default_value_t = 70.0, allow_negative_numbers = true)]
    inside_temp: f64,
    /// Outside design temperature (°F).
    #[arg(long, default_value_t = 70.0, allow_negative_numbers = true)]
    outside_temp: f64,
    /// Design wind velocity (mph).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    wind: f64,

    /// Terrain preset or factor (open-country, suburban, urban, sheltered, 0.7).
    #[arg(long)]
    terrain: Option<String>,
    /// Orientation preset or factor (perpendicular, oblique, parallel, 0.4).
    #[arg(long)]
    orientation: Option<String>,
    /// Vent type preset or discharge coefficient (sharp-edged, louvered, rounded-entry, 0.7).
    #[arg(long)]
    vent_type: Option<String>,
    /// Inlet obstruction preset or free-area fraction.
    #[arg(long)]
    inlet_obstruction: Option<String>,
    /// Outlet obstruction preset or free-area fraction.
    #[arg(long)]
    outlet_obstruction: Option<String>,
    /// Gas buoyancy (lighter, heavier).
    #[arg(long)]
    gas: Option<String>,

    /// Required-airflow method. Leak flags imply `fugitive`.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,
    /// Leak source as COMPONENT=QUANTITY (repeatable), e.g. flange=10.
    #[arg(long = "leak")]
    leaks: Vec<String>,
    /// Direct total leak rate (CFM).
    #[arg(long, allow_negative_numbers = true)]
    leak_rate: Option<f64>,
    /// Lower flammable limit (% v/v).
    #[arg(long, allow_negative_numbers = true)]
    lfl: Option<f64>,
    /// Fraction of LFL allowed, 0 < C ≤ 1.
    #[arg(long, allow_negative_numbers = true)]
    safety_factor: Option<f64>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Append the calculation to this project file (created if missing).
    #[arg(long)]
    save: Option<PathBuf>,
    /// Calculation goal (reclassify, maintain, general).
    #[arg(long, default_value = "general")]
    goal: String,
    #[arg(long, default_value = "")]
    project_name: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    company: String,
    #[arg(long, default_value = "")]
    performed_by: String,
    /// Calculation date (YYYY-MM-DD), defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Calc(args) => handle_calc(&args, &config),
        Command::Rerun { file, format } => handle_rerun(&file, resolve_format(format, &config)),
        Command::Components { format } => handle_components(resolve_format(format, &config)),
        Command::Factors { format } => handle_factors(resolve_format(format, &config)),
    }
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or(config.format).unwrap_or(OutputFormat::Text)
}

fn handle_calc(args: &CalcArgs, config: &Config) -> Result<()> {
    let format = resolve_format(args.format, config);
    let input = match &args.input {
        Some(path) => read_input(path)?,
        None => input_from_flags(args, config)?,
    };

    let result = match calculate(&input) {
        Ok(result) => result,
        Err(e) => {
            if format == OutputFormat::Json {
                print_error_json(&e)?;
            }
            return Err(e).context("ventilation calculation failed");
        }
    };

    match format {
        OutputFormat::Text => print!("{}", output::render_result(&input, &result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if let Some(path) = args.save.as_deref().map(project_path) {
        let path = path.as_path();
        let goal = CalculationGoal::from_str_flexible(&args.goal)?;
        let mut project = if path.exists() {
            load_project(path).with_context(|| format!("failed to load project {}", path.display()))?
        } else {
            let mut project = Project::new(&args.project_name, &args.location, &args.company, &args.performed_by);
            project.settings = config.settings.clone();
            if args.date.is_some() {
                project.meta.date = args.date;
            }
            project
        };
        let id = project.add_calculation(goal, input)?;
        save_project(&project, path).with_context(|| format!("failed to save project {}", path.display()))?;
        info!(%id, path = %path.display(), "calculation saved");
        if format == OutputFormat::Text {
            println!("Saved calculation {} to {}", id, path.display());
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<VentilationInput> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read input {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid input JSON in {}", path.display()))
}

fn input_from_flags(args: &CalcArgs, config: &Config) -> Result<VentilationInput> {
    let (Some(length), Some(width), Some(height)) = (args.length, args.width, args.height) else {
        bail!("--length, --width and --height are required without --input");
    };

    let mut input = VentilationInput::new(&args.label, length, width, height);
    config.settings.apply_defaults(&mut input);
    input.inside_temp_f = args.inside_temp;
    input.outside_temp_f = args.outside_temp;
    input.wind_velocity_mph = args.wind;

    if let Some(s) = &args.terrain {
        input.terrain = TerrainExposure::from_str_flexible(s)?;
    }
    if let Some(s) = &args.orientation {
        input.orientation = WindOrientation::from_str_flexible(s)?;
    }
    if let Some(s) = &args.vent_type {
        input.vent_type = VentType::from_str_flexible(s)?;
    }
    if let Some(s) = &args.inlet_obstruction {
        input.inlet_obstruction = Obstruction::from_str_flexible(s)?;
    }
    if let Some(s) = &args.outlet_obstruction {
        input.outlet_obstruction = Obstruction::from_str_flexible(s)?;
    }
    if let Some(s) = &args.gas {
        input.gas_type = GasType::from_str_flexible(s)?;
    }

    let fugitive = args.method == Some(MethodArg::Fugitive) || !args.leaks.is_empty() || args.leak_rate.is_some();
    if fugitive {
        if args.method == Some(MethodArg::Area) {
            warn!("leak flags given with --method area; ignoring them");
        } else {
            let leak_sources = args
                .leaks
                .iter()
                .map(|s| parse_leak(s))
                .collect::<Result<Vec<_>>>()?;
            input.method = VentilationMethod::FugitiveEmission(FugitiveEmissionInput {
                leak_sources,
                leak_rate_cfm: args.leak_rate,
                lfl_percent: args.lfl.or(config.lfl_percent),
                safety_factor: args.safety_factor.or(config.safety_factor),
            });
        }
    }

    Ok(input)
}

/// Parse `COMPONENT=QUANTITY`; a bare component name counts as one unit.
fn parse_leak(s: &str) -> Result<LeakSource> {
    let (name, quantity) = match s.split_once('=') {
        Some((name, qty)) => (
            name,
            qty.trim()
                .parse::<u32>()
                .with_context(|| format!("invalid leak quantity in '{}'", s))?,
        ),
        None => (s, 1),
    };
    let component = ComponentType::from_str_flexible(name)?;
    Ok(LeakSource::new(component, quantity))
}

fn print_error_json(err: &CalcError) -> Result<()> {
    let body = json!({
        "error_code": err.error_code(),
        "message": err.to_string(),
        "fields": err.offending_fields(),
        "error": err,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn handle_rerun(path: &Path, format: OutputFormat) -> Result<()> {
    let project = load_project(path).with_context(|| format!("failed to load project {}", path.display()))?;

    let mut reports = Vec::with_capacity(project.calculations.len());
    for saved in &project.calculations {
        let matches = saved
            .verify()
            .with_context(|| format!("failed to re-run calculation {}", saved.id))?;
        if !matches {
            warn!(id = %saved.id, "re-run result differs from the saved result");
        }
        reports.push((saved, matches));
    }

    match format {
        OutputFormat::Text => {
            println!(
                "Project: {} ({} calculations)",
                project.meta.project_name,
                project.calculation_count()
            );
            for (saved, matches) in &reports {
                println!(
                    "  [{}] {} {}",
                    if *matches { "MATCH" } else { "DIFFERS" },
                    saved.input.label(),
                    saved.id
                );
            }
        }
        OutputFormat::Json => {
            let body: Vec<_> = reports
                .iter()
                .map(|(saved, matches)| {
                    json!({
                        "id": saved.id,
                        "label": saved.input.label(),
                        "goal": saved.goal,
                        "matches": matches,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    let differing = reports.iter().filter(|(_, m)| !m).count();
    if differing > 0 {
        bail!("{} saved calculation(s) no longer reproduce", differing);
    }
    Ok(())
}

fn handle_components(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", output::render_components()),
        OutputFormat::Json => {
            let body: Vec<_> = ComponentType::ALL
                .iter()
                .map(|c| {
                    json!({
                        "code": c.code(),
                        "name": c.display_name(),
                        "leak_rate_cfm": c.leak_rate_cfm(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

fn handle_factors(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", output::render_factors()),
        OutputFormat::Json => {
            let rows = |items: Vec<(serde_json::Value, String, f64)>| -> Vec<serde_json::Value> {
                items
                    .into_iter()
                    .map(|(id, name, factor)| json!({ "id": id, "name": name, "factor": factor }))
                    .collect()
            };
            let body = json!({
                "obstruction": rows(Obstruction::ALL.iter().map(|o| (json!(o), o.display_name(), o.factor())).collect()),
                "vent_type": rows(VentType::ALL.iter().map(|v| (json!(v), v.display_name(), v.discharge_coefficient())).collect()),
                "terrain": rows(TerrainExposure::ALL.iter().map(|t| (json!(t), t.display_name(), t.factor())).collect()),
                "orientation": rows(WindOrientation::ALL.iter().map(|w| (json!(w), w.display_name(), w.factor())).collect()),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leak() {
        let source = parse_leak("flange=10").unwrap();
        assert_eq!(source, LeakSource::new(ComponentType::Flange, 10));
        assert_eq!(parse_leak("pump seal").unwrap().quantity, 1);
        assert!(parse_leak("flange=ten").is_err());
        assert!(parse_leak("gasket=2").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
