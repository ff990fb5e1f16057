use analytics::{ConfidenceInterval, MetricKind, StatisticsEngine, StatisticsReport};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Table};
use configuration::Config;
use core_types::{EnergyUnit, Series};
use loader::{AffinityKind, ExperimentalData, read_free_energies};
use std::path::PathBuf;

/// The main entry point for the freenrg command-line tool.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Compare(args) => handle_compare(args, &config),
        Commands::Convert(args) => handle_convert(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Bootstrap agreement statistics between computed and experimental free energies.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./freenrg.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare computed free energies against experiment (R, R2, tau, MUE).
    Compare(CompareArgs),
    /// Convert IC50 or Kd measurements into relative free energies.
    Convert(ConvertArgs),
}

#[derive(Parser)]
struct CompareArgs {
    /// Computed free energies as `name,value,error` lines in kcal/mol.
    #[arg(long)]
    computed: PathBuf,

    /// Experimental data file.
    #[arg(long)]
    experimental: PathBuf,

    /// Layout of the experimental file.
    #[arg(long, value_enum, default_value_t = ExperimentalFormat::Dg)]
    experimental_format: ExperimentalFormat,

    /// Reference compound for IC50 / Kd conversion (defaults to the first in the file).
    #[arg(long)]
    reference: Option<String>,

    /// Temperature in kelvin for IC50 / Kd conversion.
    #[arg(long)]
    temperature: Option<f64>,

    /// Field separator of Kd files. `tab` or `\t` for tab separated.
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Compare only these compounds, in this order.
    #[arg(long, value_delimiter = ',')]
    compounds: Option<Vec<String>>,

    /// Number of resample draws.
    #[arg(long)]
    repeats: Option<usize>,

    /// Confidence level of the reported interval, e.g. 0.68 or 0.95.
    #[arg(long, allow_negative_numbers = true)]
    confidence: Option<f64>,

    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate draws on all cores.
    #[arg(long)]
    parallel: bool,

    /// Print the summaries as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ConvertArgs {
    /// IC50 or Kd measurements, one compound per line.
    #[arg(long)]
    input: PathBuf,

    #[arg(long, value_enum)]
    format: AffinityFormat,

    /// Reference compound (defaults to the first in the file).
    #[arg(long)]
    reference: Option<String>,

    #[arg(long, value_enum, default_value_t = UnitArg::Kcal)]
    unit: UnitArg,

    /// Temperature in kelvin.
    #[arg(long)]
    temperature: Option<f64>,

    /// Field separator of Kd files. `tab` or `\t` for tab separated.
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExperimentalFormat {
    /// Free energies, `name,value,error`.
    Dg,
    Ic50,
    Kd,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AffinityFormat {
    Ic50,
    Kd,
}

impl From<AffinityFormat> for AffinityKind {
    fn from(format: AffinityFormat) -> Self {
        match format {
            AffinityFormat::Ic50 => AffinityKind::Ic50,
            AffinityFormat::Kd => AffinityKind::Kd,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnitArg {
    Kcal,
    Kj,
}

impl From<UnitArg> for EnergyUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Kcal => EnergyUnit::KcalPerMol,
            UnitArg::Kj => EnergyUnit::KjPerMol,
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("delimiter must be a single character, got '{raw}'")),
            }
        }
    }
}

// ==============================================================================
// Compare Command Logic
// ==============================================================================

/// Loads both series, runs the bootstrap and prints the per-metric summary.
fn handle_compare(args: CompareArgs, config: &Config) -> anyhow::Result<()> {
    // Command-line flags take precedence over the configuration file.
    let stats = &config.statistics;
    let repeats = args.repeats.unwrap_or(stats.repeats);
    let confidence = args.confidence.unwrap_or(stats.confidence_level);
    let seed = args.seed.or(stats.seed);
    let parallel = args.parallel || stats.parallel;

    let computed = read_free_energies(
        &args.computed,
        EnergyUnit::KcalPerMol,
        &config.experiment.comment,
    )
    .with_context(|| {
        format!(
            "Failed to read computed free energies from {}",
            args.computed.display()
        )
    })?;
    let experimental = load_experimental(&args, config).with_context(|| {
        format!(
            "Failed to read experimental data from {}",
            args.experimental.display()
        )
    })?;

    let mut engine = StatisticsEngine::new()
        .with_parallel(parallel)
        .with_confidence_level(confidence);
    if let Some(seed) = seed {
        engine = engine.with_seed(seed);
    }

    let report = engine
        .generate_statistics(&computed, &experimental, args.compounds.as_deref(), repeats)
        .context("Failed to generate statistics")?;
    tracing::info!(
        compounds = report.compounds().len(),
        repeats,
        "Bootstrap complete."
    );

    if args.json {
        print_json(&report)
    } else {
        print_table(&report)
    }
}

fn load_experimental(args: &CompareArgs, config: &Config) -> anyhow::Result<Series> {
    let temperature = args.temperature.unwrap_or(config.experiment.temperature);
    anyhow::ensure!(
        temperature.is_finite() && temperature > 0.0,
        "Temperature must be a positive number of kelvin, got {temperature}"
    );
    let delimiter = args.delimiter.unwrap_or(config.experiment.delimiter);
    let reference = args.reference.as_deref();
    let data = ExperimentalData::new(temperature);

    let series = match args.experimental_format {
        ExperimentalFormat::Dg => {
            if reference.is_some() {
                tracing::warn!("--reference is ignored for free energy input.");
            }
            read_free_energies(
                &args.experimental,
                EnergyUnit::KcalPerMol,
                &config.experiment.comment,
            )?
        }
        ExperimentalFormat::Ic50 => {
            data.ddg_from_file(AffinityKind::Ic50, &args.experimental, reference, delimiter)?
                .kcal
        }
        ExperimentalFormat::Kd => {
            data.ddg_from_file(AffinityKind::Kd, &args.experimental, reference, delimiter)?
                .kcal
        }
    };
    Ok(series)
}

/// Metric, mean, std and interval. The interval is absent when the configured
/// confidence level cannot be turned into sample indices.
type MetricRow = (MetricKind, f64, f64, Option<ConfidenceInterval>);

fn metric_rows(report: &StatisticsReport) -> anyhow::Result<Vec<MetricRow>> {
    MetricKind::EVALUATED
        .into_iter()
        .map(|kind| -> anyhow::Result<MetricRow> {
            let confidence = match report.confidence(kind) {
                Ok(ci) => Some(ci),
                Err(e) => {
                    tracing::warn!(metric = %kind, error = %e, "No confidence interval.");
                    None
                }
            };
            Ok((kind, report.mean(kind)?, report.std(kind)?, confidence))
        })
        .collect()
}

fn print_table(report: &StatisticsReport) -> anyhow::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        ["Metric", "Mean", "Std", "Median", "Lower", "Upper"]
            .iter()
            .map(|h| Cell::new(*h))
            .collect::<Vec<_>>(),
    );

    let fmt = |v: f64| format!("{v:.3}");
    for (kind, mean, std, confidence) in metric_rows(report)? {
        let [median, lower, upper] = match confidence {
            Some(ci) => ci.as_array().map(fmt),
            None => ["n/a".to_string(), "n/a".to_string(), "n/a".to_string()],
        };
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(fmt(mean)),
            Cell::new(fmt(std)),
            Cell::new(median),
            Cell::new(lower),
            Cell::new(upper),
        ]);
    }

    println!(
        "{} compounds, {} draws, confidence level {}",
        report.compounds().len(),
        report.repeats(),
        report.confidence_level()
    );
    println!("{table}");
    Ok(())
}

fn print_json(report: &StatisticsReport) -> anyhow::Result<()> {
    let metrics = metric_rows(report)?
        .into_iter()
        .map(|(kind, mean, std, confidence)| {
            serde_json::json!({
                "metric": kind,
                "mean": mean,
                "std": std,
                "confidence": confidence,
            })
        })
        .collect::<Vec<_>>();

    let output = serde_json::json!({
        "compounds": report.compounds(),
        "repeats": report.repeats(),
        "confidence_level": report.confidence_level(),
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ==============================================================================
// Convert Command Logic
// ==============================================================================

/// Converts affinities and prints them in the free energy file layout, so the
/// output can be fed back into `compare`.
fn handle_convert(args: ConvertArgs, config: &Config) -> anyhow::Result<()> {
    let temperature = args.temperature.unwrap_or(config.experiment.temperature);
    anyhow::ensure!(
        temperature.is_finite() && temperature > 0.0,
        "Temperature must be a positive number of kelvin, got {temperature}"
    );
    let delimiter = args.delimiter.unwrap_or(config.experiment.delimiter);
    let unit = EnergyUnit::from(args.unit);

    let energies = ExperimentalData::new(temperature)
        .ddg_from_file(
            args.format.into(),
            &args.input,
            args.reference.as_deref(),
            delimiter,
        )
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    println!(
        "{} reference {}, {} at {} K",
        config.experiment.comment, energies.reference, unit, temperature
    );
    for record in energies.in_unit(unit) {
        println!(
            "{},{:.4},{:.4}",
            record.id,
            record.value,
            record.uncertainty_or_zero()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_parsing() {
        assert_eq!(parse_delimiter(";"), Ok(';'));
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert!(parse_delimiter(",;").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn compare_flags_parse() {
        let cli = Cli::try_parse_from([
            "freenrg",
            "compare",
            "--computed",
            "comp.csv",
            "--experimental",
            "exp.csv",
            "--experimental-format",
            "kd",
            "--compounds",
            "a,b,c",
            "--confidence",
            "0.95",
            "--seed",
            "3",
        ])
        .unwrap();
        let Commands::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert!(args.experimental_format == ExperimentalFormat::Kd);
        assert_eq!(
            args.compounds,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(args.confidence, Some(0.95));
        assert_eq!(args.seed, Some(3));
        assert!(!args.parallel);
    }
}
