//! weather-summary: write a natural-language summary of a daily weather CSV.
//!
//! Configuration comes from an optional TOML file (`--config`, or the
//! `WEATHER_SUMMARY_CONFIG` variable, which may be set in `.env`), with
//! command-line flags taking precedence.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;

use weather_summary::config::{SummaryConfig, UnitSystem};
use weather_summary::ingest::daily_csv;
use weather_summary::logging::{self, LogLevel, Stage};
use weather_summary::summarizer::Summarizer;
use weather_summary::variables::Preset;

const CONFIG_ENV: &str = "WEATHER_SUMMARY_CONFIG";

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Summarize daily weather observations in plain English.
#[derive(Parser, Debug)]
#[command(name = "weather-summary", version, about)]
struct CliArgs {
    /// Input weather data CSV path.
    #[arg(long)]
    input: PathBuf,

    /// Output summary file.
    #[arg(long, default_value = "summary.txt")]
    output: PathBuf,

    /// Weather station the data was collected from.
    #[arg(long)]
    station_name: Option<String>,

    /// Minimum R² for a trend to be reported (default: 0.3).
    #[arg(long)]
    r2_threshold: Option<f64>,

    /// Maximum p-value for a trend to be reported (default: 0.05).
    #[arg(long)]
    p_value_threshold: Option<f64>,

    /// Z-score a yearly mean must reach to be reported (default: 2.0).
    #[arg(long)]
    extreme_threshold: Option<f64>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Unit system of the data: metric or imperial.
    #[arg(long)]
    units: Option<UnitSystem>,

    /// Built-in variable registry: standard or open-meteo.
    #[arg(long)]
    preset: Option<Preset>,

    /// Seed for phrasing choices; repeat a seed to repeat the summary.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write the planned facts as JSON to this path.
    #[arg(long)]
    facts_json: Option<PathBuf>,

    /// Append log entries to this file.
    #[arg(long)]
    log_file: Option<String>,

    /// Log debug detail, with timestamps, to stderr.
    #[arg(long, short)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn load_config(args: &CliArgs) -> Result<SummaryConfig, Box<dyn Error>> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            logging::info(Stage::System, None, &format!("Loading config from {}", path.display()));
            SummaryConfig::load(&path)?
        }
        None => SummaryConfig::default(),
    };

    if let Some(name) = &args.station_name {
        config.station_name = Some(name.clone());
    }
    if let Some(r2) = args.r2_threshold {
        config.thresholds.r2_threshold = r2;
    }
    if let Some(p) = args.p_value_threshold {
        config.thresholds.p_value_threshold = p;
    }
    if let Some(z) = args.extreme_threshold {
        config.thresholds.extreme_threshold = z;
    }
    if let Some(units) = args.units {
        config.units = units;
    }
    if let Some(preset) = args.preset {
        config.preset = preset;
    }

    // Flags can push thresholds out of range too
    config.validate()?;
    Ok(config)
}

fn print_config(config: &SummaryConfig) {
    println!("Configuration:");
    println!("  r2_threshold:      {}", config.thresholds.r2_threshold);
    println!("  p_value_threshold: {}", config.thresholds.p_value_threshold);
    println!("  extreme_threshold: {}", config.thresholds.extreme_threshold);
    println!("  units:             {:?}", config.units);
    println!("  preset:            {:?}", config.preset);
    println!("  correlation:       {:?}", config.planner.correlation_ranking);
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn write_file(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let args = CliArgs::parse();

    let level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    // Debug entries only reach the console in timestamped mode
    logging::init_logger(level, args.log_file.as_deref(), args.verbose);

    let config = load_config(&args)?;

    println!("Analyzing weather data from {}...", args.input.display());
    let loaded = daily_csv::load_daily_csv(&args.input, config.standardizes_columns())?;
    if loaded.table.is_empty() {
        logging::error(Stage::Loader, None, "no complete rows in input");
    }
    println!(
        "Loaded {} daily records ({} incomplete rows skipped)",
        loaded.table.len(),
        loaded.dropped_rows
    );

    let mut summarizer = match args.seed {
        Some(seed) => Summarizer::seeded(config, seed),
        None => Summarizer::new(config),
    };
    let station = summarizer
        .station_name(loaded.station_name.as_deref())
        .to_string();

    let stats = summarizer.analyze(&loaded.table, &station)?;
    let facts = summarizer.plan(&stats);
    if let Some(path) = &args.facts_json {
        write_file(path, &serde_json::to_string_pretty(&facts)?)?;
        logging::info(Stage::Planner, None, &format!("Facts written to {}", path.display()));
    }
    let summary = summarizer.render(&facts);

    write_file(&args.output, &summary)?;

    println!();
    print_config(summarizer.config());
    println!("\nGenerated Summary:");
    println!("{}", "=".repeat(80));
    println!("{}", summary);
    println!("{}", "=".repeat(80));
    println!("\nSummary saved to {}", args.output.display());

    Ok(())
}
