//! SwingScan CLI — scan a universe, evaluate one symbol, inspect a universe.
//!
//! Commands:
//! - `scan` — run a configured scan and print the passing symbols
//! - `evaluate` — evaluate one symbol and dump its decision and indicators
//! - `universe` — print the resolved symbol list of a universe file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swingscan_core::data::{DataProvider, UniverseProvider};
use swingscan_core::{EngineConfig, Evaluation, SignalComposer};
use swingscan_runner::config::{history_start, DEFAULT_HISTORY_DAYS};
use swingscan_runner::{
    run_scan, CsvDirProvider, DataSourceConfig, FileUniverse, ScanConfig, ScanReport,
    SyntheticProvider,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "swingscan",
    about = "SwingScan — multi-indicator swing signal scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every symbol of the configured universe.
    Scan {
        /// Path to the scan TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Override `engine.min_conditions`.
        #[arg(long)]
        min_conditions: Option<usize>,

        /// Also write the decision table to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Send the summary to the configured notification sinks.
        #[arg(long, default_value_t = false)]
        notify: bool,

        /// Replace the configured data source with synthetic bars.
        #[arg(long, default_value_t = false)]
        offline_synthetic: bool,
    },
    /// Evaluate a single symbol and print its decision.
    Evaluate {
        #[arg(long)]
        symbol: String,

        /// Directory of `<SYMBOL>.csv` files.
        #[arg(long, conflicts_with = "synthetic")]
        csv_dir: Option<PathBuf>,

        /// Use deterministic synthetic bars.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Engine config (TOML or JSON). Defaults to the built-in scanner setup.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD). Defaults to one year before the end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Number of trailing bars to print per series.
        #[arg(long, default_value_t = 5)]
        last: usize,

        /// Print the full evaluation as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the symbols of a universe file.
    Universe {
        /// Plain list or `.toml` sector map.
        #[arg(long)]
        file: PathBuf,

        /// Only this sector of a sector map.
        #[arg(long)]
        sector: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            min_conditions,
            export,
            notify,
            offline_synthetic,
        } => run_scan_cmd(config, min_conditions, export, notify, offline_synthetic),
        Commands::Evaluate {
            symbol,
            csv_dir,
            synthetic,
            config,
            start,
            end,
            last,
            json,
        } => run_evaluate_cmd(symbol, csv_dir, synthetic, config, start, end, last, json),
        Commands::Universe { file, sector } => run_universe_cmd(file, sector),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'")))
        .transpose()
}

fn run_scan_cmd(
    config_path: PathBuf,
    min_conditions: Option<usize>,
    export: Option<PathBuf>,
    notify: bool,
    offline_synthetic: bool,
) -> Result<()> {
    let mut config = ScanConfig::from_file(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    if let Some(min) = min_conditions {
        config.engine.min_conditions = min;
    }
    if let Some(path) = export {
        config.export.csv = Some(path);
    }
    if offline_synthetic {
        config.data = DataSourceConfig::Synthetic;
    }
    config.validate().context("invalid scan config")?;

    let composer = SignalComposer::new(config.engine.clone()).context("invalid engine config")?;
    let provider = config.build_provider().context("failed to set up data source")?;
    let universe = config.build_universe().context("failed to set up universe")?;
    let options = config
        .scan_options(today())
        .context("invalid scan window")?;

    let fingerprint = config.fingerprint().context("failed to hash config")?;
    info!(config = %config_path.display(), %fingerprint, "loaded scan config");

    let report = run_scan(&composer, provider.as_ref(), universe.as_ref(), &options)?;

    let min_score = config.notify.min_score.unwrap_or(config.engine.min_conditions);
    print_table(&report, min_score);

    let export_failures = report.export_to(&config.build_export_sinks());

    let mut notify_failures = 0;
    if notify {
        let sinks = config
            .build_notification_sinks()
            .context("failed to set up notification sinks")?;
        notify_failures = report.notify_to(&sinks, config.notify.min_score);
    }

    if export_failures + notify_failures > 0 {
        bail!("{export_failures} export and {notify_failures} notification sink(s) failed");
    }
    Ok(())
}

fn print_table(report: &ScanReport, min_score: usize) {
    let rows = report.passing(min_score);
    println!(
        "{} of {} symbols score >= {min_score} ({} failed)",
        rows.len(),
        report.outcomes.len(),
        report.failures.len()
    );
    for f in &report.failures {
        eprintln!("failed {}: {}", f.symbol, f.error);
    }
    if rows.is_empty() {
        return;
    }
    println!("{:<8} {:<6} {:>5} {:<11} conditions", "symbol", "signal", "score", "date");
    for o in rows {
        let date = o.decision.date.map(|d| d.to_string()).unwrap_or_default();
        let satisfied: Vec<&str> = o.decision.satisfied().collect();
        let flag = if o.insufficient_history { " *" } else { "" };
        println!(
            "{:<8} {:<6} {:>5} {:<11} {}{flag}",
            o.symbol,
            o.decision.signal.as_str(),
            o.decision.score,
            date,
            satisfied.join(",")
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn run_evaluate_cmd(
    symbol: String,
    csv_dir: Option<PathBuf>,
    synthetic: bool,
    config: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    last: usize,
    json: bool,
) -> Result<()> {
    let engine = match &config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let composer = SignalComposer::new(engine).context("invalid engine config")?;

    let provider: Box<dyn DataProvider> = match (csv_dir, synthetic) {
        (Some(dir), false) => Box::new(CsvDirProvider::new(dir)),
        (None, true) => Box::new(SyntheticProvider::new()),
        _ => bail!("pass exactly one of --csv-dir or --synthetic"),
    };

    let end = parse_date(end.as_deref())?.unwrap_or_else(today);
    let start = match parse_date(start.as_deref())? {
        Some(start) => start,
        None => history_start(end, DEFAULT_HISTORY_DAYS).context("invalid date window")?,
    };

    let symbol = symbol.trim().to_ascii_uppercase();
    let series = provider
        .fetch(&symbol, start, end)
        .with_context(|| format!("failed to load bars for {symbol}"))?;
    let eval = composer.evaluate(&series);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&eval).context("failed to serialize evaluation")?
        );
    } else {
        print_evaluation(&eval, last);
    }
    Ok(())
}

fn print_evaluation(eval: &Evaluation, last: usize) {
    let d = &eval.decision;
    let date = d.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    println!(
        "{} {} {} score={} position_open={}",
        d.symbol, date, d.signal, d.score, d.position_open
    );
    for (name, held) in &d.conditions {
        println!("  {:<20} {}", name, if *held { "yes" } else { "no" });
    }

    let n = eval.scores.len();
    let from = n.saturating_sub(last);
    println!();
    for name in eval.indicators.names() {
        let Some(series) = eval.indicators.get_series(name) else {
            continue;
        };
        let tail: Vec<String> = series[from.min(series.len())..]
            .iter()
            .map(|v| if v.is_nan() { "-".to_string() } else { format!("{v:.2}") })
            .collect();
        println!("  {:<12} {}", name, tail.join("  "));
    }
    let scores: Vec<String> = eval.scores[from..].iter().map(|s| s.to_string()).collect();
    println!("  {:<12} {}", "score", scores.join("  "));
}

fn run_universe_cmd(file: PathBuf, sector: Option<String>) -> Result<()> {
    let universe = match sector {
        Some(s) => FileUniverse::new(&file).with_sector(s),
        None => FileUniverse::new(&file),
    };
    let symbols = universe
        .symbols()
        .with_context(|| format!("failed to read universe {}", file.display()))?;
    for s in &symbols {
        println!("{s}");
    }
    info!(count = symbols.len(), "universe resolved");
    Ok(())
}
