//! AthLab CLI: drawdown, recovery and correction analysis.
//!
//! Commands:
//! - `analyze`: load one or more symbols and report drawdown episodes,
//!   correction labels and time to new all-time highs
//! - `export`: re-render a saved `report.json`
//! - `search`: look up NSE/BSE tickers and indices on Yahoo Finance

use anyhow::{bail, Context, Result};
use athlab_core::config::AnalysisConfig;
use athlab_core::data::{
    load_series, normalize_ticker, CircuitBreaker, LoadOptions, PriceProvider, SeriesSource,
    TickerMatch, YahooProvider,
};
use athlab_core::engine::{underwater_curve, UnderwaterPoint};
use athlab_core::report::{
    export_json, generate_report, generate_summary_table, load_report, save_artifacts,
    AnalysisReport,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "athlab",
    about = "AthLab CLI: drawdowns, recoveries and time to new all-time highs"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG still takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze drawdown episodes for one or more symbols.
    Analyze {
        /// Symbols to analyze (e.g., RELIANCE TCS ^NSEI).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Read prices from a CSV file instead of downloading (single symbol only).
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Use synthetic data when a download fails (results are tagged).
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Offline mode: no network access. Requires --csv or --synthetic.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Start date (YYYY-MM-DD). Defaults to full history.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write report.json and CSV artifacts under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Re-render a saved report (artifact directory or report.json).
    Export {
        path: PathBuf,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Find ticker symbols by company or index name.
    Search {
        /// Search terms (e.g., "tata motors").
        #[arg(required = true)]
        query: Vec<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Analyze {
            symbols,
            csv,
            synthetic,
            offline,
            start,
            end,
            config,
            format,
            output_dir,
        } => run_analyze(AnalyzeArgs {
            symbols,
            csv,
            synthetic,
            offline,
            start,
            end,
            config,
            format,
            output_dir,
        }),
        Commands::Export { path, format } => run_export(&path, format),
        Commands::Search { query, format } => run_search(&query.join(" "), format),
    }
}

struct AnalyzeArgs {
    symbols: Vec<String>,
    csv: Option<PathBuf>,
    synthetic: bool,
    offline: bool,
    start: Option<String>,
    end: Option<String>,
    config: Option<PathBuf>,
    format: OutputFormat,
    output_dir: Option<PathBuf>,
}

fn parse_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("{flag} must be YYYY-MM-DD, got '{s}'"))
        })
        .transpose()
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    if args.csv.is_some() && args.symbols.len() != 1 {
        bail!("--csv reads a single series; pass exactly one symbol");
    }
    if args.offline && args.csv.is_none() && !args.synthetic {
        bail!("--offline needs --csv or --synthetic");
    }

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(start) = parse_date(args.start.as_deref(), "--start")? {
        config.data.start = Some(start);
    }
    if let Some(end) = parse_date(args.end.as_deref(), "--end")? {
        config.data.end = Some(end);
    }
    config.validate()?;

    let opts = LoadOptions {
        start: config.data.start_or_full_history(),
        end: config.data.end_or(chrono::Local::now().date_naive()),
        price_field: config.data.price_field,
        synthetic_fallback: args.synthetic,
    };
    log::debug!("load options: {opts:?}");

    let provider = if args.csv.is_none() && !args.offline {
        Some(YahooProvider::new(Arc::new(CircuitBreaker::default_provider()))?)
    } else {
        None
    };

    let symbols: Vec<String> = if args.csv.is_some() {
        args.symbols.iter().map(|s| s.trim().to_string()).collect()
    } else {
        args.symbols
            .iter()
            .map(|s| normalize_ticker(s, &config.data.exchange_suffix))
            .collect()
    };

    let results: Vec<(String, Result<(AnalysisReport, Vec<UnderwaterPoint>)>)> = symbols
        .par_iter()
        .map(|symbol| {
            let source = match (&args.csv, &provider) {
                (Some(path), _) => SeriesSource::Csv(path.as_path()),
                (None, Some(p)) => SeriesSource::Provider(p as &dyn PriceProvider),
                (None, None) => SeriesSource::Synthetic,
            };
            (symbol.clone(), analyze_symbol(symbol, source, &opts, &config))
        })
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (symbol, result) in results {
        match result {
            Ok(ok) => reports.push(ok),
            Err(e) => {
                failures += 1;
                eprintln!("Error for {symbol}: {e:#}");
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        for (report, underwater) in &reports {
            let run_dir = save_artifacts(report, underwater, dir)?;
            eprintln!("Artifacts saved to: {}", run_dir.display());
        }
    }

    let reports: Vec<AnalysisReport> = reports.into_iter().map(|(r, _)| r).collect();
    match args.format {
        OutputFormat::Json if reports.len() == 1 => println!("{}", export_json(&reports[0])?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
            if reports.len() > 1 {
                println!("{}", generate_summary_table(&reports));
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn analyze_symbol(
    symbol: &str,
    source: SeriesSource<'_>,
    opts: &LoadOptions,
    config: &AnalysisConfig,
) -> Result<(AnalysisReport, Vec<UnderwaterPoint>)> {
    let loaded = load_series(symbol, source, opts)
        .with_context(|| format!("failed to load prices for {symbol}"))?;
    if loaded.dropped_missing > 0 || loaded.dropped_duplicates > 0 {
        log::info!(
            "{symbol}: ignored {} missing and {} duplicate rows",
            loaded.dropped_missing,
            loaded.dropped_duplicates
        );
    }
    let report = AnalysisReport::from_loaded(&loaded, &config.report)
        .with_context(|| format!("analysis failed for {symbol}"))?;
    Ok((report, underwater_curve(&loaded.series)))
}

fn run_export(path: &Path, format: OutputFormat) -> Result<()> {
    let report =
        load_report(path).with_context(|| format!("failed to load {}", path.display()))?;
    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", export_json(&report)?),
    }
    Ok(())
}

fn run_search(query: &str, format: OutputFormat) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("search query is empty");
    }
    let provider = YahooProvider::new(Arc::new(CircuitBreaker::default_provider()))?;
    let matches = provider
        .search(query)
        .with_context(|| format!("ticker search failed for '{query}'"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
        OutputFormat::Text => print_matches(query, &matches),
    }
    Ok(())
}

fn print_matches(query: &str, matches: &[TickerMatch]) {
    if matches.is_empty() {
        println!("No NSE/BSE tickers or indices match '{query}'");
        return;
    }
    let width = matches.iter().map(|m| m.symbol.len()).max().unwrap_or(0);
    for m in matches {
        println!("{:<width$}  {}", m.symbol, m.name);
    }
}

fn print_report(report: &AnalysisReport) {
    println!();
    print!("{}", generate_report(report));
    if report.is_synthetic() {
        println!("WARNING: Results based on SYNTHETIC data");
        println!();
    }
}
