//! CLI definition and dispatch.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{resolve_initial_capital, validate_engine_config};
use crate::domain::dataset::Dataset;
use crate::domain::decision::{group_thousands, DecisionResult, FeatureSnapshot};
use crate::domain::engine::{DecisionEngine, EngineConfig};
use crate::domain::error::SnaptraderError;
use crate::domain::prepare::prepare;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

/// Pre-selected symbol when neither the command line nor the config names one.
pub const FALLBACK_DEFAULT_SYMBOL: &str = "RELIANCE";

#[derive(Parser, Debug)]
#[command(name = "snaptrader", about = "Snapshot stock decision calculator")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one or more symbols and export the decision as CSV
    Decide {
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Comma-separated symbols; defaults to the configured default symbol
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Print one CSV document for all symbols to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },
    /// List the symbols in a snapshot
    Symbols {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the prepared features behind a symbol's decision
    Inspect {
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Decide {
            data,
            symbol,
            capital,
            config,
            output_dir,
            stdout,
        } => run_decide(
            config.as_ref(),
            data.as_ref(),
            symbol.as_deref(),
            capital,
            output_dir.as_ref(),
            stdout,
        ),
        Command::Symbols { data, config } => run_symbols(config.as_ref(), data.as_ref()),
        Command::Inspect {
            data,
            symbol,
            config,
        } => run_inspect(config.as_ref(), data.as_ref(), symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load the INI file if one was given; otherwise every key takes its default.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, SnaptraderError> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Merge config values with command-line overrides and validate the result.
pub fn build_engine_config(
    config: &dyn ConfigPort,
    capital_override: Option<f64>,
    data_override: Option<&PathBuf>,
    output_override: Option<&PathBuf>,
) -> Result<EngineConfig, SnaptraderError> {
    validate_engine_config(config)?;
    let initial_capital = resolve_initial_capital(config, capital_override)?;

    Ok(EngineConfig {
        initial_capital,
        default_symbol: config
            .get_string("engine", "default_symbol")
            .map(|s| s.trim().to_string()),
        data_path: data_override
            .cloned()
            .or_else(|| config.get_path("data", "path")),
        output_dir: output_override
            .cloned()
            .or_else(|| config.get_path("report", "output_dir"))
            .unwrap_or_else(|| PathBuf::from(".")),
    })
}

/// Symbols to decide, in request order without duplicates. Falls back to
/// the configured default symbol, then to the first symbol in the dataset.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    default_symbol: Option<&str>,
    dataset: &Dataset,
) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    if let Some(s) = symbol_override {
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !symbols.iter().any(|existing| existing == token) {
                symbols.push(token.to_string());
            }
        }
    }
    if symbols.is_empty() {
        let preferred = default_symbol.unwrap_or(FALLBACK_DEFAULT_SYMBOL);
        if let Some(s) = dataset.default_symbol(Some(preferred)) {
            symbols.push(s.to_string());
        }
    }
    symbols
}

fn data_port_for(config: &EngineConfig) -> Result<CsvAdapter, SnaptraderError> {
    config
        .data_path
        .clone()
        .map(CsvAdapter::new)
        .ok_or_else(|| SnaptraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

pub fn load_engine(
    data_port: &dyn DataPort,
    config: &EngineConfig,
) -> Result<DecisionEngine, SnaptraderError> {
    let table = data_port.fetch_snapshot()?;
    let dataset = prepare(&table)?;
    eprintln!("Loaded {} stock records", dataset.len());
    DecisionEngine::new(Arc::new(dataset), config.initial_capital)
}

#[derive(Debug, Default)]
pub struct DecideOutcome {
    pub results: Vec<DecisionResult>,
    pub written: Vec<PathBuf>,
    pub failures: Vec<(String, SnaptraderError)>,
}

pub fn run_decide_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    config: &EngineConfig,
    symbol_override: Option<&str>,
    to_stdout: bool,
) -> Result<DecideOutcome, SnaptraderError> {
    let engine = load_engine(data_port, config)?;

    let symbols = resolve_symbols(
        symbol_override,
        config.default_symbol.as_deref(),
        engine.dataset(),
    );

    let mut outcome = DecideOutcome::default();
    for (symbol, result) in engine.decide_all(&symbols) {
        let result = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("warning: {e}");
                outcome.failures.push((symbol.to_string(), e));
                continue;
            }
        };

        print_decision(&result);

        if !to_stdout {
            let path = config
                .output_dir
                .join(CsvReportAdapter::file_name(&result.symbol));
            report_port.write(&result, &path)?;
            eprintln!("Decision written to: {}", path.display());
            outcome.written.push(path);
        }
        outcome.results.push(result);
    }

    if to_stdout && !outcome.results.is_empty() {
        let bytes = report_port.render_all(&outcome.results)?;
        print!("{}", String::from_utf8_lossy(&bytes));
    }

    Ok(outcome)
}

fn print_decision(r: &DecisionResult) {
    eprintln!("\n=== Decision for {} ===", r.symbol);
    eprintln!("Signal:           {}", r.signal);
    eprintln!("Decision Score:   {}", group_thousands(r.score, 4));
    eprintln!("LTP:              {}", group_thousands(r.ltp, 2));
    eprintln!(
        "1-Year Trend:     {}% ({}% 30-day)",
        group_thousands(r.change_365d, 2),
        group_thousands(r.change_30d, 2)
    );
    eprintln!("\n--- Trade Log ---");
    for line in &r.log {
        eprintln!("  {line}");
    }
    eprintln!("\n--- Simulated Performance ---");
    eprintln!(
        "Profit/Loss:      {} ({:.2}% return)",
        group_thousands(r.simulated_profit, 2),
        r.cumulative_return * 100.0
    );
    eprintln!("Final Capital:    {}", group_thousands(r.final_capital, 2));
    eprintln!("Sharpe Ratio:     {:.4}", r.sharpe_ratio);
}

fn run_decide(
    config_path: Option<&PathBuf>,
    data: Option<&PathBuf>,
    symbol: Option<&str>,
    capital: Option<f64>,
    output_dir: Option<&PathBuf>,
    to_stdout: bool,
) -> Result<ExitCode, SnaptraderError> {
    let adapter = load_config(config_path)?;
    let config = build_engine_config(&adapter, capital, data, output_dir)?;
    let data_port = data_port_for(&config)?;

    if !to_stdout {
        ensure_dir(&config.output_dir)?;
    }

    let outcome = run_decide_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &config,
        symbol,
        to_stdout,
    )?;

    match outcome.failures.first() {
        Some((_, e)) => Ok(e.into()),
        None if outcome.results.is_empty() => {
            eprintln!("error: no symbols to decide");
            Ok(ExitCode::from(4))
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), SnaptraderError> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn run_symbols(
    config_path: Option<&PathBuf>,
    data: Option<&PathBuf>,
) -> Result<ExitCode, SnaptraderError> {
    let adapter = load_config(config_path)?;
    let config = build_engine_config(&adapter, None, data, None)?;
    let engine = load_engine(&data_port_for(&config)?, &config)?;

    let symbols = engine.dataset().symbols();
    for symbol in &symbols {
        println!("{symbol}");
    }
    eprintln!("{} symbols found", symbols.len());
    Ok(ExitCode::SUCCESS)
}

pub fn format_features(f: &FeatureSnapshot) -> String {
    format!(
        "Symbol:         {}\n\
         LTP:            {}\n\
         30 d % chng:    {}\n\
         365 d % chng:   {}\n\
         Volume (lacs):  {}\n\
         Volume_Ratio:   {:.6}\n\
         Momentum_Score: {:.6}\n",
        f.symbol,
        f.ltp,
        f.change_30d,
        f.change_365d,
        f.volume_lacs,
        f.volume_ratio,
        f.momentum_score,
    )
}

fn run_inspect(
    config_path: Option<&PathBuf>,
    data: Option<&PathBuf>,
    symbol: Option<&str>,
) -> Result<ExitCode, SnaptraderError> {
    let adapter = load_config(config_path)?;
    let config = build_engine_config(&adapter, None, data, None)?;
    let engine = load_engine(&data_port_for(&config)?, &config)?;

    let symbols = resolve_symbols(symbol, config.default_symbol.as_deref(), engine.dataset());
    for s in &symbols {
        print!("{}", format_features(&engine.features(s)?));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_validate(config_path: &PathBuf) -> Result<ExitCode, SnaptraderError> {
    let adapter = load_config(Some(config_path))?;
    let config = build_engine_config(&adapter, None, None, None)?;

    eprintln!(
        "  initial_capital: {}",
        group_thousands(config.initial_capital, 2)
    );
    eprintln!(
        "  default_symbol:  {}",
        config
            .default_symbol
            .as_deref()
            .unwrap_or(FALLBACK_DEFAULT_SYMBOL)
    );
    if let Some(p) = &config.data_path {
        eprintln!("  data path:       {}", p.display());
    }
    eprintln!("  output dir:      {}", config.output_dir.display());
    eprintln!("\nConfiguration is valid.");
    Ok(ExitCode::SUCCESS)
}
