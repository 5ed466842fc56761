//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_alert_adapter::ConsoleAlertAdapter;
use crate::adapters::csv_alert_adapter::CsvAlertAdapter;
use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_holdings_adapter::CsvHoldingsAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::polygon_adapter::PolygonAdapter;
use crate::domain::config_validation::validate_monitor_config;
use crate::domain::error::SellwatchError;
use crate::domain::exit_rules::ExitRules;
use crate::domain::monitor::run_monitor;
use crate::domain::price_history::PriceHistory;
use crate::ports::alert_port::AlertPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::holdings_port::HoldingsPort;

#[derive(Parser, Debug)]
#[command(name = "sellwatch", about = "Daily exit-rule monitor for open equity positions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate every holding and report sell alerts
    Monitor {
        #[arg(short, long)]
        config: PathBuf,
        /// Holdings CSV, overriding [holdings] file
        #[arg(long)]
        holdings: Option<PathBuf>,
        /// Also write alerts to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluation date (YYYY-MM-DD), default today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Per-position diagnostics on stderr
        #[arg(short, long)]
        verbose: bool,
        /// Validate config and holdings without fetching prices
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a monitor configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the available price data range for each holding
    Info {
        #[arg(short, long)]
        config: PathBuf,
        /// Restrict to one ticker
        #[arg(long)]
        ticker: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Monitor {
            config,
            holdings,
            output,
            as_of,
            verbose,
            dry_run,
        } => run_monitor_cmd(
            &config,
            holdings.as_ref(),
            output.as_ref(),
            as_of,
            verbose,
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SellwatchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Thresholds are configured in percent and converted to fractions here,
/// once.
pub fn build_exit_rules(config: &dyn ConfigPort) -> ExitRules {
    ExitRules {
        min_hold_days: config.get_int("rules", "min_hold_days", 30),
        stop_loss: config.get_double("rules", "stop_loss_pct", 10.0) / 100.0,
        profit_target: config.get_double("rules", "profit_target_pct", 60.0) / 100.0,
        trailing_activation: config.get_double("rules", "trailing_activation_pct", 20.0) / 100.0,
        trailing_drop: config.get_double("rules", "trailing_drop_pct", 10.0) / 100.0,
    }
}

/// CLI flag wins over `[monitor] as_of`, which wins over wall-clock today.
pub fn resolve_as_of(
    flag: Option<NaiveDate>,
    config: &dyn ConfigPort,
) -> Result<NaiveDate, SellwatchError> {
    if let Some(date) = flag {
        return Ok(date);
    }
    match config.get_string("monitor", "as_of") {
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| SellwatchError::ConfigInvalid {
                section: "monitor".into(),
                key: "as_of".into(),
                reason: "invalid as_of format, expected YYYY-MM-DD".into(),
            })
        }
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

pub fn resolve_holdings_path(
    flag: Option<&PathBuf>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, SellwatchError> {
    if let Some(path) = flag {
        return Ok(path.clone());
    }
    config
        .get_string("holdings", "file")
        .map(PathBuf::from)
        .ok_or_else(|| SellwatchError::ConfigMissing {
            section: "holdings".into(),
            key: "file".into(),
        })
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, SellwatchError> {
    let source = config
        .get_string("provider", "source")
        .unwrap_or_else(|| "polygon".to_string());

    match source.as_str() {
        "polygon" => Ok(Box::new(PolygonAdapter::from_config(config)?)),
        "csv" => Ok(Box::new(CsvDataAdapter::from_config(config)?)),
        other => Err(SellwatchError::ConfigInvalid {
            section: "provider".into(),
            key: "source".into(),
            reason: format!("unknown source '{}' (expected polygon or csv)", other),
        }),
    }
}

fn print_rules(rules: &ExitRules) {
    eprintln!("Exit rules:");
    eprintln!("  min hold:            {} days", rules.min_hold_days);
    eprintln!("  stop loss:           -{:.1}%", rules.stop_loss * 100.0);
    eprintln!("  profit target:       +{:.1}%", rules.profit_target * 100.0);
    eprintln!(
        "  trailing activation: +{:.1}%",
        rules.trailing_activation * 100.0
    );
    eprintln!("  trailing drop:       -{:.1}%", rules.trailing_drop * 100.0);
}

fn run_monitor_cmd(
    config_path: &PathBuf,
    holdings_override: Option<&PathBuf>,
    output_override: Option<&PathBuf>,
    as_of_flag: Option<NaiveDate>,
    verbose: bool,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_monitor_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Resolve rules and evaluation date
    let rules = build_exit_rules(&adapter);
    let as_of = match resolve_as_of(as_of_flag, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Load holdings. A failed load aborts the run with no alerts;
    // the caller can retry after fixing the file.
    let holdings_path = match resolve_holdings_path(holdings_override, &adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let holdings_port = CsvHoldingsAdapter::new(holdings_path.clone(), as_of);
    let positions = match holdings_port.load() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Loaded {} positions from {}",
        positions.len(),
        holdings_path.display()
    );

    if dry_run {
        print_rules(&rules);
        for position in &positions {
            eprintln!(
                "  {}: purchased {} @ {:.2}, {} shares",
                position.ticker, position.purchase_date, position.purchase_price, position.shares
            );
        }
        eprintln!("Dry run complete: configuration and holdings are valid");
        return ExitCode::SUCCESS;
    }

    // Stage 4: Build the price provider
    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Evaluate
    eprintln!("Evaluating {} positions as of {}", positions.len(), as_of);
    let result = run_monitor(data_port.as_ref(), &positions, &rules, as_of, verbose);
    eprintln!(
        "Evaluated {} positions, skipped {}, {} alert(s)",
        result.evaluated,
        result.skipped.len(),
        result.alerts.len()
    );

    // Stage 6: Report
    if let Err(e) = ConsoleAlertAdapter.write(&result.alerts) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let output_path = output_override
        .cloned()
        .or_else(|| adapter.get_string("report", "file").map(PathBuf::from));
    if let Some(path) = output_path {
        if let Err(e) = CsvAlertAdapter::new(path.clone()).write(&result.alerts) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Alerts written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_monitor_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    print_rules(&build_exit_rules(&adapter));
    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, ticker_filter: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_monitor_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let as_of = match resolve_as_of(None, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let holdings_path = match resolve_holdings_path(None, &adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let positions = match CsvHoldingsAdapter::new(holdings_path, as_of).load() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let filter = ticker_filter.map(str::to_uppercase);
    for position in &positions {
        if let Some(ref t) = filter {
            if position.ticker != *t {
                continue;
            }
        }
        match data_port.fetch_daily(&position.ticker, position.purchase_date, as_of) {
            Ok(bars) => {
                let history = PriceHistory::new(bars);
                match history.date_range() {
                    Some((first, last)) => {
                        println!(
                            "{}: {} bars, {} to {}",
                            position.ticker,
                            history.bar_count(),
                            first,
                            last
                        );
                    }
                    None => println!("{}: no data", position.ticker),
                }
            }
            Err(e) => eprintln!("error querying {}: {}", position.ticker, e),
        }
    }
    ExitCode::SUCCESS
}
