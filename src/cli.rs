//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::error::BacktestError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::indicator::{self, IndicatorParams};
use crate::domain::metrics::MetricsConfig;
use crate::domain::series::BarSeries;
use crate::domain::signal::{AggregationMode, RsiMode, SignalConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "crossback", about = "Indicator-crossover strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the symbol from the config file
        #[arg(long)]
        symbol: Option<String>,
        /// Override the CSV directory from the config file
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols available in a CSV directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        symbol: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            symbol,
            data_dir,
            output,
        } => run_backtest_command(&config, symbol.as_deref(), data_dir, output.as_deref()),
        Command::ListSymbols { data_dir } => run_list_symbols(data_dir),
        Command::Info { data_dir, symbol } => run_info(data_dir, &symbol),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
    output_path: Option<&std::path::Path>,
) -> Result<(), BacktestError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = FileConfigAdapter::from_file(config_path)?;

    let config = BacktestConfig {
        signal: build_signal_config(&adapter)?,
        execution: build_execution_config(&adapter)?,
        metrics: build_metrics_config(&adapter)?,
    };
    let params = build_indicator_params(&adapter)?;

    let symbol = match symbol_override {
        Some(s) => s.to_string(),
        None => adapter
            .get_string("data", "symbol")
            .ok_or_else(|| BacktestError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };
    let csv_dir = match data_dir_override {
        Some(dir) => dir,
        None => adapter
            .get_string("data", "csv_dir")
            .map(PathBuf::from)
            .ok_or_else(|| BacktestError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            })?,
    };

    let start_date = parse_config_date(&adapter, "start_date", NaiveDate::MIN)?;
    let end_date = parse_config_date(&adapter, "end_date", NaiveDate::MAX)?;

    let data_port = CsvAdapter::new(csv_dir);
    let bars = data_port.fetch_ohlcv(&symbol, start_date, end_date)?;
    if bars.is_empty() {
        return Err(BacktestError::NoData { symbol });
    }
    eprintln!("Loaded {} bars for {symbol}", bars.len());

    let mut series_data = BarSeries::new(symbol.clone(), bars)?;
    indicator::attach_standard(&mut series_data, &params)?;

    let minimum = params.warmup_bars();
    if series_data.len() < minimum {
        // Not fatal: the run proceeds, every signal is Hold and the
        // metrics come out undefined.
        let warning = BacktestError::InsufficientData {
            symbol: symbol.clone(),
            bars: series_data.len(),
            minimum,
        };
        eprintln!("warning: {warning}");
    }

    let result = run_backtest(&series_data, &config)?;
    eprintln!(
        "Backtest complete: {} trades over {} bars",
        result.trades.len(),
        series_data.len()
    );

    let report = TextReportAdapter;
    match output_path {
        Some(path) => {
            let mut file = File::create(path)?;
            report.write(&result, &symbol, &mut file)?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            report.write(&result, &symbol, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn run_list_symbols(data_dir: PathBuf) -> Result<(), BacktestError> {
    let data_port = CsvAdapter::new(data_dir);
    for symbol in data_port.list_symbols()? {
        println!("{symbol}");
    }
    Ok(())
}

fn run_info(data_dir: PathBuf, symbol: &str) -> Result<(), BacktestError> {
    let data_port = CsvAdapter::new(data_dir);
    match data_port.data_range(symbol)? {
        Some((first, last, count)) => {
            println!("{symbol}: {count} bars from {first} to {last}");
            Ok(())
        }
        None => Err(BacktestError::NoData {
            symbol: symbol.to_string(),
        }),
    }
}

fn parse_config_date(
    config: &dyn ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, BacktestError> {
    match config.get_string("data", key) {
        None => Ok(default),
        Some(raw) => {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| BacktestError::ConfigInvalid {
                section: "data".into(),
                key: key.into(),
                reason: e.to_string(),
            })
        }
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn build_signal_config(config: &dyn ConfigPort) -> Result<SignalConfig, BacktestError> {
    let defaults = SignalConfig::default();

    let oversold = config.get_double("strategy", "oversold", defaults.oversold);
    let overbought = config.get_double("strategy", "overbought", defaults.overbought);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid("strategy", "oversold", "must be between 0 and 100"));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid("strategy", "overbought", "must be between 0 and 100"));
    }
    if oversold >= overbought {
        return Err(invalid("strategy", "oversold", "must be below overbought"));
    }

    let rsi_mode = match config
        .get_string("strategy", "rsi_mode")
        .unwrap_or_else(|| "threshold".to_string())
        .to_lowercase()
        .as_str()
    {
        "threshold" => RsiMode::Threshold,
        "crossover" => RsiMode::Crossover,
        other => {
            return Err(invalid(
                "strategy",
                "rsi_mode",
                format!("unknown mode '{other}' (threshold, crossover)"),
            ));
        }
    };

    let aggregation = match config
        .get_string("strategy", "aggregation")
        .unwrap_or_else(|| "unanimous".to_string())
        .to_lowercase()
        .as_str()
    {
        "unanimous" => AggregationMode::Unanimous,
        "any" => AggregationMode::Any,
        "majority" => AggregationMode::Majority,
        other => {
            return Err(invalid(
                "strategy",
                "aggregation",
                format!("unknown mode '{other}' (unanimous, any, majority)"),
            ));
        }
    };

    Ok(SignalConfig {
        oversold,
        overbought,
        rsi_mode,
        aggregation,
        enable_rsi: config.get_bool("strategy", "enable_rsi", defaults.enable_rsi),
        enable_macd: config.get_bool("strategy", "enable_macd", defaults.enable_macd),
        enable_sma: config.get_bool("strategy", "enable_sma", defaults.enable_sma),
    })
}

pub fn build_execution_config(config: &dyn ConfigPort) -> Result<ExecutionConfig, BacktestError> {
    let defaults = ExecutionConfig::default();

    let initial_cash = config.get_double("backtest", "initial_cash", defaults.initial_cash);
    if initial_cash <= 0.0 {
        return Err(invalid("backtest", "initial_cash", "must be positive"));
    }

    let position_size = config.get_double("backtest", "position_size", defaults.position_size);
    if !(position_size > 0.0 && position_size <= 1.0) {
        return Err(invalid(
            "backtest",
            "position_size",
            "must be in (0, 1]",
        ));
    }

    let commission_pct = config.get_double("backtest", "commission_pct", defaults.commission_pct);
    if commission_pct < 0.0 {
        return Err(invalid("backtest", "commission_pct", "must not be negative"));
    }

    let slippage_pct = config.get_double("backtest", "slippage_pct", defaults.slippage_pct);
    if !(0.0..100.0).contains(&slippage_pct) {
        return Err(invalid("backtest", "slippage_pct", "must be in [0, 100)"));
    }

    Ok(ExecutionConfig {
        initial_cash,
        position_size,
        commission_pct,
        slippage_pct,
    })
}

pub fn build_metrics_config(config: &dyn ConfigPort) -> Result<MetricsConfig, BacktestError> {
    let defaults = MetricsConfig::default();

    let periods_per_year =
        config.get_double("metrics", "periods_per_year", defaults.periods_per_year);
    if periods_per_year <= 0.0 {
        return Err(invalid("metrics", "periods_per_year", "must be positive"));
    }

    Ok(MetricsConfig {
        risk_free_rate_per_period: config.get_double(
            "metrics",
            "risk_free_rate_per_period",
            defaults.risk_free_rate_per_period,
        ),
        periods_per_year,
        include_forced_exits: config.get_bool(
            "metrics",
            "include_forced_exits",
            defaults.include_forced_exits,
        ),
    })
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, BacktestError> {
    let defaults = IndicatorParams::default();

    let period = |key: &str, default: usize| -> Result<usize, BacktestError> {
        let value = config.get_int("indicators", key, default as i64);
        if value < 1 {
            return Err(invalid("indicators", key, "must be at least 1"));
        }
        Ok(value as usize)
    };

    let params = IndicatorParams {
        rsi_period: period("rsi_period", defaults.rsi_period)?,
        macd_fast: period("macd_fast", defaults.macd_fast)?,
        macd_slow: period("macd_slow", defaults.macd_slow)?,
        macd_signal: period("macd_signal", defaults.macd_signal)?,
        sma_short: period("sma_short", defaults.sma_short)?,
        sma_long: period("sma_long", defaults.sma_long)?,
    };

    if params.macd_fast >= params.macd_slow {
        return Err(invalid("indicators", "macd_fast", "must be below macd_slow"));
    }
    if params.sma_short >= params.sma_long {
        return Err(invalid("indicators", "sma_short", "must be below sma_long"));
    }

    Ok(params)
}
