//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::tsv_data_adapter::{ColumnMap, TsvDataAdapter};
use crate::adapters::tsv_report_adapter::TsvReportAdapter;
use crate::domain::aggregate::build_series;
use crate::domain::config_validation::validate_config;
use crate::domain::error::SalecastError;
use crate::domain::forecast::{run_batch, ForecastPath};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::SalesDataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_CURRENCY: &str = "INR";
const DEFAULT_OUTPUT: &str = "predictions.tsv";

#[derive(Parser, Debug)]
#[command(name = "salecast", about = "Per-item sales volume and revenue forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Forecast next-year quantity and total per item
    Forecast {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show dataset coverage: rows, items, years, currencies
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Forecast {
            config,
            input,
            output,
            currency,
            dry_run,
        } => run_forecast(
            config.as_ref(),
            input,
            output,
            currency.as_deref(),
            dry_run,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, input } => run_info(config.as_ref(), input),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SalecastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_validated_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    let Some(path) = path else {
        return Ok(None);
    };
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }
    Ok(Some(adapter))
}

fn config_string(config: Option<&FileConfigAdapter>, section: &str, key: &str) -> Option<String> {
    config.and_then(|c| c.get_string(section, key))
}

fn resolve_input(
    flag: Option<PathBuf>,
    config: Option<&FileConfigAdapter>,
) -> Result<PathBuf, ExitCode> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match config_string(config, "data", "input") {
        Some(path) => Ok(PathBuf::from(path)),
        None => {
            eprintln!("error: input path is required (--input or [data] input)");
            Err(ExitCode::from(2))
        }
    }
}

fn resolve_output(flag: Option<PathBuf>, config: Option<&FileConfigAdapter>) -> PathBuf {
    flag.unwrap_or_else(|| {
        PathBuf::from(
            config_string(config, "forecast", "output")
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
        )
    })
}

pub fn resolve_currency(flag: Option<&str>, config: Option<&FileConfigAdapter>) -> String {
    flag.map(str::to_string)
        .or_else(|| config_string(config, "forecast", "currency"))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
        .trim()
        .to_uppercase()
}

pub fn build_column_map(config: Option<&FileConfigAdapter>) -> ColumnMap {
    let mut columns = ColumnMap::default();
    if let Some(name) = config_string(config, "data", "part_column") {
        columns.part = name;
    }
    if let Some(name) = config_string(config, "data", "period_column") {
        columns.period = name;
    }
    if let Some(name) = config_string(config, "data", "quantity_column") {
        columns.quantity = name;
    }
    if let Some(name) = config_string(config, "data", "total_column") {
        columns.total = name;
    }
    if let Some(name) = config_string(config, "data", "currency_column") {
        columns.currency = name;
    }
    columns
}

fn run_forecast(
    config_path: Option<&PathBuf>,
    input_flag: Option<PathBuf>,
    output_flag: Option<PathBuf>,
    currency_flag: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config, resolve the plan
    let config = match load_validated_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let input = match resolve_input(input_flag, config.as_ref()) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let output = resolve_output(output_flag, config.as_ref());
    let currency = resolve_currency(currency_flag, config.as_ref());
    let columns = build_column_map(config.as_ref());

    if dry_run {
        eprintln!("\nResolved plan:");
        eprintln!("  input:    {}", input.display());
        eprintln!("  output:   {}", output.display());
        eprintln!("  currency: {}", currency);
        eprintln!(
            "  columns:  {} / {} / {} / {} / {}",
            columns.part, columns.period, columns.quantity, columns.total, columns.currency
        );
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 2: Read the sales file
    eprintln!("Reading sales data from {}", input.display());
    let adapter = TsvDataAdapter::new(input, columns);
    let fetched = match adapter.fetch_rows() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if fetched.skipped_dates > 0 {
        eprintln!(
            "warning: dropped {} rows with unparseable dates",
            fetched.skipped_dates
        );
    }

    // Stage 3: Filter and aggregate into per-item yearly series
    let (items, latest_year) = build_series(&fetched.rows, &currency);
    let Some(latest_year) = latest_year else {
        let err = SalecastError::NoData { currency };
        eprintln!("error: {err}");
        return (&err).into();
    };
    let forecast_year = latest_year + 1;

    eprintln!(
        "Forecasting {} items for {} ({} {} rows, latest year {})",
        items.len(),
        forecast_year,
        fetched.rows.len(),
        currency,
        latest_year,
    );

    // Stage 4: Fit and predict per item
    let result = run_batch(&items, forecast_year, &currency);

    for forecast in &result.forecasts {
        if let ForecastPath::SingleYear = forecast.path {
            eprintln!(
                "Only one year available for {}, copying values for {}",
                forecast.record.part_no, forecast_year
            );
        }
        for err in &forecast.series_errors {
            eprintln!("warning: {err}");
        }
    }
    for err in &result.failures {
        eprintln!("warning: skipping item ({err})");
    }

    // Stage 5: Summary and output
    eprintln!("\n=== Forecast Summary ===");
    eprintln!("Items forecast:     {}", result.forecasts.len());
    eprintln!("Fallback (1 year):  {}", result.fallback_count());
    eprintln!("Items rejected:     {}", result.failures.len());
    eprintln!("Series fit errors:  {}", result.fit_failure_count());

    let records = result.records();
    match TsvReportAdapter.write(&records, &output) {
        Ok(()) => {
            eprintln!("\nPredictions written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

fn run_info(config_path: Option<&PathBuf>, input_flag: Option<PathBuf>) -> ExitCode {
    let config = match load_validated_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let input = match resolve_input(input_flag, config.as_ref()) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let adapter = TsvDataAdapter::new(input.clone(), build_column_map(config.as_ref()));
    let fetched = match adapter.fetch_rows() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut currencies: BTreeMap<&str, usize> = BTreeMap::new();
    let mut items: BTreeSet<&str> = BTreeSet::new();
    let mut year_range: Option<(i32, i32)> = None;
    for row in &fetched.rows {
        *currencies.entry(row.currency.as_str()).or_insert(0) += 1;
        items.insert(row.part_no.as_str());
        year_range = Some(match year_range {
            Some((lo, hi)) => (lo.min(row.year), hi.max(row.year)),
            None => (row.year, row.year),
        });
    }

    eprintln!("Dataset: {}", input.display());
    eprintln!("  rows:          {}", fetched.rows.len());
    eprintln!("  dropped dates: {}", fetched.skipped_dates);
    eprintln!("  items:         {}", items.len());
    match year_range {
        Some((lo, hi)) => eprintln!("  years:         {} to {}", lo, hi),
        None => eprintln!("  years:         none"),
    }
    eprintln!("  currencies:");
    for (currency, count) in &currencies {
        eprintln!("    {}: {} rows", currency, count);
    }

    ExitCode::SUCCESS
}
