use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use expected_returns::prelude::*;
use prettytable::row;
use prettytable::Table;
use tracing_subscriber::EnvFilter;

/// Annualized expected returns from a CSV of prices.
///
/// The CSV has a header row `date,<asset>,<asset>,...` and one `YYYY-MM-DD`
/// dated row per period. Empty cells are missing values.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// Asset prices (or returns with --returns-data).
  #[arg(long)]
  prices: PathBuf,

  /// mean_historical_return, ema_historical_return or capm_return.
  #[arg(long, default_value = "mean_historical_return")]
  method: String,

  /// Single-column benchmark for CAPM.
  #[arg(long)]
  market: Option<PathBuf>,

  #[arg(long)]
  returns_data: bool,

  /// Arithmetic instead of compounded annualization.
  #[arg(long)]
  arithmetic: bool,

  #[arg(long, default_value_t = TRADING_DAYS)]
  frequency: u32,

  #[arg(long, default_value_t = 500)]
  span: usize,

  #[arg(long, default_value_t = 0.02)]
  risk_free_rate: f64,

  #[arg(long)]
  log_returns: bool,

  /// Run the transform on a polars table instead of in memory.
  #[arg(long)]
  distributed: bool,
}

fn read_frame(path: &Path) -> Result<AssetFrame> {
  let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
  parse_frame(BufReader::new(file), &path.display().to_string())
}

/// Parse a dated price table. The first column holds the dates.
fn parse_frame<R: Read>(input: R, source: &str) -> Result<AssetFrame> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(input);

  let headers = reader
    .headers()
    .with_context(|| format!("{source}: reading header"))?
    .clone();
  if headers.is_empty() {
    bail!("{source} is empty");
  }
  let assets: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

  let mut dates = Vec::new();
  let mut columns = vec![Vec::new(); assets.len()];
  for record in reader.records() {
    let record = record.with_context(|| format!("{source}: reading record"))?;
    let line = record.position().map_or(0, |p| p.line());

    let date = record.get(0).unwrap_or_default();
    dates.push(
      NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("{source}:{line}: bad date '{date}'"))?,
    );

    for (j, col) in columns.iter_mut().enumerate() {
      let cell = record.get(j + 1).unwrap_or_default();
      let value = if cell.is_empty() {
        f64::NAN
      } else {
        cell
          .parse()
          .with_context(|| format!("{source}:{line}: bad value '{cell}'"))?
      };
      col.push(value);
    }
  }

  let index = dates.into_iter().map(RowKey::Date).collect();
  Ok(AssetFrame::from_columns(index, assets.into_iter().zip(columns).collect())?)
}

fn as_table(frame: AssetFrame, distributed: bool, ordering_key: &str) -> Result<AssetTable> {
  if distributed {
    Ok(AssetTable::Distributed(frame.to_polars(ordering_key)?))
  } else {
    Ok(AssetTable::InMemory(frame))
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  let mut config = ReturnModelConfig {
    returns_data: args.returns_data,
    compounding: !args.arithmetic,
    frequency: args.frequency,
    span: args.span,
    risk_free_rate: args.risk_free_rate,
    log_returns: args.log_returns,
    mode: if args.distributed {
      ExecutionMode::Distributed
    } else {
      ExecutionMode::InMemory
    },
    ..ReturnModelConfig::default()
  };

  let prices = as_table(read_frame(&args.prices)?, args.distributed, &config.ordering_key)?;
  if let Some(path) = &args.market {
    config.market_prices = Some(as_table(read_frame(path)?, args.distributed, &config.ordering_key)?);
  }

  let mu = return_model(prices, &args.method, &config)
    .with_context(|| format!("running {}", args.method))?;

  let mut table = Table::new();
  table.add_row(row!["asset", "expected return"]);
  for (asset, value) in mu.iter() {
    table.add_row(row![asset, format!("{value:.6}")]);
  }
  table.printstd();

  Ok(())
}
