//! # Configuration
//!
//! $$
//! \theta = (\text{returns\_data}, \text{compounding}, f, \text{span}, r_f, \ldots)
//! $$
//!
use crate::frame::AssetTable;

/// Number of trading days in a year.
pub const TRADING_DAYS: u32 = 252;

/// Default ordering column of distributed tables.
pub const DEFAULT_ORDERING_KEY: &str = "date_index";

/// Execution path of the return transform.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecutionMode {
  /// In-memory [`crate::frame::AssetFrame`].
  #[default]
  InMemory,
  /// Polars table with an explicit ordering column.
  Distributed,
}

/// Options shared by every estimator and forwarded unchanged by the dispatcher.
#[derive(Clone, Debug)]
pub struct ReturnModelConfig {
  /// The input already holds returns; skip the price transform.
  pub returns_data: bool,
  /// Geometric (CAGR) annualization when true, arithmetic otherwise.
  pub compounding: bool,
  /// Periods per year.
  pub frequency: u32,
  /// EMA span in periods.
  pub span: usize,
  /// Optional CAPM benchmark. Holds returns when `returns_data` is set.
  pub market_prices: Option<AssetTable>,
  /// Risk-free rate in the CAPM equation, on the annualized scale.
  pub risk_free_rate: f64,
  /// Log instead of percentage returns.
  pub log_returns: bool,
  pub mode: ExecutionMode,
  /// Ordering column of distributed tables.
  pub ordering_key: String,
}

impl Default for ReturnModelConfig {
  fn default() -> Self {
    Self {
      returns_data: false,
      compounding: true,
      frequency: TRADING_DAYS,
      span: 500,
      market_prices: None,
      risk_free_rate: 0.02,
      log_returns: false,
      mode: ExecutionMode::InMemory,
      ordering_key: DEFAULT_ORDERING_KEY.to_string(),
    }
  }
}
