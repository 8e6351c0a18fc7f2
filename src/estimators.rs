//! # Estimators
//!
//! $$
//! \mu^{\text{geo}} = \Big(\prod_t (1+r_t)\Big)^{f/n} - 1,
//! \qquad \mu^{\text{arith}} = f\,\bar r
//! $$
//!
//! Annualized expected-return estimators. Every estimator takes raw input,
//! normalizes it through [`crate::adapter::normalize`], turns prices into
//! returns unless told the input already is returns, and reduces each column to
//! one annualized figure.
use ndarray::ArrayView1;

use crate::adapter::normalize;
use crate::adapter::RawPrices;
use crate::config::ExecutionMode;
use crate::config::ReturnModelConfig;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::frame::AssetFrame;
use crate::frame::AssetTable;
use crate::stats;
use crate::transform::returns_from_prices_with_key;

pub mod capm;
pub mod ema;
pub mod historical;

pub use capm::capm_fit;
pub use capm::capm_return;
pub use capm::MarketModel;
pub use capm::MARKET_COLUMN;
pub use ema::ema_historical_return;
pub use historical::mean_historical_return;

/// Annualize a per-period return series.
///
/// Compounding gives the CAGR `prod(1 + r)^(frequency / n) - 1` over the `n`
/// observed periods; otherwise the mean is scaled linearly.
pub fn annualize(returns: &ArrayView1<f64>, compounding: bool, frequency: u32) -> f64 {
  let f = f64::from(frequency);
  if compounding {
    stats::growth(returns).powf(f / stats::count(returns) as f64) - 1.0
  } else {
    stats::mean(returns) * f
  }
}

/// Annualize a single per-period rate.
pub(crate) fn annualize_rate(rate: f64, compounding: bool, frequency: u32) -> f64 {
  if compounding {
    (1.0 + rate).powi(frequency as i32) - 1.0
  } else {
    rate * f64::from(frequency)
  }
}

fn check_mode(table: &AssetTable, mode: ExecutionMode) -> Result<()> {
  match (table.is_distributed(), mode) {
    (true, ExecutionMode::InMemory) => Err(ReturnsError::input(
      "a distributed table requires the distributed execution mode",
    )),
    (false, ExecutionMode::Distributed) => Err(ReturnsError::input(
      "loading a non-distributed table into the distributed path is not supported",
    )),
    _ => Ok(()),
  }
}

/// Returns matrix for an estimator input.
pub(crate) fn asset_returns(raw: RawPrices, cfg: &ReturnModelConfig) -> Result<AssetFrame> {
  let table = normalize(raw)?;
  let key = cfg.ordering_key.as_str();

  if cfg.returns_data {
    check_mode(&table, cfg.mode)?;
    return table.into_frame(key);
  }

  returns_from_prices_with_key(&table, cfg.log_returns, cfg.mode, key)?.into_frame(key)
}
