//! # Exponentially weighted mean
//!
//! $$
//! \bar r^{\text{ew}}_T = \frac{\sum_{i=0}^{T-1}(1-\alpha)^i r_{T-i}}{\sum_{i=0}^{T-1}(1-\alpha)^i},
//! \qquad \alpha = \frac{2}{\text{span}+1}
//! $$
//!
use ndarray::Array1;

use super::annualize_rate;
use super::asset_returns;
use crate::adapter::RawPrices;
use crate::config::ReturnModelConfig;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::frame::ExpectedReturns;
use crate::stats;

/// Annualized exponentially weighted mean historical return per asset.
///
/// Only the most recent weighted mean of each column is annualized, so later
/// periods dominate the estimate.
pub fn ema_historical_return(
  prices: impl Into<RawPrices>,
  cfg: &ReturnModelConfig,
) -> Result<ExpectedReturns> {
  if cfg.span < 1 {
    return Err(ReturnsError::input(format!("span must be at least 1, got {}", cfg.span)));
  }

  let returns = asset_returns(prices.into(), cfg)?;
  tracing::debug!(assets = returns.ncols(), span = cfg.span, "ema historical return");

  let values: Array1<f64> = returns
    .values()
    .columns()
    .into_iter()
    .map(|col| annualize_rate(stats::ewm_last(&col, cfg.span), cfg.compounding, cfg.frequency))
    .collect();
  Ok(ExpectedReturns::new(returns.columns().to_vec(), values))
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;
  use crate::frame::AssetFrame;
  use crate::frame::RowKey;

  fn returns(values: ndarray::Array2<f64>) -> AssetFrame {
    let index = (0..values.nrows()).map(RowKey::Ordinal).collect();
    let columns = (0..values.ncols()).map(|j| format!("a{j}")).collect();
    AssetFrame::new(index, columns, values).unwrap()
  }

  fn cfg(compounding: bool, span: usize) -> ReturnModelConfig {
    ReturnModelConfig {
      returns_data: true,
      compounding,
      span,
      frequency: 4,
      ..ReturnModelConfig::default()
    }
  }

  #[test]
  fn weights_recent_returns_more() {
    let r = returns(array![[0.0], [1.0]]);
    let mu = ema_historical_return(r, &cfg(false, 3)).unwrap();
    assert!((mu.get("a0").unwrap() - 4.0 * 2.0 / 3.0).abs() < 1e-12);
  }

  #[test]
  fn constant_returns_match_historical_mean() {
    let r = returns(array![[0.01, 0.02], [0.01, 0.02], [0.01, 0.02]]);
    let mu = ema_historical_return(r.clone(), &cfg(true, 10)).unwrap();
    let hist = super::super::mean_historical_return(r, &cfg(true, 10)).unwrap();
    for ((_, a), (_, b)) in mu.iter().zip(hist.iter()) {
      assert!((a - b).abs() < 1e-12);
    }
  }

  #[test]
  fn compounding_uses_final_value() {
    let r = returns(array![[0.5], [0.1]]);
    let mu = ema_historical_return(r, &cfg(true, 1)).unwrap();
    assert!((mu.get("a0").unwrap() - (1.1f64.powi(4) - 1.0)).abs() < 1e-12);
  }

  #[test]
  fn zero_span_is_rejected() {
    let r = returns(array![[0.1]]);
    assert!(matches!(ema_historical_return(r, &cfg(true, 0)), Err(ReturnsError::Input(_))));
  }
}
