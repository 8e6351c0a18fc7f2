//! # Historical mean
//!
//! $$
//! \mu_a = \Big(\prod_{t=1}^{n}(1+r_{t,a})\Big)^{f/n}-1
//! \quad\text{or}\quad \mu_a = \frac{f}{n}\sum_{t=1}^{n} r_{t,a}
//! $$
//!
use ndarray::Array1;

use super::annualize;
use super::asset_returns;
use crate::adapter::RawPrices;
use crate::config::ReturnModelConfig;
use crate::error::Result;
use crate::frame::AssetFrame;
use crate::frame::ExpectedReturns;

/// Annualized mean historical return per asset.
///
/// With `returns_data` the input must hold percentage returns, not log returns.
pub fn mean_historical_return(
  prices: impl Into<RawPrices>,
  cfg: &ReturnModelConfig,
) -> Result<ExpectedReturns> {
  let returns = asset_returns(prices.into(), cfg)?;
  tracing::debug!(
    assets = returns.ncols(),
    periods = returns.nrows(),
    compounding = cfg.compounding,
    "mean historical return"
  );
  Ok(annualized_mean(&returns, cfg.compounding, cfg.frequency))
}

/// Column-wise [`annualize`] of a returns frame.
pub fn annualized_mean(returns: &AssetFrame, compounding: bool, frequency: u32) -> ExpectedReturns {
  let values: Array1<f64> = returns
    .values()
    .columns()
    .into_iter()
    .map(|col| annualize(&col, compounding, frequency))
    .collect();
  ExpectedReturns::new(returns.columns().to_vec(), values)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use ndarray::array;
  use tracing_test::traced_test;

  use super::*;
  use crate::frame::AssetTable;

  fn prices() -> AssetFrame {
    let dates = (1..=3)
      .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
      .collect();
    AssetFrame::from_dates(
      dates,
      vec!["A".into(), "B".into()],
      array![[100.0, 50.0], [110.0, 55.0], [121.0, 44.0]],
    )
    .unwrap()
  }

  fn cfg(compounding: bool) -> ReturnModelConfig {
    ReturnModelConfig {
      compounding,
      frequency: 2,
      ..ReturnModelConfig::default()
    }
  }

  #[test]
  fn compounding_mean() {
    let mu = mean_historical_return(prices(), &cfg(true)).unwrap();
    assert!((mu.get("A").unwrap() - 0.21).abs() < 1e-12);
    // 50 -> 44 over two periods
    assert!((mu.get("B").unwrap() - (44.0 / 50.0 - 1.0)).abs() < 1e-12);
  }

  #[test]
  fn arithmetic_mean() {
    let mu = mean_historical_return(prices(), &cfg(false)).unwrap();
    assert!((mu.get("A").unwrap() - 0.20).abs() < 1e-12);
    assert!((mu.get("B").unwrap() - (0.1 - 0.2)).abs() < 1e-12);
  }

  #[test]
  fn returns_data_skips_transform() {
    let returns = AssetFrame::from_dates(
      vec![
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
      ],
      vec!["A".into()],
      array![[0.1], [0.1]],
    )
    .unwrap();
    let config = ReturnModelConfig {
      returns_data: true,
      ..cfg(true)
    };

    let mu = mean_historical_return(returns, &config).unwrap();
    assert!((mu.get("A").unwrap() - 0.21).abs() < 1e-12);
  }

  #[test]
  fn distributed_input_gives_same_estimate() {
    let df = prices().to_polars("date_index").unwrap();
    let config = ReturnModelConfig {
      mode: crate::config::ExecutionMode::Distributed,
      ..cfg(true)
    };

    let remote = mean_historical_return(AssetTable::from(df), &config).unwrap();
    let local = mean_historical_return(prices(), &cfg(true)).unwrap();
    for ((_, a), (_, b)) in remote.iter().zip(local.iter()) {
      assert!((a - b).abs() < 1e-12);
    }
  }

  #[test]
  fn hourly_ordering_column_on_distributed_path() {
    use polars::prelude::*;

    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let stamps: Vec<chrono::NaiveDateTime> = (0..3).map(|h| base + chrono::Duration::hours(h)).collect();
    let df = df!("date_index" => stamps, "A" => [100.0, 110.0, 121.0])
      .unwrap()
      .lazy()
      .with_column(col("date_index").cast(DataType::Datetime(TimeUnit::Milliseconds, None)))
      .collect()
      .unwrap();
    let config = ReturnModelConfig {
      mode: crate::config::ExecutionMode::Distributed,
      ..cfg(true)
    };

    let mu = mean_historical_return(AssetTable::from(df), &config).unwrap();
    assert!((mu.get("A").unwrap() - 0.21).abs() < 1e-12);
  }

  #[test]
  fn gap_in_prices_keeps_growth() {
    let config = ReturnModelConfig {
      frequency: 3,
      ..ReturnModelConfig::default()
    };
    let mu = mean_historical_return(vec![("A".to_string(), vec![100.0, f64::NAN, 121.0, 121.0])], &config).unwrap();
    assert!((mu.get("A").unwrap() - 0.21).abs() < 1e-12);
  }

  #[test]
  #[traced_test]
  fn raw_series_is_coerced() {
    let mu = mean_historical_return(vec![100.0, 110.0, 121.0], &cfg(true)).unwrap();
    assert!((mu.get("0").unwrap() - 0.21).abs() < 1e-12);
    assert!(logs_contain("prices are not in a dataframe"));
  }
}
