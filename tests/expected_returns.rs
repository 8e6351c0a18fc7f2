use approx::assert_abs_diff_eq;
use chrono::Duration;
use chrono::NaiveDate;
use expected_returns::prelude::*;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use rand_distr::Normal;

fn simulated_prices(n: usize, assets: &[&str], seed: u64) -> AssetFrame {
  let mut rng = StdRng::seed_from_u64(seed);
  let shock = Normal::<f64>::new(0.0004, 0.015).unwrap();
  let mut values = Array2::<f64>::zeros((n, assets.len()));
  for j in 0..assets.len() {
    let mut p = 100.0;
    for i in 0..n {
      values[[i, j]] = p;
      p *= shock.sample(&mut rng).exp();
    }
  }

  let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
  let dates = (0..n).map(|i| start + Duration::days(i as i64)).collect();
  AssetFrame::from_dates(dates, assets.iter().map(|a| a.to_string()).collect(), values).unwrap()
}

#[test]
fn single_asset_worked_example() {
  let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
  let prices = AssetFrame::from_dates(
    vec![start, start + Duration::days(1), start + Duration::days(2)],
    vec!["X".into()],
    ndarray::array![[100.0], [110.0], [121.0]],
  )
  .unwrap();

  let returns = returns_from_prices(&prices.clone().into(), false, ExecutionMode::InMemory)
    .unwrap()
    .into_frame("date_index")
    .unwrap();
  assert_eq!(returns.nrows(), 2);
  for r in returns.values().iter() {
    assert_abs_diff_eq!(*r, 0.10, epsilon = 1e-12);
  }

  let geo = ReturnModelConfig {
    frequency: 2,
    ..ReturnModelConfig::default()
  };
  let arith = ReturnModelConfig {
    compounding: false,
    ..geo.clone()
  };
  assert_abs_diff_eq!(
    return_model(prices.clone(), "mean_historical_return", &geo).unwrap().get("X").unwrap(),
    0.21,
    epsilon = 1e-12
  );
  assert_abs_diff_eq!(
    return_model(prices, "mean_historical_return", &arith).unwrap().get("X").unwrap(),
    0.20,
    epsilon = 1e-12
  );
}

#[test]
fn every_model_runs_on_both_paths() {
  let assets = ["AAA", "BBB", "CCC", "DDD"];
  let prices = simulated_prices(300, &assets, 42);
  let df = prices.to_polars("date_index").unwrap();

  let local_cfg = ReturnModelConfig::default();
  let remote_cfg = ReturnModelConfig {
    mode: ExecutionMode::Distributed,
    ..ReturnModelConfig::default()
  };

  for method in ["mean_historical_return", "ema_historical_return", "capm_return"] {
    let local = return_model(prices.clone(), method, &local_cfg).unwrap();
    let remote = return_model(df.clone(), method, &remote_cfg).unwrap();

    assert_eq!(local.assets(), &assets.map(String::from));
    assert_eq!(local.assets(), remote.assets());
    for ((_, a), (_, b)) in local.iter().zip(remote.iter()) {
      assert!(a.is_finite());
      assert_abs_diff_eq!(a, b, epsilon = 1e-10);
    }
  }
}

#[test]
fn distributed_misuse_is_reported() {
  let prices = simulated_prices(10, &["A"], 1);
  let cfg = ReturnModelConfig {
    mode: ExecutionMode::Distributed,
    ..ReturnModelConfig::default()
  };

  let err = mean_historical_return(prices.clone(), &cfg).unwrap_err();
  assert!(matches!(err, ReturnsError::Input(_)));

  let mut df = prices.to_polars("date_index").unwrap();
  df.drop_in_place("date_index").unwrap();
  let err = mean_historical_return(df, &cfg).unwrap_err();
  assert!(matches!(err, ReturnsError::Input(_)));
}

#[test]
fn capm_with_benchmark_and_log_round_trip() {
  let prices = simulated_prices(200, &["A", "B"], 9);
  let market = simulated_prices(200, &["SPX"], 10);

  let cfg = ReturnModelConfig {
    market_prices: Some(market.into()),
    risk_free_rate: 0.01,
    ..ReturnModelConfig::default()
  };
  let fit = capm_fit(prices.clone(), &cfg).unwrap();
  let mu = capm_return(prices.clone(), &cfg).unwrap();
  for (i, (_, m)) in mu.iter().enumerate() {
    assert_abs_diff_eq!(m, 0.01 + fit.betas()[i] * (fit.market_return() - 0.01), epsilon = 1e-12);
  }

  let log_returns = returns_from_prices(&prices.clone().into(), true, ExecutionMode::InMemory)
    .unwrap()
    .into_frame("date_index")
    .unwrap();
  let pseudo = prices_from_returns(&log_returns, true);
  let p = prices.values();
  for t in 0..pseudo.nrows() {
    assert_abs_diff_eq!(pseudo.values()[[t, 1]], p[[t + 1, 1]] / p[[1, 1]], epsilon = 1e-9);
  }
}
