use std::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use chrono::Duration;
use chrono::NaiveDate;
use expected_returns::prelude::*;
use ndarray::Array2;

fn prices(n: usize, m: usize) -> AssetFrame {
  let values = Array2::from_shape_fn((n, m), |(i, j)| {
    100.0 * (1.0 + 0.0003 * (j + 1) as f64).powi(i as i32) * (1.0 + 0.01 * ((i * (j + 3)) as f64).sin())
  });
  let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
  let dates = (0..n).map(|i| start + Duration::days(i as i64)).collect();
  let columns = (0..m).map(|j| format!("asset_{j}")).collect();
  AssetFrame::from_dates(dates, columns, values).unwrap()
}

fn bench_models(c: &mut Criterion) {
  let mut group = c.benchmark_group("return_model");
  let cfg = ReturnModelConfig::default();

  for m in [10, 100] {
    let p = prices(2520, m);
    for method in ["mean_historical_return", "ema_historical_return", "capm_return"] {
      group.bench_with_input(BenchmarkId::new(method, m), &p, |b, p| {
        b.iter(|| black_box(return_model(p.clone(), method, &cfg).unwrap()))
      });
    }
  }
  group.finish();
}

fn bench_transform(c: &mut Criterion) {
  let mut group = c.benchmark_group("returns_from_prices");
  let p = prices(2520, 100);
  let local: AssetTable = p.clone().into();
  let remote: AssetTable = p.to_polars("date_index").unwrap().into();

  group.bench_function("in_memory", |b| {
    b.iter(|| black_box(returns_from_prices(&local, false, ExecutionMode::InMemory).unwrap()))
  });
  group.bench_function("distributed", |b| {
    b.iter(|| black_box(returns_from_prices(&remote, false, ExecutionMode::Distributed).unwrap()))
  });
  group.finish();
}

criterion_group!(benches, bench_models, bench_transform);
criterion_main!(benches);
