//! # Stats
//!
//! $$
//! \hat\Sigma_{ij} = \frac{1}{n_{ij}-1}\sum_{t \in O_{ij}} (x_{ti}-\bar x_i)(x_{tj}-\bar x_j)
//! $$
//!
//! Column statistics that skip missing (`NaN`) observations.
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::Axis;

fn observed<'a>(xs: &'a ArrayView1<'_, f64>) -> impl Iterator<Item = f64> + 'a {
  xs.iter().copied().filter(|x| !x.is_nan())
}

/// Number of non-missing observations.
pub fn count(xs: &ArrayView1<f64>) -> usize {
  observed(xs).count()
}

/// Mean of non-missing observations, `NaN` when there are none.
pub fn mean(xs: &ArrayView1<f64>) -> f64 {
  let (sum, n) = observed(xs).fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
  if n == 0 {
    f64::NAN
  } else {
    sum / n as f64
  }
}

/// Product of `1 + r` over non-missing observations.
pub fn growth(xs: &ArrayView1<f64>) -> f64 {
  observed(xs).map(|r| 1.0 + r).product()
}

/// Row-wise mean across columns, skipping missing cells.
pub fn row_mean(values: &Array2<f64>) -> Array1<f64> {
  values
    .axis_iter(Axis(0))
    .map(|row| mean(&row))
    .collect()
}

/// Sample covariance of two columns over rows where both are observed.
pub fn pairwise_cov(x: &ArrayView1<f64>, y: &ArrayView1<f64>) -> f64 {
  let pairs: Vec<(f64, f64)> = x
    .iter()
    .zip(y.iter())
    .filter(|(a, b)| !a.is_nan() && !b.is_nan())
    .map(|(a, b)| (*a, *b))
    .collect();

  let n = pairs.len();
  if n < 2 {
    return f64::NAN;
  }

  let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
  let my = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
  pairs
    .iter()
    .map(|(a, b)| (a - mx) * (b - my))
    .sum::<f64>()
    / (n - 1) as f64
}

/// Sample covariance matrix (ddof = 1) with pairwise-complete observations.
pub fn covariance(values: &ArrayView2<f64>) -> Array2<f64> {
  let m = values.ncols();
  let mut cov = Array2::<f64>::zeros((m, m));
  for i in 0..m {
    for j in i..m {
      let c = pairwise_cov(&values.column(i), &values.column(j));
      cov[[i, j]] = c;
      cov[[j, i]] = c;
    }
  }
  cov
}

/// Final value of the exponentially weighted mean with `alpha = 2 / (span + 1)`.
///
/// Weights are normalized by their sum (`(1-alpha)^i` for the i-th most recent
/// point). A missing observation contributes nothing but still ages the
/// weights of everything before it.
pub fn ewm_last(xs: &ArrayView1<f64>, span: usize) -> f64 {
  let alpha = 2.0 / (span as f64 + 1.0);
  let decay = 1.0 - alpha;

  let mut avg = f64::NAN;
  let mut old_wt = 1.0;
  for &x in xs.iter() {
    if avg.is_nan() {
      avg = x;
      continue;
    }

    old_wt *= decay;
    if x.is_nan() {
      continue;
    }
    if avg != x {
      avg = (old_wt * avg + x) / (old_wt + 1.0);
    }
    old_wt += 1.0;
  }
  avg
}
