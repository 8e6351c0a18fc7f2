//! # In-memory backend
//!
//! $$
//! R = P_{1:T} \oslash P_{0:T-1} - 1
//! $$
//!
use ndarray::par_azip;
use ndarray::parallel::prelude::*;
use ndarray::s;
use ndarray::Array2;
use ndarray::Axis;

use super::ReturnsBackend;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::frame::AssetFrame;
use crate::frame::AssetTable;

/// Returns over an [`AssetFrame`], elementwise in parallel.
#[derive(Default, Clone, Copy, Debug)]
pub struct InMemoryBackend;

impl ReturnsBackend for InMemoryBackend {
  fn compute_returns(&self, prices: &AssetTable, use_log: bool) -> Result<AssetTable> {
    match prices {
      AssetTable::InMemory(frame) => pct_change(frame, use_log).map(AssetTable::InMemory),
      AssetTable::Distributed(_) => Err(ReturnsError::input(
        "a distributed table requires the distributed execution mode",
      )),
    }
  }
}

/// Carry the last observed price forward over missing cells, column by column.
///
/// Leading missing cells stay missing.
pub fn forward_fill(values: &Array2<f64>) -> Array2<f64> {
  let mut filled = values.clone();
  filled
    .axis_iter_mut(Axis(1))
    .into_par_iter()
    .for_each(|mut col| {
      let mut last = f64::NAN;
      for v in col.iter_mut() {
        if v.is_nan() {
          *v = last;
        } else {
          last = *v;
        }
      }
    });
  filled
}

/// Period-over-period change of every column.
///
/// Prices are forward filled first, so a gap yields a zero return and the
/// next return is measured from the last observed price. The first row has no
/// predecessor and is dropped, as is any row where no asset has a return.
pub fn pct_change(prices: &AssetFrame, use_log: bool) -> Result<AssetFrame> {
  let p = forward_fill(prices.values());
  let n = p.nrows();

  let index = prices.index().iter().skip(1).copied().collect();
  let mut out = Array2::<f64>::zeros((n.saturating_sub(1), p.ncols()));
  if n > 1 {
    let curr = p.slice(s![1.., ..]);
    let prev = p.slice(s![..-1, ..]);
    par_azip!((r in &mut out, &c in &curr, &pv in &prev) {
      let pct = c / pv - 1.0;
      *r = if use_log { pct.ln_1p() } else { pct };
    });
  }

  Ok(AssetFrame::new(index, prices.columns().to_vec(), out)?.drop_empty_rows())
}
