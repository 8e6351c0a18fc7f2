//! # Return transform
//!
//! $$
//! r_t = \frac{p_t}{p_{t-1}} - 1 \qquad\text{or}\qquad r_t = \ln\frac{p_t}{p_{t-1}}
//! $$
//!
//! One logical operation with two backends: [`in_memory::InMemoryBackend`]
//! for [`AssetFrame`]s and [`distributed::DistributedBackend`] for polars
//! tables carrying an ordering column. Both compute a per-column lag of one in
//! ascending date order with no cross-column dependency.
use ndarray::parallel::prelude::*;
use ndarray::Axis;

use crate::config::ExecutionMode;
use crate::config::DEFAULT_ORDERING_KEY;
use crate::error::Result;
use crate::frame::AssetFrame;
use crate::frame::AssetTable;

pub mod distributed;
pub mod in_memory;

pub use distributed::DistributedBackend;
pub use in_memory::InMemoryBackend;

/// Strategy computing a returns table from a price table.
pub trait ReturnsBackend {
  /// Compute per-period returns. Percentage returns unless `use_log`.
  fn compute_returns(&self, prices: &AssetTable, use_log: bool) -> Result<AssetTable>;
}

/// Backend for an execution mode.
pub fn backend(mode: ExecutionMode, ordering_key: &str) -> Box<dyn ReturnsBackend> {
  match mode {
    ExecutionMode::InMemory => Box::new(InMemoryBackend),
    ExecutionMode::Distributed => Box::new(DistributedBackend::new(ordering_key)),
  }
}

/// Returns from prices, distributed tables ordered by `date_index`.
pub fn returns_from_prices(prices: &AssetTable, use_log: bool, mode: ExecutionMode) -> Result<AssetTable> {
  returns_from_prices_with_key(prices, use_log, mode, DEFAULT_ORDERING_KEY)
}

/// Returns from prices with an explicit ordering column for the distributed path.
pub fn returns_from_prices_with_key(
  prices: &AssetTable,
  use_log: bool,
  mode: ExecutionMode,
  ordering_key: &str,
) -> Result<AssetTable> {
  tracing::debug!(?mode, use_log, "computing returns from prices");
  backend(mode, ordering_key).compute_returns(prices, use_log)
}

/// Pseudo-prices from returns.
///
/// The first row is pinned to 1.0 for every asset and later rows are the
/// cumulative product of growth factors, so only ratios within the result
/// are meaningful. Missing cells stay missing and do not break the product.
pub fn prices_from_returns(returns: &AssetFrame, use_log: bool) -> AssetFrame {
  let mut growth = returns
    .values()
    .mapv(|r| if use_log { r.exp() } else { 1.0 + r });

  if growth.nrows() > 0 {
    growth.row_mut(0).fill(1.0);
  }

  growth
    .axis_iter_mut(Axis(1))
    .into_par_iter()
    .for_each(|mut col| {
      let mut acc = 1.0;
      for v in col.iter_mut().filter(|v| !v.is_nan()) {
        acc *= *v;
        *v = acc;
      }
    });

  returns.with_values(growth)
}
