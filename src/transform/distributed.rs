//! # Distributed backend
//!
//! $$
//! r_t = \frac{p_t - \operatorname{lag}_1(p)_t}{\operatorname{lag}_1(p)_t}
//! \quad\text{ordered by } \texttt{date\_index}
//! $$
//!
//! Lag-by-one per asset column over a polars lazy plan. Nulls are forward
//! filled before the lag, as in the in-memory backend. The first record of
//! every column has no lag and comes out null.
use std::f64::consts::E;

use polars::prelude::*;

use super::ReturnsBackend;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::frame::asset_columns;
use crate::frame::require_ordering_key;
use crate::frame::AssetTable;

/// Returns over a polars table ordered by `ordering_key`.
#[derive(Clone, Debug)]
pub struct DistributedBackend {
  ordering_key: String,
}

impl DistributedBackend {
  pub fn new(ordering_key: impl Into<String>) -> Self {
    Self {
      ordering_key: ordering_key.into(),
    }
  }

  pub fn ordering_key(&self) -> &str {
    &self.ordering_key
  }
}

fn lagged_return(name: &str, use_log: bool) -> Expr {
  let price = col(name).cast(DataType::Float64).forward_fill(None);
  let lag = price.clone().shift(lit(1));
  let pct = (price - lag.clone()) / lag;
  if use_log {
    (lit(1.0) + pct).log(E).alias(name)
  } else {
    pct.alias(name)
  }
}

impl ReturnsBackend for DistributedBackend {
  fn compute_returns(&self, prices: &AssetTable, use_log: bool) -> Result<AssetTable> {
    let df = match prices {
      AssetTable::Distributed(df) => df,
      AssetTable::InMemory(_) => {
        return Err(ReturnsError::input(
          "loading a non-distributed table into the distributed path is not supported",
        ))
      }
    };
    require_ordering_key(df, &self.ordering_key)?;

    let exprs: Vec<Expr> = asset_columns(df, &self.ordering_key)
      .iter()
      .map(|name| lagged_return(name, use_log))
      .collect();
    tracing::debug!(columns = exprs.len(), key = %self.ordering_key, "lagging distributed table");

    let out = df
      .clone()
      .lazy()
      .sort([self.ordering_key.as_str()], SortMultipleOptions::default())
      .with_columns(exprs)
      .collect()?;

    Ok(AssetTable::Distributed(out))
  }
}
