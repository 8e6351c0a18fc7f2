//! # Input adapter
//!
//! $$
//! \mathcal N : \text{raw input} \to \text{AssetTable}
//! $$
//!
//! Estimators only accept [`AssetTable`]. Anything else handed to them goes
//! through [`normalize`], which coerces it and logs a warning instead of
//! failing.
use ndarray::Array1;
use ndarray::Array2;
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::frame::AssetFrame;
use crate::frame::AssetTable;
use crate::frame::RowKey;

/// Price (or returns) data as supplied by a caller.
#[derive(Clone, Debug)]
pub enum RawPrices {
  /// Already tabular; passed through untouched.
  Table(AssetTable),
  /// Unlabeled matrix, rows are periods and columns assets.
  Matrix(Array2<f64>),
  /// Unlabeled single series.
  Series(Vec<f64>),
  /// Named columns of equal length without a date index.
  Columns(Vec<(String, Vec<f64>)>),
}

impl From<AssetTable> for RawPrices {
  fn from(table: AssetTable) -> Self {
    RawPrices::Table(table)
  }
}

impl From<AssetFrame> for RawPrices {
  fn from(frame: AssetFrame) -> Self {
    RawPrices::Table(AssetTable::InMemory(frame))
  }
}

impl From<DataFrame> for RawPrices {
  fn from(df: DataFrame) -> Self {
    RawPrices::Table(AssetTable::Distributed(df))
  }
}

impl From<Array2<f64>> for RawPrices {
  fn from(values: Array2<f64>) -> Self {
    RawPrices::Matrix(values)
  }
}

impl From<Array1<f64>> for RawPrices {
  fn from(values: Array1<f64>) -> Self {
    RawPrices::Series(values.to_vec())
  }
}

impl From<Vec<f64>> for RawPrices {
  fn from(values: Vec<f64>) -> Self {
    RawPrices::Series(values)
  }
}

impl From<Vec<(String, Vec<f64>)>> for RawPrices {
  fn from(columns: Vec<(String, Vec<f64>)>) -> Self {
    RawPrices::Columns(columns)
  }
}

fn ordinal_index(n: usize) -> Vec<RowKey> {
  (0..n).map(RowKey::Ordinal).collect()
}

/// Normalize caller input into the canonical table type.
///
/// Non-tabular input gets positional row labels and, for unnamed data,
/// positional column labels (`"0"`, `"1"`, ...).
pub fn normalize(raw: RawPrices) -> Result<AssetTable> {
  let frame = match raw {
    RawPrices::Table(table) => return Ok(table),
    RawPrices::Matrix(values) => {
      tracing::warn!(shape = ?values.shape(), "prices are not in a dataframe, coercing matrix");
      let columns = (0..values.ncols()).map(|j| j.to_string()).collect();
      AssetFrame::new(ordinal_index(values.nrows()), columns, values)?
    }
    RawPrices::Series(values) => {
      tracing::warn!(len = values.len(), "prices are not in a dataframe, coercing series");
      let n = values.len();
      AssetFrame::from_columns(ordinal_index(n), vec![("0".to_string(), values)])?
    }
    RawPrices::Columns(columns) => {
      tracing::warn!(columns = columns.len(), "prices are not in a dataframe, coercing columns");
      let n = columns.first().map_or(0, |(_, c)| c.len());
      AssetFrame::from_columns(ordinal_index(n), columns)?
    }
  };

  Ok(AssetTable::InMemory(frame))
}
