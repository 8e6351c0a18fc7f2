//! # Frames
//!
//! $$
//! P \in \mathbb R^{T \times N},\quad R_{t,a} = f(P_{t,a}, P_{t-1,a})
//! $$
//!
//! Labeled price/return matrices and the labeled output vector.
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;
use polars::prelude::*;

use crate::error::Result;
use crate::error::ReturnsError;

/// Row label of an [`AssetFrame`].
///
/// Frames built from dated data use [`RowKey::Date`], intraday data
/// [`RowKey::Timestamp`]; raw arrays coerced by the adapter get positional
/// [`RowKey::Ordinal`] labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
  Ordinal(usize),
  Date(NaiveDate),
  Timestamp(NaiveDateTime),
}

impl RowKey {
  fn same_kind(&self, other: &RowKey) -> bool {
    matches!(
      (self, other),
      (RowKey::Ordinal(_), RowKey::Ordinal(_))
        | (RowKey::Date(_), RowKey::Date(_))
        | (RowKey::Timestamp(_), RowKey::Timestamp(_))
    )
  }
}

impl Display for RowKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RowKey::Ordinal(i) => write!(f, "{i}"),
      RowKey::Date(d) => write!(f, "{d}"),
      RowKey::Timestamp(t) => write!(f, "{t}"),
    }
  }
}

/// In-memory table of prices or returns: one row per date, one column per asset.
///
/// Missing observations are stored as `NaN`. The index is unique and kept in
/// ascending order; column identifiers are unique.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetFrame {
  index: Vec<RowKey>,
  columns: Vec<String>,
  values: Array2<f64>,
}

impl AssetFrame {
  /// Build a frame, sorting rows by index.
  ///
  /// Fails when the shape does not match the labels, or when index or column
  /// labels are duplicated.
  pub fn new(index: Vec<RowKey>, columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
    if values.nrows() != index.len() || values.ncols() != columns.len() {
      return Err(ReturnsError::input(format!(
        "values of shape {:?} do not match {} rows x {} columns",
        values.shape(),
        index.len(),
        columns.len()
      )));
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for c in &columns {
      if !seen.insert(c.as_str()) {
        return Err(ReturnsError::input(format!("duplicate asset identifier '{c}'")));
      }
    }

    if let Some(first) = index.first() {
      if index.iter().any(|k| !k.same_kind(first)) {
        return Err(ReturnsError::input("index mixes different kinds of row labels"));
      }
    }

    let mut order: Vec<usize> = (0..index.len()).collect();
    order.sort_by_key(|&i| index[i]);
    if order.windows(2).any(|w| index[w[0]] == index[w[1]]) {
      return Err(ReturnsError::input("duplicate index label"));
    }

    let sorted = order.windows(2).all(|w| w[0] < w[1]);
    let (index, values) = if sorted {
      (index, values)
    } else {
      let idx = order.iter().map(|&i| index[i]).collect();
      (idx, values.select(Axis(0), &order))
    };

    Ok(Self {
      index,
      columns,
      values,
    })
  }

  /// Build a frame indexed by calendar dates.
  pub fn from_dates(dates: Vec<NaiveDate>, columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
    Self::new(dates.into_iter().map(RowKey::Date).collect(), columns, values)
  }

  /// Build a frame from named columns of equal length.
  pub fn from_columns(index: Vec<RowKey>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
    let n = index.len();
    if let Some((name, col)) = columns.iter().find(|(_, c)| c.len() != n) {
      return Err(ReturnsError::input(format!(
        "column '{name}' has {} values, expected {n}",
        col.len()
      )));
    }

    let values = Array2::from_shape_fn((n, columns.len()), |(i, j)| columns[j].1[i]);
    let names = columns.into_iter().map(|(name, _)| name).collect();
    Self::new(index, names, values)
  }

  pub fn index(&self) -> &[RowKey] {
    &self.index
  }

  pub fn columns(&self) -> &[String] {
    &self.columns
  }

  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn nrows(&self) -> usize {
    self.values.nrows()
  }

  pub fn ncols(&self) -> usize {
    self.values.ncols()
  }

  pub fn column_position(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|c| c == name)
  }

  pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
    self
      .column_position(name)
      .map(|j| self.values.column(j))
  }

  pub(crate) fn into_parts(self) -> (Vec<RowKey>, Vec<String>, Array2<f64>) {
    (self.index, self.columns, self.values)
  }

  /// Replace all values while keeping labels. Shapes must agree.
  pub(crate) fn with_values(&self, values: Array2<f64>) -> Self {
    debug_assert_eq!(values.dim(), self.values.dim());
    Self {
      index: self.index.clone(),
      columns: self.columns.clone(),
      values,
    }
  }

  /// Append a column on the right.
  pub fn with_column(mut self, name: &str, column: Array1<f64>) -> Result<Self> {
    if self.column_position(name).is_some() {
      return Err(ReturnsError::input(format!("column '{name}' already exists")));
    }
    if column.len() != self.nrows() {
      return Err(ReturnsError::input(format!(
        "column '{name}' has {} values, expected {}",
        column.len(),
        self.nrows()
      )));
    }

    self
      .values
      .push_column(column.view())
      .map_err(|e| ReturnsError::input(e.to_string()))?;
    self.columns.push(name.to_string());
    Ok(self)
  }

  /// Rename every column. The number of names must match.
  pub fn renamed(mut self, names: Vec<String>) -> Result<Self> {
    if names.len() != self.ncols() {
      return Err(ReturnsError::input(format!(
        "{} names supplied for {} columns",
        names.len(),
        self.ncols()
      )));
    }
    self.columns = names;
    Ok(self)
  }

  /// Left join on the row index: every row of `self` is kept, columns of
  /// `other` are `NaN` where its index has no matching label.
  pub fn left_join(&self, other: &AssetFrame) -> Result<Self> {
    if let Some(c) = other.columns.iter().find(|c| self.column_position(c).is_some()) {
      return Err(ReturnsError::input(format!("column '{c}' exists on both sides of the join")));
    }

    let lookup: HashMap<RowKey, usize> = other
      .index
      .iter()
      .enumerate()
      .map(|(i, k)| (*k, i))
      .collect();

    let (n, m) = (self.nrows(), self.ncols());
    let values = Array2::from_shape_fn((n, m + other.ncols()), |(i, j)| {
      if j < m {
        self.values[[i, j]]
      } else {
        lookup
          .get(&self.index[i])
          .map_or(f64::NAN, |&r| other.values[[r, j - m]])
      }
    });

    let mut columns = self.columns.clone();
    columns.extend(other.columns.iter().cloned());
    Self::new(self.index.clone(), columns, values)
  }

  /// Drop rows in which every value is missing.
  pub fn drop_empty_rows(self) -> Self {
    let keep: Vec<usize> = self
      .values
      .axis_iter(Axis(0))
      .enumerate()
      .filter(|(_, row)| row.iter().any(|v| !v.is_nan()))
      .map(|(i, _)| i)
      .collect();

    if keep.len() == self.nrows() {
      return self;
    }

    Self {
      index: keep.iter().map(|&i| self.index[i]).collect(),
      values: self.values.select(Axis(0), &keep),
      columns: self.columns,
    }
  }

  /// Export as a polars table with `ordering_key` as a Date or Datetime column.
  ///
  /// Only date- or timestamp-indexed frames can be exported.
  pub fn to_polars(&self, ordering_key: &str) -> Result<DataFrame> {
    let keys = match self.index.first() {
      Some(RowKey::Timestamp(_)) => {
        let stamps = self
          .index
          .iter()
          .map(|k| match k {
            RowKey::Timestamp(t) => Ok(*t),
            _ => Err(ReturnsError::input("index mixes different kinds of row labels")),
          })
          .collect::<Result<Vec<NaiveDateTime>>>()?;
        Series::new(ordering_key.into(), stamps)
      }
      _ => {
        let dates = self
          .index
          .iter()
          .map(|k| match k {
            RowKey::Date(d) => Ok(*d),
            _ => Err(ReturnsError::input(
              "only date-indexed frames can be exported to a distributed table",
            )),
          })
          .collect::<Result<Vec<NaiveDate>>>()?;
        Series::new(ordering_key.into(), dates)
      }
    };

    let mut series = Vec::with_capacity(self.ncols() + 1);
    series.push(keys);
    for (j, name) in self.columns.iter().enumerate() {
      let col: Vec<Option<f64>> = self
        .values
        .column(j)
        .iter()
        .map(|v| (!v.is_nan()).then_some(*v))
        .collect();
      series.push(Series::new(name.as_str().into(), col));
    }

    Ok(DataFrame::new(series)?)
  }
}

/// A price or returns table in one of the two supported representations.
#[derive(Clone, Debug)]
pub enum AssetTable {
  InMemory(AssetFrame),
  /// Columnar polars table that carries an explicit ordering column.
  Distributed(DataFrame),
}

impl AssetTable {
  pub fn is_distributed(&self) -> bool {
    matches!(self, AssetTable::Distributed(_))
  }

  /// Materialize into an [`AssetFrame`].
  ///
  /// A distributed table is ordered by `ordering_key`, which becomes the date
  /// (or timestamp) index; null cells become `NaN` and rows with no values at all are dropped.
  pub fn into_frame(self, ordering_key: &str) -> Result<AssetFrame> {
    match self {
      AssetTable::InMemory(frame) => Ok(frame),
      AssetTable::Distributed(df) => frame_from_polars(&df, ordering_key),
    }
  }
}

impl From<AssetFrame> for AssetTable {
  fn from(frame: AssetFrame) -> Self {
    AssetTable::InMemory(frame)
  }
}

impl From<DataFrame> for AssetTable {
  fn from(df: DataFrame) -> Self {
    AssetTable::Distributed(df)
  }
}

pub(crate) fn require_ordering_key(df: &DataFrame, ordering_key: &str) -> Result<()> {
  if df.column(ordering_key).is_err() {
    return Err(ReturnsError::input(format!(
      "distributed table has no '{ordering_key}' ordering column"
    )));
  }
  Ok(())
}

pub(crate) fn asset_columns(df: &DataFrame, ordering_key: &str) -> Vec<String> {
  df.get_columns()
    .iter()
    .map(|s| s.name().to_string())
    .filter(|name| name != ordering_key)
    .collect()
}

fn frame_from_polars(df: &DataFrame, ordering_key: &str) -> Result<AssetFrame> {
  require_ordering_key(df, ordering_key)?;
  let df = df.sort([ordering_key], SortMultipleOptions::default())?;

  let keys = df.column(ordering_key)?;
  let missing = || ReturnsError::input(format!("null value in ordering column '{ordering_key}'"));
  let index = match keys.dtype() {
    DataType::Date => keys
      .date()?
      .as_date_iter()
      .map(|d| d.map(RowKey::Date).ok_or_else(missing))
      .collect::<Result<Vec<RowKey>>>()?,
    DataType::Datetime(_, _) => keys
      .datetime()?
      .as_datetime_iter()
      .map(|t| t.map(RowKey::Timestamp).ok_or_else(missing))
      .collect::<Result<Vec<RowKey>>>()?,
    other => {
      return Err(ReturnsError::input(format!(
        "ordering column '{ordering_key}' must be Date or Datetime, found {other}"
      )))
    }
  };

  let names = asset_columns(&df, ordering_key);
  let mut columns = Vec::with_capacity(names.len());
  for name in names {
    let cast = df.column(&name)?.cast(&DataType::Float64)?;
    let col: Vec<f64> = cast
      .f64()?
      .into_iter()
      .map(|v| v.unwrap_or(f64::NAN))
      .collect();
    columns.push((name, col));
  }

  Ok(AssetFrame::from_columns(index, columns)?.drop_empty_rows())
}

/// Annualized expected return per asset, in input column order.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedReturns {
  assets: Vec<String>,
  values: Array1<f64>,
}

impl ExpectedReturns {
  pub(crate) fn new(assets: Vec<String>, values: Array1<f64>) -> Self {
    debug_assert_eq!(assets.len(), values.len());
    Self { assets, values }
  }

  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  pub fn values(&self) -> &Array1<f64> {
    &self.values
  }

  pub fn get(&self, asset: &str) -> Option<f64> {
    self
      .assets
      .iter()
      .position(|a| a == asset)
      .map(|i| self.values[i])
  }

  pub fn len(&self) -> usize {
    self.assets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
    self
      .assets
      .iter()
      .map(String::as_str)
      .zip(self.values.iter().copied())
  }

  pub fn into_parts(self) -> (Vec<String>, Array1<f64>) {
    (self.assets, self.values)
  }
}
