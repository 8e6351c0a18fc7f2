//! # Errors
//!
//! $$
//! \text{estimate} : \text{inputs} \to \mu \;\cup\; \text{ReturnsError}
//! $$
//!
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure modes of the return transforms and estimators.
///
/// All variants are fatal for the call that produced them; nothing in this
/// crate retries or recovers.
#[derive(Debug, Error)]
pub enum ReturnsError {
  /// Misuse of the input tables or configuration: wrong table kind for the
  /// requested execution mode, missing ordering column, ragged or duplicated
  /// data, invalid parameters.
  #[error("input error: {0}")]
  Input(String),

  /// The model name does not match any known estimator.
  #[error("return model {0} not implemented")]
  UnknownModel(String),

  /// The estimator exists by name but refuses to run.
  #[error("unsupported return model: {0}")]
  Unsupported(String),

  /// Market variance too small to divide by when computing betas.
  #[error("market return variance {0:e} is degenerate")]
  DegenerateMarket(f64),

  #[error(transparent)]
  Polars(#[from] PolarsError),
}

impl ReturnsError {
  pub(crate) fn input(msg: impl Into<String>) -> Self {
    Self::Input(msg.into())
  }
}

pub type Result<T> = std::result::Result<T, ReturnsError>;
