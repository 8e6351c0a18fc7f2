//! # Return models
//!
//! $$
//! \text{method} \mapsto \{\text{mean historical},\ \text{EMA},\ \text{CAPM}\}
//! $$
//!
//! Name-based selection of an estimator. Configuration is forwarded untouched.
use std::fmt::Display;
use std::str::FromStr;

use crate::adapter::RawPrices;
use crate::config::ReturnModelConfig;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::estimators::capm_return;
use crate::estimators::ema_historical_return;
use crate::estimators::mean_historical_return;
use crate::frame::ExpectedReturns;

/// Known return models.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReturnModel {
  #[default]
  MeanHistorical,
  EmaHistorical,
  Capm,
  /// Removed shrinkage estimator. Recognized by name, refused by
  /// [`ReturnEstimator::new`].
  JamesSteinShrinkage,
}

impl ReturnModel {
  pub fn name(&self) -> &'static str {
    match self {
      ReturnModel::MeanHistorical => "mean_historical_return",
      ReturnModel::EmaHistorical => "ema_historical_return",
      ReturnModel::Capm => "capm_return",
      ReturnModel::JamesSteinShrinkage => "james_stein_shrinkage",
    }
  }
}

impl FromStr for ReturnModel {
  type Err = ReturnsError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "mean_historical_return" | "mean" => Ok(Self::MeanHistorical),
      "ema_historical_return" | "ema" => Ok(Self::EmaHistorical),
      "capm_return" | "capm" => Ok(Self::Capm),
      "james_stein_shrinkage" => Ok(Self::JamesSteinShrinkage),
      _ => Err(ReturnsError::UnknownModel(s.to_string())),
    }
  }
}

impl Display for ReturnModel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// A runnable return model bound to its configuration.
#[derive(Clone, Debug)]
pub struct ReturnEstimator {
  model: ReturnModel,
  config: ReturnModelConfig,
}

impl ReturnEstimator {
  /// Bind a model to a configuration, refusing removed models.
  pub fn new(model: ReturnModel, config: ReturnModelConfig) -> Result<Self> {
    if model == ReturnModel::JamesSteinShrinkage {
      return Err(ReturnsError::Unsupported(format!(
        "{model} was removed because its implementation was misguided"
      )));
    }
    Ok(Self { model, config })
  }

  pub fn model(&self) -> ReturnModel {
    self.model
  }

  pub fn config(&self) -> &ReturnModelConfig {
    &self.config
  }

  pub fn estimate(&self, prices: impl Into<RawPrices>) -> Result<ExpectedReturns> {
    tracing::info!(model = %self.model, "estimating expected returns");
    match self.model {
      ReturnModel::MeanHistorical => mean_historical_return(prices, &self.config),
      ReturnModel::EmaHistorical => ema_historical_return(prices, &self.config),
      ReturnModel::Capm => capm_return(prices, &self.config),
      ReturnModel::JamesSteinShrinkage => unreachable!("rejected in ReturnEstimator::new"),
    }
  }
}

/// Run the return model named by `method`.
pub fn return_model(
  prices: impl Into<RawPrices>,
  method: &str,
  config: &ReturnModelConfig,
) -> Result<ExpectedReturns> {
  let model = method.parse::<ReturnModel>()?;
  ReturnEstimator::new(model, config.clone())?.estimate(prices)
}
