//! # Expected returns
//!
//! $$
//! P \xrightarrow{\text{transform}} R \xrightarrow{\text{estimator}} \mu \in \mathbb R^N
//! $$
//!
//! Annualized expected-return estimates from historical prices, for use as the
//! `mu` input of a portfolio optimizer. Prices can live in memory
//! ([`frame::AssetFrame`]) or in a polars table with an ordering column.
//!
//! ```ignore
//! use expected_returns::prelude::*;
//!
//! let mu = return_model(prices, "capm_return", &ReturnModelConfig::default())?;
//! ```
pub mod adapter;
pub mod config;
pub mod error;
pub mod estimators;
pub mod frame;
pub mod model;
pub mod stats;
pub mod transform;

pub mod prelude {
  pub use crate::adapter::normalize;
  pub use crate::adapter::RawPrices;
  pub use crate::config::ExecutionMode;
  pub use crate::config::ReturnModelConfig;
  pub use crate::config::TRADING_DAYS;
  pub use crate::error::ReturnsError;
  pub use crate::estimators::capm_fit;
  pub use crate::estimators::capm_return;
  pub use crate::estimators::ema_historical_return;
  pub use crate::estimators::mean_historical_return;
  pub use crate::estimators::MarketModel;
  pub use crate::frame::AssetFrame;
  pub use crate::frame::AssetTable;
  pub use crate::frame::ExpectedReturns;
  pub use crate::frame::RowKey;
  pub use crate::model::return_model;
  pub use crate::model::ReturnEstimator;
  pub use crate::model::ReturnModel;
  pub use crate::transform::prices_from_returns;
  pub use crate::transform::returns_from_prices;
  pub use crate::transform::ReturnsBackend;
}
