//! # CAPM
//!
//! $$
//! \mu_i = r_f + \beta_i\,(\mathbb E[R_m] - r_f),
//! \qquad \beta_i = \frac{\operatorname{Cov}(R_i, R_m)}{\operatorname{Var}(R_m)}
//! $$
//!
//! When no benchmark is configured the equal-weighted average of the assets
//! stands in for the market.
use ndarray::s;
use ndarray::Array1;

use super::annualize;
use super::asset_returns;
use crate::adapter::RawPrices;
use crate::config::ReturnModelConfig;
use crate::error::Result;
use crate::error::ReturnsError;
use crate::frame::AssetFrame;
use crate::frame::ExpectedReturns;
use crate::stats;

/// Reserved label of the market column appended to the returns matrix.
pub const MARKET_COLUMN: &str = "mkt";

/// Market variances at or below this are treated as degenerate.
const MIN_MARKET_VARIANCE: f64 = 1e-18;

/// Betas and market statistics behind a CAPM estimate.
#[derive(Clone, Debug)]
pub struct MarketModel {
  assets: Vec<String>,
  betas: Array1<f64>,
  market: Array1<f64>,
  market_variance: f64,
  market_return: f64,
}

impl MarketModel {
  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  /// Beta per asset, market excluded.
  pub fn betas(&self) -> &Array1<f64> {
    &self.betas
  }

  pub fn beta(&self, asset: &str) -> Option<f64> {
    self
      .assets
      .iter()
      .position(|a| a == asset)
      .map(|i| self.betas[i])
  }

  /// Per-period market returns aligned with the asset returns rows.
  pub fn market_returns(&self) -> &Array1<f64> {
    &self.market
  }

  pub fn market_variance(&self) -> f64 {
    self.market_variance
  }

  /// Annualized market return.
  pub fn market_return(&self) -> f64 {
    self.market_return
  }

  /// Apply the CAPM pricing equation.
  pub fn expected_returns(&self, risk_free_rate: f64) -> ExpectedReturns {
    let premium = self.market_return - risk_free_rate;
    let values = self.betas.mapv(|b| risk_free_rate + b * premium);
    ExpectedReturns::new(self.assets.clone(), values)
  }
}

fn with_market(returns: AssetFrame, cfg: &ReturnModelConfig) -> Result<AssetFrame> {
  if returns.column_position(MARKET_COLUMN).is_some() {
    return Err(ReturnsError::input(format!(
      "asset identifier '{MARKET_COLUMN}' is reserved for the market column"
    )));
  }

  match &cfg.market_prices {
    None => {
      let proxy = stats::row_mean(returns.values());
      returns.with_column(MARKET_COLUMN, proxy)
    }
    Some(market) => {
      let market = asset_returns(market.clone().into(), cfg)?;
      if market.ncols() != 1 {
        return Err(ReturnsError::input(format!(
          "market benchmark must have exactly one column, got {}",
          market.ncols()
        )));
      }
      let market = market.renamed(vec![MARKET_COLUMN.to_string()])?;
      returns.left_join(&market)
    }
  }
}

/// Estimate asset betas against the configured (or synthesized) market.
pub fn capm_fit(prices: impl Into<RawPrices>, cfg: &ReturnModelConfig) -> Result<MarketModel> {
  let returns = asset_returns(prices.into(), cfg)?;
  let combined = with_market(returns, cfg)?;

  let k = combined.ncols() - 1;
  let cov = stats::covariance(&combined.values().view());
  let market_variance = cov[[k, k]];
  if !market_variance.is_finite() || market_variance <= MIN_MARKET_VARIANCE {
    return Err(ReturnsError::DegenerateMarket(market_variance));
  }

  let betas = cov.slice(s![..k, k]).mapv(|c| c / market_variance);
  let market = combined.values().column(k);
  let market_return = annualize(&market, cfg.compounding, cfg.frequency);
  tracing::debug!(assets = k, market_variance, market_return, "capm fit");

  let (_, mut assets, values) = combined.into_parts();
  assets.truncate(k);
  Ok(MarketModel {
    assets,
    betas,
    market: values.column(k).to_owned(),
    market_variance,
    market_return,
  })
}

/// CAPM expected return per asset.
pub fn capm_return(prices: impl Into<RawPrices>, cfg: &ReturnModelConfig) -> Result<ExpectedReturns> {
  Ok(capm_fit(prices, cfg)?.expected_returns(cfg.risk_free_rate))
}
