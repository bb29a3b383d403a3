use crate::error::CoreError::{AssetsToShares, SharesToAssets};

use anchor_lang::prelude::*;
use fix::prelude::*;

/// Conversions between the compounding wrapper's shares (xPYT) and the
/// claim asset it holds (PYT).
///
/// Deposits and redemptions round down, withdrawals and mints round up, so
/// rounding always favours the wrapper. An empty wrapper converts 1:1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareConversion {
  pub total_assets: UFix64<N9>,
  pub total_supply: UFix64<N9>,
}

impl ShareConversion {
  #[must_use]
  pub fn new(
    total_assets: UFix64<N9>,
    total_supply: UFix64<N9>,
  ) -> ShareConversion {
    ShareConversion {
      total_assets,
      total_supply,
    }
  }

  fn is_empty(&self) -> bool {
    self.total_supply == UFix64::zero()
  }

  /// Shares outstanding with nothing behind them.
  fn is_drained(&self) -> bool {
    !self.is_empty() && self.total_assets == UFix64::zero()
  }

  /// `assets * supply / total_assets`, floored.
  pub fn convert_to_shares(&self, assets: UFix64<N9>) -> Result<UFix64<N9>> {
    if self.is_drained() {
      Err(AssetsToShares.into())
    } else if self.is_empty() {
      Ok(assets)
    } else {
      assets
        .mul_div_floor(self.total_supply, self.total_assets)
        .ok_or(AssetsToShares.into())
    }
  }

  /// `shares * total_assets / supply`, floored.
  pub fn convert_to_assets(&self, shares: UFix64<N9>) -> Result<UFix64<N9>> {
    if self.is_empty() {
      Ok(shares)
    } else {
      shares
        .mul_div_floor(self.total_assets, self.total_supply)
        .ok_or(SharesToAssets.into())
    }
  }

  /// Shares minted for depositing `assets`.
  pub fn preview_deposit(&self, assets: UFix64<N9>) -> Result<UFix64<N9>> {
    self.convert_to_shares(assets)
  }

  /// Assets needed to mint exactly `shares`.
  pub fn preview_mint(&self, shares: UFix64<N9>) -> Result<UFix64<N9>> {
    if self.is_empty() {
      Ok(shares)
    } else {
      shares
        .mul_div_ceil(self.total_assets, self.total_supply)
        .ok_or(SharesToAssets.into())
    }
  }

  /// Shares burned to withdraw exactly `assets`.
  pub fn preview_withdraw(&self, assets: UFix64<N9>) -> Result<UFix64<N9>> {
    if self.is_drained() {
      Err(AssetsToShares.into())
    } else if self.is_empty() {
      Ok(assets)
    } else {
      assets
        .mul_div_ceil(self.total_supply, self.total_assets)
        .ok_or(AssetsToShares.into())
    }
  }

  /// Assets paid out for redeeming `shares`.
  pub fn preview_redeem(&self, shares: UFix64<N9>) -> Result<UFix64<N9>> {
    self.convert_to_assets(shares)
  }
}
