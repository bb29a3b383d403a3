use anchor_lang::prelude::*;
use fix::prelude::*;
use swapper_core::share_math::ShareConversion;

use crate::error::SwapperError::MaxRedeemExceeded;
use crate::ledger::Ledger;
use crate::pda;

/// Compounding share wrapper over PYT, as consumed by the gate and router.
pub trait ShareWrapper {
  fn address(&self) -> Pubkey;

  /// Mint of the wrapped asset (PYT).
  fn asset(&self) -> Pubkey;

  /// Mint of the wrapper's shares (xPYT).
  fn share_mint(&self) -> Pubkey;

  fn conversion(&self, ledger: &Ledger) -> ShareConversion;

  fn preview_deposit(
    &self,
    ledger: &Ledger,
    assets: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    self.conversion(ledger).preview_deposit(assets)
  }

  fn preview_withdraw(
    &self,
    ledger: &Ledger,
    assets: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    self.conversion(ledger).preview_withdraw(assets)
  }

  fn preview_redeem(
    &self,
    ledger: &Ledger,
    shares: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    self.conversion(ledger).preview_redeem(shares)
  }

  fn convert_to_assets(
    &self,
    ledger: &Ledger,
    shares: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    self.conversion(ledger).convert_to_assets(shares)
  }

  fn max_redeem(&self, ledger: &Ledger, owner: Pubkey) -> UFix64<N9> {
    ledger.balance(self.share_mint(), owner)
  }

  /// Pulls `assets` from `caller` and mints shares to `recipient`.
  fn deposit(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    assets: UFix64<N9>,
    recipient: Pubkey,
  ) -> Result<UFix64<N9>>;

  /// Burns `shares` from `owner` and pays the assets to `recipient`.
  fn redeem(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    shares: UFix64<N9>,
    recipient: Pubkey,
    owner: Pubkey,
  ) -> Result<UFix64<N9>>;

  /// Burns enough of `owner`'s shares to pay exactly `assets` to
  /// `recipient`, returning the shares burned.
  fn withdraw(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    assets: UFix64<N9>,
    recipient: Pubkey,
    owner: Pubkey,
  ) -> Result<UFix64<N9>>;
}

/// xPYT: holds PYT in its own ledger account, so compounding is any PYT
/// credited to the wrapper without minting shares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xpyt {
  address: Pubkey,
  pyt: Pubkey,
  share_mint: Pubkey,
}

impl Xpyt {
  #[must_use]
  pub fn new(address: Pubkey, pyt: Pubkey) -> Xpyt {
    Xpyt {
      address,
      pyt,
      share_mint: pda::xpyt(address, pyt),
    }
  }

  fn burn_shares(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    shares: UFix64<N9>,
    owner: Pubkey,
  ) -> Result<()> {
    if shares > self.max_redeem(ledger, owner) {
      return Err(MaxRedeemExceeded.into());
    }
    ledger.spend_allowance(self.share_mint, owner, caller, shares)?;
    ledger.burn(self.share_mint, owner, shares)
  }
}

impl ShareWrapper for Xpyt {
  fn address(&self) -> Pubkey {
    self.address
  }

  fn asset(&self) -> Pubkey {
    self.pyt
  }

  fn share_mint(&self) -> Pubkey {
    self.share_mint
  }

  fn conversion(&self, ledger: &Ledger) -> ShareConversion {
    ShareConversion::new(
      ledger.balance(self.pyt, self.address),
      ledger.supply(self.share_mint),
    )
  }

  fn deposit(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    assets: UFix64<N9>,
    recipient: Pubkey,
  ) -> Result<UFix64<N9>> {
    let shares = self.preview_deposit(ledger, assets)?;
    ledger.transfer_from(self.pyt, self.address, caller, self.address, assets)?;
    ledger.mint_to(self.share_mint, recipient, shares)?;
    Ok(shares)
  }

  fn redeem(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    shares: UFix64<N9>,
    recipient: Pubkey,
    owner: Pubkey,
  ) -> Result<UFix64<N9>> {
    let assets = self.preview_redeem(ledger, shares)?;
    self.burn_shares(ledger, caller, shares, owner)?;
    ledger.transfer(self.pyt, self.address, recipient, assets)?;
    Ok(assets)
  }

  fn withdraw(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    assets: UFix64<N9>,
    recipient: Pubkey,
    owner: Pubkey,
  ) -> Result<UFix64<N9>> {
    let shares = self.preview_withdraw(ledger, assets)?;
    self.burn_shares(ledger, caller, shares, owner)?;
    ledger.transfer(self.pyt, self.address, recipient, assets)?;
    Ok(shares)
  }
}
