//! In-memory token ledger and clock that every router component operates on.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use fix::prelude::*;
use swapper_core::solana_clock::SolanaClock;

use crate::error::SwapperError::{
  InsufficientAllowance, InsufficientBalance, LedgerOverflow,
};

/// Allowance that is never decremented by `transfer_from`.
#[must_use]
pub fn max_allowance() -> UFix64<N9> {
  UFix64::new(u64::MAX)
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
  balances: HashMap<(Pubkey, Pubkey), UFix64<N9>>,
  allowances: HashMap<(Pubkey, Pubkey, Pubkey), UFix64<N9>>,
  supplies: HashMap<Pubkey, UFix64<N9>>,
  clock: Clock,
}

impl Ledger {
  #[must_use]
  pub fn new(clock: Clock) -> Ledger {
    Ledger {
      clock,
      ..Ledger::default()
    }
  }

  #[must_use]
  pub fn clock(&self) -> &Clock {
    &self.clock
  }

  pub fn set_unix_timestamp(&mut self, unix_timestamp: i64) {
    self.clock.unix_timestamp = unix_timestamp;
  }

  #[must_use]
  pub fn now(&self) -> i64 {
    self.clock.unix_timestamp()
  }

  #[must_use]
  pub fn balance(&self, mint: Pubkey, owner: Pubkey) -> UFix64<N9> {
    self
      .balances
      .get(&(mint, owner))
      .copied()
      .unwrap_or(UFix64::zero())
  }

  #[must_use]
  pub fn supply(&self, mint: Pubkey) -> UFix64<N9> {
    self.supplies.get(&mint).copied().unwrap_or(UFix64::zero())
  }

  #[must_use]
  pub fn allowance(
    &self,
    mint: Pubkey,
    owner: Pubkey,
    spender: Pubkey,
  ) -> UFix64<N9> {
    self
      .allowances
      .get(&(mint, owner, spender))
      .copied()
      .unwrap_or(UFix64::zero())
  }

  fn credit(
    &mut self,
    mint: Pubkey,
    owner: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    let balance = self
      .balance(mint, owner)
      .checked_add(&amount)
      .ok_or(LedgerOverflow)?;
    self.balances.insert((mint, owner), balance);
    Ok(())
  }

  fn debit(
    &mut self,
    mint: Pubkey,
    owner: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    let balance = self
      .balance(mint, owner)
      .checked_sub(&amount)
      .ok_or(InsufficientBalance)?;
    if balance == UFix64::zero() {
      self.balances.remove(&(mint, owner));
    } else {
      self.balances.insert((mint, owner), balance);
    }
    Ok(())
  }

  pub fn mint_to(
    &mut self,
    mint: Pubkey,
    to: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    let supply = self
      .supply(mint)
      .checked_add(&amount)
      .ok_or(LedgerOverflow)?;
    self.credit(mint, to, amount)?;
    self.supplies.insert(mint, supply);
    Ok(())
  }

  pub fn burn(
    &mut self,
    mint: Pubkey,
    from: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    self.debit(mint, from, amount)?;
    let supply = self
      .supply(mint)
      .checked_sub(&amount)
      .ok_or(InsufficientBalance)?;
    self.supplies.insert(mint, supply);
    Ok(())
  }

  pub fn transfer(
    &mut self,
    mint: Pubkey,
    from: Pubkey,
    to: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    self.debit(mint, from, amount)?;
    self.credit(mint, to, amount)
  }

  pub fn approve(
    &mut self,
    mint: Pubkey,
    owner: Pubkey,
    spender: Pubkey,
    amount: UFix64<N9>,
  ) {
    self.allowances.insert((mint, owner, spender), amount);
  }

  /// Raises `spender`'s allowance to [`max_allowance`] when it cannot cover
  /// `amount`. Idempotent once raised.
  pub fn approve_max_if_needed(
    &mut self,
    mint: Pubkey,
    owner: Pubkey,
    spender: Pubkey,
    amount: UFix64<N9>,
  ) {
    if self.allowance(mint, owner, spender) < amount {
      self.approve(mint, owner, spender, max_allowance());
    }
  }

  /// Consumes `amount` of `spender`'s allowance over `owner`'s tokens. An
  /// owner spending its own tokens and [`max_allowance`] are left untouched.
  pub fn spend_allowance(
    &mut self,
    mint: Pubkey,
    owner: Pubkey,
    spender: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    if spender == owner {
      return Ok(());
    }
    let allowance = self.allowance(mint, owner, spender);
    if allowance != max_allowance() {
      let remaining = allowance
        .checked_sub(&amount)
        .ok_or(InsufficientAllowance)?;
      self.approve(mint, owner, spender, remaining);
    }
    Ok(())
  }

  /// Moves `amount` from `from` to `to` on behalf of `spender`.
  pub fn transfer_from(
    &mut self,
    mint: Pubkey,
    spender: Pubkey,
    from: Pubkey,
    to: Pubkey,
    amount: UFix64<N9>,
  ) -> Result<()> {
    self.spend_allowance(mint, from, spender, amount)?;
    self.transfer(mint, from, to, amount)
  }

  /// Runs `f` against the ledger, restoring the prior state if it fails.
  pub fn transact<T, F>(&mut self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Ledger) -> Result<T>,
  {
    let snapshot = self.clone();
    let out = f(self);
    if out.is_err() {
      *self = snapshot;
    }
    out
  }
}
