//! Two-coin stableswap pools that settle synchronously: the pool pulls its
//! input through an allowance and pays out in the same call.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use fix::prelude::*;
use swapper_core::stable_swap::StableSwap;

use crate::error::SwapperError::{CoinNotInPool, PoolNotFound, VenueSlippage};
use crate::ledger::Ledger;
use crate::venue::SwapBackend;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CryptoPool {
  pub address: Pubkey,
  pub coins: [Pubkey; 2],
  pub invariant: StableSwap,
}

impl CryptoPool {
  #[must_use]
  pub fn new(
    address: Pubkey,
    coins: [Pubkey; 2],
    amplification: u64,
    fee_bps: u16,
  ) -> CryptoPool {
    CryptoPool {
      address,
      coins,
      invariant: StableSwap::new(amplification, fee_bps),
    }
  }

  pub fn index_of(&self, coin: Pubkey) -> Result<usize> {
    self
      .coins
      .iter()
      .position(|c| *c == coin)
      .ok_or(CoinNotInPool.into())
  }

  #[must_use]
  pub fn balances(&self, ledger: &Ledger) -> [UFix64<N9>; 2] {
    self.coins.map(|coin| ledger.balance(coin, self.address))
  }

  pub fn get_dy(
    &self,
    ledger: &Ledger,
    i: usize,
    j: usize,
    dx: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    self.invariant.get_dy(self.balances(ledger), i, j, dx)
  }

  /// Pulls `dx` of coin `i` from `caller` and pays coin `j` to `recipient`.
  #[allow(clippy::too_many_arguments)]
  pub fn exchange(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    i: usize,
    j: usize,
    dx: UFix64<N9>,
    min_dy: UFix64<N9>,
    recipient: Pubkey,
  ) -> Result<UFix64<N9>> {
    let dy = self.get_dy(ledger, i, j, dx)?;
    if dy < min_dy {
      return Err(VenueSlippage.into());
    }
    ledger.transfer_from(
      self.coins[i],
      self.address,
      caller,
      self.address,
      dx,
    )?;
    ledger.transfer(self.coins[j], self.address, recipient, dy)?;
    tracing::debug!(
      pool = %self.address,
      dx = dx.bits,
      dy = dy.bits,
      "stableswap exchange"
    );
    Ok(dy)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveRoute {
  pub pool: Pubkey,
}

#[derive(Clone, Debug, Default)]
pub struct CurveBackend {
  pools: HashMap<Pubkey, CryptoPool>,
}

impl CurveBackend {
  #[must_use]
  pub fn new() -> CurveBackend {
    CurveBackend::default()
  }

  pub fn add_pool(&mut self, pool: CryptoPool) {
    self.pools.insert(pool.address, pool);
  }

  pub fn pool(&self, address: Pubkey) -> Result<&CryptoPool> {
    self.pools.get(&address).ok_or(PoolNotFound.into())
  }

  fn resolve(
    &self,
    token_in: Pubkey,
    token_out: Pubkey,
    route: &CurveRoute,
  ) -> Result<(&CryptoPool, usize, usize)> {
    let pool = self.pool(route.pool)?;
    Ok((pool, pool.index_of(token_in)?, pool.index_of(token_out)?))
  }
}

impl SwapBackend for CurveBackend {
  type Route = CurveRoute;

  fn quote(
    &self,
    ledger: &Ledger,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    route: &CurveRoute,
  ) -> Result<UFix64<N9>> {
    let (pool, i, j) = self.resolve(token_in, token_out, route)?;
    pool.get_dy(ledger, i, j, amount_in)
  }

  fn swap(
    &self,
    ledger: &mut Ledger,
    payer: Pubkey,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    recipient: Pubkey,
    route: &CurveRoute,
  ) -> Result<UFix64<N9>> {
    let (pool, i, j) = self.resolve(token_in, token_out, route)?;
    ledger.approve_max_if_needed(token_in, payer, pool.address, amount_in);
    pool.exchange(ledger, payer, i, j, amount_in, UFix64::zero(), recipient)
  }
}
