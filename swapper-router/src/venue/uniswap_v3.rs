//! Constant-product pools settled through a payment callback: the pool
//! sends output first, asks the payer for input, then checks it arrived.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use fix::prelude::*;
use swapper_core::constant_product;
use swapper_core::error::CoreError::ConstantProductFeeTier;

use crate::error::SwapperError::{
  CallbackData, CallbackDelta, CallbackSender, CallbackUnpaid, PoolNotFound,
  PriceLimitReached, RouterArithmetic,
};
use crate::ledger::Ledger;
use crate::pda;
use crate::venue::SwapBackend;

/// Receives the pool's request for payment mid-swap. Positive deltas are
/// owed to the pool.
pub trait SwapCallback {
  fn uniswap_v3_swap_callback(
    &self,
    ledger: &mut Ledger,
    sender: Pubkey,
    amount0_delta: i128,
    amount1_delta: i128,
    data: &[u8],
  ) -> Result<()>;
}

/// Call data forwarded through the pool back to the callback.
#[derive(
  Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize,
)]
pub struct SwapCallbackData {
  pub token_in: Pubkey,
  pub token_out: Pubkey,
  pub fee: u32,
}

impl SwapCallbackData {
  pub fn encode(&self) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    self.serialize(&mut data).map_err(|_| CallbackData)?;
    Ok(data)
  }

  pub fn decode(data: &[u8]) -> Result<SwapCallbackData> {
    Ok(SwapCallbackData::try_from_slice(data).map_err(|_| CallbackData)?)
  }
}

/// Exact-input `x * y = k` pool whose reserves are its ledger balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantProductPool {
  pub address: Pubkey,
  pub token0: Pubkey,
  pub token1: Pubkey,
  /// Fee tier in hundredths of a bip.
  pub fee: u32,
}

fn to_delta(amount: UFix64<N9>) -> i128 {
  i128::from(amount.bits)
}

impl ConstantProductPool {
  #[must_use]
  pub fn reserves(&self, ledger: &Ledger) -> (UFix64<N9>, UFix64<N9>) {
    (
      ledger.balance(self.token0, self.address),
      ledger.balance(self.token1, self.address),
    )
  }

  fn direction(&self, zero_for_one: bool) -> (Pubkey, Pubkey) {
    if zero_for_one {
      (self.token0, self.token1)
    } else {
      (self.token1, self.token0)
    }
  }

  pub fn quote(
    &self,
    ledger: &Ledger,
    zero_for_one: bool,
    amount_in: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    let (token_in, token_out) = self.direction(zero_for_one);
    constant_product::amount_out(
      ledger.balance(token_in, self.address),
      ledger.balance(token_out, self.address),
      amount_in,
      self.fee,
    )
  }

  /// Swaps exactly `amount_in`. When `price_limit` is given, the post-trade
  /// price of the output token per input token must not fall below it.
  /// Returns `(amount0_delta, amount1_delta)` from the pool's view.
  #[allow(clippy::too_many_arguments)]
  pub fn swap(
    &self,
    ledger: &mut Ledger,
    callback: &dyn SwapCallback,
    recipient: Pubkey,
    zero_for_one: bool,
    amount_in: UFix64<N9>,
    price_limit: Option<UFix64<N9>>,
    data: &[u8],
  ) -> Result<(i128, i128)> {
    let (token_in, token_out) = self.direction(zero_for_one);
    let reserve_in = ledger.balance(token_in, self.address);
    let reserve_out = ledger.balance(token_out, self.address);
    let amount_out = constant_product::amount_out(
      reserve_in,
      reserve_out,
      amount_in,
      self.fee,
    )?;
    if let Some(limit) = price_limit {
      let price = constant_product::spot_price(
        reserve_in.checked_add(&amount_in).ok_or(RouterArithmetic)?,
        reserve_out.checked_sub(&amount_out).ok_or(RouterArithmetic)?,
      )?;
      if price < limit {
        return Err(PriceLimitReached.into());
      }
    }

    ledger.transfer(token_out, self.address, recipient, amount_out)?;
    let (delta_in, delta_out) = (to_delta(amount_in), -to_delta(amount_out));
    let (amount0_delta, amount1_delta) = if zero_for_one {
      (delta_in, delta_out)
    } else {
      (delta_out, delta_in)
    };
    callback.uniswap_v3_swap_callback(
      ledger,
      self.address,
      amount0_delta,
      amount1_delta,
      data,
    )?;
    let owed = reserve_in.checked_add(&amount_in).ok_or(RouterArithmetic)?;
    if ledger.balance(token_in, self.address) < owed {
      return Err(CallbackUnpaid.into());
    }
    tracing::debug!(
      pool = %self.address,
      amount_in = amount_in.bits,
      amount_out = amount_out.bits,
      "constant product swap"
    );
    Ok((amount0_delta, amount1_delta))
  }
}

/// Deploys pools at addresses derived from the token pair and fee tier.
#[derive(Clone, Debug, Default)]
pub struct ConstantProductFactory {
  address: Pubkey,
  pools: HashMap<Pubkey, ConstantProductPool>,
}

impl ConstantProductFactory {
  #[must_use]
  pub fn new(address: Pubkey) -> ConstantProductFactory {
    ConstantProductFactory {
      address,
      pools: HashMap::new(),
    }
  }

  #[must_use]
  pub fn address(&self) -> Pubkey {
    self.address
  }

  pub fn create_pool(
    &mut self,
    a: Pubkey,
    b: Pubkey,
    fee: u32,
  ) -> Result<Pubkey> {
    if fee >= constant_product::FEE_DENOMINATOR {
      return Err(ConstantProductFeeTier.into());
    }
    let (token0, token1) = pda::sort_tokens(a, b);
    let address = pda::pool(self.address, a, b, fee);
    self.pools.insert(
      address,
      ConstantProductPool {
        address,
        token0,
        token1,
        fee,
      },
    );
    Ok(address)
  }

  pub fn get_pool(
    &self,
    a: Pubkey,
    b: Pubkey,
    fee: u32,
  ) -> Result<&ConstantProductPool> {
    self
      .pools
      .get(&pda::pool(self.address, a, b, fee))
      .ok_or(PoolNotFound.into())
  }
}

/// Per-swap payment context: the callback pays whichever pool the factory
/// derivation names from `payer`'s balance.
#[derive(Clone, Copy, Debug)]
pub struct PaymentCallback {
  pub factory: Pubkey,
  pub payer: Pubkey,
}

impl SwapCallback for PaymentCallback {
  fn uniswap_v3_swap_callback(
    &self,
    ledger: &mut Ledger,
    sender: Pubkey,
    amount0_delta: i128,
    amount1_delta: i128,
    data: &[u8],
  ) -> Result<()> {
    if amount0_delta <= 0 && amount1_delta <= 0 {
      return Err(CallbackDelta.into());
    }
    let data = SwapCallbackData::decode(data)?;
    let expected =
      pda::pool(self.factory, data.token_in, data.token_out, data.fee);
    if expected != sender {
      return Err(CallbackSender.into());
    }
    let owed = amount0_delta.max(amount1_delta);
    let amount = u64::try_from(owed).map_err(|_| CallbackDelta)?;
    ledger.transfer(data.token_in, self.payer, sender, UFix64::new(amount))
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniswapV3Route {
  /// Pool fee tier in hundredths of a bip.
  pub fee: u32,
}

#[derive(Clone, Debug, Default)]
pub struct UniswapV3Backend {
  pub factory: ConstantProductFactory,
}

impl UniswapV3Backend {
  #[must_use]
  pub fn new(factory: ConstantProductFactory) -> UniswapV3Backend {
    UniswapV3Backend { factory }
  }
}

impl SwapBackend for UniswapV3Backend {
  type Route = UniswapV3Route;

  fn quote(
    &self,
    ledger: &Ledger,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    route: &UniswapV3Route,
  ) -> Result<UFix64<N9>> {
    let pool = self.factory.get_pool(token_in, token_out, route.fee)?;
    pool.quote(ledger, token_in < token_out, amount_in)
  }

  fn swap(
    &self,
    ledger: &mut Ledger,
    payer: Pubkey,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    recipient: Pubkey,
    route: &UniswapV3Route,
  ) -> Result<UFix64<N9>> {
    let pool = self.factory.get_pool(token_in, token_out, route.fee)?;
    let zero_for_one = token_in < token_out;
    let data = SwapCallbackData {
      token_in,
      token_out,
      fee: route.fee,
    }
    .encode()?;
    let callback = PaymentCallback {
      factory: self.factory.address(),
      payer,
    };
    let (amount0_delta, amount1_delta) = pool.swap(
      ledger,
      &callback,
      recipient,
      zero_for_one,
      amount_in,
      None,
      &data,
    )?;
    let received = if zero_for_one {
      -amount1_delta
    } else {
      -amount0_delta
    };
    let received = u64::try_from(received).map_err(|_| RouterArithmetic)?;
    Ok(UFix64::new(received))
  }
}
