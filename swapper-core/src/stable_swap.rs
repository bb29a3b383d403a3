use crate::error::CoreError::{
  StableSwapArithmetic, StableSwapConvergence, StableSwapIndex,
  StableSwapLiquidity,
};

use anchor_lang::prelude::*;
use fix::prelude::*;

const N_COINS: usize = 2;
const MAX_ITERS: usize = 256;
const BPS_DENOMINATOR: u128 = 10_000;

fn mul_div(a: u128, b: u128, denominator: u128) -> Option<u128> {
  a.checked_mul(b)?.checked_div(denominator)
}

fn within_one(a: u128, b: u128) -> bool {
  a.abs_diff(b) <= 1
}

/// Two-coin stableswap invariant with amplification `A` and an input fee in
/// basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StableSwap {
  pub amplification: u64,
  pub fee_bps: u16,
}

impl StableSwap {
  #[must_use]
  pub fn new(amplification: u64, fee_bps: u16) -> StableSwap {
    StableSwap {
      amplification,
      fee_bps,
    }
  }

  /// `A * n^n`
  fn ann(&self) -> u128 {
    u128::from(self.amplification) * 4
  }

  /// Invariant `D` by Newton's method.
  pub fn compute_d(&self, balances: [u128; N_COINS]) -> Result<u128> {
    let ann = self.ann();
    let sum = balances[0]
      .checked_add(balances[1])
      .ok_or(StableSwapArithmetic)?;
    if sum == 0 {
      return Ok(0);
    }
    let mut d = sum;
    for _ in 0..MAX_ITERS {
      let mut d_p = d;
      for balance in balances {
        d_p = mul_div(d_p, d, balance * N_COINS as u128)
          .ok_or(StableSwapLiquidity)?;
      }
      let prev = d;
      let numerator = ann
        .checked_mul(sum)
        .and_then(|a| a.checked_add(d_p * N_COINS as u128))
        .and_then(|a| a.checked_mul(d))
        .ok_or(StableSwapArithmetic)?;
      let denominator = ann
        .saturating_sub(1)
        .checked_mul(d)
        .and_then(|a| a.checked_add((N_COINS as u128 + 1) * d_p))
        .ok_or(StableSwapArithmetic)?;
      d = numerator
        .checked_div(denominator)
        .ok_or(StableSwapArithmetic)?;
      if within_one(d, prev) {
        return Ok(d);
      }
    }
    Err(StableSwapConvergence.into())
  }

  /// New balance of coin `j` keeping `D` constant after coin `i` moved to
  /// `balances[i]`.
  fn get_y(
    &self,
    j: usize,
    balances: [u128; N_COINS],
    d: u128,
  ) -> Result<u128> {
    let ann = self.ann();
    let other = balances[1 - j];
    let c = mul_div(d, d, other * N_COINS as u128)
      .and_then(|c| mul_div(c, d, ann * N_COINS as u128))
      .ok_or(StableSwapArithmetic)?;
    let b = other + d / ann;
    let mut y = d;
    for _ in 0..MAX_ITERS {
      let prev = y;
      let numerator = y
        .checked_mul(y)
        .and_then(|a| a.checked_add(c))
        .ok_or(StableSwapArithmetic)?;
      let denominator = (2 * y + b)
        .checked_sub(d)
        .filter(|den| *den > 0)
        .ok_or(StableSwapArithmetic)?;
      y = numerator / denominator;
      if within_one(y, prev) {
        return Ok(y);
      }
    }
    Err(StableSwapConvergence.into())
  }

  /// Output of coin `j` for `dx` of coin `i`, fee taken from the input.
  /// Rounded one unit down so the pool is never over-withdrawn.
  pub fn get_dy(
    &self,
    balances: [UFix64<N9>; N_COINS],
    i: usize,
    j: usize,
    dx: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    if i == j || i >= N_COINS || j >= N_COINS {
      return Err(StableSwapIndex.into());
    }
    if dx == UFix64::zero() {
      return Ok(UFix64::zero());
    }
    if balances[i] == UFix64::zero() || balances[j] == UFix64::zero() {
      return Err(StableSwapLiquidity.into());
    }
    let mut xp = balances.map(|b| u128::from(b.bits));
    let d = self.compute_d(xp)?;
    let fee = u128::from(self.fee_bps);
    let dx_less_fee = mul_div(
      u128::from(dx.bits),
      BPS_DENOMINATOR.saturating_sub(fee),
      BPS_DENOMINATOR,
    )
    .ok_or(StableSwapArithmetic)?;
    xp[i] += dx_less_fee;
    let y = self.get_y(j, xp, d)?;
    let dy = xp[j]
      .checked_sub(y)
      .map(|dy| dy.saturating_sub(1))
      .and_then(|dy| u64::try_from(dy).ok())
      .ok_or(StableSwapArithmetic)?;
    Ok(UFix64::new(dy))
  }
}
