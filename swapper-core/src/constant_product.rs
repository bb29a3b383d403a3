use crate::error::CoreError::{
  ConstantProductArithmetic, ConstantProductFeeTier, ConstantProductLiquidity,
};

use anchor_lang::prelude::*;
use fix::prelude::*;

/// Fee tiers are expressed in hundredths of a bip.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Output of an exact-input trade against `x * y = k` reserves, with the fee
/// taken from the input before it enters the curve.
///
/// ```txt
///                  reserve_out * amount_in * (1 - fee)
/// amount_out = -----------------------------------------
///               reserve_in + amount_in * (1 - fee)
/// ```
pub fn amount_out(
  reserve_in: UFix64<N9>,
  reserve_out: UFix64<N9>,
  amount_in: UFix64<N9>,
  fee_pips: u32,
) -> Result<UFix64<N9>> {
  if fee_pips >= FEE_DENOMINATOR {
    return Err(ConstantProductFeeTier.into());
  }
  if amount_in == UFix64::zero() {
    return Ok(UFix64::zero());
  }
  if reserve_in == UFix64::zero() || reserve_out == UFix64::zero() {
    return Err(ConstantProductLiquidity.into());
  }
  let amount_in_less_fee = u128::from(amount_in.bits)
    * u128::from(FEE_DENOMINATOR - fee_pips)
    / u128::from(FEE_DENOMINATOR);
  let denominator = u128::from(reserve_in.bits) + amount_in_less_fee;
  let out = u128::from(reserve_out.bits)
    .checked_mul(amount_in_less_fee)
    .and_then(|n| n.checked_div(denominator))
    .and_then(|o| u64::try_from(o).ok())
    .ok_or(ConstantProductArithmetic)?;
  Ok(UFix64::new(out))
}

/// Marginal price of `token_out` per `token_in` after a trade, used for
/// price limit checks.
pub fn spot_price(
  reserve_in: UFix64<N9>,
  reserve_out: UFix64<N9>,
) -> Result<UFix64<N9>> {
  reserve_out
    .mul_div_floor(UFix64::<N9>::one(), reserve_in)
    .ok_or(ConstantProductArithmetic.into())
}
