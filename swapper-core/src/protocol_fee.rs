use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::error::CoreError::{
  FeeExtraction, InvalidProtocolFee, MissingFeeRecipient,
};

/// Combines fee multiplication for a token amount with the remaining token
/// amount by subtraction.
pub struct FeeExtract<Exp> {
  pub fees_extracted: UFix64<Exp>,
  pub amount_remaining: UFix64<Exp>,
}

impl<Exp> FeeExtract<Exp> {
  /// Fee is floored, so dust always stays with the user.
  pub fn new(
    fee: UFix64<N4>,
    amount_in: UFix64<Exp>,
  ) -> Result<FeeExtract<Exp>> {
    let fees_extracted = amount_in
      .mul_div_floor(fee, UFix64::<N4>::one())
      .ok_or(FeeExtraction)?;

    let amount_remaining = amount_in
      .checked_sub(&fees_extracted)
      .ok_or(FeeExtraction)?;

    Ok(FeeExtract {
      fees_extracted,
      amount_remaining,
    })
  }
}

/// Fee charged by the router on every swap input, in basis points
/// (`0.XXXX` or `bips x 10^-4`), and the account receiving it.
#[derive(Copy, Clone, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct ProtocolFeeInfo {
  fee: UFixValue64,
  recipient: Pubkey,
}

impl ProtocolFeeInfo {
  /// Parses and validates a fee configuration.
  pub fn new(fee: UFix64<N4>, recipient: Pubkey) -> Result<ProtocolFeeInfo> {
    let info = ProtocolFeeInfo {
      fee: fee.into(),
      recipient,
    };
    info.validate()?;
    Ok(info)
  }

  /// No fee is charged.
  #[must_use]
  pub fn disabled() -> ProtocolFeeInfo {
    ProtocolFeeInfo {
      fee: UFix64::<N4>::zero().into(),
      recipient: Pubkey::default(),
    }
  }

  pub fn fee(&self) -> Result<UFix64<N4>> {
    self.fee.try_into()
  }

  #[must_use]
  pub fn recipient(&self) -> Pubkey {
    self.recipient
  }

  pub fn is_enabled(&self) -> Result<bool> {
    Ok(self.fee()? > UFix64::zero())
  }

  /// Fee must be less than 100%, and a non-zero fee must name a recipient.
  pub fn validate(&self) -> Result<()> {
    let fee = self.fee()?;
    if fee >= UFix64::one() {
      Err(InvalidProtocolFee.into())
    } else if fee > UFix64::zero() && self.recipient == Pubkey::default() {
      Err(MissingFeeRecipient.into())
    } else {
      Ok(())
    }
  }

  /// Splits a swap input into the fee and the amount proceeding to the swap.
  pub fn apply<Exp>(&self, amount: UFix64<Exp>) -> Result<FeeExtract<Exp>> {
    FeeExtract::new(self.fee()?, amount)
  }
}

impl Default for ProtocolFeeInfo {
  fn default() -> Self {
    Self::disabled()
  }
}
