//! Passthrough to a generic swap aggregator for arbitrary token pairs.

use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::args::InputRequest;
use crate::error::SwapperError::{
  AggregatorFailed, IdenticalTokens, RouterArithmetic,
};
use crate::ledger::Ledger;
use crate::swapper::{check_output, Swapper};
use crate::venue::SwapBackend;

/// External aggregator executing opaque call data. Output is paid to
/// `caller`, input is pulled from `caller` through an allowance.
pub trait Aggregator {
  fn address(&self) -> Pubkey;

  fn call(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    data: &[u8],
  ) -> Result<()>;
}

#[derive(Clone, Copy)]
pub struct AggregatorArgs<'a> {
  pub aggregator: &'a dyn Aggregator,
  pub token_in: Pubkey,
  pub token_out: Pubkey,
  pub token_amount_in: UFix64<N9>,
  pub min_amount_out: UFix64<N9>,
  pub recipient: Pubkey,
  pub use_swapper_balance: bool,
  pub deadline: i64,
  pub data: &'a [u8],
}

impl AggregatorArgs<'_> {
  #[must_use]
  pub fn input(&self) -> InputRequest {
    InputRequest {
      amount: self.token_amount_in,
      recipient: self.recipient,
      use_swapper_balance: self.use_swapper_balance,
      deadline: self.deadline,
    }
  }
}

impl<B: SwapBackend> Swapper<B> {
  /// Forwards `data` to the aggregator after taking the protocol fee, then
  /// sends the measured output and any unspent input to the recipient.
  pub fn swap_with_aggregator(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: AggregatorArgs<'_>,
  ) -> Result<UFix64<N9>> {
    if args.token_in == args.token_out {
      return Err(IdenticalTokens.into());
    }
    self.run(ledger, |ledger| {
      let router = self.address();
      let amount =
        self.pull_input(ledger, caller, args.token_in, args.input())?;
      ledger.approve_max_if_needed(
        args.token_in,
        router,
        args.aggregator.address(),
        amount,
      );
      let before = ledger.balance(args.token_out, router);
      args.aggregator.call(ledger, router, args.data).map_err(|e| {
        tracing::warn!(error = %e, "aggregator call failed");
        AggregatorFailed
      })?;
      let amount_out = ledger
        .balance(args.token_out, router)
        .checked_sub(&before)
        .ok_or(RouterArithmetic)?;
      check_output(amount_out, args.min_amount_out)?;
      self.sweep(ledger, args.token_out, args.recipient)?;
      let unspent = self.sweep(ledger, args.token_in, args.recipient)?;
      tracing::info!(
        token_in = %args.token_in,
        token_out = %args.token_out,
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        unspent = unspent.bits,
        "swapped through aggregator"
      );
      Ok(amount_out)
    })
  }
}
