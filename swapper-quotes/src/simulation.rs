//! Quote strategy running router operations against a copy of the ledger.

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use fix::prelude::*;
use swapper_router::prelude::{
  ClaimTokens, ExitRoute, Ledger, SwapArgs, SwapBackend, Swapper,
};

use crate::{Operation, Quote};

/// Runs operations on a clone of `ledger`, so quoting never moves funds.
/// A quote exists only if the call would succeed, balances and allowances
/// included.
pub struct SimulationStrategy<'a, B: SwapBackend> {
  swapper: &'a Swapper<B>,
  ledger: &'a Ledger,
}

impl<'a, B: SwapBackend> SimulationStrategy<'a, B> {
  #[must_use]
  pub fn new(swapper: &'a Swapper<B>, ledger: &'a Ledger) -> Self {
    SimulationStrategy { swapper, ledger }
  }

  fn simulate<F>(
    &self,
    operation: Operation,
    amount_in: UFix64<N9>,
    fee_mint: Pubkey,
    run: F,
  ) -> Result<Quote>
  where
    F: FnOnce(&Swapper<B>, &mut Ledger) -> anchor_lang::Result<UFix64<N9>>,
  {
    let mut scratch = self.ledger.clone();
    let amount_out = run(self.swapper, &mut scratch)
      .with_context(|| format!("simulating {operation}"))?;
    let fee = self.swapper.protocol_fee().apply(amount_in)?;
    tracing::debug!(
      operation = %operation,
      amount_in = amount_in.bits,
      amount_out = amount_out.bits,
      fee = fee.fees_extracted.bits,
      "simulated"
    );
    Ok(Quote {
      operation,
      amount_in: amount_in.bits,
      amount_out: amount_out.bits,
      fee_amount: fee.fees_extracted.bits,
      fee_mint,
    })
  }

  pub fn underlying_to_nyt(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    self.simulate(
      Operation::UnderlyingToNyt,
      args.token_amount_in,
      tokens.underlying,
      |swapper, ledger| swapper.swap_underlying_to_nyt(ledger, caller, args),
    )
  }

  pub fn underlying_to_xpyt(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    self.simulate(
      Operation::UnderlyingToXpyt,
      args.token_amount_in,
      tokens.underlying,
      |swapper, ledger| swapper.swap_underlying_to_xpyt(ledger, caller, args),
    )
  }

  pub fn nyt_to_underlying(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, ExitRoute<B::Route>>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    self.simulate(
      Operation::NytToUnderlying,
      args.token_amount_in,
      tokens.nyt,
      |swapper, ledger| swapper.swap_nyt_to_underlying(ledger, caller, args),
    )
  }

  pub fn xpyt_to_underlying(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, ExitRoute<B::Route>>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    let fee_mint = if args.use_pyt { tokens.pyt } else { tokens.xpyt };
    self.simulate(
      Operation::XpytToUnderlying,
      args.token_amount_in,
      fee_mint,
      |swapper, ledger| swapper.swap_xpyt_to_underlying(ledger, caller, args),
    )
  }

  pub fn nyt_to_xpyt(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    self.simulate(
      Operation::NytToXpyt,
      args.token_amount_in,
      tokens.nyt,
      |swapper, ledger| swapper.swap_nyt_to_xpyt(ledger, caller, args),
    )
  }

  pub fn xpyt_to_nyt(
    &self,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<Quote> {
    let tokens = ClaimTokens::resolve(&args)?;
    let fee_mint = if args.use_pyt { tokens.pyt } else { tokens.xpyt };
    self.simulate(
      Operation::XpytToNyt,
      args.token_amount_in,
      fee_mint,
      |swapper, ledger| swapper.swap_xpyt_to_nyt(ledger, caller, args),
    )
  }
}
