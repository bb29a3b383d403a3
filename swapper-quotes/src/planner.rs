use anyhow::{ensure, Result};
use fix::prelude::*;
use swapper_core::equalizer::Equalized;
use swapper_router::prelude::{
  ClaimTokens, ExitRoute, Ledger, SwapArgs, SwapBackend, Swapper,
};

use crate::juggler::Juggler;

/// Which claim a burn-direction request starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSide {
  Nyt,
  /// xPYT shares, or raw PYT when the request sets `use_pyt`.
  Xpyt,
}

/// Plans burn-direction router calls against the router's current fee and
/// the venue's current state.
pub struct BurnPlanner<'a, B: SwapBackend> {
  swapper: &'a Swapper<B>,
  max_error: UFix64<N9>,
}

impl<'a, B: SwapBackend> BurnPlanner<'a, B> {
  #[must_use]
  pub fn new(swapper: &'a Swapper<B>, max_error: UFix64<N9>) -> Self {
    BurnPlanner { swapper, max_error }
  }

  /// Post-fee balance the router will hold on the claim side, in the unit
  /// the venue trades.
  fn tradable(
    &self,
    ledger: &Ledger,
    side: ClaimSide,
    args: &SwapArgs<'_, B::Route>,
  ) -> Result<UFix64<N9>> {
    let after_fee = self
      .swapper
      .protocol_fee()
      .apply(args.token_amount_in)?
      .amount_remaining;
    if side == ClaimSide::Xpyt && args.use_pyt {
      Ok(args.xpyt.preview_deposit(ledger, after_fee)?)
    } else {
      Ok(after_fee)
    }
  }

  /// Trade size for `args`, equalized on the current venue.
  pub fn equalize(
    &self,
    ledger: &Ledger,
    side: ClaimSide,
    args: &SwapArgs<'_, B::Route>,
  ) -> Result<Equalized> {
    ensure!(
      !(side == ClaimSide::Nyt && args.use_pyt),
      "raw PYT only applies to the xPYT side"
    );
    let tokens = ClaimTokens::resolve(args)?;
    let total = self.tradable(ledger, side, args)?;
    let juggler = Juggler::new(
      self.swapper.backend(),
      args.xpyt,
      tokens.nyt,
      self.max_error,
    );
    let found = match side {
      ClaimSide::Nyt => juggler.nyt_input(ledger, &args.route, total)?,
      ClaimSide::Xpyt => juggler.xpyt_input(ledger, &args.route, total)?,
    };
    if !found.converged {
      tracing::warn!(
        side = ?side,
        amount = found.amount.bits,
        "burn plan did not converge, using last candidate"
      );
    }
    Ok(found)
  }

  /// Same request with its exit route filled in.
  pub fn plan<'b>(
    &self,
    ledger: &Ledger,
    side: ClaimSide,
    args: SwapArgs<'b, B::Route>,
  ) -> Result<SwapArgs<'b, ExitRoute<B::Route>>> {
    let found = self.equalize(ledger, side, &args)?;
    let route = args.route.clone();
    tracing::debug!(
      side = ?side,
      amount_in = args.token_amount_in.bits,
      swap_amount_in = found.amount.bits,
      iterations = found.iterations,
      "burn planned"
    );
    Ok(args.with_route(ExitRoute {
      route,
      swap_amount_in: found.amount,
    }))
  }
}
