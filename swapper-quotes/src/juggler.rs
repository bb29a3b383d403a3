//! Directional equalizer entry points over a live venue quote.

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use fix::prelude::*;
use swapper_core::equalizer::{
  end_state_after, equalize, EndState, Equalized,
};
use swapper_core::error::CoreError::EqualizerArithmetic;
use swapper_router::prelude::{Ledger, ShareWrapper, SwapBackend};

/// Finds the venue trade that leaves a one-sided claim balance split into
/// an NYT amount and an xPYT amount of equal underlying value.
pub struct Juggler<'a, B: SwapBackend> {
  backend: &'a B,
  xpyt: &'a dyn ShareWrapper,
  nyt: Pubkey,
  max_error: UFix64<N9>,
}

impl<'a, B: SwapBackend> Juggler<'a, B> {
  #[must_use]
  pub fn new(
    backend: &'a B,
    xpyt: &'a dyn ShareWrapper,
    nyt: Pubkey,
    max_error: UFix64<N9>,
  ) -> Self {
    Juggler {
      backend,
      xpyt,
      nyt,
      max_error,
    }
  }

  /// NYT input: sells `s` NYT for xPYT. Kept is `total - s` NYT, received
  /// is the xPYT output's asset value.
  pub fn nyt_input(
    &self,
    ledger: &Ledger,
    route: &B::Route,
    total: UFix64<N9>,
  ) -> Result<Equalized> {
    let xpyt_mint = self.xpyt.share_mint();
    equalize(total, self.max_error, |s| {
      let shares = self.backend.quote(ledger, self.nyt, xpyt_mint, s, route)?;
      let received = self.xpyt.convert_to_assets(ledger, shares)?;
      end_state_after(total, s, received)
    })
    .context("equalizing NYT input")
  }

  /// xPYT input: sells `s` xPYT for NYT. Kept is the redeemable value of
  /// the remaining `total - s` shares, received is the NYT output.
  pub fn xpyt_input(
    &self,
    ledger: &Ledger,
    route: &B::Route,
    total: UFix64<N9>,
  ) -> Result<Equalized> {
    let xpyt_mint = self.xpyt.share_mint();
    equalize(total, self.max_error, |s| {
      let remaining = total.checked_sub(&s).ok_or(EqualizerArithmetic)?;
      let kept = self.xpyt.preview_redeem(ledger, remaining)?;
      let received =
        self.backend.quote(ledger, xpyt_mint, self.nyt, s, route)?;
      Ok(EndState::new(kept, received))
    })
    .context("equalizing xPYT input")
  }
}
