//! Off-chain quoting for the yield-claim swap router.
//!
//! - **`Juggler`**: equalizer entry points that pick how much of a one-sided
//!   claim balance to trade before burning the pair.
//! - **`SimulationStrategy`**: runs a router operation against a copy of the
//!   ledger and reports what it would pay.
//! - **`BurnPlanner`**: turns a burn-direction request into a ready-to-submit
//!   one, fee and equalizer included.

#![allow(clippy::missing_errors_doc)]

use anchor_lang::prelude::Pubkey;
use anyhow::{ensure, Context, Result};
use fix::prelude::*;
use swapper_core::slippage_config::SlippageConfig;

mod juggler;
mod planner;
mod simulation;

pub use juggler::Juggler;
pub use planner::{BurnPlanner, ClaimSide};
pub use simulation::SimulationStrategy;

/// Router operation a quote was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  UnderlyingToNyt,
  UnderlyingToXpyt,
  NytToUnderlying,
  XpytToUnderlying,
  NytToXpyt,
  XpytToNyt,
}

impl Operation {
  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Operation::UnderlyingToNyt => "swap_underlying_to_nyt",
      Operation::UnderlyingToXpyt => "swap_underlying_to_xpyt",
      Operation::NytToUnderlying => "swap_nyt_to_underlying",
      Operation::XpytToUnderlying => "swap_xpyt_to_underlying",
      Operation::NytToXpyt => "swap_nyt_to_xpyt",
      Operation::XpytToNyt => "swap_xpyt_to_nyt",
    }
  }
}

impl AsRef<str> for Operation {
  fn as_ref(&self) -> &str {
    self.as_str()
  }
}

impl std::fmt::Display for Operation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Simulated outcome of one router call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
  pub operation: Operation,
  pub amount_in: u64,
  pub amount_out: u64,
  pub fee_amount: u64,
  pub fee_mint: Pubkey,
}

impl Quote {
  fn slippage(&self, slippage_tolerance: UFix64<N4>) -> SlippageConfig {
    SlippageConfig::new(UFix64::<N9>::new(self.amount_out), slippage_tolerance)
  }

  /// `min_amount_out` accepting at most `slippage_tolerance` below the
  /// quoted output.
  pub fn min_amount_out(
    &self,
    slippage_tolerance: UFix64<N4>,
  ) -> Result<UFix64<N9>> {
    Ok(self.slippage(slippage_tolerance).min_amount_out()?)
  }

  /// Checks a later simulation of the same call against this quote. Fails
  /// once the fresh output drops more than `slippage_tolerance` below it.
  pub fn validate_requote(
    &self,
    fresh: &Quote,
    slippage_tolerance: UFix64<N4>,
  ) -> Result<()> {
    ensure!(
      fresh.operation == self.operation,
      "requote is for {}, not {}",
      fresh.operation,
      self.operation
    );
    self
      .slippage(slippage_tolerance)
      .validate_token_out(UFix64::<N9>::new(fresh.amount_out))
      .with_context(|| format!("requoting {}", self.operation))
  }
}
