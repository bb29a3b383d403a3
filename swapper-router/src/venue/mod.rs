//! Liquidity venues the router trades claims through.

pub mod curve;
pub mod uniswap_v3;

use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::ledger::Ledger;

pub use curve::{CurveBackend, CurveRoute, CryptoPool};
pub use uniswap_v3::{
  ConstantProductFactory, ConstantProductPool, SwapCallback, SwapCallbackData,
  UniswapV3Backend, UniswapV3Route,
};

/// Venue-specific half of the router: quotes and executes a trade between
/// two tokens given caller-supplied routing data.
pub trait SwapBackend {
  type Route: Clone;

  /// Output for trading `amount_in`, without changing state.
  fn quote(
    &self,
    ledger: &Ledger,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    route: &Self::Route,
  ) -> Result<UFix64<N9>>;

  /// Trades `amount_in` held by `payer` and sends the output to
  /// `recipient`.
  #[allow(clippy::too_many_arguments)]
  fn swap(
    &self,
    ledger: &mut Ledger,
    payer: Pubkey,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    recipient: Pubkey,
    route: &Self::Route,
  ) -> Result<UFix64<N9>>;
}
