use anchor_lang::prelude::*;
use fix::prelude::*;

use crate::gate::IssuanceGateway;
use crate::wrapper::ShareWrapper;

/// Venue-agnostic parameters shared by every router operation, with the
/// venue's routing data in `route`.
#[derive(Clone, Copy)]
pub struct SwapArgs<'a, R> {
  pub gate: &'a dyn IssuanceGateway,
  pub vault: Pubkey,
  pub xpyt: &'a dyn ShareWrapper,
  pub token_amount_in: UFix64<N9>,
  pub min_amount_out: UFix64<N9>,
  pub recipient: Pubkey,
  /// Input is already held by the router instead of pulled from the caller.
  pub use_swapper_balance: bool,
  /// Claim side is raw PYT rather than xPYT shares.
  pub use_pyt: bool,
  pub deadline: i64,
  pub route: R,
}

impl<'a, R> SwapArgs<'a, R> {
  #[must_use]
  pub fn input(&self) -> InputRequest {
    InputRequest {
      amount: self.token_amount_in,
      recipient: self.recipient,
      use_swapper_balance: self.use_swapper_balance,
      deadline: self.deadline,
    }
  }

  /// Same request with different routing data.
  pub fn with_route<S>(self, route: S) -> SwapArgs<'a, S> {
    SwapArgs {
      gate: self.gate,
      vault: self.vault,
      xpyt: self.xpyt,
      token_amount_in: self.token_amount_in,
      min_amount_out: self.min_amount_out,
      recipient: self.recipient,
      use_swapper_balance: self.use_swapper_balance,
      use_pyt: self.use_pyt,
      deadline: self.deadline,
      route,
    }
  }
}

/// How the router takes in a swap's input token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRequest {
  pub amount: UFix64<N9>,
  pub recipient: Pubkey,
  pub use_swapper_balance: bool,
  pub deadline: i64,
}

/// Routing data for the burn direction: how much of the post-fee input to
/// sell through the venue before burning. Usually computed off-chain by the
/// equalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitRoute<R> {
  pub route: R,
  pub swap_amount_in: UFix64<N9>,
}

/// Token addresses of one vault's claim pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimTokens {
  pub underlying: Pubkey,
  pub nyt: Pubkey,
  pub pyt: Pubkey,
  pub xpyt: Pubkey,
}

impl ClaimTokens {
  pub fn resolve<R>(args: &SwapArgs<'_, R>) -> Result<ClaimTokens> {
    Ok(ClaimTokens {
      underlying: args.gate.underlying(args.vault)?,
      nyt: args.gate.nyt(args.vault),
      pyt: args.gate.pyt(args.vault),
      xpyt: args.xpyt.share_mint(),
    })
  }
}
