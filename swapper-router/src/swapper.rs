//! Router orchestration shared by every venue: deadline, input pull,
//! protocol fee, mint or sell leg, venue leg, burn, minimum check and
//! leftover sweep. Each public operation runs as one ledger transaction.

use std::cell::Cell;

use anchor_lang::prelude::*;
use fix::prelude::*;
use swapper_core::protocol_fee::ProtocolFeeInfo;
use swapper_core::solana_clock::SolanaClock;

use crate::args::{ClaimTokens, ExitRoute, InputRequest, SwapArgs};
use crate::error::SwapperError::{
  InsufficientOutput, InvalidRecipient, Reentrancy, RouterArithmetic,
  SwapAmountTooLarge, Unauthorized, ZeroAmount,
};
use crate::ledger::Ledger;
use crate::venue::SwapBackend;
use crate::wrapper::ShareWrapper;

/// Persisted router configuration.
#[derive(Clone, Copy, Debug, AnchorSerialize, AnchorDeserialize)]
pub struct SwapperConfig {
  pub owner: Pubkey,
  pub protocol_fee: ProtocolFeeInfo,
}

impl SwapperConfig {
  pub fn new(owner: Pubkey, protocol_fee: ProtocolFeeInfo) -> Result<Self> {
    protocol_fee.validate()?;
    Ok(SwapperConfig {
      owner,
      protocol_fee,
    })
  }
}

/// Held for the duration of a public router operation. A second operation
/// started while one is held fails with `Reentrancy`.
pub struct ReentrancyGuard<'a> {
  lock: &'a Cell<bool>,
}

impl<'a> ReentrancyGuard<'a> {
  pub fn acquire(lock: &'a Cell<bool>) -> Result<ReentrancyGuard<'a>> {
    if lock.replace(true) {
      Err(Reentrancy.into())
    } else {
      Ok(ReentrancyGuard { lock })
    }
  }
}

impl Drop for ReentrancyGuard<'_> {
  fn drop(&mut self) {
    self.lock.set(false);
  }
}

fn lesser(a: UFix64<N9>, b: UFix64<N9>) -> UFix64<N9> {
  if a < b {
    a
  } else {
    b
  }
}

pub(crate) fn check_output(
  amount_out: UFix64<N9>,
  min_amount_out: UFix64<N9>,
) -> Result<()> {
  if amount_out < min_amount_out {
    Err(InsufficientOutput.into())
  } else {
    Ok(())
  }
}

pub struct Swapper<B> {
  address: Pubkey,
  config: SwapperConfig,
  backend: B,
  lock: Cell<bool>,
}

impl<B: SwapBackend> Swapper<B> {
  #[must_use]
  pub fn new(address: Pubkey, config: SwapperConfig, backend: B) -> Self {
    Swapper {
      address,
      config,
      backend,
      lock: Cell::new(false),
    }
  }

  #[must_use]
  pub fn address(&self) -> Pubkey {
    self.address
  }

  #[must_use]
  pub fn config(&self) -> &SwapperConfig {
    &self.config
  }

  #[must_use]
  pub fn protocol_fee(&self) -> ProtocolFeeInfo {
    self.config.protocol_fee
  }

  #[must_use]
  pub fn backend(&self) -> &B {
    &self.backend
  }

  /// Owner-only fee update. A non-zero fee must name a recipient.
  pub fn set_protocol_fee(
    &mut self,
    caller: Pubkey,
    protocol_fee: ProtocolFeeInfo,
  ) -> Result<()> {
    if caller != self.config.owner {
      return Err(Unauthorized.into());
    }
    protocol_fee.validate()?;
    self.config.protocol_fee = protocol_fee;
    tracing::info!(
      fee = protocol_fee.fee()?.bits,
      recipient = %protocol_fee.recipient(),
      "protocol fee updated"
    );
    Ok(())
  }

  /// Marks the router busy until the returned guard drops.
  pub fn enter(&self) -> Result<ReentrancyGuard<'_>> {
    ReentrancyGuard::acquire(&self.lock)
  }

  pub(crate) fn run<T, F>(&self, ledger: &mut Ledger, f: F) -> Result<T>
  where
    F: FnOnce(&mut Ledger) -> Result<T>,
  {
    let _guard = self.enter()?;
    ledger.transact(f)
  }

  /// Checks the request, takes `token` from the caller unless the router
  /// already holds it, and pays the protocol fee out of it. Returns the
  /// amount left for the swap.
  pub(crate) fn pull_input(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    token: Pubkey,
    input: InputRequest,
  ) -> Result<UFix64<N9>> {
    ledger.clock().check_deadline(input.deadline)?;
    if input.recipient == Pubkey::default() {
      return Err(InvalidRecipient.into());
    }
    if input.amount == UFix64::zero() {
      return Err(ZeroAmount.into());
    }
    if !input.use_swapper_balance {
      ledger.transfer_from(
        token,
        self.address,
        caller,
        self.address,
        input.amount,
      )?;
    }
    let fee = self.config.protocol_fee.apply(input.amount)?;
    if fee.fees_extracted > UFix64::zero() {
      ledger.transfer(
        token,
        self.address,
        self.config.protocol_fee.recipient(),
        fee.fees_extracted,
      )?;
    }
    tracing::debug!(
      token = %token,
      amount_in = input.amount.bits,
      fee = fee.fees_extracted.bits,
      "swap input received"
    );
    Ok(fee.amount_remaining)
  }

  /// Venue leg, skipped for a zero amount.
  pub(crate) fn sell(
    &self,
    ledger: &mut Ledger,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    recipient: Pubkey,
    route: &B::Route,
  ) -> Result<UFix64<N9>> {
    if amount_in == UFix64::zero() {
      return Ok(UFix64::zero());
    }
    let amount_out = self.backend.swap(
      ledger,
      self.address,
      token_in,
      token_out,
      amount_in,
      recipient,
      route,
    )?;
    tracing::debug!(
      token_in = %token_in,
      token_out = %token_out,
      amount_in = amount_in.bits,
      amount_out = amount_out.bits,
      "venue leg"
    );
    Ok(amount_out)
  }

  /// Burns `amount` of NYT and its xPYT counterpart to underlying for
  /// `args.recipient`.
  fn burn<R>(
    &self,
    ledger: &mut Ledger,
    args: &SwapArgs<'_, R>,
    tokens: &ClaimTokens,
    amount: UFix64<N9>,
  ) -> Result<UFix64<N9>> {
    if amount == UFix64::zero() {
      return Ok(UFix64::zero());
    }
    let shares = args.xpyt.preview_withdraw(ledger, amount)?;
    ledger.approve_max_if_needed(
      tokens.xpyt,
      self.address,
      args.gate.address(),
      shares,
    );
    let amount_out = args.gate.exit_to_underlying(
      ledger,
      self.address,
      args.recipient,
      args.vault,
      Some(args.xpyt),
      amount,
    )?;
    tracing::debug!(amount = amount.bits, "claim pair burned");
    Ok(amount_out)
  }

  /// Sends the router's whole balance of `token` to `recipient`.
  pub(crate) fn sweep(
    &self,
    ledger: &mut Ledger,
    token: Pubkey,
    recipient: Pubkey,
  ) -> Result<UFix64<N9>> {
    let balance = ledger.balance(token, self.address);
    if balance > UFix64::zero() {
      ledger.transfer(token, self.address, recipient, balance)?;
      tracing::debug!(token = %token, amount = balance.bits, "swept");
    }
    Ok(balance)
  }

  /// Sweeps all xPYT the router holds, unwrapped to PYT when `use_pyt`.
  fn sweep_xpyt(
    &self,
    ledger: &mut Ledger,
    xpyt: &dyn ShareWrapper,
    use_pyt: bool,
    recipient: Pubkey,
  ) -> Result<UFix64<N9>> {
    if use_pyt {
      let shares = ledger.balance(xpyt.share_mint(), self.address);
      if shares == UFix64::zero() {
        return Ok(shares);
      }
      xpyt.redeem(ledger, self.address, shares, recipient, self.address)
    } else {
      self.sweep(ledger, xpyt.share_mint(), recipient)
    }
  }

  /// Pulls xPYT input, or PYT wrapped on arrival when `use_pyt`. Returns
  /// post-fee xPYT shares held by the router.
  fn pull_xpyt<R>(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    tokens: &ClaimTokens,
    args: &SwapArgs<'_, R>,
  ) -> Result<UFix64<N9>> {
    if args.use_pyt {
      let assets =
        self.pull_input(ledger, caller, tokens.pyt, args.input())?;
      ledger.approve_max_if_needed(
        tokens.pyt,
        self.address,
        args.xpyt.address(),
        assets,
      );
      args.xpyt.deposit(ledger, self.address, assets, self.address)
    } else {
      self.pull_input(ledger, caller, tokens.xpyt, args.input())
    }
  }

  /// Mints NYT and xPYT from underlying and sells the xPYT for more NYT.
  pub fn swap_underlying_to_nyt(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let amount =
        self.pull_input(ledger, caller, tokens.underlying, args.input())?;
      ledger.approve_max_if_needed(
        tokens.underlying,
        self.address,
        args.gate.address(),
        amount,
      );
      let minted = args.gate.enter_with_underlying(
        ledger,
        self.address,
        args.recipient,
        self.address,
        args.vault,
        Some(args.xpyt),
        amount,
      )?;
      let swapped = self.sell(
        ledger,
        tokens.xpyt,
        tokens.nyt,
        minted.pyt_amount,
        args.recipient,
        &args.route,
      )?;
      let amount_out = minted
        .nyt_amount
        .checked_add(&swapped)
        .ok_or(RouterArithmetic)?;
      check_output(amount_out, args.min_amount_out)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        "swapped underlying to NYT"
      );
      Ok(amount_out)
    })
  }

  /// Mints NYT and xPYT (or PYT) from underlying and sells the NYT for more
  /// of the claim side.
  pub fn swap_underlying_to_xpyt(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let amount =
        self.pull_input(ledger, caller, tokens.underlying, args.input())?;
      ledger.approve_max_if_needed(
        tokens.underlying,
        self.address,
        args.gate.address(),
        amount,
      );
      let wrapper = (!args.use_pyt).then_some(args.xpyt);
      let minted = args.gate.enter_with_underlying(
        ledger,
        self.address,
        self.address,
        args.recipient,
        args.vault,
        wrapper,
        amount,
      )?;
      let venue_recipient = if args.use_pyt {
        self.address
      } else {
        args.recipient
      };
      let mut swapped = self.sell(
        ledger,
        tokens.nyt,
        tokens.xpyt,
        minted.nyt_amount,
        venue_recipient,
        &args.route,
      )?;
      if args.use_pyt {
        swapped =
          self.sweep_xpyt(ledger, args.xpyt, true, args.recipient)?;
      }
      let amount_out = minted
        .pyt_amount
        .checked_add(&swapped)
        .ok_or(RouterArithmetic)?;
      check_output(amount_out, args.min_amount_out)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        use_pyt = args.use_pyt,
        "swapped underlying to xPYT"
      );
      Ok(amount_out)
    })
  }

  /// Sells `swap_amount_in` of the post-fee NYT for xPYT, burns the lesser
  /// of the remaining NYT and the xPYT's asset value, and sweeps the
  /// surplus side to the recipient.
  pub fn swap_nyt_to_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, ExitRoute<B::Route>>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let amount = self.pull_input(ledger, caller, tokens.nyt, args.input())?;
      let swap_amount_in = args.route.swap_amount_in;
      let nyt_left = amount
        .checked_sub(&swap_amount_in)
        .ok_or(SwapAmountTooLarge)?;
      let xpyt_out = self.sell(
        ledger,
        tokens.nyt,
        tokens.xpyt,
        swap_amount_in,
        self.address,
        &args.route.route,
      )?;
      let xpyt_value = args.xpyt.convert_to_assets(ledger, xpyt_out)?;
      let burn_amount = lesser(nyt_left, xpyt_value);
      let amount_out = self.burn(ledger, &args, &tokens, burn_amount)?;
      check_output(amount_out, args.min_amount_out)?;
      let nyt_swept = self.sweep(ledger, tokens.nyt, args.recipient)?;
      let xpyt_swept =
        self.sweep_xpyt(ledger, args.xpyt, args.use_pyt, args.recipient)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        nyt_swept = nyt_swept.bits,
        xpyt_swept = xpyt_swept.bits,
        "swapped NYT to underlying"
      );
      Ok(amount_out)
    })
  }

  /// Sells `swap_amount_in` of the post-fee xPYT for NYT, burns the lesser
  /// of the NYT received and the remaining xPYT's redeemable value, and
  /// sweeps the surplus side to the recipient.
  pub fn swap_xpyt_to_underlying(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, ExitRoute<B::Route>>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let shares = self.pull_xpyt(ledger, caller, &tokens, &args)?;
      let swap_amount_in = args.route.swap_amount_in;
      let shares_left = shares
        .checked_sub(&swap_amount_in)
        .ok_or(SwapAmountTooLarge)?;
      let nyt_out = self.sell(
        ledger,
        tokens.xpyt,
        tokens.nyt,
        swap_amount_in,
        self.address,
        &args.route.route,
      )?;
      let xpyt_value = args.xpyt.preview_redeem(ledger, shares_left)?;
      let burn_amount = lesser(nyt_out, xpyt_value);
      let amount_out = self.burn(ledger, &args, &tokens, burn_amount)?;
      check_output(amount_out, args.min_amount_out)?;
      let nyt_swept = self.sweep(ledger, tokens.nyt, args.recipient)?;
      let xpyt_swept =
        self.sweep_xpyt(ledger, args.xpyt, args.use_pyt, args.recipient)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        nyt_swept = nyt_swept.bits,
        xpyt_swept = xpyt_swept.bits,
        "swapped xPYT to underlying"
      );
      Ok(amount_out)
    })
  }

  /// Sells NYT for xPYT, unwrapped to PYT when `use_pyt`.
  pub fn swap_nyt_to_xpyt(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let amount = self.pull_input(ledger, caller, tokens.nyt, args.input())?;
      let venue_recipient = if args.use_pyt {
        self.address
      } else {
        args.recipient
      };
      let mut amount_out = self.sell(
        ledger,
        tokens.nyt,
        tokens.xpyt,
        amount,
        venue_recipient,
        &args.route,
      )?;
      if args.use_pyt {
        amount_out =
          self.sweep_xpyt(ledger, args.xpyt, true, args.recipient)?;
      }
      check_output(amount_out, args.min_amount_out)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        "swapped NYT to xPYT"
      );
      Ok(amount_out)
    })
  }

  /// Sells xPYT (or PYT, wrapped first) for NYT.
  pub fn swap_xpyt_to_nyt(
    &self,
    ledger: &mut Ledger,
    caller: Pubkey,
    args: SwapArgs<'_, B::Route>,
  ) -> Result<UFix64<N9>> {
    self.run(ledger, |ledger| {
      let tokens = ClaimTokens::resolve(&args)?;
      let shares = self.pull_xpyt(ledger, caller, &tokens, &args)?;
      let amount_out = self.sell(
        ledger,
        tokens.xpyt,
        tokens.nyt,
        shares,
        args.recipient,
        &args.route,
      )?;
      check_output(amount_out, args.min_amount_out)?;
      tracing::info!(
        amount_in = args.token_amount_in.bits,
        amount_out = amount_out.bits,
        "swapped xPYT to NYT"
      );
      Ok(amount_out)
    })
  }
}
