#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::prelude::*;
use swapper_core::protocol_fee::ProtocolFeeInfo;
use swapper_router::error::SwapperError::PoolNotFound;
use swapper_router::prelude::*;

pub const NOW: i64 = 1_700_000_000;
pub const ONE: u64 = 1_000_000_000;

#[must_use]
pub fn units(bits: u64) -> UFix64<N9> {
  UFix64::new(bits)
}

pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// One vault's gate, wrapper and claim token addresses.
pub struct Claims {
  pub gate: Gate,
  pub vault: Pubkey,
  pub xpyt: Xpyt,
  pub tokens: ClaimTokens,
}

impl Claims {
  fn new() -> Claims {
    let mut gate = Gate::new(Pubkey::new_unique());
    let vault = Pubkey::new_unique();
    let underlying = Pubkey::new_unique();
    gate.add_vault(vault, underlying);
    let xpyt = Xpyt::new(Pubkey::new_unique(), gate.pyt(vault));
    let tokens = ClaimTokens {
      underlying,
      nyt: gate.nyt(vault),
      pyt: gate.pyt(vault),
      xpyt: xpyt.share_mint(),
    };
    Claims {
      gate,
      vault,
      xpyt,
      tokens,
    }
  }

  /// Request for `amount` paid to `recipient`, no minimum, one minute to
  /// live.
  pub fn args<R>(
    &self,
    amount: UFix64<N9>,
    recipient: Pubkey,
    route: R,
  ) -> SwapArgs<'_, R> {
    SwapArgs {
      gate: &self.gate,
      vault: self.vault,
      xpyt: &self.xpyt,
      token_amount_in: amount,
      min_amount_out: UFix64::zero(),
      recipient,
      use_swapper_balance: false,
      use_pyt: false,
      deadline: NOW + 60,
      route,
    }
  }

  /// Deposits `amount` underlying for `owner`, wrapped or raw.
  pub fn enter(
    &self,
    ledger: &mut Ledger,
    owner: Pubkey,
    amount: UFix64<N9>,
    wrapped: bool,
  ) -> EnterOutcome {
    ledger
      .mint_to(self.tokens.underlying, owner, amount)
      .expect("fund underlying");
    ledger.approve(
      self.tokens.underlying,
      owner,
      self.gate.address(),
      max_allowance(),
    );
    let xpyt: Option<&dyn ShareWrapper> =
      if wrapped { Some(&self.xpyt) } else { None };
    self
      .gate
      .enter_with_underlying(
        ledger, owner, owner, owner, self.vault, xpyt, amount,
      )
      .expect("enter")
  }
}

/// Venue quoting fixed rates against a market maker's inventory.
#[derive(Clone, Debug, Default)]
pub struct FixedRateBackend {
  pub market_maker: Pubkey,
  pub rates: HashMap<(Pubkey, Pubkey), UFix64<N9>>,
}

impl SwapBackend for FixedRateBackend {
  type Route = ();

  fn quote(
    &self,
    _: &Ledger,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    _: &(),
  ) -> Result<UFix64<N9>> {
    let rate = self
      .rates
      .get(&(token_in, token_out))
      .ok_or(PoolNotFound)?;
    Ok(
      amount_in
        .mul_div_floor(*rate, UFix64::one())
        .ok_or(PoolNotFound)?,
    )
  }

  fn swap(
    &self,
    ledger: &mut Ledger,
    payer: Pubkey,
    token_in: Pubkey,
    token_out: Pubkey,
    amount_in: UFix64<N9>,
    recipient: Pubkey,
    route: &(),
  ) -> Result<UFix64<N9>> {
    let amount_out =
      self.quote(ledger, token_in, token_out, amount_in, route)?;
    ledger.approve_max_if_needed(
      token_in,
      payer,
      self.market_maker,
      amount_in,
    );
    ledger.transfer_from(
      token_in,
      self.market_maker,
      payer,
      self.market_maker,
      amount_in,
    )?;
    ledger.transfer(token_out, self.market_maker, recipient, amount_out)?;
    Ok(amount_out)
  }
}

pub struct RouterContext<B> {
  pub ledger: Ledger,
  pub claims: Claims,
  pub swapper: Swapper<B>,
  pub owner: Pubkey,
  pub user: Pubkey,
  pub market_maker: Pubkey,
  pub fee_recipient: Pubkey,
}

impl<B: SwapBackend> RouterContext<B> {
  /// Fresh vault with a market maker holding 500 NYT and 500 xPYT, and a
  /// user holding 1000 underlying with the router approved for every token.
  pub fn with_backend<F>(make_backend: F) -> RouterContext<B>
  where
    F: FnOnce(&mut Ledger, &Claims, Pubkey) -> B,
  {
    init_tracing();
    let mut ledger = Ledger::new(Clock {
      unix_timestamp: NOW,
      ..Clock::default()
    });
    let claims = Claims::new();
    let market_maker = Pubkey::new_unique();
    claims.enter(&mut ledger, market_maker, units(500 * ONE), true);
    let backend = make_backend(&mut ledger, &claims, market_maker);

    let owner = Pubkey::new_unique();
    let config = SwapperConfig::new(owner, ProtocolFeeInfo::disabled())
      .expect("config");
    let swapper = Swapper::new(Pubkey::new_unique(), config, backend);

    let user = Pubkey::new_unique();
    ledger
      .mint_to(claims.tokens.underlying, user, units(1000 * ONE))
      .expect("fund user");
    let tokens = claims.tokens;
    for token in [tokens.underlying, tokens.nyt, tokens.pyt, tokens.xpyt] {
      ledger.approve(token, user, swapper.address(), max_allowance());
    }
    RouterContext {
      ledger,
      claims,
      swapper,
      owner,
      user,
      market_maker,
      fee_recipient: Pubkey::new_unique(),
    }
  }

  pub fn balance(&self, token: Pubkey, owner: Pubkey) -> UFix64<N9> {
    self.ledger.balance(token, owner)
  }

  pub fn set_fee_bps(&mut self, bps: u64) {
    let fee = ProtocolFeeInfo::new(UFix64::new(bps), self.fee_recipient)
      .expect("fee");
    self
      .swapper
      .set_protocol_fee(self.owner, fee)
      .expect("set fee");
  }

  /// The router must hold nothing between calls.
  pub fn assert_router_empty(&self) {
    let router = self.swapper.address();
    let tokens = self.claims.tokens;
    for token in [tokens.underlying, tokens.nyt, tokens.pyt, tokens.xpyt] {
      assert_eq!(
        self.ledger.balance(token, router),
        UFix64::zero(),
        "router kept {token}"
      );
    }
  }
}

/// xPYT sells for 0.95 NYT, NYT sells for 0.96 xPYT.
pub fn fixed_rate_backend(
  _: &mut Ledger,
  claims: &Claims,
  market_maker: Pubkey,
) -> FixedRateBackend {
  let tokens = claims.tokens;
  let mut rates = HashMap::new();
  rates.insert((tokens.xpyt, tokens.nyt), UFix64::new(950_000_000));
  rates.insert((tokens.nyt, tokens.xpyt), UFix64::new(960_000_000));
  FixedRateBackend {
    market_maker,
    rates,
  }
}

/// Compounds 250 PYT into the wrapper on top of the market maker's 500, so
/// one xPYT redeems for 1.5 PYT. xPYT sells for 1.4 NYT, NYT sells for 0.64
/// xPYT.
pub fn accrued_rate_backend(
  ledger: &mut Ledger,
  claims: &Claims,
  market_maker: Pubkey,
) -> FixedRateBackend {
  ledger
    .mint_to(claims.tokens.pyt, claims.xpyt.address(), units(250 * ONE))
    .expect("accrue");
  let tokens = claims.tokens;
  let mut rates = HashMap::new();
  rates.insert((tokens.xpyt, tokens.nyt), UFix64::new(1_400_000_000));
  rates.insert((tokens.nyt, tokens.xpyt), UFix64::new(640_000_000));
  FixedRateBackend {
    market_maker,
    rates,
  }
}
