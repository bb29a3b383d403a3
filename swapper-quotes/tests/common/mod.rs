#![allow(dead_code)]

use anchor_lang::prelude::*;
use swapper_core::protocol_fee::ProtocolFeeInfo;
use swapper_router::prelude::*;

pub const NOW: i64 = 1_700_000_000;
pub const ONE: u64 = 1_000_000_000;
pub const FEE_TIER: u32 = 3000;

/// Router over a single NYT/xPYT constant-product pool holding 400 of each,
/// and a user holding 1000 underlying plus 20 NYT and 20 xPYT.
pub struct QuoteContext {
  pub ledger: Ledger,
  pub market: Market,
}

/// Everything but the ledger, so requests can borrow it while the ledger is
/// borrowed mutably.
pub struct Market {
  pub gate: Gate,
  pub vault: Pubkey,
  pub xpyt: Xpyt,
  pub tokens: ClaimTokens,
  pub swapper: Swapper<UniswapV3Backend>,
  pub owner: Pubkey,
  pub user: Pubkey,
  pub route: UniswapV3Route,
}

fn enter(
  ledger: &mut Ledger,
  gate: &Gate,
  vault: Pubkey,
  xpyt: &Xpyt,
  owner: Pubkey,
  amount: UFix64<N9>,
) {
  let underlying = gate.underlying(vault).expect("vault");
  ledger
    .mint_to(underlying, owner, amount)
    .expect("fund underlying");
  ledger.approve(underlying, owner, gate.address(), max_allowance());
  gate
    .enter_with_underlying(
      ledger,
      owner,
      owner,
      owner,
      vault,
      Some(xpyt),
      amount,
    )
    .expect("enter");
}

impl QuoteContext {
  pub fn new() -> QuoteContext {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();

    let mut ledger = Ledger::new(Clock {
      unix_timestamp: NOW,
      ..Clock::default()
    });
    let mut gate = Gate::new(Pubkey::new_unique());
    let vault = Pubkey::new_unique();
    gate.add_vault(vault, Pubkey::new_unique());
    let xpyt = Xpyt::new(Pubkey::new_unique(), gate.pyt(vault));
    let tokens = ClaimTokens {
      underlying: gate.underlying(vault).expect("vault"),
      nyt: gate.nyt(vault),
      pyt: gate.pyt(vault),
      xpyt: xpyt.share_mint(),
    };

    let mut factory = ConstantProductFactory::new(Pubkey::new_unique());
    let pool = factory
      .create_pool(tokens.nyt, tokens.xpyt, FEE_TIER)
      .expect("pool");
    enter(&mut ledger, &gate, vault, &xpyt, pool, UFix64::new(400 * ONE));

    let owner = Pubkey::new_unique();
    let config = SwapperConfig::new(owner, ProtocolFeeInfo::disabled())
      .expect("config");
    let swapper = Swapper::new(
      Pubkey::new_unique(),
      config,
      UniswapV3Backend::new(factory),
    );

    let user = Pubkey::new_unique();
    enter(&mut ledger, &gate, vault, &xpyt, user, UFix64::new(20 * ONE));
    ledger
      .mint_to(tokens.underlying, user, UFix64::new(1000 * ONE))
      .expect("fund user");
    for token in [tokens.underlying, tokens.nyt, tokens.pyt, tokens.xpyt] {
      ledger.approve(token, user, swapper.address(), max_allowance());
    }

    QuoteContext {
      ledger,
      market: Market {
        gate,
        vault,
        xpyt,
        tokens,
        swapper,
        owner,
        user,
        route: UniswapV3Route { fee: FEE_TIER },
      },
    }
  }

  pub fn balance(&self, token: Pubkey) -> UFix64<N9> {
    self.ledger.balance(token, self.market.user)
  }

  /// Compounds `pyt` into the wrapper without minting shares.
  pub fn accrue(&mut self, pyt: UFix64<N9>) {
    let wrapper = self.market.xpyt.address();
    self
      .ledger
      .mint_to(self.market.tokens.pyt, wrapper, pyt)
      .expect("accrue");
  }
}

impl Market {
  pub fn args(&self, amount: UFix64<N9>) -> SwapArgs<'_, UniswapV3Route> {
    SwapArgs {
      gate: &self.gate,
      vault: self.vault,
      xpyt: &self.xpyt,
      token_amount_in: amount,
      min_amount_out: UFix64::zero(),
      recipient: self.user,
      use_swapper_balance: false,
      use_pyt: false,
      deadline: NOW + 60,
      route: self.route,
    }
  }

  pub fn set_fee_bps(&mut self, bps: u64) {
    let fee = ProtocolFeeInfo::new(UFix64::new(bps), Pubkey::new_unique())
      .expect("fee");
    self
      .swapper
      .set_protocol_fee(self.owner, fee)
      .expect("set fee");
  }
}
