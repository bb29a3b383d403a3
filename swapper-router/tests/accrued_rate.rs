mod common;

use common::{
  accrued_rate_backend, units, FixedRateBackend, RouterContext, ONE,
};
use swapper_router::prelude::*;
use test_context::{test_context, TestContext};

/// Router over a wrapper that has compounded to 1.5 PYT per xPYT.
struct AccruedContext(RouterContext<FixedRateBackend>);

impl TestContext for AccruedContext {
  fn setup() -> Self {
    AccruedContext(RouterContext::with_backend(accrued_rate_backend))
  }
}

fn exit(swap_amount_in: u64) -> ExitRoute<()> {
  ExitRoute {
    route: (),
    swap_amount_in: units(swap_amount_in),
  }
}

#[test_context(AccruedContext)]
#[test]
fn underlying_to_nyt_sells_fewer_shares(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  ctx.set_fee_bps(37);
  let tokens = ctx.claims.tokens;
  let gate = ctx.claims.gate.address();
  let locked_before = ctx.balance(tokens.underlying, gate);
  let args = ctx.claims.args(units(10_000_000_001), ctx.user, ());
  let out = ctx
    .swapper
    .swap_underlying_to_nyt(&mut ctx.ledger, ctx.user, args)
    .expect("swap");

  // 9.963000001 minted, 6.642 xPYT sold at 1.4
  assert_eq!(out, units(19_261_800_001));
  assert_eq!(ctx.balance(tokens.nyt, ctx.user), out);
  assert_eq!(
    ctx.balance(tokens.underlying, ctx.fee_recipient),
    units(37_000_000)
  );
  let locked = ctx
    .balance(tokens.underlying, gate)
    .checked_sub(&locked_before)
    .expect("locked");
  assert_eq!(locked, units(9_963_000_001));
  ctx.assert_router_empty();
}

#[test_context(AccruedContext)]
#[test]
fn underlying_to_xpyt_pays_floored_shares(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  let tokens = ctx.claims.tokens;
  let args = ctx.claims.args(units(10 * ONE), ctx.user, ());
  let out = ctx
    .swapper
    .swap_underlying_to_xpyt(&mut ctx.ledger, ctx.user, args)
    .expect("swap");

  // 6.666666666 deposited shares plus 6.4 bought
  assert_eq!(out, units(13_066_666_666));
  assert_eq!(ctx.balance(tokens.xpyt, ctx.user), out);
  assert_eq!(ctx.balance(tokens.nyt, ctx.user), UFix64::zero());
  ctx.assert_router_empty();
}

#[test_context(AccruedContext)]
#[test]
fn underlying_to_raw_pyt_redeems_bought_shares(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  ctx.set_fee_bps(37);
  let tokens = ctx.claims.tokens;
  let mut args = ctx.claims.args(units(10_000_000_001), ctx.user, ());
  args.use_pyt = true;
  let out = ctx
    .swapper
    .swap_underlying_to_xpyt(&mut ctx.ledger, ctx.user, args)
    .expect("swap");

  // 9.963000001 raw PYT plus 6.37632 xPYT redeemed at 1.5
  assert_eq!(out, units(19_527_480_001));
  assert_eq!(ctx.balance(tokens.pyt, ctx.user), out);
  assert_eq!(ctx.balance(tokens.xpyt, ctx.user), UFix64::zero());
  ctx.assert_router_empty();
}

#[test_context(AccruedContext)]
#[test]
fn nyt_exit_values_bought_shares_in_assets(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  let tokens = ctx.claims.tokens;
  let user = ctx.user;
  let entered = ctx.claims.enter(&mut ctx.ledger, user, units(10 * ONE), true);
  assert_eq!(entered.pyt_amount, units(6_666_666_666));
  ctx.set_fee_bps(37);

  let args = ctx
    .claims
    .args(units(10 * ONE), user, ())
    .with_route(exit(3_333_333_333));
  let out = ctx
    .swapper
    .swap_nyt_to_underlying(&mut ctx.ledger, user, args)
    .expect("swap");

  // 2.133333333 xPYT bought is worth 3.199999999 PYT, floored
  assert_eq!(out, units(3_199_999_999));
  assert_eq!(
    ctx.balance(tokens.underlying, user),
    units(1_003_199_999_999)
  );
  assert_eq!(ctx.balance(tokens.nyt, user), units(3_429_666_668));
  assert_eq!(
    ctx.balance(tokens.nyt, ctx.fee_recipient),
    units(37_000_000)
  );
  assert_eq!(ctx.balance(tokens.xpyt, user), entered.pyt_amount);
  ctx.assert_router_empty();
}

#[test_context(AccruedContext)]
#[test]
fn xpyt_exit_burns_with_rounded_up_shares(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  let tokens = ctx.claims.tokens;
  let user = ctx.user;
  let entered = ctx.claims.enter(&mut ctx.ledger, user, units(10 * ONE), true);
  ctx.set_fee_bps(37);

  let args = ctx
    .claims
    .args(entered.pyt_amount, user, ())
    .with_route(exit(2_222_222_223));
  let out = ctx
    .swapper
    .swap_xpyt_to_underlying(&mut ctx.ledger, user, args)
    .expect("swap");

  // 3.111111112 NYT bought, 2.074074075 shares withdrawn for it
  assert_eq!(out, units(3_111_111_112));
  assert_eq!(ctx.balance(tokens.nyt, user), units(10 * ONE));
  assert_eq!(ctx.balance(tokens.xpyt, user), units(2_345_703_702));
  assert_eq!(
    ctx.balance(tokens.xpyt, ctx.fee_recipient),
    units(24_666_666)
  );
  ctx.assert_router_empty();
}

#[test_context(AccruedContext)]
#[test]
fn raw_pyt_exit_returns_redeemed_surplus(ctx: &mut AccruedContext) {
  let ctx = &mut ctx.0;
  let tokens = ctx.claims.tokens;
  let user = ctx.user;
  ctx.claims.enter(&mut ctx.ledger, user, units(10 * ONE), false);
  ctx.set_fee_bps(37);

  let mut args = ctx
    .claims
    .args(units(10 * ONE), user, ())
    .with_route(exit(2_500_000_001));
  args.use_pyt = true;
  let out = ctx
    .swapper
    .swap_xpyt_to_underlying(&mut ctx.ledger, user, args)
    .expect("swap");

  // 9.963 PYT wraps to 6.642 shares, 1.808666665 left over after the burn
  assert_eq!(out, units(3_500_000_001));
  assert_eq!(ctx.balance(tokens.pyt, user), units(2_712_999_997));
  assert_eq!(ctx.balance(tokens.xpyt, user), UFix64::zero());
  assert_eq!(ctx.balance(tokens.nyt, user), units(10 * ONE));
  assert_eq!(
    ctx.balance(tokens.pyt, ctx.fee_recipient),
    units(37_000_000)
  );
  ctx.assert_router_empty();
}
