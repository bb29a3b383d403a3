//! Bisection search for the trade size that leaves equal value on both
//! sides of a claim pair.
//!
//! A balance of `total` sits entirely on one side. Trading `s` of it through
//! a venue keeps `total - s` on the original side and receives some amount
//! on the other. Once both are expressed in a common unit, the search looks
//! for `s` where they agree within `max_error`.

use crate::error::CoreError::{EqualizerArithmetic, EqualizerTolerance};

use anchor_lang::prelude::*;
use fix::prelude::*;

/// Search gives up after this many steps and returns its last candidate.
pub const MAX_ITERATIONS: usize = 256;

/// Value on each side of the pair after trading a candidate amount, in a
/// common unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndState {
  pub kept: UFix64<N9>,
  pub received: UFix64<N9>,
}

impl EndState {
  #[must_use]
  pub fn new(kept: UFix64<N9>, received: UFix64<N9>) -> EndState {
    EndState { kept, received }
  }
}

/// Outcome of one bisection step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
  Converged,
  /// Too much stayed on the original side, trade more.
  Raise,
  /// Too much landed on the other side, trade less.
  Lower,
}

/// Search bounds, always `lo <= candidate <= hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bisection {
  pub lo: u64,
  pub hi: u64,
  pub candidate: u64,
}

fn midpoint(a: u64, b: u64) -> u64 {
  // Both inputs are u64, so their mean always fits.
  ((u128::from(a) + u128::from(b)) / 2) as u64
}

impl Bisection {
  #[must_use]
  pub fn new(total: UFix64<N9>) -> Bisection {
    Bisection {
      lo: 0,
      hi: total.bits,
      candidate: total.bits / 2,
    }
  }

  #[must_use]
  pub fn candidate(&self) -> UFix64<N9> {
    UFix64::new(self.candidate)
  }

  #[must_use]
  pub fn width(&self) -> u64 {
    self.hi - self.lo
  }

  /// Compares an end state and narrows the bounds around the candidate.
  pub fn step(&mut self, end: EndState, max_error: UFix64<N9>) -> Step {
    let kept = u128::from(end.kept.bits);
    let received = u128::from(end.received.bits);
    let error = u128::from(max_error.bits);
    if kept > received + error {
      self.lo = self.candidate;
      self.candidate = midpoint(self.candidate, self.hi);
      Step::Raise
    } else if received > kept + error {
      self.hi = self.candidate;
      self.candidate = midpoint(self.lo, self.candidate);
      Step::Lower
    } else {
      Step::Converged
    }
  }
}

/// Trade size found by [`equalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Equalized {
  pub amount: UFix64<N9>,
  pub iterations: usize,
  pub converged: bool,
}

/// Runs the bisection over `[0, total]`, evaluating each candidate with
/// `end_state`. Hitting the iteration ceiling is not an error.
pub fn equalize<F>(
  total: UFix64<N9>,
  max_error: UFix64<N9>,
  mut end_state: F,
) -> Result<Equalized>
where
  F: FnMut(UFix64<N9>) -> Result<EndState>,
{
  if max_error < UFix64::new(1) {
    return Err(EqualizerTolerance.into());
  }
  if total == UFix64::zero() {
    return Ok(Equalized {
      amount: UFix64::zero(),
      iterations: 0,
      converged: true,
    });
  }
  let mut search = Bisection::new(total);
  for iteration in 1..=MAX_ITERATIONS {
    let candidate = search.candidate();
    let end = end_state(candidate)?;
    if search.step(end, max_error) == Step::Converged {
      tracing::debug!(
        amount = candidate.bits,
        iterations = iteration,
        "equalizer converged"
      );
      return Ok(Equalized {
        amount: candidate,
        iterations: iteration,
        converged: true,
      });
    }
  }
  tracing::warn!(
    amount = search.candidate,
    lo = search.lo,
    hi = search.hi,
    "equalizer hit iteration ceiling"
  );
  Ok(Equalized {
    amount: search.candidate(),
    iterations: MAX_ITERATIONS,
    converged: false,
  })
}

/// End state for a trade of `s` out of `total`, where `received` is what the
/// venue returns for `s` already converted to the common unit.
pub fn end_state_after(
  total: UFix64<N9>,
  s: UFix64<N9>,
  received: UFix64<N9>,
) -> Result<EndState> {
  let kept = total.checked_sub(&s).ok_or(EqualizerArithmetic)?;
  Ok(EndState::new(kept, received))
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::constant_product;
  use crate::eq_tolerance;
  use crate::util::proptest::*;
  use more_asserts::assert_le;
  use proptest::prelude::*;

  fn pool_end_state(
    reserve_in: UFix64<N9>,
    reserve_out: UFix64<N9>,
    total: UFix64<N9>,
  ) -> impl FnMut(UFix64<N9>) -> Result<EndState> {
    move |s| {
      let out = constant_product::amount_out(reserve_in, reserve_out, s, 0)?;
      end_state_after(total, s, out)
    }
  }

  proptest! {
    #[test]
    fn converges_inside_bounds(
      reserve_in in reserve_amount(),
      reserve_out in reserve_amount(),
      total in token_amount(),
    ) {
      let max_error = UFix64::new(1_000);
      let mut end = pool_end_state(reserve_in, reserve_out, total);
      let found = equalize(total, max_error, &mut end)?;
      prop_assert!(found.amount <= total);
      if found.converged {
        let state = end(found.amount)?;
        prop_assert!(eq_tolerance!(state.kept, state.received, 1_000));
      } else {
        prop_assert_eq!(found.iterations, MAX_ITERATIONS);
      }
    }

    #[test]
    fn width_never_grows(
      reserve_in in reserve_amount(),
      reserve_out in reserve_amount(),
      total in token_amount(),
    ) {
      let max_error = UFix64::new(1);
      let mut end = pool_end_state(reserve_in, reserve_out, total);
      let mut search = Bisection::new(total);
      for _ in 0..MAX_ITERATIONS {
        let width = search.width();
        let state = end(search.candidate())?;
        let step = search.step(state, max_error);
        prop_assert!(search.lo <= search.candidate);
        prop_assert!(search.candidate <= search.hi);
        prop_assert!(search.width() <= width);
        if step == Step::Converged {
          break;
        }
      }
    }
  }

  #[test]
  fn starts_at_half() {
    let search = Bisection::new(UFix64::new(11));
    assert_eq!(search.candidate, 5);
    assert_eq!((search.lo, search.hi), (0, 11));
  }

  #[test]
  fn raise_and_lower_move_bounds() {
    let mut search = Bisection::new(UFix64::new(100));
    let err = UFix64::new(1);
    let end = EndState::new(UFix64::new(50), UFix64::new(10));
    let step = search.step(end, err);
    assert_eq!(step, Step::Raise);
    assert_eq!((search.lo, search.candidate, search.hi), (50, 75, 100));
    let end = EndState::new(UFix64::new(25), UFix64::new(60));
    let step = search.step(end, err);
    assert_eq!(step, Step::Lower);
    assert_eq!((search.lo, search.candidate, search.hi), (50, 62, 75));
  }

  #[test]
  fn linear_quote_converges_exactly() -> Result<()> {
    // Venue pays 1:1, balance point is half the total.
    let total = UFix64::new(10_000_000_000);
    let found = equalize(total, UFix64::new(1), |s| {
      end_state_after(total, s, s)
    })?;
    assert!(found.converged);
    assert_eq!(found.amount, UFix64::new(5_000_000_000));
    assert_eq!(found.iterations, 1);
    Ok(())
  }

  #[test]
  fn discounted_quote_trades_more_than_half() -> Result<()> {
    // Venue pays 0.95 per unit: 10 - s = 0.95 s gives s ~ 5.128
    let total = UFix64::<N9>::new(10_000_000_000);
    let rate = UFix64::<N9>::new(950_000_000);
    let max_error = UFix64::new(10);
    let found = equalize(total, max_error, |s| {
      let received = s
        .mul_div_floor(rate, UFix64::one())
        .ok_or(EqualizerArithmetic)?;
      end_state_after(total, s, received)
    })?;
    assert!(found.converged);
    assert!(eq_tolerance!(found.amount, UFix64::<N9>::new(5_128_205_128), 20));
    Ok(())
  }

  #[test]
  fn ceiling_returns_last_candidate() -> Result<()> {
    // Venue always pays double, so even the smallest trade overshoots.
    let total = UFix64::new(1_000_000_000);
    let found = equalize(total, UFix64::new(1), |s| {
      let kept = total.checked_sub(&s).ok_or(EqualizerArithmetic)?;
      Ok(EndState::new(kept, UFix64::new(kept.bits + 2)))
    })?;
    assert!(!found.converged);
    assert_eq!(found.iterations, MAX_ITERATIONS);
    assert_le!(found.amount, total);
    Ok(())
  }

  #[test]
  fn zero_total_is_zero() -> Result<()> {
    let found = equalize(UFix64::zero(), UFix64::new(1), |_| {
      Err(EqualizerArithmetic.into())
    })?;
    assert_eq!(found.amount, UFix64::zero());
    Ok(())
  }

  #[test]
  fn zero_tolerance_rejected() {
    let out = equalize(UFix64::new(100), UFix64::zero(), |s| {
      Ok(EndState::new(s, s))
    });
    assert_eq!(out.err(), Some(EqualizerTolerance.into()));
  }
}
