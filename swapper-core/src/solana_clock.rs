use crate::error::CoreError::PastDeadline;

use anchor_lang::prelude::*;

/// Abstracts the concept of Solana's onchain clock.
pub trait SolanaClock {
  fn slot(&self) -> u64;
  fn epoch(&self) -> u64;
  fn unix_timestamp(&self) -> i64;

  /// Fails once the clock has moved beyond `deadline`. A deadline equal to
  /// the current timestamp is still accepted.
  fn check_deadline(&self, deadline: i64) -> Result<()> {
    if self.unix_timestamp() > deadline {
      Err(PastDeadline.into())
    } else {
      Ok(())
    }
  }
}

impl SolanaClock for Clock {
  fn slot(&self) -> u64 {
    self.slot
  }

  fn epoch(&self) -> u64 {
    self.epoch
  }

  fn unix_timestamp(&self) -> i64 {
    self.unix_timestamp
  }
}
