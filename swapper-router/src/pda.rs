use anchor_lang::prelude::Pubkey;

pub const POOL: &[u8] = b"pool";
pub const NYT: &[u8] = b"nyt";
pub const PYT: &[u8] = b"pyt";
pub const XPYT: &[u8] = b"xpyt";

macro_rules! pda {
  ($program_id:expr, $base:expr, $key:expr) => {
    Pubkey::find_program_address(&[$base.as_ref(), $key.as_ref()], &$program_id)
      .0
  };
}

/// Orders a token pair the way pools store it.
#[must_use]
pub fn sort_tokens(a: Pubkey, b: Pubkey) -> (Pubkey, Pubkey) {
  if a < b {
    (a, b)
  } else {
    (b, a)
  }
}

/// Constant-product pool for a token pair and fee tier, independent of the
/// order the pair is given in.
#[must_use]
pub fn pool(factory: Pubkey, a: Pubkey, b: Pubkey, fee: u32) -> Pubkey {
  let (token0, token1) = sort_tokens(a, b);
  Pubkey::find_program_address(
    &[POOL, token0.as_ref(), token1.as_ref(), &fee.to_le_bytes()],
    &factory,
  )
  .0
}

#[must_use]
pub fn nyt(gate: Pubkey, vault: Pubkey) -> Pubkey {
  pda!(gate, NYT, vault)
}

#[must_use]
pub fn pyt(gate: Pubkey, vault: Pubkey) -> Pubkey {
  pda!(gate, PYT, vault)
}

/// Share mint of an xPYT wrapper over `pyt`.
#[must_use]
pub fn xpyt(wrapper: Pubkey, pyt: Pubkey) -> Pubkey {
  pda!(wrapper, XPYT, pyt)
}
