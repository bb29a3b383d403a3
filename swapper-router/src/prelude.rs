pub use anchor_lang::prelude::Pubkey;
pub use fix::prelude::*;

pub use crate::aggregator::{Aggregator, AggregatorArgs};
pub use crate::args::{ClaimTokens, ExitRoute, InputRequest, SwapArgs};
pub use crate::error::SwapperError;
pub use crate::gate::{EnterOutcome, Gate, IssuanceGateway};
pub use crate::ledger::{max_allowance, Ledger};
pub use crate::swapper::{ReentrancyGuard, Swapper, SwapperConfig};
pub use crate::venue::{
  ConstantProductFactory, CryptoPool, CurveBackend, CurveRoute, SwapBackend,
  UniswapV3Backend, UniswapV3Route,
};
pub use crate::wrapper::{ShareWrapper, Xpyt};
