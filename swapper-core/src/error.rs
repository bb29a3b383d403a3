use anchor_lang::prelude::error_code;

#[error_code]
pub enum CoreError {
  // `protocol_fee`
  #[msg("Protocol fee must be below 100%.")]
  InvalidProtocolFee = 7000,
  #[msg("Non-zero protocol fee requires a fee recipient.")]
  MissingFeeRecipient,
  #[msg("Arithmetic error while extracting protocol fee.")]
  FeeExtraction,
  // `slippage_config`
  #[msg("Over/underflow while computing acceptable token amount.")]
  SlippageArithmetic,
  #[msg("Token output amount exceeds provided slippage configuration.")]
  SlippageExceeded,
  // `share_math`
  #[msg("Arithmetic error in conversion from assets to shares.")]
  AssetsToShares,
  #[msg("Arithmetic error in conversion from shares to assets.")]
  SharesToAssets,
  // `constant_product`
  #[msg("Constant product pool has no liquidity on one side.")]
  ConstantProductLiquidity,
  #[msg("Fee tier must be below 1_000_000 pips.")]
  ConstantProductFeeTier,
  #[msg("Arithmetic error while computing constant product output.")]
  ConstantProductArithmetic,
  // `stable_swap`
  #[msg("Stableswap coin index out of range or identical.")]
  StableSwapIndex,
  #[msg("Stableswap pool has no liquidity on one side.")]
  StableSwapLiquidity,
  #[msg("Stableswap invariant did not converge.")]
  StableSwapConvergence,
  #[msg("Arithmetic error in stableswap invariant.")]
  StableSwapArithmetic,
  // `equalizer`
  #[msg("Equalizer tolerance must be at least one unit.")]
  EqualizerTolerance,
  #[msg("Arithmetic error while computing equalizer end state.")]
  EqualizerArithmetic,
  // `solana_clock`
  #[msg("Transaction deadline has passed.")]
  PastDeadline,
}
