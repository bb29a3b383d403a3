use anchor_lang::prelude::error_code;

#[error_code]
pub enum SwapperError {
  // `ledger`
  #[msg("Token balance too low for transfer or burn.")]
  InsufficientBalance = 8000,
  #[msg("Spender allowance too low for transfer.")]
  InsufficientAllowance,
  #[msg("Token balance or supply overflow.")]
  LedgerOverflow,
  // `swapper`
  #[msg("Caller is not the router owner.")]
  Unauthorized,
  #[msg("Router entry point called while another swap is in progress.")]
  Reentrancy,
  #[msg("Recipient must not be the default address.")]
  InvalidRecipient,
  #[msg("Swap input amount must be non-zero.")]
  ZeroAmount,
  #[msg("Swap output below requested minimum.")]
  InsufficientOutput,
  #[msg("Venue trade size exceeds input after protocol fee.")]
  SwapAmountTooLarge,
  #[msg("Input and output tokens must differ.")]
  IdenticalTokens,
  #[msg("Arithmetic error while reconciling swap amounts.")]
  RouterArithmetic,
  // `aggregator`
  #[msg("Aggregator call failed.")]
  AggregatorFailed,
  // `venue`
  #[msg("No pool registered for token pair and fee tier.")]
  PoolNotFound,
  #[msg("Swap callback invoked by an address other than the expected pool.")]
  CallbackSender,
  #[msg("Swap callback received no positive delta.")]
  CallbackDelta,
  #[msg("Swap callback data could not be decoded.")]
  CallbackData,
  #[msg("Pool input was not paid during swap callback.")]
  CallbackUnpaid,
  #[msg("Swap would move the pool price beyond its limit.")]
  PriceLimitReached,
  #[msg("Token is not one of the pool's coins.")]
  CoinNotInPool,
  #[msg("Pool output below exchange minimum.")]
  VenueSlippage,
  // `gate`
  #[msg("Vault is not registered with the gate.")]
  UnknownVault,
  #[msg("Wrapper does not wrap the vault's PYT.")]
  WrapperMismatch,
  // `wrapper`
  #[msg("Redeem or withdraw exceeds owner's shares.")]
  MaxRedeemExceeded,
}
