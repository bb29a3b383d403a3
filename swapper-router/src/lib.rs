//! Swap router between an underlying deposit and its yield claims.
//!
//! Every operation composes a mint or burn through the issuance gate with a
//! trade through a liquidity venue, and leaves the router holding nothing
//! once it returns. Venues plug in through [`venue::SwapBackend`].

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]

pub mod aggregator;
pub mod args;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod pda;
pub mod prelude;
pub mod swapper;
pub mod venue;
pub mod wrapper;
