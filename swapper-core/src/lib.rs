#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]

pub mod constant_product;
pub mod equalizer;
pub mod error;
pub mod protocol_fee;
pub mod share_math;
pub mod slippage_config;
pub mod solana_clock;
pub mod stable_swap;
