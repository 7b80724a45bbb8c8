//! Domain model for the oracle-priced AMM.
//!
//! This crate holds the value types and entities shared by the engine and
//! the command line driver:
//! - Ledger identities, tokens and raw token amounts
//! - Oracle price quotes and human-readable prices
//! - Fee tiers and per-side fee accumulation
//! - Pool state and liquidity provider records
//! - Fixed-point math for oracle valuation

/// Error types.
pub mod error;
/// Enumerations shared across the crate.
pub mod enums;
/// Fee tiers and fee accumulation.
pub mod fees;
/// Fixed-point and valuation math.
pub mod math;
/// Pool metadata and mutable pool state.
pub mod pool;
/// Liquidity provider records.
pub mod position;
/// Addresses, tokens and raw amounts.
pub mod token;
/// Small value objects.
pub mod value_objects;

pub use enums::{AssetSide, Rounding, SwapDirection};
pub use error::MathError;
pub use fees::{FeeAccumulation, FeeTier};
pub use pool::{Pool, PoolSnapshot, PoolState};
pub use position::LiquidityProvider;
pub use token::{Address, FeedId, Token, TokenAmount};
pub use value_objects::price::{Price, PricePair, PriceQuote};

pub use primitive_types::U256;
