//! Price oracle capability and price validation.
//!
//! The engine consumes an external oracle through [`PriceOracle`]:
//! - Update payloads are forwarded (with the required fee) before reads
//! - Prices are read per operation and never cached
//! - Every reading passes through [`OracleGuard`] before use

mod guard;

pub use guard::OracleGuard;

use async_trait::async_trait;
use oracle_amm_domain::{FeedId, PriceQuote};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque price update submitted to refresh the oracle before a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload(pub Vec<u8>);

impl UpdatePayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Errors reported by an oracle implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// No price has ever been published for the feed.
    #[error("price feed {0} not found")]
    FeedNotFound(FeedId),
    /// An update payload could not be decoded or verified.
    #[error("invalid update payload: {0}")]
    InvalidPayload(String),
    /// The fee sent with an update was below the required fee.
    #[error("insufficient update fee: required {required}, paid {paid}")]
    InsufficientFee { required: u128, paid: u128 },
    /// The oracle service could not be reached.
    #[error("oracle unreachable: {0}")]
    Unreachable(String),
}

/// External price source.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Returns the latest price for a feed.
    async fn get_price(&self, feed_id: &FeedId) -> Result<PriceQuote, OracleError>;

    /// Returns the fee required to apply `updates`.
    async fn update_fee(&self, updates: &[UpdatePayload]) -> Result<u128, OracleError>;

    /// Applies `updates`, paying `fee`.
    async fn update_price_feeds(
        &self,
        updates: &[UpdatePayload],
        fee: u128,
    ) -> Result<(), OracleError>;
}
