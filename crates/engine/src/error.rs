//! Error types for pool operations.

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::oracle::OracleError;
use oracle_amm_domain::{AssetSide, MathError, TokenAmount, U256};
use thiserror::Error;

/// Error returned by every pool operation. Any error aborts the whole
/// operation with no state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Zero or otherwise unusable input amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Redemption exceeds the provider's share balance.
    #[error("insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: U256, available: U256 },
    /// Payout would overdraw a reserve.
    #[error("insufficient {side} reserve: requested {requested}, available {available}")]
    InsufficientReserves {
        side: AssetSide,
        requested: TokenAmount,
        available: TokenAmount,
    },
    /// Price feed stale, invalid, or the update payload was rejected.
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// An asset ledger call did not succeed.
    #[error("transfer failed: {0}")]
    TransferFailed(String),
    /// Arithmetic overflow or underflow in pool accounting.
    #[error("arithmetic error: {0}")]
    Overflow(String),
    /// The pool was constructed from an invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<MathError> for PoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidPrice(reason) => Self::OracleUnavailable(reason),
            other => Self::Overflow(other.to_string()),
        }
    }
}

impl From<OracleError> for PoolError {
    fn from(err: OracleError) -> Self {
        Self::OracleUnavailable(err.to_string())
    }
}

impl From<ConfigError> for PoolError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<LedgerError> for PoolError {
    fn from(err: LedgerError) -> Self {
        Self::TransferFailed(err.to_string())
    }
}
