//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use oracle_amm_engine::prelude::*;
//! ```

// Config
pub use crate::config::{AssetConfig, ConfigError, PoolConfig};

// Errors
pub use crate::error::PoolError;

// Ledger
pub use crate::ledger::{AssetLedger, LandedTransfer, LedgerError, TransferBatch};

// Lifecycle
pub use crate::lifecycle::{
    EventData, EventJournal, JournalStats, LiquidityAddedData, LiquidityRemovedData, PoolEvent,
    PoolEventType, SwapData,
};

// Memory
pub use crate::memory::{InMemoryLedger, PriceUpdate, StaticPriceOracle};

// Oracle
pub use crate::oracle::{OracleError, OracleGuard, PriceOracle, UpdatePayload};

// Pool
pub use crate::pool::{DepositPlan, OracleAmm, SwapPlan, WithdrawalPlan};
