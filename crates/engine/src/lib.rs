//! Oracle-priced liquidity pool engine.
//!
//! This crate provides the pool accounting engine and its collaborators:
//! - Price oracle capability with freshness and confidence checks
//! - Asset ledger capability with compensating transfer batches
//! - Share issuance, redemption and fee accounting
//! - Oracle-priced swaps with a fee on the output leg
//! - Journal of committed operations
//! - In-memory oracle and ledgers for simulation and tests

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool configuration.
pub mod config;
/// Pool error type.
pub mod error;
/// Asset ledger capability.
pub mod ledger;
/// Journal of pool events.
pub mod lifecycle;
/// In-memory collaborators.
pub mod memory;
/// Price oracle capability.
pub mod oracle;
/// Pool accounting engine.
pub mod pool;
