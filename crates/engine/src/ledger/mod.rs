//! Asset ledger capability.
//!
//! The pool never holds balances itself. Every movement of value is a
//! [`AssetLedger::transfer_from`] instruction against the ledger of the
//! asset involved, grouped per operation in a [`TransferBatch`].

mod transfer;

pub use transfer::{LandedTransfer, TransferBatch};

use async_trait::async_trait;
use oracle_amm_domain::{Address, TokenAmount};
use thiserror::Error;

/// Errors reported by a ledger implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance for {owner}: required {required}, available {available}")]
    InsufficientBalance {
        owner: Address,
        required: TokenAmount,
        available: TokenAmount,
    },
    #[error("insufficient allowance for {owner}: required {required}, approved {approved}")]
    InsufficientAllowance {
        owner: Address,
        required: TokenAmount,
        approved: TokenAmount,
    },
    #[error("ledger unreachable: {0}")]
    Unreachable(String),
}

/// Fungible token ledger for one asset.
#[async_trait]
pub trait AssetLedger: Send + Sync {
    /// Moves `amount` from `owner` to `recipient`, failing if the owner's
    /// balance or the pool's allowance is insufficient.
    async fn transfer_from(
        &self,
        owner: &Address,
        recipient: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError>;

    /// Returns the balance held by `owner`.
    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount, LedgerError>;
}
