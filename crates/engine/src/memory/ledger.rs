//! In-memory asset ledger.

use crate::ledger::{AssetLedger, LedgerError};
use async_trait::async_trait;
use oracle_amm_domain::{Address, TokenAmount, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct LedgerBook {
    balances: HashMap<Address, TokenAmount>,
    /// Amount each owner has approved the operator to move.
    allowances: HashMap<Address, TokenAmount>,
}

/// Token ledger kept in memory.
///
/// Clones share the same book, so a handle kept outside the engine
/// observes every transfer the engine issues. Transfers out of the
/// `operator` account need no allowance; every other owner must
/// [`approve`](Self::approve) the operator first.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    symbol: String,
    operator: Address,
    book: Arc<RwLock<LedgerBook>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger whose transfers are issued by `operator`.
    pub fn new(symbol: impl Into<String>, operator: Address) -> Self {
        Self {
            symbol: symbol.into(),
            operator,
            book: Arc::new(RwLock::new(LedgerBook::default())),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Credits `amount` to `owner` out of thin air.
    pub async fn mint(&self, owner: &Address, amount: TokenAmount) {
        let mut book = self.book.write().await;
        let balance = book.balances.entry(owner.clone()).or_default();
        *balance = TokenAmount(balance.0.saturating_add(amount.0));
        debug!(symbol = %self.symbol, owner = %owner, amount = %amount, "Minted");
    }

    /// Sets the amount the operator may move out of `owner`'s balance.
    pub async fn approve(&self, owner: &Address, amount: TokenAmount) {
        self.book
            .write()
            .await
            .allowances
            .insert(owner.clone(), amount);
    }

    /// Grants the operator an unlimited allowance over `owner`'s balance.
    pub async fn approve_max(&self, owner: &Address) {
        self.approve(owner, TokenAmount(U256::MAX)).await;
    }

    pub async fn allowance(&self, owner: &Address) -> TokenAmount {
        self.book
            .read()
            .await
            .allowances
            .get(owner)
            .copied()
            .unwrap_or_default()
    }

    /// Sum of all balances.
    pub async fn total_supply(&self) -> TokenAmount {
        let book = self.book.read().await;
        TokenAmount(
            book.balances
                .values()
                .fold(U256::zero(), |acc, b| acc.saturating_add(b.0)),
        )
    }
}

#[async_trait]
impl AssetLedger for InMemoryLedger {
    async fn transfer_from(
        &self,
        owner: &Address,
        recipient: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let mut book = self.book.write().await;

        let available = book.balances.get(owner).copied().unwrap_or_default();
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                owner: owner.clone(),
                required: amount,
                available,
            });
        }

        if *owner != self.operator {
            let approved = book.allowances.get(owner).copied().unwrap_or_default();
            if approved < amount {
                return Err(LedgerError::InsufficientAllowance {
                    owner: owner.clone(),
                    required: amount,
                    approved,
                });
            }
            if approved.0 != U256::MAX {
                book.allowances
                    .insert(owner.clone(), TokenAmount(approved.0 - amount.0));
            }
        }

        book.balances
            .insert(owner.clone(), TokenAmount(available.0 - amount.0));
        let balance = book.balances.entry(recipient.clone()).or_default();
        *balance = TokenAmount(balance.0.saturating_add(amount.0));
        Ok(())
    }

    async fn balance_of(&self, owner: &Address) -> Result<TokenAmount, LedgerError> {
        Ok(self
            .book
            .read()
            .await
            .balances
            .get(owner)
            .copied()
            .unwrap_or_default())
    }
}
