//! All-or-nothing grouping of ledger transfers.

use super::AssetLedger;
use crate::error::PoolError;
use oracle_amm_domain::{Address, AssetSide, TokenAmount};
use tracing::{debug, error, warn};

/// A transfer that has already landed on a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandedTransfer {
    pub side: AssetSide,
    pub from: Address,
    pub to: Address,
    pub amount: TokenAmount,
}

/// Issues the transfers of one pool operation.
///
/// When a transfer fails, every transfer that already landed is reversed in
/// reverse order before the error is returned, so the ledgers end up as if
/// the operation had never started.
pub struct TransferBatch<'a, L: AssetLedger> {
    base: &'a L,
    quote: &'a L,
    landed: Vec<LandedTransfer>,
}

impl<'a, L: AssetLedger> TransferBatch<'a, L> {
    /// Creates an empty batch over the base and quote ledgers.
    pub fn new(base: &'a L, quote: &'a L) -> Self {
        Self {
            base,
            quote,
            landed: Vec::new(),
        }
    }

    fn ledger(&self, side: AssetSide) -> &'a L {
        match side {
            AssetSide::Base => self.base,
            AssetSide::Quote => self.quote,
        }
    }

    /// Issues one transfer. Zero amounts are skipped.
    ///
    /// # Errors
    /// Returns [`PoolError::TransferFailed`] after compensating all landed
    /// transfers.
    pub async fn transfer(
        &mut self,
        side: AssetSide,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), PoolError> {
        if amount.is_zero() {
            return Ok(());
        }

        match self.ledger(side).transfer_from(from, to, amount).await {
            Ok(()) => {
                debug!(side = %side, from = %from, to = %to, amount = %amount, "Transfer landed");
                self.landed.push(LandedTransfer {
                    side,
                    from: from.clone(),
                    to: to.clone(),
                    amount,
                });
                Ok(())
            }
            Err(err) => {
                warn!(side = %side, from = %from, error = %err, "Transfer failed, compensating");
                let failures = self.compensate().await;
                if failures.is_empty() {
                    Err(PoolError::TransferFailed(format!("{side} leg: {err}")))
                } else {
                    Err(PoolError::TransferFailed(format!(
                        "{side} leg: {err}; compensation failed: {}",
                        failures.join("; ")
                    )))
                }
            }
        }
    }

    /// Transfers issued so far.
    pub fn landed(&self) -> &[LandedTransfer] {
        &self.landed
    }

    /// Reverses landed transfers, newest first. Returns the reasons of any
    /// reversal that did not land.
    async fn compensate(&mut self) -> Vec<String> {
        let mut failures = Vec::new();
        while let Some(t) = self.landed.pop() {
            if let Err(err) = self.ledger(t.side).transfer_from(&t.to, &t.from, t.amount).await {
                error!(
                    side = %t.side,
                    from = %t.to,
                    to = %t.from,
                    amount = %t.amount,
                    error = %err,
                    "Compensating transfer failed"
                );
                failures.push(format!("{} {} -> {}: {err}", t.side, t.to, t.from));
            }
        }
        failures
    }
}
