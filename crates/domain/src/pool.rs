use crate::enums::AssetSide;
use crate::error::MathError;
use crate::fees::{FeeAccumulation, FeeTier};
use crate::position::LiquidityProvider;
use crate::token::{Address, Token, TokenAmount};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static description of a base/quote pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// Ledger address that holds the pool's balances.
    pub address: Address,
    pub base: Token,
    pub quote: Token,
    pub fee_tier: FeeTier,
}

impl Pool {
    pub fn token(&self, side: AssetSide) -> &Token {
        match side {
            AssetSide::Base => &self.base,
            AssetSide::Quote => &self.quote,
        }
    }
}

/// Mutable accounting state of the pool.
///
/// Reserves exclude fee accumulators. The pool physically holds
/// `reserve + fees` of each asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub base_reserve: TokenAmount,
    pub quote_reserve: TokenAmount,
    pub total_shares: U256,
    pub fees: FeeAccumulation,
    pub providers: BTreeMap<Address, LiquidityProvider>,
    /// Native balance available to pay oracle update fees.
    pub update_fee_budget: u128,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&self, side: AssetSide) -> TokenAmount {
        match side {
            AssetSide::Base => self.base_reserve,
            AssetSide::Quote => self.quote_reserve,
        }
    }

    /// Reserve plus accrued fees: everything the pool holds of `side`.
    pub fn holdings(&self, side: AssetSide) -> Result<TokenAmount, MathError> {
        self.reserve(side)
            .checked_add(self.fees.get(side))
            .ok_or(MathError::Overflow("pool holdings"))
    }

    pub fn credit_reserve(&mut self, side: AssetSide, amount: TokenAmount) -> Result<(), MathError> {
        let slot = self.reserve_mut(side);
        *slot = slot
            .checked_add(amount)
            .ok_or(MathError::Overflow("reserve credit"))?;
        Ok(())
    }

    pub fn debit_reserve(&mut self, side: AssetSide, amount: TokenAmount) -> Result<(), MathError> {
        let slot = self.reserve_mut(side);
        *slot = slot
            .checked_sub(amount)
            .ok_or(MathError::Underflow("reserve debit"))?;
        Ok(())
    }

    pub fn shares_of(&self, address: &Address) -> U256 {
        self.providers
            .get(address)
            .map(|lp| lp.shares)
            .unwrap_or_default()
    }

    pub fn credit_shares(&mut self, address: &Address, shares: U256) -> Result<(), MathError> {
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(MathError::Overflow("share supply"))?;
        let lp = self
            .providers
            .entry(address.clone())
            .or_insert_with(|| LiquidityProvider::new(address.clone()));
        lp.shares = lp
            .shares
            .checked_add(shares)
            .ok_or(MathError::Overflow("provider shares"))?;
        Ok(())
    }

    /// Burns `shares` from `address`. The provider record is dropped once it
    /// holds nothing.
    pub fn debit_shares(&mut self, address: &Address, shares: U256) -> Result<(), MathError> {
        let lp = self
            .providers
            .get_mut(address)
            .ok_or(MathError::Underflow("provider shares"))?;
        lp.shares = lp
            .shares
            .checked_sub(shares)
            .ok_or(MathError::Underflow("provider shares"))?;
        if lp.is_empty() {
            self.providers.remove(address);
        }
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(MathError::Underflow("share supply"))?;
        Ok(())
    }

    /// Checks that the share supply equals the sum of provider records.
    pub fn shares_balanced(&self) -> bool {
        let sum = self
            .providers
            .values()
            .try_fold(U256::zero(), |acc, lp| acc.checked_add(lp.shares));
        sum == Some(self.total_shares)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            base_reserve: self.base_reserve,
            quote_reserve: self.quote_reserve,
            total_shares: self.total_shares,
            base_fees_accrued: self.fees.base,
            quote_fees_accrued: self.fees.quote,
            provider_count: self.providers.len(),
        }
    }

    fn reserve_mut(&mut self, side: AssetSide) -> &mut TokenAmount {
        match side {
            AssetSide::Base => &mut self.base_reserve,
            AssetSide::Quote => &mut self.quote_reserve,
        }
    }
}

/// Point-in-time copy of the pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub base_reserve: TokenAmount,
    pub quote_reserve: TokenAmount,
    pub total_shares: U256,
    pub base_fees_accrued: TokenAmount,
    pub quote_fees_accrued: TokenAmount,
    pub provider_count: usize,
}
