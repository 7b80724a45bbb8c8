//! Share issuance and redemption.
//!
//! Shares are denominated in value units (see
//! [`VALUE_DECIMALS`](oracle_amm_domain::math::VALUE_DECIMALS)). The first
//! deposit mints shares equal to its valuation; later deposits mint in
//! proportion to the pool's valuation at the current oracle price,
//! undistributed fees included. Redemptions pay the same fraction of every
//! reserve and fee accumulator.

use crate::error::PoolError;
use oracle_amm_domain::math::{mul_div, value_of};
use oracle_amm_domain::{
    Address, AssetSide, Pool, PoolState, PricePair, Rounding, TokenAmount, U256,
};

/// Values a base/quote pair of raw amounts at the given prices.
pub fn valuation(
    pool: &Pool,
    prices: &PricePair,
    base: TokenAmount,
    quote: TokenAmount,
) -> Result<U256, PoolError> {
    let base_value = value_of(base.as_u256(), &prices.base, pool.base.decimals)?;
    let quote_value = value_of(quote.as_u256(), &prices.quote, pool.quote.decimals)?;
    base_value
        .checked_add(quote_value)
        .ok_or_else(|| PoolError::Overflow("valuation".to_string()))
}

/// Everything the pool holds, fees included, valued at `prices`.
pub fn pool_value(pool: &Pool, state: &PoolState, prices: &PricePair) -> Result<U256, PoolError> {
    valuation(
        pool,
        prices,
        state.holdings(AssetSide::Base)?,
        state.holdings(AssetSide::Quote)?,
    )
}

/// A computed deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPlan {
    pub base_amount: TokenAmount,
    pub quote_amount: TokenAmount,
    pub deposit_value: U256,
    pub shares: U256,
}

impl DepositPlan {
    /// Prices a deposit against the current state.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] when either amount is zero or the
    ///   deposit is too small to mint a share.
    /// - [`PoolError::OracleUnavailable`] when a price is not positive.
    pub fn compute(
        pool: &Pool,
        state: &PoolState,
        prices: &PricePair,
        base_amount: TokenAmount,
        quote_amount: TokenAmount,
    ) -> Result<Self, PoolError> {
        if base_amount.is_zero() || quote_amount.is_zero() {
            return Err(PoolError::InvalidAmount(
                "deposit amounts must both be positive".to_string(),
            ));
        }

        let deposit_value = valuation(pool, prices, base_amount, quote_amount)?;

        let shares = if state.total_shares.is_zero() {
            deposit_value
        } else {
            let current = pool_value(pool, state, prices)?;
            if current.is_zero() {
                return Err(PoolError::InvalidAmount(
                    "pool holdings have no value at the current price".to_string(),
                ));
            }
            mul_div(deposit_value, state.total_shares, current, Rounding::Down)?
        };

        if shares.is_zero() {
            return Err(PoolError::InvalidAmount(
                "deposit too small to issue shares".to_string(),
            ));
        }

        Ok(Self {
            base_amount,
            quote_amount,
            deposit_value,
            shares,
        })
    }

    pub fn apply(&self, state: &mut PoolState, provider: &Address) -> Result<(), PoolError> {
        state.credit_reserve(AssetSide::Base, self.base_amount)?;
        state.credit_reserve(AssetSide::Quote, self.quote_amount)?;
        state.credit_shares(provider, self.shares)?;
        Ok(())
    }
}

/// A computed redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub shares: U256,
    pub base_reserve_part: TokenAmount,
    pub quote_reserve_part: TokenAmount,
    pub base_fee_part: TokenAmount,
    pub quote_fee_part: TokenAmount,
}

impl WithdrawalPlan {
    /// Splits a redemption of `shares` into reserve and fee portions.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] when `shares` is zero.
    /// - [`PoolError::InsufficientShares`] when the provider holds fewer.
    pub fn compute(state: &PoolState, provider: &Address, shares: U256) -> Result<Self, PoolError> {
        if shares.is_zero() {
            return Err(PoolError::InvalidAmount(
                "share amount must be positive".to_string(),
            ));
        }
        let available = state.shares_of(provider);
        if available < shares {
            return Err(PoolError::InsufficientShares {
                requested: shares,
                available,
            });
        }

        let total = state.total_shares;
        let part = |amount: TokenAmount| -> Result<TokenAmount, PoolError> {
            Ok(TokenAmount(mul_div(
                amount.as_u256(),
                shares,
                total,
                Rounding::Down,
            )?))
        };

        Ok(Self {
            shares,
            base_reserve_part: part(state.base_reserve)?,
            quote_reserve_part: part(state.quote_reserve)?,
            base_fee_part: part(state.fees.base)?,
            quote_fee_part: part(state.fees.quote)?,
        })
    }

    pub fn base_out(&self) -> Result<TokenAmount, PoolError> {
        self.base_reserve_part
            .checked_add(self.base_fee_part)
            .ok_or_else(|| PoolError::Overflow("base payout".to_string()))
    }

    pub fn quote_out(&self) -> Result<TokenAmount, PoolError> {
        self.quote_reserve_part
            .checked_add(self.quote_fee_part)
            .ok_or_else(|| PoolError::Overflow("quote payout".to_string()))
    }

    pub fn apply(&self, state: &mut PoolState, provider: &Address) -> Result<(), PoolError> {
        state.debit_reserve(AssetSide::Base, self.base_reserve_part)?;
        state.debit_reserve(AssetSide::Quote, self.quote_reserve_part)?;
        state.fees.pay_out(AssetSide::Base, self.base_fee_part)?;
        state.fees.pay_out(AssetSide::Quote, self.quote_fee_part)?;
        state.debit_shares(provider, self.shares)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use oracle_amm_domain::PriceQuote;

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn prices() -> PricePair {
        PricePair::new(
            PriceQuote::new(10_000_000, 0, -6, 0),
            PriceQuote::new(1_000_000, 0, -6, 0),
        )
    }

    fn gold(n: u64) -> TokenAmount {
        TokenAmount(e18(n))
    }

    fn usdc(n: u64) -> TokenAmount {
        TokenAmount::from(n * 1_000_000)
    }

    #[test]
    fn test_first_deposit_mints_valuation() {
        let pool = PoolConfig::default().to_pool();
        let state = PoolState::new();

        let plan = DepositPlan::compute(&pool, &state, &prices(), gold(100), usdc(1000)).unwrap();
        assert_eq!(plan.deposit_value, e18(2000));
        assert_eq!(plan.shares, e18(2000));
    }

    #[test]
    fn test_later_deposit_is_proportional() {
        let pool = PoolConfig::default().to_pool();
        let mut state = PoolState::new();
        let alice = Address::from("alice");
        let bob = Address::from("bob");

        DepositPlan::compute(&pool, &state, &prices(), gold(100), usdc(1000))
            .unwrap()
            .apply(&mut state, &alice)
            .unwrap();
        // Fees raise the pool's value without minting shares.
        state.fees.accrue(AssetSide::Quote, usdc(2000)).unwrap();

        // Pool is worth 4000, bob brings 1000 → 1/4 of the old supply.
        let plan = DepositPlan::compute(&pool, &state, &prices(), gold(50), usdc(500)).unwrap();
        assert_eq!(plan.shares, e18(500));
        plan.apply(&mut state, &bob).unwrap();
        assert_eq!(state.total_shares, e18(2500));
        assert!(state.shares_balanced());
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let pool = PoolConfig::default().to_pool();
        let state = PoolState::new();
        for (b, q) in [(gold(0), usdc(1)), (gold(1), usdc(0))] {
            assert!(matches!(
                DepositPlan::compute(&pool, &state, &prices(), b, q),
                Err(PoolError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_dust_deposit_rejected() {
        let pool = PoolConfig::default().to_pool();
        let state = PoolState::new();
        // 1 wei of gold and 1 micro-usdc are worth 10^-17 + 10^-6 value;
        // that still mints shares, but a zero-priced valuation does not.
        let plan =
            DepositPlan::compute(&pool, &state, &prices(), TokenAmount::from(1u64), TokenAmount::from(1u64))
                .unwrap();
        assert_eq!(plan.shares, U256::from(1_000_000_000_010u64));

        let cheap = PricePair::new(
            PriceQuote::new(1, 0, -30, 0),
            PriceQuote::new(1, 0, -30, 0),
        );
        assert!(matches!(
            DepositPlan::compute(&pool, &state, &cheap, TokenAmount::from(1u64), TokenAmount::from(1u64)),
            Err(PoolError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_withdrawal_splits_reserves_and_fees() {
        let mut state = PoolState::new();
        let alice = Address::from("alice");
        state.credit_reserve(AssetSide::Base, TokenAmount::from(1000u64)).unwrap();
        state.credit_reserve(AssetSide::Quote, TokenAmount::from(500u64)).unwrap();
        state.fees.accrue(AssetSide::Base, TokenAmount::from(10u64)).unwrap();
        state.credit_shares(&alice, U256::from(4u64)).unwrap();
        state.credit_shares(&Address::from("bob"), U256::from(6u64)).unwrap();

        let plan = WithdrawalPlan::compute(&state, &alice, U256::from(4u64)).unwrap();
        assert_eq!(plan.base_reserve_part, TokenAmount::from(400u64));
        assert_eq!(plan.quote_reserve_part, TokenAmount::from(200u64));
        assert_eq!(plan.base_fee_part, TokenAmount::from(4u64));
        assert_eq!(plan.quote_fee_part, TokenAmount::zero());
        assert_eq!(plan.base_out().unwrap(), TokenAmount::from(404u64));

        plan.apply(&mut state, &alice).unwrap();
        assert_eq!(state.base_reserve, TokenAmount::from(600u64));
        assert_eq!(state.fees.base, TokenAmount::from(6u64));
        assert_eq!(state.total_shares, U256::from(6u64));
    }

    #[test]
    fn test_over_redemption_rejected() {
        let mut state = PoolState::new();
        let alice = Address::from("alice");
        state.credit_shares(&alice, U256::from(4u64)).unwrap();

        let err = WithdrawalPlan::compute(&state, &alice, U256::from(5u64)).unwrap_err();
        assert_eq!(
            err,
            PoolError::InsufficientShares {
                requested: U256::from(5u64),
                available: U256::from(4u64),
            }
        );
        assert!(matches!(
            WithdrawalPlan::compute(&state, &alice, U256::zero()),
            Err(PoolError::InvalidAmount(_))
        ));
    }
}
