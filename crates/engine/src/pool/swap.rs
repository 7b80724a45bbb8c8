//! Oracle-priced swaps.
//!
//! The execution price comes from the oracle alone. Pool depth never moves
//! the price; a swap either fits in the reserve it draws on or fails.

use crate::error::PoolError;
use oracle_amm_domain::math::convert;
use oracle_amm_domain::{
    AssetSide, Pool, PoolState, PricePair, Rounding, SwapDirection, TokenAmount,
};

/// A computed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    pub direction: SwapDirection,
    /// Base-side size of the trade.
    pub amount: TokenAmount,
    /// `amount` converted to quote units at the oracle prices, rounded up
    /// when buying base and down when selling.
    pub quote_equivalent: TokenAmount,
    /// Owed to the trader before the fee.
    pub gross: TokenAmount,
    pub fee: TokenAmount,
    pub received: TokenAmount,
}

impl SwapPlan {
    /// Prices a swap of `amount` base units in `direction`.
    ///
    /// The fee is withheld from the output leg and rounded up.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] when `amount` is zero or the trade is
    ///   too small to be worth anything after the fee.
    /// - [`PoolError::InsufficientReserves`] when the gross payout exceeds
    ///   the reserve being drawn on.
    pub fn compute(
        pool: &Pool,
        state: &PoolState,
        prices: &PricePair,
        direction: SwapDirection,
        amount: TokenAmount,
    ) -> Result<Self, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount(
                "swap amount must be positive".to_string(),
            ));
        }

        // The quote leg rounds in the pool's favour: up when the trader pays
        // it, down when the pool pays it out.
        let rounding = match direction {
            SwapDirection::BuyBase => Rounding::Up,
            SwapDirection::SellBase => Rounding::Down,
        };
        let quote_equivalent = TokenAmount(convert(
            amount.as_u256(),
            &prices.base,
            pool.base.decimals,
            &prices.quote,
            pool.quote.decimals,
            rounding,
        )?);
        if quote_equivalent.is_zero() {
            return Err(PoolError::InvalidAmount(
                "swap amount is worth nothing in the quote asset".to_string(),
            ));
        }

        let gross = match direction {
            SwapDirection::BuyBase => amount,
            SwapDirection::SellBase => quote_equivalent,
        };
        let out_side = direction.received_side();
        let available = state.reserve(out_side);
        if gross > available {
            return Err(PoolError::InsufficientReserves {
                side: out_side,
                requested: gross,
                available,
            });
        }

        let fee = pool.fee_tier.apply(gross, Rounding::Up)?;
        let received = gross
            .checked_sub(fee)
            .filter(|r| !r.is_zero())
            .ok_or_else(|| {
                PoolError::InvalidAmount("swap output is consumed by the fee".to_string())
            })?;

        Ok(Self {
            direction,
            amount,
            quote_equivalent,
            gross,
            fee,
            received,
        })
    }

    /// What the trader pays into the pool.
    pub fn paid(&self) -> TokenAmount {
        match self.direction {
            SwapDirection::BuyBase => self.quote_equivalent,
            SwapDirection::SellBase => self.amount,
        }
    }

    /// Moves the paid leg into its reserve, the gross payout out of the
    /// other reserve, and the fee into that side's accumulator.
    pub fn apply(&self, state: &mut PoolState) -> Result<(), PoolError> {
        let in_side = self.direction.paid_side();
        let out_side = self.direction.received_side();
        state.credit_reserve(in_side, self.paid())?;
        state.debit_reserve(out_side, self.gross)?;
        state.fees.accrue(out_side, self.fee)?;
        Ok(())
    }

    pub fn fee_side(&self) -> AssetSide {
        self.direction.received_side()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use oracle_amm_domain::{PriceQuote, U256};

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn prices() -> PricePair {
        PricePair::new(
            PriceQuote::new(10_000_000, 0, -6, 0),
            PriceQuote::new(1_000_000, 0, -6, 0),
        )
    }

    fn seeded() -> PoolState {
        let mut state = PoolState::new();
        state.credit_reserve(AssetSide::Base, TokenAmount(e18(100))).unwrap();
        state
            .credit_reserve(AssetSide::Quote, TokenAmount::from(1_000_000_000u64))
            .unwrap();
        state
    }

    #[test]
    fn test_buy_base() {
        let pool = PoolConfig::default().to_pool();
        let mut state = seeded();

        let plan = SwapPlan::compute(
            &pool,
            &state,
            &prices(),
            SwapDirection::BuyBase,
            TokenAmount(e18(10)),
        )
        .unwrap();
        assert_eq!(plan.paid(), TokenAmount::from(100_000_000u64));
        assert_eq!(plan.fee, TokenAmount(e18(1) / 10));
        assert_eq!(plan.received, TokenAmount(e18(99) / 10));
        assert_eq!(plan.fee_side(), AssetSide::Base);

        plan.apply(&mut state).unwrap();
        assert_eq!(state.base_reserve, TokenAmount(e18(90)));
        assert_eq!(state.quote_reserve, TokenAmount::from(1_100_000_000u64));
        assert_eq!(state.fees.base, TokenAmount(e18(1) / 10));
        assert_eq!(
            state.holdings(AssetSide::Base).unwrap(),
            TokenAmount(e18(901) / 10)
        );
    }

    #[test]
    fn test_sell_base() {
        let pool = PoolConfig::default().to_pool();
        let mut state = seeded();

        let plan = SwapPlan::compute(
            &pool,
            &state,
            &prices(),
            SwapDirection::SellBase,
            TokenAmount(e18(10)),
        )
        .unwrap();
        assert_eq!(plan.paid(), TokenAmount(e18(10)));
        assert_eq!(plan.gross, TokenAmount::from(100_000_000u64));
        assert_eq!(plan.fee, TokenAmount::from(1_000_000u64));
        assert_eq!(plan.received, TokenAmount::from(99_000_000u64));

        plan.apply(&mut state).unwrap();
        assert_eq!(state.base_reserve, TokenAmount(e18(110)));
        assert_eq!(state.quote_reserve, TokenAmount::from(900_000_000u64));
        assert_eq!(state.fees.quote, TokenAmount::from(1_000_000u64));
    }

    #[test]
    fn test_fee_rounds_up() {
        let pool = PoolConfig::default().to_pool();
        let state = seeded();
        // 150 wei → fee 1.5 rounds to 2.
        let plan = SwapPlan::compute(
            &pool,
            &state,
            &prices(),
            SwapDirection::BuyBase,
            TokenAmount(e18(1) + U256::from(150u64)),
        )
        .unwrap();
        assert_eq!(plan.fee, TokenAmount(e18(1) / 100 + U256::from(2u64)));
    }

    #[test]
    fn test_buy_payment_rounds_up() {
        let pool = PoolConfig::default().to_pool();
        let state = seeded();
        // Worth 1.99999999999 micro-usdc at 10.0.
        let amount = TokenAmount::from(199_999_999_999u64);

        let plan = SwapPlan::compute(&pool, &state, &prices(), SwapDirection::BuyBase, amount)
            .unwrap();
        assert_eq!(plan.paid(), TokenAmount::from(2u64));
        assert_eq!(plan.received, TokenAmount::from(197_999_999_999u64));

        // Value units: paid quote against received base.
        let paid_value = plan.paid().as_u256() * U256::exp10(12);
        let received_value = plan.received.as_u256() * U256::from(10u64);
        assert!(paid_value >= received_value);

        // Selling the same size still floors the payout to one unit.
        let err = SwapPlan::compute(&pool, &state, &prices(), SwapDirection::SellBase, amount)
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidAmount(_)));
    }

    #[test]
    fn test_reserve_sufficiency() {
        let pool = PoolConfig::default().to_pool();
        let state = seeded();

        let err = SwapPlan::compute(
            &pool,
            &state,
            &prices(),
            SwapDirection::BuyBase,
            TokenAmount(e18(101)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PoolError::InsufficientReserves {
                side: AssetSide::Base,
                ..
            }
        ));

        // 101 gold is worth 1010 usdc; only 1000 is held.
        let err = SwapPlan::compute(
            &pool,
            &state,
            &prices(),
            SwapDirection::SellBase,
            TokenAmount(e18(101)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PoolError::InsufficientReserves {
                side: AssetSide::Quote,
                requested: TokenAmount::from(1_010_000_000u64),
                available: TokenAmount::from(1_000_000_000u64),
            }
        );

        // Draining the whole reserve is allowed.
        assert!(
            SwapPlan::compute(
                &pool,
                &state,
                &prices(),
                SwapDirection::BuyBase,
                TokenAmount(e18(100)),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_dust_rejected() {
        let pool = PoolConfig::default().to_pool();
        let state = seeded();

        assert!(matches!(
            SwapPlan::compute(&pool, &state, &prices(), SwapDirection::BuyBase, TokenAmount::zero()),
            Err(PoolError::InvalidAmount(_))
        ));
        // 1 wei of gold is worth less than one micro-usdc.
        assert!(matches!(
            SwapPlan::compute(
                &pool,
                &state,
                &prices(),
                SwapDirection::SellBase,
                TokenAmount::from(1u64)
            ),
            Err(PoolError::InvalidAmount(_))
        ));
    }
}
