//! Property-based tests for pool accounting.
//!
//! 1. **Conservation**: a swap leaves the reserve valuation unchanged up to
//!    one quote unit and moves the fee into the accumulators.
//! 2. **Share proportionality**: a later deposit's share of the supply
//!    matches its share of the pool's value.
//! 3. **Round trip**: a sole provider gets back exactly what it deposited.
//! 4. **Fee monotonicity**: across any sequence of deposits, swaps and
//!    withdrawals the fee accumulators only grow, except that a withdrawal
//!    lowers them by exactly the fee portion it redeems.
//! 5. **Over-redemption**: burning more than held is always rejected.

use proptest::prelude::*;

use super::{DepositPlan, SwapPlan, WithdrawalPlan, pool_value, valuation};
use crate::config::PoolConfig;
use crate::error::PoolError;
use oracle_amm_domain::{
    Address, AssetSide, Pool, PoolState, PricePair, PriceQuote, SwapDirection, TokenAmount, U256,
};

// Value of one micro-usdc at 1.0 in value units.
const ONE_QUOTE_UNIT_VALUE: u64 = 1_000_000_000_000;

fn pool() -> Pool {
    PoolConfig::default().to_pool()
}

/// Whole-dollar base price so valuation stays linear.
fn prices(base_dollars: i64) -> PricePair {
    PricePair::new(
        PriceQuote::new(base_dollars * 1_000_000, 0, -6, 0),
        PriceQuote::new(1_000_000, 0, -6, 0),
    )
}

fn e18(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b { a - b } else { b - a }
}

fn seeded(base_whole: u64, quote_whole: u64, prices: &PricePair) -> PoolState {
    let mut state = PoolState::new();
    let Ok(plan) = DepositPlan::compute(
        &pool(),
        &state,
        prices,
        TokenAmount(e18(base_whole)),
        TokenAmount::from(quote_whole * 1_000_000),
    ) else {
        panic!("valid seed deposit");
    };
    let Ok(()) = plan.apply(&mut state, &Address::from("seed")) else {
        panic!("seed applies");
    };
    state
}

fn reserve_value(state: &PoolState, prices: &PricePair) -> U256 {
    let Ok(v) = valuation(&pool(), prices, state.base_reserve, state.quote_reserve) else {
        panic!("valuation fits");
    };
    v
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_conservation(
        price in 1i64..10_000,
        base_whole in 1_000u64..1_000_000,
        quote_mult in 1u64..100,
        amount in 1u64..1_000_000_000_000_000_000,
        buying_base in any::<bool>(),
    ) {
        let prices = prices(price);
        let quote_whole = base_whole * price.unsigned_abs() * quote_mult;
        let mut state = seeded(base_whole, quote_whole, &prices);

        let reserves_before = reserve_value(&state, &prices);
        let Ok(holdings_before) = pool_value(&pool(), &state, &prices) else {
            panic!("valuation fits");
        };

        let direction = SwapDirection::from_buying_base(buying_base);
        let plan = match SwapPlan::compute(&pool(), &state, &prices, direction, TokenAmount::from(amount)) {
            Ok(plan) => plan,
            // Dust trades are rejected outright.
            Err(PoolError::InvalidAmount(_)) => return Ok(()),
            Err(e) => panic!("unexpected error: {e}"),
        };
        let Ok(()) = plan.apply(&mut state) else {
            panic!("plan applies");
        };

        let reserves_after = reserve_value(&state, &prices);
        prop_assert!(abs_diff(reserves_before, reserves_after) < U256::from(ONE_QUOTE_UNIT_VALUE));

        let fee_value = {
            let (b, q) = match plan.fee_side() {
                AssetSide::Base => (plan.fee, TokenAmount::zero()),
                AssetSide::Quote => (TokenAmount::zero(), plan.fee),
            };
            let Ok(v) = valuation(&pool(), &prices, b, q) else {
                panic!("valuation fits");
            };
            v
        };
        let Ok(holdings_after) = pool_value(&pool(), &state, &prices) else {
            panic!("valuation fits");
        };
        prop_assert_eq!(
            holdings_after + reserves_before,
            holdings_before + reserves_after + fee_value
        );
    }

    #[test]
    fn prop_share_proportionality(
        price in 1i64..10_000,
        first in 1u64..1_000_000,
        second in 1u64..1_000_000,
        fee_quote in 0u64..1_000_000,
    ) {
        let prices = prices(price);
        let mut state = seeded(first, first, &prices);
        let Ok(()) = state.fees.accrue(AssetSide::Quote, TokenAmount::from(fee_quote * 1_000_000)) else {
            panic!("fee accrues");
        };

        let Ok(pool_before) = pool_value(&pool(), &state, &prices) else {
            panic!("valuation fits");
        };
        let supply_before = state.total_shares;
        let Ok(plan) = DepositPlan::compute(
            &pool(),
            &state,
            &prices,
            TokenAmount(e18(second)),
            TokenAmount::from(second * 1_000_000),
        ) else {
            panic!("valid deposit");
        };

        // shares / supply <= value / pool_value < (shares + 1) / supply
        let lhs = plan.shares * pool_before;
        let rhs = plan.deposit_value * supply_before;
        prop_assert!(lhs <= rhs);
        prop_assert!(rhs < (plan.shares + U256::one()) * pool_before);

        let Ok(()) = plan.apply(&mut state, &Address::from("second")) else {
            panic!("plan applies");
        };
        prop_assert!(state.shares_balanced());
    }

    #[test]
    fn prop_sole_provider_round_trip(
        price in 1i64..10_000,
        base in 1u64..u64::MAX,
        quote in 1u64..u64::MAX,
    ) {
        let prices = prices(price);
        let provider = Address::from("solo");
        let mut state = PoolState::new();

        let Ok(deposit) = DepositPlan::compute(
            &pool(),
            &state,
            &prices,
            TokenAmount::from(base),
            TokenAmount::from(quote),
        ) else {
            panic!("valid deposit");
        };
        let Ok(()) = deposit.apply(&mut state, &provider) else {
            panic!("deposit applies");
        };

        let Ok(withdrawal) = WithdrawalPlan::compute(&state, &provider, deposit.shares) else {
            panic!("valid withdrawal");
        };
        prop_assert_eq!(withdrawal.base_out().ok(), Some(TokenAmount::from(base)));
        prop_assert_eq!(withdrawal.quote_out().ok(), Some(TokenAmount::from(quote)));

        let Ok(()) = withdrawal.apply(&mut state, &provider) else {
            panic!("withdrawal applies");
        };
        prop_assert_eq!(state, PoolState::new());
    }

    #[test]
    fn prop_fee_monotonicity(
        steps in prop::collection::vec((0u8..3, 1u64..1_000_000, any::<bool>()), 1..24),
    ) {
        let prices = prices(10);
        let mut state = seeded(1_000, 10_000, &prices);
        let providers = [Address::from("seed"), Address::from("other")];

        for (kind, size, flag) in steps {
            let before = state.fees;
            let provider = &providers[usize::from(flag)];

            match kind {
                0 => {
                    let plan = match DepositPlan::compute(
                        &pool(),
                        &state,
                        &prices,
                        TokenAmount(U256::from(size) * U256::exp10(12)),
                        TokenAmount::from(size),
                    ) {
                        Ok(plan) => plan,
                        Err(PoolError::InvalidAmount(_)) => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    };
                    let Ok(()) = plan.apply(&mut state, provider) else {
                        panic!("deposit applies");
                    };
                    prop_assert_eq!(state.fees, before);
                }
                1 => {
                    let direction = SwapDirection::from_buying_base(flag);
                    let amount = TokenAmount(U256::from(size) * U256::exp10(12));
                    let plan = match SwapPlan::compute(&pool(), &state, &prices, direction, amount) {
                        Ok(plan) => plan,
                        Err(
                            PoolError::InvalidAmount(_) | PoolError::InsufficientReserves { .. },
                        ) => continue,
                        Err(e) => panic!("unexpected error: {e}"),
                    };
                    let Ok(()) = plan.apply(&mut state) else {
                        panic!("swap applies");
                    };
                    prop_assert!(state.fees.base >= before.base);
                    prop_assert!(state.fees.quote >= before.quote);
                    prop_assert_eq!(
                        state.fees.get(plan.fee_side()).checked_sub(before.get(plan.fee_side())),
                        Some(plan.fee)
                    );
                }
                _ => {
                    let held = state.shares_of(provider);
                    let shares = held * U256::from(size % 100 + 1) / U256::from(100u64);
                    if shares.is_zero() {
                        continue;
                    }
                    let Ok(plan) = WithdrawalPlan::compute(&state, provider, shares) else {
                        panic!("valid withdrawal");
                    };
                    let Ok(()) = plan.apply(&mut state, provider) else {
                        panic!("withdrawal applies");
                    };
                    prop_assert_eq!(
                        before.base.checked_sub(state.fees.base),
                        Some(plan.base_fee_part)
                    );
                    prop_assert_eq!(
                        before.quote.checked_sub(state.fees.quote),
                        Some(plan.quote_fee_part)
                    );
                }
            }
        }
    }

    #[test]
    fn prop_over_redemption_rejected(
        held in 1u64..u64::MAX,
        extra in 1u64..1_000_000,
    ) {
        let mut state = PoolState::new();
        let provider = Address::from("lp");
        let Ok(()) = state.credit_shares(&provider, U256::from(held)) else {
            panic!("shares credit");
        };
        let requested = U256::from(held) + U256::from(extra);

        let result = WithdrawalPlan::compute(&state, &provider, requested);
        prop_assert_eq!(
            result,
            Err(PoolError::InsufficientShares { requested, available: U256::from(held) })
        );
    }
}
