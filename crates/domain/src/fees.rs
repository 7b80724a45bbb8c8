use crate::enums::{AssetSide, Rounding};
use crate::error::MathError;
use crate::math::fixed_point::{BPS_DENOMINATOR, mul_div};
use crate::token::TokenAmount;
use crate::value_objects::percentage::Percentage;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Swap fee charged on the output leg, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub bps: u32,
}

impl FeeTier {
    pub fn new(bps: u32) -> Self {
        Self { bps }
    }

    pub fn as_percentage(&self) -> Percentage {
        Percentage::from_bps(self.bps)
    }

    /// Computes `amount * bps / 10_000` with the given rounding.
    pub fn apply(&self, amount: TokenAmount, rounding: Rounding) -> Result<TokenAmount, MathError> {
        mul_div(
            amount.as_u256(),
            U256::from(self.bps),
            U256::from(BPS_DENOMINATOR),
            rounding,
        )
        .map(TokenAmount)
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Fee revenue held by the pool on behalf of shareholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAccumulation {
    pub base: TokenAmount,
    pub quote: TokenAmount,
}

impl FeeAccumulation {
    pub fn get(&self, side: AssetSide) -> TokenAmount {
        match side {
            AssetSide::Base => self.base,
            AssetSide::Quote => self.quote,
        }
    }

    pub fn accrue(&mut self, side: AssetSide, fee: TokenAmount) -> Result<(), MathError> {
        let slot = self.slot_mut(side);
        *slot = slot
            .checked_add(fee)
            .ok_or(MathError::Overflow("fee accrual"))?;
        Ok(())
    }

    /// Removes the portion of fees paid out to a redeeming provider.
    pub fn pay_out(&mut self, side: AssetSide, portion: TokenAmount) -> Result<(), MathError> {
        let slot = self.slot_mut(side);
        *slot = slot
            .checked_sub(portion)
            .ok_or(MathError::Underflow("fee payout"))?;
        Ok(())
    }

    fn slot_mut(&mut self, side: AssetSide) -> &mut TokenAmount {
        match side {
            AssetSide::Base => &mut self.base,
            AssetSide::Quote => &mut self.quote,
        }
    }
}
