use crate::token::Address;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Share record of an address that has deposited into the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityProvider {
    pub address: Address,
    pub shares: U256,
}

impl LiquidityProvider {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            shares: U256::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_zero()
    }

    /// Calculates this provider's claim relative to the total share supply.
    /// Returns a decimal between 0 and 1.
    pub fn share_fraction(&self, total_shares: U256) -> Decimal {
        if total_shares.is_zero() {
            return Decimal::ZERO;
        }
        // Share supplies routinely exceed the decimal mantissa, so both sides
        // are shifted down together until they fit.
        let shift = total_shares.bits().saturating_sub(90);
        let shares = Decimal::from_str(&(self.shares >> shift).to_string()).unwrap_or_default();
        let total = Decimal::from_str(&(total_shares >> shift).to_string()).unwrap_or_default();
        if total.is_zero() {
            return Decimal::ZERO;
        }
        shares / total
    }
}
