use crate::error::MathError;
use crate::math::fixed_point::BPS_DENOMINATOR;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Human-readable price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }

    /// Price of `self` expressed in units of `other`.
    pub fn ratio(&self, other: &Price) -> Option<Self> {
        self.value.checked_div(other.value).map(Self::new)
    }
}

/// A single oracle reading: `price * 10^exponent`, with a confidence
/// interval in the same scale. Never cached across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: i64,
    pub confidence: u64,
    pub exponent: i32,
    /// Unix seconds at which the oracle published this price.
    pub publish_time: i64,
}

impl PriceQuote {
    pub fn new(price: i64, confidence: u64, exponent: i32, publish_time: i64) -> Self {
        Self {
            price,
            confidence,
            exponent,
            publish_time,
        }
    }

    /// Returns the mantissa as an unsigned integer, rejecting zero and
    /// negative prices.
    pub fn positive_price(&self) -> Result<U256, MathError> {
        if self.price <= 0 {
            return Err(MathError::InvalidPrice(format!(
                "non-positive oracle price {}",
                self.price
            )));
        }
        Ok(U256::from(self.price.unsigned_abs()))
    }

    /// Confidence interval relative to the price, in basis points. `None`
    /// when the price is not positive.
    pub fn confidence_bps(&self) -> Option<u64> {
        if self.price <= 0 {
            return None;
        }
        let bps = u128::from(self.confidence) * u128::from(BPS_DENOMINATOR)
            / u128::from(self.price.unsigned_abs());
        Some(u64::try_from(bps).unwrap_or(u64::MAX))
    }

    /// Seconds elapsed between publication and `now`.
    pub fn age_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.publish_time)
    }

    pub fn to_price(&self) -> Result<Price, MathError> {
        let value = if self.exponent <= 0 {
            Decimal::try_from_i128_with_scale(i128::from(self.price), self.exponent.unsigned_abs())
                .map_err(|e| MathError::Conversion(e.to_string()))?
        } else {
            let factor = 10i64
                .checked_pow(self.exponent.unsigned_abs())
                .ok_or(MathError::Overflow("price exponent"))?;
            Decimal::from(self.price)
                .checked_mul(Decimal::from(factor))
                .ok_or(MathError::Overflow("price exponent"))?
        };
        Ok(Price::new(value))
    }
}

/// Base and quote readings taken for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePair {
    pub base: PriceQuote,
    pub quote: PriceQuote,
}

impl PricePair {
    pub fn new(base: PriceQuote, quote: PriceQuote) -> Self {
        Self { base, quote }
    }

    /// Base asset priced in quote asset units.
    pub fn cross_rate(&self) -> Result<Price, MathError> {
        let base = self.base.to_price()?;
        let quote = self.quote.to_price()?;
        base.ratio(&quote)
            .ok_or(MathError::DivisionByZero("cross_rate"))
    }
}
