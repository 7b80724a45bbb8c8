//! Oracle valuation of raw token amounts.
//!
//! Oracle prices arrive as `price * 10^exponent` units of the pricing
//! currency per whole token. Token amounts are raw integers scaled by the
//! token's own decimals. Both are folded into one power-of-ten shift so
//! every division happens exactly once, at the end.

use crate::enums::Rounding;
use crate::error::MathError;
use crate::math::fixed_point::{div_rounded, pow10, scale_pow10};
use crate::value_objects::price::PriceQuote;
use primitive_types::U256;

/// Decimals of the common value unit used for share accounting.
pub const VALUE_DECIMALS: u8 = 18;

/// Values `amount` raw units of a token with `decimals` at `quote`, in
/// pricing-currency units scaled by [`VALUE_DECIMALS`]. Rounds down.
pub fn value_of(amount: U256, quote: &PriceQuote, decimals: u8) -> Result<U256, MathError> {
    let price = quote.positive_price()?;
    let shift = i32::from(VALUE_DECIMALS) + quote.exponent - i32::from(decimals);
    let product = amount
        .checked_mul(price)
        .ok_or(MathError::Overflow("value_of"))?;
    scale_pow10(product, shift, Rounding::Down)
}

/// Converts `amount` raw units of one token into raw units of another at
/// the two oracle prices: `amount * from_price / to_price`, with the
/// exponents and token decimals normalized.
pub fn convert(
    amount: U256,
    from: &PriceQuote,
    from_decimals: u8,
    to: &PriceQuote,
    to_decimals: u8,
    rounding: Rounding,
) -> Result<U256, MathError> {
    let from_price = from.positive_price()?;
    let to_price = to.positive_price()?;
    let shift = from.exponent + i32::from(to_decimals) - to.exponent - i32::from(from_decimals);

    let numerator = amount
        .checked_mul(from_price)
        .ok_or(MathError::Overflow("convert"))?;
    let (numerator, denominator) = if shift >= 0 {
        let scaled = numerator
            .checked_mul(pow10(shift.unsigned_abs())?)
            .ok_or(MathError::Overflow("convert"))?;
        (scaled, to_price)
    } else {
        let scaled = to_price
            .checked_mul(pow10(shift.unsigned_abs())?)
            .ok_or(MathError::Overflow("convert"))?;
        (numerator, scaled)
    };
    div_rounded(numerator, denominator, rounding)
}
