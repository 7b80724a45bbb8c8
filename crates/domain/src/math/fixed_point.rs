use crate::enums::Rounding;
use crate::error::MathError;
use primitive_types::U256;

/// 100% expressed in basis points.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Returns `10^exp`, failing once the power no longer fits in 256 bits.
pub fn pow10(exp: u32) -> Result<U256, MathError> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(MathError::Overflow("pow10"))
}

/// Divides `numerator` by `denominator` with explicit rounding.
pub fn div_rounded(
    numerator: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero("div_rounded"));
    }
    let (quotient, remainder) = numerator.div_mod(denominator);
    match rounding {
        Rounding::Up if !remainder.is_zero() => quotient
            .checked_add(U256::one())
            .ok_or(MathError::Overflow("div_rounded")),
        _ => Ok(quotient),
    }
}

/// Computes `a * b / denominator` without losing precision in the product.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Result<U256, MathError> {
    let product = a.checked_mul(b).ok_or(MathError::Overflow("mul_div"))?;
    div_rounded(product, denominator, rounding)
}

/// Scales `value` by `10^exp`. Negative exponents divide with the given rounding.
pub fn scale_pow10(value: U256, exp: i32, rounding: Rounding) -> Result<U256, MathError> {
    if exp >= 0 {
        value
            .checked_mul(pow10(exp.unsigned_abs())?)
            .ok_or(MathError::Overflow("scale_pow10"))
    } else {
        div_rounded(value, pow10(exp.unsigned_abs())?, rounding)
    }
}
