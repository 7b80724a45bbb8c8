/// Checked 256-bit fixed-point helpers.
pub mod fixed_point;
/// Oracle valuation and cross-asset conversion.
pub mod valuation;

pub use fixed_point::{BPS_DENOMINATOR, div_rounded, mul_div, pow10, scale_pow10};
pub use valuation::{VALUE_DECIMALS, convert, value_of};
