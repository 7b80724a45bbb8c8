use crate::error::MathError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw amount paired with its decimals, for conversion to and from
/// human-readable quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parses a non-negative decimal quantity, truncating digits beyond
    /// `decimals`.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self, MathError> {
        if d.is_sign_negative() {
            return Err(MathError::Conversion(format!("negative amount {d}")));
        }
        let scale = u32::from(decimals);
        let mut scaled = d.trunc_with_scale(scale);
        scaled.rescale(scale);
        if scaled.scale() != scale {
            return Err(MathError::Conversion(format!(
                "{d} cannot be represented with {decimals} decimals"
            )));
        }
        let mantissa = u128::try_from(scaled.mantissa())
            .map_err(|e| MathError::Conversion(e.to_string()))?;
        Ok(Self {
            raw: U256::from(mantissa),
            decimals,
        })
    }

    pub fn to_decimal(&self) -> Result<Decimal, MathError> {
        if self.raw.bits() > 127 {
            return Err(MathError::Conversion(format!(
                "{} does not fit a decimal",
                self.raw
            )));
        }
        let raw = i128::try_from(self.raw.low_u128())
            .map_err(|e| MathError::Conversion(e.to_string()))?;
        Decimal::try_from_i128_with_scale(raw, u32::from(self.decimals))
            .map(|d| d.normalize())
            .map_err(|e| MathError::Conversion(e.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(d) => write!(f, "{d}"),
            Err(_) => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}
