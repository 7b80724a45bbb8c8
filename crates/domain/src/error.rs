use thiserror::Error;

/// Errors raised by the fixed-point and valuation math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// An intermediate value did not fit in 256 bits.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
    /// A subtraction went below zero.
    #[error("arithmetic underflow in {0}")]
    Underflow(&'static str),
    /// Division by a zero denominator.
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),
    /// The oracle price cannot be used for valuation.
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    /// A value could not be converted between representations.
    #[error("conversion error: {0}")]
    Conversion(String),
}
