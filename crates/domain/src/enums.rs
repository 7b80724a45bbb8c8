use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two assets held by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSide {
    Base,
    Quote,
}

impl AssetSide {
    /// Returns the other side of the pair.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Base => Self::Quote,
            Self::Quote => Self::Base,
        }
    }
}

impl fmt::Display for AssetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Quote => write!(f, "quote"),
        }
    }
}

/// Direction of a swap, always expressed from the trader's point of view
/// relative to the base asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Trader pays quote and receives base.
    BuyBase,
    /// Trader pays base and receives quote.
    SellBase,
}

impl SwapDirection {
    #[must_use]
    pub fn from_buying_base(buying_base: bool) -> Self {
        if buying_base {
            Self::BuyBase
        } else {
            Self::SellBase
        }
    }

    #[must_use]
    pub fn is_buying_base(self) -> bool {
        matches!(self, Self::BuyBase)
    }

    /// Side the trader pays into the pool.
    #[must_use]
    pub fn paid_side(self) -> AssetSide {
        match self {
            Self::BuyBase => AssetSide::Quote,
            Self::SellBase => AssetSide::Base,
        }
    }

    /// Side the pool pays out to the trader. Fees are withheld on this side.
    #[must_use]
    pub fn received_side(self) -> AssetSide {
        self.paid_side().opposite()
    }
}

/// Rounding mode for fixed-point division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Toward zero.
    #[default]
    Down,
    /// Away from zero.
    Up,
}
