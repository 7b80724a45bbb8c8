//! Events emitted by committed pool operations.

use oracle_amm_domain::{Address, TokenAmount, U256};
use serde::{Deserialize, Serialize};

/// Type of pool event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEventType {
    /// A provider deposited both assets.
    LiquidityAdded,
    /// A provider redeemed shares.
    LiquidityRemoved,
    /// A trader swapped one asset for the other.
    Swapped,
}

/// A committed pool operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub event_type: PoolEventType,
    /// Pool address.
    pub pool: Address,
    /// Provider or trader that submitted the operation.
    pub actor: Address,
    /// Commit time.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Event-specific data.
    pub data: EventData,
}

impl PoolEvent {
    /// Creates a new event stamped with the current time.
    pub fn new(pool: Address, actor: Address, data: EventData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type: data.event_type(),
            pool,
            actor,
            timestamp: chrono::Utc::now(),
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventData {
    LiquidityAdded(LiquidityAddedData),
    LiquidityRemoved(LiquidityRemovedData),
    Swapped(SwapData),
}

impl EventData {
    pub fn event_type(&self) -> PoolEventType {
        match self {
            Self::LiquidityAdded(_) => PoolEventType::LiquidityAdded,
            Self::LiquidityRemoved(_) => PoolEventType::LiquidityRemoved,
            Self::Swapped(_) => PoolEventType::Swapped,
        }
    }
}

/// Data for a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAddedData {
    /// Base asset deposited.
    pub base_amount: TokenAmount,
    /// Quote asset deposited.
    pub quote_amount: TokenAmount,
    /// Deposit valuation in value units.
    pub deposit_value: U256,
    /// Shares issued.
    pub shares: U256,
}

/// Data for a redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemovedData {
    /// Shares burned.
    pub shares: U256,
    /// Total base paid out, fees included.
    pub base_out: TokenAmount,
    /// Total quote paid out, fees included.
    pub quote_out: TokenAmount,
    /// Portion of `base_out` taken from base fees.
    pub base_fees_paid: TokenAmount,
    /// Portion of `quote_out` taken from quote fees.
    pub quote_fees_paid: TokenAmount,
}

/// Data for a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapData {
    /// Whether the trader bought base.
    pub buying_base: bool,
    /// Base-side size of the trade.
    pub amount: TokenAmount,
    /// Amount the trader paid in.
    pub paid: TokenAmount,
    /// Amount the trader received.
    pub received: TokenAmount,
    /// Fee withheld from the output leg.
    pub fee: TokenAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_event_creation() {
        let event = PoolEvent::new(
            Address::from("pool"),
            Address::from("trader"),
            EventData::Swapped(SwapData {
                buying_base: true,
                amount: TokenAmount::from(10u64),
                paid: TokenAmount::from(100u64),
                received: TokenAmount::from(9u64),
                fee: TokenAmount::from(1u64),
            }),
        );

        assert_eq!(event.event_type, PoolEventType::Swapped);
        assert_eq!(event.actor, Address::from("trader"));
        assert!(!event.id.is_empty());

        let json = serde_json::to_string(&event).unwrap();
        let back: PoolEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, event.data);
    }
}
