//! Append-only journal of committed pool operations.

use super::{EventData, PoolEvent, PoolEventType};
use oracle_amm_domain::{Address, TokenAmount, U256};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Journal of pool events in commit order.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    events: Arc<RwLock<Vec<PoolEvent>>>,
}

impl EventJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub async fn record(&self, event: PoolEvent) {
        self.events.write().await.push(event);
    }

    /// All events in commit order.
    pub async fn all(&self) -> Vec<PoolEvent> {
        self.events.read().await.clone()
    }

    /// Events submitted by `actor`.
    pub async fn for_actor(&self, actor: &Address) -> Vec<PoolEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| &e.actor == actor)
            .cloned()
            .collect()
    }

    /// Events of one type.
    pub async fn of_type(&self, event_type: PoolEventType) -> Vec<PoolEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Aggregates over every recorded event.
    pub async fn stats(&self) -> JournalStats {
        let events = self.events.read().await;
        let mut stats = JournalStats::default();

        for event in events.iter() {
            match &event.data {
                EventData::LiquidityAdded(d) => {
                    stats.deposits += 1;
                    stats.shares_issued = stats.shares_issued.saturating_add(d.shares);
                }
                EventData::LiquidityRemoved(d) => {
                    stats.withdrawals += 1;
                    stats.shares_burned = stats.shares_burned.saturating_add(d.shares);
                }
                EventData::Swapped(d) => {
                    stats.swaps += 1;
                    stats.base_volume = TokenAmount(stats.base_volume.0.saturating_add(d.amount.0));
                    if d.buying_base {
                        stats.base_fees = TokenAmount(stats.base_fees.0.saturating_add(d.fee.0));
                    } else {
                        stats.quote_fees = TokenAmount(stats.quote_fees.0.saturating_add(d.fee.0));
                    }
                }
            }
        }

        stats
    }
}

/// Aggregate statistics across the journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalStats {
    pub deposits: u32,
    pub withdrawals: u32,
    pub swaps: u32,
    /// Sum of swap sizes in base units.
    pub base_volume: TokenAmount,
    /// Base fees charged over the pool's lifetime.
    pub base_fees: TokenAmount,
    /// Quote fees charged over the pool's lifetime.
    pub quote_fees: TokenAmount,
    pub shares_issued: U256,
    pub shares_burned: U256,
}
