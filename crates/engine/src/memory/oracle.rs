//! In-memory price oracle.

use crate::oracle::{OracleError, PriceOracle, UpdatePayload};
use async_trait::async_trait;
use oracle_amm_domain::{FeedId, PriceQuote};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Price message carried inside an [`UpdatePayload`] understood by
/// [`StaticPriceOracle`]. Encoded as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub feed_id: FeedId,
    pub price: i64,
    #[serde(default)]
    pub confidence: u64,
    pub exponent: i32,
    /// Publication time; defaults to the time the update is applied.
    #[serde(default)]
    pub publish_time: Option<i64>,
}

impl PriceUpdate {
    pub fn new(feed_id: FeedId, price: i64, exponent: i32) -> Self {
        Self {
            feed_id,
            price,
            confidence: 0,
            exponent,
            publish_time: None,
        }
    }

    /// Encodes this update as an oracle payload.
    pub fn to_payload(&self) -> UpdatePayload {
        // Serializing a plain struct of integers and strings cannot fail.
        UpdatePayload(serde_json::to_vec(self).unwrap_or_default())
    }

    fn decode(payload: &UpdatePayload) -> Result<Self, OracleError> {
        serde_json::from_slice(payload.as_bytes())
            .map_err(|e| OracleError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct FeedBook {
    quotes: HashMap<FeedId, PriceQuote>,
    fees_collected: u128,
}

/// Oracle that serves prices set directly or through update payloads.
///
/// Clones share the same feeds.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    fee_per_update: u128,
    book: Arc<RwLock<FeedBook>>,
}

impl StaticPriceOracle {
    /// Creates an oracle with no feeds and free updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Charges `fee` per update payload.
    #[must_use]
    pub fn with_update_fee(mut self, fee: u128) -> Self {
        self.fee_per_update = fee;
        self
    }

    /// Publishes a price stamped with the current time.
    pub async fn set_price(&self, feed_id: &FeedId, price: i64, exponent: i32) {
        let quote = PriceQuote::new(price, 0, exponent, chrono::Utc::now().timestamp());
        self.set_quote(feed_id, quote).await;
    }

    /// Publishes a full quote as given.
    pub async fn set_quote(&self, feed_id: &FeedId, quote: PriceQuote) {
        self.book
            .write()
            .await
            .quotes
            .insert(feed_id.clone(), quote);
    }

    /// Total update fees received.
    pub async fn fees_collected(&self) -> u128 {
        self.book.read().await.fees_collected
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn get_price(&self, feed_id: &FeedId) -> Result<PriceQuote, OracleError> {
        self.book
            .read()
            .await
            .quotes
            .get(feed_id)
            .copied()
            .ok_or_else(|| OracleError::FeedNotFound(feed_id.clone()))
    }

    async fn update_fee(&self, updates: &[UpdatePayload]) -> Result<u128, OracleError> {
        Ok(self.fee_per_update.saturating_mul(updates.len() as u128))
    }

    async fn update_price_feeds(
        &self,
        updates: &[UpdatePayload],
        fee: u128,
    ) -> Result<(), OracleError> {
        let required = self.update_fee(updates).await?;
        if fee < required {
            return Err(OracleError::InsufficientFee {
                required,
                paid: fee,
            });
        }

        // Decode everything first so a bad payload applies nothing.
        let decoded = updates
            .iter()
            .map(PriceUpdate::decode)
            .collect::<Result<Vec<_>, _>>()?;

        let now = chrono::Utc::now().timestamp();
        let mut book = self.book.write().await;
        for update in decoded {
            let publish_time = update.publish_time.unwrap_or(now);
            let newer = book
                .quotes
                .get(&update.feed_id)
                .is_none_or(|q| q.publish_time <= publish_time);
            if newer {
                debug!(feed = %update.feed_id, price = update.price, "Applied price update");
                book.quotes.insert(
                    update.feed_id,
                    PriceQuote::new(update.price, update.confidence, update.exponent, publish_time),
                );
            }
        }
        book.fees_collected = book.fees_collected.saturating_add(fee);
        Ok(())
    }
}
