//! Validation of oracle readings before they are used for pricing.

use crate::error::PoolError;
use oracle_amm_domain::PriceQuote;
use tracing::warn;

/// Rejects non-positive, stale, or low-confidence prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleGuard {
    /// Maximum age of a price in seconds.
    pub max_price_age_secs: u64,
    /// Maximum confidence interval relative to price, in basis points.
    pub max_confidence_bps: Option<u64>,
}

impl Default for OracleGuard {
    fn default() -> Self {
        Self {
            max_price_age_secs: 60,
            max_confidence_bps: None,
        }
    }
}

impl OracleGuard {
    /// Creates a new guard.
    #[must_use]
    pub fn new(max_price_age_secs: u64, max_confidence_bps: Option<u64>) -> Self {
        Self {
            max_price_age_secs,
            max_confidence_bps,
        }
    }

    /// Validates a reading taken at unix time `now`.
    ///
    /// # Errors
    /// Returns [`PoolError::OracleUnavailable`] describing the first failed
    /// check.
    pub fn validate(&self, quote: &PriceQuote, now: i64) -> Result<(), PoolError> {
        if quote.price <= 0 {
            warn!(price = quote.price, "Rejected non-positive oracle price");
            return Err(PoolError::OracleUnavailable(format!(
                "non-positive price {}",
                quote.price
            )));
        }

        let age = quote.age_secs(now);
        let max_age = i64::try_from(self.max_price_age_secs).unwrap_or(i64::MAX);
        if age > max_age {
            warn!(age_secs = age, max_age_secs = max_age, "Rejected stale oracle price");
            return Err(PoolError::OracleUnavailable(format!(
                "price is {age}s old, limit is {max_age}s"
            )));
        }

        if let Some(limit) = self.max_confidence_bps {
            let conf_bps = quote.confidence_bps().unwrap_or(u64::MAX);
            if conf_bps > limit {
                warn!(
                    confidence_bps = conf_bps,
                    limit_bps = limit,
                    "Rejected low-confidence oracle price"
                );
                return Err(PoolError::OracleUnavailable(format!(
                    "confidence interval {conf_bps}bps exceeds {limit}bps"
                )));
            }
        }

        Ok(())
    }
}
