//! Pool configuration.

use crate::oracle::OracleGuard;
use oracle_amm_domain::math::BPS_DENOMINATOR;
use oracle_amm_domain::{Address, FeeTier, FeedId, Pool, Token, TokenAmount};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest supported token decimals.
pub const MAX_DECIMALS: u8 = 36;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One side of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Token contract or mint address.
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Oracle feed pricing this asset.
    pub feed_id: FeedId,
}

impl AssetConfig {
    pub fn to_token(&self) -> Token {
        Token::new(
            self.address.clone(),
            self.symbol.clone(),
            self.decimals,
            self.feed_id.clone(),
        )
    }
}

/// Configuration of a single base/quote pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Ledger account holding the pool's balances.
    pub address: Address,
    pub base: AssetConfig,
    pub quote: AssetConfig,
    /// Swap fee on the output leg in basis points.
    pub fee_bps: u32,
    /// Maximum oracle price age in seconds.
    pub max_price_age_secs: u64,
    /// Maximum oracle confidence interval in basis points of price.
    pub max_confidence_bps: Option<u64>,
    /// Upper bound on the base-side size of a single swap.
    pub max_swap_amount: Option<TokenAmount>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            address: Address::from("oracle-amm"),
            base: AssetConfig {
                address: Address::from("gold-token"),
                symbol: "GOLD".to_string(),
                decimals: 18,
                feed_id: FeedId::new("gold-usd"),
            },
            quote: AssetConfig {
                address: Address::from("usdc-token"),
                symbol: "USDC".to_string(),
                decimals: 6,
                feed_id: FeedId::new("usdc-usd"),
            },
            fee_bps: 100, // 1%
            max_price_age_secs: 60,
            max_confidence_bps: None,
            max_swap_amount: None,
        }
    }
}

impl PoolConfig {
    /// Loads a JSON configuration file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns an error if parsing or validation fails.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_bps >= BPS_DENOMINATOR {
            return Err(ConfigError::Invalid(format!(
                "fee_bps must be below {BPS_DENOMINATOR}, got {}",
                self.fee_bps
            )));
        }
        for asset in [&self.base, &self.quote] {
            if asset.decimals > MAX_DECIMALS {
                return Err(ConfigError::Invalid(format!(
                    "{} decimals {} exceed {MAX_DECIMALS}",
                    asset.symbol, asset.decimals
                )));
            }
        }
        if self.base.address == self.quote.address {
            return Err(ConfigError::Invalid(
                "base and quote must be distinct tokens".to_string(),
            ));
        }
        if self.base.feed_id == self.quote.feed_id {
            return Err(ConfigError::Invalid(
                "base and quote must use distinct price feeds".to_string(),
            ));
        }
        if self.max_swap_amount.is_some_and(|max| max.is_zero()) {
            return Err(ConfigError::Invalid(
                "max_swap_amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_pool(&self) -> Pool {
        Pool {
            address: self.address.clone(),
            base: self.base.to_token(),
            quote: self.quote.to_token(),
            fee_tier: FeeTier::new(self.fee_bps),
        }
    }

    pub fn guard(&self) -> OracleGuard {
        OracleGuard::new(self.max_price_age_secs, self.max_confidence_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = PoolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_pool().fee_tier.bps, 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PoolConfig::from_json(r#"{ "fee_bps": 30, "max_price_age_secs": 10 }"#)
            .unwrap();
        assert_eq!(config.fee_bps, 30);
        assert_eq!(config.max_price_age_secs, 10);
        assert_eq!(config.base.symbol, "GOLD");
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let err = PoolConfig::from_json(r#"{ "fee_bps": 10000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_same_feed_rejected() {
        let mut config = PoolConfig::default();
        config.quote.feed_id = config.base.feed_id.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&PoolConfig::default()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = PoolConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, PoolConfig::default());
    }
}
