//! A pool wired to in-memory collaborators.

use anyhow::{Context, Result};
use oracle_amm_domain::math::VALUE_DECIMALS;
use oracle_amm_domain::value_objects::amount::Amount;
use oracle_amm_domain::{Address, AssetSide, PricePair, TokenAmount, U256};
use oracle_amm_engine::prelude::*;
use rust_decimal::Decimal;

/// Exponent of every price the sandbox publishes.
pub const PRICE_EXPONENT: i32 = -6;

pub type Amm = OracleAmm<StaticPriceOracle, InMemoryLedger>;

pub struct Sandbox {
    amm: Amm,
    oracle: StaticPriceOracle,
    base: InMemoryLedger,
    quote: InMemoryLedger,
}

impl Sandbox {
    /// Builds an empty pool whose oracle charges `update_fee` per payload.
    pub fn new(config: PoolConfig, update_fee: u128) -> Result<Self> {
        let oracle = StaticPriceOracle::new().with_update_fee(update_fee);
        let base = InMemoryLedger::new(config.base.symbol.clone(), config.address.clone());
        let quote = InMemoryLedger::new(config.quote.symbol.clone(), config.address.clone());
        let amm = OracleAmm::new(config, oracle.clone(), base.clone(), quote.clone())?;

        Ok(Self {
            amm,
            oracle,
            base,
            quote,
        })
    }

    pub fn amm(&self) -> &Amm {
        &self.amm
    }

    fn ledger(&self, side: AssetSide) -> &InMemoryLedger {
        match side {
            AssetSide::Base => &self.base,
            AssetSide::Quote => &self.quote,
        }
    }

    fn decimals(&self, side: AssetSide) -> u8 {
        self.amm.pool().token(side).decimals
    }

    /// Converts a human quantity of `side` into raw units.
    pub fn raw_amount(&self, side: AssetSide, amount: Decimal) -> Result<TokenAmount> {
        let parsed = Amount::from_decimal(amount, self.decimals(side))
            .with_context(|| format!("invalid {side} amount {amount}"))?;
        Ok(TokenAmount(parsed.raw))
    }

    pub fn raw_shares(&self, shares: Decimal) -> Result<U256> {
        Ok(Amount::from_decimal(shares, VALUE_DECIMALS)
            .with_context(|| format!("invalid share amount {shares}"))?
            .raw)
    }

    /// Formats raw units of `side` as a human quantity.
    pub fn human(&self, side: AssetSide, amount: TokenAmount) -> String {
        Amount::new(amount.as_u256(), self.decimals(side)).to_string()
    }

    pub fn human_shares(&self, shares: U256) -> String {
        Amount::new(shares, VALUE_DECIMALS).to_string()
    }

    pub fn symbol(&self, side: AssetSide) -> &str {
        self.ledger(side).symbol()
    }

    /// Mints both assets to `account` and approves the pool to move them.
    pub async fn fund(&self, account: &Address, base: TokenAmount, quote: TokenAmount) {
        for (side, amount) in [(AssetSide::Base, base), (AssetSide::Quote, quote)] {
            let ledger = self.ledger(side);
            ledger.mint(account, amount).await;
            ledger.approve_max(account).await;
        }
    }

    /// Builds an oracle update publishing `price` for `side`.
    pub fn price_update(&self, side: AssetSide, price: Decimal) -> Result<UpdatePayload> {
        let scaled = Amount::from_decimal(price, PRICE_EXPONENT.unsigned_abs() as u8)
            .with_context(|| format!("invalid {side} price {price}"))?;
        let mantissa = i64::try_from(scaled.raw.low_u128())
            .with_context(|| format!("{side} price {price} is out of range"))?;
        let feed_id = self.amm.pool().token(side).feed_id.clone();
        Ok(PriceUpdate::new(feed_id, mantissa, PRICE_EXPONENT).to_payload())
    }

    /// Latest oracle prices, unvalidated.
    pub async fn prices(&self) -> Result<PricePair> {
        let pool = self.amm.pool();
        let base = self.oracle.get_price(&pool.base.feed_id).await?;
        let quote = self.oracle.get_price(&pool.quote.feed_id).await?;
        Ok(PricePair::new(base, quote))
    }

    pub async fn balances(&self, account: &Address) -> Result<(TokenAmount, TokenAmount)> {
        Ok((
            self.base.balance_of(account).await?,
            self.quote.balance_of(account).await?,
        ))
    }

    pub async fn oracle_fees_collected(&self) -> u128 {
        self.oracle.fees_collected().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_conversions() {
        let sandbox = Sandbox::new(PoolConfig::default(), 0).unwrap();

        let gold = sandbox.raw_amount(AssetSide::Base, dec!(9.9)).unwrap();
        assert_eq!(gold, TokenAmount(U256::from(9_900_000_000_000_000_000u128)));
        assert_eq!(sandbox.human(AssetSide::Base, gold), "9.9");

        let usdc = sandbox.raw_amount(AssetSide::Quote, dec!(1001)).unwrap();
        assert_eq!(usdc, TokenAmount::from(1_001_000_000u64));
        assert_eq!(sandbox.human(AssetSide::Quote, usdc), "1001");

        assert!(sandbox.raw_amount(AssetSide::Quote, dec!(-1)).is_err());
    }

    #[tokio::test]
    async fn test_price_update_round_trip() {
        let sandbox = Sandbox::new(PoolConfig::default(), 0).unwrap();
        let update = sandbox.price_update(AssetSide::Base, dec!(10)).unwrap();

        sandbox
            .oracle
            .update_price_feeds(&[update], 0)
            .await
            .unwrap();
        let quote = sandbox
            .oracle
            .get_price(&sandbox.amm().pool().base.feed_id)
            .await
            .unwrap();
        assert_eq!(quote.price, 10_000_000);
        assert_eq!(quote.exponent, PRICE_EXPONENT);
    }
}
