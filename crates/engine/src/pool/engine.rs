//! The pool accounting engine.

use super::shares::{DepositPlan, WithdrawalPlan};
use super::swap::SwapPlan;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::ledger::{AssetLedger, TransferBatch};
use crate::lifecycle::{
    EventData, EventJournal, LiquidityAddedData, LiquidityRemovedData, PoolEvent, SwapData,
};
use crate::oracle::{OracleGuard, PriceOracle, UpdatePayload};
use oracle_amm_domain::{
    Address, AssetSide, LiquidityProvider, Pool, PoolSnapshot, PoolState, PricePair,
    SwapDirection, TokenAmount, U256,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Oracle-priced two-asset pool.
///
/// Every operation runs under one lock from the oracle update until commit:
/// amounts are computed on a staged copy of the state, ledger transfers are
/// issued through a [`TransferBatch`], and the staged state replaces the
/// live one only once every transfer has landed. A failed operation leaves
/// the pool accounting, the ledgers and the journal as they were. The one
/// exception is an oracle update fee: once the oracle accepts the payment
/// it is debited from the update fee budget whatever happens next.
///
/// Dropping an operation's future midway leaves the state untouched but
/// does not reverse transfers that already landed. Callers must drive
/// operations to completion.
pub struct OracleAmm<O: PriceOracle, L: AssetLedger> {
    pool: Pool,
    config: PoolConfig,
    guard: OracleGuard,
    oracle: O,
    base_ledger: L,
    quote_ledger: L,
    state: Mutex<PoolState>,
    journal: EventJournal,
}

impl<O: PriceOracle, L: AssetLedger> OracleAmm<O, L> {
    /// Creates an empty pool.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        config: PoolConfig,
        oracle: O,
        base_ledger: L,
        quote_ledger: L,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        let pool = config.to_pool();
        info!(
            pool = %pool.address,
            base = %pool.base.symbol,
            quote = %pool.quote.symbol,
            fee = %pool.fee_tier.as_percentage(),
            "Created oracle pool"
        );

        Ok(Self {
            guard: config.guard(),
            pool,
            config,
            oracle,
            base_ledger,
            quote_ledger,
            state: Mutex::new(PoolState::new()),
            journal: EventJournal::new(),
        })
    }

    /// Deposits both assets and issues shares to `provider`.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] for a zero amount or a deposit too
    ///   small to mint a share.
    /// - [`PoolError::OracleUnavailable`] if the update or a price read
    ///   fails.
    /// - [`PoolError::TransferFailed`] if either transfer in fails.
    pub async fn add_liquidity(
        &self,
        provider: &Address,
        base_amount: TokenAmount,
        quote_amount: TokenAmount,
        updates: &[UpdatePayload],
    ) -> Result<U256, PoolError> {
        self.deposit(provider, base_amount, quote_amount, updates)
            .await
            .inspect_err(|e| warn!(provider = %provider, error = %e, "Deposit rejected"))
    }

    /// Redeems `shares` of `provider` for a pro rata slice of every reserve
    /// and fee accumulator. Returns `(base_out, quote_out)`.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] when `shares` is zero.
    /// - [`PoolError::InsufficientShares`] when the provider holds fewer.
    /// - [`PoolError::OracleUnavailable`] if the update fails.
    /// - [`PoolError::TransferFailed`] if either payout fails.
    pub async fn remove_liquidity(
        &self,
        provider: &Address,
        shares: U256,
        updates: &[UpdatePayload],
    ) -> Result<(TokenAmount, TokenAmount), PoolError> {
        self.withdraw(provider, shares, updates)
            .await
            .inspect_err(|e| warn!(provider = %provider, error = %e, "Withdrawal rejected"))
    }

    /// Swaps `amount` base units at the oracle price. Returns what the
    /// trader received: base when `buying_base`, quote otherwise.
    ///
    /// # Errors
    /// - [`PoolError::InvalidAmount`] for a zero, oversized or dust amount.
    /// - [`PoolError::InsufficientReserves`] if the payout would overdraw
    ///   a reserve.
    /// - [`PoolError::OracleUnavailable`] if the update or a price read
    ///   fails.
    /// - [`PoolError::TransferFailed`] if either leg fails.
    pub async fn swap(
        &self,
        trader: &Address,
        buying_base: bool,
        amount: TokenAmount,
        updates: &[UpdatePayload],
    ) -> Result<TokenAmount, PoolError> {
        self.execute_swap(trader, SwapDirection::from_buying_base(buying_base), amount, updates)
            .await
            .inspect_err(|e| warn!(trader = %trader, error = %e, "Swap rejected"))
    }

    /// Credits the native balance used to pay oracle update fees. Returns
    /// the new budget.
    ///
    /// # Errors
    /// Returns [`PoolError::Overflow`] if the budget would overflow.
    pub async fn fund_update_fees(&self, amount: u128) -> Result<u128, PoolError> {
        let mut state = self.state.lock().await;
        state.update_fee_budget = state
            .update_fee_budget
            .checked_add(amount)
            .ok_or_else(|| PoolError::Overflow("update fee budget".to_string()))?;
        debug!(amount, budget = state.update_fee_budget, "Funded oracle update fees");
        Ok(state.update_fee_budget)
    }

    async fn deposit(
        &self,
        provider: &Address,
        base_amount: TokenAmount,
        quote_amount: TokenAmount,
        updates: &[UpdatePayload],
    ) -> Result<U256, PoolError> {
        if base_amount.is_zero() || quote_amount.is_zero() {
            return Err(PoolError::InvalidAmount(
                "deposit amounts must both be positive".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        self.refresh_oracle(&mut state, updates).await?;

        let mut staged = state.clone();
        let prices = self.read_prices().await?;
        let plan = DepositPlan::compute(&self.pool, &staged, &prices, base_amount, quote_amount)?;
        debug!(
            deposit_value = %plan.deposit_value,
            shares = %plan.shares,
            "Computed deposit"
        );
        plan.apply(&mut staged, provider)?;

        let mut batch = self.transfers();
        batch
            .transfer(AssetSide::Base, provider, &self.pool.address, base_amount)
            .await?;
        batch
            .transfer(AssetSide::Quote, provider, &self.pool.address, quote_amount)
            .await?;

        *state = staged;
        self.journal
            .record(PoolEvent::new(
                self.pool.address.clone(),
                provider.clone(),
                EventData::LiquidityAdded(LiquidityAddedData {
                    base_amount,
                    quote_amount,
                    deposit_value: plan.deposit_value,
                    shares: plan.shares,
                }),
            ))
            .await;

        info!(
            provider = %provider,
            base = %base_amount,
            quote = %quote_amount,
            shares = %plan.shares,
            total_shares = %state.total_shares,
            "Liquidity added"
        );
        Ok(plan.shares)
    }

    async fn withdraw(
        &self,
        provider: &Address,
        shares: U256,
        updates: &[UpdatePayload],
    ) -> Result<(TokenAmount, TokenAmount), PoolError> {
        let mut state = self.state.lock().await;
        // Share checks come first so a bad request pays no update fee.
        let plan = WithdrawalPlan::compute(&state, provider, shares)?;
        let base_out = plan.base_out()?;
        let quote_out = plan.quote_out()?;

        self.refresh_oracle(&mut state, updates).await?;
        let mut staged = state.clone();
        plan.apply(&mut staged, provider)?;
        debug!(
            shares = %shares,
            base_out = %base_out,
            quote_out = %quote_out,
            "Computed withdrawal"
        );

        let mut batch = self.transfers();
        batch
            .transfer(AssetSide::Base, &self.pool.address, provider, base_out)
            .await?;
        batch
            .transfer(AssetSide::Quote, &self.pool.address, provider, quote_out)
            .await?;

        *state = staged;
        self.journal
            .record(PoolEvent::new(
                self.pool.address.clone(),
                provider.clone(),
                EventData::LiquidityRemoved(LiquidityRemovedData {
                    shares,
                    base_out,
                    quote_out,
                    base_fees_paid: plan.base_fee_part,
                    quote_fees_paid: plan.quote_fee_part,
                }),
            ))
            .await;

        info!(
            provider = %provider,
            shares = %shares,
            base_out = %base_out,
            quote_out = %quote_out,
            total_shares = %state.total_shares,
            "Liquidity removed"
        );
        Ok((base_out, quote_out))
    }

    async fn execute_swap(
        &self,
        trader: &Address,
        direction: SwapDirection,
        amount: TokenAmount,
        updates: &[UpdatePayload],
    ) -> Result<TokenAmount, PoolError> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount(
                "swap amount must be positive".to_string(),
            ));
        }
        if let Some(max) = self.config.max_swap_amount.filter(|max| amount > *max) {
            return Err(PoolError::InvalidAmount(format!(
                "swap amount {amount} exceeds limit {max}"
            )));
        }

        let mut state = self.state.lock().await;
        self.refresh_oracle(&mut state, updates).await?;

        let mut staged = state.clone();
        let prices = self.read_prices().await?;
        let plan = SwapPlan::compute(&self.pool, &staged, &prices, direction, amount)?;
        debug!(
            direction = ?direction,
            quote_equivalent = %plan.quote_equivalent,
            gross = %plan.gross,
            fee = %plan.fee,
            "Computed swap"
        );
        plan.apply(&mut staged)?;

        let mut batch = self.transfers();
        batch
            .transfer(direction.paid_side(), trader, &self.pool.address, plan.paid())
            .await?;
        batch
            .transfer(
                direction.received_side(),
                &self.pool.address,
                trader,
                plan.received,
            )
            .await?;

        *state = staged;
        self.journal
            .record(PoolEvent::new(
                self.pool.address.clone(),
                trader.clone(),
                EventData::Swapped(SwapData {
                    buying_base: direction.is_buying_base(),
                    amount,
                    paid: plan.paid(),
                    received: plan.received,
                    fee: plan.fee,
                }),
            ))
            .await;

        info!(
            trader = %trader,
            buying_base = direction.is_buying_base(),
            amount = %amount,
            paid = %plan.paid(),
            received = %plan.received,
            fee = %plan.fee,
            "Swap executed"
        );
        Ok(plan.received)
    }

    /// Forwards `updates` to the oracle and pays its fee out of the live
    /// budget. A paid fee stays spent even if the operation fails later.
    async fn refresh_oracle(
        &self,
        state: &mut PoolState,
        updates: &[UpdatePayload],
    ) -> Result<(), PoolError> {
        if updates.is_empty() {
            return Ok(());
        }

        let fee = self.oracle.update_fee(updates).await?;
        let budget = state.update_fee_budget;
        if fee > budget {
            return Err(PoolError::OracleUnavailable(format!(
                "update fee {fee} exceeds fee budget {budget}"
            )));
        }
        self.oracle.update_price_feeds(updates, fee).await?;
        state.update_fee_budget = budget - fee;

        debug!(updates = updates.len(), fee, "Forwarded oracle updates");
        Ok(())
    }

    /// Reads and validates both prices.
    async fn read_prices(&self) -> Result<PricePair, PoolError> {
        let now = chrono::Utc::now().timestamp();

        let base = self.oracle.get_price(&self.pool.base.feed_id).await?;
        self.guard.validate(&base, now)?;
        let quote = self.oracle.get_price(&self.pool.quote.feed_id).await?;
        self.guard.validate(&quote, now)?;

        Ok(PricePair::new(base, quote))
    }

    fn transfers(&self) -> TransferBatch<'_, L> {
        TransferBatch::new(&self.base_ledger, &self.quote_ledger)
    }

    // Accessors

    /// Base units backing outstanding shares, fees excluded.
    pub async fn base_reserve(&self) -> TokenAmount {
        self.state.lock().await.base_reserve
    }

    /// Quote units backing outstanding shares, fees excluded.
    pub async fn quote_reserve(&self) -> TokenAmount {
        self.state.lock().await.quote_reserve
    }

    /// Shares outstanding across all providers.
    pub async fn total_shares(&self) -> U256 {
        self.state.lock().await.total_shares
    }

    /// Swap fees collected in base and not yet withdrawn.
    pub async fn base_fees_accrued(&self) -> TokenAmount {
        self.state.lock().await.fees.base
    }

    /// Swap fees collected in quote and not yet withdrawn.
    pub async fn quote_fees_accrued(&self) -> TokenAmount {
        self.state.lock().await.fees.quote
    }

    /// Shares held by `provider`, zero if unknown.
    pub async fn shares_of(&self, provider: &Address) -> U256 {
        self.state.lock().await.shares_of(provider)
    }

    /// Every provider with a non-zero balance, ordered by address.
    pub async fn providers(&self) -> Vec<LiquidityProvider> {
        self.state.lock().await.providers.values().cloned().collect()
    }

    /// Native balance left for oracle update fees.
    pub async fn update_fee_budget(&self) -> u128 {
        self.state.lock().await.update_fee_budget
    }

    /// All counters read under one lock.
    pub async fn snapshot(&self) -> PoolSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Copy of the full accounting state.
    pub async fn state(&self) -> PoolState {
        self.state.lock().await.clone()
    }

    /// Committed events in order.
    pub async fn events(&self) -> Vec<PoolEvent> {
        self.journal.all().await
    }

    /// Event journal with queries and aggregate stats.
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Ledger account holding the pool's assets.
    pub fn address(&self) -> &Address {
        &self.pool.address
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn ledger(&self, side: AssetSide) -> &L {
        match side {
            AssetSide::Base => &self.base_ledger,
            AssetSide::Quote => &self.quote_ledger,
        }
    }
}
