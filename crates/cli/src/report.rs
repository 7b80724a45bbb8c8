//! Table output.

use crate::sandbox::Sandbox;
use crate::script::RunReport;
use anyhow::Result;
use oracle_amm_domain::{Address, AssetSide};
use oracle_amm_engine::prelude::PoolConfig;
use prettytable::{Table, row};

pub fn print_steps(report: &RunReport) {
    let mut table = Table::new();
    table.set_titles(row!["#", "Operation", "Result"]);
    for step in &report.steps {
        let outcome = match &step.outcome {
            Ok(summary) => summary.clone(),
            Err(reason) => format!("REJECTED: {reason}"),
        };
        table.add_row(row![step.step, step.operation, outcome]);
    }
    table.printstd();
}

pub async fn print_pool(sandbox: &Sandbox) -> Result<()> {
    let amm = sandbox.amm();
    let snapshot = amm.snapshot().await;
    let base = sandbox.symbol(AssetSide::Base);
    let quote = sandbox.symbol(AssetSide::Quote);

    let mut table = Table::new();
    table.set_titles(row!["Pool", amm.address()]);
    table.add_row(row![
        format!("{base} reserve"),
        sandbox.human(AssetSide::Base, snapshot.base_reserve)
    ]);
    table.add_row(row![
        format!("{quote} reserve"),
        sandbox.human(AssetSide::Quote, snapshot.quote_reserve)
    ]);
    table.add_row(row![
        format!("{base} fees accrued"),
        sandbox.human(AssetSide::Base, snapshot.base_fees_accrued)
    ]);
    table.add_row(row![
        format!("{quote} fees accrued"),
        sandbox.human(AssetSide::Quote, snapshot.quote_fees_accrued)
    ]);
    table.add_row(row!["Total shares", sandbox.human_shares(snapshot.total_shares)]);
    table.add_row(row!["Providers", snapshot.provider_count]);
    table.add_row(row!["Swap fee", amm.pool().fee_tier.as_percentage()]);
    table.add_row(row!["Update fee budget", amm.update_fee_budget().await]);
    table.add_row(row!["Oracle fees paid", sandbox.oracle_fees_collected().await]);
    if let Ok(prices) = sandbox.prices().await {
        let rate = prices.cross_rate()?;
        table.add_row(row![format!("{base}/{quote}"), rate.value.round_dp(8)]);
        table.add_row(row![format!("{quote}/{base}"), rate.invert().value.round_dp(8)]);
    }
    table.printstd();
    Ok(())
}

pub async fn print_providers(sandbox: &Sandbox) {
    let amm = sandbox.amm();
    let providers = amm.providers().await;
    if providers.is_empty() {
        return;
    }
    let total = amm.total_shares().await;

    let mut table = Table::new();
    table.set_titles(row!["Provider", "Shares", "Share of pool"]);
    for lp in providers {
        let fraction = lp.share_fraction(total) * rust_decimal::Decimal::ONE_HUNDRED;
        table.add_row(row![
            lp.address,
            sandbox.human_shares(lp.shares),
            format!("{}%", fraction.round_dp(4).normalize())
        ]);
    }
    table.printstd();
}

pub async fn print_balances<'a>(
    sandbox: &Sandbox,
    accounts: impl IntoIterator<Item = &'a Address>,
) -> Result<()> {
    let mut table = Table::new();
    table.set_titles(row![
        "Account",
        sandbox.symbol(AssetSide::Base),
        sandbox.symbol(AssetSide::Quote)
    ]);
    for account in accounts {
        let (base, quote) = sandbox.balances(account).await?;
        table.add_row(row![
            account,
            sandbox.human(AssetSide::Base, base),
            sandbox.human(AssetSide::Quote, quote)
        ]);
    }
    table.printstd();
    Ok(())
}

pub async fn print_journal(sandbox: &Sandbox) {
    let amm = sandbox.amm();
    let stats = amm.journal().stats().await;

    let mut table = Table::new();
    table.set_titles(row!["Journal", "Total"]);
    table.add_row(row!["Deposits", stats.deposits]);
    table.add_row(row!["Withdrawals", stats.withdrawals]);
    table.add_row(row!["Swaps", stats.swaps]);
    table.add_row(row![
        format!("{} volume", sandbox.symbol(AssetSide::Base)),
        sandbox.human(AssetSide::Base, stats.base_volume)
    ]);
    table.add_row(row![
        format!("{} fees", sandbox.symbol(AssetSide::Base)),
        sandbox.human(AssetSide::Base, stats.base_fees)
    ]);
    table.add_row(row![
        format!("{} fees", sandbox.symbol(AssetSide::Quote)),
        sandbox.human(AssetSide::Quote, stats.quote_fees)
    ]);
    table.add_row(row!["Shares issued", sandbox.human_shares(stats.shares_issued)]);
    table.add_row(row!["Shares burned", sandbox.human_shares(stats.shares_burned)]);
    table.printstd();
}

pub fn print_config(config: &PoolConfig) {
    let mut table = Table::new();
    table.set_titles(row!["Setting", "Value"]);
    table.add_row(row!["Pool address", config.address]);
    for (label, asset) in [("Base", &config.base), ("Quote", &config.quote)] {
        table.add_row(row![
            label,
            format!(
                "{} ({} decimals, feed {}, token {})",
                asset.symbol, asset.decimals, asset.feed_id, asset.address
            )
        ]);
    }
    let fee = config.to_pool().fee_tier.as_percentage();
    table.add_row(row!["Swap fee", format!("{fee} ({} bps)", fee.to_bps())]);
    table.add_row(row!["Max price age", format!("{}s", config.max_price_age_secs)]);
    table.add_row(row![
        "Max confidence",
        config
            .max_confidence_bps
            .map_or_else(|| "unbounded".to_string(), |bps| format!("{bps} bps"))
    ]);
    table.add_row(row![
        "Max swap amount",
        config
            .max_swap_amount
            .map_or_else(|| "unbounded".to_string(), |max| max.to_string())
    ]);
    table.printstd();
}
