//! Scripted operation sequences.
//!
//! A script is a JSON document:
//!
//! ```json
//! {
//!   "update_fee": 1,
//!   "operations": [
//!     { "op": "fund_update_fees", "amount": 10 },
//!     { "op": "fund", "account": "alice", "base": "100", "quote": "1000" },
//!     { "op": "set_price", "base": "10", "quote": "1" },
//!     { "op": "add_liquidity", "provider": "alice", "base": "100", "quote": "1000" },
//!     { "op": "swap", "trader": "alice", "buying_base": false, "amount": "1" },
//!     { "op": "remove_liquidity", "provider": "alice" }
//!   ]
//! }
//! ```
//!
//! Quantities are human units of the asset. Prices set with `set_price` are
//! sent as oracle update payloads with the next pool operation.

use crate::sandbox::Sandbox;
use anyhow::{Context, Result};
use oracle_amm_domain::{Address, AssetSide};
use oracle_amm_engine::prelude::UpdatePayload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Native fee the oracle charges per update payload.
    #[serde(default)]
    pub update_fee: u128,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Mint both assets to an account and approve the pool.
    Fund {
        account: String,
        #[serde(default)]
        base: Decimal,
        #[serde(default)]
        quote: Decimal,
    },
    /// Top up the pool's oracle fee budget.
    FundUpdateFees { amount: u128 },
    /// Queue oracle prices for the next pool operation.
    SetPrice {
        #[serde(default)]
        base: Option<Decimal>,
        #[serde(default)]
        quote: Option<Decimal>,
    },
    AddLiquidity {
        provider: String,
        base: Decimal,
        quote: Decimal,
    },
    /// Redeem shares; all of the provider's shares when omitted.
    RemoveLiquidity {
        provider: String,
        #[serde(default)]
        shares: Option<Decimal>,
    },
    Swap {
        trader: String,
        buying_base: bool,
        amount: Decimal,
    },
}

impl Script {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse script {}", path.display()))
    }

    /// Deposit 100 GOLD and 1000 USDC at 10.0 and 1.0, buy 10 GOLD, sell
    /// 10 GOLD, then withdraw everything.
    pub fn reference() -> Self {
        let provider = "provider".to_string();
        let trader = "trader".to_string();
        let prices = || Operation::SetPrice {
            base: Some(Decimal::TEN),
            quote: Some(Decimal::ONE),
        };

        Self {
            update_fee: 1,
            operations: vec![
                Operation::FundUpdateFees { amount: 8 },
                Operation::Fund {
                    account: provider.clone(),
                    base: Decimal::ONE_HUNDRED,
                    quote: Decimal::ONE_THOUSAND,
                },
                Operation::Fund {
                    account: trader.clone(),
                    base: Decimal::TEN,
                    quote: Decimal::ONE_HUNDRED,
                },
                prices(),
                Operation::AddLiquidity {
                    provider: provider.clone(),
                    base: Decimal::ONE_HUNDRED,
                    quote: Decimal::ONE_THOUSAND,
                },
                prices(),
                Operation::Swap {
                    trader: trader.clone(),
                    buying_base: true,
                    amount: Decimal::TEN,
                },
                prices(),
                Operation::Swap {
                    trader,
                    buying_base: false,
                    amount: Decimal::TEN,
                },
                prices(),
                Operation::RemoveLiquidity {
                    provider,
                    shares: None,
                },
            ],
        }
    }
}

/// Result of one script step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: usize,
    pub operation: String,
    pub outcome: Result<String, String>,
}

/// Output of a script run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    /// Every account the script touched, in name order.
    pub accounts: BTreeSet<Address>,
}

/// Runs `script` against `sandbox`. Rejected pool operations are reported
/// and the run continues; malformed quantities abort it.
pub async fn run(sandbox: &Sandbox, script: &Script) -> Result<RunReport> {
    let mut report = RunReport::default();
    let mut pending: Vec<UpdatePayload> = Vec::new();

    for (index, operation) in script.operations.iter().enumerate() {
        let step = index + 1;
        debug!(step, operation = ?operation, "Running script step");
        let amm = sandbox.amm();

        let (label, outcome) = match operation {
            Operation::Fund {
                account,
                base,
                quote,
            } => {
                let address = Address::from(account.as_str());
                let base_raw = sandbox.raw_amount(AssetSide::Base, *base)?;
                let quote_raw = sandbox.raw_amount(AssetSide::Quote, *quote)?;
                sandbox.fund(&address, base_raw, quote_raw).await;
                report.accounts.insert(address);
                (
                    format!("fund {account}"),
                    Ok(format!(
                        "{base} {} + {quote} {}",
                        sandbox.symbol(AssetSide::Base),
                        sandbox.symbol(AssetSide::Quote)
                    )),
                )
            }
            Operation::FundUpdateFees { amount } => (
                "fund update fees".to_string(),
                amm.fund_update_fees(*amount)
                    .await
                    .map(|budget| format!("budget {budget}"))
                    .map_err(|e| e.to_string()),
            ),
            Operation::SetPrice { base, quote } => {
                let mut set = Vec::new();
                for (side, price) in [(AssetSide::Base, base), (AssetSide::Quote, quote)] {
                    if let Some(price) = price {
                        pending.push(sandbox.price_update(side, *price)?);
                        set.push(format!("{} = {price}", sandbox.symbol(side)));
                    }
                }
                ("set price".to_string(), Ok(set.join(", ")))
            }
            Operation::AddLiquidity {
                provider,
                base,
                quote,
            } => {
                let address = Address::from(provider.as_str());
                let base_raw = sandbox.raw_amount(AssetSide::Base, *base)?;
                let quote_raw = sandbox.raw_amount(AssetSide::Quote, *quote)?;
                let updates = std::mem::take(&mut pending);
                report.accounts.insert(address.clone());
                (
                    format!("add liquidity {provider}"),
                    amm.add_liquidity(&address, base_raw, quote_raw, &updates)
                        .await
                        .map(|shares| format!("{} shares", sandbox.human_shares(shares)))
                        .map_err(|e| e.to_string()),
                )
            }
            Operation::RemoveLiquidity { provider, shares } => {
                let address = Address::from(provider.as_str());
                let shares = match shares {
                    Some(shares) => sandbox.raw_shares(*shares)?,
                    None => amm.shares_of(&address).await,
                };
                let updates = std::mem::take(&mut pending);
                report.accounts.insert(address.clone());
                (
                    format!("remove liquidity {provider}"),
                    amm.remove_liquidity(&address, shares, &updates)
                        .await
                        .map(|(base_out, quote_out)| {
                            format!(
                                "{} {} + {} {}",
                                sandbox.human(AssetSide::Base, base_out),
                                sandbox.symbol(AssetSide::Base),
                                sandbox.human(AssetSide::Quote, quote_out),
                                sandbox.symbol(AssetSide::Quote)
                            )
                        })
                        .map_err(|e| e.to_string()),
                )
            }
            Operation::Swap {
                trader,
                buying_base,
                amount,
            } => {
                let address = Address::from(trader.as_str());
                let raw = sandbox.raw_amount(AssetSide::Base, *amount)?;
                let updates = std::mem::take(&mut pending);
                let (verb, out_side) = if *buying_base {
                    ("buy", AssetSide::Base)
                } else {
                    ("sell", AssetSide::Quote)
                };
                report.accounts.insert(address.clone());
                (
                    format!("{trader} {verb} {amount} {}", sandbox.symbol(AssetSide::Base)),
                    amm.swap(&address, *buying_base, raw, &updates)
                        .await
                        .map(|received| {
                            format!(
                                "received {} {}",
                                sandbox.human(out_side, received),
                                sandbox.symbol(out_side)
                            )
                        })
                        .map_err(|e| e.to_string()),
                )
            }
        };

        report.steps.push(StepReport {
            step,
            operation: label,
            outcome,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_amm_engine::prelude::PoolConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_script() {
        let json = r#"{
            "operations": [
                { "op": "fund", "account": "alice", "base": "100", "quote": "1000" },
                { "op": "set_price", "base": "10.5" },
                { "op": "swap", "trader": "alice", "buying_base": true, "amount": "0.25" },
                { "op": "remove_liquidity", "provider": "alice" }
            ]
        }"#;
        let script: Script = serde_json::from_str(json).unwrap();

        assert_eq!(script.update_fee, 0);
        assert_eq!(
            script.operations[1],
            Operation::SetPrice {
                base: Some(dec!(10.5)),
                quote: None
            }
        );
        assert_eq!(
            script.operations[3],
            Operation::RemoveLiquidity {
                provider: "alice".to_string(),
                shares: None
            }
        );
    }

    #[tokio::test]
    async fn test_reference_script() {
        let script = Script::reference();
        let sandbox = Sandbox::new(PoolConfig::default(), script.update_fee).unwrap();
        let report = run(&sandbox, &script).await.unwrap();

        assert!(report.steps.iter().all(|s| s.outcome.is_ok()));
        assert_eq!(
            report.steps[4].outcome,
            Ok("2000 shares".to_string())
        );
        assert_eq!(
            report.steps.last().map(|s| s.outcome.clone()),
            Some(Ok("100.1 GOLD + 1001 USDC".to_string()))
        );

        let provider = Address::from("provider");
        let (base, quote) = sandbox.balances(&provider).await.unwrap();
        assert_eq!(sandbox.human(AssetSide::Base, base), "100.1");
        assert_eq!(sandbox.human(AssetSide::Quote, quote), "1001");

        // Four operations, two payloads each, one unit per payload.
        assert_eq!(sandbox.oracle_fees_collected().await, 8);
        assert_eq!(sandbox.amm().update_fee_budget().await, 0);
    }

    #[tokio::test]
    async fn test_rejected_step_does_not_stop_run() {
        let script = Script {
            update_fee: 0,
            operations: vec![
                Operation::Fund {
                    account: "bob".to_string(),
                    base: dec!(1),
                    quote: dec!(10),
                },
                Operation::SetPrice {
                    base: Some(dec!(10)),
                    quote: Some(dec!(1)),
                },
                Operation::Swap {
                    trader: "bob".to_string(),
                    buying_base: true,
                    amount: dec!(1),
                },
                Operation::AddLiquidity {
                    provider: "bob".to_string(),
                    base: dec!(1),
                    quote: dec!(10),
                },
            ],
        };
        let sandbox = Sandbox::new(PoolConfig::default(), 0).unwrap();
        let report = run(&sandbox, &script).await.unwrap();

        assert!(report.steps[2].outcome.is_err());
        assert_eq!(report.steps[3].outcome, Ok("20 shares".to_string()));
        assert_eq!(report.accounts.len(), 1);
    }
}
