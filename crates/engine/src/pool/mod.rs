//! Pool accounting.
//!
//! [`OracleAmm`] drives the operations; the plan types compute what an
//! operation does to a [`PoolState`](oracle_amm_domain::PoolState) without
//! touching ledgers or the oracle.

mod engine;
mod shares;
mod swap;

#[cfg(test)]
mod proptest_properties;

pub use engine::OracleAmm;
pub use shares::{DepositPlan, WithdrawalPlan, pool_value, valuation};
pub use swap::SwapPlan;
