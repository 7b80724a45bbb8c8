//! In-memory oracle and ledger implementations.
//!
//! These back the test suite and the command line sandbox. They follow the
//! same contracts as production collaborators (allowances, update fees,
//! publish times) but keep everything in process.

mod ledger;
mod oracle;

pub use ledger::InMemoryLedger;
pub use oracle::{PriceUpdate, StaticPriceOracle};
