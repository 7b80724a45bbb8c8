//! Pool lifecycle events.
//!
//! Every committed operation is journaled:
//! - Deposits
//! - Redemptions
//! - Swaps
//!
//! Failed operations leave no trace.

mod events;
mod journal;

pub use events::*;
pub use journal::*;
