//! The pluggable game-rules layer for Turnhall.
//!
//! Game developers implement [`RulesContract`] for each game type and
//! register it in a [`RulesRegistry`] at startup. The orchestrator
//! drives the contract; the contract never touches persistence,
//! transport, or room bookkeeping.
//!
//! Registration is explicit and static — a fixed table built at boot,
//! no dynamic code loading.

mod contract;
mod error;
mod registry;

pub use contract::RulesContract;
pub use error::RulesError;
pub use registry::RulesRegistry;
