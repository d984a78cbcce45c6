//! Score-based matchmaking for Turnhall.
//!
//! Players enqueue per game type; a periodic pairing pass matches the
//! closest ratings, with a wait-time bonus that loosens matches the
//! longer a player sits in the queue. Matched pairs land in a fresh
//! private room that starts immediately.

mod config;
mod error;
mod matchmaker;
mod queue;

pub use config::MatchmakerConfig;
pub use error::MatchmakerError;
pub use matchmaker::{Matchmaker, MatchmakerHandle};
pub use queue::MatchRequest;
