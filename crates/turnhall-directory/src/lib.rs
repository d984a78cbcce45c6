//! Player tracking for Turnhall.
//!
//! The [`PlayerDirectory`] is the authority on who the server knows:
//! connection status, last activity, and accumulated statistics
//! (games played/won/lost/tied, rating). It is a leaf — no other
//! Turnhall layer sits below it.
//!
//! # Concurrency
//!
//! The directory is shared by every connection handler plus the
//! matchmaker, so the player map is a `DashMap`: concurrent reads and
//! per-player independent writes, no cross-player atomicity. Nothing
//! here ever updates two players as a unit — game results are applied
//! player by player.

mod directory;
mod error;
mod player;

pub use directory::PlayerDirectory;
pub use error::DirectoryError;
pub use player::{INITIAL_RATING, Player, PlayerStats};
