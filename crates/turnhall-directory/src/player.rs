//! The player record and its statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use turnhall_protocol::{Outcome, PlayerId};

/// Rating every new player starts from.
pub const INITIAL_RATING: i32 = 1000;

/// Accumulated game statistics for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub rating: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            played: 0,
            won: 0,
            lost: 0,
            tied: 0,
            rating: INITIAL_RATING,
        }
    }
}

impl PlayerStats {
    /// Records one finished game.
    ///
    /// The rating floor is zero — a delta can never push a player
    /// negative.
    pub fn record(&mut self, outcome: Outcome, rating_delta: i32) {
        self.played += 1;
        match outcome {
            Outcome::Win => self.won += 1,
            Outcome::Loss => self.lost += 1,
            Outcome::Draw => self.tied += 1,
        }
        self.rating = (self.rating + rating_delta).max(0);
    }
}

/// A known player and their lightweight session attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub connected: bool,
    pub last_seen: DateTime<Utc>,
    pub stats: PlayerStats,
}

impl Player {
    /// Creates a connected player with default statistics.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            connected: true,
            last_seen: Utc::now(),
            stats: PlayerStats::default(),
        }
    }
}
