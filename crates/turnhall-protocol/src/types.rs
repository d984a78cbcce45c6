//! Identity newtypes and the move/outcome shapes that cross layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a player.
///
/// Newtype over a v4 UUID. Player ids are opaque and immutable; they
/// are minted by the account system (out of scope) or by
/// [`PlayerId::new`] in tests and demos.
///
/// `#[serde(transparent)]` serializes this as the bare UUID string so
/// snapshots and gateway payloads stay flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Generates a fresh random player id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a room.
///
/// Room ids must survive a process restart (they key persisted
/// snapshots), so they are random UUIDs rather than a process-local
/// counter. Collisions are practically impossible; the orchestrator
/// still checks and reports `DuplicateId` if one ever occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Generates a fresh random room id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game-type identifier, e.g. `"tic-tac-toe"`.
///
/// Keys the rules registry and matchmaking buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameType(pub String);

impl GameType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A move submitted by a player.
///
/// `data` is opaque to the orchestrator — only the matching rules
/// contract interprets it. The orchestrator checks room state and turn
/// order, then hands the whole move to the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMove {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub data: serde_json::Value,
}

/// How a single player finished a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// One player's result for a finished game, as reported by the rules
/// contract. The rating delta is applied to the player's directory
/// entry exactly once, when the room transitions to `Finished`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub player_id: PlayerId,
    pub outcome: Outcome,
    pub rating_delta: i32,
}
