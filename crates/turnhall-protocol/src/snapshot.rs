//! The persisted projection of a room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameType, PlayerId, RoomId, RoomState};

/// A serializable projection of a room's full state.
///
/// Written by the room actor after every state-affecting mutation and
/// read back on startup to reconstruct in-flight sessions. One JSON
/// document per room, keyed by `room_id`.
///
/// `last_updated` drives the staleness policy: snapshots older than
/// the configured threshold (24 h by default) are discarded on
/// recovery instead of restored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub name: String,
    pub game_type: GameType,
    pub max_players: usize,
    pub private: bool,
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub state: RoomState,
    /// Occupants in join order. Order matters: turn rotation and the
    /// first turn-holder are defined over this sequence.
    pub occupants: Vec<PlayerId>,
    pub spectators: Vec<PlayerId>,
    /// Opaque rules-state blob, owned by the matching rules contract.
    pub rules_state: Option<serde_json::Value>,
    pub current_turn: Option<PlayerId>,
    pub turn_started_at: Option<DateTime<Utc>>,
    /// Turn timeout in seconds (tracked, not enforced here).
    pub turn_timeout_secs: u64,
    pub last_updated: DateTime<Utc>,
}

impl RoomSnapshot {
    /// Age of this snapshot relative to `now`.
    ///
    /// Clock skew can make `last_updated` sit in the future; that
    /// counts as zero age, not as negative.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.last_updated).max(chrono::Duration::zero())
    }
}
