//! The room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a room.
///
/// ```text
/// Waiting ──(capacity reached)──→ Playing ──(rules completion)──→ Finished
///    │                               │
///    └──(forced end)──→ Abandoned ←──┘ (occupancy < 2, or forced end)
/// ```
///
/// - **Waiting**: accepting joins; no rules-state progression.
/// - **Playing**: rules-state mutates only on accepted moves from the
///   current turn-holder.
/// - **Finished**: terminal. Rules contract reported completion;
///   results have been applied.
/// - **Abandoned**: terminal. Occupancy dropped below 2 mid-game, or
///   the room was administratively terminated.
///
/// No transition ever returns to `Waiting`, and the terminal states
/// never transition at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Waiting,
    Playing,
    Finished,
    Abandoned,
}

impl RoomState {
    /// Returns `true` if the room is accepting new occupants.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if a game is actively running.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` if the room will never change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Abandoned)
    }

    /// Returns `true` if moving from `self` to `target` is a legal
    /// transition of the state machine.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Waiting, Self::Playing) => true,
            (Self::Waiting, Self::Abandoned) => true,
            (Self::Playing, Self::Finished) => true,
            (Self::Playing, Self::Abandoned) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Playing => write!(f, "Playing"),
            Self::Finished => write!(f, "Finished"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}
