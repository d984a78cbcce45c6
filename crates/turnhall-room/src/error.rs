//! Error types for the room layer.
//!
//! Everything here is a recoverable validation failure except
//! [`RoomError::ContractFailed`], which wraps a rules-contract error
//! caught at the orchestrator boundary, and
//! [`RoomError::Unavailable`], which means a room actor is gone.

use turnhall_protocol::{GameType, PlayerId, RoomId, RoomState};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Freshly generated room id collided with an existing room.
    /// Practically impossible with random UUIDs; reported anyway.
    #[error("room id {0} already exists")]
    DuplicateId(RoomId),

    /// The room stopped accepting joins.
    #[error("room {0} is not waiting for players")]
    NotWaiting(RoomId),

    /// No player slots left.
    #[error("room {0} is full")]
    Full(RoomId),

    /// Wrong or missing join secret for a private room.
    #[error("bad secret for room {0}")]
    BadSecret(RoomId),

    /// The player already occupies a seat in this room.
    #[error("player {0} already in room {1}")]
    AlreadyJoined(PlayerId, RoomId),

    /// The player does not occupy a seat in this room.
    #[error("player {0} not in room {1}")]
    NotOccupant(PlayerId, RoomId),

    /// Moves are only accepted while the room is `Playing`.
    #[error("room {0} is not playing")]
    NotPlaying(RoomId),

    /// The mover is not the current turn-holder.
    #[error("player {0} moved out of turn")]
    OutOfTurn(PlayerId),

    /// No rules contract is registered for the room's game type.
    #[error("no rules registered for game type {0}")]
    NoRulesForType(GameType),

    /// The rules contract rejected the move.
    #[error("invalid move in room {0}")]
    InvalidMove(RoomId),

    /// A rules contract failed while the orchestrator was driving it.
    /// The room's state is left unchanged.
    #[error("rules contract failed for room {0}: {1}")]
    ContractFailed(RoomId, String),

    /// Occupants cannot spectate their own seat.
    #[error("player {0} is an occupant of room {1}")]
    SpectatorIsOccupant(PlayerId, RoomId),

    /// The player is not in the room's spectator set.
    #[error("player {0} is not spectating room {1}")]
    NotSpectating(PlayerId, RoomId),

    /// Too few occupants to start the game.
    #[error("room {room_id} needs at least {needed} players, has {actual}")]
    TooFewPlayers {
        room_id: RoomId,
        needed: usize,
        actual: usize,
    },

    /// Requested capacity is outside what the game type allows.
    #[error("capacity {requested} outside allowed range {min}..={max}")]
    InvalidCapacity {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// The requested lifecycle transition is not legal.
    #[error("room {room_id}: illegal transition {from} -> {to}")]
    InvalidTransition {
        room_id: RoomId,
        from: RoomState,
        to: RoomState,
    },

    /// The room's command channel is closed — its actor has stopped.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
