//! Matchmaker error type.

use thiserror::Error;
use turnhall_protocol::GameType;
use turnhall_room::RoomError;

/// Errors surfaced by matchmaker entry points.
#[derive(Debug, Error)]
pub enum MatchmakerError {
    /// Enqueue named a game type no contract is registered for.
    #[error("no rules contract registered for game type '{0}'")]
    UnknownGameType(GameType),

    /// A room operation failed while placing a matched pair.
    #[error(transparent)]
    Room(#[from] RoomError),
}
