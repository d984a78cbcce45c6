//! The `RulesContract` trait — the extension point for game developers.

use turnhall_protocol::{GameType, PlayerId, PlayerMove, PlayerResult};

use crate::RulesError;

/// The per-game-type rules implementation.
///
/// A contract is a set of pure functions over an opaque rules-state
/// blob (`serde_json::Value`). The orchestrator owns the blob, stores
/// it inside the room, and persists it in snapshots; only the matching
/// contract ever interprets it.
///
/// Contracts are stateless and shared via `Arc`, so a single instance
/// is invoked concurrently across different rooms. Calls for one room
/// are serialized by that room's actor, and they happen while the room
/// is effectively locked — implementations must be fast and
/// non-blocking (no I/O, no network).
///
/// Every method returns `Result` so a buggy contract surfaces as a
/// typed error at the orchestrator boundary instead of a panic or a
/// half-applied move.
pub trait RulesContract: Send + Sync {
    /// The game-type identifier this contract implements.
    fn game_type(&self) -> GameType;

    /// Minimum occupants required to start a game.
    fn min_players(&self) -> usize {
        2
    }

    /// Maximum occupants a room of this game type may hold.
    fn max_players(&self) -> usize {
        2
    }

    /// Creates the initial rules-state for a game with `player_count`
    /// occupants. Called once, when the room starts playing.
    fn initialize(&self, player_count: usize) -> Result<serde_json::Value, RulesError>;

    /// Returns `Ok(true)` if the move is legal in the given state.
    ///
    /// The orchestrator has already verified the room is `Playing` and
    /// the mover holds the turn; this checks game-level legality only.
    fn validate(
        &self,
        state: &serde_json::Value,
        mv: &PlayerMove,
    ) -> Result<bool, RulesError>;

    /// Applies a validated move, returning the successor state.
    ///
    /// Takes the state by reference and returns a new value so a
    /// failure leaves the room's stored state untouched.
    fn apply(
        &self,
        state: &serde_json::Value,
        mv: &PlayerMove,
    ) -> Result<serde_json::Value, RulesError>;

    /// Returns `Ok(true)` once the game has reached a terminal
    /// position. Checked after every applied move.
    fn is_complete(&self, state: &serde_json::Value) -> Result<bool, RulesError>;

    /// Computes per-player outcomes for a complete game.
    ///
    /// `players` is the room's occupant list in join order — the same
    /// order `initialize` was sized for.
    fn results(
        &self,
        state: &serde_json::Value,
        players: &[PlayerId],
    ) -> Result<Vec<PlayerResult>, RulesError>;
}
