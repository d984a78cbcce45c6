//! Shared types for the Turnhall orchestration engine.
//!
//! This crate defines the vocabulary the other layers speak:
//!
//! - **Identity** ([`PlayerId`], [`RoomId`], [`GameType`]) — opaque,
//!   collision-resistant identifiers.
//! - **Lifecycle** ([`RoomState`]) — the room state machine.
//! - **Events** ([`RoomEvent`]) — what the gateway broadcasts to clients
//!   after each orchestrator operation.
//! - **Outcomes** ([`Outcome`], [`PlayerResult`]) — per-player game
//!   results with rating deltas.
//! - **Snapshots** ([`RoomSnapshot`]) — the persisted projection of a
//!   room used for crash recovery.
//!
//! It knows nothing about rooms' internals, persistence, or transport —
//! it only defines shapes that cross layer boundaries.

mod event;
mod snapshot;
mod state;
mod types;

pub use event::RoomEvent;
pub use snapshot::RoomSnapshot;
pub use state::RoomState;
pub use types::{GameType, Outcome, PlayerId, PlayerMove, PlayerResult, RoomId};
