//! # Turnhall
//!
//! Session orchestration engine for concurrent turn-based multiplayer.
//!
//! Turnhall hosts rooms (bounded sessions with a lifecycle state
//! machine and round-robin turn order), validates and applies moves
//! through pluggable [`RulesContract`](turnhall_rules::RulesContract)
//! implementations, pairs queued players by rating, and persists every
//! room mutation so in-flight games survive a restart.
//!
//! Transport, authentication, and client delivery are an external
//! gateway's job: it calls into the engine and broadcasts the
//! [`RoomEvent`](turnhall_protocol::RoomEvent)s each call returns.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turnhall::prelude::*;
//!
//! let engine = Engine::builder()
//!     .contract(Arc::new(MyGameRules))
//!     .snapshot_dir("/var/lib/turnhall")
//!     .build()
//!     .await?;
//!
//! let room = engine.orchestrator().create_room(
//!     "Alpha", GameType::from("my-game"), 2, false, None,
//! )?;
//! ```

mod engine;
mod error;

pub use engine::{Engine, EngineBuilder};
pub use error::EngineError;

/// Everything a gateway or demo typically needs.
pub mod prelude {
    pub use crate::{Engine, EngineBuilder, EngineError};
    pub use turnhall_directory::{Player, PlayerDirectory, PlayerStats};
    pub use turnhall_matchmaker::{Matchmaker, MatchmakerConfig, MatchmakerError};
    pub use turnhall_protocol::{
        GameType, Outcome, PlayerId, PlayerMove, PlayerResult, RoomEvent, RoomId, RoomSnapshot,
        RoomState,
    };
    pub use turnhall_room::{RoomConfig, RoomError, RoomOrchestrator, RoomOverview};
    pub use turnhall_rules::{RulesContract, RulesError, RulesRegistry};
    pub use turnhall_snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
}
