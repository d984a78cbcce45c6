//! Room lifecycle management for Turnhall.
//!
//! Each room runs as an isolated tokio task (actor model) owning its
//! occupants, lifecycle state, turn pointer, and opaque rules-state.
//! The [`RoomOrchestrator`] creates rooms, routes operations to their
//! actors, and rebuilds in-flight sessions from snapshots on startup.
//!
//! # Key types
//!
//! - [`RoomOrchestrator`] — create/join/leave/move/end, queries, recovery
//! - [`Room`] — the room model and its turn-order rules
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomOverview`] — read-only projection for queries
//! - [`RoomConfig`] — turn timeout, snapshot staleness, channel sizing

mod actor;
mod config;
mod error;
mod orchestrator;
mod room;

pub use actor::{RoomHandle, RoomOverview, RoomReply};
pub use config::RoomConfig;
pub use error::RoomError;
pub use orchestrator::RoomOrchestrator;
pub use room::{LeaveEffect, Room};
