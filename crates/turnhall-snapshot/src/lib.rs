//! Durable room snapshots for crash recovery.
//!
//! A [`SnapshotStore`] maps room id → serialized room snapshot. The
//! room layer writes a snapshot after every state-affecting mutation
//! and replays surviving snapshots on startup.
//!
//! Persistence is best-effort by contract: a failed save is logged by
//! the caller and never rolls back the in-memory mutation that
//! triggered it.
//!
//! Two implementations ship here:
//! - [`FileSnapshotStore`] — one JSON document per room under a
//!   directory; survives restarts.
//! - [`MemorySnapshotStore`] — a concurrent map; for tests and demos.

mod error;
mod file;
mod memory;
mod store;

pub use error::SnapshotError;
pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use store::SnapshotStore;
