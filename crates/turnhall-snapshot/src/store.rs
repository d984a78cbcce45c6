//! The storage trait at the persistence boundary.

use turnhall_protocol::{RoomId, RoomSnapshot};

use crate::SnapshotError;

/// Durable key/value storage for room snapshots.
///
/// Implementations must tolerate concurrent saves for *different*
/// rooms. Saves for the same room are last-write-wins by wall-clock
/// `last_updated`; the per-room actor already serializes them, so the
/// store never sees two concurrent writes for one room.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persists a snapshot, replacing any previous one for the room.
    async fn save(&self, snapshot: &RoomSnapshot) -> Result<(), SnapshotError>;

    /// Loads the snapshot for one room, if present.
    async fn load(&self, room_id: RoomId) -> Result<Option<RoomSnapshot>, SnapshotError>;

    /// Loads every readable snapshot. Individual unreadable entries
    /// are skipped and logged, not fatal — recovery must proceed past
    /// one corrupt document.
    async fn load_all(&self) -> Result<Vec<RoomSnapshot>, SnapshotError>;

    /// Removes the snapshot for a room. Deleting a missing snapshot
    /// succeeds.
    async fn delete(&self, room_id: RoomId) -> Result<(), SnapshotError>;
}
