//! In-memory snapshot storage for tests and demos.

use dashmap::DashMap;
use turnhall_protocol::{RoomId, RoomSnapshot};

use crate::{SnapshotError, SnapshotStore};

/// A snapshot store that forgets everything on drop.
///
/// Useful where durability doesn't matter: unit tests, demos, or
/// deployments that explicitly opt out of crash recovery.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: DashMap<RoomId, RoomSnapshot>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots (test helper).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &RoomSnapshot) -> Result<(), SnapshotError> {
        self.snapshots.insert(snapshot.room_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, room_id: RoomId) -> Result<Option<RoomSnapshot>, SnapshotError> {
        Ok(self.snapshots.get(&room_id).map(|s| s.clone()))
    }

    async fn load_all(&self) -> Result<Vec<RoomSnapshot>, SnapshotError> {
        Ok(self.snapshots.iter().map(|s| s.clone()).collect())
    }

    async fn delete(&self, room_id: RoomId) -> Result<(), SnapshotError> {
        self.snapshots.remove(&room_id);
        Ok(())
    }
}
