//! File-backed snapshot storage: one JSON document per room.

use std::path::{Path, PathBuf};

use tokio::fs;
use turnhall_protocol::{RoomId, RoomSnapshot};

use crate::{SnapshotError, SnapshotStore};

/// Stores each room's snapshot as `<room_id>.json` under a directory.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so
/// a crash mid-write leaves either the old document or the new one,
/// never a truncated hybrid.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Opens (creating if needed) a snapshot directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        tracing::info!(dir = %dir.display(), "snapshot store opened");
        Ok(Self { dir })
    }

    fn path_for(&self, room_id: RoomId) -> PathBuf {
        self.dir.join(format!("{room_id}.json"))
    }

    async fn read_one(path: &Path) -> Result<RoomSnapshot, SnapshotError> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &RoomSnapshot) -> Result<(), SnapshotError> {
        let path = self.path_for(snapshot.room_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        tracing::trace!(room_id = %snapshot.room_id, "snapshot saved");
        Ok(())
    }

    async fn load(&self, room_id: RoomId) -> Result<Option<RoomSnapshot>, SnapshotError> {
        let path = self.path_for(room_id);
        match Self::read_one(&path).await {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(SnapshotError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn load_all(&self) -> Result<Vec<RoomSnapshot>, SnapshotError> {
        let mut snapshots = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_one(&path).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    // One corrupt document must not block recovery of
                    // the rest.
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable snapshot"
                    );
                }
            }
        }
        Ok(snapshots)
    }

    async fn delete(&self, room_id: RoomId) -> Result<(), SnapshotError> {
        match fs::remove_file(self.path_for(room_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
