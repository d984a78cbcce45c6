//! Error types for the snapshot layer.

/// Errors that can occur while persisting or loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Underlying storage I/O failed.
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialized or deserialized.
    #[error("snapshot codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}
