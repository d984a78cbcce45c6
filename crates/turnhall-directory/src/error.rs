//! Error types for the directory layer.

use turnhall_protocol::PlayerId;

/// Errors that can occur during directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The player is not known to the directory.
    #[error("player {0} not found")]
    NotFound(PlayerId),
}
