//! Orchestrator configuration.

use std::time::Duration;

/// Settings for the room orchestrator.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How long a turn-holder has before the external scheduler may
    /// skip or forfeit them. Tracked per room; not enforced here.
    pub turn_timeout: Duration,

    /// Snapshots older than this are discarded (and deleted) during
    /// recovery instead of restored. Reference policy: 24 hours.
    pub snapshot_stale_after: Duration,

    /// Command channel size per room actor. If a room's channel fills
    /// up, callers wait (bounded backpressure).
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(60),
            snapshot_stale_after: Duration::from_secs(24 * 60 * 60),
            channel_size: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default_staleness_is_one_day() {
        let config = RoomConfig::default();
        assert_eq!(config.snapshot_stale_after, Duration::from_secs(86_400));
        assert_eq!(config.turn_timeout, Duration::from_secs(60));
    }
}
